mod component;
mod layout;
mod render;
mod scene;
mod types;

pub use component::CategoryTreeSvg;
pub use types::CategoryTree;
