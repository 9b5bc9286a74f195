mod component;
mod drag;
mod quadtree;
mod render;
mod scene;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphSvg;
pub use types::Graph;
