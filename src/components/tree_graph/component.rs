use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::JsValue;
use web_sys::Element;

use super::layout::TreeLayout;
use super::render::SvgTree;
use super::scene::TreeScene;
use super::types::CategoryTree;
use crate::components::browser::{WindowListener, host_size};
use crate::config::{CanvasSizing, TreeLayoutConfig};

fn draw(
	host: &Element,
	tree: &CategoryTree,
	sizing: CanvasSizing,
	config: &TreeLayoutConfig,
) -> Result<SvgTree, JsValue> {
	let (w, h) = sizing.resolve(|| host_size(host));
	let (breadth, depth) = config.extent(w, h);
	let layout = TreeLayout::compute(tree, breadth, depth);
	info!(
		"drawing category tree \"{}\" with {} nodes, {} levels deep",
		tree.root().name,
		tree.len(),
		tree.height()
	);
	SvgTree::mount(host, &TreeScene::project(tree, &layout), w, h, config)
}

/// The tree on screen and the data it was drawn from, kept for redraws.
struct DrawnTree {
	tree: CategoryTree,
	svg: Option<SvgTree>,
}

impl DrawnTree {
	fn redraw(&mut self, host: &Element, sizing: CanvasSizing, config: &TreeLayoutConfig) {
		self.svg.take();
		match draw(host, &self.tree, sizing, config) {
			Ok(svg) => self.svg = Some(svg),
			Err(err) => error!("failed to draw category tree: {err:?}"),
		}
	}
}

/// Category taxonomy drawn left to right. Redrawn whenever `data` changes,
/// and on window resizes when `sizing` is responsive.
#[component]
pub fn CategoryTreeSvg(
	#[prop(into)] data: Signal<Option<CategoryTree>>,
	#[prop(default = CanvasSizing::DEFAULT)] sizing: CanvasSizing,
	#[prop(optional)] config: TreeLayoutConfig,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let drawn: Rc<RefCell<Option<DrawnTree>>> = Rc::new(RefCell::new(None));
	let mut resize_listener: Option<WindowListener> = None;

	Effect::new(move |_| {
		let tree = data.get();
		let Some(host) = host_ref.get() else {
			return;
		};
		let host: Element = host.into();

		drawn.borrow_mut().take();
		let Some(tree) = tree else {
			return;
		};
		let mut current = DrawnTree { tree, svg: None };
		current.redraw(&host, sizing, &config);
		*drawn.borrow_mut() = Some(current);

		if sizing == CanvasSizing::Responsive && resize_listener.is_none() {
			let weak = Rc::downgrade(&drawn);
			resize_listener = WindowListener::new("resize", move || {
				if let Some(drawn) = weak.upgrade() {
					if let Some(current) = drawn.borrow_mut().as_mut() {
						current.redraw(&host, sizing, &config);
					}
				}
			});
		}
	});

	let style = match sizing {
		CanvasSizing::Fixed { width, height } => format!("width: {width}px; height: {height}px;"),
		CanvasSizing::Responsive => "width: 100%; height: 100%;".to_string(),
	};

	view! { <div node_ref=host_ref class="tree-host" style=style /> }
}
