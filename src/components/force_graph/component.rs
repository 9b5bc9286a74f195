use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, PointerEvent};

use super::drag::DragEvent;
use super::render::{NODE_INDEX_ATTR, SvgGraph};
use super::state::ForceGraphState;
use super::types::Graph;
use crate::components::browser::{FrameLoop, WindowListener, host_size};
use crate::config::{CanvasConfig, CanvasSizing};

/// One mounted graph: its state, its svg and the loop driving both.
struct LiveGraph {
	frames: FrameLoop,
	state: Rc<RefCell<ForceGraphState>>,
	svg: Rc<SvgGraph>,
}

impl LiveGraph {
	fn mount(host: &Element, graph: Graph, config: CanvasConfig) -> Result<Self, JsValue> {
		let (w, h) = config.resolve_size(|| host_size(host));
		info!(
			"drawing \"{}\" with {} nodes and {} links on a {w}x{h} canvas",
			graph.main_node().id,
			graph.nodes().len(),
			graph.links().len()
		);
		let state = ForceGraphState::new(graph, config, w, h);
		let svg = Rc::new(SvgGraph::mount(host, &state.scene(), w, h)?);
		let state = Rc::new(RefCell::new(state));

		let (state_frame, svg_frame) = (state.clone(), svg.clone());
		let frames = FrameLoop::new(move || {
			let mut s = state_frame.borrow_mut();
			let more = s.tick();
			if let Err(err) = svg_frame.apply(&s.scene()) {
				error!("failed to redraw graph: {err:?}");
				return false;
			}
			more
		});
		frames.wake();

		Ok(Self { frames, state, svg })
	}

	fn drag_event(&self, ev: &PointerEvent) -> DragEvent {
		let (x, y) = self
			.svg
			.local_point(ev.client_x() as f64, ev.client_y() as f64);
		DragEvent {
			pointer_id: ev.pointer_id(),
			x,
			y,
		}
	}

	fn resize(&self, host: &Element) {
		let (w, h) = host_size(host);
		if w <= 0.0 || h <= 0.0 {
			return;
		}
		self.state.borrow_mut().resize(w, h);
		if let Err(err) = self.svg.resize(w, h) {
			error!("failed to resize graph: {err:?}");
		}
		self.frames.wake();
	}
}

fn target_node(ev: &PointerEvent) -> Option<usize> {
	ev.target()?
		.dyn_into::<Element>()
		.ok()?
		.get_attribute(NODE_INDEX_ATTR)?
		.parse()
		.ok()
}

#[component]
pub fn ForceGraphSvg(
	#[prop(into)] data: Signal<Option<Graph>>,
	#[prop(default = CanvasConfig::FIXED)] config: CanvasConfig,
) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let live: Rc<RefCell<Option<LiveGraph>>> = Rc::new(RefCell::new(None));
	let mut resize_listener: Option<WindowListener> = None;
	let live_init = live.clone();

	Effect::new(move |_| {
		let graph = data.get();
		let Some(host) = host_ref.get() else {
			return;
		};
		let host: Element = host.into();

		// The previous loop and svg go away before anything new is drawn.
		live_init.borrow_mut().take();
		let Some(graph) = graph else {
			return;
		};

		match LiveGraph::mount(&host, graph, config) {
			Ok(graph) => *live_init.borrow_mut() = Some(graph),
			Err(err) => error!("failed to mount graph: {err:?}"),
		}

		if config.sizing == CanvasSizing::Responsive && resize_listener.is_none() {
			let weak = Rc::downgrade(&live_init);
			resize_listener = WindowListener::new("resize", move || {
				if let Some(live) = weak.upgrade() {
					if let Some(ref graph) = *live.borrow() {
						graph.resize(&host);
					}
				}
			});
		}
	});

	let live_pd = live.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(node) = target_node(&ev) else {
			return;
		};
		let live = live_pd.borrow();
		let Some(graph) = live.as_ref() else {
			return;
		};
		let event = graph.drag_event(&ev);
		if graph.state.borrow_mut().drag_start(node, event) {
			ev.prevent_default();
			if let Some(host) = host_ref.get_untracked() {
				let _ = host.set_pointer_capture(ev.pointer_id());
			}
			graph.frames.wake();
		}
	};

	let live_pm = live.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let live = live_pm.borrow();
		let Some(graph) = live.as_ref() else {
			return;
		};
		let event = graph.drag_event(&ev);
		if graph.state.borrow_mut().drag_move(event) {
			graph.frames.wake();
		}
	};

	let live_pu = live.clone();
	let on_pointerup = move |ev: PointerEvent| {
		if let Some(ref graph) = *live_pu.borrow() {
			let event = graph.drag_event(&ev);
			graph.state.borrow_mut().drag_end(event);
		}
	};

	let live_pc = live.clone();
	let on_pointercancel = move |_: PointerEvent| {
		if let Some(ref graph) = *live_pc.borrow() {
			let mut state = graph.state.borrow_mut();
			if state.drag.is_active() {
				state.drag_cancel();
			}
		}
	};

	let style = match config.sizing {
		CanvasSizing::Fixed { width, height } => {
			format!("width: {width}px; height: {height}px; touch-action: none;")
		}
		CanvasSizing::Responsive => "width: 100%; height: 100%; touch-action: none;".to_string(),
	};

	view! {
		<div
			node_ref=host_ref
			class="graph-host"
			style=style
			on:pointerdown=on_pointerdown
			on:pointermove=on_pointermove
			on:pointerup=on_pointerup
			on:pointercancel=on_pointercancel
		/>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use js_sys::Promise;
	use wasm_bindgen_futures::JsFuture;
	use wasm_bindgen_test::*;
	use web_sys::HtmlElement;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	async fn settle() {
		let wait = Promise::new(&mut |resolve, _| {
			if let Some(window) = web_sys::window() {
				let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 50);
			}
		});
		JsFuture::from(wait).await.unwrap();
	}

	fn host() -> HtmlElement {
		let doc = web_sys::window().unwrap().document().unwrap();
		let host = doc.create_element("div").unwrap();
		doc.body().unwrap().append_child(&host).unwrap();
		host.dyn_into().unwrap()
	}

	#[wasm_bindgen_test]
	async fn clearing_the_data_removes_the_svg() {
		let graph = Graph::from_json(
			r#"{"nodes": [{"id": "A", "size": 1}, {"id": "B", "size": 0.5}],
			    "links": [{"source": "A", "target": "B", "distance": 0.5}]}"#,
		)
		.unwrap();
		let data = RwSignal::new(Some(graph));
		let root = host();
		let _mounted = leptos::mount::mount_to(root.clone(), move || view! { <ForceGraphSvg data=data /> });
		settle().await;

		let canvas = root.query_selector(".graph-host").unwrap().unwrap();
		assert_eq!(canvas.query_selector_all("svg.graph-canvas").unwrap().length(), 1);
		assert_eq!(canvas.query_selector_all("circle").unwrap().length(), 2);

		data.set(None);
		settle().await;
		assert_eq!(canvas.child_element_count(), 0);
	}

	#[wasm_bindgen_test]
	async fn error_payload_draws_nothing() {
		let err = Graph::from_json(r#"{"error": "no results"}"#).unwrap_err();
		assert_eq!(err.to_string(), "no results");

		let data = RwSignal::new(None::<Graph>);
		let root = host();
		let _mounted = leptos::mount::mount_to(root.clone(), move || view! { <ForceGraphSvg data=data /> });
		settle().await;

		let canvas = root.query_selector(".graph-host").unwrap().unwrap();
		assert_eq!(canvas.child_element_count(), 0);
	}
}
