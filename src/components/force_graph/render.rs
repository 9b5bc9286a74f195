use wasm_bindgen::JsValue;
use web_sys::Element;

use super::scene::GraphScene;
use crate::components::svg;

pub const NODE_INDEX_ATTR: &str = "data-index";

/// The `<svg>` of one related-term graph and direct handles to everything in it.
///
/// Element counts are fixed at mount; [`SvgGraph::apply`] only moves them.
pub struct SvgGraph {
	root: Element,
	lines: Vec<Element>,
	circles: Vec<Element>,
	labels: Vec<Element>,
}

impl SvgGraph {
	pub fn mount(host: &Element, scene: &GraphScene, width: f64, height: f64) -> Result<Self, JsValue> {
		let doc = svg::document()?;
		let root = svg::append_root(&doc, host, "graph-canvas", width, height)?;

		let links = svg::append(&doc, &root, "g", Some("links"))?;
		let lines = scene
			.links
			.iter()
			.map(|_| svg::append(&doc, &links, "line", Some("link")))
			.collect::<Result<Vec<_>, _>>()?;

		let nodes = svg::append(&doc, &root, "g", Some("nodes"))?;
		let circles = scene
			.nodes
			.iter()
			.enumerate()
			.map(|(idx, glyph)| {
				let circle = svg::append(&doc, &nodes, "circle", Some(&glyph.class))?;
				svg::set_num(&circle, "r", glyph.radius)?;
				circle.set_attribute(NODE_INDEX_ATTR, &idx.to_string())?;
				Ok(circle)
			})
			.collect::<Result<Vec<_>, JsValue>>()?;

		let label_group = svg::append(&doc, &root, "g", Some("labels"))?;
		let labels = scene
			.nodes
			.iter()
			.map(|glyph| {
				let a = svg::append_link(&doc, &label_group, &glyph.href)?;
				svg::append_text(&doc, &a, "node-label", &glyph.label)
			})
			.collect::<Result<Vec<_>, JsValue>>()?;

		let graph = Self {
			root,
			lines,
			circles,
			labels,
		};
		graph.apply(scene)?;
		Ok(graph)
	}

	/// Rewrites line endpoints, circle centres and classes, and label anchors.
	pub fn apply(&self, scene: &GraphScene) -> Result<(), JsValue> {
		for (line, glyph) in self.lines.iter().zip(&scene.links) {
			svg::set_num(line, "x1", glyph.x1)?;
			svg::set_num(line, "y1", glyph.y1)?;
			svg::set_num(line, "x2", glyph.x2)?;
			svg::set_num(line, "y2", glyph.y2)?;
		}
		for ((circle, label), glyph) in self.circles.iter().zip(&self.labels).zip(&scene.nodes) {
			circle.set_attribute("class", &glyph.class)?;
			svg::set_num(circle, "cx", glyph.cx)?;
			svg::set_num(circle, "cy", glyph.cy)?;
			svg::set_num(label, "x", glyph.cx)?;
			svg::set_num(label, "y", glyph.cy)?;
		}
		Ok(())
	}

	pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
		svg::set_size(&self.root, width, height)
	}

	/// Maps client coordinates onto the svg's own coordinate space.
	pub fn local_point(&self, client_x: f64, client_y: f64) -> (f64, f64) {
		let rect = self.root.get_bounding_client_rect();
		(client_x - rect.left(), client_y - rect.top())
	}
}

impl Drop for SvgGraph {
	fn drop(&mut self) {
		self.root.remove();
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use wasm_bindgen_test::*;

	use super::*;
	use crate::components::force_graph::drag::DragController;
	use crate::components::force_graph::simulation::Simulation;
	use crate::components::force_graph::types::Graph;
	use crate::config::SimulationParameters;

	wasm_bindgen_test_configure!(run_in_browser);

	fn host() -> Element {
		let doc = svg::document().unwrap();
		let host = doc.create_element("div").unwrap();
		doc.body().unwrap().append_child(&host).unwrap();
		host
	}

	#[wasm_bindgen_test]
	fn mounts_one_element_per_node_and_link() {
		let graph = Graph::from_json(
			r#"{"nodes": [{"id": "A", "size": 1}, {"id": "B", "size": 0.5}],
			    "links": [{"source": "A", "target": "B", "distance": 0.5}]}"#,
		)
		.unwrap();
		let sim = Simulation::new(
			&graph,
			|d| d * 150.0 + 50.0,
			SimulationParameters::default(),
			(400.0, 300.0),
		);
		let scene = GraphScene::project(&graph, &sim, &DragController::new(0.3));
		let host = host();
		let svg = SvgGraph::mount(&host, &scene, 800.0, 600.0).unwrap();

		let circles = host.query_selector_all("circle").unwrap();
		assert_eq!(circles.length(), 2);
		assert_eq!(host.query_selector_all("line.link").unwrap().length(), 1);
		assert_eq!(host.query_selector_all("a > text.node-label").unwrap().length(), 2);
		let main = host.query_selector("circle.main").unwrap().unwrap();
		assert_eq!(main.get_attribute("r").as_deref(), Some("30"));
		assert_eq!(main.get_attribute(NODE_INDEX_ATTR).as_deref(), Some("0"));

		drop(svg);
		assert_eq!(host.child_element_count(), 0);
	}
}
