use wasm_bindgen::JsValue;
use web_sys::Element;

use super::scene::TreeScene;
use crate::components::svg;
use crate::config::TreeLayoutConfig;

/// A category tree drawn once into its own `<svg>`.
pub struct SvgTree {
	root: Element,
}

impl SvgTree {
	pub fn mount(
		host: &Element,
		scene: &TreeScene,
		width: f64,
		height: f64,
		config: &TreeLayoutConfig,
	) -> Result<Self, JsValue> {
		let doc = svg::document()?;
		let root = svg::append_root(&doc, host, "tree-canvas", width, height)?;
		let tree = Self { root };

		let body = svg::append(&doc, &tree.root, "g", None)?;
		let (ox, oy) = config.origin();
		body.set_attribute("transform", &format!("translate({ox},{oy})"))?;

		for d in &scene.edges {
			let path = svg::append(&doc, &body, "path", Some("link"))?;
			path.set_attribute("d", d)?;
		}

		for glyph in &scene.nodes {
			let group = svg::append(&doc, &body, "g", Some(glyph.class))?;
			group.set_attribute("transform", &format!("translate({},{})", glyph.x, glyph.y))?;
			let circle = svg::append(&doc, &group, "circle", None)?;
			svg::set_num(&circle, "r", config.node_radius)?;

			let a = svg::append_link(&doc, &group, &glyph.href)?;
			let text = svg::append_text(&doc, &a, "node-label", &glyph.label)?;
			svg::set_num(&text, "dx", glyph.dx)?;
			text.set_attribute("dy", "0.32em")?;
			text.set_attribute("text-anchor", glyph.text_anchor)?;
		}

		Ok(tree)
	}
}

impl Drop for SvgTree {
	fn drop(&mut self) {
		self.root.remove();
	}
}
