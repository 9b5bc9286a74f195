//! Small helpers for building SVG elements by hand.
//!
//! Widgets keep the handles these return; nothing here looks elements up
//! by tag or class.

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

pub fn document() -> Result<Document, JsValue> {
	web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))
}

/// Creates `<tag class=…>` and appends it to `parent`.
pub fn append(
	doc: &Document,
	parent: &Element,
	tag: &str,
	class: Option<&str>,
) -> Result<Element, JsValue> {
	let el = doc.create_element_ns(Some(SVG_NS), tag)?;
	if let Some(class) = class {
		el.set_attribute("class", class)?;
	}
	parent.append_child(&el)?;
	Ok(el)
}

/// Creates a root `<svg>` of the given size inside `host`.
pub fn append_root(
	doc: &Document,
	host: &Element,
	class: &str,
	width: f64,
	height: f64,
) -> Result<Element, JsValue> {
	let svg = append(doc, host, "svg", Some(class))?;
	set_size(&svg, width, height)?;
	Ok(svg)
}

pub fn set_size(svg: &Element, width: f64, height: f64) -> Result<(), JsValue> {
	set_num(svg, "width", width)?;
	set_num(svg, "height", height)
}

pub fn set_num(el: &Element, name: &str, value: f64) -> Result<(), JsValue> {
	el.set_attribute(name, &value.to_string())
}

/// Appends an external link that opens in a new browsing context.
pub fn append_link(doc: &Document, parent: &Element, href: &str) -> Result<Element, JsValue> {
	let a = append(doc, parent, "a", None)?;
	a.set_attribute("href", href)?;
	a.set_attribute_ns(Some(XLINK_NS), "xlink:href", href)?;
	a.set_attribute("target", "_blank")?;
	Ok(a)
}

/// Appends `<text class=…>` holding `label`.
pub fn append_text(
	doc: &Document,
	parent: &Element,
	class: &str,
	label: &str,
) -> Result<Element, JsValue> {
	let text = append(doc, parent, "text", Some(class))?;
	text.set_text_content(Some(label));
	Ok(text)
}
