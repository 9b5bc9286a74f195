use super::layout::{TreeLayout, link_path};
use super::types::CategoryTree;
use crate::config::category_url;

/// Gap between a node's circle and its label.
const LABEL_OFFSET: f64 = 8.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TreeNodeGlyph {
	pub class: &'static str,
	pub x: f64,
	pub y: f64,
	pub label: String,
	pub href: String,
	/// Internal labels sit left of their circle, leaf labels right.
	pub text_anchor: &'static str,
	pub dx: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeScene {
	/// One `d` attribute per parent-child edge, in child pre-order.
	pub edges: Vec<String>,
	pub nodes: Vec<TreeNodeGlyph>,
}

impl TreeScene {
	pub fn project(tree: &CategoryTree, layout: &TreeLayout) -> Self {
		let edges = tree
			.nodes()
			.iter()
			.enumerate()
			.filter_map(|(idx, node)| {
				let parent = node.parent?;
				Some(link_path(layout.position(parent), layout.position(idx)))
			})
			.collect();
		let nodes = tree
			.nodes()
			.iter()
			.zip(layout.positions())
			.map(|(node, pos)| {
				let leaf = node.is_leaf();
				TreeNodeGlyph {
					class: if leaf { "node node--leaf" } else { "node node--internal" },
					x: pos.x,
					y: pos.y,
					label: node.name.clone(),
					href: category_url(&node.name),
					text_anchor: if leaf { "start" } else { "end" },
					dx: if leaf { LABEL_OFFSET } else { -LABEL_OFFSET },
				}
			})
			.collect();
		Self { edges, nodes }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn root_with_two_leaves() {
		let tree = CategoryTree::from_json(
			r#"{"name": "Root", "children": [{"name": "A", "children": []}, {"name": "B", "children": []}]}"#,
		)
		.unwrap();
		let layout = TreeLayout::compute(&tree, 400.0, 300.0);
		let scene = TreeScene::project(&tree, &layout);

		assert_eq!(scene.nodes.len(), 3);
		assert_eq!(
			scene.edges,
			["M0,200C150,200 150,100 300,100", "M0,200C150,200 150,300 300,300"]
		);

		let root = &scene.nodes[0];
		assert_eq!(root.class, "node node--internal");
		assert_eq!((root.text_anchor, root.dx), ("end", -8.0));
		assert_eq!(root.href, "https://ja.wikipedia.org/wiki/Category:Root");

		let (a, b) = (&scene.nodes[1], &scene.nodes[2]);
		assert!(a.x > root.x && a.x == b.x);
		assert_ne!(a.y, b.y);
		assert_eq!(a.class, "node node--leaf");
		assert_eq!((a.text_anchor, a.dx), ("start", 8.0));
		assert_eq!(b.label, "B");
	}

	#[test]
	fn lone_root_has_no_edges() {
		let tree = CategoryTree::from_json(r#"{"name": "Solo"}"#).unwrap();
		let scene = TreeScene::project(&tree, &TreeLayout::compute(&tree, 100.0, 100.0));
		assert!(scene.edges.is_empty());
		assert_eq!(scene.nodes[0].class, "node node--leaf");
	}
}
