use serde::Deserialize;

use crate::error::GraphError;

/// A category as sent by the server.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CategoryNode {
	pub name: String,
	#[serde(default)]
	pub children: Vec<CategoryNode>,
}

/// One category in the flattened tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
	pub name: String,
	pub parent: Option<usize>,
	pub children: Vec<usize>,
	pub depth: usize,
}

impl TreeNode {
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}
}

/// A validated category taxonomy stored in pre-order; index 0 is the root.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryTree {
	nodes: Vec<TreeNode>,
}

impl CategoryTree {
	/// Parses a server response, surfacing its `error` field before anything else.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		let payload: serde_json::Value = serde_json::from_str(text)?;
		if let Some(err) = GraphError::reported(&payload) {
			return Err(err);
		}
		Self::from_root(&CategoryNode::deserialize(payload)?)
	}

	/// Flattens `root`, rejecting any category that reappears below itself.
	pub fn from_root(root: &CategoryNode) -> Result<Self, GraphError> {
		let mut nodes: Vec<TreeNode> = Vec::new();
		let mut stack = vec![(root, None::<usize>)];

		while let Some((category, parent)) = stack.pop() {
			let mut ancestor = parent;
			while let Some(idx) = ancestor {
				if nodes[idx].name == category.name {
					return Err(GraphError::Cycle(category.name.clone()));
				}
				ancestor = nodes[idx].parent;
			}

			let idx = nodes.len();
			let depth = parent.map_or(0, |p| nodes[p].depth + 1);
			if let Some(p) = parent {
				nodes[p].children.push(idx);
			}
			nodes.push(TreeNode {
				name: category.name.clone(),
				parent,
				children: Vec::with_capacity(category.children.len()),
				depth,
			});
			stack.extend(category.children.iter().rev().map(|child| (child, Some(idx))));
		}

		Ok(Self { nodes })
	}

	pub fn nodes(&self) -> &[TreeNode] {
		&self.nodes
	}

	pub fn root(&self) -> &TreeNode {
		&self.nodes[0]
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Depth of the deepest category.
	pub fn height(&self) -> usize {
		self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flattens_in_pre_order_with_back_references() {
		let tree = CategoryTree::from_json(
			r#"{"name": "Root", "children": [
				{"name": "A", "children": [{"name": "A1", "children": []}]},
				{"name": "B", "children": []}
			]}"#,
		)
		.unwrap();

		let names = tree.nodes().iter().map(|n| n.name.as_str()).collect::<Vec<_>>();
		assert_eq!(names, ["Root", "A", "A1", "B"]);
		assert_eq!(tree.root().parent, None);
		assert_eq!(tree.root().children, [1, 3]);
		assert_eq!(tree.nodes()[2].parent, Some(1));
		assert_eq!(tree.nodes()[2].depth, 2);
		assert!(tree.nodes()[3].is_leaf());
		assert_eq!(tree.height(), 2);
		assert_eq!(tree.len(), 4);
	}

	#[test]
	fn missing_children_means_leaf() {
		let tree = CategoryTree::from_json(r#"{"name": "Only"}"#).unwrap();
		assert_eq!(tree.len(), 1);
		assert!(tree.root().is_leaf());
		assert_eq!(tree.height(), 0);
	}

	#[test]
	fn error_payload_takes_precedence() {
		assert_eq!(
			CategoryTree::from_json(r#"{"error": "no categories", "name": "X"}"#),
			Err(GraphError::Input("no categories".into()))
		);
	}

	#[test]
	fn rejects_a_category_nested_under_itself() {
		let err = CategoryTree::from_json(
			r#"{"name": "Root", "children": [
				{"name": "A", "children": [{"name": "B", "children": [{"name": "A"}]}]}
			]}"#,
		)
		.unwrap_err();
		assert_eq!(err, GraphError::Cycle("A".into()));
	}

	#[test]
	fn same_name_in_separate_branches_is_not_a_cycle() {
		let tree = CategoryTree::from_json(
			r#"{"name": "Root", "children": [
				{"name": "A", "children": [{"name": "Shared"}]},
				{"name": "B", "children": [{"name": "Shared"}]}
			]}"#,
		)
		.unwrap();
		assert_eq!(tree.len(), 5);
	}

	#[test]
	fn rejects_malformed_trees() {
		for payload in [r#"{"children": []}"#, r#"{"name": 3}"#, r#"{"name": "R", "children": {}}"#] {
			assert!(
				matches!(CategoryTree::from_json(payload), Err(GraphError::Malformed(_))),
				"{payload} should be malformed"
			);
		}
	}
}
