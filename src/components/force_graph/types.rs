use std::collections::HashMap;

use serde::Deserialize;

use crate::error::GraphError;

/// A related term as sent by the server.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphNode {
	pub id: String,
	/// Relevance in `0..=1`; drives the rendered radius.
	#[serde(alias = "weight")]
	pub size: f64,
}

/// An edge as sent by the server, endpoints still given by id.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	/// Relatedness in `0..=1`; larger values rest farther apart.
	#[serde(alias = "weight")]
	pub distance: f64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

/// An edge with both endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
	pub source: usize,
	pub target: usize,
	pub distance: f64,
}

/// A validated related-term network. Node 0 is the searched keyword.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
	nodes: Vec<GraphNode>,
	links: Vec<Link>,
}

impl Graph {
	/// Parses a server response, surfacing its `error` field before anything else.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		let payload: serde_json::Value = serde_json::from_str(text)?;
		if let Some(err) = GraphError::reported(&payload) {
			return Err(err);
		}
		Self::from_data(GraphData::deserialize(payload)?)
	}

	pub fn from_data(data: GraphData) -> Result<Self, GraphError> {
		if data.nodes.is_empty() {
			return Err(GraphError::Malformed("graph has no nodes".into()));
		}

		let mut id_to_idx = HashMap::with_capacity(data.nodes.len());
		for (idx, node) in data.nodes.iter().enumerate() {
			if !node.size.is_finite() {
				return Err(GraphError::Malformed(format!(
					"node \"{}\" has a non-finite size",
					node.id
				)));
			}
			if id_to_idx.insert(node.id.as_str(), idx).is_some() {
				return Err(GraphError::Malformed(format!(
					"duplicate node id \"{}\"",
					node.id
				)));
			}
		}

		let resolve = |id: &str| {
			id_to_idx.get(id).copied().ok_or_else(|| {
				GraphError::Malformed(format!("link references unknown node \"{id}\""))
			})
		};
		let links = data
			.links
			.iter()
			.map(|link| {
				if !link.distance.is_finite() {
					return Err(GraphError::Malformed(format!(
						"link {} -> {} has a non-finite distance",
						link.source, link.target
					)));
				}
				Ok(Link {
					source: resolve(&link.source)?,
					target: resolve(&link.target)?,
					distance: link.distance,
				})
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			nodes: data.nodes,
			links,
		})
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	/// The distinguished node, first in input order.
	pub fn main_node(&self) -> &GraphNode {
		&self.nodes[0]
	}
}
