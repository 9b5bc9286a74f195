//! Screen-space projection of the graph, rebuilt from the simulation each frame.

use super::drag::{DragController, DragPhase};
use super::simulation::Simulation;
use super::types::Graph;
use crate::config::article_url;

/// Rendered radius for a node of relevance `size`.
pub fn node_radius(size: f64) -> f64 {
	size * 20.0 + 10.0
}

fn node_class(idx: usize, phase: DragPhase) -> String {
	let mut class = String::from(if idx == 0 { "node main" } else { "node" });
	if phase == DragPhase::Dragging {
		class.push_str(" dragging");
	}
	class
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeGlyph {
	pub class: String,
	pub radius: f64,
	pub cx: f64,
	pub cy: f64,
	pub label: String,
	pub href: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkGlyph {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphScene {
	pub links: Vec<LinkGlyph>,
	pub nodes: Vec<NodeGlyph>,
}

impl GraphScene {
	pub fn project(graph: &Graph, sim: &Simulation, drag: &DragController) -> Self {
		let positions = sim.nodes();
		let links = sim
			.links()
			.iter()
			.map(|link| {
				let (s, t) = (positions[link.source], positions[link.target]);
				LinkGlyph {
					x1: s.x,
					y1: s.y,
					x2: t.x,
					y2: t.y,
				}
			})
			.collect();
		let nodes = graph
			.nodes()
			.iter()
			.zip(positions)
			.enumerate()
			.map(|(idx, (node, pos))| NodeGlyph {
				class: node_class(idx, drag.phase(idx)),
				radius: node_radius(node.size),
				cx: pos.x,
				cy: pos.y,
				label: node.id.clone(),
				href: article_url(&node.id),
			})
			.collect();
		Self { links, nodes }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::drag::DragEvent;
	use crate::config::SimulationParameters;

	#[test]
	fn radius_grows_with_size() {
		assert_eq!(node_radius(0.0), 10.0);
		assert_eq!(node_radius(0.5), 20.0);
		assert_eq!(node_radius(1.0), 30.0);
		let sizes = [0.0, 0.1, 0.25, 0.7, 1.0];
		assert!(sizes.windows(2).all(|w| node_radius(w[0]) < node_radius(w[1])));
	}

	#[test]
	fn projects_two_node_payload() {
		let graph = Graph::from_json(
			r#"{"nodes": [{"id": "A", "size": 1}, {"id": "B", "size": 0.5}],
			    "links": [{"source": "A", "target": "B", "distance": 0.5}]}"#,
		)
		.unwrap();
		let mut sim = Simulation::new(
			&graph,
			|d| d * 150.0 + 50.0,
			SimulationParameters::default(),
			(400.0, 300.0),
		);
		sim.tick();
		let mut drag = DragController::new(0.3);
		let scene = GraphScene::project(&graph, &sim, &drag);

		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.links.len(), 1);
		assert_eq!(scene.nodes[0].radius, 30.0);
		assert_eq!(scene.nodes[1].radius, 20.0);
		assert_eq!(scene.nodes[0].class, "node main");
		assert_eq!(scene.nodes[1].class, "node");
		assert_eq!(scene.nodes[1].href, "https://ja.wikipedia.org/wiki/B");

		let (a, b) = (sim.nodes()[0], sim.nodes()[1]);
		assert_eq!(
			scene.links[0],
			LinkGlyph {
				x1: a.x,
				y1: a.y,
				x2: b.x,
				y2: b.y
			}
		);
		assert_eq!((scene.nodes[1].cx, scene.nodes[1].cy), (b.x, b.y));

		let grab = DragEvent {
			pointer_id: 1,
			x: 0.0,
			y: 0.0,
		};
		assert!(drag.start(&mut sim, 0, grab));
		let scene = GraphScene::project(&graph, &sim, &drag);
		assert_eq!(scene.nodes[0].class, "node main dragging");
		assert_eq!(scene.nodes[1].class, "node");
	}
}
