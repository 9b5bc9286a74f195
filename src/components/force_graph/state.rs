use log::debug;

use super::drag::{DragController, DragEvent};
use super::scene::GraphScene;
use super::simulation::Simulation;
use super::types::Graph;
use crate::config::{CanvasConfig, SimulationParameters};

/// Alpha applied when the canvas changes size under a live graph.
const RESIZE_ALPHA: f64 = 0.3;

/// Everything one force-graph canvas mutates between frames.
pub struct ForceGraphState {
	pub graph: Graph,
	pub simulation: Simulation,
	pub drag: DragController,
	pub config: CanvasConfig,
	pub width: f64,
	pub height: f64,
}

impl ForceGraphState {
	pub fn new(graph: Graph, config: CanvasConfig, width: f64, height: f64) -> Self {
		let params = SimulationParameters::default();
		let simulation = Simulation::new(
			&graph,
			|distance| config.rest_length(distance, width, height),
			params,
			(width / 2.0, height / 2.0),
		);
		Self {
			graph,
			simulation,
			drag: DragController::new(params.drag_alpha_target),
			config,
			width,
			height,
		}
	}

	/// Advances one frame. Returns whether the loop should keep going.
	pub fn tick(&mut self) -> bool {
		let more = self.simulation.step();
		if !more {
			debug!("layout at rest after {} ticks", self.simulation.ticks());
		}
		more
	}

	pub fn scene(&self) -> GraphScene {
		GraphScene::project(&self.graph, &self.simulation, &self.drag)
	}

	pub fn drag_start(&mut self, node: usize, event: DragEvent) -> bool {
		self.drag.start(&mut self.simulation, node, event)
	}

	pub fn drag_move(&mut self, event: DragEvent) -> bool {
		self.drag.drag(&mut self.simulation, event).is_some()
	}

	pub fn drag_end(&mut self, event: DragEvent) -> bool {
		self.drag.end(&mut self.simulation, event).is_some()
	}

	pub fn drag_cancel(&mut self) {
		self.drag.cancel_all(&mut self.simulation);
	}

	/// Rescales links to a new canvas size, recentres and lets the layout resettle.
	pub fn resize(&mut self, width: f64, height: f64) {
		if (width, height) == (self.width, self.height) {
			return;
		}
		self.width = width;
		self.height = height;
		let config = self.config;
		self.simulation
			.set_rest_lengths(&self.graph, |distance| config.rest_length(distance, width, height));
		self.simulation.set_center(width / 2.0, height / 2.0);
		self.simulation.set_alpha(self.simulation.alpha().max(RESIZE_ALPHA));
		self.simulation.restart();
	}
}
