use log::debug;

use super::simulation::Simulation;

/// Pointer sample in simulation coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragEvent {
	pub pointer_id: i32,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPhase {
	Free,
	Dragging,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
	pointer_id: i32,
	node: usize,
}

/// Pins grabbed nodes and keeps the simulation warm while any gesture is live.
#[derive(Clone, Debug)]
pub struct DragController {
	gestures: Vec<Gesture>,
	reheat_target: f64,
}

impl DragController {
	pub fn new(reheat_target: f64) -> Self {
		Self {
			gestures: Vec::new(),
			reheat_target,
		}
	}

	/// Grabs `node`. Returns `false` if the pointer or the node is already in a gesture.
	pub fn start(&mut self, sim: &mut Simulation, node: usize, event: DragEvent) -> bool {
		let Some(&current) = sim.node(node) else {
			return false;
		};
		if self
			.gestures
			.iter()
			.any(|g| g.pointer_id == event.pointer_id || g.node == node)
		{
			return false;
		}

		if self.gestures.is_empty() {
			sim.set_alpha_target(self.reheat_target);
			sim.restart();
		}
		self.gestures.push(Gesture {
			pointer_id: event.pointer_id,
			node,
		});
		sim.pin(node, current.x, current.y);
		debug!("drag start on node {node}");
		true
	}

	/// Moves the node held by `event.pointer_id` to the pointer.
	pub fn drag(&mut self, sim: &mut Simulation, event: DragEvent) -> Option<usize> {
		let gesture = self.gesture(event.pointer_id)?;
		sim.pin(gesture.node, event.x, event.y);
		Some(gesture.node)
	}

	/// Releases the node held by `event.pointer_id` back to the physics.
	pub fn end(&mut self, sim: &mut Simulation, event: DragEvent) -> Option<usize> {
		let pos = self
			.gestures
			.iter()
			.position(|g| g.pointer_id == event.pointer_id)?;
		let gesture = self.gestures.remove(pos);
		if self.gestures.is_empty() {
			sim.set_alpha_target(0.0);
		}
		sim.unpin(gesture.node);
		debug!(
			"drag end on node {}, alpha target {}",
			gesture.node,
			sim.alpha_target()
		);
		Some(gesture.node)
	}

	/// Drops every gesture, e.g. when the pointer leaves the canvas.
	pub fn cancel_all(&mut self, sim: &mut Simulation) {
		for gesture in self.gestures.drain(..) {
			sim.unpin(gesture.node);
		}
		sim.set_alpha_target(0.0);
	}

	pub fn phase(&self, node: usize) -> DragPhase {
		if self.gestures.iter().any(|g| g.node == node) {
			DragPhase::Dragging
		} else {
			DragPhase::Free
		}
	}

	pub fn is_active(&self) -> bool {
		!self.gestures.is_empty()
	}

	fn gesture(&self, pointer_id: i32) -> Option<Gesture> {
		self.gestures
			.iter()
			.find(|g| g.pointer_id == pointer_id)
			.copied()
	}
}
