//! Iterative force layout: link springs, many-body repulsion and centering,
//! cooled by a decaying alpha.

use std::f64::consts::PI;

use super::quadtree::QuadNode;
use super::types::Graph;
use crate::config::SimulationParameters;

const INITIAL_RADIUS: f64 = 10.0;

/// Deterministic source for the tiny nudges that separate coincident nodes.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 4_294_967_296;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x; the node ignores forces along x while set.
	pub fx: Option<f64>,
	/// Pinned y.
	pub fy: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub rest_length: f64,
	strength: f64,
	bias: f64,
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	strengths: Vec<f64>,
	params: SimulationParameters,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	/// Seeds every node on a phyllotaxis spiral around `center`.
	///
	/// `rest_length` maps a link's relatedness to its target separation.
	pub fn new(
		graph: &Graph,
		rest_length: impl Fn(f64) -> f64,
		params: SimulationParameters,
		center: (f64, f64),
	) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let nodes = (0..graph.nodes().len())
			.map(|i| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				SimNode {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect::<Vec<_>>();

		let mut degree = vec![0usize; nodes.len()];
		for link in graph.links() {
			degree[link.source] += 1;
			degree[link.target] += 1;
		}
		let links = graph
			.links()
			.iter()
			.map(|link| {
				let (ds, dt) = (degree[link.source] as f64, degree[link.target] as f64);
				SimLink {
					source: link.source,
					target: link.target,
					rest_length: rest_length(link.distance),
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			strengths: vec![params.charge_strength; nodes.len()],
			nodes,
			links,
			alpha: params.alpha,
			params,
			center,
			alpha_target: 0.0,
			running: true,
			ticks: 0,
			rng: Lcg(1),
		}
	}

	/// Advances the physics by exactly one step, whether or not the loop is running.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		self.ticks += 1;

		self.apply_links();
		self.apply_charge();
		self.apply_centering();

		let retain = 1.0 - self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= retain;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= retain;
					node.y += node.vy;
				}
			}
		}
	}

	/// One frame of the loop. Returns whether another frame is wanted.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.params.alpha_min {
			self.running = false;
		}
		self.running
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Recomputes every link's rest length, e.g. after the canvas changed size.
	pub fn set_rest_lengths(&mut self, graph: &Graph, rest_length: impl Fn(f64) -> f64) {
		for (sim_link, link) in self.links.iter_mut().zip(graph.links()) {
			sim_link.rest_length = rest_length(link.distance);
		}
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	/// Locks a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	fn apply_links(&mut self) {
		for link in &self.links {
			let (source, target) = (self.nodes[link.source], self.nodes[link.target]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let scale = (l - link.rest_length) / l * self.alpha * link.strength;
			let (x, y) = (x * scale, y * scale);

			let target = &mut self.nodes[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let positions = self.nodes.iter().map(|n| (n.x, n.y)).collect::<Vec<_>>();
		let Some(quadtree) = QuadNode::build(&positions, &self.strengths) else {
			return;
		};
		let field = ChargeField {
			positions: &positions,
			strengths: &self.strengths,
			alpha: self.alpha,
			theta2: self.params.theta * self.params.theta,
			distance_min2: self.params.charge_distance_min * self.params.charge_distance_min,
		};
		for (index, node) in self.nodes.iter_mut().enumerate() {
			let mut velocity = (0.0, 0.0);
			field.accumulate(&quadtree, index, &mut self.rng, &mut velocity);
			node.vx += velocity.0;
			node.vy += velocity.1;
		}
	}

	fn apply_centering(&mut self) {
		let n = self.nodes.len() as f64;
		if n == 0.0 {
			return;
		}
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in &mut self.nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

struct ChargeField<'a> {
	positions: &'a [(f64, f64)],
	strengths: &'a [f64],
	alpha: f64,
	theta2: f64,
	distance_min2: f64,
}

impl ChargeField<'_> {
	fn accumulate(&self, cell: &QuadNode, index: usize, rng: &mut Lcg, velocity: &mut (f64, f64)) {
		if cell.charge == 0.0 {
			return;
		}
		let (px, py) = self.positions[index];

		if cell.is_leaf() {
			for &other in &cell.indices {
				if other == index {
					continue;
				}
				let (ox, oy) = self.positions[other];
				let w = self.strengths[other] * self.alpha;
				self.push(ox - px, oy - py, w, rng, velocity);
			}
			return;
		}

		let (x, y) = (cell.cx - px, cell.cy - py);
		let width = cell.bounds.side_length();
		if !cell.bounds.contains(px, py) && width * width / self.theta2 < x * x + y * y {
			self.push(x, y, cell.charge * self.alpha, rng, velocity);
			return;
		}

		for child in cell.children.iter().flatten() {
			self.accumulate(child, index, rng, velocity);
		}
	}

	fn push(&self, mut x: f64, mut y: f64, weight: f64, rng: &mut Lcg, velocity: &mut (f64, f64)) {
		let mut l = x * x + y * y;
		if x == 0.0 {
			x = rng.jiggle();
			l += x * x;
		}
		if y == 0.0 {
			y = rng.jiggle();
			l += y * y;
		}
		if l < self.distance_min2 {
			l = (self.distance_min2 * l).sqrt();
		}
		velocity.0 += x * weight / l;
		velocity.1 += y * weight / l;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::CanvasConfig;

	fn fixed_simulation(json: &str) -> Simulation {
		let graph = Graph::from_json(json).unwrap();
		Simulation::new(
			&graph,
			|d| CanvasConfig::FIXED.rest_length(d, 800.0, 600.0),
			SimulationParameters::default(),
			(400.0, 300.0),
		)
	}

	fn run_to_rest(sim: &mut Simulation) {
		let mut guard = 0;
		while sim.step() {
			guard += 1;
			assert!(guard < 5_000, "simulation never settled");
		}
	}

	fn separation(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (a, b) = (sim.nodes()[a], sim.nodes()[b]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn star(leaves: usize) -> String {
		let nodes = (0..=leaves)
			.map(|i| format!(r#"{{"id": "n{i}", "size": {}}}"#, 1.0 / (i + 1) as f64))
			.collect::<Vec<_>>()
			.join(",");
		let links = (1..=leaves)
			.map(|i| {
				format!(
					r#"{{"source": "n0", "target": "n{i}", "distance": {}}}"#,
					(i % 5) as f64 / 5.0
				)
			})
			.collect::<Vec<_>>()
			.join(",");
		format!(r#"{{"nodes": [{nodes}], "links": [{links}]}}"#)
	}

	const PAIR: &str = r#"{
		"nodes": [{"id": "A", "size": 1}, {"id": "B", "size": 0.5}],
		"links": [{"source": "A", "target": "B", "distance": 0.5}]
	}"#;

	#[test]
	fn linked_pair_settles_near_rest_length() {
		let mut sim = fixed_simulation(PAIR);
		assert_eq!(sim.links()[0].rest_length, 125.0);
		run_to_rest(&mut sim);
		let sep = separation(&sim, 0, 1);
		assert!((sep - 125.0).abs() < 3.0, "separation {sep}");
	}

	#[test]
	fn alpha_decays_and_loop_stops_on_its_own() {
		let mut sim = fixed_simulation(PAIR);
		let first_alpha = sim.alpha();
		sim.step();
		assert!(sim.alpha() < first_alpha);
		run_to_rest(&mut sim);
		assert!(!sim.is_running());
		assert!(sim.alpha() < SimulationParameters::default().alpha_min);
		assert!((295..=305).contains(&sim.ticks()), "ticks {}", sim.ticks());
		assert!(!sim.step());
	}

	#[test]
	fn layout_is_centred_on_canvas() {
		let mut sim = fixed_simulation(&star(12));
		run_to_rest(&mut sim);
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|node| node.x).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|node| node.y).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 1.0 && (cy - 300.0).abs() < 1.0, "centroid ({cx}, {cy})");
	}

	#[test]
	fn repulsion_spreads_a_large_star() {
		let mut sim = fixed_simulation(&star(40));
		run_to_rest(&mut sim);
		let nodes = sim.nodes();
		for i in 0..nodes.len() {
			assert!(nodes[i].x.is_finite() && nodes[i].y.is_finite());
			for j in (i + 1)..nodes.len() {
				assert!(separation(&sim, i, j) > 1.0, "nodes {i} and {j} overlap");
			}
		}
	}

	#[test]
	fn pinned_node_ignores_forces() {
		let mut sim = fixed_simulation(&star(6));
		sim.pin(3, 50.0, 60.0);
		for _ in 0..50 {
			sim.tick();
			let node = sim.nodes()[3];
			assert_eq!((node.x, node.y), (50.0, 60.0));
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn unpinned_node_moves_again() {
		let mut sim = fixed_simulation(PAIR);
		sim.pin(1, 780.0, 580.0);
		for _ in 0..20 {
			sim.tick();
		}
		sim.unpin(1);
		let before = sim.nodes()[1];
		sim.tick();
		let after = sim.nodes()[1];
		assert_ne!((before.x, before.y), (after.x, after.y));
	}

	#[test]
	fn identical_inputs_give_identical_layouts() {
		let mut a = fixed_simulation(&star(25));
		let mut b = fixed_simulation(&star(25));
		run_to_rest(&mut a);
		run_to_rest(&mut b);
		assert_eq!(a.nodes(), b.nodes());
	}

	#[test]
	fn restart_resumes_a_settled_loop() {
		let mut sim = fixed_simulation(PAIR);
		run_to_rest(&mut sim);
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..100 {
			assert!(sim.step());
		}
		assert!(sim.alpha() > 0.2);
	}
}
