const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 16;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[(f64, f64)]) -> Option<Self> {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
			return None;
		}

		let span = (max_x - min_x).max(max_y - min_y).max(1.0);
		Some(Self {
			cx: (min_x + max_x) * 0.5,
			cy: (min_y + max_y) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, x: f64, y: f64) -> bool {
		(x - self.cx).abs() <= self.half_extent && (y - self.cy).abs() <= self.half_extent
	}

	pub(super) fn side_length(self) -> f64 {
		self.half_extent * 2.0
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let (ox, oy) = match quadrant {
			0 => (-quarter, -quarter),
			1 => (quarter, -quarter),
			2 => (-quarter, quarter),
			_ => (quarter, quarter),
		};
		Self {
			cx: self.cx + ox,
			cy: self.cy + oy,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, x: f64, y: f64) -> usize {
		match (x >= self.cx, y >= self.cy) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

/// Barnes-Hut cell: aggregate charge and its weighted centre.
pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	pub(super) cx: f64,
	pub(super) cy: f64,
	pub(super) charge: f64,
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub(super) fn build(positions: &[(f64, f64)], strengths: &[f64]) -> Option<Self> {
		let bounds = QuadBounds::from_points(positions)?;
		let indices = (0..positions.len()).collect::<Vec<_>>();
		Some(Self::build_node(bounds, indices, positions, strengths, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		positions: &[(f64, f64)],
		strengths: &[f64],
		depth: usize,
	) -> Self {
		let (mut charge, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		for &index in &indices {
			let strength = strengths[index];
			let (x, y) = positions[index];
			charge += strength;
			weight += strength.abs();
			sx += x * strength.abs();
			sy += y * strength.abs();
		}
		let (cx, cy) = if weight > 0.0 {
			(sx / weight, sy / weight)
		} else {
			(bounds.cx, bounds.cy)
		};

		let mut node = Self {
			bounds,
			cx,
			cy,
			charge,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
			return node;
		}

		let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
		for &index in &node.indices {
			let (x, y) = positions[index];
			buckets[bounds.quadrant_for(x, y)].push(index);
		}

		// Coincident points would otherwise split forever.
		if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				strengths,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}
