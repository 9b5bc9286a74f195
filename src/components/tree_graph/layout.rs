//! Tidy tree layout (Reingold-Tilford with Walker's linear-time refinements).
//!
//! Siblings sit one unit apart, cousins two. The result is scaled into a
//! `breadth` x `depth_extent` box and then laid out left to right: depth
//! runs along x, sibling order along y.

use super::types::CategoryTree;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Positions for every node of a [`CategoryTree`], indexed like its nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeLayout {
	positions: Vec<Point>,
}

struct Walker {
	parent: usize,
	children: Vec<usize>,
	/// Position among its siblings.
	index: usize,
	ancestor: usize,
	default_ancestor: Option<usize>,
	prelim: f64,
	modifier: f64,
	change: f64,
	shift: f64,
	thread: Option<usize>,
}

struct Walk<'a> {
	tree: &'a CategoryTree,
	w: Vec<Walker>,
}

impl Walk<'_> {
	fn separation(&self, a: usize, b: usize) -> f64 {
		let nodes = self.tree.nodes();
		if nodes[a].parent == nodes[b].parent { 1.0 } else { 2.0 }
	}

	fn next_left(&self, v: usize) -> Option<usize> {
		self.w[v].children.first().copied().or(self.w[v].thread)
	}

	fn next_right(&self, v: usize) -> Option<usize> {
		self.w[v].children.last().copied().or(self.w[v].thread)
	}

	fn left_sibling(&self, v: usize) -> Option<usize> {
		let index = self.w[v].index;
		(index > 0).then(|| self.w[self.w[v].parent].children[index - 1])
	}

	fn first_walk(&mut self, v: usize) {
		let parent = self.w[v].parent;
		let left = self.left_sibling(v);

		let ends = self.w[v].children.first().copied().zip(self.w[v].children.last().copied());
		if let Some((first, last)) = ends {
			self.execute_shifts(v);
			let midpoint = (self.w[first].prelim + self.w[last].prelim) / 2.0;
			match left {
				Some(l) => {
					self.w[v].prelim = self.w[l].prelim + self.separation(v, l);
					self.w[v].modifier = self.w[v].prelim - midpoint;
				}
				None => self.w[v].prelim = midpoint,
			}
		} else if let Some(l) = left {
			self.w[v].prelim = self.w[l].prelim + self.separation(v, l);
		}

		let fallback = self.w[parent].default_ancestor.unwrap_or(self.w[parent].children[0]);
		self.w[parent].default_ancestor = Some(self.apportion(v, left, fallback));
	}

	fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
		let Some(w) = left else {
			return ancestor;
		};

		let (mut vip, mut vop, mut vim) = (v, v, w);
		let mut vom = self.w[self.w[v].parent].children[0];
		let (mut sip, mut sop) = (self.w[vip].modifier, self.w[vop].modifier);
		let (mut sim, mut som) = (self.w[vim].modifier, self.w[vom].modifier);

		let (rest_im, rest_ip) = loop {
			let (next_im, next_ip) = (self.next_right(vim), self.next_left(vip));
			let (Some(im), Some(ip)) = (next_im, next_ip) else {
				break (next_im, next_ip);
			};
			vim = im;
			vip = ip;
			vom = self.next_left(vom).unwrap_or(vom);
			vop = self.next_right(vop).unwrap_or(vop);
			self.w[vop].ancestor = v;

			let shift = self.w[vim].prelim + sim - self.w[vip].prelim - sip + self.separation(vim, vip);
			if shift > 0.0 {
				let wm = self.next_ancestor(vim, v, ancestor);
				self.move_subtree(wm, v, shift);
				sip += shift;
				sop += shift;
			}
			sim += self.w[vim].modifier;
			sip += self.w[vip].modifier;
			som += self.w[vom].modifier;
			sop += self.w[vop].modifier;
		};

		if let Some(im) = rest_im {
			if self.next_right(vop).is_none() {
				self.w[vop].thread = Some(im);
				self.w[vop].modifier += sim - sop;
			}
		}
		if let Some(ip) = rest_ip {
			if self.next_left(vom).is_none() {
				self.w[vom].thread = Some(ip);
				self.w[vom].modifier += sip - som;
				ancestor = v;
			}
		}
		ancestor
	}

	fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
		let candidate = self.w[vim].ancestor;
		if self.w[candidate].parent == self.w[v].parent {
			candidate
		} else {
			ancestor
		}
	}

	fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
		let change = shift / (self.w[wp].index - self.w[wm].index) as f64;
		self.w[wp].change -= change;
		self.w[wp].shift += shift;
		self.w[wm].change += change;
		self.w[wp].prelim += shift;
		self.w[wp].modifier += shift;
	}

	fn execute_shifts(&mut self, v: usize) {
		let (mut shift, mut change) = (0.0, 0.0);
		for i in (0..self.w[v].children.len()).rev() {
			let child = self.w[v].children[i];
			let c = &mut self.w[child];
			c.prelim += shift;
			c.modifier += shift;
			change += c.change;
			shift += c.shift + change;
		}
	}
}

/// Children before parents, siblings left to right.
fn post_order(tree: &CategoryTree) -> Vec<usize> {
	let mut order = Vec::with_capacity(tree.len());
	let mut stack = vec![(0usize, false)];
	while let Some((v, expanded)) = stack.pop() {
		if expanded {
			order.push(v);
			continue;
		}
		stack.push((v, true));
		stack.extend(tree.nodes()[v].children.iter().rev().map(|&c| (c, false)));
	}
	order
}

impl TreeLayout {
	pub fn compute(tree: &CategoryTree, breadth: f64, depth_extent: f64) -> Self {
		let n = tree.len();
		let virtual_root = n;
		let mut w = tree
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| Walker {
				parent: node.parent.unwrap_or(virtual_root),
				children: node.children.clone(),
				index: node
					.parent
					.map_or(0, |p| tree.nodes()[p].children.iter().position(|&c| c == idx).unwrap_or(0)),
				ancestor: idx,
				default_ancestor: None,
				prelim: 0.0,
				modifier: 0.0,
				change: 0.0,
				shift: 0.0,
				thread: None,
			})
			.collect::<Vec<_>>();
		w.push(Walker {
			parent: virtual_root,
			children: vec![0],
			index: 0,
			ancestor: virtual_root,
			default_ancestor: None,
			prelim: 0.0,
			modifier: 0.0,
			change: 0.0,
			shift: 0.0,
			thread: None,
		});

		let mut walk = Walk { tree, w };
		for v in post_order(tree) {
			walk.first_walk(v);
		}
		walk.w[virtual_root].modifier = -walk.w[0].prelim;

		// Pre-order storage means parents are final before their children.
		let mut breadths = vec![0.0; n];
		for v in 0..n {
			let parent_modifier = walk.w[walk.w[v].parent].modifier;
			breadths[v] = walk.w[v].prelim + parent_modifier;
			walk.w[v].modifier += parent_modifier;
		}

		let (mut left, mut right) = (0, 0);
		for v in 0..n {
			if breadths[v] < breadths[left] {
				left = v;
			}
			if breadths[v] > breadths[right] {
				right = v;
			}
		}
		let s = if left == right {
			1.0
		} else {
			walk.separation(left, right) / 2.0
		};
		let tx = s - breadths[left];
		let kx = breadth / (breadths[right] + s + tx);
		let ky = depth_extent / tree.height().max(1) as f64;

		let positions = tree
			.nodes()
			.iter()
			.zip(&breadths)
			.map(|(node, &b)| Point {
				x: node.depth as f64 * ky,
				y: (b + tx) * kx,
			})
			.collect();
		Self { positions }
	}

	pub fn positions(&self) -> &[Point] {
		&self.positions
	}

	pub fn position(&self, idx: usize) -> Point {
		self.positions[idx]
	}
}

/// Cubic edge from `parent` to `child` with both control points on the
/// horizontal midpoint.
pub fn link_path(parent: Point, child: Point) -> String {
	let mx = (parent.x + child.x) / 2.0;
	format!(
		"M{},{}C{},{} {},{} {},{}",
		parent.x, parent.y, mx, parent.y, mx, child.y, child.x, child.y
	)
}
