//! Tunables for canvases, physics and the external reference site.

/// Site every node label links to.
pub const REFERENCE_SITE: &str = "https://ja.wikipedia.org";

/// Origin the pages post to; empty means relative to the page itself.
pub const API_BASE: &str = "";

/// Number of related terms requested when the form is left untouched.
pub const DEFAULT_DISP_COUNT: u32 = 30;

/// Relative server paths the pages post to.
pub struct Endpoints;

impl Endpoints {
	/// Related-term network for a keyword.
	pub const SEARCH: &'static str = "search";
	/// Category taxonomy for a keyword.
	pub const CATEGORY: &'static str = "category";
}

/// Article link for a related-term node.
pub fn article_url(id: &str) -> String {
	format!("{REFERENCE_SITE}/wiki/{id}")
}

/// Category link for a taxonomy node.
pub fn category_url(name: &str) -> String {
	format!("{REFERENCE_SITE}/wiki/Category:{name}")
}

/// How the drawing surface gets its pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasSizing {
	/// Always the given size.
	Fixed {
		/// Width in pixels.
		width: f64,
		/// Height in pixels.
		height: f64,
	},
	/// Follows the hosting element's current size.
	Responsive,
}

impl CanvasSizing {
	/// Size the fixed-canvas pages use.
	pub const DEFAULT: Self = Self::Fixed {
		width: 800.0,
		height: 600.0,
	};

	/// Resolves the surface size, asking `host` only for responsive canvases.
	/// A host that has not been laid out yet falls back to the default size.
	pub fn resolve(self, host: impl FnOnce() -> (f64, f64)) -> (f64, f64) {
		match self {
			Self::Fixed { width, height } => (width, height),
			Self::Responsive => {
				let (w, h) = host();
				(
					if w > 0.0 { w } else { 800.0 },
					if h > 0.0 { h } else { 600.0 },
				)
			}
		}
	}
}

/// One force-graph page variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasConfig {
	/// Where the size comes from.
	pub sizing: CanvasSizing,
	/// `k1`: canvas dimension divided by this scales a link's `distance`.
	pub link_scale_divisor: f64,
	/// `k2`: canvas dimension divided by this is added to every rest length.
	pub link_offset_divisor: f64,
}

impl CanvasConfig {
	/// 800x600 canvas; reproduces `distance * 150 + 50`.
	pub const FIXED: Self = Self {
		sizing: CanvasSizing::DEFAULT,
		link_scale_divisor: 4.0,
		link_offset_divisor: 12.0,
	};

	/// Canvas sized from its host element.
	pub const RESPONSIVE: Self = Self {
		sizing: CanvasSizing::Responsive,
		link_scale_divisor: 5.0,
		link_offset_divisor: 16.0,
	};

	/// Resolves the surface size; see [`CanvasSizing::resolve`].
	pub fn resolve_size(&self, host: impl FnOnce() -> (f64, f64)) -> (f64, f64) {
		self.sizing.resolve(host)
	}

	/// Rest length of a link with relatedness `distance` on a `width` x `height` canvas.
	pub fn rest_length(&self, distance: f64, width: f64, height: f64) -> f64 {
		let dim = width.min(height);
		distance * (dim / self.link_scale_divisor) + dim / self.link_offset_divisor
	}
}

/// Constants of the iterative force model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParameters {
	/// Starting temperature.
	pub alpha: f64,
	/// The loop stops once alpha falls below this.
	pub alpha_min: f64,
	/// Fraction of the gap to the alpha target closed each tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost each tick.
	pub velocity_decay: f64,
	/// Many-body strength per node; negative repels.
	pub charge_strength: f64,
	/// Barnes-Hut opening criterion.
	pub theta: f64,
	/// Distances below this are clamped for the charge force.
	pub charge_distance_min: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			alpha: 1.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			charge_strength: -30.0,
			theta: 0.9,
			charge_distance_min: 1.0,
			drag_alpha_target: 0.3,
		}
	}
}

/// Placement of the category tree inside its canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeLayoutConfig {
	/// Padding on every side.
	pub margin: f64,
	/// Room kept for labels, half left of the root and half right of the leaves.
	pub label_gutter: f64,
	/// Circle radius for tree nodes.
	pub node_radius: f64,
}

impl Default for TreeLayoutConfig {
	fn default() -> Self {
		Self {
			margin: 20.0,
			label_gutter: 160.0,
			node_radius: 4.5,
		}
	}
}

impl TreeLayoutConfig {
	/// Layout box (breadth, depth extent) left inside a `width` x `height` canvas.
	pub fn extent(&self, width: f64, height: f64) -> (f64, f64) {
		let breadth = height - 2.0 * self.margin;
		let depth = width - 2.0 * self.margin - self.label_gutter;
		(breadth.max(0.0), depth.max(0.0))
	}

	/// Offset of the layout origin from the canvas corner.
	pub fn origin(&self) -> (f64, f64) {
		(self.margin + self.label_gutter / 2.0, self.margin)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_canvas_matches_observed_link_lengths() {
		let cfg = CanvasConfig::FIXED;
		assert_eq!(cfg.resolve_size(|| unreachable!()), (800.0, 600.0));
		assert_eq!(cfg.rest_length(0.0, 800.0, 600.0), 50.0);
		assert_eq!(cfg.rest_length(0.5, 800.0, 600.0), 125.0);
		assert_eq!(cfg.rest_length(1.0, 800.0, 600.0), 200.0);
	}

	#[test]
	fn responsive_canvas_scales_with_host() {
		let cfg = CanvasConfig::RESPONSIVE;
		assert_eq!(cfg.resolve_size(|| (1200.0, 960.0)), (1200.0, 960.0));
		assert_eq!(cfg.resolve_size(|| (0.0, 0.0)), (800.0, 600.0));
		let small = cfg.rest_length(0.5, 400.0, 400.0);
		let large = cfg.rest_length(0.5, 1600.0, 1600.0);
		assert!((large - small * 4.0).abs() < 1e-9);
	}

	#[test]
	fn reference_links() {
		assert_eq!(article_url("東京"), "https://ja.wikipedia.org/wiki/東京");
		assert_eq!(
			category_url("日本の首都"),
			"https://ja.wikipedia.org/wiki/Category:日本の首都"
		);
	}

	#[test]
	fn tree_box_leaves_room_for_labels() {
		let cfg = TreeLayoutConfig::default();
		assert_eq!(cfg.extent(800.0, 600.0), (560.0, 600.0));
		assert_eq!(cfg.origin(), (100.0, 20.0));
		assert_eq!(cfg.extent(100.0, 30.0), (0.0, 0.0));
	}

	#[test]
	fn default_decay_reaches_rest_in_about_300_ticks() {
		let p = SimulationParameters::default();
		let ticks = (p.alpha_min.ln() / (1.0 - p.alpha_decay).ln()).round();
		assert_eq!(ticks, 300.0);
	}
}
