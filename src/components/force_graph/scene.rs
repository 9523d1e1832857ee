//! Retained scene model: the primitives the SVG surface mirrors.
//!
//! Everything here is plain data. The tick loop and the interaction
//! controller write to it; `render` copies it into DOM attributes.

use std::cell::Cell;

use super::layout::Point;

/// Pixel size of the drawing surface. Simulation space is centered on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Surface width in viewBox units.
	pub width: f64,
	/// Surface height in viewBox units.
	pub height: f64,
}

/// Used when neither the container nor the window reports a size.
pub const FALLBACK_VIEWPORT: Viewport = Viewport {
	width: 800.0,
	height: 600.0,
};

impl Viewport {
	/// Create a viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// `self` if it has an area, otherwise the first candidate that does,
	/// otherwise [`FALLBACK_VIEWPORT`].
	pub fn or_fallback(self, candidates: impl IntoIterator<Item = Viewport>) -> Self {
		std::iter::once(self)
			.chain(candidates)
			.find(Viewport::has_area)
			.unwrap_or(FALLBACK_VIEWPORT)
	}

	fn has_area(&self) -> bool {
		self.width > 0.0 && self.height > 0.0
	}

	/// Map a point in CSS pixels of a surface rendered at `rendered` size to
	/// viewBox units. Axes with no rendered extent are left unscaled.
	pub fn css_to_surface(&self, css: Point, rendered: Viewport) -> Point {
		let scale = |units: f64, pixels: f64| if pixels > 0.0 { units / pixels } else { 1.0 };
		Point::new(
			css.x * scale(self.width, rendered.width),
			css.y * scale(self.height, rendered.height),
		)
	}

	/// `(min_x, min_y, width, height)` spanning `[-w/2, w/2] x [-h/2, h/2]`.
	pub fn view_box(&self) -> (f64, f64, f64, f64) {
		(-self.width / 2.0, -self.height / 2.0, self.width, self.height)
	}

	/// Convert a point relative to the surface's top-left into simulation space.
	pub fn to_simulation(&self, surface: Point) -> Point {
		Point::new(surface.x - self.width / 2.0, surface.y - self.height / 2.0)
	}
}

/// Drawn edge. Endpoints follow the resolved source/target nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePrimitive {
	/// Id of the link this line draws.
	pub link_id: String,
	/// Dataset index of the source node.
	pub source: usize,
	/// Dataset index of the target node.
	pub target: usize,
	/// Source endpoint.
	pub from: Point,
	/// Target endpoint.
	pub to: Point,
}

/// Drawn node.
#[derive(Clone, Debug, PartialEq)]
pub struct CirclePrimitive {
	/// Id of the node this circle draws.
	pub node_id: String,
	/// Center in simulation space.
	pub center: Point,
	/// Radius in simulation units.
	pub radius: f64,
	/// CSS fill color.
	pub fill: String,
}

/// The single hover overlay of a view, positioned in container pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	/// DOM id of the overlay element.
	pub element_id: String,
	/// Offset from the container's left edge.
	pub left: f64,
	/// Offset from the container's top edge.
	pub top: f64,
	/// 0 when hidden, 1 when shown.
	pub opacity: f64,
	/// Whether the overlay is shown.
	pub visible: bool,
	/// Markup shown inside the overlay.
	pub content: String,
}

impl Tooltip {
	/// An empty, invisible tooltip.
	pub fn hidden(element_id: String) -> Self {
		Self {
			element_id,
			left: 0.0,
			top: 0.0,
			opacity: 0.0,
			visible: false,
			content: String::new(),
		}
	}

	/// Make visible at `at` with `content`.
	pub fn show(&mut self, at: Point, content: &str) {
		self.move_to(at);
		self.opacity = 1.0;
		self.visible = true;
		if self.content != content {
			self.content = content.to_string();
		}
	}

	/// Reposition without touching content or visibility.
	pub fn move_to(&mut self, at: Point) {
		self.left = at.x;
		self.top = at.y;
	}

	/// Content is kept; only visibility changes.
	pub fn hide(&mut self) {
		self.opacity = 0.0;
		self.visible = false;
	}
}

/// Everything drawn by one view.
#[derive(Clone, Debug)]
pub struct Scene {
	/// Surface size.
	pub viewport: Viewport,
	/// One per link, in dataset order.
	pub lines: Vec<LinePrimitive>,
	/// One per node, in dataset order.
	pub circles: Vec<CirclePrimitive>,
	/// The hover overlay.
	pub tooltip: Tooltip,
	/// Element id of the `<svg>` root.
	pub surface_id: String,
}

/// Hands out DOM ids unique within one generator.
///
/// Each mounted component owns its generator, so ids never depend on global
/// randomness and repeat deterministically across runs.
#[derive(Debug)]
pub struct ElementIds {
	prefix: String,
	next: Cell<u32>,
}

impl ElementIds {
	/// Generator producing ids that start with `prefix`.
	pub fn new(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
			next: Cell::new(0),
		}
	}

	/// Next id, of the form `prefix-kind-n`.
	pub fn next(&self, kind: &str) -> String {
		let n = self.next.get();
		self.next.set(n + 1);
		format!("{}-{}-{}", self.prefix, kind, n)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn view_box_is_centered() {
		let vp = Viewport::new(800.0, 600.0);
		assert_eq!(vp.view_box(), (-400.0, -300.0, 800.0, 600.0));
		assert_eq!(vp.to_simulation(Point::new(400.0, 300.0)), Point::new(0.0, 0.0));
		assert_eq!(vp.to_simulation(Point::new(0.0, 600.0)), Point::new(-400.0, 300.0));
	}

	#[test]
	fn scaled_surface_maps_to_view_box_units() {
		let vp = Viewport::new(800.0, 600.0);
		let rendered = Viewport::new(400.0, 300.0);
		let surface = vp.css_to_surface(Point::new(400.0, 150.0), rendered);
		assert_eq!(surface, Point::new(800.0, 300.0));
		assert_eq!(vp.to_simulation(surface), Point::new(400.0, 0.0));

		// Not laid out yet: pixels pass through.
		let unscaled = vp.css_to_surface(Point::new(10.0, 20.0), Viewport::new(0.0, 0.0));
		assert_eq!(unscaled, Point::new(10.0, 20.0));
	}

	#[test]
	fn empty_viewport_falls_back() {
		let window = Viewport::new(1280.0, 720.0);
		assert_eq!(Viewport::new(640.0, 480.0).or_fallback([window]), Viewport::new(640.0, 480.0));
		assert_eq!(Viewport::new(640.0, 0.0).or_fallback([window]), window);
		assert_eq!(Viewport::new(0.0, 0.0).or_fallback(Vec::new()), FALLBACK_VIEWPORT);
		assert_eq!(
			Viewport::new(0.0, 0.0).or_fallback([Viewport::new(0.0, 0.0)]),
			Viewport::new(800.0, 600.0)
		);
	}

	#[test]
	fn ids_are_sequential_per_generator() {
		let ids = ElementIds::new("g");
		assert_eq!(ids.next("tooltip"), "g-tooltip-0");
		assert_eq!(ids.next("svg"), "g-svg-1");

		let other = ElementIds::new("h");
		assert_eq!(other.next("tooltip"), "h-tooltip-0");
	}

	#[test]
	fn hide_keeps_content() {
		let mut tip = Tooltip::hidden("t".into());
		tip.show(Point::new(5.0, 6.0), "hello");
		tip.hide();
		assert!(!tip.visible);
		assert_eq!(tip.opacity, 0.0);
		assert_eq!(tip.content, "hello");
	}
}
