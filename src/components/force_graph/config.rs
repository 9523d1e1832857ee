//! Visual and interaction constants for the graph view.

use super::layout::LayoutConfig;

/// Configuration for a single graph view.
#[derive(Clone, Debug)]
pub struct ViewConfig {
	/// Radius of every node circle, in simulation units.
	pub node_radius: f64,
	/// Alpha target held while at least one node is being dragged.
	pub drag_alpha_target: f64,
	/// Fill used for nodes without a color.
	pub fallback_color: String,
	/// Tooltip shown for nodes without tooltip text.
	pub fallback_tooltip: String,
	/// CSS class given to the tooltip overlay.
	pub tooltip_class: String,
	/// Stroke color shared by all link lines.
	pub link_stroke: String,
	/// Width of link lines.
	pub link_stroke_width: f64,
	/// Simulation tuning.
	pub layout: LayoutConfig,
}

impl Default for ViewConfig {
	fn default() -> Self {
		Self {
			node_radius: 9.0,
			drag_alpha_target: 0.3,
			fallback_color: "black".to_string(),
			fallback_tooltip: "Sem informações".to_string(),
			tooltip_class: "graph-tooltip".to_string(),
			link_stroke: "#999".to_string(),
			link_stroke_width: 1.5,
			layout: LayoutConfig::default(),
		}
	}
}
