//! Mirrors a [`Scene`] into SVG elements and the tooltip overlay.
//!
//! Elements are created once in [`SvgSurface::build`]; afterwards only their
//! attributes change.

use web_sys::{Document, Element, HtmlElement};
use wasm_bindgen::JsCast;

use super::config::ViewConfig;
use super::error::{GraphError, Result};
use super::scene::Scene;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The DOM elements of one mounted view.
pub struct SvgSurface {
	svg: Element,
	lines: Vec<Element>,
	circles: Vec<Element>,
	tooltip: HtmlElement,
}

fn svg_element(document: &Document, tag: &str) -> Result<Element> {
	Ok(document.create_element_ns(Some(SVG_NS), tag)?)
}

impl SvgSurface {
	/// Create the `<svg>` root, one line per link, one circle per node and
	/// the tooltip overlay, then draw `scene` once. Nothing is attached to the
	/// document yet.
	pub fn build(document: &Document, scene: &Scene, config: &ViewConfig) -> Result<Self> {
		let vp = scene.viewport;
		let (min_x, min_y, w, h) = vp.view_box();

		let svg = svg_element(document, "svg")?;
		svg.set_id(&scene.surface_id);
		svg.set_attribute("width", &vp.width.to_string())?;
		svg.set_attribute("height", &vp.height.to_string())?;
		svg.set_attribute("viewBox", &format!("{} {} {} {}", min_x, min_y, w, h))?;
		svg.set_attribute("style", "display: block; max-width: 100%; height: auto;")?;

		let link_group = svg_element(document, "g")?;
		link_group.set_attribute("stroke", &config.link_stroke)?;
		link_group.set_attribute("stroke-opacity", "0.6")?;
		svg.append_child(&link_group)?;
		let lines = scene
			.lines
			.iter()
			.map(|line| -> Result<Element> {
				let el = svg_element(document, "line")?;
				el.set_attribute("data-link", &line.link_id)?;
				el.set_attribute("stroke-width", &config.link_stroke_width.to_string())?;
				link_group.append_child(&el)?;
				Ok(el)
			})
			.collect::<Result<Vec<_>>>()?;

		let node_group = svg_element(document, "g")?;
		node_group.set_attribute("stroke", "#fff")?;
		node_group.set_attribute("stroke-width", "1.5")?;
		svg.append_child(&node_group)?;
		let circles = scene
			.circles
			.iter()
			.map(|circle| -> Result<Element> {
				let el = svg_element(document, "circle")?;
				el.set_attribute("data-node", &circle.node_id)?;
				el.set_attribute("r", &circle.radius.to_string())?;
				el.set_attribute("fill", &circle.fill)?;
				el.set_attribute("style", "cursor: pointer; touch-action: none;")?;
				node_group.append_child(&el)?;
				Ok(el)
			})
			.collect::<Result<Vec<_>>>()?;

		let tooltip: HtmlElement = document
			.create_element("div")?
			.dyn_into()
			.map_err(|_| GraphError::dom("tooltip element is not an HtmlElement"))?;
		tooltip.set_id(&scene.tooltip.element_id);
		tooltip.set_class_name(&config.tooltip_class);
		let style = tooltip.style();
		style.set_property("position", "absolute")?;
		style.set_property("pointer-events", "none")?;

		let surface = Self {
			svg,
			lines,
			circles,
			tooltip,
		};
		surface.render(scene)?;
		Ok(surface)
	}

	/// The `<svg>` root.
	pub fn svg(&self) -> &Element {
		&self.svg
	}

	/// The tooltip overlay.
	pub fn tooltip(&self) -> &HtmlElement {
		&self.tooltip
	}

	/// Node circles, in dataset order.
	pub fn circles(&self) -> &[Element] {
		&self.circles
	}

	/// Write line endpoints and circle centers.
	pub fn render_positions(&self, scene: &Scene) -> Result<()> {
		for (el, line) in self.lines.iter().zip(&scene.lines) {
			el.set_attribute("x1", &line.from.x.to_string())?;
			el.set_attribute("y1", &line.from.y.to_string())?;
			el.set_attribute("x2", &line.to.x.to_string())?;
			el.set_attribute("y2", &line.to.y.to_string())?;
		}
		for (el, circle) in self.circles.iter().zip(&scene.circles) {
			el.set_attribute("cx", &circle.center.x.to_string())?;
			el.set_attribute("cy", &circle.center.y.to_string())?;
		}
		Ok(())
	}

	/// Write tooltip placement, visibility and content.
	pub fn render_tooltip(&self, scene: &Scene) -> Result<()> {
		let tip = &scene.tooltip;
		let style = self.tooltip.style();
		style.set_property("left", &format!("{}px", tip.left))?;
		style.set_property("top", &format!("{}px", tip.top))?;
		style.set_property("opacity", &tip.opacity.to_string())?;
		style.set_property("visibility", if tip.visible { "visible" } else { "hidden" })?;
		if self.tooltip.inner_html() != tip.content {
			self.tooltip.set_inner_html(&tip.content);
		}
		Ok(())
	}

	/// Write the whole scene.
	pub fn render(&self, scene: &Scene) -> Result<()> {
		self.render_positions(scene)?;
		self.render_tooltip(scene)
	}

	/// Detach the SVG root and tooltip from the document.
	pub fn remove(&self) {
		self.svg.remove();
		self.tooltip.remove();
	}
}
