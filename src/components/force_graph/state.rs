//! Graph view state: layout engine, retained scene and interaction tracking.
//!
//! A [`GraphView`] is created once per mounted graph and mutated by the
//! animation loop (ticks) and by pointer events. It holds no DOM handles, so
//! the whole lifecycle can be driven from tests with a scripted engine.

use log::{info, warn};

use super::config::ViewConfig;
use super::error::Result;
use super::interaction::InteractionController;
use super::layout::{ForceLayout, LayoutConfig, LayoutEngine, Point};
use super::scene::{CirclePrimitive, ElementIds, LinePrimitive, Scene, Tooltip, Viewport};
use super::types::{ClickHandler, GraphData, GraphNode, ResolvedLink};

/// One mounted graph: its nodes, simulation, scene and interaction state.
pub struct GraphView<L> {
	nodes: Vec<GraphNode>,
	engine: L,
	scene: Scene,
	controller: InteractionController,
	config: ViewConfig,
	destroyed: bool,
}

impl GraphView<ForceLayout> {
	/// Build a view backed by the `force_graph` simulation.
	pub fn new(data: GraphData, viewport: Viewport, config: ViewConfig, ids: &ElementIds) -> Result<Self> {
		let collide_radius = config.node_radius;
		Self::with_engine(data, viewport, config, ids, |count, links, layout| {
			ForceLayout::new(
				count,
				links,
				LayoutConfig {
					collide_radius,
					..layout.clone()
				},
			)
		})
	}
}

impl<L: LayoutEngine> GraphView<L> {
	/// Validate `data`, then build the engine with `make_engine` and the
	/// scene primitives.
	pub fn with_engine(
		data: GraphData,
		viewport: Viewport,
		config: ViewConfig,
		ids: &ElementIds,
		make_engine: impl FnOnce(usize, &[ResolvedLink], &LayoutConfig) -> L,
	) -> Result<Self> {
		let links = data.resolve()?;
		let engine = make_engine(data.nodes.len(), &links, &config.layout);

		let lines = data
			.links
			.iter()
			.zip(&links)
			.map(|(link, resolved)| LinePrimitive {
				link_id: link.id.clone(),
				source: resolved.source,
				target: resolved.target,
				from: Point::default(),
				to: Point::default(),
			})
			.collect();
		let circles = data
			.nodes
			.iter()
			.map(|node| CirclePrimitive {
				node_id: node.id.clone(),
				center: Point::default(),
				radius: config.node_radius,
				fill: node
					.color
					.clone()
					.unwrap_or_else(|| config.fallback_color.clone()),
			})
			.collect();

		let scene = Scene {
			viewport,
			lines,
			circles,
			tooltip: Tooltip::hidden(ids.next("tooltip")),
			surface_id: ids.next("surface"),
		};
		info!(
			"producoes-graph: view with {} nodes, {} links ({}x{})",
			data.nodes.len(),
			links.len(),
			viewport.width,
			viewport.height
		);

		let mut view = Self {
			controller: InteractionController::new(
				data.nodes.len(),
				config.node_radius,
				config.drag_alpha_target,
			),
			nodes: data.nodes,
			engine,
			scene,
			config,
			destroyed: false,
		};
		view.sync_positions();
		Ok(view)
	}

	/// The retained primitives and tooltip model.
	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// The layout engine.
	pub fn engine(&self) -> &L {
		&self.engine
	}

	/// Mutable access to the engine, for tuning or tests.
	pub fn engine_mut(&mut self) -> &mut L {
		&mut self.engine
	}

	/// Hover and drag state.
	pub fn controller(&self) -> &InteractionController {
		&self.controller
	}

	/// Number of nodes in the dataset.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Whether [`GraphView::destroy`] has run.
	pub fn is_destroyed(&self) -> bool {
		self.destroyed
	}

	/// Step the engine once and rebind the scene. Returns whether a tick ran.
	pub fn tick(&mut self) -> bool {
		if self.destroyed {
			return false;
		}
		let ticked = self.engine.tick();
		if ticked {
			self.sync_positions();
		}
		ticked
	}

	/// Copy current engine positions onto every line and circle.
	pub fn sync_positions(&mut self) {
		if self.destroyed {
			return;
		}
		let engine = &self.engine;
		for line in &mut self.scene.lines {
			line.from = engine.position(line.source);
			line.to = engine.position(line.target);
		}
		for (i, circle) in self.scene.circles.iter_mut().enumerate() {
			circle.center = engine.position(i);
		}
	}

	/// Stop the engine. All later ticks and events are ignored.
	pub fn destroy(&mut self) {
		if !self.destroyed {
			self.engine.stop();
			self.destroyed = true;
			info!("producoes-graph: view destroyed");
		}
	}

	fn accepts(&self, node: usize) -> bool {
		if self.destroyed {
			return false;
		}
		if node >= self.nodes.len() {
			warn!("producoes-graph: event for unknown node index {}", node);
			return false;
		}
		true
	}

	/// `pointer` is relative to the drawing surface's top-left corner.
	pub fn pointer_enter(&mut self, node: usize, pointer: Point) {
		if !self.accepts(node) {
			return;
		}
		let content = self.nodes[node]
			.tooltip
			.as_deref()
			.unwrap_or(&self.config.fallback_tooltip);
		self.controller
			.pointer_enter(node, pointer, content, &mut self.scene.tooltip);
	}

	/// Move the tooltip with the pointer while over `node`.
	pub fn pointer_move(&mut self, node: usize, pointer: Point) {
		if self.accepts(node) {
			self.controller
				.pointer_move(node, pointer, &mut self.scene.tooltip);
		}
	}

	/// Pointer left `node`.
	pub fn pointer_leave(&mut self, node: usize) {
		if self.accepts(node) {
			self.controller.pointer_leave(node, &mut self.scene.tooltip);
		}
	}

	/// Start dragging `node` from its current position.
	pub fn drag_start(&mut self, node: usize) {
		if self.accepts(node) {
			self.controller.drag_start(node, &mut self.engine);
			self.sync_positions();
		}
	}

	/// `pointer` is relative to the surface's top-left in viewBox units; converted to
	/// simulation space here.
	pub fn drag_move(&mut self, node: usize, pointer: Point) {
		if self.accepts(node) {
			let at = self.scene.viewport.to_simulation(pointer);
			self.controller.drag_move(node, at, &mut self.engine);
		}
	}

	/// Stop dragging `node` and release its pin.
	pub fn drag_end(&mut self, node: usize) {
		if self.accepts(node) {
			self.controller.drag_end(node, &mut self.engine);
		}
	}

	/// The click callback for `node`, if it has one.
	///
	/// Returned rather than invoked so the caller can release its borrow of
	/// the view first; callbacks are free to touch the view again.
	pub fn click(&self, node: usize) -> Option<ClickHandler> {
		if !self.accepts(node) {
			return None;
		}
		self.nodes[node].on_click.clone()
	}
}
