//! Per-node hover and drag state machine.
//!
//! Each node is `Idle`, `Hovered` or `Dragging`. Hover transitions drive the
//! tooltip model; drag transitions pin nodes in the layout engine and manage
//! its energy. Concurrent drags (multi-touch) are reference counted: the
//! first drag to start heats the simulation and the last one to end lets it
//! cool.

use log::debug;

use super::layout::{LayoutEngine, NodePin, Point};
use super::scene::Tooltip;

/// Interaction state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionState {
	/// Neither hovered nor dragged.
	#[default]
	Idle,
	/// The pointer is over the node.
	Hovered,
	/// The node is pinned under a pointer.
	Dragging,
}

/// Hover and drag bookkeeping for every node of one view.
#[derive(Clone, Debug)]
pub struct InteractionController {
	states: Vec<InteractionState>,
	/// Node whose content the tooltip currently shows.
	hovered: Option<usize>,
	active_drags: usize,
	node_radius: f64,
	drag_alpha_target: f64,
}

impl InteractionController {
	/// All nodes start `Idle`. The tooltip is offset by `node_radius` from the pointer.
	pub fn new(node_count: usize, node_radius: f64, drag_alpha_target: f64) -> Self {
		Self {
			states: vec![InteractionState::Idle; node_count],
			hovered: None,
			active_drags: 0,
			node_radius,
			drag_alpha_target,
		}
	}

	/// Current state of `node`.
	pub fn state(&self, node: usize) -> InteractionState {
		self.states[node]
	}

	/// Node whose content the tooltip shows, if any.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Number of nodes currently dragged.
	pub fn active_drags(&self) -> usize {
		self.active_drags
	}

	fn tooltip_anchor(&self, pointer: Point) -> Point {
		Point::new(pointer.x + self.node_radius, pointer.y + self.node_radius)
	}

	/// Pointer entered `node`. `pointer` is relative to the drawing surface.
	pub fn pointer_enter(&mut self, node: usize, pointer: Point, content: &str, tooltip: &mut Tooltip) {
		if let Some(prev) = self.hovered.filter(|&prev| prev != node) {
			if self.states[prev] == InteractionState::Hovered {
				self.states[prev] = InteractionState::Idle;
			}
		}
		self.hovered = Some(node);
		if self.states[node] == InteractionState::Idle {
			self.states[node] = InteractionState::Hovered;
		}
		tooltip.show(self.tooltip_anchor(pointer), content);
	}

	/// Follow the pointer while over `node`. Content is left alone.
	pub fn pointer_move(&mut self, node: usize, pointer: Point, tooltip: &mut Tooltip) {
		if self.hovered == Some(node) {
			tooltip.move_to(self.tooltip_anchor(pointer));
		}
	}

	/// Pointer left `node`. Hides the tooltip only if it shows `node`.
	pub fn pointer_leave(&mut self, node: usize, tooltip: &mut Tooltip) {
		if self.hovered == Some(node) {
			self.hovered = None;
			tooltip.hide();
		}
		if self.states[node] == InteractionState::Hovered {
			self.states[node] = InteractionState::Idle;
		}
	}

	/// Pin `node` where it is. The first active drag heats the engine.
	pub fn drag_start(&mut self, node: usize, engine: &mut dyn LayoutEngine) {
		if self.states[node] == InteractionState::Dragging {
			return;
		}
		if self.active_drags == 0 {
			engine.set_alpha_target(self.drag_alpha_target);
			engine.restart();
		}
		self.active_drags += 1;
		self.states[node] = InteractionState::Dragging;
		let at = engine.position(node);
		engine.set_pin(node, NodePin::PinnedAt(at));
		debug!(
			"producoes-graph: drag start on node {} ({} active)",
			node, self.active_drags
		);
	}

	/// `at` is in simulation space.
	pub fn drag_move(&mut self, node: usize, at: Point, engine: &mut dyn LayoutEngine) {
		if self.states[node] == InteractionState::Dragging {
			engine.set_pin(node, NodePin::PinnedAt(at));
		}
	}

	/// Release `node`. The last active drag lets the engine cool.
	pub fn drag_end(&mut self, node: usize, engine: &mut dyn LayoutEngine) {
		if self.states[node] != InteractionState::Dragging {
			return;
		}
		self.active_drags -= 1;
		if self.active_drags == 0 {
			engine.set_alpha_target(0.0);
		}
		engine.set_pin(node, NodePin::Free);
		self.states[node] = InteractionState::Idle;
		debug!(
			"producoes-graph: drag end on node {} ({} active)",
			node, self.active_drags
		);
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// Engine double whose positions are set directly by the test.
	#[derive(Debug, Default)]
	pub(crate) struct ScriptedLayout {
		pub positions: Vec<Point>,
		pub pins: Vec<NodePin>,
		pub alpha: f64,
		pub alpha_target: f64,
		pub running: bool,
		pub restarts: usize,
		pub stops: usize,
		pub ticks: usize,
	}

	impl ScriptedLayout {
		pub fn new(n: usize) -> Self {
			Self {
				positions: (0..n).map(|i| Point::new(i as f64, -(i as f64))).collect(),
				pins: vec![NodePin::Free; n],
				alpha: 1.0,
				running: true,
				..Default::default()
			}
		}
	}

	impl LayoutEngine for ScriptedLayout {
		fn tick(&mut self) -> bool {
			if !self.running {
				return false;
			}
			self.ticks += 1;
			for (p, pin) in self.positions.iter_mut().zip(&self.pins) {
				if let NodePin::PinnedAt(at) = pin {
					*p = *at;
				}
			}
			true
		}
		fn position(&self, node: usize) -> Point {
			self.positions[node]
		}
		fn pin(&self, node: usize) -> NodePin {
			self.pins[node]
		}
		fn set_pin(&mut self, node: usize, pin: NodePin) {
			self.pins[node] = pin;
		}
		fn alpha(&self) -> f64 {
			self.alpha
		}
		fn alpha_target(&self) -> f64 {
			self.alpha_target
		}
		fn set_alpha_target(&mut self, target: f64) {
			self.alpha_target = target;
		}
		fn restart(&mut self) {
			self.restarts += 1;
			self.running = true;
		}
		fn stop(&mut self) {
			self.stops += 1;
			self.running = false;
		}
		fn is_running(&self) -> bool {
			self.running
		}
	}

	fn controller(n: usize) -> InteractionController {
		InteractionController::new(n, 9.0, 0.3)
	}

	#[test]
	fn enter_shows_tooltip_offset_by_radius() {
		let mut c = controller(2);
		let mut tip = Tooltip::hidden("t".into());
		c.pointer_enter(0, Point::new(100.0, 50.0), "Artigo", &mut tip);
		assert_eq!(c.state(0), InteractionState::Hovered);
		assert_eq!((tip.left, tip.top), (109.0, 59.0));
		assert!(tip.visible);
		assert_eq!(tip.opacity, 1.0);
		assert_eq!(tip.content, "Artigo");
	}

	#[test]
	fn moves_reposition_without_touching_content() {
		let mut c = controller(1);
		let mut tip = Tooltip::hidden("t".into());
		c.pointer_enter(0, Point::new(0.0, 0.0), "Livro", &mut tip);
		for step in 1..5 {
			let p = Point::new(step as f64 * 3.0, step as f64);
			c.pointer_move(0, p, &mut tip);
			assert_eq!(tip.content, "Livro");
			assert_eq!((tip.left, tip.top), (p.x + 9.0, p.y + 9.0));
			assert!(tip.visible);
		}
	}

	#[test]
	fn entering_another_node_swaps_content() {
		let mut c = controller(2);
		let mut tip = Tooltip::hidden("t".into());
		c.pointer_enter(0, Point::new(0.0, 0.0), "first", &mut tip);
		c.pointer_enter(1, Point::new(10.0, 10.0), "second", &mut tip);
		assert_eq!(tip.content, "second");
		assert_eq!(c.state(0), InteractionState::Idle);
		assert_eq!(c.state(1), InteractionState::Hovered);

		// A late leave from the first node must not hide the second's tooltip.
		c.pointer_leave(0, &mut tip);
		assert!(tip.visible);
		assert_eq!(c.hovered(), Some(1));
	}

	#[test]
	fn move_over_unhovered_node_is_ignored() {
		let mut c = controller(2);
		let mut tip = Tooltip::hidden("t".into());
		c.pointer_move(1, Point::new(3.0, 3.0), &mut tip);
		assert!(!tip.visible);
		assert_eq!((tip.left, tip.top), (0.0, 0.0));
	}

	#[test]
	fn leave_hides_tooltip() {
		let mut c = controller(1);
		let mut tip = Tooltip::hidden("t".into());
		c.pointer_enter(0, Point::new(0.0, 0.0), "x", &mut tip);
		c.pointer_leave(0, &mut tip);
		assert_eq!(c.state(0), InteractionState::Idle);
		assert!(!tip.visible);
		assert_eq!(tip.opacity, 0.0);
	}

	#[test]
	fn drag_round_trip_pins_and_releases() {
		let mut c = controller(3);
		let mut engine = ScriptedLayout::new(3);
		engine.positions[1] = Point::new(7.0, 8.0);

		c.drag_start(1, &mut engine);
		assert_eq!(c.state(1), InteractionState::Dragging);
		assert_eq!(engine.pin(1), NodePin::PinnedAt(Point::new(7.0, 8.0)));

		c.drag_move(1, Point::new(20.0, -5.0), &mut engine);
		assert_eq!(engine.pin(1), NodePin::PinnedAt(Point::new(20.0, -5.0)));
		c.drag_move(1, Point::new(21.0, -6.0), &mut engine);
		assert_eq!(engine.pin(1), NodePin::PinnedAt(Point::new(21.0, -6.0)));

		c.drag_end(1, &mut engine);
		assert_eq!(engine.pin(1), NodePin::Free);
		assert_eq!(c.state(1), InteractionState::Idle);
	}

	#[test]
	fn drag_heats_and_cools_simulation() {
		let mut c = controller(1);
		let mut engine = ScriptedLayout::new(1);
		engine.running = false;

		c.drag_start(0, &mut engine);
		assert_eq!(engine.alpha_target, 0.3);
		assert!(engine.running);
		assert_eq!(engine.restarts, 1);

		c.drag_end(0, &mut engine);
		assert_eq!(engine.alpha_target, 0.0);
	}

	#[test]
	fn concurrent_drags_are_reference_counted() {
		let mut c = controller(2);
		let mut engine = ScriptedLayout::new(2);

		c.drag_start(0, &mut engine);
		c.drag_start(1, &mut engine);
		assert_eq!(c.active_drags(), 2);
		assert_eq!(engine.restarts, 1);

		c.drag_end(0, &mut engine);
		assert_eq!(engine.alpha_target, 0.3);
		assert_eq!(engine.pin(0), NodePin::Free);
		assert!(matches!(engine.pin(1), NodePin::PinnedAt(_)));

		c.drag_end(1, &mut engine);
		assert_eq!(engine.alpha_target, 0.0);
		assert_eq!(c.active_drags(), 0);
	}

	#[test]
	fn stray_drag_events_are_ignored() {
		let mut c = controller(1);
		let mut engine = ScriptedLayout::new(1);
		c.drag_move(0, Point::new(1.0, 1.0), &mut engine);
		c.drag_end(0, &mut engine);
		assert_eq!(engine.pin(0), NodePin::Free);
		assert_eq!(c.active_drags(), 0);

		c.drag_start(0, &mut engine);
		c.drag_start(0, &mut engine);
		assert_eq!(c.active_drags(), 1);
	}

	#[test]
	fn hover_during_drag_keeps_dragging() {
		let mut c = controller(1);
		let mut engine = ScriptedLayout::new(1);
		let mut tip = Tooltip::hidden("t".into());
		c.drag_start(0, &mut engine);
		c.pointer_enter(0, Point::new(1.0, 1.0), "x", &mut tip);
		assert_eq!(c.state(0), InteractionState::Dragging);
		c.pointer_leave(0, &mut tip);
		assert_eq!(c.state(0), InteractionState::Dragging);
		assert!(!tip.visible);
	}
}
