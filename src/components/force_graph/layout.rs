//! Layout engine contract and the `force_graph`-backed simulation.
//!
//! The view only talks to a [`LayoutEngine`]: it steps it, reads positions,
//! pins nodes while they are dragged and raises or lowers the simulation
//! energy. [`ForceLayout`] implements that contract on top of
//! [`force_graph::ForceGraph`], adding the cooling schedule, pinning,
//! centering and collision the raw physics crate does not have.

use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::types::ResolvedLink;

/// A position in simulation space (origin at the center of the view).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal offset from the center.
	pub x: f64,
	/// Vertical offset from the center, growing downward.
	pub y: f64,
}

impl Point {
	/// Create a point from its coordinates.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Whether the engine may move a node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NodePin {
	/// Position is computed by the simulation.
	#[default]
	Free,
	/// Position is held fixed at the given point on every step.
	PinnedAt(Point),
}

/// What the graph view needs from a force simulation.
pub trait LayoutEngine {
	/// Advance one iteration. Returns `false` without doing anything when the
	/// engine is stopped or has come to rest.
	fn tick(&mut self) -> bool;
	/// Current position of the node at `node` (dataset order).
	fn position(&self, node: usize) -> Point;
	/// Current pin state of `node`.
	fn pin(&self, node: usize) -> NodePin;
	/// Pin or release `node`. Pinning moves it to the pin point at once.
	fn set_pin(&mut self, node: usize, pin: NodePin);
	/// Current simulation energy.
	fn alpha(&self) -> f64;
	/// Energy level alpha decays toward.
	fn alpha_target(&self) -> f64;
	/// Change the level alpha decays toward.
	fn set_alpha_target(&mut self, target: f64);
	/// Resume ticking without resetting alpha.
	fn restart(&mut self);
	/// Halt ticking until [`LayoutEngine::restart`] is called.
	fn stop(&mut self);
	/// Whether [`LayoutEngine::tick`] will do work.
	fn is_running(&self) -> bool;
}

/// Tuning constants for [`ForceLayout`].
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Pairwise repulsion between all nodes.
	pub charge: f32,
	/// Spring constant along links.
	pub spring: f32,
	/// Upper bound on the force applied to a single node per step.
	pub force_max: f32,
	/// Scales acceleration into velocity.
	pub node_speed: f32,
	/// Velocity retained between steps (0..1).
	pub damping: f32,
	/// Mass of every node, feeding the repulsion.
	pub node_mass: f32,
	/// Fraction of the free nodes' centroid offset removed each tick, scaled
	/// by alpha. Translates the layout without deforming it.
	pub center_strength: f64,
	/// Minimum center distance kept between free nodes is twice this.
	pub collide_radius: f64,
	/// Below this alpha the engine stops itself.
	pub alpha_min: f64,
	/// Fraction of the gap to `alpha_target` closed each tick.
	pub alpha_decay: f64,
	/// Integration step per tick, in seconds.
	pub time_step: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			charge: 150.0,
			spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping: 0.9,
			node_mass: 10.0,
			center_strength: 0.1,
			collide_radius: 9.0,
			alpha_min,
			// Cools from 1 to alpha_min in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			time_step: 0.016,
		}
	}
}

/// Force-directed layout over [`force_graph::ForceGraph`].
///
/// Node user data is the node's dataset index, so positions can be mapped
/// back without searching.
pub struct ForceLayout {
	graph: ForceGraph<usize, ()>,
	positions: Vec<Point>,
	pins: Vec<NodePin>,
	config: LayoutConfig,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

/// Phyllotaxis placement around the origin so no two nodes start coincident.
fn initial_position(i: usize) -> Point {
	const INITIAL_RADIUS: f64 = 10.0;
	let angle = PI * (3.0 - 5f64.sqrt());
	let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let a = i as f64 * angle;
	Point::new(r * a.cos(), r * a.sin())
}

/// Passes of the pairwise overlap resolution per tick.
const COLLIDE_ITERATIONS: usize = 4;

impl ForceLayout {
	/// Build a layout with `node_count` nodes spread around the origin.
	pub fn new(node_count: usize, links: &[ResolvedLink], config: LayoutConfig) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: config.charge,
			force_spring: config.spring,
			force_max: config.force_max,
			node_speed: config.node_speed,
			damping_factor: config.damping,
		});

		let mut indices = Vec::with_capacity(node_count);
		let mut positions = Vec::with_capacity(node_count);
		for i in 0..node_count {
			let p = initial_position(i);
			let idx = graph.add_node(NodeData {
				x: p.x as f32,
				y: p.y as f32,
				mass: config.node_mass,
				is_anchor: false,
				user_data: i,
			});
			indices.push(idx);
			positions.push(p);
		}

		for link in links {
			graph.add_edge(indices[link.source], indices[link.target], EdgeData::default());
		}

		Self {
			graph,
			positions,
			pins: vec![NodePin::Free; node_count],
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	/// Number of simulated nodes.
	pub fn node_count(&self) -> usize {
		self.positions.len()
	}

	fn apply_pins(&mut self) {
		let pins = &self.pins;
		self.graph.visit_nodes_mut(|node| match pins[node.data.user_data] {
			NodePin::PinnedAt(p) => {
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
				node.data.is_anchor = true;
			}
			NodePin::Free => node.data.is_anchor = false,
		});
	}

	fn read_positions(&mut self) {
		let positions = &mut self.positions;
		self.graph.visit_nodes(|node| {
			positions[node.data.user_data] = Point::new(node.x() as f64, node.y() as f64);
		});
	}

	fn write_positions(&mut self) {
		let positions = &self.positions;
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				let p = positions[node.data.user_data];
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
			}
		});
	}

	/// Shift free nodes so their centroid moves toward the origin.
	fn apply_centering(&mut self) {
		let free: Vec<usize> = (0..self.positions.len())
			.filter(|&i| self.pins[i] == NodePin::Free)
			.collect();
		if free.is_empty() {
			return;
		}
		let n = free.len() as f64;
		let (sx, sy) = free.iter().fold((0.0, 0.0), |(sx, sy), &i| {
			(sx + self.positions[i].x, sy + self.positions[i].y)
		});
		let pull = self.config.center_strength * self.alpha;
		let (dx, dy) = (sx / n * pull, sy / n * pull);
		for i in free {
			self.positions[i].x -= dx;
			self.positions[i].y -= dy;
		}
	}

	/// Push overlapping pairs apart. A pinned node never moves; its free
	/// partner takes the whole correction.
	fn apply_collisions(&mut self) {
		let min_dist = 2.0 * self.config.collide_radius;
		if min_dist <= 0.0 {
			return;
		}
		let n = self.positions.len();
		for _ in 0..COLLIDE_ITERATIONS {
			let mut moved = false;
			for i in 0..n {
				for j in (i + 1)..n {
					let free_i = self.pins[i] == NodePin::Free;
					let free_j = self.pins[j] == NodePin::Free;
					if !free_i && !free_j {
						continue;
					}
					let (a, b) = (self.positions[i], self.positions[j]);
					let (dx, dy) = (b.x - a.x, b.y - a.y);
					let dist = (dx * dx + dy * dy).sqrt();
					if dist >= min_dist {
						continue;
					}
					let (ux, uy) = if dist > 0.0 {
						(dx / dist, dy / dist)
					} else {
						// Coincident: separate along a direction derived from the pair.
						let angle = (i * 31 + j) as f64;
						(angle.cos(), angle.sin())
					};
					let gap = min_dist + 0.01 - dist;
					let (px, py) = (ux * gap, uy * gap);
					match (free_i, free_j) {
						(true, true) => {
							self.positions[i].x -= px / 2.0;
							self.positions[i].y -= py / 2.0;
							self.positions[j].x += px / 2.0;
							self.positions[j].y += py / 2.0;
						}
						(true, false) => {
							self.positions[i].x -= px;
							self.positions[i].y -= py;
						}
						_ => {
							self.positions[j].x += px;
							self.positions[j].y += py;
						}
					}
					moved = true;
				}
			}
			if !moved {
				break;
			}
		}
	}
}

impl LayoutEngine for ForceLayout {
	fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
		self.apply_pins();
		self.graph.update(self.config.time_step);
		self.read_positions();
		self.apply_centering();
		self.apply_collisions();
		self.write_positions();

		if self.alpha < self.config.alpha_min {
			self.running = false;
			debug!("producoes-graph: layout at rest (alpha {:.4})", self.alpha);
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
		if let NodePin::PinnedAt(p) = pin {
			self.positions[node] = p;
		}
		self.apply_pins();
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
		self.running = true;
	}

	fn stop(&mut self) {
		self.running = false;
	}

	fn is_running(&self) -> bool {
		self.running
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chain(n: usize) -> ForceLayout {
		let links: Vec<ResolvedLink> = (1..n)
			.map(|i| ResolvedLink {
				source: i - 1,
				target: i,
			})
			.collect();
		ForceLayout::new(n, &links, LayoutConfig::default())
	}

	#[test]
	fn initial_positions_are_distinct() {
		let layout = chain(20);
		for i in 0..20 {
			for j in (i + 1)..20 {
				assert_ne!(layout.position(i), layout.position(j));
			}
		}
	}

	#[test]
	fn cools_to_rest_without_target() {
		let mut layout = chain(5);
		let mut ticks = 0;
		while layout.tick() {
			ticks += 1;
			assert!(ticks < 1000, "layout never came to rest");
		}
		assert!((295..=305).contains(&ticks), "took {} ticks", ticks);
		assert!(!layout.is_running());
		assert!(layout.alpha() < LayoutConfig::default().alpha_min);
	}

	#[test]
	fn nonzero_target_keeps_it_running() {
		let mut layout = chain(3);
		while layout.tick() {}
		layout.set_alpha_target(0.3);
		layout.restart();
		for _ in 0..500 {
			assert!(layout.tick());
		}
		assert!((layout.alpha() - 0.3).abs() < 0.01);
	}

	#[test]
	fn pinned_node_holds_position() {
		let mut layout = chain(4);
		let pin = Point::new(42.0, -17.0);
		layout.set_pin(2, NodePin::PinnedAt(pin));
		assert_eq!(layout.position(2), pin);
		for _ in 0..50 {
			layout.tick();
			assert_eq!(layout.position(2), Point::new(42.0, -17.0));
		}
	}

	#[test]
	fn released_node_moves_again() {
		let mut layout = chain(4);
		let pin = Point::new(200.0, 200.0);
		layout.set_pin(1, NodePin::PinnedAt(pin));
		layout.tick();
		layout.set_pin(1, NodePin::Free);
		assert_eq!(layout.pin(1), NodePin::Free);
		for _ in 0..10 {
			layout.tick();
		}
		assert_ne!(layout.position(1), pin);
	}

	#[test]
	fn stop_halts_ticks() {
		let mut layout = chain(3);
		layout.stop();
		let before = layout.position(0);
		assert!(!layout.tick());
		assert_eq!(layout.position(0), before);
	}

	#[test]
	fn empty_layout_ticks() {
		let mut layout = ForceLayout::new(0, &[], LayoutConfig::default());
		assert!(layout.tick());
		assert_eq!(layout.node_count(), 0);
	}

	fn min_pairwise_distance(layout: &ForceLayout) -> f64 {
		let n = layout.node_count();
		let mut min = f64::INFINITY;
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (layout.position(i), layout.position(j));
				min = min.min(((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt());
			}
		}
		min
	}

	#[test]
	fn nodes_at_rest_do_not_overlap() {
		for n in [2, 10, 30] {
			let mut layout = chain(n);
			while layout.tick() {}
			let radius = LayoutConfig::default().collide_radius;
			let min = min_pairwise_distance(&layout);
			assert!(min >= 2.0 * radius, "n={}: min distance {}", n, min);
		}
	}

	#[test]
	fn centering_keeps_the_shape() {
		let mut layout = chain(10);
		while layout.tick() {}
		let before = min_pairwise_distance(&layout);
		let offset = Point::new(500.0, -300.0);
		for i in 0..10 {
			let p = layout.position(i);
			layout.positions[i] = Point::new(p.x + offset.x, p.y + offset.y);
		}
		layout.apply_centering();
		assert!((min_pairwise_distance(&layout) - before).abs() < 1e-9);
	}

	#[test]
	fn collision_moves_only_the_free_node() {
		let mut layout = ForceLayout::new(2, &[], LayoutConfig::default());
		let pin = Point::new(0.0, 0.0);
		layout.set_pin(0, NodePin::PinnedAt(pin));
		layout.positions[1] = Point::new(3.0, 0.0);
		layout.apply_collisions();
		assert_eq!(layout.position(0), pin);
		assert!(layout.position(1).x >= 18.0);
	}

	#[test]
	fn coincident_nodes_are_separated() {
		let mut layout = ForceLayout::new(2, &[], LayoutConfig::default());
		layout.positions = vec![Point::new(5.0, 5.0); 2];
		layout.apply_collisions();
		assert!(min_pairwise_distance(&layout) >= 18.0);
	}

	#[test]
	fn positions_stay_finite() {
		let mut layout = chain(30);
		for _ in 0..200 {
			layout.tick();
		}
		for i in 0..30 {
			let p = layout.position(i);
			assert!(p.x.is_finite() && p.y.is_finite());
		}
	}
}
