use std::collections::{BTreeSet, HashMap};

use log::debug;

use super::filter::KeywordFilter;
use super::graph::{DiagramGraph, Edge, NodeIdx, Position};
use super::layout::{GridSpec, LayoutMode, Viewport, layout_targets};
use super::scale::{Metrics, scale_factor};
use super::types::NodeKind;

/// Seconds per full turn of an upcoming node.
pub const SPIN_PERIOD: f64 = 4.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
	pub grid: GridSpec,
	pub transition_secs: f64,
	pub drag_threshold: f64,
	pub reference_width: f64,
	pub thumb_size: f64,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			grid: GridSpec {
				margin: 0.15,
				stretch: 1.2,
			},
			transition_secs: 1.0,
			drag_threshold: 3.0,
			reference_width: 1920.0,
			thumb_size: 112.0,
		}
	}
}

/// What a click (a pointer-down/up that never crossed the drag threshold)
/// asks the page to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeAction {
	OpenProject(String),
	OpenUpcoming(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
	pub node: NodeIdx,
	pub offset_x: f64,
	pub offset_y: f64,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeIdx>,
	pub connected: BTreeSet<NodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<NodeIdx>,
	pub prev_connected: BTreeSet<NodeIdx>,
	delay_t: f64,
}

#[derive(Clone, Debug)]
struct Transition {
	elapsed: f64,
	duration: f64,
	from: HashMap<NodeIdx, Position>,
}

impl Transition {
	fn progress(&self) -> f64 {
		ease_out_cubic((self.elapsed / self.duration).clamp(0.0, 1.0))
	}
}

pub struct DiagramState {
	pub graph: DiagramGraph,
	pub viewport: Viewport,
	pub filter: KeywordFilter,
	pub layout: LayoutMode,
	pub hover: HoverState,
	pub drag: Option<DragState>,
	pub spin_time: f64,
	settings: Settings,
	z_order: Vec<u64>,
	z_counter: u64,
	transition: Option<Transition>,
}

impl DiagramState {
	pub fn new(graph: DiagramGraph, width: f64, height: f64, settings: Settings) -> Self {
		let z_order = vec![0; graph.len()];
		Self {
			graph,
			viewport: Viewport::new(width, height),
			filter: KeywordFilter::default(),
			layout: LayoutMode::Free,
			hover: HoverState::default(),
			drag: None,
			spin_time: 0.0,
			settings,
			z_order,
			z_counter: 0,
			transition: None,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	pub fn metrics(&self) -> Metrics {
		Metrics::new(
			scale_factor(self.viewport.width, self.settings.reference_width),
			self.settings.thumb_size,
		)
	}

	/// Where the node is drawn right now; differs from `pos` only while a
	/// layout switch is tweening.
	pub fn display_position(&self, idx: NodeIdx) -> Position {
		let pos = self.graph.nodes[idx].pos;
		match &self.transition {
			Some(t) => match t.from.get(&idx) {
				Some(from) => from.lerp(pos, t.progress()),
				None => pos,
			},
			None => pos,
		}
	}

	pub fn pixel_position(&self, idx: NodeIdx) -> (f64, f64) {
		self.viewport.to_pixels(self.display_position(idx))
	}

	pub fn is_visible(&self, idx: NodeIdx) -> bool {
		self.filter.is_visible(&self.graph.nodes[idx])
	}

	pub fn is_edge_visible(&self, edge: &Edge) -> bool {
		self.is_visible(edge.source) && self.is_visible(edge.target)
	}

	pub fn visible_edges(&self) -> impl Iterator<Item = &Edge> {
		self.graph.edges.iter().filter(|e| self.is_edge_visible(e))
	}

	pub fn z(&self, idx: NodeIdx) -> u64 {
		self.z_order[idx]
	}

	/// Puts the node above every other node.
	pub fn raise(&mut self, idx: NodeIdx) {
		self.z_counter += 1;
		self.z_order[idx] = self.z_counter;
	}

	/// Visible nodes, bottom-most first.
	pub fn draw_order(&self) -> Vec<NodeIdx> {
		let mut order: Vec<NodeIdx> = (0..self.graph.len())
			.filter(|&i| self.is_visible(i))
			.collect();
		order.sort_by_key(|&i| self.z_order[i]);
		order
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<NodeIdx> {
		let metrics = self.metrics();
		self.draw_order().into_iter().rev().find(|&idx| {
			let node = &self.graph.nodes[idx];
			let (cx, cy) = self.pixel_position(idx);
			metrics.extent(node.kind, &node.label).contains(x - cx, y - cy)
		})
	}

	pub fn set_hover(&mut self, node: Option<NodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_connected = std::mem::take(&mut self.hover.connected);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_connected.clear();
		}

		self.hover.node = node;
		self.hover.connected.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.connected = self.graph.connected(idx);
		}
	}

	pub fn is_highlighted(&self, idx: NodeIdx) -> bool {
		self.hover.connected.contains(&idx) || self.hover.prev_connected.contains(&idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn is_edge_highlighted(&self, edge: &Edge) -> bool {
		self.hover
			.node
			.or(self.hover.prev_node)
			.is_some_and(|h| edge.touches(h))
	}

	/// Eased hover strength in `0.0..=1.0`.
	pub fn highlight_level(&self) -> f64 {
		ease_out_cubic(self.hover.highlight_t)
	}

	/// Hovered project whose years are shown as a tooltip.
	pub fn tooltip_node(&self) -> Option<NodeIdx> {
		if self.layout != LayoutMode::YearGrid {
			return None;
		}
		self.hover.node.filter(|&idx| self.graph.nodes[idx].is_project())
	}

	/// Starts a gesture on the node under the pointer, if any, and raises it.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<NodeIdx> {
		let idx = self.node_at_position(x, y)?;
		self.raise(idx);
		let (cx, cy) = self.pixel_position(idx);
		self.drag = Some(DragState {
			node: idx,
			offset_x: x - cx,
			offset_y: y - cy,
			start_x: x,
			start_y: y,
			moved: false,
		});
		Some(idx)
	}

	/// Moves the dragged node once the pointer has travelled at least the
	/// drag threshold from where it went down. Below that, nothing moves.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let threshold = self.settings.drag_threshold;
		let Some(drag) = self.drag.as_mut() else {
			return;
		};
		if !drag.moved {
			let travelled = (x - drag.start_x).abs().max((y - drag.start_y).abs());
			if travelled < threshold {
				return;
			}
			drag.moved = true;
		}
		let (idx, ox, oy) = (drag.node, drag.offset_x, drag.offset_y);

		self.graph.nodes[idx].pos = self.viewport.to_normalized(x - ox, y - oy);
		if let Some(t) = self.transition.as_mut() {
			t.from.remove(&idx);
		}
	}

	/// Ends the gesture. A gesture that never became a drag is a click.
	pub fn pointer_up(&mut self) -> Option<NodeAction> {
		let drag = self.drag.take()?;
		if drag.moved {
			return None;
		}
		let node = &self.graph.nodes[drag.node];
		let action = match node.kind {
			NodeKind::Project => Some(NodeAction::OpenProject(node.id.clone())),
			NodeKind::Upcoming => Some(NodeAction::OpenUpcoming(node.id.clone())),
			NodeKind::Media => None,
		};
		debug!("click on {:?} -> {:?}", node.id, action);
		action
	}

	/// Ends the gesture and refreshes hover from the release point. `None`
	/// means the pointer was released off the canvas.
	pub fn release(&mut self, point: Option<(f64, f64)>) -> Option<NodeAction> {
		let action = self.pointer_up();
		let hovered = point.and_then(|(x, y)| self.node_at_position(x, y));
		self.set_hover(hovered);
		action
	}

	pub fn cancel_drag(&mut self) {
		self.drag = None;
	}

	/// Moves project nodes to the layout of `mode`. Re-applying the current
	/// mode recomputes the same targets and does not animate.
	pub fn set_layout_mode(&mut self, mode: LayoutMode, animate: bool) {
		let targets = layout_targets(&self.graph, mode, self.settings.grid);
		if animate && mode != self.layout && self.settings.transition_secs > 0.0 {
			let from = targets
				.iter()
				.map(|&(idx, _)| (idx, self.display_position(idx)))
				.collect();
			self.transition = Some(Transition {
				elapsed: 0.0,
				duration: self.settings.transition_secs,
				from,
			});
		}
		for (idx, pos) in targets {
			self.graph.nodes[idx].pos = pos;
		}
		if mode != self.layout {
			debug!("layout {:?} -> {:?}", self.layout, mode);
		}
		self.layout = mode;
	}

	pub fn is_animating(&self) -> bool {
		self.transition.is_some()
	}

	pub fn set_filter(&mut self, filter: KeywordFilter) {
		self.filter = filter;
		if self.hover.node.is_some_and(|idx| !self.is_visible(idx)) {
			self.set_hover(None);
		}
		if self.drag.as_ref().is_some_and(|d| !self.is_visible(d.node)) {
			self.cancel_drag();
		}
	}

	pub fn tick(&mut self, dt: f64) {
		self.spin_time = (self.spin_time + dt) % SPIN_PERIOD;

		if let Some(t) = self.transition.as_mut() {
			t.elapsed += dt;
			if t.elapsed >= t.duration {
				self.transition = None;
			}
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.05, 9.0)
		} else {
			(0.0, 0.0, 7.0)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_connected.clear();
			}
		}
	}

	/// Rotation of upcoming nodes, in radians.
	pub fn spin_angle(&self) -> f64 {
		self.spin_time / SPIN_PERIOD * std::f64::consts::TAU
	}
}

/// Years in ascending order, comma separated.
pub fn year_caption(years: &BTreeSet<i32>) -> Option<String> {
	if years.is_empty() {
		return None;
	}
	Some(
		years
			.iter()
			.map(|y| y.to_string())
			.collect::<Vec<_>>()
			.join(", "),
	)
}
