use std::collections::{BTreeSet, HashMap};

use log::{debug, warn};

use super::types::{NodeKind, ProjectDetail, RawEdge, RawNode};

pub type NodeIdx = usize;

/// A location as a fraction of the viewport, `0.0..=1.0` on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn lerp(self, to: Position, t: f64) -> Position {
		Position {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
		}
	}
}

#[derive(Clone, Debug)]
pub struct DiagramNode {
	pub id: String,
	pub kind: NodeKind,
	pub label: String,
	pub pos: Position,
	pub years: BTreeSet<i32>,
	pub keywords: BTreeSet<String>,
	pub media_refs: BTreeSet<String>,
}

impl DiagramNode {
	pub fn latest_year(&self) -> Option<i32> {
		self.years.last().copied()
	}

	pub fn earliest_year(&self) -> Option<i32> {
		self.years.first().copied()
	}

	pub fn is_project(&self) -> bool {
		self.kind == NodeKind::Project
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
	pub source: NodeIdx,
	pub target: NodeIdx,
}

impl Edge {
	pub fn touches(&self, idx: NodeIdx) -> bool {
		self.source == idx || self.target == idx
	}
}

/// The loaded node-link graph. Node identity and kind never change after
/// [`DiagramGraph::build`]; only `pos` is mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct DiagramGraph {
	pub nodes: Vec<DiagramNode>,
	pub edges: Vec<Edge>,
	baseline: Vec<Position>,
	neighbors: Vec<BTreeSet<NodeIdx>>,
	index: HashMap<String, NodeIdx>,
}

impl DiagramGraph {
	pub fn build(
		raw_nodes: Vec<RawNode>,
		raw_edges: Vec<RawEdge>,
		projects: &[ProjectDetail],
	) -> Self {
		let media_by_project: HashMap<&str, &[String]> = projects
			.iter()
			.map(|p| (p.id.as_str(), p.media.as_slice()))
			.collect();

		let mut graph = DiagramGraph::default();
		for raw in raw_nodes {
			if graph.index.contains_key(&raw.id) {
				warn!("duplicate node id {:?} ignored", raw.id);
				continue;
			}
			let media_refs = match raw.kind {
				NodeKind::Project => media_by_project
					.get(raw.id.as_str())
					.map(|refs| refs.iter().cloned().collect())
					.unwrap_or_default(),
				_ => BTreeSet::new(),
			};
			let pos = Position::new(raw.px, raw.py);
			graph.index.insert(raw.id.clone(), graph.nodes.len());
			graph.baseline.push(pos);
			graph.neighbors.push(BTreeSet::new());
			graph.nodes.push(DiagramNode {
				id: raw.id,
				kind: raw.kind,
				label: raw.label,
				pos,
				years: raw.years.into_iter().collect(),
				keywords: raw.keywords.into_iter().collect(),
				media_refs,
			});
		}

		for raw in raw_edges {
			let (Some(&source), Some(&target)) =
				(graph.index.get(&raw.source), graph.index.get(&raw.target))
			else {
				debug!("dropping dangling edge {} -> {}", raw.source, raw.target);
				continue;
			};
			graph.neighbors[source].insert(target);
			graph.neighbors[target].insert(source);
			graph.edges.push(Edge { source, target });
		}

		graph
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
		self.index.get(id).copied()
	}

	pub fn node(&self, id: &str) -> Option<&DiagramNode> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	/// Authored position captured at load time.
	pub fn baseline(&self, idx: NodeIdx) -> Position {
		self.baseline[idx]
	}

	pub fn neighbors(&self, idx: NodeIdx) -> &BTreeSet<NodeIdx> {
		&self.neighbors[idx]
	}

	/// The node itself plus every node one edge away.
	pub fn connected(&self, idx: NodeIdx) -> BTreeSet<NodeIdx> {
		let mut set = self.neighbors[idx].clone();
		set.insert(idx);
		set
	}

	/// All keywords used by any node, sorted.
	pub fn keywords(&self) -> Vec<String> {
		self.nodes
			.iter()
			.flat_map(|n| n.keywords.iter().cloned())
			.collect::<BTreeSet<_>>()
			.into_iter()
			.collect()
	}

	pub fn projects(&self) -> impl Iterator<Item = (NodeIdx, &DiagramNode)> {
		self.nodes.iter().enumerate().filter(|(_, n)| n.is_project())
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use serde_json::json;

	pub(crate) fn raw_node(id: &str, kind: &str, px: f64, py: f64) -> RawNode {
		serde_json::from_value(json!({
			"id": id, "type": kind, "label": id.to_uppercase(), "px": px, "py": py
		}))
		.unwrap()
	}

	pub(crate) fn raw_edge(source: &str, target: &str) -> RawEdge {
		RawEdge {
			source: source.into(),
			target: target.into(),
		}
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let graph = DiagramGraph::build(
			vec![raw_node("p1", "project", 0.5, 0.5), raw_node("m1", "media", 0.2, 0.2)],
			vec![raw_edge("p1", "m1"), raw_edge("p1", "ghost"), raw_edge("nobody", "m1")],
			&[],
		);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0], Edge { source: 0, target: 1 });
		assert!(graph.neighbors(0).contains(&1));
		assert_eq!(graph.neighbors(1).len(), 1);
	}

	#[test]
	fn connected_set_is_symmetric() {
		let graph = DiagramGraph::build(
			vec![
				raw_node("p1", "project", 0.1, 0.1),
				raw_node("p2", "project", 0.9, 0.9),
				raw_node("m1", "media", 0.5, 0.5),
			],
			vec![raw_edge("p1", "m1"), raw_edge("m1", "p2")],
			&[],
		);
		let m1 = graph.index_of("m1").unwrap();
		let p1 = graph.index_of("p1").unwrap();
		let p2 = graph.index_of("p2").unwrap();

		assert_eq!(graph.connected(m1), BTreeSet::from([p1, p2, m1]));
		assert_eq!(graph.connected(p1), BTreeSet::from([p1, m1]));
		assert!(!graph.connected(p1).contains(&p2));
	}

	#[test]
	fn project_media_merged_from_details() {
		let projects: Vec<ProjectDetail> = serde_json::from_value(json!([
			{ "id": "p1", "media": ["m1", "m2"] },
			{ "id": "m1", "media": ["m9"] }
		]))
		.unwrap();
		let graph = DiagramGraph::build(
			vec![raw_node("p1", "project", 0.5, 0.5), raw_node("m1", "media", 0.2, 0.2)],
			vec![],
			&projects,
		);
		let p1 = graph.node("p1").unwrap();
		assert_eq!(p1.media_refs, BTreeSet::from(["m1".to_string(), "m2".to_string()]));
		assert!(graph.node("m1").unwrap().media_refs.is_empty());
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let graph = DiagramGraph::build(
			vec![raw_node("p1", "project", 0.1, 0.2), raw_node("p1", "media", 0.8, 0.8)],
			vec![],
			&[],
		);
		assert_eq!(graph.len(), 1);
		assert_eq!(graph.nodes[0].kind, NodeKind::Project);
		assert_eq!(graph.baseline(0), Position::new(0.1, 0.2));
	}
}
