use std::collections::BTreeSet;

use super::graph::DiagramNode;
use super::types::NodeKind;

/// Conjunctive keyword filter over project nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordFilter {
	selected: BTreeSet<String>,
}

impl KeywordFilter {
	pub fn contains(&self, keyword: &str) -> bool {
		self.selected.contains(keyword)
	}

	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	pub fn clear(&mut self) {
		self.selected.clear();
	}

	/// Adds the keyword if absent, removes it otherwise. Returns whether it is
	/// now selected.
	pub fn toggle(&mut self, keyword: &str) -> bool {
		if self.selected.remove(keyword) {
			false
		} else {
			self.selected.insert(keyword.to_string());
			true
		}
	}

	/// Every selected keyword is among `keywords`.
	pub fn matches(&self, keywords: &BTreeSet<String>) -> bool {
		self.selected.iter().all(|k| keywords.contains(k))
	}

	pub fn is_visible(&self, node: &DiagramNode) -> bool {
		match node.kind {
			NodeKind::Project => self.matches(&node.keywords),
			NodeKind::Media | NodeKind::Upcoming => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::diagram::graph::DiagramGraph;
	use crate::components::diagram::graph::tests::raw_node;

	fn tagged(id: &str, kind: &str, keywords: &[&str]) -> DiagramNode {
		let mut raw = raw_node(id, kind, 0.5, 0.5);
		raw.keywords = keywords.iter().map(|k| k.to_string()).collect();
		DiagramGraph::build(vec![raw], vec![], &[]).nodes.remove(0)
	}

	#[test]
	fn empty_filter_shows_everything() {
		let filter = KeywordFilter::default();
		assert!(filter.is_visible(&tagged("p", "project", &[])));
		assert!(filter.is_visible(&tagged("m", "media", &[])));
	}

	#[test]
	fn selection_is_conjunctive() {
		let mut filter = KeywordFilter::default();
		filter.toggle("A");
		filter.toggle("B");

		assert!(filter.is_visible(&tagged("abc", "project", &["A", "B", "C"])));
		assert!(!filter.is_visible(&tagged("a", "project", &["A"])));
		assert!(filter.is_visible(&tagged("m", "media", &[])));
		assert!(filter.is_visible(&tagged("u", "upcoming", &[])));
	}

	#[test]
	fn toggle_adds_then_removes() {
		let mut filter = KeywordFilter::default();
		assert!(filter.toggle("video"));
		assert!(filter.contains("video"));
		assert!(!filter.toggle("video"));
		assert!(filter.is_empty());
	}
}
