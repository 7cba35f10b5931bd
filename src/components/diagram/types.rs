use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	Project,
	Media,
	Upcoming,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: NodeKind,
	pub label: String,
	pub px: f64,
	pub py: f64,
	#[serde(default)]
	pub years: Vec<i32>,
	#[serde(default)]
	pub keywords: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEdge {
	pub source: String,
	pub target: String,
}

/// Project years show up both as numbers and as free text ("2023-2024").
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum YearText {
	Number(i64),
	Text(String),
}

impl fmt::Display for YearText {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			YearText::Number(n) => write!(f, "{n}"),
			YearText::Text(s) => f.write_str(s),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectDetail {
	pub id: String,
	#[serde(default)]
	pub media: Vec<String>,
	#[serde(default)]
	pub title_en: String,
	#[serde(default)]
	pub title_ko: String,
	#[serde(default)]
	pub year: Option<YearText>,
	#[serde(default)]
	pub caption: Option<String>,
	#[serde(default)]
	pub images: Vec<String>,
	#[serde(default)]
	pub videos: Vec<String>,
	#[serde(flatten)]
	pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProjectDetail {
	/// Every non-empty `description*` text field, in key order.
	pub fn descriptions(&self) -> Vec<&str> {
		self.extra
			.iter()
			.filter(|(key, _)| key.starts_with("description"))
			.filter_map(|(_, value)| value.as_str())
			.filter(|text| !text.trim().is_empty())
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn node_kind_reads_type_field() {
		let node: RawNode = serde_json::from_value(json!({
			"id": "p1", "type": "upcoming", "label": "Soon", "px": 0.1, "py": 0.9
		}))
		.unwrap();
		assert_eq!(node.kind, NodeKind::Upcoming);
		assert!(node.years.is_empty());
		assert!(node.keywords.is_empty());
	}

	#[test]
	fn project_detail_collects_description_fields() {
		let detail: ProjectDetail = serde_json::from_value(json!({
			"id": "p1",
			"media": ["m1"],
			"title_en": "Title",
			"year": 2023,
			"description_ko": "국문",
			"description": "English",
			"description_empty": "  ",
			"credits": "someone"
		}))
		.unwrap();
		assert_eq!(detail.year, Some(YearText::Number(2023)));
		assert_eq!(detail.descriptions(), vec!["English", "국문"]);
	}

	#[test]
	fn year_text_accepts_strings() {
		let detail: ProjectDetail =
			serde_json::from_value(json!({ "id": "p2", "year": "2021-2022" })).unwrap();
		assert_eq!(detail.year.map(|y| y.to_string()).as_deref(), Some("2021-2022"));
		assert!(detail.media.is_empty());
	}
}
