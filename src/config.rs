//! Diagram configuration.
//!
//! Every field has a default, so an empty object is a complete config.
//! Overrides are read from an optional
//! `<script id="diagram-config" type="application/json">` element.

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::diagram::{GridSpec, Settings};
use crate::error::DiagramError;

/// Id of the script element holding config overrides.
pub const CONFIG_ELEMENT_ID: &str = "diagram-config";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DiagramConfig {
	/// Where the fixtures and images live.
	#[serde(default)]
	pub data: DataConfig,

	/// Grid and sizing.
	#[serde(default)]
	pub layout: LayoutConfig,

	/// Pointer handling.
	#[serde(default)]
	pub interaction: InteractionConfig,

	/// Viewports at or below this width get the card grid.
	#[serde(default = "default_mobile_breakpoint")]
	pub mobile_breakpoint: f64,

	/// Links shown under the diagram controls and in the mobile nav bar.
	#[serde(default = "default_nav_links")]
	pub nav_links: Vec<NavLink>,
}

impl Default for DiagramConfig {
	fn default() -> Self {
		Self {
			data: DataConfig::default(),
			layout: LayoutConfig::default(),
			interaction: InteractionConfig::default(),
			mobile_breakpoint: default_mobile_breakpoint(),
			nav_links: default_nav_links(),
		}
	}
}

/// Locations of the static JSON fixtures and images.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DataConfig {
	/// Node list.
	#[serde(default = "default_nodes_url")]
	pub nodes_url: String,

	/// Edge list.
	#[serde(default = "default_edges_url")]
	pub edges_url: String,

	/// Project detail records.
	#[serde(default = "default_projects_url")]
	pub projects_url: String,

	/// Directory holding `<id>_thumbnail.png` files.
	#[serde(default = "default_image_base")]
	pub image_base: String,

	/// Image stretched behind the diagram.
	#[serde(default = "default_background_image")]
	pub background_image: Option<String>,
}

impl Default for DataConfig {
	fn default() -> Self {
		Self {
			nodes_url: default_nodes_url(),
			edges_url: default_edges_url(),
			projects_url: default_projects_url(),
			image_base: default_image_base(),
			background_image: default_background_image(),
		}
	}
}

impl DataConfig {
	/// Thumbnail URL for a node.
	pub fn thumbnail_url(&self, id: &str) -> String {
		format!("{}/{}_thumbnail.png", self.image_base.trim_end_matches('/'), id)
	}
}

/// Year-grid geometry and node sizing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LayoutConfig {
	/// Grid border as a viewport fraction.
	#[serde(default = "default_grid_margin")]
	pub grid_margin: f64,

	/// Row height multiplier for the grid.
	#[serde(default = "default_grid_stretch")]
	pub grid_stretch: f64,

	/// Length of the layout switch animation.
	#[serde(default = "default_transition_ms")]
	pub transition_ms: u32,

	/// Viewport width at which nodes reach full size.
	#[serde(default = "default_reference_width")]
	pub reference_width: f64,

	/// Full-size thumbnail edge in pixels.
	#[serde(default = "default_thumb_size")]
	pub thumb_size: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			grid_margin: default_grid_margin(),
			grid_stretch: default_grid_stretch(),
			transition_ms: default_transition_ms(),
			reference_width: default_reference_width(),
			thumb_size: default_thumb_size(),
		}
	}
}

/// Pointer gesture tuning.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InteractionConfig {
	/// Pixels the pointer must travel before a press becomes a drag.
	#[serde(default = "default_drag_threshold")]
	pub drag_threshold: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			drag_threshold: default_drag_threshold(),
		}
	}
}

/// A labelled outbound link.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NavLink {
	/// Text shown.
	pub label: String,
	/// Target URL or route.
	pub href: String,
}

impl NavLink {
	/// Links leaving the site open in a new tab.
	pub fn is_external(&self) -> bool {
		self.href.starts_with("http://") || self.href.starts_with("https://")
	}
}

fn default_mobile_breakpoint() -> f64 {
	768.0
}

fn default_nav_links() -> Vec<NavLink> {
	[
		("Texts", "/texts"),
		("CV", "/cv"),
		("Instagram", "https://instagram.com/ban_jaeha"),
	]
	.into_iter()
	.map(|(label, href)| NavLink {
		label: label.into(),
		href: href.into(),
	})
	.collect()
}

fn default_nodes_url() -> String {
	"/data/Nodes.json".to_string()
}

fn default_edges_url() -> String {
	"/data/links.json".to_string()
}

fn default_projects_url() -> String {
	"/data/projects.json".to_string()
}

fn default_image_base() -> String {
	"/images".to_string()
}

fn default_background_image() -> Option<String> {
	Some("/images/diagram_grid.png".to_string())
}

fn default_grid_margin() -> f64 {
	0.15
}

fn default_grid_stretch() -> f64 {
	1.2
}

fn default_transition_ms() -> u32 {
	1000
}

fn default_reference_width() -> f64 {
	1920.0
}

fn default_thumb_size() -> f64 {
	112.0
}

fn default_drag_threshold() -> f64 {
	3.0
}

impl DiagramConfig {
	/// Parse a JSON config; absent fields take their defaults.
	pub fn from_json(text: &str) -> Result<Self, DiagramError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Config from the page's embedded script element, or defaults.
	pub fn from_document() -> Self {
		let Some(text) = embedded_config_text() else {
			return Self::default();
		};
		match Self::from_json(&text) {
			Ok(config) => {
				info!("loaded diagram config from #{}", CONFIG_ELEMENT_ID);
				config
			}
			Err(e) => {
				warn!("{e}; using defaults");
				Self::default()
			}
		}
	}

	/// Tuning handed to the diagram state.
	pub fn settings(&self) -> Settings {
		Settings {
			grid: GridSpec {
				margin: self.layout.grid_margin,
				stretch: self.layout.grid_stretch,
			},
			transition_secs: f64::from(self.layout.transition_ms) / 1000.0,
			drag_threshold: self.interaction.drag_threshold,
			reference_width: self.layout.reference_width,
			thumb_size: self.layout.thumb_size,
		}
	}
}

fn embedded_config_text() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok().filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_is_all_defaults() {
		let config = DiagramConfig::from_json("{}").unwrap();
		assert_eq!(config, DiagramConfig::default());
		assert_eq!(config.data.nodes_url, "/data/Nodes.json");
		assert_eq!(config.settings(), Settings::default());
	}

	#[test]
	fn partial_sections_keep_other_defaults() {
		let config = DiagramConfig::from_json(
			r#"{ "layout": { "transition_ms": 500 }, "interaction": { "drag_threshold": 6 },
			     "data": { "background_image": null } }"#,
		)
		.unwrap();
		assert_eq!(config.layout.grid_margin, 0.15);
		assert_eq!(config.settings().transition_secs, 0.5);
		assert_eq!(config.settings().drag_threshold, 6.0);
		assert_eq!(config.data.background_image, None);
		assert_eq!(config.mobile_breakpoint, 768.0);
	}

	#[test]
	fn malformed_json_is_a_config_error() {
		let err = DiagramConfig::from_json("{ nope").unwrap_err();
		assert!(matches!(err, DiagramError::Config(_)));
	}

	#[test]
	fn thumbnail_urls_join_cleanly() {
		let mut data = DataConfig::default();
		assert_eq!(data.thumbnail_url("p1"), "/images/p1_thumbnail.png");
		data.image_base = "https://cdn.example/img/".into();
		assert_eq!(data.thumbnail_url("p1"), "https://cdn.example/img/p1_thumbnail.png");
	}

	#[test]
	fn external_links_detected() {
		let links = default_nav_links();
		assert!(!links[0].is_external());
		assert!(links[2].is_external());
	}
}
