use std::sync::Arc;

use gloo_net::http::Request;
use log::{debug, info};
use serde::de::DeserializeOwned;

use super::graph::DiagramGraph;
use super::types::{ProjectDetail, RawEdge, RawNode};
use crate::config::DataConfig;
use crate::error::DiagramError;

/// Everything the diagram page needs, merged from the three fixtures.
#[derive(Clone, Debug, Default)]
pub struct DiagramData {
	pub graph: DiagramGraph,
	pub projects: Vec<ProjectDetail>,
}

impl DiagramData {
	pub fn from_parts(
		nodes: Vec<RawNode>,
		edges: Vec<RawEdge>,
		projects: Vec<ProjectDetail>,
	) -> Self {
		let graph = DiagramGraph::build(nodes, edges, &projects);
		Self { graph, projects }
	}

	pub fn project(&self, id: &str) -> Option<&ProjectDetail> {
		self.projects.iter().find(|p| p.id == id)
	}
}

/// Progress of the one-shot data load.
#[derive(Clone, Debug, Default)]
pub enum LoadState {
	#[default]
	Loading,
	Ready(Arc<DiagramData>),
	Failed(String),
}

async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, DiagramError> {
	debug!("fetching {url}");
	let resp = Request::get(url)
		.send()
		.await
		.map_err(|source| DiagramError::Request {
			url: url.to_string(),
			source,
		})?;
	if !resp.ok() {
		return Err(DiagramError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}
	let text = resp.text().await.map_err(|source| DiagramError::Request {
		url: url.to_string(),
		source,
	})?;
	serde_json::from_str(&text).map_err(|source| DiagramError::Decode {
		url: url.to_string(),
		source,
	})
}

/// Fetch nodes, edges and project details concurrently and merge them.
/// Any single failure fails the whole load.
pub async fn load_diagram(config: &DataConfig) -> Result<DiagramData, DiagramError> {
	let (nodes, edges, projects) = futures::try_join!(
		fetch_json::<Vec<RawNode>>(&config.nodes_url),
		fetch_json::<Vec<RawEdge>>(&config.edges_url),
		fetch_json::<Vec<ProjectDetail>>(&config.projects_url),
	)?;
	let (raw_nodes, raw_edges) = (nodes.len(), edges.len());
	let data = DiagramData::from_parts(nodes, edges, projects);
	info!(
		"loaded {} nodes, {} of {} edges, {} projects",
		data.graph.len(),
		data.graph.edges.len(),
		raw_edges,
		data.projects.len()
	);
	if data.graph.len() != raw_nodes {
		debug!("{} duplicate nodes skipped", raw_nodes - data.graph.len());
	}
	Ok(data)
}
