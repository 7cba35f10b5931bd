mod component;
mod filter;
mod graph;
mod layout;
mod loader;
mod render;
mod scale;
mod state;
mod types;

pub use component::DiagramCanvas;
pub use filter::KeywordFilter;
pub use graph::{DiagramGraph, DiagramNode, NodeIdx};
pub use layout::{GridSpec, LayoutMode};
pub use loader::{DiagramData, LoadState, load_diagram};
pub use state::{NodeAction, Settings, year_caption};
pub use types::{NodeKind, ProjectDetail};
