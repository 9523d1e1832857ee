//! Force-directed graph view.
//!
//! Renders nodes and links as SVG driven by a force simulation, with:
//! - A retained scene rebound to simulation positions on every tick
//! - Hover tooltips positioned next to the pointer
//! - Click callbacks per node
//! - Drag-to-pin, with the simulation reheated while any drag is active
//!
//! # Example
//!
//! ```ignore
//! use producoes_graph::{ForceGraphSvg, GraphData, GraphNode, GraphLink};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::new("a", 1).with_tooltip("Artigo A"),
//!         GraphNode::new("b", 2).with_on_click(|| log::info!("b clicked")),
//!     ],
//!     links: vec![GraphLink::new("ab", "a", "b")],
//! };
//!
//! view! { <ForceGraphSvg data=data /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
mod render;
pub mod scene;
mod state;
mod types;

pub use component::{ForceGraphSvg, ViewHandle, mount_graph};
pub use config::ViewConfig;
pub use error::GraphError;
pub use layout::{ForceLayout, LayoutConfig, LayoutEngine, NodePin, Point};
pub use state::GraphView;
pub use types::{ClickHandler, GraphData, GraphLink, GraphNode, ResolvedLink};
