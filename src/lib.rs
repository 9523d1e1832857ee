//! producoes-graph: front-end utilities for the producoes dashboard.
//!
//! This crate provides a WASM-based, SVG-rendered force-directed graph view
//! with hover tooltips, click callbacks and drag-to-pin, plus a typed client
//! for the dashboard's REST backend.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod api;
pub mod components;

pub use api::{ApiConfig, ApiError, ProducoesClient};
pub use components::force_graph::{
	ForceGraphSvg, GraphData, GraphError, GraphLink, GraphNode, ViewConfig, ViewHandle, mount_graph,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("producoes-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"producoes-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("producoes-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data from the DOM and renders the graph view full size.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();

	view! {
		<Html attr:lang="pt-BR" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Produções" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph" style="width: 100vw; height: 100vh;">
			<ForceGraphSvg data=graph_data />
		</div>
	}
}
