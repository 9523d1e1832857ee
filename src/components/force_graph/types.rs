//! Graph data structures for input to the force graph view.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

use super::error::{GraphError, Result};

/// Zero-argument callback fired when a node is clicked.
#[derive(Clone)]
pub struct ClickHandler(Rc<dyn Fn()>);

impl ClickHandler {
	/// Wrap `f`.
	pub fn new(f: impl Fn() + 'static) -> Self {
		Self(Rc::new(f))
	}

	/// Invoke the callback.
	pub fn call(&self) {
		(self.0)()
	}
}

impl fmt::Debug for ClickHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ClickHandler(..)")
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Classification tag. Carried through but not interpreted by the view.
	#[serde(default)]
	pub group: i64,
	/// CSS fill color (e.g., "#ff0000"). Falls back to the configured default.
	pub color: Option<String>,
	/// Hover text. May contain markup.
	pub tooltip: Option<String>,
	/// Click callback, attached in code.
	#[serde(skip)]
	pub on_click: Option<ClickHandler>,
}

impl GraphNode {
	/// A node with no color, tooltip or callback.
	pub fn new(id: impl Into<String>, group: i64) -> Self {
		Self {
			id: id.into(),
			group,
			color: None,
			tooltip: None,
			on_click: None,
		}
	}

	/// Set the fill color.
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}

	/// Set the hover text.
	pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
		self.tooltip = Some(tooltip.into());
		self
	}

	/// Set the click callback.
	pub fn with_on_click(mut self, f: impl Fn() + 'static) -> Self {
		self.on_click = Some(ClickHandler::new(f));
		self
	}
}

/// An edge between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Unique identifier for this link.
	pub id: String,
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
}

impl GraphLink {
	/// A link from `source` to `target`.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
		}
	}
}

/// A link whose endpoints have been located in the node list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLink {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes, in drawing order.
	pub nodes: Vec<GraphNode>,
	/// Links between nodes of `nodes`.
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Check id uniqueness and resolve every link endpoint to a node index.
	///
	/// Returned links are in the same order as `self.links`.
	pub fn resolve(&self) -> Result<Vec<ResolvedLink>> {
		let mut index_of = HashMap::with_capacity(self.nodes.len());
		for (i, node) in self.nodes.iter().enumerate() {
			if index_of.insert(node.id.as_str(), i).is_some() {
				return Err(GraphError::DuplicateNodeId(node.id.clone()));
			}
		}

		let mut link_ids = HashSet::with_capacity(self.links.len());
		let lookup = |link: &GraphLink, id: &str| {
			index_of
				.get(id)
				.copied()
				.ok_or_else(|| GraphError::DanglingLink {
					link: link.id.clone(),
					node: id.to_string(),
				})
		};

		self.links
			.iter()
			.map(|link| {
				if !link_ids.insert(link.id.as_str()) {
					return Err(GraphError::DuplicateLinkId(link.id.clone()));
				}
				Ok(ResolvedLink {
					source: lookup(link, &link.source)?,
					target: lookup(link, &link.target)?,
				})
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![GraphNode::new("a", 1), GraphNode::new("b", 1), GraphNode::new("c", 2)],
			links: vec![GraphLink::new("ab", "a", "b"), GraphLink::new("cb", "c", "b")],
		}
	}

	#[test]
	fn resolves_endpoints_to_indices() {
		let links = sample().resolve().unwrap();
		assert_eq!(
			links,
			vec![
				ResolvedLink { source: 0, target: 1 },
				ResolvedLink { source: 2, target: 1 },
			]
		);
	}

	#[test]
	fn rejects_duplicate_node_ids() {
		let mut data = sample();
		data.nodes.push(GraphNode::new("a", 3));
		assert!(matches!(data.resolve(), Err(GraphError::DuplicateNodeId(id)) if id == "a"));
	}

	#[test]
	fn rejects_duplicate_link_ids() {
		let mut data = sample();
		data.links.push(GraphLink::new("ab", "b", "c"));
		assert!(matches!(data.resolve(), Err(GraphError::DuplicateLinkId(id)) if id == "ab"));
	}

	#[test]
	fn rejects_dangling_links() {
		let mut data = sample();
		data.links.push(GraphLink::new("ax", "a", "x"));
		match data.resolve() {
			Err(GraphError::DanglingLink { link, node }) => {
				assert_eq!(link, "ax");
				assert_eq!(node, "x");
			}
			other => panic!("expected dangling link error, got {:?}", other),
		}
	}

	#[test]
	fn empty_graph_is_valid() {
		assert!(GraphData::default().resolve().unwrap().is_empty());
	}

	#[test]
	fn deserializes_without_callbacks() {
		let json = r##"{
			"nodes": [
				{"id": "p1", "group": 2, "color": "#1976d2", "tooltip": "<b>Artigo</b>"},
				{"id": "p2", "group": 3}
			],
			"links": [{"id": "l1", "source": "p1", "target": "p2"}]
		}"##;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.nodes[0].color.as_deref(), Some("#1976d2"));
		assert_eq!(data.nodes[1].tooltip, None);
		assert!(data.nodes[1].on_click.is_none());
		assert_eq!(data.links[0].target, "p2");
	}
}
