use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, json};

use super::FlowStore;
use crate::error::StoreError;
use crate::flow::model::{
	ConnectionStyle, FlowConnectionBody, FlowConnectionRow, FlowNodeBody, FlowNodeRow, NodeKind,
	NodeStyle, Port,
};

#[derive(Debug, Default)]
struct Tables {
	nodes: Vec<FlowNodeRow>,
	connections: Vec<FlowConnectionRow>,
	next_id: u64,
}

impl Tables {
	fn fresh_id(&mut self, prefix: &str) -> String {
		self.next_id += 1;
		format!("{}-{}", prefix, self.next_id)
	}
}

/// Store backed by shared in-process tables. Clones see the same rows.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFlowStore {
	tables: Rc<RefCell<Tables>>,
}

impl InMemoryFlowStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Store holding a small sample diagram under `flow_id`.
	pub fn with_demo_flow(flow_id: &str) -> Self {
		let store = Self::new();
		let node = |kind, label: &str, x, y, data: serde_json::Value| FlowNodeBody {
			flow_id: flow_id.to_owned(),
			kind,
			label: Some(label.to_owned()),
			description: None,
			x,
			y,
			width: None,
			height: None,
			data: match data {
				serde_json::Value::Object(map) => map,
				_ => Map::new(),
			},
			style: NodeStyle::default(),
		};
		let start = store.insert_node(node(NodeKind::Circle, "Start", 40.0, 160.0, json!({ "radius": 50 })));
		let signup = store.insert_node(node(NodeKind::Rectangle, "Sign up", 220.0, 150.0, json!({})));
		let check = store.insert_node(node(NodeKind::Diamond, "Email valid?", 500.0, 135.0, json!({})));
		let users = store.insert_node(node(
			NodeKind::Database,
			"users",
			460.0,
			360.0,
			json!({ "fields": [
				{ "name": "id", "type": "uuid", "primary": true },
				{ "name": "email", "type": "text", "unique": true },
				{ "name": "created_at", "type": "timestamp" }
			]}),
		));
		store.insert_node(node(
			NodeKind::Note,
			"Note",
			150.0,
			380.0,
			json!({ "content": "Double opt-in is handled by the mailer." }),
		));

		let edge = |from: &str, fp, to: &str, tp, style| FlowConnectionBody {
			flow_id: flow_id.to_owned(),
			from_node_id: from.to_owned(),
			to_node_id: to.to_owned(),
			from_port: Some(fp),
			to_port: Some(tp),
			label: None,
			color: None,
			stroke_width: None,
			style: Some(style),
		};
		store.insert_connection(edge(&start, Port::Right, &signup, Port::Left, ConnectionStyle::Curved));
		store.insert_connection(edge(&signup, Port::Right, &check, Port::Left, ConnectionStyle::Curved));
		store.insert_connection(edge(&check, Port::Bottom, &users, Port::Top, ConnectionStyle::Straight));
		store
	}

	/// Inserts a node row directly, returning its id.
	pub fn insert_node(&self, body: FlowNodeBody) -> String {
		let mut tables = self.tables.borrow_mut();
		let id = tables.fresh_id("node");
		tables.nodes.push(FlowNodeRow {
			id: id.clone(),
			body,
		});
		id
	}

	/// Inserts a connection row directly, returning its id.
	pub fn insert_connection(&self, body: FlowConnectionBody) -> String {
		let mut tables = self.tables.borrow_mut();
		let id = tables.fresh_id("conn");
		tables.connections.push(FlowConnectionRow {
			id: id.clone(),
			body,
		});
		id
	}

	/// Snapshot of every node row.
	pub fn nodes(&self) -> Vec<FlowNodeRow> {
		self.tables.borrow().nodes.clone()
	}

	/// Snapshot of every connection row.
	pub fn connections(&self) -> Vec<FlowConnectionRow> {
		self.tables.borrow().connections.clone()
	}
}

#[async_trait(?Send)]
impl FlowStore for InMemoryFlowStore {
	async fn list_nodes(&self, flow_id: &str) -> Result<Vec<FlowNodeRow>, StoreError> {
		Ok(self
			.tables
			.borrow()
			.nodes
			.iter()
			.filter(|n| n.body.flow_id == flow_id)
			.cloned()
			.collect())
	}

	async fn create_node(&self, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		let id = self.insert_node(body.clone());
		Ok(FlowNodeRow {
			id,
			body: body.clone(),
		})
	}

	async fn update_node(&self, id: &str, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		let mut tables = self.tables.borrow_mut();
		let row = tables
			.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or_else(|| StoreError::NotFound {
				entity: "FlowNode",
				id: id.to_owned(),
			})?;
		row.body = body.clone();
		Ok(row.clone())
	}

	async fn delete_node(&self, id: &str) -> Result<(), StoreError> {
		self.tables.borrow_mut().nodes.retain(|n| n.id != id);
		Ok(())
	}

	async fn list_connections(&self, flow_id: &str) -> Result<Vec<FlowConnectionRow>, StoreError> {
		Ok(self
			.tables
			.borrow()
			.connections
			.iter()
			.filter(|c| c.body.flow_id == flow_id)
			.cloned()
			.collect())
	}

	async fn create_connection(
		&self,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		let id = self.insert_connection(body.clone());
		Ok(FlowConnectionRow {
			id,
			body: body.clone(),
		})
	}

	async fn update_connection(
		&self,
		id: &str,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		let mut tables = self.tables.borrow_mut();
		let row = tables
			.connections
			.iter_mut()
			.find(|c| c.id == id)
			.ok_or_else(|| StoreError::NotFound {
				entity: "FlowConnection",
				id: id.to_owned(),
			})?;
		row.body = body.clone();
		Ok(row.clone())
	}

	async fn delete_connection(&self, id: &str) -> Result<(), StoreError> {
		self.tables.borrow_mut().connections.retain(|c| c.id != id);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::executor::block_on;

	#[test]
	fn demo_flow_is_consistent() {
		let store = InMemoryFlowStore::with_demo_flow("demo");
		let nodes = block_on(store.list_nodes("demo")).unwrap();
		let conns = block_on(store.list_connections("demo")).unwrap();
		assert_eq!(nodes.len(), 5);
		assert_eq!(conns.len(), 3);
		for c in &conns {
			assert!(nodes.iter().any(|n| n.id == c.body.from_node_id));
			assert!(nodes.iter().any(|n| n.id == c.body.to_node_id));
		}
		assert!(block_on(store.list_nodes("other")).unwrap().is_empty());
	}

	#[test]
	fn update_of_missing_row_is_not_found() {
		let store = InMemoryFlowStore::new();
		let body = store_body();
		let err = block_on(store.update_node("nope", &body)).unwrap_err();
		assert!(matches!(err, StoreError::NotFound { entity: "FlowNode", .. }));
	}

	fn store_body() -> FlowNodeBody {
		FlowNodeBody {
			flow_id: "f".into(),
			kind: NodeKind::Rectangle,
			label: None,
			description: None,
			x: 0.0,
			y: 0.0,
			width: None,
			height: None,
			data: Map::new(),
			style: NodeStyle::default(),
		}
	}
}
