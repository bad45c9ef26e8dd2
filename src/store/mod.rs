//! Entity-CRUD backends for flow nodes and connections.

mod memory;
mod rest;

use async_trait::async_trait;

pub use memory::InMemoryFlowStore;
pub use rest::RestFlowStore;

use crate::config::AppConfig;
use crate::error::StoreError;
use crate::flow::model::{FlowConnectionBody, FlowConnectionRow, FlowNodeBody, FlowNodeRow};

/// Backend contract consumed by the workspace. Every call either resolves or
/// fails with a [`StoreError`]; nothing is retried here.
#[async_trait(?Send)]
pub trait FlowStore {
	/// All node rows of a flow.
	async fn list_nodes(&self, flow_id: &str) -> Result<Vec<FlowNodeRow>, StoreError>;
	/// Inserts a node, returning it with its new id.
	async fn create_node(&self, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError>;
	/// Overwrites a node.
	async fn update_node(&self, id: &str, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError>;
	/// Removes a node.
	async fn delete_node(&self, id: &str) -> Result<(), StoreError>;

	/// All connection rows of a flow.
	async fn list_connections(&self, flow_id: &str) -> Result<Vec<FlowConnectionRow>, StoreError>;
	/// Inserts a connection, returning it with its new id.
	async fn create_connection(
		&self,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError>;
	/// Overwrites a connection.
	async fn update_connection(
		&self,
		id: &str,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError>;
	/// Removes a connection.
	async fn delete_connection(&self, id: &str) -> Result<(), StoreError>;
}

/// The backend picked at startup.
#[derive(Clone, Debug)]
pub enum FlowBackend {
	/// Hosted entity API.
	Rest(RestFlowStore),
	/// Local tables, used when no API is configured.
	Memory(InMemoryFlowStore),
}

impl FlowBackend {
	/// REST when an API URL is configured, otherwise a seeded in-memory store.
	pub fn from_config(config: &AppConfig) -> Self {
		match &config.api_base_url {
			Some(url) => {
				log::info!("Using flow API at {}", url);
				FlowBackend::Rest(RestFlowStore::new(url.clone(), config.api_key.clone()))
			}
			None => {
				log::info!("No flow API configured, using in-memory demo store");
				FlowBackend::Memory(InMemoryFlowStore::with_demo_flow(&config.default_flow_id))
			}
		}
	}
}

#[async_trait(?Send)]
impl FlowStore for FlowBackend {
	async fn list_nodes(&self, flow_id: &str) -> Result<Vec<FlowNodeRow>, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.list_nodes(flow_id).await,
			FlowBackend::Memory(s) => s.list_nodes(flow_id).await,
		}
	}

	async fn create_node(&self, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.create_node(body).await,
			FlowBackend::Memory(s) => s.create_node(body).await,
		}
	}

	async fn update_node(&self, id: &str, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.update_node(id, body).await,
			FlowBackend::Memory(s) => s.update_node(id, body).await,
		}
	}

	async fn delete_node(&self, id: &str) -> Result<(), StoreError> {
		match self {
			FlowBackend::Rest(s) => s.delete_node(id).await,
			FlowBackend::Memory(s) => s.delete_node(id).await,
		}
	}

	async fn list_connections(&self, flow_id: &str) -> Result<Vec<FlowConnectionRow>, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.list_connections(flow_id).await,
			FlowBackend::Memory(s) => s.list_connections(flow_id).await,
		}
	}

	async fn create_connection(
		&self,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.create_connection(body).await,
			FlowBackend::Memory(s) => s.create_connection(body).await,
		}
	}

	async fn update_connection(
		&self,
		id: &str,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		match self {
			FlowBackend::Rest(s) => s.update_connection(id, body).await,
			FlowBackend::Memory(s) => s.update_connection(id, body).await,
		}
	}

	async fn delete_connection(&self, id: &str) -> Result<(), StoreError> {
		match self {
			FlowBackend::Rest(s) => s.delete_connection(id).await,
			FlowBackend::Memory(s) => s.delete_connection(id).await,
		}
	}
}
