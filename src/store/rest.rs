use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::FlowStore;
use crate::error::StoreError;
use crate::flow::model::{FlowConnectionBody, FlowConnectionRow, FlowNodeBody, FlowNodeRow};

const NODE_ENTITY: &str = "FlowNode";
const CONNECTION_ENTITY: &str = "FlowConnection";

/// JSON client for the hosted entity API:
/// `{base}/entities/{Entity}` for list/create, `{base}/entities/{Entity}/{id}`
/// for update/delete.
#[derive(Clone, Debug)]
pub struct RestFlowStore {
	http: Client,
	base_url: String,
	api_key: Option<String>,
}

impl RestFlowStore {
	/// Client rooted at `base_url`, sending `api_key` with every request when set.
	pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			http: Client::new(),
			base_url: base_url.trim_end_matches('/').to_owned(),
			api_key,
		}
	}

	fn url(&self, entity: &str, id: Option<&str>) -> String {
		match id {
			Some(id) => format!("{}/entities/{}/{}", self.base_url, entity, id),
			None => format!("{}/entities/{}", self.base_url, entity),
		}
	}

	fn authed(&self, req: RequestBuilder) -> RequestBuilder {
		match &self.api_key {
			Some(key) => req.header("api_key", key),
			None => req,
		}
	}

	async fn list<T: DeserializeOwned>(&self, entity: &str, flow_id: &str) -> Result<Vec<T>, StoreError> {
		let req = self.http.get(self.url(entity, None)).query(&[("flow_id", flow_id)]);
		let res = checked(self.authed(req).send().await?).await?;
		Ok(res.json().await?)
	}

	async fn create<B: Serialize, T: DeserializeOwned>(
		&self,
		entity: &str,
		body: &B,
	) -> Result<T, StoreError> {
		let req = self.http.post(self.url(entity, None)).json(body);
		let res = checked(self.authed(req).send().await?).await?;
		Ok(res.json().await?)
	}

	async fn update<B: Serialize, T: DeserializeOwned>(
		&self,
		entity: &'static str,
		id: &str,
		body: &B,
	) -> Result<T, StoreError> {
		let req = self.http.put(self.url(entity, Some(id))).json(body);
		let res = self.authed(req).send().await?;
		if res.status().as_u16() == 404 {
			return Err(StoreError::NotFound {
				entity,
				id: id.to_owned(),
			});
		}
		Ok(checked(res).await?.json().await?)
	}

	async fn delete(&self, entity: &'static str, id: &str) -> Result<(), StoreError> {
		let req = self.http.delete(self.url(entity, Some(id)));
		let res = self.authed(req).send().await?;
		// already gone is fine
		if res.status().as_u16() == 404 {
			log::debug!("{} {} was already deleted", entity, id);
			return Ok(());
		}
		checked(res).await?;
		Ok(())
	}
}

async fn checked(res: Response) -> Result<Response, StoreError> {
	let status = res.status();
	if status.is_success() {
		return Ok(res);
	}
	let body = res.text().await.unwrap_or_default();
	Err(StoreError::Status {
		status: status.as_u16(),
		body,
	})
}

#[async_trait(?Send)]
impl FlowStore for RestFlowStore {
	async fn list_nodes(&self, flow_id: &str) -> Result<Vec<FlowNodeRow>, StoreError> {
		self.list(NODE_ENTITY, flow_id).await
	}

	async fn create_node(&self, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		self.create(NODE_ENTITY, body).await
	}

	async fn update_node(&self, id: &str, body: &FlowNodeBody) -> Result<FlowNodeRow, StoreError> {
		self.update(NODE_ENTITY, id, body).await
	}

	async fn delete_node(&self, id: &str) -> Result<(), StoreError> {
		self.delete(NODE_ENTITY, id).await
	}

	async fn list_connections(&self, flow_id: &str) -> Result<Vec<FlowConnectionRow>, StoreError> {
		self.list(CONNECTION_ENTITY, flow_id).await
	}

	async fn create_connection(
		&self,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		self.create(CONNECTION_ENTITY, body).await
	}

	async fn update_connection(
		&self,
		id: &str,
		body: &FlowConnectionBody,
	) -> Result<FlowConnectionRow, StoreError> {
		self.update(CONNECTION_ENTITY, id, body).await
	}

	async fn delete_connection(&self, id: &str) -> Result<(), StoreError> {
		self.delete(CONNECTION_ENTITY, id).await
	}
}
