//! The authoritative graph state of one open flow.
//!
//! I/O is split from state so the UI never holds a borrow across an await:
//! `begin_*` validates and snapshots, a free async function talks to the
//! store, and `finish_*` folds the outcome back in. [`FlowWorkspace::load`]
//! and [`FlowWorkspace::save`] chain the three for callers that own the
//! workspace outright.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value, json};

use super::convert::{connection_body, hydrate_connection, hydrate_node, node_body};
use super::editor::{
	Connection, EdgeChange, EdgeKind, EdgeStroke, EditorEdge, EditorNode, MarkerEnd, NodeChange,
	NodeData, NodeSize, TEMP_ID_PREFIX, XYPosition, is_temp_id,
};
use super::model::{FlowConnectionRow, FlowNodeRow, NodeKind, NodeStyle};
use super::notify::Notifier;
use crate::error::{FlowError, Result, StoreError};
use crate::store::FlowStore;

/// Lifecycle of a workspace; at most one I/O operation runs at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkspacePhase {
	/// Nothing loaded.
	Idle,
	/// A fetch is in flight.
	Loading,
	/// Loaded and editable.
	Ready,
	/// A save is in flight; edits are still accepted.
	Saving,
}

impl WorkspacePhase {
	fn name(self) -> &'static str {
		match self {
			WorkspacePhase::Idle => "idle",
			WorkspacePhase::Loading => "loading",
			WorkspacePhase::Ready => "ready",
			WorkspacePhase::Saving => "saving",
		}
	}
}

/// Rows fetched for one flow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowRows {
	/// Node rows.
	pub nodes: Vec<FlowNodeRow>,
	/// Connection rows.
	pub connections: Vec<FlowConnectionRow>,
}

/// Snapshot of what a save has to write.
#[derive(Clone, Debug)]
pub struct SavePlan {
	/// Flow the rows belong to.
	pub flow_id: String,
	/// Nodes to create or update.
	pub nodes: Vec<EditorNode>,
	/// Edges to create or update.
	pub edges: Vec<EditorEdge>,
	/// Persisted node ids to delete.
	pub removed_nodes: Vec<String>,
	/// Persisted edge ids to delete.
	pub removed_edges: Vec<String>,
	revision: u64,
}

/// What a save managed to do before it finished or failed.
#[derive(Debug, Default)]
pub struct SaveReport {
	/// Temp id -> backend id.
	pub created_nodes: HashMap<String, String>,
	/// Temp id -> backend id.
	pub created_edges: HashMap<String, String>,
	/// Node rows updated in place.
	pub updated_nodes: usize,
	/// Connection rows updated in place.
	pub updated_edges: usize,
	/// Node ids deleted.
	pub deleted_nodes: Vec<String>,
	/// Connection ids deleted.
	pub deleted_edges: Vec<String>,
	/// First failure; everything after it was skipped.
	pub error: Option<StoreError>,
	revision: u64,
}

/// Editable graph of one flow plus the bookkeeping needed to persist it.
#[derive(Clone, Debug)]
pub struct FlowWorkspace {
	flow_id: Option<String>,
	phase: WorkspacePhase,
	nodes: Vec<EditorNode>,
	edges: Vec<EditorEdge>,
	removed_nodes: Vec<String>,
	removed_edges: Vec<String>,
	selected_node: Option<String>,
	selected_edge: Option<String>,
	revision: u64,
	saved_revision: u64,
}

impl Default for FlowWorkspace {
	fn default() -> Self {
		Self::new()
	}
}

impl FlowWorkspace {
	/// Empty, idle workspace.
	pub fn new() -> Self {
		Self {
			flow_id: None,
			phase: WorkspacePhase::Idle,
			nodes: Vec::new(),
			edges: Vec::new(),
			removed_nodes: Vec::new(),
			removed_edges: Vec::new(),
			selected_node: None,
			selected_edge: None,
			revision: 0,
			saved_revision: 0,
		}
	}

	/// Flow currently loaded or loading.
	pub fn flow_id(&self) -> Option<&str> {
		self.flow_id.as_deref()
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> WorkspacePhase {
		self.phase
	}

	/// A fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.phase == WorkspacePhase::Loading
	}

	/// A save is in flight.
	pub fn is_saving(&self) -> bool {
		self.phase == WorkspacePhase::Saving
	}

	/// Unsaved edits exist.
	pub fn is_dirty(&self) -> bool {
		self.revision != self.saved_revision
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> &[EditorNode] {
		&self.nodes
	}

	/// Edges in insertion order.
	pub fn edges(&self) -> &[EditorEdge] {
		&self.edges
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&EditorNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Edge by id.
	pub fn edge(&self, id: &str) -> Option<&EditorEdge> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Id of the selected node.
	pub fn selected_node(&self) -> Option<&str> {
		self.selected_node.as_deref()
	}

	/// Id of the selected edge.
	pub fn selected_edge(&self) -> Option<&str> {
		self.selected_edge.as_deref()
	}

	/// Persisted ids removed since the last save, nodes then edges.
	pub fn pending_deletes(&self) -> (&[String], &[String]) {
		(&self.removed_nodes, &self.removed_edges)
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	fn ensure_idle_io(&self) -> Result<()> {
		match self.phase {
			WorkspacePhase::Loading | WorkspacePhase::Saving => Err(FlowError::Busy(self.phase.name())),
			_ => Ok(()),
		}
	}

	// ---- load ----

	/// Enters `Loading` for `flow_id`.
	pub fn begin_load(&mut self, flow_id: &str) -> Result<()> {
		self.ensure_idle_io()?;
		log::info!("Loading flow {}", flow_id);
		self.flow_id = Some(flow_id.to_owned());
		self.phase = WorkspacePhase::Loading;
		Ok(())
	}

	/// Replaces the graph with freshly fetched rows. On failure the graph is
	/// emptied and the workspace drops back to `Idle`.
	pub fn finish_load(&mut self, fetched: Result<FlowRows>, notifier: &impl Notifier) -> Result<()> {
		self.selected_node = None;
		self.selected_edge = None;
		self.removed_nodes.clear();
		self.removed_edges.clear();

		let rows = match fetched {
			Ok(rows) => rows,
			Err(err) => {
				log::error!("{}", err);
				self.nodes.clear();
				self.edges.clear();
				self.flow_id = None;
				self.phase = WorkspacePhase::Idle;
				self.saved_revision = self.revision;
				notifier.error("Failed to load flow");
				return Err(err);
			}
		};

		self.nodes = rows.nodes.into_iter().map(hydrate_node).collect();
		let known: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
		let (edges, orphans): (Vec<_>, Vec<_>) = rows
			.connections
			.into_iter()
			.map(hydrate_connection)
			.partition(|e| known.contains(e.source.as_str()) && known.contains(e.target.as_str()));
		for orphan in &orphans {
			log::warn!(
				"Dropping connection {} ({} -> {}): endpoint not in flow",
				orphan.id,
				orphan.source,
				orphan.target
			);
		}
		self.edges = edges;
		self.phase = WorkspacePhase::Ready;
		self.saved_revision = self.revision;
		log::info!(
			"Loaded {} nodes and {} connections",
			self.nodes.len(),
			self.edges.len()
		);
		Ok(())
	}

	/// Fetches and hydrates `flow_id`.
	pub async fn load<S, N>(&mut self, store: &S, flow_id: &str, notifier: &N) -> Result<()>
	where
		S: FlowStore + ?Sized,
		N: Notifier,
	{
		self.begin_load(flow_id)?;
		let fetched = fetch_flow(store, flow_id).await;
		self.finish_load(fetched, notifier)
	}

	// ---- editing ----

	/// Applies canvas node changes. Positions only commit once a drag has
	/// settled (`dragging: false`); nothing here reaches the backend.
	pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
		for change in changes {
			match change {
				NodeChange::Position {
					id,
					position: Some(pos),
					dragging: false,
				} => {
					if let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) {
						node.position = *pos;
						self.touch();
					}
				}
				NodeChange::Position { .. } => {}
				NodeChange::Dimensions { id, size: Some(new), .. } => {
					let Some(node) = self.nodes.iter_mut().find(|n| &n.id == id) else {
						continue;
					};
					if let Some(size) = node.size.as_mut() {
						size.width = new.width.or(size.width);
						size.height = new.height.or(size.height);
						self.touch();
					}
				}
				NodeChange::Dimensions { .. } => {}
				NodeChange::Select { id, selected: true } => self.select_node(id),
				NodeChange::Select { id, selected: false } => {
					if self.selected_node.as_deref() == Some(id.as_str()) {
						self.clear_selection();
					}
				}
				NodeChange::Remove { id } => self.remove_node(id),
			}
		}
	}

	/// Applies canvas edge changes. Edges are never moved, so only selection
	/// and removal matter.
	pub fn apply_edge_changes(&mut self, changes: &[EdgeChange]) {
		for change in changes {
			match change {
				EdgeChange::Select { id, selected: true } => self.select_edge(id),
				EdgeChange::Select { id, selected: false } => {
					if self.selected_edge.as_deref() == Some(id.as_str()) {
						self.clear_selection();
					}
				}
				EdgeChange::Remove { id } => self.remove_edge(id),
			}
		}
	}

	fn remove_node(&mut self, id: &str) {
		let Some(idx) = self.nodes.iter().position(|n| n.id == id) else {
			return;
		};
		let node = self.nodes.remove(idx);
		if !is_temp_id(&node.id) {
			self.removed_nodes.push(node.id.clone());
		}
		let attached: Vec<String> = self
			.edges
			.iter()
			.filter(|e| e.touches(id))
			.map(|e| e.id.clone())
			.collect();
		for edge in attached {
			self.remove_edge(&edge);
		}
		if self.selected_node.as_deref() == Some(id) {
			self.selected_node = None;
		}
		self.touch();
	}

	fn remove_edge(&mut self, id: &str) {
		let Some(idx) = self.edges.iter().position(|e| e.id == id) else {
			return;
		};
		let edge = self.edges.remove(idx);
		if !is_temp_id(&edge.id) {
			self.removed_edges.push(edge.id);
		}
		if self.selected_edge.as_deref() == Some(id) {
			self.selected_edge = None;
		}
		self.touch();
	}

	/// Adds an edge for a user-drawn connection. Self-loops and duplicates
	/// are accepted; endpoints must exist.
	pub fn connect(&mut self, params: Connection) -> Result<&EditorEdge> {
		for end in [&params.source, &params.target] {
			if self.node(end).is_none() {
				return Err(FlowError::UnknownNode(end.clone()));
			}
		}
		let id = self.temp_id();
		log::debug!("Connecting {} -> {} as {}", params.source, params.target, id);
		self.edges.push(EditorEdge {
			id,
			source: params.source,
			target: params.target,
			source_handle: params.source_handle,
			target_handle: params.target_handle,
			label: None,
			stroke: EdgeStroke::default(),
			edge_type: None,
			marker_end: Some(MarkerEnd::ArrowClosed),
			selected: false,
		});
		self.touch();
		Ok(&self.edges[self.edges.len() - 1])
	}

	/// Adds a node of `kind` with its default payload, returning its temp id.
	pub fn add_node(&mut self, kind: NodeKind, position: XYPosition) -> String {
		let id = self.temp_id();
		let payload = match kind {
			NodeKind::Database => object(json!({
				"fields": [{ "name": "id", "type": "uuid", "primary": true, "unique": false }]
			})),
			NodeKind::Note => object(json!({ "content": "" })),
			NodeKind::Circle => object(json!({ "radius": 60 })),
			NodeKind::Rectangle | NodeKind::Diamond => Map::new(),
		};
		self.nodes.push(EditorNode {
			id: id.clone(),
			kind,
			position,
			data: NodeData {
				label: format!("New {}", kind.title()),
				description: String::new(),
				payload,
				style: NodeStyle::default(),
			},
			size: Some(NodeSize::default()),
			selected: false,
		});
		self.touch();
		id
	}

	/// Replaces a node's label.
	pub fn set_node_label(&mut self, id: &str, label: &str) -> Result<()> {
		let node = self.node_mut(id)?;
		node.data.label = label.to_owned();
		self.touch();
		Ok(())
	}

	/// Replaces a node's description.
	pub fn set_node_description(&mut self, id: &str, description: &str) -> Result<()> {
		let node = self.node_mut(id)?;
		node.data.description = description.to_owned();
		self.touch();
		Ok(())
	}

	/// Replaces or clears an edge's label.
	pub fn set_edge_label(&mut self, id: &str, label: Option<String>) -> Result<()> {
		let edge = self.edge_mut(id)?;
		edge.label = label.filter(|l| !l.is_empty());
		self.touch();
		Ok(())
	}

	/// Switches between curved and smooth-step drawing.
	pub fn set_edge_kind(&mut self, id: &str, kind: EdgeKind) -> Result<()> {
		let edge = self.edge_mut(id)?;
		edge.edge_type = Some(kind);
		self.touch();
		Ok(())
	}

	fn node_mut(&mut self, id: &str) -> Result<&mut EditorNode> {
		self.nodes
			.iter_mut()
			.find(|n| n.id == id)
			.ok_or_else(|| FlowError::UnknownNode(id.to_owned()))
	}

	fn edge_mut(&mut self, id: &str) -> Result<&mut EditorEdge> {
		self.edges
			.iter_mut()
			.find(|e| e.id == id)
			.ok_or_else(|| FlowError::UnknownEdge(id.to_owned()))
	}

	// ---- selection ----

	/// Selects one node; any edge selection is cleared.
	pub fn select_node(&mut self, id: &str) {
		if self.node(id).is_none() {
			return;
		}
		self.selected_node = Some(id.to_owned());
		self.selected_edge = None;
		self.sync_selection_flags();
	}

	/// Selects one edge; any node selection is cleared.
	pub fn select_edge(&mut self, id: &str) {
		if self.edge(id).is_none() {
			return;
		}
		self.selected_edge = Some(id.to_owned());
		self.selected_node = None;
		self.sync_selection_flags();
	}

	/// Deselects everything.
	pub fn clear_selection(&mut self) {
		self.selected_node = None;
		self.selected_edge = None;
		self.sync_selection_flags();
	}

	fn sync_selection_flags(&mut self) {
		for node in &mut self.nodes {
			node.selected = self.selected_node.as_deref() == Some(node.id.as_str());
		}
		for edge in &mut self.edges {
			edge.selected = self.selected_edge.as_deref() == Some(edge.id.as_str());
		}
	}

	// ---- save ----

	/// Enters `Saving` and snapshots everything that has to be written.
	pub fn begin_save(&mut self) -> Result<SavePlan> {
		self.ensure_idle_io()?;
		let flow_id = self.flow_id.clone().ok_or(FlowError::NoFlowLoaded)?;
		self.phase = WorkspacePhase::Saving;
		Ok(SavePlan {
			flow_id,
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
			removed_nodes: self.removed_nodes.clone(),
			removed_edges: self.removed_edges.clone(),
			revision: self.revision,
		})
	}

	/// Folds a save report back in: created entities take their backend ids,
	/// finished deletes leave the tombstone list. Runs for failed saves too,
	/// so a retry does not create the same rows twice.
	pub fn finish_save(&mut self, report: SaveReport, notifier: &impl Notifier) -> Result<()> {
		for (temp, real) in &report.created_nodes {
			match self.nodes.iter_mut().find(|n| &n.id == temp) {
				Some(node) => node.id = real.clone(),
				// removed while the save was in flight
				None => self.removed_nodes.push(real.clone()),
			}
			for edge in &mut self.edges {
				if &edge.source == temp {
					edge.source = real.clone();
				}
				if &edge.target == temp {
					edge.target = real.clone();
				}
			}
			if self.selected_node.as_ref() == Some(temp) {
				self.selected_node = Some(real.clone());
			}
		}
		for (temp, real) in &report.created_edges {
			match self.edges.iter_mut().find(|e| &e.id == temp) {
				Some(edge) => edge.id = real.clone(),
				None => self.removed_edges.push(real.clone()),
			}
			if self.selected_edge.as_ref() == Some(temp) {
				self.selected_edge = Some(real.clone());
			}
		}
		self.removed_nodes.retain(|id| !report.deleted_nodes.contains(id));
		self.removed_edges.retain(|id| !report.deleted_edges.contains(id));
		self.phase = WorkspacePhase::Ready;

		match report.error {
			Some(source) => {
				let err = FlowError::Save { source };
				log::error!("{}", err);
				notifier.error("Failed to save flow");
				Err(err)
			}
			None => {
				self.saved_revision = report.revision;
				log::info!(
					"Saved flow: {} created, {} updated, {} deleted",
					report.created_nodes.len() + report.created_edges.len(),
					report.updated_nodes + report.updated_edges,
					report.deleted_nodes.len() + report.deleted_edges.len()
				);
				notifier.success("Flow saved");
				Ok(())
			}
		}
	}

	/// Writes every node and edge back to `store`.
	pub async fn save<S, N>(&mut self, store: &S, notifier: &N) -> Result<()>
	where
		S: FlowStore + ?Sized,
		N: Notifier,
	{
		let plan = self.begin_save()?;
		let report = execute_save(store, &plan).await;
		self.finish_save(report, notifier)
	}

	/// A fresh `temp-<millis>` id, suffixed when that id is already taken.
	fn temp_id(&self) -> String {
		let base = format!("{}{}", TEMP_ID_PREFIX, now_millis());
		let taken = |id: &str| self.node(id).is_some() || self.edge(id).is_some();
		if !taken(&base) {
			return base;
		}
		let mut n = 1;
		loop {
			let candidate = format!("{}-{}", base, n);
			if !taken(&candidate) {
				return candidate;
			}
			n += 1;
		}
	}
}

/// Lists both row kinds for `flow_id`.
pub async fn fetch_flow<S: FlowStore + ?Sized>(store: &S, flow_id: &str) -> Result<FlowRows> {
	let load_err = |source| FlowError::Load {
		flow_id: flow_id.to_owned(),
		source,
	};
	let nodes = store.list_nodes(flow_id).await.map_err(load_err)?;
	let connections = store.list_connections(flow_id).await.map_err(load_err)?;
	Ok(FlowRows { nodes, connections })
}

/// Runs a save plan: nodes, then edges, then deletes. Stops at the first
/// failure; nothing already written is undone.
pub async fn execute_save<S: FlowStore + ?Sized>(store: &S, plan: &SavePlan) -> SaveReport {
	let mut report = SaveReport {
		revision: plan.revision,
		..Default::default()
	};
	if let Err(err) = write_plan(store, plan, &mut report).await {
		report.error = Some(err);
	}
	report
}

async fn write_plan<S: FlowStore + ?Sized>(
	store: &S,
	plan: &SavePlan,
	report: &mut SaveReport,
) -> Result<(), StoreError> {
	for node in &plan.nodes {
		let body = node_body(node, &plan.flow_id);
		if is_temp_id(&node.id) {
			let row = store.create_node(&body).await?;
			report.created_nodes.insert(node.id.clone(), row.id);
		} else {
			store.update_node(&node.id, &body).await?;
			report.updated_nodes += 1;
		}
	}
	for edge in &plan.edges {
		let body = connection_body(edge, &plan.flow_id, &report.created_nodes);
		if is_temp_id(&edge.id) {
			let row = store.create_connection(&body).await?;
			report.created_edges.insert(edge.id.clone(), row.id);
		} else {
			store.update_connection(&edge.id, &body).await?;
			report.updated_edges += 1;
		}
	}
	for id in &plan.removed_edges {
		store.delete_connection(id).await?;
		report.deleted_edges.push(id.clone());
	}
	for id in &plan.removed_nodes {
		store.delete_node(id).await?;
		report.deleted_nodes.push(id.clone());
	}
	Ok(())
}

fn object(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		_ => Map::new(),
	}
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> u64 {
	js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or_default()
}
