//! UI-free flow model: persisted rows, the editor graph, conversions between
//! them and the workspace that owns one open flow.

pub mod convert;
pub mod editor;
pub mod model;
pub mod notify;
pub mod workspace;

pub use editor::{
	Connection, EdgeChange, EdgeKind, EditorEdge, EditorNode, NodeChange, NodeData, NodeSize,
	XYPosition,
};
pub use model::{NodeKind, Port};
pub use notify::{LogNotifier, Notifier};
pub use workspace::{FlowWorkspace, WorkspacePhase};
