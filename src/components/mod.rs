//! UI components.

pub mod flow_canvas;
pub mod flow_workspace;
pub mod node_shapes;
pub mod toast;
