//! The flow editing screen.

mod component;
mod inspector;

pub use component::FlowEditor;
