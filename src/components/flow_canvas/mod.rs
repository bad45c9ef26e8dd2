//! Canvas-drawn node-graph editor.

mod component;
mod geometry;
mod render;
mod state;

pub use component::FlowCanvas;
