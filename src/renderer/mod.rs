//! Rendering module
//!
//! `scene` builds a colored triangle list from the simulation snapshot;
//! `pipeline` uploads and draws it with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
