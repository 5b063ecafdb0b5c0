//! GPU renderer
//!
//! One SDF pass over a fullscreen triangle, fed from two uniform buffers.
//! [`SdfRenderState`] implements [`crate::present::Renderer`].

pub mod sdf_pipeline;

pub use sdf_pipeline::SdfRenderState;
