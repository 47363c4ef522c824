//! Core choreography – progress math, the scroll choreographer, visibility
//! toggling, frame scheduling and the entrance keyframes.
//!
//! Nothing in this module depends on any TUI or rendering crate.  All visual
//! output goes through the [`target::RenderTarget`] trait.

pub mod choreo;
pub mod frame;
pub mod geometry;
pub mod keyframes;
pub mod progress;
pub mod target;
pub mod visibility;
