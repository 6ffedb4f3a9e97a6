//! Browser front-end for the interactive globe.
//!
//! The engine crates stay platform-free; everything browser-specific
//! (canvas, events, fetch, wgpu surface) lives here behind the wasm32
//! target gate. `view` holds the camera matrix math, which is plain and
//! testable on any target.

pub mod view;

#[cfg(target_arch = "wasm32")]
mod app;
pub mod wgpu;

#[cfg(target_arch = "wasm32")]
pub use app::*;
