//! lector-core: shared primitives for the lector page reader
//!
//! Provides the base error type, element identity, and the viewport
//! geometry used by the autoscroll logic.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result};
pub use geometry::{autoscroll_target, Rect, ScrollTarget, Viewport};
pub use types::ElementId;
