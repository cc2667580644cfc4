//! Shared request/response types.

pub mod builds;
pub mod common;

pub use builds::*;
pub use common::*;
