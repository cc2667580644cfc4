//! Jenkins REST API services.
//!
//! Exposed via service accessors on the client:
//! - `Client::builds()`
//! - `Client::system()`

pub mod builds;
pub mod system;

pub use builds::*;
pub use system::*;
