//! include-trim-core
//!
//! Core library for shrinking the `#include` set of a C/C++ source tree by trial removal.
//!
//! Each include directive of each discovered file is removed in turn, the project is rebuilt
//! with a user-supplied command, and the removal is kept only if the build still passes.
//! Discovery, editing and build verification sit behind traits so the minimizer can be driven
//! against the real filesystem or against fakes in tests.
//!
//! All substantive logic lives here so it is fully testable and reusable from the CLI.

pub mod config;
pub mod corpus;
pub mod editor;
pub mod error;
pub mod model;
pub mod oracle;
pub mod services;

pub use error::{TrimError, TrimResult};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
