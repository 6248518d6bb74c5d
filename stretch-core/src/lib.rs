//! Stretch/squash evaluation for a two-joint IK chain.
//!
//! Main components:
//! - [`evaluator`] — the pure stretch and volume-compensation routine.
//! - [`schema`] — static channel schema (names, defaults, ranges, affects).
//! - [`node`] — the [`node::DependencyNode`] trait and the stretch node.
//! - [`datablock`] — host-side attribute storage with dirty tracking.
//! - [`plugin`] — node type registry and load/unload hooks.
//! - [`config`] — input snapshots loaded from YAML or JSON.
//! - [`pose`] — random joint pose sampling.
//! - [`error`] — the crate error type.
//! - [`types`] — shared ids and plug addressing.

pub mod config;
pub mod datablock;
pub mod error;
pub mod evaluator;
pub mod node;
pub mod plugin;
pub mod pose;
pub mod schema;
pub mod types;

pub use config::StretchInputs;
pub use error::StretchError;
pub use evaluator::{Evaluation, StretchEvaluator, StretchOutput};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
