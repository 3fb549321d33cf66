//! Dispatch code generation for gldispatch.
//!
//! Consumes a linked [`gldispatch_registry::Registry`] and emits a C
//! header/source pair implementing runtime function-pointer resolution: one
//! dispatch pointer per set of synonymous entry points, bound on first call
//! to whichever implementation the running context exposes, by core version
//! or extension string.
//!
//! The pipeline is `cluster` (partition commands into alias clusters) ->
//! `dispatch` (order each cluster's availability conditions) -> `render`
//! (serialize the two artifacts deterministically).

/// Alias clustering into dispatch sets.
pub mod cluster;
/// Ordered resolution chains.
pub mod dispatch;
/// Error types.
pub mod error;
/// Artifact rendering and output.
pub mod render;

pub use error::CodegenError;
