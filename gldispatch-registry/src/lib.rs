//! Registry model for gldispatch.
//!
//! This crate parses a Khronos `gl.xml`-style registry document into a
//! linked semantic model: [`Feature`]s, [`Extension`]s, [`Command`]s and
//! enum groups, owned by a single [`Registry`]. Parsing fails fast on an
//! incomplete or inconsistent document; the generated dispatch code in
//! `gldispatch-codegen` is only correct when every requirement reference
//! resolves.
//!
//! All model collections are [`OrderedKeyedSet`]s, which preserve order of
//! first insertion. Downstream code generation iterates these (never a hash
//! map), so output is byte-identical run to run.

mod error;
mod fixups;
mod keyed_set;
mod link;
mod parse;
mod registry;

pub use error::*;
pub use keyed_set::{Keyed, OrderedKeyedSet};
pub use registry::*;
