use std::path::PathBuf;
use thiserror::Error;

/// Error type for dispatch-set computation and artifact output.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CodegenError {
    /// A generated artifact could not be written.
    #[error("could not write generated file")]
    IOError(PathBuf, std::io::Error),
    /// A command's `alias` attribute named a command absent from the
    /// registry's command table.
    #[error("'{command}' is declared an alias of unknown command '{target}'")]
    UnresolvedAlias { command: String, target: String },
}
