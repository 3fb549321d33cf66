use std::path::PathBuf;
use thiserror::Error;

/// Error type for registry parsing and linking.
///
/// Every variant is fatal. Generated dispatch code is only correct when the
/// registry document is complete and internally consistent, so there is no
/// best-effort recovery beyond the named fixup tables in [`crate::fixups`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The document is not well-formed XML.
    #[error("malformed registry document")]
    XmlError(#[from] roxmltree::Error),
    /// The registry document could not be read.
    #[error("could not read registry document")]
    IOError(PathBuf, std::io::Error),
    /// The document root is not a `<registry>` element.
    #[error("document root is not <registry>")]
    NotARegistry,
    /// A required attribute is absent.
    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    /// A `<command>` or `<param>` lacks its `<name>` subelement.
    #[error("<{element}> is missing its <name> subelement")]
    MissingName { element: &'static str },
    /// An `api` or `supported` attribute named an API this model does not know.
    #[error("unknown api '{0}'")]
    UnknownApi(String),
    /// A feature `number` attribute was not of the form `major.minor`.
    #[error("malformed version number '{0}'")]
    InvalidVersion(String),
    /// An enum `value` attribute was not a decimal or hex integer literal.
    #[error("enum '{name}' has malformed value '{value}'")]
    InvalidEnumValue { name: String, value: String },
    /// An unnamed `<enums>` block lacked the range attributes needed to
    /// invent a name for it.
    #[error("unnamed <enums> block has no start/end range")]
    UnboundedEnumGroup,
    /// An `<enums>` block declared a type other than "bitmask".
    #[error("unknown <enums> type '{0}'")]
    UnknownEnumGroupType(String),
    /// A `<require>` block referenced a command absent from the command table.
    #[error("'{requirer}' requires unknown command '{name}'")]
    UnresolvedCommand { requirer: String, name: String },
    /// A `<require>` block referenced an enum absent from the enum table.
    #[error("'{requirer}' requires unknown enum '{name}'")]
    UnresolvedEnum { requirer: String, name: String },
}
