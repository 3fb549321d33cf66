use crate::error::RegistryError;
use crate::keyed_set::{Keyed, OrderedKeyedSet};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A client API named by the registry.
///
/// `number`-style attributes are strongly typed at parse time; an unknown
/// api string is rejected immediately rather than surfacing later as broken
/// generated code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Api {
    Gl,
    GlCore,
    Gles1,
    Gles2,
}

impl FromStr for Api {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gl" => Ok(Api::Gl),
            "glcore" => Ok(Api::GlCore),
            "gles1" => Ok(Api::Gles1),
            "gles2" => Ok(Api::Gles2),
            _ => Err(RegistryError::UnknownApi(s.to_string())),
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Api::Gl => "gl",
            Api::GlCore => "glcore",
            Api::Gles1 => "gles1",
            Api::Gles2 => "gles2",
        };
        f.write_str(s)
    }
}

/// A `<feature>` element: one versioned core API release and the commands
/// and enums it requires.
#[derive(Debug, Clone)]
pub struct Feature {
    pub api: Api,
    pub name: String,
    /// Ten times the version number, e.g. 15 for version 1.5.
    pub version: u32,
    /// Names of required commands, resolved against [`Registry::commands`]
    /// during linking.
    pub commands: OrderedKeyedSet<String>,
    /// Names of required enums.
    pub enums: OrderedKeyedSet<String>,
    pub(crate) require_commands: Vec<String>,
    pub(crate) require_enums: Vec<String>,
}

impl Feature {
    /// The version as it appears in the document, e.g. "1.5".
    pub fn version_str(&self) -> String {
        format!("{}.{}", self.version / 10, self.version % 10)
    }
}

impl Keyed for Feature {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// An `<extension>` element: one optional capability and the commands and
/// enums it requires.
#[derive(Debug, Clone)]
pub struct Extension {
    pub name: String,
    pub supported_apis: Vec<Api>,
    /// The vendor prefix parsed out of the name, e.g. "ARB" for
    /// `GL_ARB_multitexture`. `None` when the name has no such prefix.
    pub vendor_namespace: Option<String>,
    pub commands: OrderedKeyedSet<String>,
    pub enums: OrderedKeyedSet<String>,
    pub(crate) require_commands: Vec<String>,
    pub(crate) require_enums: Vec<String>,
}

impl Keyed for Extension {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// A `<param>` subelement of a `<command>`.
#[derive(Debug, Clone)]
pub struct CommandParam {
    pub name: String,
    /// The C type, e.g. "const GLchar *".
    pub c_type: String,
}

/// A `<command>` element: one logical entry point.
///
/// Back-references to the features and extensions that require the command
/// are stored as name sets keyed into the registry's owned collections, so
/// the graph stays consistent under regeneration.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    /// The C return type, e.g. "void *".
    pub c_return_type: String,
    /// The canonical command this one is declared a synonym of, if any.
    pub alias: Option<String>,
    pub params: Vec<CommandParam>,
    pub features: OrderedKeyedSet<String>,
    pub extensions: OrderedKeyedSet<String>,
    /// The name with any vendor suffix stripped. Filled during linking, once
    /// the full vendor-namespace set is known.
    pub basename: String,
    pub vendor_suffix: Option<String>,
}

impl Keyed for Command {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

impl Command {
    /// The function-pointer typedef name, e.g. "PFNGLMAPBUFFERPROC".
    pub fn c_funcptr_typedef(&self) -> String {
        format!("PFN{}PROC", self.name).to_uppercase()
    }

    /// "GLenum target, GLenum access", or "void" for a nullary command.
    pub fn c_named_param_list(&self) -> String {
        if self.params.is_empty() {
            return "void".to_string();
        }
        self.params
            .iter()
            .map(|p| format!("{} {}", p.c_type, p.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "GLenum, GLenum", or "void" for a nullary command.
    pub fn c_unnamed_param_list(&self) -> String {
        if self.params.is_empty() {
            return "void".to_string();
        }
        self.params
            .iter()
            .map(|p| p.c_type.clone())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "target, access" -- the argument list of a forwarded call.
    pub fn c_untyped_param_list(&self) -> String {
        self.params
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// A full C declarator with the given name spliced in before the
    /// parameter list. With `anonymous_args` the parameters carry types only,
    /// which is the form function-pointer typedefs use.
    pub fn c_form(&self, name: &str, anonymous_args: bool) -> String {
        let params = if anonymous_args {
            self.c_unnamed_param_list()
        } else {
            self.c_named_param_list()
        };
        format!("{} {}({})", self.c_return_type, name, params)
    }
}

/// The type of an `<enums>` block. Only `bitmask` is ever explicit in the
/// document; the others are inferred (see [`EnumGroup`]).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EnumGroupKind {
    /// The large namespace from 0x0000 to 0xffff that holds, for example,
    /// GL_POINTS and GL_TEXTURE_2D.
    DefaultNamespace,
    Bitmask,
    /// A small namespace of non-bitmask enums, generally small numbers used
    /// for indexed access.
    SmallIndex,
    /// The "SpecialNumbers" group: GL_FALSE, GL_ZERO, GL_INVALID_INDEX and
    /// friends.
    Special,
}

/// An `<enums>` element: a named, typed block of enumerants.
///
/// When the document omits `group` or `type` they are invented: an unnamed
/// block with a start/end range becomes `range_<start>_<end>` in the default
/// namespace, a named block without a type is a small index namespace, and
/// the reserved "SpecialNumbers" name marks the special group.
#[derive(Debug, Clone)]
pub struct EnumGroup {
    pub name: String,
    pub kind: EnumGroupKind,
    pub start: Option<String>,
    pub end: Option<String>,
    pub enums: OrderedKeyedSet<Enum>,
}

impl Keyed for EnumGroup {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// An `<enum>` element.
#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    /// The `api` attribute, present when the value is specific to one API.
    pub api: Option<Api>,
    /// The value as written in the document, suitable for emitting as a C
    /// literal.
    pub str_value: String,
    pub num_value: u64,
    /// Name of the owning [`EnumGroup`].
    pub group: String,
    pub features: OrderedKeyedSet<String>,
    pub extensions: OrderedKeyedSet<String>,
    /// True when this name resolves to different numeric values depending on
    /// the API variant. Colliders are excluded from the canonical name->value
    /// table; their values stay reachable through the owning group.
    pub is_collider: bool,
}

impl Keyed for Enum {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// One row of the canonical name->value table, derived from the group-owned
/// enums after collider exclusion.
#[derive(Debug, Clone)]
pub struct CanonicalEnum {
    pub name: String,
    pub str_value: String,
    pub num_value: u64,
}

impl Keyed for CanonicalEnum {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// The parsed, linked semantic model of the entire API surface.
#[derive(Debug)]
pub struct Registry {
    pub features: OrderedKeyedSet<Feature>,
    pub extensions: OrderedKeyedSet<Extension>,
    pub commands: OrderedKeyedSet<Command>,
    pub enum_groups: Vec<EnumGroup>,
    /// The canonical name->value table, colliders dropped.
    pub enums: OrderedKeyedSet<CanonicalEnum>,
    /// Every vendor prefix seen across extensions, e.g. "ARB", "EXT", "NV".
    pub vendor_namespaces: BTreeSet<String>,
}
