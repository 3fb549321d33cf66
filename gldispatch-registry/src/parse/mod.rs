use crate::error::RegistryError;
use crate::link;
use crate::registry::Registry;
use std::fs::File;
use std::io::Read;
use std::path::Path;

mod command;
mod enums;
mod feature;

pub(crate) use enums::EnumsBlockAttrs;

impl Registry {
    /// Parse and link a registry document from disk.
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Registry, RegistryError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut contents))
            .map_err(|e| RegistryError::IOError(path.to_path_buf(), e))?;
        Registry::parse_str(&contents)
    }

    /// Parse and link a registry document held in memory.
    ///
    /// Construction order is load-bearing: features, extensions, commands
    /// and enum blocks are parsed unlinked, then the linker derives the
    /// canonical enum table and vendor-namespace set and resolves every
    /// `<require>` reference. See [`crate::link`] internals for the order.
    pub fn parse_str(document: &str) -> Result<Registry, RegistryError> {
        let doc = roxmltree::Document::parse(document)?;
        let root = doc.root_element();
        if !root.has_tag_name("registry") {
            return Err(RegistryError::NotARegistry);
        }

        let features = root
            .children()
            .filter(|n| n.has_tag_name("feature"))
            .map(feature::parse_feature)
            .collect::<Result<_, _>>()?;

        let extensions = feature::parse_extensions(root)?;

        let commands = root
            .children()
            .filter(|n| n.has_tag_name("commands"))
            .flat_map(|n| n.children().filter(|c| c.has_tag_name("command")))
            .map(command::parse_command)
            .collect::<Result<_, _>>()?;

        let mut enum_groups = Vec::new();
        for block in root.children().filter(|n| n.has_tag_name("enums")) {
            if let Some(group) = enums::parse_enum_group(block)? {
                enum_groups.push(group);
            }
        }

        let mut registry = Registry {
            features,
            extensions,
            commands,
            enum_groups,
            enums: Default::default(),
            vendor_namespaces: Default::default(),
        };
        link::link(&mut registry)?;
        Ok(registry)
    }
}

/// Fetch a mandatory attribute, failing fast when it is absent.
pub(crate) fn require_attr<'a>(
    node: roxmltree::Node<'a, '_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<&'a str, RegistryError> {
    node.attribute(attribute)
        .ok_or(RegistryError::MissingAttribute { element, attribute })
}

/// Collect the command and enum names referenced by a feature's or
/// extension's `<require>` blocks. References stay unresolved until linking.
pub(crate) fn parse_require_lists(
    node: roxmltree::Node,
) -> Result<(Vec<String>, Vec<String>), RegistryError> {
    let mut commands = Vec::new();
    let mut enums = Vec::new();
    for require in node.children().filter(|n| n.has_tag_name("require")) {
        for child in require.children() {
            if child.has_tag_name("command") {
                commands.push(require_attr(child, "command", "name")?.to_string());
            } else if child.has_tag_name("enum") {
                enums.push(require_attr(child, "enum", "name")?.to_string());
            }
        }
    }
    Ok((commands, enums))
}
