use crate::error::RegistryError;
use crate::fixups::{DROPPED_ALIASES, PARAM_NAME_FIXES};
use crate::keyed_set::OrderedKeyedSet;
use crate::registry::{Command, CommandParam};
use log::debug;

/// Parse a `<command>` element.
///
/// Example:
///
/// ```xml
/// <command>
///     <proto>void <name>glTexSubImage2D</name></proto>
///     <param group="TextureTarget"><ptype>GLenum</ptype> <name>target</name></param>
///     <param><ptype>GLsizei</ptype> <name>width</name></param>
///     <param len="COMPSIZE(...)">const void *<name>pixels</name></param>
/// </command>
/// ```
pub(crate) fn parse_command(node: roxmltree::Node) -> Result<Command, RegistryError> {
    let proto = node
        .children()
        .find(|n| n.has_tag_name("proto"))
        .ok_or(RegistryError::MissingName { element: "command" })?;
    let name = child_name_text(proto, "command")?.to_string();

    let c_return_type = c_decl_text(proto);

    let mut alias = node
        .children()
        .find(|n| n.has_tag_name("alias"))
        .map(|n| super::require_attr(n, "alias", "name").map(str::to_string))
        .transpose()?;
    if alias.is_some() && DROPPED_ALIASES.contains(&name.as_str()) {
        debug!("dropping known-bad alias declaration on {name}");
        alias = None;
    }

    let params = node
        .children()
        .filter(|n| n.has_tag_name("param"))
        .map(parse_param)
        .collect::<Result<Vec<_>, _>>()?;

    debug!("parsed command {name}");
    Ok(Command {
        // The basename split happens during linking, once every vendor
        // namespace is known.
        basename: name.clone(),
        vendor_suffix: None,
        name,
        c_return_type,
        alias,
        params,
        features: OrderedKeyedSet::new(),
        extensions: OrderedKeyedSet::new(),
    })
}

fn parse_param(node: roxmltree::Node) -> Result<CommandParam, RegistryError> {
    let name = child_name_text(node, "param")?;
    // Rename parameters whose names are reserved words under some compilers.
    let name = PARAM_NAME_FIXES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name);

    Ok(CommandParam {
        name: name.to_string(),
        c_type: c_decl_text(node),
    })
}

fn child_name_text<'a>(
    node: roxmltree::Node<'a, '_>,
    element: &'static str,
) -> Result<&'a str, RegistryError> {
    node.children()
        .find(|n| n.has_tag_name("name"))
        .and_then(|n| n.text())
        .ok_or(RegistryError::MissingName { element })
}

/// Reassemble the C type declared by the mixed text/`<ptype>` content that
/// precedes a `<name>` subelement.
///
/// `<param>const <ptype>GLchar</ptype> *<name>name</name></param>` yields
/// "const GLchar *".
fn c_decl_text(node: roxmltree::Node) -> String {
    let mut pieces: Vec<&str> = Vec::new();
    for child in node.children() {
        if child.has_tag_name("name") {
            break;
        }
        if child.is_text() || child.has_tag_name("ptype") {
            if let Some(text) = child.text() {
                pieces.push(text);
            }
        }
    }
    pieces
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
