use crate::error::RegistryError;
use crate::keyed_set::OrderedKeyedSet;
use crate::parse::{parse_require_lists, require_attr};
use crate::registry::{Api, Extension, Feature};
use log::debug;
use regex::Regex;

/// Parse a `<feature>` element.
///
/// Example:
///
/// ```xml
/// <feature api="gles2" name="GL_ES_VERSION_3_1" number="3.1">
///     <require>
///         <command name="glDispatchCompute"/>
///         <enum name="GL_COMPUTE_SHADER"/>
///     </require>
/// </feature>
/// ```
pub(crate) fn parse_feature(node: roxmltree::Node) -> Result<Feature, RegistryError> {
    let api = require_attr(node, "feature", "api")?.parse::<Api>()?;
    let name = require_attr(node, "feature", "name")?.to_string();
    let version = parse_version(require_attr(node, "feature", "number")?)?;
    let (require_commands, require_enums) = parse_require_lists(node)?;

    debug!("parsed feature {name} ({api} {}.{})", version / 10, version % 10);
    Ok(Feature {
        api,
        name,
        version,
        commands: OrderedKeyedSet::new(),
        enums: OrderedKeyedSet::new(),
        require_commands,
        require_enums,
    })
}

/// Parse every `<extensions><extension>` element under the registry root.
pub(crate) fn parse_extensions(
    root: roxmltree::Node,
) -> Result<OrderedKeyedSet<Extension>, RegistryError> {
    // The vendor prefix is the first ALL-CAPS segment of the extension name,
    // e.g. "ARB" in GL_ARB_ES2_compatibility.
    let vendor_regex = Regex::new(r"^GL_(?P<vendor_namespace>[A-Z]+)_")
        .expect("vendor prefix pattern is valid");

    root.children()
        .filter(|n| n.has_tag_name("extensions"))
        .flat_map(|n| n.children().filter(|c| c.has_tag_name("extension")))
        .map(|n| parse_extension(n, &vendor_regex))
        .collect()
}

/// Parse an `<extension>` element.
///
/// Example:
///
/// ```xml
/// <extension name="GL_ARB_ES2_compatibility" supported="gl|glcore">
///     <require>
///         <enum name="GL_FIXED"/>
///         <command name="glReleaseShaderCompiler"/>
///     </require>
/// </extension>
/// ```
fn parse_extension(
    node: roxmltree::Node,
    vendor_regex: &Regex,
) -> Result<Extension, RegistryError> {
    let name = require_attr(node, "extension", "name")?.to_string();
    let supported_apis = require_attr(node, "extension", "supported")?
        .split('|')
        .map(str::parse)
        .collect::<Result<Vec<Api>, _>>()?;

    let vendor_namespace = vendor_regex
        .captures(&name)
        .and_then(|caps| caps.name("vendor_namespace"))
        .map(|m| m.as_str().to_string());

    let (require_commands, require_enums) = parse_require_lists(node)?;

    debug!("parsed extension {name}");
    Ok(Extension {
        name,
        supported_apis,
        vendor_namespace,
        commands: OrderedKeyedSet::new(),
        enums: OrderedKeyedSet::new(),
        require_commands,
        require_enums,
    })
}

fn parse_version(number: &str) -> Result<u32, RegistryError> {
    let malformed = || RegistryError::InvalidVersion(number.to_string());
    let (major, minor) = number.split_once('.').ok_or_else(malformed)?;
    let major: u32 = major.parse().map_err(|_| malformed())?;
    let minor: u32 = minor.parse().map_err(|_| malformed())?;
    if minor > 9 {
        return Err(malformed());
    }
    Ok(major * 10 + minor)
}

#[cfg(test)]
mod test {
    use super::parse_version;

    #[test]
    fn version_numbers_are_scaled_by_ten() {
        assert_eq!(parse_version("1.0").unwrap(), 10);
        assert_eq!(parse_version("4.6").unwrap(), 46);
    }

    #[test]
    fn malformed_versions_are_rejected() {
        assert!(parse_version("3").is_err());
        assert!(parse_version("three.one").is_err());
        assert!(parse_version("1.10").is_err());
    }
}
