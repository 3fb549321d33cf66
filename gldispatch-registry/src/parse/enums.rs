use crate::error::RegistryError;
use crate::fixups::{self, COLLIDING_ENUMS, ENUMS_BLOCK_FIXUPS};
use crate::keyed_set::OrderedKeyedSet;
use crate::parse::require_attr;
use crate::registry::{Api, Enum, EnumGroup, EnumGroupKind};
use log::debug;

/// The attributes of an `<enums>` block, extracted before interpretation so
/// the fixup tables can patch known upstream defects.
pub(crate) struct EnumsBlockAttrs {
    pub namespace: Option<String>,
    pub group: Option<String>,
    /// The `type` attribute.
    pub kind: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub vendor: Option<String>,
    /// Value of the first `<enum>` subelement, used by range fixups.
    pub first_value: Option<String>,
    /// Value of the last `<enum>` subelement.
    pub last_value: Option<String>,
}

/// Parse an `<enums>` element. Returns `None` for blocks on the drop list.
///
/// Example of a bitmask block:
///
/// ```xml
/// <enums namespace="GL" group="SyncObjectMask" type="bitmask">
///     <enum value="0x00000001" name="GL_SYNC_FLUSH_COMMANDS_BIT"/>
/// </enums>
/// ```
///
/// Example of a block in the default enum namespace, which carries a range
/// instead of a group name:
///
/// ```xml
/// <enums namespace="GL" start="0x0000" end="0x7FFF" vendor="ARB">
///     <enum value="0x0000" name="GL_POINTS"/>
/// </enums>
/// ```
pub(crate) fn parse_enum_group(
    node: roxmltree::Node,
) -> Result<Option<EnumGroup>, RegistryError> {
    let attr = |name: &str| node.attribute(name).map(str::to_string);

    let mut enum_children: Vec<_> = node
        .children()
        .filter(|n| n.has_tag_name("enum"))
        .collect();

    let mut attrs = EnumsBlockAttrs {
        namespace: attr("namespace"),
        group: attr("group"),
        kind: attr("type"),
        start: attr("start"),
        end: attr("end"),
        vendor: attr("vendor"),
        first_value: enum_children
            .first()
            .and_then(|n| n.attribute("value"))
            .map(str::to_string),
        last_value: enum_children
            .last()
            .and_then(|n| n.attribute("value"))
            .map(str::to_string),
    };

    for fixup in ENUMS_BLOCK_FIXUPS {
        fixup(&mut attrs);
    }
    if fixups::is_duplicate_range_block(&attrs) {
        debug!("dropping duplicate range block {:?}..{:?}", attrs.start, attrs.end);
        return Ok(None);
    }

    let (name, kind) = invent_name_and_kind(&attrs)?;

    let enums = enum_children
        .drain(..)
        .map(|n| parse_enum(n, &name))
        .collect::<Result<OrderedKeyedSet<_>, _>>()?;

    debug!("parsed enum group {name} ({} enums)", enums.len());
    Ok(Some(EnumGroup {
        name,
        kind,
        start: attrs.start,
        end: attrs.end,
        enums,
    }))
}

/// The registry only marks `bitmask` blocks explicitly; every other kind is
/// inferred from the block's shape.
fn invent_name_and_kind(
    attrs: &EnumsBlockAttrs,
) -> Result<(String, EnumGroupKind), RegistryError> {
    match (&attrs.group, &attrs.kind) {
        (None, _) => {
            let (Some(start), Some(end)) = (&attrs.start, &attrs.end) else {
                return Err(RegistryError::UnboundedEnumGroup);
            };
            Ok((format!("range_{start}_{end}"), EnumGroupKind::DefaultNamespace))
        }
        (Some(name), _) if name == "SpecialNumbers" => {
            Ok((name.clone(), EnumGroupKind::Special))
        }
        (Some(name), None) => Ok((name.clone(), EnumGroupKind::SmallIndex)),
        (Some(name), Some(kind)) if kind == "bitmask" => {
            Ok((name.clone(), EnumGroupKind::Bitmask))
        }
        (Some(_), Some(kind)) => Err(RegistryError::UnknownEnumGroupType(kind.clone())),
    }
}

fn parse_enum(node: roxmltree::Node, group: &str) -> Result<Enum, RegistryError> {
    let name = require_attr(node, "enum", "name")?.to_string();
    let api = node.attribute("api").map(|s| s.parse::<Api>()).transpose()?;
    let str_value = require_attr(node, "enum", "value")?.to_string();
    let num_value = parse_enum_value(&str_value).ok_or_else(|| {
        RegistryError::InvalidEnumValue {
            name: name.clone(),
            value: str_value.clone(),
        }
    })?;

    let is_collider = COLLIDING_ENUMS.contains(&name.as_str());

    Ok(Enum {
        name,
        api,
        str_value,
        num_value,
        group: group.to_string(),
        features: OrderedKeyedSet::new(),
        extensions: OrderedKeyedSet::new(),
        is_collider,
    })
}

/// Enum values are hex literals when they contain "0x", decimal otherwise.
fn parse_enum_value(value: &str) -> Option<u64> {
    let lowered = value.to_ascii_lowercase();
    match lowered.strip_prefix("0x") {
        Some(digits) => u64::from_str_radix(digits, 16).ok(),
        None => lowered.parse().ok(),
    }
}
