//! The post-parse linking pass.
//!
//! Runs after all four top-level collections exist, in a fixed order: derive
//! the canonical enum table, derive the vendor-namespace set, resolve every
//! `<require>` reference, then split command names into basename and vendor
//! suffix. The vendor-suffix split must come last because its pattern is
//! built from the full vendor-namespace set.

use crate::error::RegistryError;
use crate::registry::{CanonicalEnum, Registry};
use log::debug;
use regex::Regex;
use std::collections::HashMap;

pub(crate) fn link(registry: &mut Registry) -> Result<(), RegistryError> {
    collect_canonical_enums(registry);
    collect_vendor_namespaces(registry);
    link_requirements(registry)?;
    set_command_name_parts(registry);
    Ok(())
}

/// Build the canonical name->value table from the group-owned enums,
/// excluding colliders. A name defined in several groups keeps its first
/// position and its last value, per the ordered-set replacement rule.
fn collect_canonical_enums(registry: &mut Registry) {
    for group in &registry.enum_groups {
        for enum_ in &group.enums {
            if enum_.is_collider {
                debug!("excluding collider {} from the canonical enum table", enum_.name);
                continue;
            }
            registry.enums.add(CanonicalEnum {
                name: enum_.name.clone(),
                str_value: enum_.str_value.clone(),
                num_value: enum_.num_value,
            });
        }
    }
}

fn collect_vendor_namespaces(registry: &mut Registry) {
    registry.vendor_namespaces = registry
        .extensions
        .iter()
        .filter_map(|ext| ext.vendor_namespace.clone())
        .collect();
}

/// Resolve every requirement reference to the entity it names, populating
/// the per-feature/per-extension sets and the back-references on commands
/// and enums. An unresolved name means the registry is internally
/// inconsistent, which is fatal.
fn link_requirements(registry: &mut Registry) -> Result<(), RegistryError> {
    // Enum requirements resolve against the group-owned enums, not the
    // canonical table: colliders are requirable even though they have no
    // canonical value.
    let enum_owner: HashMap<String, usize> = registry
        .enum_groups
        .iter()
        .enumerate()
        .flat_map(|(slot, group)| group.enums.keys().map(move |name| (name, slot)))
        .collect();

    let mut features = std::mem::take(&mut registry.features);
    for feature in features.iter_mut() {
        for name in &feature.require_commands {
            let Some(command) = registry.commands.get_mut(name) else {
                return Err(RegistryError::UnresolvedCommand {
                    requirer: feature.name.clone(),
                    name: name.clone(),
                });
            };
            debug!("linking command {name} and feature {}", feature.name);
            command.features.add(feature.name.clone());
            feature.commands.add(name.clone());
        }
        for name in &feature.require_enums {
            let Some(&slot) = enum_owner.get(name) else {
                return Err(RegistryError::UnresolvedEnum {
                    requirer: feature.name.clone(),
                    name: name.clone(),
                });
            };
            if let Some(enum_) = registry.enum_groups[slot].enums.get_mut(name) {
                enum_.features.add(feature.name.clone());
            }
            feature.enums.add(name.clone());
        }
    }
    registry.features = features;

    let mut extensions = std::mem::take(&mut registry.extensions);
    for extension in extensions.iter_mut() {
        for name in &extension.require_commands {
            let Some(command) = registry.commands.get_mut(name) else {
                return Err(RegistryError::UnresolvedCommand {
                    requirer: extension.name.clone(),
                    name: name.clone(),
                });
            };
            debug!("linking command {name} and extension {}", extension.name);
            command.extensions.add(extension.name.clone());
            extension.commands.add(name.clone());
        }
        for name in &extension.require_enums {
            let Some(&slot) = enum_owner.get(name) else {
                return Err(RegistryError::UnresolvedEnum {
                    requirer: extension.name.clone(),
                    name: name.clone(),
                });
            };
            if let Some(enum_) = registry.enum_groups[slot].enums.get_mut(name) {
                enum_.extensions.add(extension.name.clone());
            }
            extension.enums.add(name.clone());
        }
    }
    registry.extensions = extensions;

    Ok(())
}

/// Split every command name into basename plus optional vendor suffix.
///
/// The alternation is sorted longest-first so a name carrying one suffix
/// that is a prefix of another always strips the longest match, and so the
/// compiled pattern is identical run to run.
fn set_command_name_parts(registry: &mut Registry) {
    if registry.vendor_namespaces.is_empty() {
        return;
    }

    let mut suffixes: Vec<&str> = registry
        .vendor_namespaces
        .iter()
        .map(String::as_str)
        .collect();
    suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));

    let pattern = format!(
        "^(?P<basename>[a-zA-Z0-9_]+?)(?P<vendor_suffix>{})?$",
        suffixes
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|")
    );
    debug!("splitting command names with {pattern}");
    let regex = Regex::new(&pattern).expect("suffix alternation is escaped");

    for command in registry.commands.iter_mut() {
        let Some(caps) = regex.captures(&command.name) else {
            continue;
        };
        if let Some(basename) = caps.name("basename") {
            command.basename = basename.as_str().to_string();
        }
        command.vendor_suffix = caps
            .name("vendor_suffix")
            .map(|m| m.as_str().to_string());
    }
}
