//! Named exception tables for known defects in the registry document.
//!
//! These are documented, hand-maintained patches for specific upstream
//! inaccuracies, kept as data so they can be audited and extended without
//! touching the parser's control flow. They are not a general recovery
//! mechanism; anything else malformed fails parsing outright.

use crate::parse::EnumsBlockAttrs;

/// Parameter names that are reserved words under some C compilers (MSVC
/// treats `near` and `far` as keywords) and the replacements to emit.
pub(crate) const PARAM_NAME_FIXES: &[(&str, &str)] = &[("near", "hither"), ("far", "yon")];

/// Enum names whose numeric value differs across API variants.
///
/// The registry document does not mark these; the list is maintained by
/// hand. Colliding names are excluded from the canonical name->value table
/// entirely, and consumers needing one of the variant values must read it
/// from the owning enum group. The only known case is GL_ACTIVE_PROGRAM_EXT,
/// which is 0x8B8D in GL but 0x8259 in GLES2.
pub(crate) const COLLIDING_ENUMS: &[&str] = &["GL_ACTIVE_PROGRAM_EXT"];

/// Commands whose `alias` declaration in the document is wrong and must be
/// dropped. glDebugMessageInsertARB and glDebugMessageControlARB are marked
/// as aliases of the GL 4.3 core functions, but the core functions accept
/// additional enums for their type and severity parameters.
pub(crate) const DROPPED_ALIASES: &[&str] =
    &["glDebugMessageControlARB", "glDebugMessageInsertARB"];

/// Attribute patches applied to `<enums>` blocks before interpretation.
/// Each entry fires on at most the one block it describes.
pub(crate) const ENUMS_BLOCK_FIXUPS: &[fn(&mut EnumsBlockAttrs)] = &[
    fix_occlusion_query_event_mask,
    fix_arb_block_missing_range,
];

/// The OcclusionQueryEventMaskAMD block misuses `namespace` for its group
/// name and declares neither a group nor a type.
fn fix_occlusion_query_event_mask(attrs: &mut EnumsBlockAttrs) {
    if attrs.namespace.as_deref() == Some("OcclusionQueryEventMaskAMD") {
        attrs.namespace = Some("GL".to_string());
        attrs.group = Some("OcclusionQueryEventMaskAMD".to_string());
        attrs.kind = Some("bitmask".to_string());
    }
}

/// One ARB block covering 0x8000..0x80BF lacks its `start` and `end`
/// attributes.
fn fix_arb_block_missing_range(attrs: &mut EnumsBlockAttrs) {
    if attrs.vendor.as_deref() == Some("ARB")
        && attrs.first_value.as_deref() == Some("0x8000")
        && attrs.last_value.as_deref() == Some("0x80BF")
    {
        attrs.start.get_or_insert_with(|| "0x8000".to_string());
        attrs.end.get_or_insert_with(|| "0x80BF".to_string());
    }
}

/// Whether an `<enums>` block is the unnamed SGI range that duplicates the
/// ARB block above. It is dropped rather than parsed.
pub(crate) fn is_duplicate_range_block(attrs: &EnumsBlockAttrs) -> bool {
    attrs.group.is_none()
        && attrs.vendor.as_deref() == Some("SGI")
        && attrs.start.as_deref() == Some("0x8000")
        && attrs.end.as_deref() == Some("0x80BF")
}
