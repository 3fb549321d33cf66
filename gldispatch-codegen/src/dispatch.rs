//! Resolution chains.
//!
//! Turns a dispatch set's ordered `(category, command)` pairs into the C
//! condition/action chain its resolver evaluates top to bottom. The first
//! true condition wins, binds the dispatch pointer, and the pointer is never
//! re-resolved short of an explicit reset.

use crate::cluster::{Category, DispatchSet};
use gldispatch_registry::Api;

/// One branch of a resolver: a C availability condition and the statement
/// executed when it holds. The terminal branch has the condition "true".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub condition: String,
    pub code: String,
}

/// Entry points the registry document under-reports: each is also exposed by
/// a second extension whose name never appears in the command's requirement
/// links. A hand-maintained patch for a registry inaccuracy, not a general
/// mechanism.
///
/// The two ARB instanced-draw functions are exposed by
/// GL_ARB_instanced_arrays in addition to GL_ARB_draw_instanced, but the
/// document only records the latter.
pub(crate) const EXTRA_EXTENSION_CONDITIONS: &[(&str, &str)] = &[
    ("glDrawArraysInstancedARB", "GL_ARB_instanced_arrays"),
    ("glDrawElementsInstancedARB", "GL_ARB_instanced_arrays"),
];

/// The dispatch-API constant checked for a version category, and the version
/// that comes with selecting that API. The base version's entry points are
/// always present once the API is selected, so resolvers skip the redundant
/// version check at the base version.
fn dispatch_api_and_base(api: Api, version: u32) -> (&'static str, u32) {
    match api {
        Api::Gl | Api::GlCore => ("GLD_DISPATCH_GL", 10),
        _ if version >= 20 => ("GLD_DISPATCH_ES2", 20),
        _ => ("GLD_DISPATCH_ES1", 11),
    }
}

/// Compute the ordered resolution chain for a dispatch set, ending in the
/// unconditional "unsupported" branch.
pub fn resolutions(ds: &DispatchSet) -> Vec<Resolution> {
    let dispatch_name = ds.dispatch_name();
    let mut chain = Vec::with_capacity(ds.pairs.len() + 1);

    for (category, command) in &ds.pairs {
        let (condition, getter) = match *category {
            Category::Version { api, version } => {
                let (api_constant, base_version) = dispatch_api_and_base(api, version);
                let mut condition = format!("dispatch_api == {api_constant}");
                if version != base_version {
                    condition.push_str(&format!(" && check_version({version})"));
                }
                let getter = format!("get_core_proc(\"{}\", {version})", command.name);
                (condition, getter)
            }
            Category::Extension { name } => (
                format!("check_extension(\"{name}\")"),
                format!("get_ext_proc(\"{}\")", command.name),
            ),
        };

        let code = format!("{dispatch_name} = (void*) {getter};");
        chain.push(Resolution {
            condition,
            code: code.clone(),
        });

        for (patched, extension) in EXTRA_EXTENSION_CONDITIONS {
            if command.name == *patched {
                chain.push(Resolution {
                    condition: format!("check_extension(\"{extension}\")"),
                    code: code.clone(),
                });
            }
        }
    }

    let short_name = ds.primary.name.strip_prefix("gl").unwrap_or(&ds.primary.name);
    chain.push(Resolution {
        condition: "true".to_string(),
        code: format!("unsupported(\"{short_name}\");"),
    });
    chain
}

#[cfg(test)]
mod test {
    use super::resolutions;
    use crate::cluster::compute_dispatch_sets;
    use gldispatch_registry::Registry;

    fn registry() -> Registry {
        Registry::parse_str(
            r#"
            <registry>
                <commands namespace="GL">
                    <command>
                        <proto>void *<name>glMapBuffer</name></proto>
                        <param><ptype>GLenum</ptype> <name>target</name></param>
                        <param><ptype>GLenum</ptype> <name>access</name></param>
                    </command>
                    <command>
                        <proto>void *<name>glMapBufferARB</name></proto>
                        <param><ptype>GLenum</ptype> <name>target</name></param>
                        <param><ptype>GLenum</ptype> <name>access</name></param>
                        <alias name="glMapBuffer"/>
                    </command>
                    <command>
                        <proto>void <name>glClear</name></proto>
                        <param><ptype>GLbitfield</ptype> <name>mask</name></param>
                    </command>
                </commands>
                <feature api="gl" name="GL_VERSION_1_0" number="1.0">
                    <require><command name="glClear"/></require>
                </feature>
                <feature api="gl" name="GL_VERSION_1_5" number="1.5">
                    <require><command name="glMapBuffer"/></require>
                </feature>
                <extensions>
                    <extension name="GL_ARB_vertex_buffer_object" supported="gl">
                        <require><command name="glMapBufferARB"/></require>
                    </extension>
                </extensions>
            </registry>
            "#,
        )
        .unwrap()
    }

    #[test]
    fn core_versions_are_checked_before_extensions() {
        let registry = registry();
        let sets = compute_dispatch_sets(&registry).unwrap();
        let map_buffer = sets.iter().find(|s| s.primary.name == "glMapBuffer").unwrap();

        let chain = resolutions(map_buffer);
        assert_eq!(chain.len(), 3);
        assert_eq!(
            chain[0].condition,
            "dispatch_api == GLD_DISPATCH_GL && check_version(15)"
        );
        assert_eq!(
            chain[0].code,
            "gld_dispatch_glMapBuffer = (void*) get_core_proc(\"glMapBuffer\", 15);"
        );
        assert_eq!(
            chain[1].condition,
            "check_extension(\"GL_ARB_vertex_buffer_object\")"
        );
        assert_eq!(
            chain[1].code,
            "gld_dispatch_glMapBuffer = (void*) get_ext_proc(\"glMapBufferARB\");"
        );
        assert_eq!(chain[2].condition, "true");
        assert_eq!(chain[2].code, "unsupported(\"MapBuffer\");");
    }

    #[test]
    fn base_version_check_is_elided() {
        let registry = registry();
        let sets = compute_dispatch_sets(&registry).unwrap();
        let clear = sets.iter().find(|s| s.primary.name == "glClear").unwrap();

        let chain = resolutions(clear);
        // GL 1.0 is the base version of the GL profile, so no check_version.
        assert_eq!(chain[0].condition, "dispatch_api == GLD_DISPATCH_GL");
    }

    #[test]
    fn instanced_draw_entry_points_get_the_extra_extension_branch() {
        let registry = Registry::parse_str(
            r#"
            <registry>
                <commands namespace="GL">
                    <command>
                        <proto>void <name>glDrawArraysInstancedARB</name></proto>
                    </command>
                </commands>
                <extensions>
                    <extension name="GL_ARB_draw_instanced" supported="gl">
                        <require><command name="glDrawArraysInstancedARB"/></require>
                    </extension>
                </extensions>
            </registry>
            "#,
        )
        .unwrap();
        let sets = compute_dispatch_sets(&registry).unwrap();
        let chain = resolutions(&sets[0]);

        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].condition, "check_extension(\"GL_ARB_draw_instanced\")");
        assert_eq!(chain[1].condition, "check_extension(\"GL_ARB_instanced_arrays\")");
        assert_eq!(chain[1].code, chain[0].code);
        assert_eq!(chain[2].condition, "true");
    }
}
