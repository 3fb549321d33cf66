//! Artifact rendering.
//!
//! Serializes the clustered, ordered model into the C header and source the
//! downstream compiler consumes. Every loop here walks an ordered set or an
//! explicitly sorted vector; for identical input documents the output is
//! byte-identical run to run.
//!
//! The header contains a function-pointer typedef per command, an extern
//! dispatch pointer per cluster with a `#define` aliasing every synonym onto
//! it, plus `#define`s for canonical enums, extensions and core versions.
//! The source contains a resolver and stub per cluster, the dispatch-pointer
//! initializers, `reset_dispatch_pointers()`, and the parallel
//! `function_names`/`function_resolvers` tables.

use crate::cluster::{compute_dispatch_sets, DispatchSet};
use crate::dispatch::resolutions;
use crate::error::CodegenError;
use gldispatch_registry::{Api, Command, Registry};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// File name of the generated header within the output directory.
pub const HEADER_FILE_NAME: &str = "gld_dispatch.h";
/// File name of the generated source within the output directory.
pub const SOURCE_FILE_NAME: &str = "gld_dispatch.c";

const BOILERPLATE: &str = "\
/**
 * Generated from the OpenGL API registry by gldispatch-codegen.
 *
 * DO NOT EDIT!
 *
 * Regenerate this file from the registry document instead of editing it.
 */
";

/// The two rendered artifacts, composed fully in memory so a failed write
/// never leaves a partial file behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDispatch {
    pub header: String,
    pub source: String,
}

/// Render both artifacts for a linked registry.
pub fn generate(registry: &Registry) -> Result<GeneratedDispatch, CodegenError> {
    let dispatch_sets = compute_dispatch_sets(registry)?;

    let mut header = String::from(BOILERPLATE);
    let mut source = String::from(BOILERPLATE);

    // Typedefs for every command signature, sorted by command name.
    let mut commands: Vec<&Command> = registry.commands.iter().collect();
    commands.sort_by(|a, b| a.name.cmp(&b.name));
    for command in &commands {
        let declarator = format!("(APIENTRY *{})", command.c_funcptr_typedef());
        let _ = writeln!(header, "typedef {};", command.c_form(&declarator, true));
    }

    for ds in &dispatch_sets {
        let comments = category_comments(ds);
        header.push_str(&comments);
        source.push_str(&comments);

        let _ = writeln!(
            header,
            "extern {} {};",
            ds.primary.c_funcptr_typedef(),
            ds.dispatch_name()
        );
        for member in &ds.members {
            let _ = writeln!(header, "#define {} {}", member.name, ds.dispatch_name());
        }

        source.push_str(&render_resolver(ds));
        source.push_str(&render_stub(ds));
        let _ = writeln!(
            source,
            "{} {} = {};",
            ds.primary.c_funcptr_typedef(),
            ds.dispatch_name(),
            ds.stub_name()
        );
    }

    source.push_str(&render_pointer_resetter(&dispatch_sets));
    source.push('\n');
    source.push_str(&render_name_and_resolver_tables(&dispatch_sets));

    // Canonical enums, sorted by value then name.
    let mut enums: Vec<_> = registry.enums.iter().collect();
    enums.sort_by(|a, b| {
        a.num_value
            .cmp(&b.num_value)
            .then_with(|| a.name.cmp(&b.name))
    });
    for enum_ in enums {
        let _ = writeln!(header, "#define {} {}", enum_.name, enum_.str_value);
    }

    // One flag per extension, alphabetical.
    header.push('\n');
    let mut extensions: Vec<String> = registry.extensions.keys().collect();
    extensions.sort();
    for name in &extensions {
        let _ = writeln!(header, "#define {name} 1");
    }

    // One flag per known GL core version, ascending.
    header.push('\n');
    let gl_versions: BTreeSet<u32> = registry
        .features
        .iter()
        .filter(|f| f.api == Api::Gl)
        .map(|f| f.version)
        .collect();
    for version in gl_versions {
        let _ = writeln!(
            header,
            "#define GL_VERSION_{}_{} 1",
            version / 10,
            version % 10
        );
    }

    Ok(GeneratedDispatch { header, source })
}

/// Render and persist both artifacts into `out_dir`. Each file is written to
/// a temporary sibling first and moved into place, so downstream tools never
/// observe a truncated artifact.
pub fn write_to_dir(
    registry: &Registry,
    out_dir: impl AsRef<Path>,
) -> Result<GeneratedDispatch, CodegenError> {
    let out_dir = out_dir.as_ref();
    let generated = generate(registry)?;
    persist(&out_dir.join(HEADER_FILE_NAME), &generated.header)?;
    persist(&out_dir.join(SOURCE_FILE_NAME), &generated.source)?;
    Ok(generated)
}

fn persist(path: &Path, contents: &str) -> Result<(), CodegenError> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    fs::write(tmp, contents).map_err(|e| CodegenError::IOError(tmp.to_path_buf(), e))?;
    fs::rename(tmp, path).map_err(|e| CodegenError::IOError(path.to_path_buf(), e))
}

/// "/* glMapBuffer (GL 1.5) */" lines, one per availability pair.
fn category_comments(ds: &DispatchSet) -> String {
    let mut comments = String::from("\n");
    for (category, command) in &ds.pairs {
        let _ = writeln!(comments, "/* {} ({}) */", command.name, category);
    }
    comments
}

/// The resolver checks each availability condition in turn, binds the
/// dispatch pointer on the first hit, and reports the operation unsupported
/// otherwise. "if (true)" branches collapse to plain statements to keep the
/// output palatable and warning-free.
fn render_resolver(ds: &DispatchSet) -> String {
    let chain = resolutions(ds);

    let mut out = String::new();
    let _ = writeln!(out, "static gld_dispatch_function_ptr {}()", ds.resolve_name());
    out.push_str("{\n");

    if chain[0].condition == "true" {
        let _ = writeln!(out, "\t{}", chain[0].code);
    } else {
        let _ = writeln!(out, "\tif ({})\n\t\t{}", chain[0].condition, chain[0].code);
        for resolution in &chain[1..] {
            if resolution.condition == "true" {
                let _ = writeln!(out, "\telse\n\t\t{}", resolution.code);
                break;
            }
            let _ = writeln!(
                out,
                "\telse if ({})\n\t\t{}",
                resolution.condition, resolution.code
            );
        }
    }

    let _ = writeln!(
        out,
        "\treturn (gld_dispatch_function_ptr) {};",
        ds.dispatch_name()
    );
    out.push_str("}\n");
    out
}

/// The stub bound to a dispatch pointer before resolution. It resolves on
/// first call and forwards through the freshly bound pointer.
fn render_stub(ds: &DispatchSet) -> String {
    let primary = ds.primary;

    let mut out = String::new();
    let declarator = format!("APIENTRY {}", ds.stub_name());
    let _ = writeln!(out, "static {}", primary.c_form(&declarator, false));
    out.push_str("{\n");
    out.push_str("\tcheck_initialized();\n");
    let _ = writeln!(out, "\t{}();", ds.resolve_name());
    let _ = writeln!(
        out,
        "\t{}{}({});",
        if primary.c_return_type != "void" { "return " } else { "" },
        ds.dispatch_name(),
        primary.c_untyped_param_list()
    );
    out.push_str("}\n");
    out
}

fn render_pointer_resetter(dispatch_sets: &[DispatchSet]) -> String {
    let mut out = String::new();
    out.push_str("static void\nreset_dispatch_pointers()\n{\n");
    for ds in dispatch_sets {
        let _ = writeln!(out, "\t{} = {};", ds.dispatch_name(), ds.stub_name());
    }
    out.push_str("}\n");
    out
}

/// Parallel tables of every entry-point name and the resolver for its
/// cluster, both sorted by entry-point name.
fn render_name_and_resolver_tables(dispatch_sets: &[DispatchSet]) -> String {
    let mut rows: Vec<(&str, String)> = dispatch_sets
        .iter()
        .flat_map(|ds| {
            ds.members
                .iter()
                .map(|member| (member.name.as_str(), ds.resolve_name()))
        })
        .collect();
    rows.sort();

    let mut out = String::new();
    out.push_str("static const char * const function_names[] = {\n");
    for (name, _) in &rows {
        let _ = writeln!(out, "\t\"{name}\",");
    }
    out.push_str("};\n\n");
    out.push_str("static const gld_dispatch_resolver_ptr function_resolvers[] = {\n");
    for (_, resolver) in &rows {
        let _ = writeln!(out, "\t{resolver},");
    }
    out.push_str("};\n");
    out
}
