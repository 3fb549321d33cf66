use gldispatch_codegen::render::{generate, write_to_dir, HEADER_FILE_NAME, SOURCE_FILE_NAME};
use gldispatch_registry::Registry;

// The classic minimal scenario: one core feature exposing glClear, one
// extension exposing glClearARB as a declared alias of it.
const MINIMAL_XML: &str = r#"
<registry>
    <commands namespace="GL">
        <command>
            <proto>void <name>glClear</name></proto>
            <param><ptype>GLbitfield</ptype> <name>mask</name></param>
        </command>
        <command>
            <proto>void <name>glClearARB</name></proto>
            <param><ptype>GLbitfield</ptype> <name>mask</name></param>
            <alias name="glClear"/>
        </command>
    </commands>
    <enums namespace="GL" start="0x0000" end="0x7FFF" vendor="ARB">
        <enum value="0x0404" name="GL_FRONT"/>
        <enum value="0x0000" name="GL_POINTS"/>
    </enums>
    <feature api="gl" name="GL_VERSION_1_0" number="1.0">
        <require>
            <command name="glClear"/>
            <enum name="GL_POINTS"/>
        </require>
    </feature>
    <extensions>
        <extension name="GL_ARB_clear_buffers" supported="gl">
            <require><command name="glClearARB"/></require>
        </extension>
    </extensions>
</registry>
"#;

#[test]
fn one_cluster_with_both_synonyms_mapped_to_one_pointer() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();
    let generated = generate(&registry).unwrap();

    assert!(generated
        .header
        .contains("extern PFNGLCLEARPROC gld_dispatch_glClear;"));
    assert!(generated
        .header
        .contains("#define glClear gld_dispatch_glClear"));
    assert!(generated
        .header
        .contains("#define glClearARB gld_dispatch_glClear"));
    // one dispatch pointer, not two
    assert!(!generated.header.contains("gld_dispatch_glClearARB"));
}

#[test]
fn resolver_has_two_branches_and_a_terminal_fallback() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();
    let generated = generate(&registry).unwrap();

    // GL 1.0 is the base version, so the version check is elided.
    let expected = "\
static gld_dispatch_function_ptr resolve_glClear()
{
\tif (dispatch_api == GLD_DISPATCH_GL)
\t\tgld_dispatch_glClear = (void*) get_core_proc(\"glClear\", 10);
\telse if (check_extension(\"GL_ARB_clear_buffers\"))
\t\tgld_dispatch_glClear = (void*) get_ext_proc(\"glClearARB\");
\telse
\t\tunsupported(\"Clear\");
\treturn (gld_dispatch_function_ptr) gld_dispatch_glClear;
}
";
    assert!(generated.source.contains(expected));
}

#[test]
fn stub_forwards_through_the_dispatch_pointer() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();
    let generated = generate(&registry).unwrap();

    let expected = "\
static void APIENTRY stub_glClear(GLbitfield mask)
{
\tcheck_initialized();
\tresolve_glClear();
\tgld_dispatch_glClear(mask);
}
";
    assert!(generated.source.contains(expected));
    assert!(generated
        .source
        .contains("PFNGLCLEARPROC gld_dispatch_glClear = stub_glClear;"));
}

#[test]
fn header_carries_enum_extension_and_version_defines() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();
    let generated = generate(&registry).unwrap();

    // enums sorted by value: GL_POINTS (0x0000) before GL_FRONT (0x0404)
    let points = generated.header.find("#define GL_POINTS 0x0000").unwrap();
    let front = generated.header.find("#define GL_FRONT 0x0404").unwrap();
    assert!(points < front);

    assert!(generated.header.contains("#define GL_ARB_clear_buffers 1"));
    assert!(generated.header.contains("#define GL_VERSION_1_0 1"));
}

#[test]
fn name_and_resolver_tables_are_parallel_and_sorted() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();
    let generated = generate(&registry).unwrap();

    let expected = "\
static const char * const function_names[] = {
\t\"glClear\",
\t\"glClearARB\",
};

static const gld_dispatch_resolver_ptr function_resolvers[] = {
\tresolve_glClear,
\tresolve_glClear,
};
";
    assert!(generated.source.contains(expected));
}

#[test]
fn generation_is_deterministic() {
    let first = generate(&Registry::parse_str(MINIMAL_XML).unwrap()).unwrap();
    let second = generate(&Registry::parse_str(MINIMAL_XML).unwrap()).unwrap();
    assert_eq!(first.header, second.header);
    assert_eq!(first.source, second.source);
}

#[test]
fn artifacts_are_written_whole_into_the_output_directory() {
    let registry = Registry::parse_str(MINIMAL_XML).unwrap();

    let out_dir = std::env::temp_dir().join(format!("gldispatch-test-{}", std::process::id()));
    std::fs::create_dir_all(&out_dir).unwrap();

    let generated = write_to_dir(&registry, &out_dir).unwrap();
    let header = std::fs::read_to_string(out_dir.join(HEADER_FILE_NAME)).unwrap();
    let source = std::fs::read_to_string(out_dir.join(SOURCE_FILE_NAME)).unwrap();
    assert_eq!(header, generated.header);
    assert_eq!(source, generated.source);

    std::fs::remove_dir_all(&out_dir).unwrap();
}
