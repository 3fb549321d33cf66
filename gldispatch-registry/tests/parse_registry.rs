use gldispatch_registry::{Registry, RegistryError};

const REGISTRY_XML: &str = r#"
<registry>
    <commands namespace="GL">
        <command>
            <proto>void <name>glClear</name></proto>
            <param group="ClearBufferMask"><ptype>GLbitfield</ptype> <name>mask</name></param>
        </command>
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
    </commands>
    <enums namespace="GL" start="0x0000" end="0x7FFF" vendor="ARB">
        <enum value="0x0000" name="GL_POINTS"/>
        <enum value="0x0404" name="GL_FRONT"/>
    </enums>
    <enums namespace="GL" group="SpecialNumbers">
        <enum value="0" name="GL_FALSE"/>
    </enums>
    <enums namespace="GL" start="0x8000" end="0xFFFF" vendor="ARB">
        <enum value="0x88B9" name="GL_WRITE_ONLY"/>
        <enum value="0x8B8D" name="GL_ACTIVE_PROGRAM_EXT"/>
    </enums>
    <feature api="gl" name="GL_VERSION_1_0" number="1.0">
        <require>
            <command name="glClear"/>
            <enum name="GL_POINTS"/>
        </require>
    </feature>
    <feature api="gl" name="GL_VERSION_1_5" number="1.5">
        <require>
            <command name="glMapBuffer"/>
            <enum name="GL_WRITE_ONLY"/>
        </require>
    </feature>
    <extensions>
        <extension name="GL_ARB_vertex_buffer_object" supported="gl|glcore">
            <require>
                <command name="glMapBufferARB"/>
                <enum name="GL_WRITE_ONLY"/>
            </require>
        </extension>
        <extension name="GL_EXT_separate_shader_objects" supported="gl|gles2">
            <require>
                <enum name="GL_ACTIVE_PROGRAM_EXT"/>
            </require>
        </extension>
    </extensions>
</registry>
"#;

#[test]
fn features_parse_in_document_order() {
    let registry = Registry::parse_str(REGISTRY_XML).unwrap();
    let names: Vec<_> = registry.features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["GL_VERSION_1_0", "GL_VERSION_1_5"]);
    assert_eq!(registry.features.iter().map(|f| f.version).collect::<Vec<_>>(), [10, 15]);
}

#[test]
fn requirements_link_back_onto_commands() {
    let registry = Registry::parse_str(REGISTRY_XML).unwrap();

    let map_buffer = registry.commands.get(&"glMapBuffer".to_string()).unwrap();
    assert!(map_buffer.features.contains_key(&"GL_VERSION_1_5".to_string()));
    assert!(map_buffer.extensions.is_empty());

    let map_buffer_arb = registry.commands.get(&"glMapBufferARB".to_string()).unwrap();
    assert!(map_buffer_arb
        .extensions
        .contains_key(&"GL_ARB_vertex_buffer_object".to_string()));
    assert_eq!(map_buffer_arb.alias.as_deref(), Some("glMapBuffer"));
}

#[test]
fn vendor_suffixes_are_split_from_basenames() {
    let registry = Registry::parse_str(REGISTRY_XML).unwrap();
    assert_eq!(
        registry
            .vendor_namespaces
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>(),
        ["ARB", "EXT"]
    );

    let map_buffer_arb = registry.commands.get(&"glMapBufferARB".to_string()).unwrap();
    assert_eq!(map_buffer_arb.basename, "glMapBuffer");
    assert_eq!(map_buffer_arb.vendor_suffix.as_deref(), Some("ARB"));

    let clear = registry.commands.get(&"glClear".to_string()).unwrap();
    assert_eq!(clear.basename, "glClear");
    assert_eq!(clear.vendor_suffix, None);
}

#[test]
fn colliders_are_dropped_from_the_canonical_table() {
    let registry = Registry::parse_str(REGISTRY_XML).unwrap();
    assert!(registry.enums.get(&"GL_ACTIVE_PROGRAM_EXT".to_string()).is_none());
    assert_eq!(
        registry.enums.get(&"GL_WRITE_ONLY".to_string()).unwrap().num_value,
        0x88B9
    );

    // The collider stays reachable through its owning group.
    let group = registry
        .enum_groups
        .iter()
        .find(|g| g.name == "range_0x8000_0xFFFF")
        .unwrap();
    let collider = group.enums.get(&"GL_ACTIVE_PROGRAM_EXT".to_string()).unwrap();
    assert!(collider.is_collider);
    assert!(collider
        .extensions
        .contains_key(&"GL_EXT_separate_shader_objects".to_string()));
}

#[test]
fn unresolved_requirements_are_fatal() {
    let document = r#"
    <registry>
        <commands namespace="GL"/>
        <feature api="gl" name="GL_VERSION_1_0" number="1.0">
            <require><command name="glClear"/></require>
        </feature>
    </registry>
    "#;
    let err = Registry::parse_str(document).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::UnresolvedCommand { ref requirer, ref name }
            if requirer == "GL_VERSION_1_0" && name == "glClear"
    ));
}

#[test]
fn commands_missing_a_name_are_fatal() {
    let document = r#"
    <registry>
        <commands namespace="GL">
            <command><proto>void </proto></command>
        </commands>
    </registry>
    "#;
    assert!(Registry::parse_str(document).is_err());
}
