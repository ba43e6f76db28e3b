//! Build-phase behavior: dispatch, attribute evaluation, id registration
//! and structural validation.

mod test_helpers;

use test_helpers::{compile, compile_err, compile_xr};
use vkml::{Compiler, LayoutError, NodeKind};

#[test]
fn minimal_device_graph() {
    let layout = compile(
        r#"
        <Engine>
            <Renderer applicationName="demo" validation="true">
                <Device>
                    <Queue id="q" capabilities="Graphics Present" priority="0.5"/>
                </Device>
            </Renderer>
        </Engine>
        "#,
    );

    let renderer = layout.renderer.expect("renderer singleton");
    let renderer = layout.get(renderer);
    assert_eq!(renderer.application_name.as_deref(), Some("demo"));
    assert!(renderer.validation);
    assert_eq!(renderer.devices.len(), 1);

    let device = layout.device.expect("device singleton");
    let device = layout.get(device);
    assert_eq!(device.queues.len(), 1);

    let queue = layout.get(device.queues[0]);
    assert_eq!(queue.base.id.as_deref(), Some("q"));
    assert_eq!(
        queue.capabilities,
        vec![
            vkml::QueueCapability::Graphics,
            vkml::QueueCapability::Present
        ]
    );
    assert!((queue.priority - 0.5).abs() < f32::EPSILON);
}

#[test]
fn expressions_and_constants() {
    let layout = compile(
        r#"
        <Engine>
            <Constant name="width" value="10"/>
            <Constant name="align" value="256"/>
            <Buffer id="b" size="2*width" usage="VertexBuffer"/>
            <Buffer id="staging" size="max(align, 64)" usage="TransferSrc"/>
            <Image id="img" format="R8G8B8A8Unorm" width="width*2" height="width*2"/>
        </Engine>
        "#,
    );
    assert_eq!(layout.nodes.buffers[0].size, 20);
    assert_eq!(layout.nodes.buffers[1].size, 256);
    assert_eq!(layout.nodes.images[0].width, 20);
    assert_eq!(layout.nodes.images[0].height, 20);
}

#[test]
fn constants_reset_between_compiles() {
    let mut compiler = Compiler::new();
    compiler
        .compile(r#"<Engine><Constant name="width" value="10"/></Engine>"#)
        .unwrap();

    // The table was reseeded, so "width" is gone in the next document.
    let err = compiler
        .compile(r#"<Engine><Buffer id="b" size="width"/></Engine>"#)
        .unwrap_err();
    match err {
        LayoutError::Expression { element, attr, .. } => {
            assert_eq!(element, "Buffer");
            assert_eq!(attr, "size");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_id_is_rejected() {
    let err = compile_err(
        r#"
        <Engine>
            <Buffer id="x" size="16"/>
            <Semaphore id="x"/>
        </Engine>
        "#,
    );
    match err {
        LayoutError::DuplicateId { id, first, second } => {
            assert_eq!(id, "x");
            assert_eq!(first, NodeKind::Buffer);
            assert_eq!(second, NodeKind::Semaphore);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unknown_element_is_fatal() {
    let err = compile_err(r#"<Engine><Bufer id="b" size="16"/></Engine>"#);
    match err {
        LayoutError::UnknownElement(name) => assert_eq!(name, "Bufer"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn root_must_be_engine() {
    let err = compile_err(r#"<Renderer/>"#);
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn nested_engine_is_rejected() {
    let err = compile_err(r#"<Engine><Engine/></Engine>"#);
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn malformed_xml_is_reported() {
    let err = compile_err("<Engine><Buffer");
    assert!(matches!(err, LayoutError::Xml(_)));
}

#[test]
fn duplicate_singleton_is_rejected() {
    let err = compile_err(r#"<Engine><Renderer/><Renderer/></Engine>"#);
    match err {
        LayoutError::DuplicateSingleton(kind) => assert_eq!(kind, NodeKind::Renderer),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_required_attribute() {
    let err = compile_err(r#"<Engine><Buffer id="b"/></Engine>"#);
    match err {
        LayoutError::MissingAttribute { element, attr } => {
            assert_eq!(element, "Buffer");
            assert_eq!(attr, "size");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_enum_token() {
    let err = compile_err(r#"<Engine><Buffer id="b" size="16" usage="VertexBufer"/></Engine>"#);
    match err {
        LayoutError::InvalidAttribute { element, attr, value } => {
            assert_eq!(element, "Buffer");
            assert_eq!(attr, "usage");
            assert_eq!(value, "VertexBufer");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_bool_token() {
    let err = compile_err(r#"<Engine><Buffer id="b" size="16" realize="yes"/></Engine>"#);
    assert!(matches!(err, LayoutError::InvalidAttribute { attr: "realize", .. }));
}

#[test]
fn realize_flag_defaults_to_true() {
    let layout = compile(
        r#"
        <Engine>
            <Buffer id="a" size="16"/>
            <Buffer id="b" size="16" realize="false"/>
        </Engine>
        "#,
    );
    assert!(layout.nodes.buffers[0].base.realize);
    assert!(!layout.nodes.buffers[1].base.realize);
}

#[test]
fn queue_outside_device_is_rejected() {
    let err = compile_err(r#"<Engine><Queue id="q"/></Engine>"#);
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn command_outside_container_is_rejected() {
    let err = compile_err(r#"<Engine><Draw vertexCount="3"/></Engine>"#);
    assert!(matches!(err, LayoutError::InvalidStructure(_)));
}

#[test]
fn xr_tags_require_the_reality_option() {
    let xml = r#"
        <Engine>
            <Renderer>
                <Device>
                    <Queue id="q"/>
                </Device>
            </Renderer>
            <Session id="s" device="dev" queue="q"/>
        </Engine>
    "#;
    // Session references a missing device id on purpose below; first check
    // the tag is not even recognized without the option.
    let err = compile_err(xml);
    match err {
        LayoutError::UnknownElement(name) => assert_eq!(name, "Session"),
        other => panic!("unexpected error: {other:?}"),
    }

    let xml = r#"
        <Engine>
            <Renderer>
                <Device id="dev">
                    <Queue id="q"/>
                </Device>
            </Renderer>
            <Session id="s" device="dev" queue="q"/>
        </Engine>
    "#;
    let layout = compile_xr(xml).expect("XR document should compile");
    assert!(layout.session.is_some());
}

#[test]
fn deep_nesting_does_not_recurse() {
    // A pathologically deep command-group chain; the walker's explicit
    // stack must handle it without growing the machine stack.
    let depth = 4000;
    let mut xml = String::from(r#"<Engine><CommandGroup id="g0">"#);
    for i in 1..depth {
        xml.push_str(&format!(r#"<CommandGroup id="g{i}">"#));
    }
    for _ in 0..depth {
        xml.push_str("</CommandGroup>");
    }
    xml.push_str("</Engine>");

    let layout = compile(&xml);
    assert_eq!(layout.nodes.command_groups.len(), depth);
    // Each group except the innermost holds exactly its child group.
    assert_eq!(layout.nodes.command_groups[0].commands.len(), 1);
}

#[test]
fn compile_file_round_trip() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<Engine><Buffer id="b" size="128" usage="StorageBuffer"/></Engine>"#
    )
    .unwrap();

    let layout = Compiler::new().compile_file(file.path()).unwrap();
    assert_eq!(layout.nodes.buffers[0].size, 128);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Compiler::new()
        .compile_file("/nonexistent/layout.xml")
        .unwrap_err();
    assert!(matches!(err, LayoutError::Io(_)));
}
