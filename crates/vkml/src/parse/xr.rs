//! Parsers for the XR extension tag set.

use crate::document::{AnyHandle, NodeBase};
use crate::types::*;
use crate::Result;

use super::{attach_step, claim_singleton, structural_parent, Builder, Parsed, XmlNode};

pub(super) fn parse_reality(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Reality {
        base: NodeBase::default(),
        application_name: b.attr_string(el, "applicationName"),
        form_factor: b.attr_enum_or(el, "formFactor", FormFactor::HeadMountedDisplay)?,
        blend_mode: b.attr_enum_or(el, "blendMode", EnvironmentBlendMode::Opaque)?,
    };
    let handle = b.layout.nodes.realities.push(node);
    claim_singleton(&mut b.layout.reality, handle)?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_session(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = Session {
        base: NodeBase::default(),
        device: b.req_reference(el, "device")?,
        queue: b.req_reference(el, "queue")?,
    };
    let handle = b.layout.nodes.sessions.push(node);
    claim_singleton(&mut b.layout.session, handle)?;
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_reference_space(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = ReferenceSpace {
        base: NodeBase::default(),
        session: b.req_reference(el, "session")?,
        space_type: b.attr_enum_or(el, "type", ReferenceSpaceType::Local)?,
        position: b.attr_f32_array(el, "position")?.unwrap_or([0.0; 3]),
        orientation: b
            .attr_f32_array(el, "orientation")?
            .unwrap_or([0.0, 0.0, 0.0, 1.0]),
    };
    Ok(Parsed::Node(
        b.layout.nodes.reference_spaces.push(node).into(),
    ))
}

pub(super) fn parse_composition_layer_projection(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = CompositionLayerProjection {
        base: NodeBase::default(),
        space: b.req_reference(el, "space")?,
        views: Vec::new(),
    };
    Ok(Parsed::Node(
        b.layout.nodes.composition_layer_projections.push(node).into(),
    ))
}

pub(super) fn parse_view(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let layer = structural_parent::<CompositionLayerProjection>(el, parent)?;
    let node = View {
        base: NodeBase::default(),
        layer,
        swapchain: b.req_reference(el, "swapchain")?,
    };
    let handle = b.layout.nodes.views.push(node);
    b.layout.nodes.composition_layer_projections[layer]
        .views
        .push(handle);
    Ok(Parsed::Node(handle.into()))
}

pub(super) fn parse_reality_viewer(
    b: &mut Builder,
    el: XmlNode,
    _parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = RealityViewer {
        base: NodeBase::default(),
        session: b.req_reference(el, "session")?,
        frames: Vec::new(),
    };
    Ok(Parsed::Node(
        b.layout.nodes.reality_viewers.push(node).into(),
    ))
}

pub(super) fn parse_end_frame(
    b: &mut Builder,
    el: XmlNode,
    parent: Option<AnyHandle>,
) -> Result<Parsed> {
    let node = EndFrame {
        base: NodeBase::default(),
        session: b.req_reference(el, "session")?,
        layers: b.reference_list(el, "layers"),
    };
    let handle = b.layout.nodes.end_frames.push(node);
    attach_step(b, parent, handle.into());
    Ok(Parsed::Node(handle.into()))
}
