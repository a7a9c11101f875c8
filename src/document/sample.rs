use eframe::egui::{Vec2, vec2};
use node_minimap::config::Color;
use node_minimap::host::{GraphSnapshot, NodeInfo, NodeKind};

use crate::util::stable_pair;

use super::workspace::Workspace;

const ROOT: &str = "Material";
const DETAIL_GROUP: &str = "Material/Detail";

/// A small material graph with frames, reroutes, an empty frame and one
/// nested group, used when no document is given on the command line.
pub fn sample_workspace() -> Workspace {
    let mut workspace = Workspace::new(ROOT);
    workspace.insert_graph(root_graph());
    workspace.insert_graph(detail_graph());
    workspace.link_group(ROOT, "Detail", DETAIL_GROUP);
    workspace
}

fn node(name: &str, type_name: &str, output: &str, location: Vec2) -> NodeInfo {
    let (jx, jy) = stable_pair(name);
    let mut node = NodeInfo::new(
        name,
        location + vec2(jx, jy) * 24.0,
        vec2(150.0, 110.0),
    );
    node.type_name = type_name.to_owned();
    if !output.is_empty() {
        node.output_types = vec![output.to_owned()];
    }
    node
}

fn framed(mut node: NodeInfo, frame: &str) -> NodeInfo {
    node.parent = Some(frame.to_owned());
    node
}

fn frame(name: &str, label: &str, location: Vec2) -> NodeInfo {
    let mut frame = NodeInfo::new(name, location, vec2(200.0, 120.0));
    frame.kind = NodeKind::Frame;
    frame.type_name = "NodeFrame".to_owned();
    frame.label = label.to_owned();
    frame
}

fn reroute(name: &str, location: Vec2) -> NodeInfo {
    let mut reroute = NodeInfo::new(name, location, vec2(16.0, 16.0));
    reroute.kind = NodeKind::Reroute;
    reroute.type_name = "NodeReroute".to_owned();
    reroute
}

fn root_graph() -> GraphSnapshot {
    let mut nodes = vec![
        frame("Frame", "Texture coordinates", vec2(-900.0, -300.0)),
        frame("Frame.001", "Surface", vec2(200.0, -200.0)),
        frame("Frame.002", "Notes", vec2(900.0, 500.0)),
    ];

    let texture_column = [
        ("Texture Coordinate", "ShaderNodeTexCoord", "VECTOR"),
        ("Mapping", "ShaderNodeMapping", "VECTOR"),
        ("Noise Texture", "ShaderNodeTexNoise", "FLOAT"),
        ("Image Texture", "ShaderNodeTexImage", "RGBA"),
    ];
    for (row, (name, type_name, output)) in texture_column.into_iter().enumerate() {
        let location = vec2(-820.0 + (row % 2) as f32 * 190.0, -220.0 + row as f32 * 150.0);
        nodes.push(framed(node(name, type_name, output, location), "Frame"));
    }

    let mut ramp = node("Color Ramp", "ShaderNodeValToRGB", "RGBA", vec2(-280.0, 40.0));
    ramp.label = "Dirt mask".to_owned();
    nodes.push(ramp);
    nodes.push(node("Math", "ShaderNodeMath", "VALUE", vec2(-280.0, 260.0)));
    nodes.push(node("Map Range", "ShaderNodeMapRange", "VALUE", vec2(-80.0, 300.0)));
    nodes.push(reroute("Reroute", vec2(-40.0, 120.0)));
    nodes.push(reroute("Reroute.001", vec2(60.0, 140.0)));

    let surface = [
        ("Mix", "ShaderNodeMixRGB", "RGBA"),
        ("Principled BSDF", "ShaderNodeBsdfPrincipled", "SHADER"),
        ("Bump", "ShaderNodeBump", "VECTOR"),
    ];
    for (row, (name, type_name, output)) in surface.into_iter().enumerate() {
        let location = vec2(260.0 + row as f32 * 60.0, -140.0 + row as f32 * 170.0);
        nodes.push(framed(node(name, type_name, output, location), "Frame.001"));
    }

    let mut detail = node("Detail", "ShaderNodeGroup", "SHADER", vec2(520.0, 360.0));
    detail.kind = NodeKind::Group;
    nodes.push(detail);

    let mut output = node("Material Output", "ShaderNodeOutputMaterial", "", vec2(760.0, 40.0));
    output.color = Color::rgb(0.55, 0.16, 0.2);
    output.use_custom_color = true;
    nodes.push(output);

    GraphSnapshot::new(ROOT, nodes)
}

fn detail_graph() -> GraphSnapshot {
    let mut input = node("Group Input", "NodeGroupInput", "VECTOR", vec2(-400.0, 0.0));
    input.kind = NodeKind::GroupInput;
    let mut output = node("Group Output", "NodeGroupOutput", "", vec2(500.0, 0.0));
    output.kind = NodeKind::GroupOutput;

    let mut nodes = vec![input, output, frame("Frame", "Scratches", Vec2::ZERO)];
    for index in 0..6 {
        let name = format!("Math.{index:03}");
        let location = vec2(
            -150.0 + (index % 3) as f32 * 180.0,
            -200.0 + (index / 3) as f32 * 220.0,
        );
        nodes.push(framed(node(&name, "ShaderNodeVectorMath", "VECTOR", location), "Frame"));
    }
    nodes.push(node("Clamp", "ShaderNodeClamp", "VALUE", vec2(300.0, 260.0)));

    GraphSnapshot::new(DETAIL_GROUP, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use node_minimap::host::NodeGraph;

    #[test]
    fn sample_has_groups_frames_and_reroutes() {
        let workspace = sample_workspace();
        assert_eq!(workspace.group_target(ROOT, "Detail"), Some(DETAIL_GROUP));

        let root = workspace.graph(ROOT).expect("root graph");
        assert!(root.nodes().iter().any(NodeInfo::is_reroute));
        assert!(root.has_children("Frame"));
        assert!(!root.has_children("Frame.002"));
    }

    #[test]
    fn sample_layout_is_stable() {
        let first = sample_workspace();
        let second = sample_workspace();
        assert_eq!(
            first.node(ROOT, "Mapping").map(|node| node.location),
            second.node(ROOT, "Mapping").map(|node| node.location)
        );
    }
}
