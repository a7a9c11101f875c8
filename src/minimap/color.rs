use crate::config::{Color, MinimapConfig};
use crate::host::{NodeInfo, NodeKind};

/// Color bucket a node is drawn with when category colors are enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Converter,
    Geometry,
    Vector,
    Shader,
    Texture,
    Color,
    Attribute,
    Input,
    Output,
    GroupSocket,
    Group,
    Frame,
}

#[derive(Clone, Copy, Debug)]
pub enum RulePredicate {
    Kind(NodeKind),
    /// Any of the keywords is a substring of the lowercased type name.
    TypeContains(&'static [&'static str]),
    /// The first output socket type equals the value, ignoring case.
    OutputIs(&'static str),
    /// The first output socket type contains the value, ignoring case.
    OutputContains(&'static str),
}

impl RulePredicate {
    pub fn matches(&self, node: &NodeInfo) -> bool {
        match *self {
            Self::Kind(kind) => node.kind == kind,
            Self::TypeContains(keywords) => {
                let type_name = node.type_name.to_lowercase();
                keywords.iter().any(|keyword| type_name.contains(keyword))
            }
            Self::OutputIs(expected) => first_output(node)
                .is_some_and(|output| output.eq_ignore_ascii_case(expected)),
            Self::OutputContains(needle) => first_output(node)
                .is_some_and(|output| output.to_uppercase().contains(&needle.to_uppercase())),
        }
    }
}

fn first_output(node: &NodeInfo) -> Option<&str> {
    node.output_types.first().map(String::as_str)
}

#[derive(Clone, Copy, Debug)]
pub struct CategoryRule {
    pub predicate: RulePredicate,
    pub category: NodeCategory,
}

const fn rule(predicate: RulePredicate, category: NodeCategory) -> CategoryRule {
    CategoryRule {
        predicate,
        category,
    }
}

/// Evaluated top to bottom, first match wins. Several rules can match one
/// node (`GeometryNodeInputMeshCube` hits both "input" and "mesh"), so the
/// order here is the tie-break.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    rule(RulePredicate::Kind(NodeKind::Group), NodeCategory::Group),
    rule(RulePredicate::Kind(NodeKind::Frame), NodeCategory::Frame),
    rule(
        RulePredicate::Kind(NodeKind::GroupInput),
        NodeCategory::GroupSocket,
    ),
    rule(
        RulePredicate::Kind(NodeKind::GroupOutput),
        NodeCategory::GroupSocket,
    ),
    rule(
        RulePredicate::TypeContains(&["groupinput", "groupoutput"]),
        NodeCategory::GroupSocket,
    ),
    rule(
        RulePredicate::TypeContains(&["viewer", "output"]),
        NodeCategory::Output,
    ),
    rule(RulePredicate::TypeContains(&["input"]), NodeCategory::Input),
    rule(
        RulePredicate::TypeContains(&["attribute"]),
        NodeCategory::Attribute,
    ),
    rule(
        RulePredicate::TypeContains(&["color", "rgb"]),
        NodeCategory::Color,
    ),
    rule(RulePredicate::TypeContains(&["tex"]), NodeCategory::Texture),
    rule(
        RulePredicate::TypeContains(&["curve", "mesh", "instance"]),
        NodeCategory::Geometry,
    ),
    rule(RulePredicate::OutputIs("SHADER"), NodeCategory::Shader),
    rule(RulePredicate::OutputContains("VECTOR"), NodeCategory::Vector),
    rule(RulePredicate::OutputIs("GEOMETRY"), NodeCategory::Geometry),
    rule(
        RulePredicate::TypeContains(&["math", "string", "switch", "range", "clamp"]),
        NodeCategory::Converter,
    ),
];

pub fn classify(node: &NodeInfo) -> Option<NodeCategory> {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.predicate.matches(node))
        .map(|rule| rule.category)
}

/// Color a node is drawn with. The alpha always comes from
/// `node_transparency`, whatever the source color carried.
pub fn node_color(
    custom: Option<Color>,
    category: Option<NodeCategory>,
    config: &MinimapConfig,
) -> Color {
    let base = match custom {
        Some(color) => color,
        None if !config.use_node_colors => config.node_color,
        None => category.map_or(config.fallback_color, |category| {
            config.palette.get(category)
        }),
    };
    base.with_alpha(config.node_transparency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Vec2, vec2};

    fn typed(type_name: &str, outputs: &[&str]) -> NodeInfo {
        let mut node = NodeInfo::new(type_name, Vec2::ZERO, vec2(140.0, 100.0));
        node.type_name = type_name.to_owned();
        node.output_types = outputs.iter().map(|output| (*output).to_owned()).collect();
        node
    }

    #[test]
    fn keyword_rules_classify_common_types() {
        assert_eq!(
            classify(&typed("ShaderNodeMath", &["VALUE"])),
            Some(NodeCategory::Converter)
        );
        assert_eq!(
            classify(&typed("ShaderNodeTexNoise", &["FLOAT"])),
            Some(NodeCategory::Texture)
        );
        assert_eq!(
            classify(&typed("ShaderNodeBsdfPrincipled", &["SHADER"])),
            Some(NodeCategory::Shader)
        );
        assert_eq!(
            classify(&typed("ShaderNodeCombineXYZ", &["VECTOR"])),
            Some(NodeCategory::Vector)
        );
        assert_eq!(classify(&typed("NodeUndefined", &[])), None);
    }

    #[test]
    fn earlier_rules_win_ties() {
        // "input" outranks "mesh".
        assert_eq!(
            classify(&typed("GeometryNodeInputMeshFaceArea", &["FLOAT"])),
            Some(NodeCategory::Input)
        );
        // "groupoutput" outranks "output".
        assert_eq!(
            classify(&typed("NodeGroupOutput", &[])),
            Some(NodeCategory::GroupSocket)
        );
        // Type keywords outrank the output socket type.
        assert_eq!(
            classify(&typed("GeometryNodeCurveToMesh", &["GEOMETRY"])),
            Some(NodeCategory::Geometry)
        );
        assert_eq!(
            classify(&typed("ShaderNodeMixRGB", &["SHADER"])),
            Some(NodeCategory::Color)
        );
    }

    #[test]
    fn node_kind_outranks_type_keywords() {
        let mut frame = typed("NodeFrameTexture", &[]);
        frame.kind = NodeKind::Frame;
        assert_eq!(classify(&frame), Some(NodeCategory::Frame));

        let mut group = typed("GeometryNodeGroup", &["GEOMETRY"]);
        group.kind = NodeKind::Group;
        assert_eq!(classify(&group), Some(NodeCategory::Group));
    }

    #[test]
    fn output_matching_ignores_case() {
        assert_eq!(
            classify(&typed("CustomNode", &["float_vector"])),
            Some(NodeCategory::Vector)
        );
    }

    #[test]
    fn transparency_overrides_alpha() {
        let config = MinimapConfig {
            node_transparency: 0.25,
            ..MinimapConfig::default()
        };
        let custom = Color::rgba(1.0, 0.0, 0.0, 0.9);
        assert_eq!(
            node_color(Some(custom), Some(NodeCategory::Shader), &config),
            Color::rgba(1.0, 0.0, 0.0, 0.25)
        );
        assert_eq!(
            node_color(None, None, &config),
            config.fallback_color.with_alpha(0.25)
        );
        assert_eq!(
            node_color(None, Some(NodeCategory::Shader), &config),
            config.palette.shader.with_alpha(0.25)
        );
    }

    #[test]
    fn flat_color_ignores_categories() {
        let config = MinimapConfig {
            use_node_colors: false,
            ..MinimapConfig::default()
        };
        assert_eq!(
            node_color(None, Some(NodeCategory::Texture), &config),
            config.node_color.with_alpha(config.node_transparency)
        );
    }
}
