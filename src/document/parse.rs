use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawDocument {
    pub(super) root: String,
    #[serde(default)]
    pub(super) graphs: Vec<RawGraph>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawGraph {
    pub(super) key: String,
    #[serde(default)]
    pub(super) nodes: Vec<RawNode>,
}

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) name: String,
    #[serde(default)]
    pub(super) location: [f32; 2],
    #[serde(default = "default_width")]
    pub(super) width: f32,
    #[serde(default = "default_height")]
    pub(super) height: f32,
    #[serde(default, rename = "type")]
    pub(super) type_name: String,
    #[serde(default)]
    pub(super) outputs: Vec<String>,
    #[serde(default)]
    pub(super) kind: RawNodeKind,
    /// A custom color; absent means the node uses its category color.
    #[serde(default)]
    pub(super) color: Option<[f32; 3]>,
    #[serde(default)]
    pub(super) parent: Option<String>,
    #[serde(default)]
    pub(super) label: String,
    /// Key of the graph a group node opens.
    #[serde(default)]
    pub(super) group: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(super) enum RawNodeKind {
    #[default]
    Regular,
    Frame,
    Reroute,
    Group,
    GroupInput,
    GroupOutput,
}

fn default_width() -> f32 {
    140.0
}

fn default_height() -> f32 {
    100.0
}

pub(super) fn parse_document(raw: &str) -> Result<RawDocument> {
    serde_json::from_str(raw).context("invalid node document JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let document = parse_document(
            r#"{"root": "tree", "graphs": [{"key": "tree", "nodes": [{"name": "Math"}]}]}"#,
        )
        .expect("valid document");
        let node = &document.graphs[0].nodes[0];
        assert_eq!(node.width, 140.0);
        assert_eq!(node.kind, RawNodeKind::Regular);
        assert!(node.color.is_none());
    }

    #[test]
    fn kinds_are_snake_case() {
        let document = parse_document(
            r#"{"root": "t", "graphs": [{"key": "t", "nodes": [
                {"name": "In", "kind": "group_input"},
                {"name": "F", "kind": "frame", "label": "Inputs"}
            ]}]}"#,
        )
        .expect("valid document");
        assert_eq!(document.graphs[0].nodes[0].kind, RawNodeKind::GroupInput);
        assert_eq!(document.graphs[0].nodes[1].label, "Inputs");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_document("{\"graphs\": [").is_err());
    }
}
