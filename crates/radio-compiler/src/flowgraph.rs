//! Flowgraph identifier rewriting.
//!
//! The compiler names its output after the flowgraph's `id` option, so the
//! supervisor renames every flowgraph to the program name before compiling.
//! Two layouts are understood:
//!
//! - XML (`<flow_graph>`): the first `<param>` of the first `<block>` is the
//!   options block's id when its key is `id`.
//! - YAML: `options.parameters.id`.

use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::error::{CompileError, Result};

/// Layout of a flowgraph definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowgraphLayout {
    /// Legacy XML flowgraph.
    Xml,
    /// YAML flowgraph.
    Yaml,
}

impl FlowgraphLayout {
    /// Detects the layout of a flowgraph definition.
    pub fn detect(source: &str) -> Self {
        if source.trim_start().starts_with('<') {
            FlowgraphLayout::Xml
        } else {
            FlowgraphLayout::Yaml
        }
    }
}

fn first_block_param() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<block>.*?<param>\s*<key>([^<]*)</key>\s*<value>([^<]*)</value>")
            .expect("Invalid regex pattern")
    })
}

/// Rewrites the flowgraph's identifier to `program_name`.
///
/// A flowgraph without an identifier is returned unchanged.
pub fn rewrite_id(program_name: &str, source: &str) -> Result<String> {
    match FlowgraphLayout::detect(source) {
        FlowgraphLayout::Xml => rewrite_xml(program_name, source),
        FlowgraphLayout::Yaml => rewrite_yaml(program_name, source),
    }
}

fn rewrite_xml(program_name: &str, source: &str) -> Result<String> {
    if !source.contains("<flow_graph") {
        return Err(CompileError::Malformed(
            "missing <flow_graph> root element".to_string(),
        ));
    }

    let Some(caps) = first_block_param().captures(source) else {
        return Ok(source.to_string());
    };

    // Only the first param is checked, matching how the options block is laid out
    if caps[1].trim() != "id" {
        return Ok(source.to_string());
    }

    let value = caps.get(2).map(|m| m.range()).unwrap_or(0..0);
    let mut out = String::with_capacity(source.len() + program_name.len());
    out.push_str(&source[..value.start]);
    out.push_str(&escape_xml(program_name));
    out.push_str(&source[value.end..]);
    Ok(out)
}

fn rewrite_yaml(program_name: &str, source: &str) -> Result<String> {
    let mut doc: Value =
        serde_yaml::from_str(source).map_err(|e| CompileError::Malformed(e.to_string()))?;

    if !doc.is_mapping() {
        return Err(CompileError::Malformed(
            "flowgraph document is not a mapping".to_string(),
        ));
    }

    let id = doc
        .get_mut("options")
        .and_then(|o| o.get_mut("parameters"))
        .and_then(|p| p.get_mut("id"));

    match id {
        Some(id) => {
            *id = Value::String(program_name.to_string());
            serde_yaml::to_string(&doc).map_err(|e| CompileError::Malformed(e.to_string()))
        }
        None => Ok(source.to_string()),
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML_FLOWGRAPH: &str = r#"<?xml version='1.0' encoding='utf-8'?>
<flow_graph>
  <timestamp>Mon Jan  1 00:00:00 2018</timestamp>
  <block>
    <key>options</key>
    <param>
      <key>id</key>
      <value>top_block</value>
    </param>
    <param>
      <key>generate_options</key>
      <value>no_gui</value>
    </param>
  </block>
  <block>
    <key>variable</key>
    <param>
      <key>id</key>
      <value>samp_rate</value>
    </param>
  </block>
</flow_graph>
"#;

    const YAML_FLOWGRAPH: &str = "options:
  parameters:
    id: top_block
    generate_options: no_gui
blocks:
- name: samp_rate
  id: variable
  parameters:
    value: '32000'
";

    #[test]
    fn test_detect_layout() {
        assert_eq!(FlowgraphLayout::detect(XML_FLOWGRAPH), FlowgraphLayout::Xml);
        assert_eq!(FlowgraphLayout::detect("  <flow_graph/>"), FlowgraphLayout::Xml);
        assert_eq!(FlowgraphLayout::detect(YAML_FLOWGRAPH), FlowgraphLayout::Yaml);
    }

    #[test]
    fn test_rewrite_xml_first_id_only() {
        let out = rewrite_id("fm_receiver", XML_FLOWGRAPH).unwrap();

        assert!(out.contains("<value>fm_receiver</value>"));
        assert!(!out.contains("<value>top_block</value>"));
        // Other blocks keep their ids
        assert!(out.contains("<value>samp_rate</value>"));
        assert!(out.contains("<value>no_gui</value>"));
    }

    #[test]
    fn test_rewrite_xml_without_id_is_unchanged() {
        let source = "<flow_graph><block><key>options</key><param><key>title</key><value>x</value></param></block></flow_graph>";
        assert_eq!(rewrite_id("fm", source).unwrap(), source);
    }

    #[test]
    fn test_rewrite_xml_escapes_name() {
        let out = rewrite_id("a&b", XML_FLOWGRAPH).unwrap();
        assert!(out.contains("<value>a&amp;b</value>"));
    }

    #[test]
    fn test_rewrite_xml_requires_flow_graph_root() {
        let result = rewrite_id("fm", "<html><body/></html>");
        assert!(matches!(result, Err(CompileError::Malformed(_))));
    }

    #[test]
    fn test_rewrite_yaml() {
        let out = rewrite_id("fm_receiver", YAML_FLOWGRAPH).unwrap();
        let doc: Value = serde_yaml::from_str(&out).unwrap();

        assert_eq!(doc["options"]["parameters"]["id"].as_str(), Some("fm_receiver"));
        assert_eq!(doc["blocks"][0]["id"].as_str(), Some("variable"));
    }

    #[test]
    fn test_rewrite_yaml_without_options_is_unchanged() {
        let source = "blocks: []\n";
        assert_eq!(rewrite_id("fm", source).unwrap(), source);
    }

    #[test]
    fn test_rewrite_yaml_malformed() {
        assert!(matches!(
            rewrite_id("fm", "options: [unclosed"),
            Err(CompileError::Malformed(_))
        ));
        assert!(matches!(
            rewrite_id("fm", "just a string"),
            Err(CompileError::Malformed(_))
        ));
    }
}
