//! Graphviz DOT serialization.

use std::fmt::Write;

use crate::models::{Graph, NodeKey};

#[derive(Debug, Clone)]
pub struct DotStyle {
    pub title: String,
    pub font_name: String,
    pub font_size: u32,
    pub rank_dir: String,
}

impl Default for DotStyle {
    fn default() -> Self {
        Self {
            title: "Dependency Graph".to_string(),
            font_name: "Verdana".to_string(),
            font_size: 12,
            rank_dir: "TB".to_string(),
        }
    }
}

/// DOT node id. The kind prefix keeps commit and path ids apart.
pub fn node_id(key: &NodeKey) -> String {
    match key {
        NodeKey::Commit(id) => quote(&format!("commit:{}", id)),
        NodeKey::Path(path) => quote(&format!("path:{}", path)),
    }
}

pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn to_dot(graph: &Graph, style: &DotStyle) -> String {
    let font = quote(&style.font_name);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "// {}", style.title.replace('\n', " "));
    let _ = writeln!(out, "digraph {{");
    let _ = writeln!(
        out,
        "    graph [fontname={}, fontsize={}, rankdir={}];",
        font, style.font_size, style.rank_dir
    );
    let _ = writeln!(out, "    node [fontname={}, fontsize={}];", font, style.font_size);

    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "    {} [label={}, shape={}];",
            node_id(&node.key()),
            quote(&node.label()),
            node.shape().as_str()
        );
    }
    for edge in graph.edges() {
        let _ = writeln!(out, "    {} -> {};", node_id(&edge.source()), node_id(&edge.target()));
    }

    out.push_str("}\n");
    out
}
