//! Hand-off from the assembled graph to image and text outputs.
//!
//! - `dot`: DOT serialization of a `Graph`
//! - `graphviz`: `Graphviz`, the `GraphRenderer` that runs `dot`

pub mod dot;
pub mod graphviz;

pub use graphviz::Graphviz;

use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::models::Graph;

/// Image format produced by every renderer.
pub const OUTPUT_FORMAT: &str = "png";

pub trait GraphRenderer {
    /// Lay out and rasterize `graph`. Returns the path actually written,
    /// which is `output` with its extension replaced by `OUTPUT_FORMAT`.
    fn render(&self, graph: &Graph, output: &Path) -> Result<PathBuf, RenderError>;
}

/// `out.svg` -> `out.png`, `out` -> `out.png`.
pub fn normalize_output_path(output: &Path) -> PathBuf {
    output.with_extension(OUTPUT_FORMAT)
}

pub fn write_dot(graph: &Graph, style: &dot::DotStyle, path: &Path) -> Result<(), RenderError> {
    std::fs::write(path, dot::to_dot(graph, style)).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json(graph: &Graph, path: &Path) -> Result<(), RenderError> {
    let json = serde_json::to_string_pretty(graph)
        .map_err(|e| RenderError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
    std::fs::write(path, json).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}
