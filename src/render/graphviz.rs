use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tracing::debug;

use crate::error::RenderError;
use crate::models::Graph;
use crate::process::ToolPath;
use crate::render::dot::{DotStyle, to_dot};
use crate::render::{GraphRenderer, OUTPUT_FORMAT, normalize_output_path};

/// Renders through Graphviz `dot`, DOT text on stdin, image written by `dot`.
pub struct Graphviz {
    program: String,
    tools: ToolPath,
    style: DotStyle,
}

impl Graphviz {
    pub fn new(tools: ToolPath) -> Self {
        Self {
            program: "dot".to_string(),
            tools,
            style: DotStyle::default(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn style(&self) -> &DotStyle {
        &self.style
    }
}

impl GraphRenderer for Graphviz {
    fn render(&self, graph: &Graph, output: &Path) -> Result<PathBuf, RenderError> {
        let image = normalize_output_path(output);
        let source = to_dot(graph, &self.style);
        debug!("Rendering {} bytes of DOT to {}", source.len(), image.display());

        let mut command = self
            .tools
            .command(&self.program)
            .map_err(|e| RenderError::SearchPath(e.to_string()))?;
        let mut child = command
            .arg(format!("-T{}", OUTPUT_FORMAT))
            .arg("-o")
            .arg(&image)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stdin is fed from its own thread while stderr is drained here, so a
        // chatty `dot` cannot fill one pipe while we block on the other
        let stdin = child.stdin.take();
        let program = &self.program;
        let bytes = source.as_bytes();
        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // An early exit closes the pipe; the exit status reports why
                    if let Err(e) = stdin.write_all(bytes) {
                        debug!("{} stopped reading DOT input: {}", program, e);
                    }
                });
            }
            child.wait_with_output()
        })
        .map_err(|source| RenderError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(RenderError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(image)
    }
}
