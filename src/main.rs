//! git-depgraph - draw the commits that touched a file and everything they changed
//!
//! # Usage
//! ```bash
//! git-depgraph --repo-path ~/project --output-path graph.png --file-hash src/lib.rs
//! git-depgraph --graphviz-path /opt/graphviz/bin --repo-path . --output-path out --file-hash README.md
//! git-depgraph --repo-path . --output-path out --file-hash Cargo.toml --no-diff --emit-dot
//! ```

mod assembler;
mod diagnostics;
mod error;
mod git;
mod models;
mod process;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assembler::{AssembleOptions, Assembly, GraphAssembler};
use diagnostics::Diagnostic;
use git::{DEFAULT_FIELD_SEPARATOR, GitCommand, HistoryMode, Libgit2Backend};
use models::{Graph, MergePolicy};
use process::ToolPath;
use render::{GraphRenderer, Graphviz};

/// Draw the commits that touched a file and everything they changed
#[derive(Parser)]
#[command(name = "git-depgraph")]
#[command(about = "Visualize the commit history of a file as a graph", long_about = None)]
struct Cli {
    /// Directory holding the Graphviz executables (searched before PATH, repeatable)
    #[arg(long = "graphviz-path", visible_alias = "tool-path", value_name = "DIR")]
    graphviz_path: Vec<PathBuf>,

    /// Path to the repository to analyze
    #[arg(long, value_name = "REPO_PATH")]
    repo_path: PathBuf,

    /// Where to write the image; the extension is replaced with .png
    #[arg(long, value_name = "OUTPUT_PATH")]
    output_path: PathBuf,

    /// File whose history is drawn
    #[arg(long = "file-hash", visible_alias = "target", value_name = "PATH")]
    file_hash: String,

    /// Version-control backend
    #[arg(long, value_enum, default_value_t = Backend::Git)]
    backend: Backend,

    /// Only resolve commit ids (no dates or summaries in labels)
    #[arg(long)]
    ids_only: bool,

    /// Do not fetch per-file diffs
    #[arg(long)]
    no_diff: bool,

    /// Keep every commit's diff on a shared file node instead of the last one
    #[arg(long)]
    accumulate_diffs: bool,

    /// Separator between fields of `git log` output
    #[arg(long, default_value_t = DEFAULT_FIELD_SEPARATOR, hide_default_value = true)]
    field_separator: char,

    /// git executable
    #[arg(long, default_value = "git")]
    git_program: String,

    /// Graphviz layout executable
    #[arg(long, default_value = "dot")]
    dot_program: String,

    /// Also write the DOT source next to the image
    #[arg(long)]
    emit_dot: bool,

    /// Also write the graph as JSON next to the image
    #[arg(long)]
    emit_json: bool,

    /// Log backend calls
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    /// Run the git executable
    Git,
    /// Read the repository in-process with libgit2
    Libgit2,
}

impl Cli {
    fn options(&self) -> AssembleOptions {
        AssembleOptions {
            history_mode: if self.ids_only {
                HistoryMode::IdsOnly
            } else {
                HistoryMode::Detailed
            },
            diff_mode: !self.no_diff,
            merge_policy: if self.accumulate_diffs {
                MergePolicy::Accumulate
            } else {
                MergePolicy::LastWriteWins
            },
        }
    }
}

fn build(cli: &Cli, tools: &ToolPath) -> Assembly {
    let options = cli.options();
    match cli.backend {
        Backend::Git => {
            let backend = GitCommand::new(&cli.repo_path)
                .with_program(cli.git_program.clone())
                .with_tool_path(tools.clone())
                .with_field_separator(cli.field_separator);
            GraphAssembler::new(backend, options).build(&cli.file_hash)
        }
        Backend::Libgit2 => match Libgit2Backend::open(&cli.repo_path) {
            Ok(backend) => GraphAssembler::new(backend, options).build(&cli.file_hash),
            Err(e) => Assembly {
                graph: Graph::new(),
                diagnostics: vec![Diagnostic::HistoryFailed {
                    target: cli.file_hash.clone(),
                    error: e.to_string(),
                }],
            },
        },
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics are printed below; the log carries backend detail
    let default_filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tools = ToolPath::new(cli.graphviz_path.clone());
    let assembly = build(&cli, &tools);

    for diagnostic in &assembly.diagnostics {
        println!("✗ {}", diagnostic);
    }
    if assembly.graph.is_empty() {
        println!("  Nothing to draw for {}; rendering an empty graph", cli.file_hash);
    }

    let renderer = Graphviz::new(tools).with_program(cli.dot_program.clone());

    if cli.emit_dot {
        let path = cli.output_path.with_extension("dot");
        render::write_dot(&assembly.graph, renderer.style(), &path)?;
        println!("  DOT source: {}", path.display());
    }
    if cli.emit_json {
        let path = cli.output_path.with_extension("json");
        render::write_json(&assembly.graph, &path)?;
        println!("  JSON:       {}", path.display());
    }

    let image = renderer
        .render(&assembly.graph, &cli.output_path)
        .with_context(|| format!("Failed to render {}", cli.output_path.display()))?;

    println!(
        "✓ Dependency graph saved to {} ({} nodes, {} edges)",
        image.display(),
        assembly.graph.node_count(),
        assembly.graph.edge_count()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "git-depgraph",
            "--graphviz-path",
            "/opt/graphviz/bin",
            "--repo-path",
            ".",
            "--output-path",
            "out.svg",
            "--file-hash",
            "example.txt",
            "--ids-only",
            "--accumulate-diffs",
        ])
        .expect("parse");

        let options = cli.options();
        assert_eq!(options.history_mode, HistoryMode::IdsOnly);
        assert!(options.diff_mode);
        assert_eq!(options.merge_policy, MergePolicy::Accumulate);
        assert_eq!(cli.field_separator, DEFAULT_FIELD_SEPARATOR);
        assert_eq!(cli.graphviz_path, vec![PathBuf::from("/opt/graphviz/bin")]);
    }

    #[test]
    fn test_target_alias_and_backend() {
        let cli = Cli::try_parse_from([
            "git-depgraph",
            "--repo-path",
            ".",
            "--output-path",
            "out",
            "--target",
            "a.txt",
            "--backend",
            "libgit2",
            "--no-diff",
        ])
        .expect("parse");
        assert_eq!(cli.file_hash, "a.txt");
        assert!(matches!(cli.backend, Backend::Libgit2));
        assert!(!cli.options().diff_mode);
    }

    #[test]
    fn test_unopenable_repo_gives_empty_graph() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("no-repo");
        let cli = Cli::try_parse_from([
            "git-depgraph".into(),
            "--repo-path".into(),
            missing.into_os_string(),
            "--output-path".into(),
            "out".into(),
            "--file-hash".into(),
            "a.txt".into(),
            "--backend".into(),
            "libgit2".into(),
        ])?;
        let assembly = build(&cli, &ToolPath::default());
        assert!(assembly.graph.is_empty());
        assert_eq!(assembly.diagnostics.len(), 1);
        Ok(())
    }
}
