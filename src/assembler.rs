//! Folds resolved history into the commit/path graph.
//!
//! For each commit touching the target (newest first) the commit node is
//! registered, its full change set is expanded, and every changed path gets a
//! node and a commit -> path edge. In diff mode each path node carries the
//! added and removed lines of that commit; when several commits touch the
//! same path the `MergePolicy` decides which annotation survives.

use tracing::info;

use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::git::{HistoryMode, VcsBackend, diff_for_path, expand_commit, resolve_history};
use crate::models::{Commit, CommitNode, DiffFragment, Graph, GraphNode, MergePolicy, PathNode};

/// Placeholder for an empty added/removed section.
pub const NONE_PLACEHOLDER: &str = "none";

#[derive(Debug, Clone, Copy)]
pub struct AssembleOptions {
    pub history_mode: HistoryMode,
    pub diff_mode: bool,
    pub merge_policy: MergePolicy,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            history_mode: HistoryMode::Detailed,
            diff_mode: true,
            merge_policy: MergePolicy::LastWriteWins,
        }
    }
}

/// Result of one build: the graph plus every diagnostic raised on the way.
#[derive(Debug)]
pub struct Assembly {
    pub graph: Graph,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct GraphAssembler<B> {
    backend: B,
    options: AssembleOptions,
}

impl<B: VcsBackend> GraphAssembler<B> {
    pub fn new(backend: B, options: AssembleOptions) -> Self {
        Self { backend, options }
    }

    pub fn build(&self, target: &str) -> Assembly {
        let mut log = DiagnosticLog::new();
        let mut graph = Graph::new();

        let history = resolve_history(&self.backend, target, self.options.history_mode, &mut log);
        if history.is_empty() {
            // A failed history query has already been reported
            if log.is_empty() {
                log.report(Diagnostic::NoHistory {
                    target: target.to_string(),
                });
            }
            return Assembly {
                graph,
                diagnostics: log.into_entries(),
            };
        }

        for commit in &history {
            // Registered before expansion so commits without changes still appear
            graph.upsert_node(GraphNode::Commit(commit_node(commit)), self.options.merge_policy);

            for path in expand_commit(&self.backend, &commit.id, &mut log) {
                let annotations = if self.options.diff_mode {
                    let raw = diff_for_path(&self.backend, &commit.id, &path, &mut log);
                    vec![annotation(&DiffFragment::classify(&raw))]
                } else {
                    Vec::new()
                };

                graph.upsert_node(
                    GraphNode::Path(PathNode {
                        path: path.clone(),
                        annotations,
                    }),
                    self.options.merge_policy,
                );
                graph.add_edge(&commit.id, &path);
            }
        }

        info!(
            "Built graph for {}: {} commits, {} nodes, {} edges",
            target,
            history.len(),
            graph.node_count(),
            graph.edge_count()
        );

        Assembly {
            graph,
            diagnostics: log.into_entries(),
        }
    }
}

pub fn commit_node(commit: &Commit) -> CommitNode {
    let mut label = commit.short_id().to_string();
    if let Some(timestamp) = &commit.timestamp {
        label.push('\n');
        label.push_str(timestamp);
    }
    if !commit.summary.is_empty() {
        label.push('\n');
        label.push_str(&commit.summary);
    }
    CommitNode {
        id: commit.id.clone(),
        label,
    }
}

pub fn annotation(fragment: &DiffFragment) -> String {
    let section = |lines: &[String]| {
        if lines.is_empty() {
            NONE_PLACEHOLDER.to_string()
        } else {
            lines.join("\n")
        }
    };
    format!(
        "Added ({}):\n{}\n\nRemoved ({}):\n{}",
        fragment.added(),
        section(&fragment.additions),
        fragment.removed(),
        section(&fragment.removals)
    )
}
