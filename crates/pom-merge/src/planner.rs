//! The merge pipeline.
//!
//! [`merge`] declares one task per [`Slot`], hands the graph to the
//! scheduler, then inspects the rendered output for conflict markers.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use pom_catalog::{Catalog, CatalogCodec, Entry, Header, PoCodec};
use pom_dag::{Inputs, Outputs, Scheduler, TaskGraph};
use pom_diff::{
    compute_changes, compute_unchanged, concat_union, conflict_union, deduplicate, filter,
    keyed_unique, replace_header, reshape,
};
use tracing::{debug, info};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};
use crate::output::{commit_atomically, detect_conflicts};
use crate::plan::{Artifact, Side, Slot};
use crate::report::{MergeOutcome, MergeReport};
use crate::status::{reporter_for, StatusReporter};

type Graph = TaskGraph<Slot, Artifact, MergeError>;

// ---------------------------------------------------------------------------
// MergeRequest
// ---------------------------------------------------------------------------

/// The files a merge reads and writes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeRequest {
    pub local: PathBuf,
    pub base: PathBuf,
    pub other: PathBuf,
    /// Where the result goes. Defaults to `local`.
    pub output: PathBuf,
}

impl MergeRequest {
    pub fn new(
        local: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
        other: impl Into<PathBuf>,
    ) -> Self {
        let local = local.into();
        Self {
            output: local.clone(),
            local,
            base: base.into(),
            other: other.into(),
        }
    }

    /// Builder: write the result somewhere other than `local`.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn input(&self, side: Side) -> &Path {
        match side {
            Side::Local => &self.local,
            Side::Base => &self.base,
            Side::Other => &self.other,
        }
    }

    /// Check that every input exists.
    pub fn validate(&self) -> MergeResult<()> {
        for side in Side::ALL {
            let path = self.input(side);
            if !path.exists() {
                return Err(MergeError::Argument(format!(
                    "{}: no such file or directory",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MergeContext
// ---------------------------------------------------------------------------

/// Everything a merge run needs besides its paths.
#[derive(Clone)]
pub struct MergeContext {
    config: MergeConfig,
    codec: Arc<dyn CatalogCodec>,
    reporter: Arc<dyn StatusReporter>,
}

impl Default for MergeContext {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

impl MergeContext {
    /// A context using the PO codec and a reporter chosen by
    /// `config.verbose`.
    pub fn new(config: MergeConfig) -> Self {
        Self {
            reporter: reporter_for(config.verbose),
            codec: Arc::new(PoCodec),
            config,
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn CatalogCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Send a progress message to the installed reporter.
    pub fn status(&self, message: &str) {
        self.reporter.status(message);
    }
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

/// Run a three-way merge.
///
/// Returns a report for both outcomes: a clean merge and one that left
/// conflict markers in the output. An error means the merge aborted and the
/// output location was not touched.
pub async fn merge(ctx: &MergeContext, request: &MergeRequest) -> MergeResult<MergeReport> {
    let started = Instant::now();
    request.validate()?;

    let graph = plan(ctx, request)?;
    let scheduler = Scheduler::new(ctx.config.parallelism);
    let reporter = Arc::clone(&ctx.reporter);
    let outputs = scheduler
        .run_observed(&graph, |_, slots| announce(reporter.as_ref(), slots))
        .await?;

    ctx.status("checking for conflicts in the result ...");
    let rendered = expect_text(outputs.get(&Slot::Render), Slot::Render)?;
    let outcome = if detect_conflicts(rendered) {
        ctx.status("conflict(s) detected");
        MergeOutcome::Failed
    } else {
        MergeOutcome::Succeeded
    };

    let report = build_report(&outputs, request, outcome, started)?;
    info!(
        outcome = ?report.outcome,
        unchanged = report.unchanged,
        conflicts = report.conflicts,
        local_only = report.local_only,
        other_only = report.other_only,
        "merge complete"
    );
    Ok(report)
}

fn build_report(
    outputs: &Outputs<Slot, Artifact>,
    request: &MergeRequest,
    outcome: MergeOutcome,
    started: Instant,
) -> MergeResult<MergeReport> {
    let slot = |slot: Slot| expect_catalog(outputs.get(&slot), slot);

    let conflicts = slot(Slot::Conflicts)?;
    let template = slot(Slot::Template)?;
    let pruned = slot(Slot::Canon(Side::Base))?
        .key_set()
        .into_iter()
        .filter(|key| !template.contains_key(key))
        .count();

    Ok(MergeReport {
        outcome,
        output: request.output.clone(),
        unchanged: slot(Slot::Unchanged)?.len(),
        conflicts: conflicts.len(),
        local_only: slot(Slot::LocalOnly)?.len(),
        other_only: slot(Slot::OtherOnly)?.len(),
        pruned,
        conflicting_keys: conflicts.keys().map(ToString::to_string).collect(),
        elapsed: started.elapsed(),
    })
}

/// Report each distinct stage message of a wave once, in declaration order.
fn announce(reporter: &dyn StatusReporter, slots: &[Slot]) {
    let mut said: Vec<&str> = Vec::new();
    for message in slots.iter().filter_map(|slot| slot.status_message()) {
        if !said.contains(&message) {
            reporter.status(message);
            said.push(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

fn plan(ctx: &MergeContext, request: &MergeRequest) -> MergeResult<Graph> {
    use Side::{Base, Local, Other};

    let mut graph = Graph::new();

    for side in Side::ALL {
        let path = request.input(side).to_path_buf();
        let codec = Arc::clone(&ctx.codec);
        graph.add_task(Slot::Read(side), [], move |_| {
            read_catalog(codec.as_ref(), &path, side).map(Artifact::Catalog)
        })?;
    }

    graph.add_task(Slot::Header, [Slot::Read(Local)], |inputs| {
        let local = catalog(&inputs, Slot::Read(Local))?;
        Ok(Artifact::Header(local.header().clone()))
    })?;

    for side in Side::ALL {
        graph.add_task(Slot::Canon(side), [Slot::Read(side)], move |inputs| {
            let read = catalog(&inputs, Slot::Read(side))?;
            Ok(Artifact::Catalog(deduplicate(read)))
        })?;
    }

    graph.add_task(
        Slot::LocalChanges,
        [Slot::Canon(Local), Slot::Canon(Base)],
        |inputs| {
            let local = catalog(&inputs, Slot::Canon(Local))?;
            let base = catalog(&inputs, Slot::Canon(Base))?;
            Ok(Artifact::Catalog(compute_changes(local, base)))
        },
    )?;

    graph.add_task(
        Slot::OtherChanges,
        [Slot::Canon(Other), Slot::Canon(Base)],
        |inputs| {
            let other = catalog(&inputs, Slot::Canon(Other))?;
            let base = catalog(&inputs, Slot::Canon(Base))?;
            Ok(Artifact::Catalog(compute_changes(other, base)))
        },
    )?;

    graph.add_task(
        Slot::Unchanged,
        [Slot::Canon(Base), Slot::Canon(Local), Slot::Canon(Other)],
        |inputs| {
            let base = catalog(&inputs, Slot::Canon(Base))?;
            let local = catalog(&inputs, Slot::Canon(Local))?;
            let other = catalog(&inputs, Slot::Canon(Other))?;
            let unchanged = compute_unchanged(base, local, other);
            Ok(Artifact::Catalog(unchanged.with_label("unchanged")))
        },
    )?;

    graph.add_task(
        Slot::Template,
        [Slot::Canon(Local), Slot::Canon(Other)],
        |inputs| {
            let local = catalog(&inputs, Slot::Canon(Local))?;
            let other = catalog(&inputs, Slot::Canon(Other))?;
            Ok(Artifact::Catalog(first_wins("template", local, other)))
        },
    )?;

    graph.add_task(
        Slot::Conflicts,
        [Slot::OtherChanges, Slot::LocalChanges],
        |inputs| {
            let other = catalog(&inputs, Slot::OtherChanges)?;
            let local = catalog(&inputs, Slot::LocalChanges)?;
            let union = conflict_union(&[other, local]);
            let conflicts = filter(&union, Entry::is_conflict);
            debug!(conflicts = conflicts.len(), "computed conflicts");
            Ok(Artifact::Catalog(conflicts.with_label("conflicts")))
        },
    )?;

    graph.add_task(
        Slot::LocalOnly,
        [Slot::LocalChanges, Slot::Conflicts],
        |inputs| {
            let local = catalog(&inputs, Slot::LocalChanges)?;
            let conflicts = catalog(&inputs, Slot::Conflicts)?;
            let only = keyed_unique(local, conflicts);
            Ok(Artifact::Catalog(only.with_label("local-only")))
        },
    )?;

    // Keys both sides changed identically are attributed to local.
    graph.add_task(
        Slot::OtherOnly,
        [Slot::OtherChanges, Slot::Conflicts, Slot::LocalChanges],
        |inputs| {
            let other = catalog(&inputs, Slot::OtherChanges)?;
            let conflicts = catalog(&inputs, Slot::Conflicts)?;
            let local = catalog(&inputs, Slot::LocalChanges)?;
            let only = keyed_unique(&keyed_unique(other, conflicts), local);
            Ok(Artifact::Catalog(only.with_label("other-only")))
        },
    )?;

    graph.add_task(
        Slot::Merged,
        [
            Slot::Unchanged,
            Slot::Conflicts,
            Slot::LocalOnly,
            Slot::OtherOnly,
        ],
        |inputs| {
            let parts = [
                catalog(&inputs, Slot::Unchanged)?,
                catalog(&inputs, Slot::Conflicts)?,
                catalog(&inputs, Slot::LocalOnly)?,
                catalog(&inputs, Slot::OtherOnly)?,
            ];
            let merged = concat_union(&parts)?;
            Ok(Artifact::Catalog(merged.with_label("merged")))
        },
    )?;

    graph.add_task(Slot::Reshaped, [Slot::Merged, Slot::Template], |inputs| {
        let merged = catalog(&inputs, Slot::Merged)?;
        let template = catalog(&inputs, Slot::Template)?;
        Ok(Artifact::Catalog(reshape(merged, template)))
    })?;

    graph.add_task(Slot::Final, [Slot::Reshaped, Slot::Header], |inputs| {
        let reshaped = catalog(&inputs, Slot::Reshaped)?;
        let header = header(&inputs, Slot::Header)?;
        Ok(Artifact::Catalog(replace_header(reshaped, header)))
    })?;

    let codec = Arc::clone(&ctx.codec);
    graph.add_task(Slot::Render, [Slot::Final], move |inputs| {
        let merged = catalog(&inputs, Slot::Final)?;
        Ok(Artifact::Text(codec.serialize(merged)))
    })?;

    let output = request.output.clone();
    graph.add_task(Slot::Commit, [Slot::Render], move |inputs| {
        let text = expect_text(inputs.get(&Slot::Render), Slot::Render)?;
        commit_atomically(&output, text)?;
        Ok(Artifact::Committed(output.clone()))
    })?;

    Ok(graph)
}

fn read_catalog(codec: &dyn CatalogCodec, path: &Path, side: Side) -> MergeResult<Catalog> {
    let text = fs::read_to_string(path).map_err(|source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = codec
        .parse(&text, side.label())
        .map_err(|source| MergeError::Format {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(side = %side, entries = catalog.len(), "read input");
    Ok(catalog)
}

/// Every entry of `first`, then the entries of `second` whose key `first`
/// lacks. Takes `first`'s header.
fn first_wins(label: &str, first: &Catalog, second: &Catalog) -> Catalog {
    let mut entries = first.entries().to_vec();
    entries.extend(keyed_unique(second, first).into_parts().2);
    Catalog::from_parts(label, first.header().clone(), entries)
}

// ---------------------------------------------------------------------------
// Slot access
// ---------------------------------------------------------------------------

fn catalog(inputs: &Inputs<Slot, Artifact>, slot: Slot) -> MergeResult<&Catalog> {
    expect_catalog(inputs.get(&slot), slot)
}

fn header(inputs: &Inputs<Slot, Artifact>, slot: Slot) -> MergeResult<&Header> {
    inputs
        .get(&slot)
        .and_then(Artifact::as_header)
        .ok_or_else(|| MergeError::internal(format!("slot {slot} holds no header")))
}

fn expect_catalog(artifact: Option<&Artifact>, slot: Slot) -> MergeResult<&Catalog> {
    artifact
        .and_then(Artifact::as_catalog)
        .ok_or_else(|| MergeError::internal(format!("slot {slot} holds no catalog")))
}

fn expect_text(artifact: Option<&Artifact>, slot: Slot) -> MergeResult<&str> {
    artifact
        .and_then(Artifact::as_text)
        .ok_or_else(|| MergeError::internal(format!("slot {slot} holds no text")))
}
