//! Transformation sessions.
//!
//! A [`TransformSession`] owns one source dataset, its ordered pipeline of
//! toggleable steps, the derived dataset, and every chart derived in the
//! session. Commands consume the session and return a new immutable
//! snapshot; each mutating command recomputes the derived dataset wholesale
//! (O(rows × applied steps)) — cost is an explicit contract, never a hidden
//! side effect. There is no memoization and no incremental diffing: bounded
//! in-memory datasets only.
//!
//! The session is single-owner and never shared for concurrent mutation.
//! The `revision` counter makes supersession explicit: anything derived
//! from an older revision (notably [`ChartResult`]s) is detectably stale.

use crate::chart::{derive_chart, ChartResult, ChartSpec};
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::transform::{Transform, TransformKind};

/// One configured, toggleable pipeline step.
///
/// Steps keep their creation order (append-only position); `applied` gates
/// execution without removing the step.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformStep {
    /// Session-unique step id.
    pub id: u64,
    /// Display name, defaulted from the transform kind.
    pub name: String,
    /// The configured transform.
    pub transform: Transform,
    /// Whether the step participates in execution.
    pub applied: bool,
}

/// An owned analysis session: source dataset, pipeline, derived dataset,
/// and charts.
#[derive(Debug, Clone)]
pub struct TransformSession {
    source: Dataset,
    steps: Vec<TransformStep>,
    charts: Vec<ChartResult>,
    derived: Dataset,
    revision: u64,
    next_step_id: u64,
    next_chart_id: u64,
}

impl TransformSession {
    /// Start a session over a source dataset.
    #[must_use]
    pub fn new(source: Dataset) -> Self {
        let derived = source.clone();
        Self {
            source,
            steps: Vec::new(),
            charts: Vec::new(),
            derived,
            revision: 0,
            next_step_id: 1,
            next_chart_id: 1,
        }
    }

    /// The immutable source dataset.
    #[must_use]
    pub fn source(&self) -> &Dataset {
        &self.source
    }

    /// The fully materialized output of the applied steps.
    #[must_use]
    pub fn derived(&self) -> &Dataset {
        &self.derived
    }

    /// The pipeline steps, in creation order.
    #[must_use]
    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    /// The charts derived in this session.
    #[must_use]
    pub fn charts(&self) -> &[ChartResult] {
        &self.charts
    }

    /// Monotonic revision of the derived dataset; bumps on every mutating
    /// command.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a step with the type-default config, not yet applied.
    #[must_use]
    pub fn add_step(self, kind: TransformKind) -> Self {
        let transform = Transform::default_for(kind, self.source.schema());
        // Type-default configs are always well-formed.
        self.append_step(transform)
    }

    /// Append a step with an explicit config, not yet applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is malformed (bad expression or
    /// pattern).
    pub fn add_step_with(self, transform: Transform) -> Result<Self> {
        transform.validate_config()?;
        Ok(self.append_step(transform))
    }

    /// Replace a step's config, keeping its position and applied flag.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id or a malformed config.
    pub fn update_step(mut self, id: u64, transform: Transform) -> Result<Self> {
        transform.validate_config()?;
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::StepNotFound { id })?;
        step.name = transform.kind().display_name().to_string();
        step.transform = transform;
        Ok(self.recomputed())
    }

    /// Rename a step. Display-only; the derived dataset is unaffected.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id.
    pub fn rename_step(mut self, id: u64, name: impl Into<String>) -> Result<Self> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::StepNotFound { id })?;
        step.name = name.into();
        Ok(self)
    }

    /// Flip a step's applied flag.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id.
    pub fn toggle_step(mut self, id: u64) -> Result<Self> {
        let step = self
            .steps
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::StepNotFound { id })?;
        step.applied = !step.applied;
        Ok(self.recomputed())
    }

    /// Delete a step.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id.
    pub fn remove_step(mut self, id: u64) -> Result<Self> {
        let before = self.steps.len();
        self.steps.retain(|s| s.id != id);
        if self.steps.len() == before {
            return Err(Error::StepNotFound { id });
        }
        Ok(self.recomputed())
    }

    /// Recompute the derived dataset from scratch.
    ///
    /// Mutating commands already do this; the explicit command exists so
    /// callers can force a fresh snapshot (and revision) without editing
    /// the pipeline.
    #[must_use]
    pub fn recompute(self) -> Self {
        self.recomputed()
    }

    /// Derive and store a chart over the current derived dataset.
    ///
    /// The result is computed once; later pipeline edits do not refresh it
    /// (see [`Self::rederive_charts`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the spec is structurally incomplete.
    pub fn add_chart(mut self, spec: ChartSpec) -> Result<Self> {
        let data = derive_chart(&self.derived, &spec)?;
        let id = self.next_chart_id;
        self.next_chart_id += 1;
        self.charts.push(ChartResult {
            id,
            chart_type: spec.chart_type,
            data,
            spec,
            source_revision: self.revision,
        });
        Ok(self)
    }

    /// Delete a chart.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown id.
    pub fn remove_chart(mut self, id: u64) -> Result<Self> {
        let before = self.charts.len();
        self.charts.retain(|c| c.id != id);
        if self.charts.len() == before {
            return Err(Error::ChartNotFound { id });
        }
        Ok(self)
    }

    /// Re-derive every stored chart against the current derived dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored spec no longer derives (specs are
    /// validated at creation, so this only happens for incomplete specs
    /// injected by deserialization).
    pub fn rederive_charts(mut self) -> Result<Self> {
        for chart in &mut self.charts {
            chart.data = derive_chart(&self.derived, &chart.spec)?;
            chart.source_revision = self.revision;
        }
        Ok(self)
    }

    fn append_step(mut self, transform: Transform) -> Self {
        let id = self.next_step_id;
        self.next_step_id += 1;
        self.steps.push(TransformStep {
            id,
            name: transform.kind().display_name().to_string(),
            transform,
            applied: false,
        });
        self.recomputed()
    }

    fn recomputed(mut self) -> Self {
        self.revision += 1;
        self.derived = execute(&self.source, &self.steps);
        self
    }
}

/// Fold the applied steps, in sequence order, over the source dataset.
///
/// Step N+1 never starts before step N's complete output exists — later
/// operators (notably calculate) may reference columns earlier ones
/// created.
#[must_use]
pub fn execute(source: &Dataset, steps: &[TransformStep]) -> Dataset {
    let applied = steps.iter().filter(|s| s.applied).count();
    log::debug!(
        "executing pipeline: {applied}/{} steps over {} rows",
        steps.len(),
        source.len()
    );
    steps
        .iter()
        .filter(|step| step.applied)
        .fold(source.clone(), |dataset, step| step.transform.apply(&dataset))
}
