//! Composite meters: sequence, condition, per-tag fan-out.

use std::panic;
use std::thread;

use tracing::{debug, warn};

use crate::error::EvaluationError;
use crate::store::{FailureMarker, Payload, ResultEntry, ResultStore};

use super::context::EvaluationContext;
use super::{Meter, names};

/// Runs children in order against one store.
pub struct Sequence {
    name: String,
    children: Vec<Box<dyn Meter>>,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Appends a stage.
    pub fn then(mut self, meter: impl Meter + 'static) -> Self {
        self.children.push(Box::new(meter));
        self
    }

    /// Names of the stages, in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name()).collect()
    }
}

impl Meter for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        debug!(meter = %self.name, scope = %ctx.scope(), stages = self.children.len(), "sequence");
        for child in &self.children {
            child.evaluate(ctx, store)?;
        }
        Ok(())
    }
}

/// Predicate deciding which branch a [`Condition`] takes.
pub type Predicate =
    Box<dyn Fn(&EvaluationContext<'_>, &ResultStore) -> Result<bool, EvaluationError> + Send + Sync>;

/// Dispatches to one of two children based on already-computed results.
pub struct Condition {
    name: String,
    predicate: Predicate,
    then: Box<dyn Meter>,
    otherwise: Box<dyn Meter>,
}

impl Condition {
    pub fn new(
        name: impl Into<String>,
        predicate: Predicate,
        then: impl Meter + 'static,
        otherwise: impl Meter + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Branches on a flag stored under `flag` within the current scope.
    ///
    /// A missing or non-flag entry fails the evaluation rather than
    /// selecting a branch.
    pub fn on_flag(
        name: impl Into<String>,
        flag: &'static str,
        then: impl Meter + 'static,
        otherwise: impl Meter + 'static,
    ) -> Self {
        Self::new(
            name,
            Box::new(move |ctx: &EvaluationContext<'_>, store: &ResultStore| {
                store.flag(flag, ctx.scope())
            }),
            then,
            otherwise,
        )
    }
}

impl Meter for Condition {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let branch = if (self.predicate)(ctx, store)? {
            &self.then
        } else {
            &self.otherwise
        };
        debug!(meter = %self.name, scope = %ctx.scope(), branch = branch.name(), "condition");
        branch.evaluate(ctx, store)
    }
}

/// Repeats a child once per tag value, extending the scope with that value.
///
/// With failure isolation enabled, recoverable errors from one branch are
/// recorded as a [`FailureMarker`] under [`names::EVALUATION_FAILURE`] and
/// the remaining branches still run. In parallel mode every branch works on
/// a snapshot of the store and the deltas are merged in value order, giving
/// the same store as sequential mode.
pub struct FanOut {
    name: String,
    values: Vec<String>,
    child: Box<dyn Meter>,
    isolate_failures: bool,
    parallel: bool,
}

type BranchOutcome = (Result<(), EvaluationError>, Vec<ResultEntry>);

impl FanOut {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
        child: impl Meter + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            child: Box::new(child),
            isolate_failures: false,
            parallel: false,
        }
    }

    /// Records recoverable branch errors instead of propagating them.
    pub fn isolating_failures(mut self) -> Self {
        self.isolate_failures = true;
        self
    }

    /// Runs branches on scoped worker threads when `parallel` is set.
    pub fn in_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn settle(
        &self,
        branch: &EvaluationContext<'_>,
        result: Result<(), EvaluationError>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let err = match result {
            Ok(()) => return Ok(()),
            Err(err) if self.isolate_failures => err,
            Err(err) => return Err(err),
        };
        let Some(marker) = FailureMarker::from_error(&err) else {
            return Err(err);
        };
        warn!(meter = %self.name, scope = %branch.scope(), error = %err, "branch failed");
        store.set(
            names::EVALUATION_FAILURE,
            branch.scope().clone(),
            Payload::Failure(marker),
            self.name.as_str(),
        )
    }

    fn run_parallel(
        &self,
        branches: &[EvaluationContext<'_>],
        base: &ResultStore,
    ) -> Vec<BranchOutcome> {
        thread::scope(|s| {
            let handles: Vec<_> = branches
                .iter()
                .map(|branch| {
                    let mut local = base.clone();
                    s.spawn(move || {
                        let mark = local.len();
                        let result = self.child.evaluate(branch, &mut local);
                        (result, local.entries_since(mark).to_vec())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }
}

impl Meter for FanOut {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(
        &self,
        ctx: &EvaluationContext<'_>,
        store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        let branches: Vec<EvaluationContext<'_>> =
            self.values.iter().map(|v| ctx.scoped(v)).collect();
        debug!(meter = %self.name, branches = branches.len(), parallel = self.parallel, "fan-out");

        if self.parallel && branches.len() > 1 {
            let outcomes = self.run_parallel(&branches, store);
            for (branch, (result, delta)) in branches.iter().zip(outcomes) {
                store.absorb(delta)?;
                self.settle(branch, result, store)?;
            }
        } else {
            for branch in &branches {
                let result = self.child.evaluate(branch, store);
                self.settle(branch, result, store)?;
            }
        }
        Ok(())
    }
}

/// Placeholder branch that writes nothing.
pub struct Noop {
    name: String,
}

impl Noop {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Meter for Noop {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(
        &self,
        _ctx: &EvaluationContext<'_>,
        _store: &mut ResultStore,
    ) -> Result<(), EvaluationError> {
        Ok(())
    }
}
