//! Step traits and the typed, ordered step chain

use crate::core::{StepError, StepResult};
use crate::execution::engine::{EventSink, ExecutionEvent};
use async_trait::async_trait;
use tracing::{debug, error, info};

/// A single named transformation in a pipeline
#[async_trait]
pub trait Step: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Stable step name used in logs and events
    fn name(&self) -> &'static str;

    /// Transform the input, or halt the pipeline with an error
    async fn run(&self, input: Self::Input) -> StepResult<Self::Output>;
}

/// A fixed sequence of steps where each output feeds the next input
///
/// Sequences are built with [`First::new`] and [`StepSequence::then`];
/// mismatched step types are rejected at compile time.
#[async_trait]
pub trait StepSequence: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Append the step names in execution order
    fn collect_names(&self, names: &mut Vec<&'static str>);

    /// Run every step in order, stopping at the first error
    async fn execute(&self, input: Self::Input, events: &EventSink) -> StepResult<Self::Output>;

    /// Append a step to the sequence
    fn then<S>(self, step: S) -> Then<Self, S>
    where
        Self: Sized,
        S: Step<Input = Self::Output>,
    {
        Then { head: self, step }
    }
}

/// A sequence of exactly one step
pub struct First<S> {
    step: S,
}

impl<S: Step> First<S> {
    pub fn new(step: S) -> Self {
        Self { step }
    }
}

/// A sequence followed by one more step
pub struct Then<H, S> {
    head: H,
    step: S,
}

#[async_trait]
impl<S: Step> StepSequence for First<S> {
    type Input = S::Input;
    type Output = S::Output;

    fn collect_names(&self, names: &mut Vec<&'static str>) {
        names.push(self.step.name());
    }

    async fn execute(&self, input: Self::Input, events: &EventSink) -> StepResult<Self::Output> {
        run_step(&self.step, input, events).await
    }
}

#[async_trait]
impl<H, S> StepSequence for Then<H, S>
where
    H: StepSequence,
    S: Step<Input = H::Output>,
{
    type Input = H::Input;
    type Output = S::Output;

    fn collect_names(&self, names: &mut Vec<&'static str>) {
        self.head.collect_names(names);
        names.push(self.step.name());
    }

    async fn execute(&self, input: Self::Input, events: &EventSink) -> StepResult<Self::Output> {
        let intermediate = self.head.execute(input, events).await?;
        run_step(&self.step, intermediate, events).await
    }
}

/// Run one step, reporting its start and outcome
async fn run_step<S: Step>(step: &S, input: S::Input, events: &EventSink) -> StepResult<S::Output> {
    let name = step.name();
    debug!("Executing step: {}", name);
    events.emit(ExecutionEvent::StepStarted {
        step: name.to_string(),
    });

    match step.run(input).await {
        Ok(output) => {
            debug!("Step {} completed", name);
            events.emit(ExecutionEvent::StepCompleted {
                step: name.to_string(),
            });
            Ok(output)
        }
        Err(StepError::Failure(failure)) => {
            info!(
                "Step {} halted the pipeline: {} ({})",
                name,
                failure.message(),
                failure.classification()
            );
            events.emit(ExecutionEvent::StepFailed {
                step: name.to_string(),
                failure: failure.clone(),
            });
            Err(StepError::Failure(failure))
        }
        Err(StepError::Fault(err)) => {
            error!("Step {} faulted: {:#}", name, err);
            events.emit(ExecutionEvent::StepFaulted {
                step: name.to_string(),
                error: format!("{:#}", err),
            });
            Err(StepError::Fault(err))
        }
    }
}
