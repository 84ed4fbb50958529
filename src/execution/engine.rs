//! Pipeline executor - runs a step sequence and reports what happened

use crate::core::{FailureDescriptor, Outcome, StepError};
use crate::execution::step::StepSequence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// How a pipeline run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Every step succeeded
    Completed,
    /// A step returned a modeled failure
    Failed,
    /// A step hit an unexpected fault
    Faulted,
}

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
    },
    StepStarted {
        step: String,
    },
    StepCompleted {
        step: String,
    },
    StepFailed {
        step: String,
        failure: FailureDescriptor,
    },
    StepFaulted {
        step: String,
        error: String,
    },
    PipelineCompleted {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

/// Fan-out of execution events to registered handlers
#[derive(Clone, Default)]
pub struct EventSink {
    handlers: Vec<EventHandler>,
}

impl EventSink {
    pub fn add(&mut self, handler: EventHandler) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: ExecutionEvent) {
        for handler in &self.handlers {
            handler(event.clone());
        }
    }
}

/// Runs a fixed step sequence over one input
///
/// Steps run strictly in declaration order. The first modeled failure
/// is returned as `Ok(Err(failure))` without running later steps; a
/// fault is returned as the outer `Err`. The executor never retries,
/// reorders or transforms step results.
pub struct PipelineExecutor<Q> {
    name: String,
    steps: Q,
    events: EventSink,
}

impl<Q: StepSequence> PipelineExecutor<Q> {
    pub fn new(name: impl Into<String>, steps: Q) -> Self {
        Self {
            name: name.into(),
            steps,
            events: EventSink::default(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.events.add(Arc::new(handler));
    }

    pub fn with_event_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        self.add_event_handler(handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.steps.collect_names(&mut names);
        names
    }

    /// Execute the pipeline
    pub async fn run(&self, input: Q::Input) -> anyhow::Result<Outcome<Q::Output>> {
        let execution_id = Uuid::new_v4();
        info!("Starting pipeline execution: {} ({})", self.name, execution_id);
        self.events.emit(ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name: self.name.clone(),
        });

        let (status, result) = match self.steps.execute(input, &self.events).await {
            Ok(output) => (ExecutionStatus::Completed, Ok(Ok(output))),
            Err(StepError::Failure(failure)) => (ExecutionStatus::Failed, Ok(Err(failure))),
            Err(StepError::Fault(err)) => {
                error!("Pipeline {} aborted by fault: {:#}", self.name, err);
                (ExecutionStatus::Faulted, Err(err))
            }
        };

        info!(
            "Pipeline execution finished: {} ({}) - {:?}",
            self.name, execution_id, status
        );
        self.events.emit(ExecutionEvent::PipelineCompleted {
            execution_id,
            status,
        });

        result
    }
}
