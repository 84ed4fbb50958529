//! Pipeline execution: the executor, its steps, and the load-group pipeline

pub mod engine;
pub mod loader;
pub mod step;
pub mod steps;

pub use engine::{EventHandler, ExecutionEvent, ExecutionStatus, PipelineExecutor};
pub use loader::{load_group_pipeline, LoaderServices, PIPELINE_NAME};
pub use step::{First, Step, StepSequence, Then};
