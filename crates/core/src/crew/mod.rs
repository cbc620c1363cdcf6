//! # Crew Orchestration
//!
//! Personas, task templates and the sequential engine that runs them.
//!
//! ## Pipeline Flow
//!
//! ```text
//! Topic → Architect (design) → Coder (implementation) → Tester (review) → Documenter (manual)
//! ```

pub mod definition;
pub mod engine;
pub mod facade;
pub mod persona;
pub mod pipeline;
pub mod task;

pub use definition::{PipelineDefinition, LANGUAGE_INPUT, TOPIC_INPUT};
pub use engine::{ExecutionEngine, SequentialEngine};
pub use facade::{CrewSettings, PipelineFacade, DEFAULT_LANGUAGE, DEFAULT_TOPIC};
pub use persona::Persona;
pub use pipeline::{Pipeline, PipelineStage};
pub use task::{CrewOutput, PipelineRun, Process, TaskKind, TaskOutput, TaskSpec, TaskTemplate};
