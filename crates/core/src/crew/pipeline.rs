//! # Pipeline Stages
//!
//! Tracks where a run is. The engine owns one [`Pipeline`] per run.

use serde::{Deserialize, Serialize};

use super::task::TaskKind;

/// Stage of a crew run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Not started
    Pending,
    /// Architect drafting the design
    Designing,
    /// Coder writing markup and styles
    Implementing,
    /// Tester reviewing the code
    Reviewing,
    /// Documenter writing the manual
    Documenting,
    /// Complete
    Complete,
    /// Failed
    Failed,
}

impl From<TaskKind> for PipelineStage {
    fn from(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Design => PipelineStage::Designing,
            TaskKind::Implementation => PipelineStage::Implementing,
            TaskKind::Review => PipelineStage::Reviewing,
            TaskKind::Documentation => PipelineStage::Documenting,
        }
    }
}

/// The pipeline state machine
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Current stage
    pub stage: PipelineStage,
    /// Number of tasks finished so far
    pub completed: usize,
    /// Number of tasks in the run
    pub total: usize,
}

impl Pipeline {
    /// Create a pipeline for a run of `total` tasks
    pub fn new(total: usize) -> Self {
        Self {
            stage: PipelineStage::Pending,
            completed: 0,
            total,
        }
    }

    /// Enter the stage for the next task
    pub fn begin(&mut self, kind: TaskKind) {
        if !self.is_complete() {
            self.stage = kind.into();
        }
    }

    /// Record the current task as done
    pub fn finish_task(&mut self) {
        if self.is_complete() {
            return;
        }
        self.completed += 1;
        if self.completed >= self.total {
            self.stage = PipelineStage::Complete;
        }
    }

    /// Fail the pipeline
    pub fn fail(&mut self) {
        self.stage = PipelineStage::Failed;
    }

    /// Check if pipeline is complete
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, PipelineStage::Complete | PipelineStage::Failed)
    }

    /// Check if pipeline succeeded
    pub fn is_success(&self) -> bool {
        self.stage == PipelineStage::Complete
    }
}
