//! # Sequential Engine
//!
//! Runs a [`PipelineRun`] one task at a time. Each task's prompt carries the
//! raw output of every task before it, so the coder sees the architect's
//! plan, the tester sees both, and so on.
//!
//! ```text
//! design ──► implementation ──► review ──► documentation
//!   │              ▲   │           ▲  │          ▲
//!   └──── context ─┘   └─ context ─┘  └─ context ┘
//! ```

use async_trait::async_trait;
use chrono::Utc;

use super::pipeline::Pipeline;
use super::task::{CrewOutput, PipelineRun, TaskOutput, TaskSpec};
use crate::error::{CrewError, CrewResult};
use crate::llm::{ChatModel, ChatRequest};

/// Separator between previous task outputs in a task's context
const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Something that can execute an ordered set of tasks
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Execute every task in order and return the aggregated output.
    /// A failing task aborts the run; no partial output is returned.
    async fn submit(&self, run: PipelineRun) -> CrewResult<CrewOutput>;
}

/// Engine that drives each task through a [`ChatModel`]
pub struct SequentialEngine<M> {
    model: M,
}

impl<M: ChatModel> SequentialEngine<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    #[tracing::instrument(skip(self, run), fields(tasks = run.tasks.len()))]
    async fn execute(&self, run: PipelineRun) -> CrewResult<CrewOutput> {
        tracing::debug!(process = ?run.process, inputs = ?run.inputs, "Crew run started");
        let mut pipeline = Pipeline::new(run.tasks.len());
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(run.tasks.len());

        for task in &run.tasks {
            pipeline.begin(task.kind);
            log_progress(task, "Working on task");

            let request = ChatRequest {
                agent: task.agent_id.clone(),
                system_prompt: task.persona.system_prompt(),
                user_prompt: user_prompt(task, &outputs),
            };

            let raw = match self.model.complete(request).await {
                Ok(raw) => raw,
                Err(e) => {
                    pipeline.fail();
                    tracing::warn!(
                        task = %task.kind,
                        agent = %task.agent_id,
                        completed = pipeline.completed,
                        "Task failed, aborting run: {}",
                        e
                    );
                    return Err(CrewError::TaskFailed {
                        task: task.kind.to_string(),
                        agent: task.agent_id.clone(),
                        source: Box::new(e),
                    });
                }
            };

            log_progress(task, "Task finished");
            tracing::debug!(agent = %task.agent_id, output = %raw, "Task output");

            outputs.push(TaskOutput {
                kind: task.kind,
                agent: task.agent_id.clone(),
                description: task.description.clone(),
                raw,
                completed_at: Utc::now(),
            });
            pipeline.finish_task();
        }

        tracing::info!(
            success = pipeline.is_success(),
            completed = pipeline.completed,
            "Crew run finished"
        );
        Ok(CrewOutput::from_tasks(outputs))
    }
}

#[async_trait]
impl<M: ChatModel> ExecutionEngine for SequentialEngine<M> {
    async fn submit(&self, run: PipelineRun) -> CrewResult<CrewOutput> {
        self.execute(run).await
    }
}

/// Task prompt: instruction, expected output, then prior outputs as context
fn user_prompt(task: &TaskSpec, previous: &[TaskOutput]) -> String {
    let mut prompt = format!(
        "{}\n\nThis is the expected criteria for your final answer: {}\n\
         You MUST return the actual complete content as the final answer, not a summary.",
        task.description.trim(),
        task.expected_output.trim()
    );

    if !previous.is_empty() {
        let context = previous
            .iter()
            .map(|output| output.raw.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(&context);
    }

    prompt
}

fn log_progress(task: &TaskSpec, message: &str) {
    if task.persona.verbose {
        tracing::info!(task = %task.kind, agent = %task.persona.role, "{}", message);
    } else {
        tracing::debug!(task = %task.kind, agent = %task.persona.role, "{}", message);
    }
}
