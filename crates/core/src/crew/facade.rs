//! # Pipeline Façade
//!
//! The one operation the service offers: topic in, crew output out.
//! Holds only read-only data, so a single instance serves every request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::definition::{PipelineDefinition, LANGUAGE_INPUT, TOPIC_INPUT};
use super::engine::ExecutionEngine;
use super::persona::Persona;
use super::task::{CrewOutput, PipelineRun, Process, TaskOutput, TaskSpec};
use crate::error::{CrewError, CrewResult};

/// Topic used when a request carries no prompt
pub const DEFAULT_TOPIC: &str = "modern landing page for a coffee shop";

/// Language of the documenter's manual
pub const DEFAULT_LANGUAGE: &str = "English";

/// Expected output for ad-hoc single-agent tasks
const SINGLE_TASK_EXPECTED_OUTPUT: &str = "A complete answer to the task.";

/// Request-independent settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewSettings {
    pub default_topic: String,
    pub language: String,
}

impl Default for CrewSettings {
    fn default() -> Self {
        Self {
            default_topic: DEFAULT_TOPIC.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Builds runs from the definition and hands them to the engine
pub struct PipelineFacade {
    definition: PipelineDefinition,
    engine: Arc<dyn ExecutionEngine>,
    settings: CrewSettings,
}

impl PipelineFacade {
    pub fn new(
        definition: PipelineDefinition,
        engine: Arc<dyn ExecutionEngine>,
        settings: CrewSettings,
    ) -> Self {
        Self {
            definition,
            engine,
            settings,
        }
    }

    /// Personas in pipeline order
    pub fn roster(&self) -> Vec<(&str, &Persona)> {
        self.definition.roster()
    }

    /// Missing prompt → default topic; a present prompt is used verbatim
    pub fn resolve_topic(&self, prompt: Option<String>) -> String {
        prompt.unwrap_or_else(|| self.settings.default_topic.clone())
    }

    pub fn build_run(&self, prompt: Option<String>) -> CrewResult<PipelineRun> {
        let topic = self.resolve_topic(prompt);
        self.definition.build_run(&topic, &self.settings.language)
    }

    /// Run the full crew for one topic
    #[tracing::instrument(skip(self, prompt), fields(topic_preview = tracing::field::Empty))]
    pub async fn kickoff(&self, prompt: Option<String>) -> CrewResult<CrewOutput> {
        let run = self.build_run(prompt)?;
        if let Some(topic) = run.inputs.get(TOPIC_INPUT) {
            let preview: String = topic.chars().take(50).collect();
            tracing::Span::current().record("topic_preview", preview.as_str());
        }
        tracing::info!("Kicking off crew");
        self.engine.submit(run).await
    }

    /// Run one free-form task with a single persona
    pub async fn run_single(&self, agent_id: &str, task: &str) -> CrewResult<TaskOutput> {
        let kind = self
            .definition
            .tasks
            .iter()
            .find(|template| template.agent == agent_id)
            .map(|template| template.kind)
            .ok_or_else(|| CrewError::UnknownPersona(agent_id.to_string()))?;
        let persona = self.definition.persona(agent_id)?;

        let run = PipelineRun {
            tasks: vec![TaskSpec {
                kind,
                agent_id: agent_id.to_string(),
                persona: persona.clone(),
                description: task.to_string(),
                expected_output: SINGLE_TASK_EXPECTED_OUTPUT.to_string(),
            }],
            process: Process::Sequential,
            inputs: BTreeMap::from([(LANGUAGE_INPUT.to_string(), self.settings.language.clone())]),
        };

        tracing::info!(agent = %agent_id, "Running single-agent task");
        let mut output = self.engine.submit(run).await?;
        output
            .tasks_output
            .pop()
            .ok_or_else(|| CrewError::EmptyCompletion {
                agent: agent_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::task::TaskKind;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Records submitted runs; answers with the run's topic
    #[derive(Default)]
    struct RecordingEngine {
        runs: Mutex<Vec<PipelineRun>>,
        fail: bool,
    }

    #[async_trait]
    impl ExecutionEngine for RecordingEngine {
        async fn submit(&self, run: PipelineRun) -> CrewResult<CrewOutput> {
            self.runs.lock().unwrap().push(run.clone());
            if self.fail {
                return Err(CrewError::UpstreamStatus {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            tokio::task::yield_now().await;
            let topic = run.inputs.get(TOPIC_INPUT).cloned().unwrap_or_default();
            let tasks_output = run
                .tasks
                .iter()
                .map(|task| TaskOutput {
                    kind: task.kind,
                    agent: task.agent_id.clone(),
                    description: task.description.clone(),
                    raw: format!("{} for {}", task.agent_id, topic),
                    completed_at: Utc::now(),
                })
                .collect();
            Ok(CrewOutput::from_tasks(tasks_output))
        }
    }

    fn facade(engine: Arc<RecordingEngine>) -> PipelineFacade {
        PipelineFacade::new(
            PipelineDefinition::builtin().unwrap(),
            engine,
            CrewSettings::default(),
        )
    }

    #[test]
    fn test_resolve_topic() {
        let facade = facade(Arc::new(RecordingEngine::default()));
        assert_eq!(facade.resolve_topic(None), DEFAULT_TOPIC);
        assert_eq!(facade.resolve_topic(Some("Bakery".to_string())), "Bakery");
        assert_eq!(facade.resolve_topic(Some(String::new())), "");
    }

    #[tokio::test]
    async fn test_kickoff_submits_topic() {
        let engine = Arc::new(RecordingEngine::default());
        let facade = facade(engine.clone());

        let output = facade
            .kickoff(Some("Portfolio site for a photographer".to_string()))
            .await
            .unwrap();
        assert_eq!(output.raw, "documenter for Portfolio site for a photographer");

        let runs = engine.runs.lock().unwrap();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].tasks[0]
            .description
            .contains("Portfolio site for a photographer"));
    }

    #[tokio::test]
    async fn test_kickoff_without_prompt_uses_default_topic() {
        let engine = Arc::new(RecordingEngine::default());
        let facade = facade(engine.clone());

        facade.kickoff(None).await.unwrap();

        let runs = engine.runs.lock().unwrap();
        assert!(runs[0].tasks[0]
            .description
            .contains("modern landing page for a coffee shop"));
    }

    #[tokio::test]
    async fn test_kickoff_propagates_engine_failure() {
        let engine = Arc::new(RecordingEngine {
            fail: true,
            ..Default::default()
        });
        let facade = facade(engine);

        let err = facade.kickoff(None).await.unwrap_err();
        assert!(matches!(err, CrewError::UpstreamStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_concurrent_kickoffs_stay_independent() {
        let engine = Arc::new(RecordingEngine::default());
        let facade = Arc::new(facade(engine.clone()));

        let (a, b) = tokio::join!(
            facade.kickoff(Some("Tea room".to_string())),
            facade.kickoff(Some("Bike shop".to_string()))
        );
        assert_eq!(a.unwrap().raw, "documenter for Tea room");
        assert_eq!(b.unwrap().raw, "documenter for Bike shop");

        let runs = engine.runs.lock().unwrap();
        for run in runs.iter() {
            let topic = &run.inputs[TOPIC_INPUT];
            let other = if topic == "Tea room" { "Bike shop" } else { "Tea room" };
            assert!(run.tasks[0].description.contains(topic.as_str()));
            assert!(!run.tasks[0].description.contains(other));
        }
    }

    #[tokio::test]
    async fn test_run_single_uses_named_persona() {
        let engine = Arc::new(RecordingEngine::default());
        let facade = facade(engine.clone());

        let output = facade
            .run_single("tester", "Check this snippet: <div>")
            .await
            .unwrap();
        assert_eq!(output.agent, "tester");
        assert_eq!(output.kind, TaskKind::Review);

        let runs = engine.runs.lock().unwrap();
        assert_eq!(runs[0].tasks.len(), 1);
        assert_eq!(runs[0].tasks[0].persona.role, "QA Reviewer");
        assert_eq!(runs[0].tasks[0].description, "Check this snippet: <div>");
    }

    #[tokio::test]
    async fn test_run_single_rejects_unknown_agent() {
        let facade = facade(Arc::new(RecordingEngine::default()));
        let err = facade.run_single("critic", "anything").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_run_single_rejects_persona_without_task() {
        let mut definition = PipelineDefinition::builtin().unwrap();
        let extra = definition.personas["coder"].clone();
        definition.personas.insert("designer".to_string(), extra);
        let engine = Arc::new(RecordingEngine::default());
        let facade = PipelineFacade::new(definition, engine.clone(), CrewSettings::default());

        let err = facade.run_single("designer", "anything").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(engine.runs.lock().unwrap().is_empty());
    }
}
