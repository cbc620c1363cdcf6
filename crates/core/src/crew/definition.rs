//! # Pipeline Definition
//!
//! The crew's shape as data: a persona roster and the ordered task
//! templates bound to it. A default definition is bundled at compile time;
//! deployments may point at their own JSON file instead.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::persona::Persona;
use super::task::{interpolate, PipelineRun, Process, TaskKind, TaskTemplate};
use crate::error::{CrewError, CrewResult};

/// Input binding holding the user's topic
pub const TOPIC_INPUT: &str = "topic";

/// Input binding holding the manual's language
pub const LANGUAGE_INPUT: &str = "language";

/// Stand-in topic used to check the design template renders it
const TOPIC_SENTINEL: &str = "\u{1}topic\u{1}";

/// Bundled definition: architect → coder → tester → documenter
const BUILTIN: &str = include_str!("defaults/pipeline.json");

/// Personas plus the ordered task templates that reference them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub personas: BTreeMap<String, Persona>,
    pub tasks: Vec<TaskTemplate>,
}

impl PipelineDefinition {
    /// The bundled definition
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN).context("Bundled pipeline definition is invalid")
    }

    /// Parse and validate a definition from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let definition: Self =
            serde_json::from_str(json).context("Failed to parse pipeline definition")?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load and validate a definition file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read pipeline definition: {:?}", path))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid pipeline definition: {:?}", path))
    }

    /// Check the shape every run relies on
    pub fn validate(&self) -> CrewResult<()> {
        let kinds: Vec<TaskKind> = self.tasks.iter().map(|t| t.kind).collect();
        if kinds != TaskKind::ORDER {
            return Err(CrewError::InvalidDefinition(format!(
                "tasks must run design → implementation → review → documentation, got {:?}",
                kinds
            )));
        }

        let mut bound = HashSet::new();
        for task in &self.tasks {
            if !self.personas.contains_key(&task.agent) {
                return Err(CrewError::InvalidDefinition(format!(
                    "{} task references unknown agent '{}'",
                    task.kind, task.agent
                )));
            }
            if !bound.insert(task.agent.as_str()) {
                return Err(CrewError::InvalidDefinition(format!(
                    "agent '{}' is bound to more than one task",
                    task.agent
                )));
            }
        }

        if let Some((id, _)) = self.personas.iter().find(|(_, p)| p.allow_delegation) {
            return Err(CrewError::InvalidDefinition(format!(
                "agent '{}' allows delegation",
                id
            )));
        }

        if let Some(id) = self.personas.keys().find(|id| !bound.contains(id.as_str())) {
            return Err(CrewError::InvalidDefinition(format!(
                "agent '{}' is not bound to any task",
                id
            )));
        }

        // The topic must survive rendering, not just appear in the text
        let sentinel = BTreeMap::from([(TOPIC_INPUT.to_string(), TOPIC_SENTINEL.to_string())]);
        if !interpolate(&self.tasks[0].description, &sentinel).contains(TOPIC_SENTINEL) {
            return Err(CrewError::InvalidDefinition(
                "design task description must contain the {topic} placeholder".to_string(),
            ));
        }

        Ok(())
    }

    pub fn persona(&self, id: &str) -> CrewResult<&Persona> {
        self.personas
            .get(id)
            .ok_or_else(|| CrewError::UnknownPersona(id.to_string()))
    }

    /// Personas in the order their tasks run
    pub fn roster(&self) -> Vec<(&str, &Persona)> {
        self.tasks
            .iter()
            .filter_map(|task| {
                self.personas
                    .get_key_value(&task.agent)
                    .map(|(id, persona)| (id.as_str(), persona))
            })
            .collect()
    }

    /// Build a fresh run for one request
    pub fn build_run(&self, topic: &str, language: &str) -> CrewResult<PipelineRun> {
        let inputs: BTreeMap<String, String> = [
            (TOPIC_INPUT.to_string(), topic.to_string()),
            (LANGUAGE_INPUT.to_string(), language.to_string()),
        ]
        .into_iter()
        .collect();

        let tasks = self
            .tasks
            .iter()
            .map(|template| {
                let persona = self.persona(&template.agent)?;
                Ok(template.render(&template.agent, persona, &inputs))
            })
            .collect::<CrewResult<Vec<_>>>()?;

        Ok(PipelineRun {
            tasks,
            process: Process::Sequential,
            inputs,
        })
    }
}
