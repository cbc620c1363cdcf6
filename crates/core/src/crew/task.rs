//! # Tasks
//!
//! Templates are part of the pipeline definition; specs are the concrete,
//! per-request tasks a run hands to the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::persona::Persona;

/// Kind of task, in the only order the crew runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Architect lays out sections and visual design
    Design,
    /// Coder turns the design into markup and styling
    Implementation,
    /// Tester reviews the code and proposes fixes
    Review,
    /// Documenter writes a short usage manual
    Documentation,
}

impl TaskKind {
    /// The fixed execution order
    pub const ORDER: [TaskKind; 4] = [
        TaskKind::Design,
        TaskKind::Implementation,
        TaskKind::Review,
        TaskKind::Documentation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Design => "design",
            TaskKind::Implementation => "implementation",
            TaskKind::Review => "review",
            TaskKind::Documentation => "documentation",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A task as written in the pipeline definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskTemplate {
    pub kind: TaskKind,
    /// Persona id this task is bound to
    pub agent: String,
    /// Instruction; may contain `{placeholder}` inputs
    pub description: String,
    /// What a finished task should look like; may contain `{placeholder}` inputs
    pub expected_output: String,
}

impl TaskTemplate {
    /// Bind the template to its persona and fill in run inputs
    pub fn render(
        &self,
        agent_id: &str,
        persona: &Persona,
        inputs: &BTreeMap<String, String>,
    ) -> TaskSpec {
        TaskSpec {
            kind: self.kind,
            agent_id: agent_id.to_string(),
            persona: persona.clone(),
            description: interpolate(&self.description, inputs),
            expected_output: interpolate(&self.expected_output, inputs),
        }
    }
}

/// A concrete task for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub agent_id: String,
    pub persona: Persona,
    pub description: String,
    pub expected_output: String,
}

/// How the engine schedules a run's tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// One task at a time, in order, each seeing the outputs before it
    #[default]
    Sequential,
}

/// Everything the engine needs for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRun {
    pub tasks: Vec<TaskSpec>,
    pub process: Process,
    /// Input bindings used to render the templates
    pub inputs: BTreeMap<String, String>,
}

/// Output of one finished task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub kind: TaskKind,
    pub agent: String,
    pub description: String,
    pub raw: String,
    pub completed_at: DateTime<Utc>,
}

/// Output of a finished run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Final task's output
    pub raw: String,
    /// Every task's output, in execution order
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    pub fn from_tasks(tasks_output: Vec<TaskOutput>) -> Self {
        let raw = tasks_output
            .last()
            .map(|task| task.raw.clone())
            .unwrap_or_default();
        Self { raw, tasks_output }
    }
}

/// Replace `{name}` with `inputs[name]` in a single pass.
///
/// Unknown placeholders and stray braces are kept as written, and
/// substituted values are never re-scanned.
pub fn interpolate(template: &str, inputs: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                // A stray `{` before the placeholder belongs to the literal text
                let inner = after[..close].rfind('{');
                if let Some(i) = inner {
                    out.push_str(&rest[open..open + 1 + i]);
                }
                let key = &after[inner.map_or(0, |i| i + 1)..close];
                match inputs.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_known_placeholder() {
        let out = interpolate(
            "Design a page on the topic: {topic}",
            &inputs(&[("topic", "Bakery")]),
        );
        assert_eq!(out, "Design a page on the topic: Bakery");
    }

    #[test]
    fn test_interpolate_keeps_unknown_and_unbalanced() {
        let vars = inputs(&[("topic", "x")]);
        assert_eq!(interpolate("a {missing} b", &vars), "a {missing} b");
        assert_eq!(interpolate("css { color: red", &vars), "css { color: red");
        assert_eq!(interpolate("no braces", &vars), "no braces");
    }

    #[test]
    fn test_interpolate_after_stray_brace() {
        let vars = inputs(&[("topic", "Bakery")]);
        assert_eq!(
            interpolate("Use a {bold heading for {topic}", &vars),
            "Use a {bold heading for Bakery"
        );
        assert_eq!(interpolate("{{topic}}", &vars), "{Bakery}");
    }

    #[test]
    fn test_interpolate_does_not_rescan_values() {
        let vars = inputs(&[("topic", "{language}"), ("language", "English")]);
        assert_eq!(interpolate("{topic} in {language}", &vars), "{language} in English");
    }

    #[test]
    fn test_crew_output_uses_last_task() {
        let make = |kind, raw: &str| TaskOutput {
            kind,
            agent: "a".to_string(),
            description: "d".to_string(),
            raw: raw.to_string(),
            completed_at: Utc::now(),
        };
        let output = CrewOutput::from_tasks(vec![
            make(TaskKind::Design, "plan"),
            make(TaskKind::Implementation, "code"),
        ]);
        assert_eq!(output.raw, "code");
        assert_eq!(output.tasks_output.len(), 2);
    }

    #[test]
    fn test_task_kind_serialization() {
        let json = serde_json::to_string(&TaskKind::Documentation).unwrap();
        assert_eq!(json, "\"documentation\"");
        assert_eq!(TaskKind::ORDER[0].to_string(), "design");
    }
}
