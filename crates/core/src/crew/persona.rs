//! # Agent Personas
//!
//! A persona conditions every prompt sent on behalf of one crew member.
//! Personas are loaded once with the pipeline definition and never mutated.

use serde::{Deserialize, Serialize};

/// A role-playing agent: who it is, what it wants, where it comes from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Persona {
    /// Role title (e.g. "UX/UI Architect")
    pub role: String,
    /// What the agent is trying to achieve
    pub goal: String,
    /// Background that shapes the agent's voice
    pub backstory: String,
    /// Whether the agent may hand work to other agents (never, for this crew)
    #[serde(default)]
    pub allow_delegation: bool,
    /// Log task progress at info level
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

fn default_verbose() -> bool {
    true
}

impl Persona {
    /// System prompt framing every turn this persona takes
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role.trim(),
            self.backstory.trim(),
            self.goal.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_carries_all_attributes() {
        let persona = Persona {
            role: "QA Reviewer".to_string(),
            goal: "Check the code for errors.".to_string(),
            backstory: "You hunt for bugs and shortcomings.".to_string(),
            allow_delegation: false,
            verbose: true,
        };
        let prompt = persona.system_prompt();
        assert!(prompt.starts_with("You are QA Reviewer."));
        assert!(prompt.contains("You hunt for bugs and shortcomings."));
        assert!(prompt.ends_with("Your personal goal is: Check the code for errors."));
    }

    #[test]
    fn test_serde_defaults() {
        let persona: Persona =
            serde_json::from_str(r#"{"role":"r","goal":"g","backstory":"b"}"#).unwrap();
        assert!(!persona.allow_delegation);
        assert!(persona.verbose);
    }
}
