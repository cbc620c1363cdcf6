//! # SiteCrew Core
//!
//! A four-agent crew that turns a topic into a webpage design, the HTML/CSS
//! for it, a review of that code, and a short manual.
//!
//! ## Architecture
//!
//! - `crew/` - Personas, task templates, the pipeline definition, the
//!   sequential engine and the façade in front of it
//! - `llm` - Chat-completion seam and the OpenAI-compatible client
//! - `models` - Inference endpoint configuration
//! - `error` - Failure taxonomy for a run
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sitecrew_core::{assemble, crew::{CrewSettings, PipelineDefinition}, models::ModelConfig};
//!
//! let facade = assemble(ModelConfig::default(), PipelineDefinition::builtin()?, CrewSettings::default())?;
//! let output = facade.kickoff(Some("Portfolio site for a photographer".into())).await?;
//! println!("{}", output.raw);
//! ```

pub mod crew;
pub mod error;
pub mod llm;
pub mod models;

use std::sync::Arc;

use crew::{CrewSettings, PipelineDefinition, PipelineFacade, SequentialEngine};
use error::CrewResult;
use llm::OpenAiChat;
use models::ModelConfig;

/// Wire the production engine (OpenAI-compatible endpoint) behind a façade
pub fn assemble(
    config: ModelConfig,
    definition: PipelineDefinition,
    settings: CrewSettings,
) -> CrewResult<PipelineFacade> {
    tracing::info!(
        base_url = %config.base_url,
        model = %config.model,
        "Crew configured"
    );
    let engine = SequentialEngine::new(OpenAiChat::new(config)?);
    Ok(PipelineFacade::new(definition, Arc::new(engine), settings))
}
