//! # Configuration
//!
//! Command line and environment settings, read once at startup. The
//! endpoint variables keep their OpenAI-client names so an existing `.env`
//! for a local Ollama setup works unchanged.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sitecrew_core::crew::{
    CrewSettings, PipelineDefinition, PipelineFacade, DEFAULT_LANGUAGE, DEFAULT_TOPIC,
};
use sitecrew_core::models::{ModelConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, PLACEHOLDER_API_KEY};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Default listen port
pub const DEFAULT_PORT: u16 = 5005;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "SiteCrew - four-agent webpage crew")]
pub struct Args {
    #[command(flatten)]
    pub crew: CrewArgs,
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
        host: IpAddr,
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Run the crew once and print the final output (no server)
    Run {
        /// Webpage topic; the default topic is used when omitted
        prompt: Option<String>,
    },
    /// Print the agent roster
    Agents,
}

impl Default for CliCommand {
    fn default() -> Self {
        CliCommand::Serve {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// Settings shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct CrewArgs {
    /// OpenAI-compatible API base URL
    #[arg(long, env = "OPENAI_API_BASE", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Model served by the endpoint
    #[arg(long, env = "OPENAI_MODEL_NAME", default_value = DEFAULT_MODEL, global = true)]
    pub model: String,

    /// Bearer credential (local endpoints ignore it)
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        default_value = PLACEHOLDER_API_KEY,
        hide_env_values = true,
        global = true
    )]
    pub api_key: String,

    /// Language of the generated manual
    #[arg(long, env = "SITECREW_LANGUAGE", default_value = DEFAULT_LANGUAGE, global = true)]
    pub language: String,

    /// Topic used when a request has no prompt
    #[arg(long, env = "SITECREW_DEFAULT_TOPIC", default_value = DEFAULT_TOPIC, global = true)]
    pub default_topic: String,

    /// Pipeline definition JSON (defaults to the bundled crew)
    #[arg(long, env = "SITECREW_PIPELINE", global = true)]
    pub pipeline: Option<PathBuf>,

    /// Per-request timeout for the inference endpoint, in seconds
    #[arg(long, env = "SITECREW_REQUEST_TIMEOUT_SECS", global = true)]
    pub request_timeout_secs: Option<u64>,
}

impl CrewArgs {
    pub fn model_config(&self) -> ModelConfig {
        let config = ModelConfig::new(&self.model)
            .with_base_url(&self.base_url)
            .with_api_key(&self.api_key);
        match self.request_timeout_secs {
            Some(secs) => config.with_timeout_secs(secs),
            None => config,
        }
    }

    pub fn crew_settings(&self) -> CrewSettings {
        CrewSettings {
            default_topic: self.default_topic.clone(),
            language: self.language.clone(),
        }
    }

    pub async fn load_definition(&self) -> Result<PipelineDefinition> {
        match &self.pipeline {
            Some(path) => {
                tracing::info!("Loading pipeline definition from {:?}", path);
                PipelineDefinition::load(path).await
            }
            None => PipelineDefinition::builtin(),
        }
    }

    /// Load the definition and wire the production engine
    pub async fn build_facade(&self) -> Result<PipelineFacade> {
        let definition = self.load_definition().await?;
        Ok(sitecrew_core::assemble(
            self.model_config(),
            definition,
            self.crew_settings(),
        )?)
    }
}
