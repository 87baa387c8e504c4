//! Generation collaborator
//!
//! The workflow treats language generation as an opaque capability behind
//! [`GenerationProvider`]. The production implementation wraps rig-core's
//! OpenAI client; tests substitute deterministic mocks.

use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai::Client;
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::AgentError;

/// Opaque language-generation capability.
///
/// Takes a system template and the step's dynamic content, returns generated
/// text. Failures are fatal to the current run; no retry happens here.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for a rendered prompt
    async fn generate(&self, system_prompt: &str, input: &str) -> Result<String, AgentError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Generation provider backed by the OpenAI API via rig-core
pub struct OpenAiGeneration {
    client: Client,
    model: String,
    temperature: Option<f64>,
}

impl OpenAiGeneration {
    /// Create a provider with an explicit API key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self {
            client: Client::from_val(api_key.into()),
            model: model.into(),
            temperature: None,
        }
    }

    /// Create a provider from a validated configuration
    pub fn from_config(config: &AgentConfig) -> Self {
        let mut provider = Self::new(&config.openai_api_key, &config.model);
        provider.temperature = config.temperature;
        provider
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[async_trait]
impl GenerationProvider for OpenAiGeneration {
    async fn generate(&self, system_prompt: &str, input: &str) -> Result<String, AgentError> {
        debug!(model = %self.model, input_len = input.len(), "requesting completion");

        let mut builder = self.client.agent(&self.model).preamble(system_prompt);
        if let Some(temp) = self.temperature {
            builder = builder.temperature(temp);
        }
        let agent = builder.build();

        agent
            .prompt(input)
            .await
            .map_err(|e| AgentError::generation(format!("OpenAI completion failed: {e}")))
    }

    fn name(&self) -> &str {
        "openai"
    }
}
