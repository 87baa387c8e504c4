//! Configuration loaded once at process start
//!
//! Both collaborator credentials must be present before either collaborator
//! is constructed; a missing key is a configuration error surfaced here, not
//! during workflow execution. Workflow logic never reads the environment
//! directly: this struct is built once and handed to whichever component
//! constructs the collaborators.

use std::env;

use crate::error::AgentError;

/// Default model for the generation collaborator
const DEFAULT_MODEL: &str = "gpt-4.1";

/// Configuration for a report agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// API key for the generation service
    pub openai_api_key: String,

    /// API key for the search service
    pub tavily_api_key: String,

    /// Model identifier for the generation collaborator
    pub model: String,

    /// Sampling temperature, if overridden
    pub temperature: Option<f64>,

    /// Default revision ceiling for tasks
    pub max_revisions: usize,
}

impl AgentConfig {
    /// Create a configuration with explicit credentials and defaults elsewhere
    pub fn new(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            tavily_api_key: tavily_api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            max_revisions: 1,
        }
    }

    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file if one exists, then requires `OPENAI_API_KEY` and
    /// `TAVILY_API_KEY`. Optional overrides: `OPENAI_MODEL`, `TEMPERATURE`,
    /// `MAX_REVISIONS`.
    pub fn from_env() -> Result<Self, AgentError> {
        let _ = dotenvy::dotenv();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| AgentError::config("OPENAI_API_KEY environment variable not set"))?;
        let tavily_api_key = env::var("TAVILY_API_KEY")
            .map_err(|_| AgentError::config("TAVILY_API_KEY environment variable not set"))?;

        let mut config = Self::new(openai_api_key, tavily_api_key);

        if let Ok(val) = env::var("OPENAI_MODEL") {
            config.model = val;
        }
        if let Ok(val) = env::var("TEMPERATURE") {
            config.temperature = Some(val.parse().map_err(|_| {
                AgentError::config("TEMPERATURE must be a valid floating-point number")
            })?);
        }
        if let Ok(val) = env::var("MAX_REVISIONS") {
            config.max_revisions = val
                .parse()
                .map_err(|_| AgentError::config("MAX_REVISIONS must be a non-negative integer"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the default revision ceiling
    pub fn with_max_revisions(mut self, max_revisions: usize) -> Self {
        self.max_revisions = max_revisions;
        self
    }

    /// Validate that all values are within acceptable ranges.
    ///
    /// Fails fast here rather than mid-run with a confusing collaborator
    /// error.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.openai_api_key.is_empty() {
            return Err(AgentError::config("OPENAI_API_KEY cannot be empty"));
        }
        if self.tavily_api_key.is_empty() {
            return Err(AgentError::config("TAVILY_API_KEY cannot be empty"));
        }
        if self.model.is_empty() {
            return Err(AgentError::config("model cannot be empty"));
        }
        if let Some(temp) = self.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(AgentError::config(format!(
                    "TEMPERATURE must be between 0.0 and 2.0, got: {temp}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = AgentConfig::new("sk-test", "tvly-test");

        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_revisions, 1);
        assert!(config.temperature.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AgentConfig::new("sk-test", "tvly-test")
            .with_model("gpt-4o-mini")
            .with_temperature(0.3)
            .with_max_revisions(4);

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, Some(0.3));
        assert_eq!(config.max_revisions, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_credentials() {
        assert!(AgentConfig::new("", "tvly-test").validate().is_err());
        assert!(AgentConfig::new("sk-test", "").validate().is_err());
    }

    #[test]
    fn test_validate_temperature_range() {
        let config = AgentConfig::new("sk-test", "tvly-test").with_temperature(3.0);
        assert!(config.validate().is_err());

        let config = AgentConfig::new("sk-test", "tvly-test").with_temperature(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_model() {
        let config = AgentConfig::new("sk-test", "tvly-test").with_model("");
        assert!(config.validate().is_err());
    }
}
