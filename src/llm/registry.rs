// ABOUTME: Model registry resolving display names to provider endpoints and API keys
// ABOUTME: Built once at startup from the static catalog plus runtime configuration

//! # Model Registry
//!
//! Joins the static model catalog with the keys found in the environment.
//! Resolution happens per request so a missing key fails the request, not
//! the process.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::ServerConfig;
use crate::constants::models::{self, ModelSpec, Provider};
use crate::llm::AvailableModels;

/// One resolvable model: catalog entry plus its runtime API key
#[derive(Debug, Clone)]
pub struct ModelEntry {
    /// Static catalog data
    pub spec: &'static ModelSpec,
    /// Key for the entry's provider, if configured
    pub api_key: Option<String>,
}

/// Registry of models addressable by display name
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    default_model: String,
}

impl ModelRegistry {
    /// Build the registry from server configuration
    ///
    /// An unknown `DEFAULT_MODEL` falls back to the catalog default with a
    /// warning rather than failing startup.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        let entries = models::MODEL_SPECS
            .iter()
            .map(|spec| ModelEntry {
                spec,
                api_key: match spec.provider {
                    Provider::Groq => config.groq_api_key.clone(),
                    Provider::DeepSeek => config.deepseek_api_key.clone(),
                    Provider::Gemini => config.gemini_api_key.clone(),
                },
            })
            .collect();

        let default_model = if models::find_spec(&config.default_model).is_some() {
            config.default_model.clone()
        } else {
            warn!(
                requested = %config.default_model,
                fallback = models::FALLBACK_DEFAULT_MODEL,
                "configured default model is not in the catalog"
            );
            models::FALLBACK_DEFAULT_MODEL.to_owned()
        };

        Self {
            entries,
            default_model,
        }
    }

    /// Look up an entry by display name
    #[must_use]
    pub fn get(&self, display_name: &str) -> Option<&ModelEntry> {
        self.entries
            .iter()
            .find(|entry| entry.spec.display_name == display_name)
    }

    /// Display name of the default model
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Build the client-facing model listing from dropdown-visible entries
    #[must_use]
    pub fn available_models(&self) -> AvailableModels {
        let visible: Vec<&ModelEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.spec.show_in_dropdown)
            .collect();

        let model_info: BTreeMap<String, String> = visible
            .iter()
            .map(|entry| {
                (
                    entry.spec.display_name.to_owned(),
                    entry.spec.info.to_owned(),
                )
            })
            .collect();

        AvailableModels {
            models: visible
                .iter()
                .map(|entry| entry.spec.display_name.to_owned())
                .collect(),
            default_model: self.default_model.clone(),
            model_info,
        }
    }
}
