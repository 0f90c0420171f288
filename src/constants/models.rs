// ABOUTME: Chat model catalog - display names, provider ids, and base URLs
// ABOUTME: Single source of truth for which models the gateway can serve

//! Static chat model catalog
//!
//! Every model the server can route to is listed here under its display name.
//! API keys are attached at runtime by the registry from [`crate::config::ServerConfig`].

/// Display name used when DEFAULT_MODEL is unset or unknown
pub const FALLBACK_DEFAULT_MODEL: &str = "GPT OSS 120b";

/// Fast model used for intent classification
pub const INTENT_MODEL: &str = "Llama 3.1 Instant";

/// Upstream provider an entry routes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    DeepSeek,
    Gemini,
}

impl Provider {
    /// Provider name for logging
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
            Self::Gemini => "gemini",
        }
    }
}

/// Catalog entry for one chat model
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    /// Display name clients select by
    pub display_name: &'static str,
    /// Provider-side model identifier
    pub model_id: &'static str,
    /// Upstream provider
    pub provider: Provider,
    /// OpenAI-compatible API base URL
    pub base_url: &'static str,
    /// Whether clients should list this model
    pub show_in_dropdown: bool,
    /// Short human-readable blurb for model pickers
    pub info: &'static str,
}

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// All models the gateway can route to
pub const MODEL_SPECS: &[ModelSpec] = &[
    ModelSpec {
        display_name: "GPT OSS 120b",
        model_id: "openai/gpt-oss-120b",
        provider: Provider::Groq,
        base_url: GROQ_BASE_URL,
        show_in_dropdown: true,
        info: "Open-weight 120B model served on Groq, strongest reasoning in the catalog",
    },
    ModelSpec {
        display_name: "Llama 3.3 Versatile",
        model_id: "llama-3.3-70b-versatile",
        provider: Provider::Groq,
        base_url: GROQ_BASE_URL,
        show_in_dropdown: true,
        info: "Llama 3.3 70B, good balance of quality and speed",
    },
    ModelSpec {
        display_name: "Llama 3.1 Instant",
        model_id: "llama-3.1-8b-instant",
        provider: Provider::Groq,
        base_url: GROQ_BASE_URL,
        show_in_dropdown: true,
        info: "Llama 3.1 8B, fastest responses, also used internally for intent detection",
    },
    ModelSpec {
        display_name: "Llama Guard 4",
        model_id: "meta-llama/llama-guard-4-12b",
        provider: Provider::Groq,
        base_url: GROQ_BASE_URL,
        show_in_dropdown: false,
        info: "Safety classifier, not exposed in the model picker",
    },
    ModelSpec {
        display_name: "DeepSeek Chat",
        model_id: "deepseek-chat",
        provider: Provider::DeepSeek,
        base_url: "https://api.deepseek.com/",
        show_in_dropdown: true,
        info: "DeepSeek V3 chat model",
    },
    ModelSpec {
        display_name: "Gemini 2.0 Flash",
        model_id: "gemini-2.0-flash",
        provider: Provider::Gemini,
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai/",
        show_in_dropdown: true,
        info: "Google Gemini 2.0 Flash via the OpenAI-compatible endpoint",
    },
];

/// Look up a catalog entry by display name
#[must_use]
pub fn find_spec(display_name: &str) -> Option<&'static ModelSpec> {
    MODEL_SPECS
        .iter()
        .find(|spec| spec.display_name == display_name)
}
