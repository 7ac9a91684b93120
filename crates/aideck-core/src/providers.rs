//! Embeddable AI chat providers

use crate::preferences::DEFAULT_ASSISTANT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Provider {
    pub label: &'static str,
    pub url: &'static str,
}

/// Built-in providers, in menu order
pub const PROVIDERS: &[Provider] = &[
    Provider {
        label: "ChatGPT",
        url: "https://chat.openai.com",
    },
    Provider {
        label: "Copilot",
        url: "https://copilot.microsoft.com/",
    },
    Provider {
        label: "MistralAI",
        url: "https://chat.mistral.ai/chat",
    },
    Provider {
        label: "Claude",
        url: "https://claude.ai/new",
    },
    Provider {
        label: "Gemini",
        url: "https://gemini.google.com/app?hl=fr",
    },
];

pub fn find(label: &str) -> Option<&'static Provider> {
    PROVIDERS.iter().find(|p| p.label == label)
}

/// `label`'s provider, or the default provider for unknown labels.
pub fn resolve(label: &str) -> &'static Provider {
    find(label).unwrap_or_else(|| {
        tracing::warn!(assistant = %label, "Unknown assistant, using default");
        default_provider()
    })
}

pub fn default_provider() -> &'static Provider {
    // DEFAULT_ASSISTANT is always in the table
    PROVIDERS
        .iter()
        .find(|p| p.label == DEFAULT_ASSISTANT)
        .unwrap_or(&PROVIDERS[0])
}
