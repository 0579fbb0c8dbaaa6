use crate::gateway::ProviderKind;

/// A model offered for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const GEMINI_MODELS: [ModelInfo; 4] = [
    ModelInfo {
        id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        description: "Most capable model for highly complex tasks and coding",
    },
    ModelInfo {
        id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        description: "Best for fast performance on everyday tasks",
    },
    ModelInfo {
        id: "gemini-2.5-flash-lite",
        name: "Gemini 2.5 Flash-Lite",
        description: "Best for high-volume, cost-efficient tasks",
    },
    ModelInfo {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        description: "Next-gen features, speed, and real-time streaming",
    },
];

const OPENAI_MODELS: [ModelInfo; 5] = [
    ModelInfo {
        id: "o1",
        name: "O1 (Best Reasoning)",
        description: "Most advanced reasoning and thinking model",
    },
    ModelInfo {
        id: "o1-preview",
        name: "O1 Preview",
        description: "Preview version with strong reasoning",
    },
    ModelInfo {
        id: "o1-mini",
        name: "O1 Mini",
        description: "Faster reasoning model",
    },
    ModelInfo {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Latest GPT-4, fast and capable",
    },
    ModelInfo {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        description: "Smaller, faster, more affordable",
    },
];

const ANTHROPIC_MODELS: [ModelInfo; 3] = [
    ModelInfo {
        id: "claude-3-5-sonnet-20241022",
        name: "Claude 3.5 Sonnet",
        description: "Best overall - excellent reasoning",
    },
    ModelInfo {
        id: "claude-3-opus-20240229",
        name: "Claude 3 Opus",
        description: "Most capable for complex tasks",
    },
    ModelInfo {
        id: "claude-3-haiku-20240307",
        name: "Claude 3 Haiku",
        description: "Fast and efficient",
    },
];

/// Known models for a provider, preferred first
pub fn models_for(provider: ProviderKind) -> &'static [ModelInfo] {
    match provider {
        ProviderKind::Gemini => &GEMINI_MODELS,
        ProviderKind::OpenAi => &OPENAI_MODELS,
        ProviderKind::Anthropic => &ANTHROPIC_MODELS,
    }
}

/// Model used when none is chosen
pub fn default_model(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::Gemini => "gemini-2.5-flash",
        ProviderKind::OpenAi => "gpt-4o",
        ProviderKind::Anthropic => "claude-3-5-sonnet-20241022",
    }
}

/// Look up a known model; unknown ids are still usable, they just have no entry
pub fn find(provider: ProviderKind, id: &str) -> Option<&'static ModelInfo> {
    models_for(provider).iter().find(|m| m.id == id)
}
