//! Registry of the query variant kinds a fan-out analysis can ask for.

/// One kind of generated query variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantKind {
    /// Configuration key, e.g. `follow_up`
    pub key: &'static str,
    /// Label used in prompts, e.g. `Follow-up`
    pub human_label: &'static str,
    pub description: &'static str,
    /// How many variants to produce and what they should look like
    pub generation_instruction: &'static str,
}

impl VariantKind {
    /// Bullet line for the "variant types to generate" block
    pub fn description_line(&self) -> String {
        format!("- {}: {}", self.human_label, self.description)
    }

    /// Bullet line for the fan-out generation section
    pub fn instruction_line(&self) -> String {
        format!(
            "- **{} Queries**: {}",
            self.human_label, self.generation_instruction
        )
    }
}

/// All variant kinds in canonical order
pub const VARIANT_KINDS: [VariantKind; 7] = [
    VariantKind {
        key: "equivalent",
        human_label: "Equivalent",
        description: "Alternative ways to ask the same question",
        generation_instruction: "List 3-5 alternative phrasings users might use",
    },
    VariantKind {
        key: "follow_up",
        human_label: "Follow-up",
        description: "Logical next questions",
        generation_instruction: "List 3-5 logical next questions users would ask",
    },
    VariantKind {
        key: "generalization",
        human_label: "Generalization",
        description: "Broader versions of queries",
        generation_instruction: "List 2-3 broader topic queries",
    },
    VariantKind {
        key: "canonicalization",
        human_label: "Canonicalization",
        description: "Standardized search terms",
        generation_instruction: "List 2-3 standardized versions",
    },
    VariantKind {
        key: "entailment",
        human_label: "Entailment",
        description: "Logically implied queries",
        generation_instruction: "List 2-3 logically implied questions",
    },
    VariantKind {
        key: "specification",
        human_label: "Specification",
        description: "More detailed versions",
        generation_instruction: "List 3-5 more specific/detailed versions",
    },
    VariantKind {
        key: "clarification",
        human_label: "Clarification",
        description: "Intent clarification queries",
        generation_instruction: "List 2-3 questions to clarify intent",
    },
];

/// Keys selected when the user does not choose any
pub const DEFAULT_VARIANT_KEYS: [&str; 4] = ["equivalent", "follow_up", "specification", "entailment"];

/// Look up a variant kind by key
pub fn lookup(key: &str) -> Option<&'static VariantKind> {
    VARIANT_KINDS.iter().find(|kind| kind.key == key.trim())
}

/// The kinds named in `keys`, in canonical order.
///
/// Unknown keys and duplicates are ignored.
pub fn select<S: AsRef<str>>(keys: &[S]) -> Vec<&'static VariantKind> {
    for key in keys {
        if lookup(key.as_ref()).is_none() {
            ::log::debug!("Ignoring unknown variant type: {}", key.as_ref());
        }
    }
    VARIANT_KINDS
        .iter()
        .filter(|kind| keys.iter().any(|key| key.as_ref().trim() == kind.key))
        .collect()
}
