use crate::catalog::{self, VariantKind};
use crate::config::{AnalysisSettings, Mode};
use crate::error::ConfigurationError;
use crate::prompts::{Section, render_sections};

pub const FAN_OUT_HEADING: &str = "## 1. QUERY FAN-OUT GENERATION";
pub const MULTI_PATH_HEADING: &str = "## 2. MULTI-PATH EXPLORATION";
pub const ARCHITECTURE_HEADING: &str = "## 3. CONTENT ARCHITECTURE";
pub const AI_OVERVIEWS_HEADING: &str = "## 4. AI OVERVIEWS OPTIMIZATION";
pub const AI_MODE_HEADING: &str = "## 5. AI MODE OPTIMIZATION";
pub const ENTITY_MAPPING_HEADING: &str = "## 6. ENTITY MAPPING";
pub const CROSS_VERIFICATION_HEADING: &str = "## 7. CROSS-VERIFICATION STRATEGY";
pub const SCHEMA_HEADING: &str = "## 8. SCHEMA MARKUP STRATEGY";
pub const DIFFERENTIATION_HEADING: &str = "## 9. COMPETITIVE DIFFERENTIATION";
pub const ROADMAP_HEADING: &str = "## 10. IMPLEMENTATION ROADMAP";
pub const METRICS_HEADING: &str = "## 11. SUCCESS METRICS";

const INTRO: &str =
    "You are an expert in Google's Query Fan-Out system and AI-powered search optimization.";

const MULTI_PATH: &str = "Identify different interpretation paths for ambiguous queries:
- Technical vs. General interpretations
- Commercial vs. Informational intents
- Different user contexts (beginner vs. expert)";

const ARCHITECTURE: &str = "Based on the fan-out analysis, provide:
- **Primary Content Hub**: Main pillar page structure
- **Supporting Content**: List of supporting articles needed
- **Content Depth**: Word count recommendations for each piece
- **Internal Linking Strategy**: How to connect the content";

const AI_OVERVIEWS: &str = "For quick answer optimization:
- **Direct Answer Format**: Exact 40-60 word answers for each query
- **Snippet Structure**: Paragraph vs. list vs. table recommendations
- **First 100 Words**: Optimization strategy for immediate visibility
- **FAQ Structure**: Questions and concise answers";

const SNIPPET_TACTICS: &str =
    "- **Featured Snippet Tactics**: Target snippet format and exact wording for each query";

const PAA_TACTICS: &str =
    "- **People Also Ask**: Related questions to answer in 40-60 words each";

const AI_MODE: &str = "For complex query fan-out:
- **Passage-Level Coverage**: Key passages to include
- **Semantic Completeness**: Topics that must be covered
- **Entity Relationships**: Core entities and their connections
- **Progressive Disclosure**: Information architecture strategy";

const ENTITY_MAPPING: &str = "- **Core Entities**: Primary entities to define
- **Entity Relationships**: How entities connect
- **Knowledge Graph**: Visual representation of connections
- **Semantic Markup**: Schema.org recommendations";

const CROSS_VERIFICATION: &str = "- **Fact Verification**: Key facts to verify and cite
- **Contradictory Information**: How to handle conflicting data
- **Authority Signals**: Sources and citations to include
- **Trust Indicators**: Elements that build credibility";

const SCHEMA: &str = "- **Essential Schemas**: Required schema types
- **FAQ Schema**: Questions and answers
- **HowTo Schema**: Step-by-step processes
- **Article/BlogPosting**: Metadata requirements";

const DIFFERENTIATION: &str = "- **Content Gaps**: What competitors likely miss
- **Unique Angles**: Fresh perspectives to explore
- **10x Content**: How to create superior content
- **Differentiation Strategy**: Unique value propositions";

const ROADMAP: &str = "Provide a prioritized action plan:
1. **Quick Wins**: Content that can rank quickly
2. **Foundation Content**: Essential pieces to create first
3. **Supporting Content**: Secondary pieces to develop
4. **Enhancement Strategy**: Ongoing optimization approach";

const METRICS: &str = "- **Ranking Targets**: Expected positions for each query
- **Visibility Indicators**: AI mode appearance signals
- **Engagement Metrics**: User behavior targets
- **Conversion Goals**: Business outcomes to track";

const CLOSING: &str = "Format your response with clear sections, bullet points, and actionable recommendations.
Focus on practical implementation using Google's Query Fan-Out methodology.";

/// Inputs visible to planning sections
pub struct PlanningContext<'a> {
    pub queries: &'a [String],
    pub settings: &'a AnalysisSettings,
    /// Selected variant kinds in catalog order
    pub variants: Vec<&'static VariantKind>,
}

impl<'a> PlanningContext<'a> {
    pub fn new(queries: &'a [String], settings: &'a AnalysisSettings) -> Self {
        Self {
            queries,
            settings,
            variants: catalog::select(&settings.variant_types),
        }
    }
}

/// The analysis sections in emission order
pub fn sections<'a>() -> Vec<Section<PlanningContext<'a>>> {
    vec![
        Section::always(FAN_OUT_HEADING, |ctx: &PlanningContext| {
            let mut lines = vec!["For each target query, generate ALL requested variant types:".to_string()];
            lines.extend(ctx.variants.iter().map(|v| v.instruction_line()));
            lines.join("\n")
        }),
        Section::always(MULTI_PATH_HEADING, |_| MULTI_PATH.to_string()),
        Section::always(ARCHITECTURE_HEADING, |_| ARCHITECTURE.to_string()),
        Section::new(
            AI_OVERVIEWS_HEADING,
            |ctx: &PlanningContext| ctx.settings.ai_search_type.includes_overviews(),
            |ctx: &PlanningContext| {
                let mut body = AI_OVERVIEWS.to_string();
                if ctx.settings.include_snippet_optimization {
                    body.push('\n');
                    body.push_str(SNIPPET_TACTICS);
                }
                if ctx.settings.include_paa_optimization {
                    body.push('\n');
                    body.push_str(PAA_TACTICS);
                }
                body
            },
        ),
        Section::new(
            AI_MODE_HEADING,
            |ctx: &PlanningContext| ctx.settings.ai_search_type.includes_ai_mode(),
            |_| AI_MODE.to_string(),
        ),
        Section::new(
            ENTITY_MAPPING_HEADING,
            |ctx: &PlanningContext| ctx.settings.include_entity_mapping,
            |_| ENTITY_MAPPING.to_string(),
        ),
        Section::new(
            CROSS_VERIFICATION_HEADING,
            |ctx: &PlanningContext| ctx.settings.include_cross_verification,
            |_| CROSS_VERIFICATION.to_string(),
        ),
        Section::new(
            SCHEMA_HEADING,
            |ctx: &PlanningContext| ctx.settings.include_schema,
            |_| SCHEMA.to_string(),
        ),
        Section::new(
            DIFFERENTIATION_HEADING,
            |ctx: &PlanningContext| ctx.settings.include_competitors,
            |_| DIFFERENTIATION.to_string(),
        ),
        Section::always(ROADMAP_HEADING, |_| ROADMAP.to_string()),
        Section::always(METRICS_HEADING, |_| METRICS.to_string()),
    ]
}

fn context_block(settings: &AnalysisSettings) -> String {
    let audience = match settings.target_audience.trim() {
        "" => "General audience",
        audience => audience,
    };
    format!(
        "CONTEXT:\n- Target Audience: {}\n- Content Type: {}\n- Optimization Target: {}\n- Analysis Depth: {}",
        audience,
        settings.content_type.as_str(),
        settings.ai_search_type.title(),
        settings.depth.as_str()
    )
}

/// Build the prompt that plans new content for `queries`.
///
/// Fails before emitting anything if the query list is empty or the settings
/// are not usable for planning.
pub fn build_planning_prompt(
    queries: &[String],
    settings: &AnalysisSettings,
) -> Result<String, ConfigurationError> {
    settings.validate_for(Mode::NewContent)?;
    if queries.iter().all(|q| q.trim().is_empty()) {
        return Err(ConfigurationError::NoQueries);
    }

    let ctx = PlanningContext::new(queries, settings);

    let variant_block = ctx
        .variants
        .iter()
        .map(|v| v.description_line())
        .collect::<Vec<_>>()
        .join("\n");

    let query_block = queries
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let parts = [
        INTRO.to_string(),
        context_block(settings),
        format!("QUERY VARIANT TYPES TO GENERATE:\n{}", variant_block),
        format!("TARGET QUERIES FOR NEW CONTENT:\n{}", query_block),
        "Please provide a comprehensive Query Fan-Out analysis following Google's methodology:"
            .to_string(),
        render_sections(&sections(), &ctx),
        CLOSING.to_string(),
    ];

    let prompt = parts.join("\n\n");
    ::log::debug!(
        "Built planning prompt: {} queries, {} variant types, {} bytes",
        queries.len(),
        ctx.variants.len(),
        prompt.len()
    );
    Ok(prompt)
}
