use crate::config::{AnalysisSettings, Mode};
use crate::error::ConfigurationError;
use crate::parsers::take_tokens;
use crate::prompts::{Section, render_sections};
use crate::results::DocumentModel;

/// Headings listed in the outline
pub const MAX_OUTLINE_HEADINGS: usize = 20;
/// Tokens of body text included as a sample
pub const MAX_EXCERPT_TOKENS: usize = 1000;
/// Headings listed per competitor
const COMPETITOR_HEADINGS: usize = 5;

pub const ANSWER_BOX_HEADING: &str = "## 1. QUICK WIN: ANSWER BOX OPTIMIZATION";
pub const VARIANT_COVERAGE_HEADING: &str = "## 2. QUERY VARIANT COVERAGE ANALYSIS";
pub const REWRITES_HEADING: &str = "## 3. CRITICAL CONTENT REWRITES";
pub const STRUCTURE_HEADING: &str = "## 4. STRUCTURAL IMPROVEMENTS";
pub const METADATA_HEADING: &str = "## 5. METADATA OPTIMIZATION";
pub const FAQ_HEADING: &str = "## 6. FAQ SECTION TO ADD (Copy-Paste Ready)";
pub const LINKING_HEADING: &str = "## 7. INTERNAL LINKING OPTIMIZATION";
pub const SCHEMA_HEADING: &str = "## 8. SCHEMA MARKUP TO IMPLEMENT";
pub const PRIORITY_HEADING: &str = "## 9. IMPLEMENTATION PRIORITY";
pub const RESULTS_HEADING: &str = "## 10. EXPECTED RESULTS";
pub const COMPETITOR_GAP_HEADING: &str = "## 11. COMPETITOR GAP ANALYSIS";

const INTRO: &str = "You are an expert content optimizer specializing in Google's Query Fan-Out system and AI Overviews optimization.

CRITICAL INSTRUCTION: Provide SPECIFIC, ACTIONABLE REWRITES that can be directly copy-pasted into the content. Not generic advice.";

const ANSWER_BOX: &str = "### Current Opening (if exists)
```
[Extract and show the current opening paragraph]
```

### OPTIMIZED REWRITE FOR AI OVERVIEW
```
[Provide a completely rewritten opening that:
- Answers the primary query in the first 40-60 words
- Uses natural, conversational tone matching the original style
- Includes the primary keyword naturally
- Structures for featured snippet extraction]
```

### Implementation Notes
- Why this works better: [Brief explanation]
- Expected impact: [Specific ranking/CTR improvement]";

const VARIANT_COVERAGE: &str = "### Missing Query Variants Your Content Doesn't Answer:
1. **[Specific query variant]** - Not covered
2. **[Specific query variant]** - Partially covered in [section]
3. **[Specific query variant]** - Not covered

### NEW SECTIONS TO ADD (Copy-Paste Ready)

#### New Section 1: [Specific Heading]
```markdown
## [Exact Heading to Add]

[Write 150-200 words of ready-to-use content that:
- Answers the specific query variant
- Maintains the original writing style
- Includes relevant entities and keywords
- Uses proper formatting for AI extraction]
```

#### New Section 2: [Specific Heading]
```markdown
## [Exact Heading to Add]

[Write another 150-200 words of ready-to-use content]
```";

const REWRITES: &str = "### REWRITE 1: [Specific Section Name]

**Current Version Issues:**
- [Specific problem 1]
- [Specific problem 2]

**OPTIMIZED REWRITE:**
```markdown
[Provide complete rewritten section that:
- Fixes the identified issues
- Adds query variant coverage
- Improves for AI extraction
- Maintains original tone and style]
```

### REWRITE 2: [Another Section Name]

**Current Version Issues:**
- [Specific problem]

**OPTIMIZED REWRITE:**
```markdown
[Complete rewritten section]
```";

const STRUCTURE: &str = "### Current Structure Problem
[Identify specific structural issue]

### EXACT RESTRUCTURING PLAN
```
1. Move [specific section] to position 2
2. Combine [section X] with [section Y] under new heading: \"[New Heading]\"
3. Break up [long section] into:
   - [New subsection 1]
   - [New subsection 2]
   - [New subsection 3]
4. Add new section after [specific location]: \"[New Section Title]\"
```";

const FAQ: &str = "Add this exact FAQ section to capture more query variants:

```markdown
## Frequently Asked Questions

### [Question 1 that targets a specific query variant]
[40-60 word answer that's voice-search optimized]

### [Question 2 that targets another variant]
[40-60 word answer]

### [Question 3 that targets another variant]
[40-60 word answer]

### [Question 4 that targets another variant]
[40-60 word answer]
```";

const LINKING: &str = "### Links to ADD:
1. In paragraph about [topic], add link to [URL] with anchor text \"[exact anchor text]\"
2. In section [X], add link to [URL] with anchor text \"[exact anchor text]\"
3. After [specific sentence], add: \"Learn more about [anchor text](URL)\"

### Links to REMOVE or UPDATE:
1. Remove link in [location] - reason: [specific reason]
2. Change \"[current anchor]\" to \"[new anchor]\" in [location]";

const SCHEMA: &str = r#"### FAQ Schema (Copy-Paste Ready)
```json
{
  "@context": "https://schema.org",
  "@type": "FAQPage",
  "mainEntity": [
    {
      "@type": "Question",
      "name": "[Question 1]",
      "acceptedAnswer": {
        "@type": "Answer",
        "text": "[Answer 1]"
      }
    }
  ]
}
```"#;

const PRIORITY: &str = "### DO TODAY (15 minutes):
1. [ ] Copy-paste the new opening paragraph
2. [ ] Update title tag and meta description
3. [ ] Add the FAQ section at the end

### DO THIS WEEK (1-2 hours):
1. [ ] Implement all content rewrites from Section 3
2. [ ] Add the new sections from Section 2
3. [ ] Restructure content per Section 4

### DO THIS MONTH:
1. [ ] Implement schema markup
2. [ ] Update internal linking
3. [ ] Create supporting content for query variants";

const RESULTS: &str = "After implementing these SPECIFIC changes:
- **Week 1**: Expect improved CTR (+15-20%) from better meta tags
- **Week 2-4**: See featured snippet appearance for 2-3 query variants
- **Month 2**: Achieve page 1 rankings for additional 3-5 long-tail variants
- **Month 3**: Potential AI Overview inclusion for primary keyword";

const COMPETITOR_GAP: &str = "Based on competitor analysis, here's what they have that you're missing:

### Content They Cover That You Don't:
1. [Specific topic/section]
2. [Specific topic/section]
3. [Specific topic/section]

### ADD THIS SECTION to compete:
```markdown
[Write ready-to-use content section that fills the gap]
```";

const CLOSING: &str = "---

Remember: Every suggestion above is SPECIFIC and ACTIONABLE. The user should be able to copy-paste rewrites directly into their CMS without any additional editing needed.

Focus on maintaining the original writing style and brand voice while optimizing for Query Fan-Out and AI Overviews.";

/// Inputs visible to optimization sections
pub struct OptimizationContext<'a> {
    pub doc: &'a DocumentModel,
    pub primary_keyword: &'a str,
    pub competitors: &'a [DocumentModel],
    pub settings: &'a AnalysisSettings,
}

/// The rewrite sections in emission order
pub fn sections<'a>() -> Vec<Section<OptimizationContext<'a>>> {
    vec![
        Section::always(ANSWER_BOX_HEADING, |_| ANSWER_BOX.to_string()),
        Section::always(VARIANT_COVERAGE_HEADING, |ctx: &OptimizationContext| {
            format!(
                "Based on \"{}\", these query variants MUST be addressed:\n\n{}",
                ctx.primary_keyword, VARIANT_COVERAGE
            )
        }),
        Section::always(REWRITES_HEADING, |_| REWRITES.to_string()),
        Section::always(STRUCTURE_HEADING, |_| STRUCTURE.to_string()),
        Section::always(METADATA_HEADING, |ctx: &OptimizationContext| {
            format!(
                "### Current Title Tag\n```\n{}\n```\n\n\
                 ### OPTIMIZED Title Tag\n```\n[New title that's exactly 50-60 characters, includes primary keyword, and encourages clicks]\n```\n\n\
                 ### Current Meta Description\n```\n{}\n```\n\n\
                 ### OPTIMIZED Meta Description\n```\n[New description that's exactly 150-160 characters, includes primary keyword, has clear CTA]\n```",
                ctx.doc.title, ctx.doc.meta_description
            )
        }),
        Section::always(FAQ_HEADING, |_| FAQ.to_string()),
        Section::always(LINKING_HEADING, |_| LINKING.to_string()),
        Section::always(SCHEMA_HEADING, |_| SCHEMA.to_string()),
        Section::always(PRIORITY_HEADING, |_| PRIORITY.to_string()),
        Section::always(RESULTS_HEADING, |_| RESULTS.to_string()),
        Section::new(
            COMPETITOR_GAP_HEADING,
            |ctx: &OptimizationContext| {
                ctx.settings.include_competitors && !ctx.competitors.is_empty()
            },
            |ctx: &OptimizationContext| {
                let summaries = ctx
                    .competitors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| competitor_summary(i + 1, c))
                    .collect::<Vec<_>>()
                    .join("\n\n");
                format!("COMPETITOR PAGES:\n{}\n\n{}", summaries, COMPETITOR_GAP)
            },
        ),
    ]
}

fn competitor_summary(position: usize, doc: &DocumentModel) -> String {
    let mut lines = vec![
        format!("Competitor {}: {}", position, doc.url),
        format!("- Title: {}", doc.title),
        format!("- Word Count: {}", doc.word_count),
    ];
    lines.extend(
        doc.headings
            .iter()
            .take(COMPETITOR_HEADINGS)
            .map(|h| format!("- {}: {}", h.tag(), h.text)),
    );
    lines.join("\n")
}

fn content_summary(doc: &DocumentModel) -> String {
    format!(
        "CURRENT CONTENT ANALYSIS:\n\
         URL: {}\n\
         Title: {}\n\
         Meta Description: {}\n\
         Word Count: {}\n\
         Headings Count: {}\n\
         Images: {}\n\
         Internal Links: {}\n\
         External Links: {}",
        doc.url,
        doc.title,
        doc.meta_description,
        doc.word_count,
        doc.headings.len(),
        doc.images.len(),
        doc.internal_links.len(),
        doc.external_links.len()
    )
}

/// Outline of the first headings as `H2: text` lines; empty when there are none
pub fn heading_outline(doc: &DocumentModel) -> String {
    doc.headings
        .iter()
        .take(MAX_OUTLINE_HEADINGS)
        .map(|h| format!("{}: {}", h.tag(), h.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn analysis_focus(settings: &AnalysisSettings) -> Option<String> {
    let focus = [
        (settings.analyze_readability, "- Readability and clarity of the writing"),
        (settings.analyze_structure, "- Content structure and heading hierarchy"),
        (settings.analyze_entities, "- Entity coverage and relationships"),
        (settings.analyze_gaps, "- Content gaps against likely query variants"),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, line)| line)
    .collect::<Vec<_>>();

    if focus.is_empty() {
        None
    } else {
        Some(format!("ANALYSIS FOCUS:\n{}", focus.join("\n")))
    }
}

/// Build the prompt that optimizes an existing page for `primary_keyword`.
///
/// Competitors only contribute when `include_competitors` is set.
pub fn build_optimization_prompt(
    doc: &DocumentModel,
    primary_keyword: &str,
    additional_keywords: &[String],
    competitors: &[DocumentModel],
    settings: &AnalysisSettings,
) -> Result<String, ConfigurationError> {
    settings.validate_for(Mode::OptimizeExisting)?;
    let primary_keyword = primary_keyword.trim();
    if primary_keyword.is_empty() {
        return Err(ConfigurationError::MissingPrimaryKeyword);
    }

    let additional = additional_keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect::<Vec<_>>();
    let additional = if additional.is_empty() {
        "None".to_string()
    } else {
        additional.join(", ")
    };

    let ctx = OptimizationContext {
        doc,
        primary_keyword,
        competitors,
        settings,
    };

    let mut parts = vec![
        INTRO.to_string(),
        format!(
            "TARGET OPTIMIZATION:\n- Primary Keyword: {}\n- Additional Keywords: {}\n- Optimization Type: {}",
            primary_keyword,
            additional,
            settings.ai_search_type.title()
        ),
        content_summary(doc),
        format!("HEADING STRUCTURE:\n{}", heading_outline(doc)),
        format!(
            "CONTENT SAMPLE (First {} words):\n{}",
            MAX_EXCERPT_TOKENS,
            take_tokens(&doc.body_text, MAX_EXCERPT_TOKENS)
        ),
    ];
    if let Some(focus) = analysis_focus(settings) {
        parts.push(focus);
    }
    parts.push(
        "Provide the following ACTIONABLE optimization report:\n\n# QUERY FAN-OUT OPTIMIZATION REPORT"
            .to_string(),
    );
    parts.push(render_sections(&sections(), &ctx));
    parts.push(CLOSING.to_string());

    let prompt = parts.join("\n\n");
    ::log::debug!(
        "Built optimization prompt for {}: {} competitors, {} bytes",
        doc.url,
        competitors.len(),
        prompt.len()
    );
    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Heading, Image, Link};

    fn settings() -> AnalysisSettings {
        AnalysisSettings::for_mode(Mode::OptimizeExisting)
    }

    fn document() -> DocumentModel {
        let mut doc = DocumentModel::new("https://example.com/guide");
        doc.title = "Coffee Guide".to_string();
        doc.meta_description = "All about coffee".to_string();
        doc.headings = vec![
            Heading {
                level: 1,
                text: "Coffee Guide".to_string(),
            },
            Heading {
                level: 2,
                text: "Brewing".to_string(),
            },
        ];
        doc.body_text = "Coffee is brewed from roasted beans.".to_string();
        doc.word_count = 6;
        doc.images = vec![Image::default()];
        doc.internal_links = vec![Link {
            url: "/about".to_string(),
            anchor_text: "About".to_string(),
        }];
        doc
    }

    fn competitor(url: &str) -> DocumentModel {
        let mut doc = DocumentModel::new(url);
        doc.title = format!("Competitor at {}", url);
        doc.word_count = 1200;
        doc
    }

    #[test]
    fn test_summary_and_outline() {
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &settings()).unwrap();
        assert!(prompt.contains("URL: https://example.com/guide"));
        assert!(prompt.contains("Meta Description: All about coffee"));
        assert!(prompt.contains("Word Count: 6"));
        assert!(prompt.contains("Headings Count: 2"));
        assert!(prompt.contains("Images: 1"));
        assert!(prompt.contains("Internal Links: 1"));
        assert!(prompt.contains("External Links: 0"));
        assert!(prompt.contains("HEADING STRUCTURE:\nH1: Coffee Guide\nH2: Brewing"));
        assert!(prompt.contains("Based on \"coffee\""));
    }

    #[test]
    fn test_keywords_formatting() {
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &settings()).unwrap();
        assert!(prompt.contains("- Additional Keywords: None"));

        let extra = vec!["espresso".to_string(), "latte art".to_string()];
        let prompt = build_optimization_prompt(&document(), "coffee", &extra, &[], &settings()).unwrap();
        assert!(prompt.contains("- Additional Keywords: espresso, latte art"));

        let padded = vec![" espresso ".to_string(), "".to_string(), "  ".to_string(), "x".to_string()];
        let prompt = build_optimization_prompt(&document(), "coffee", &padded, &[], &settings()).unwrap();
        assert!(prompt.contains("- Additional Keywords: espresso, x\n"));

        let blank = vec!["".to_string(), " ".to_string()];
        let prompt = build_optimization_prompt(&document(), "coffee", &blank, &[], &settings()).unwrap();
        assert!(prompt.contains("- Additional Keywords: None\n"));
    }

    #[test]
    fn test_empty_headings_and_images() {
        let doc = DocumentModel::new("https://example.com/");
        let prompt = build_optimization_prompt(&doc, "coffee", &[], &[], &settings()).unwrap();
        assert!(prompt.contains("HEADING STRUCTURE:\n\n"));
        assert!(prompt.contains("Images: 0"));
        assert_eq!(heading_outline(&doc), "");
    }

    #[test]
    fn test_outline_capped() {
        let mut doc = document();
        doc.headings = (0..30)
            .map(|i| Heading {
                level: 3,
                text: format!("Heading {}", i),
            })
            .collect();
        let outline = heading_outline(&doc);
        assert_eq!(outline.lines().count(), MAX_OUTLINE_HEADINGS);
        assert!(outline.ends_with("H3: Heading 19"));
    }

    #[test]
    fn test_excerpt_token_cap() {
        let mut doc = document();
        let words: Vec<String> = (0..1500).map(|i| format!("word{}", i)).collect();
        doc.body_text = words.join(" ");
        let prompt = build_optimization_prompt(&doc, "coffee", &[], &[], &settings()).unwrap();

        let marker = "CONTENT SAMPLE (First 1000 words):\n";
        let start = prompt.find(marker).unwrap() + marker.len();
        let excerpt = prompt[start..].split("\n\n").next().unwrap();
        assert_eq!(excerpt.split_whitespace().count(), 1000);
        assert!(doc.body_text.starts_with(excerpt));
        assert!(excerpt.ends_with("word999"));
    }

    #[test]
    fn test_competitor_section_conditions() {
        let competitors = vec![
            competitor("https://one.example"),
            competitor("https://two.example"),
        ];

        let off = build_optimization_prompt(&document(), "coffee", &[], &competitors, &settings()).unwrap();
        assert!(!off.contains(COMPETITOR_GAP_HEADING));

        let mut with_flag = settings();
        with_flag.include_competitors = true;
        let none = build_optimization_prompt(&document(), "coffee", &[], &[], &with_flag).unwrap();
        assert!(!none.contains(COMPETITOR_GAP_HEADING));

        let on = build_optimization_prompt(&document(), "coffee", &[], &competitors, &with_flag).unwrap();
        assert!(on.contains(COMPETITOR_GAP_HEADING));
        let first = on.find("Competitor 1: https://one.example").unwrap();
        let second = on.find("Competitor 2: https://two.example").unwrap();
        assert!(first < second);
        assert!(on.contains("- Word Count: 1200"));
    }

    #[test]
    fn test_fixed_sections_present() {
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &settings()).unwrap();
        let mut last = 0;
        for heading in [
            ANSWER_BOX_HEADING,
            VARIANT_COVERAGE_HEADING,
            REWRITES_HEADING,
            STRUCTURE_HEADING,
            METADATA_HEADING,
            FAQ_HEADING,
            LINKING_HEADING,
            SCHEMA_HEADING,
            PRIORITY_HEADING,
            RESULTS_HEADING,
        ] {
            let at = prompt.find(heading).unwrap();
            assert!(at > last, "{} out of order", heading);
            last = at;
        }
        assert!(prompt.contains("```\nCoffee Guide\n```"));
    }

    #[test]
    fn test_rewrite_instructions_complete() {
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &settings()).unwrap();
        assert!(prompt.contains(
            "[Write 150-200 words of ready-to-use content that:\n\
             - Answers the specific query variant\n\
             - Maintains the original writing style\n\
             - Includes relevant entities and keywords\n\
             - Uses proper formatting for AI extraction]"
        ));
        assert!(prompt.contains(
            "[Provide complete rewritten section that:\n\
             - Fixes the identified issues\n\
             - Adds query variant coverage\n\
             - Improves for AI extraction\n\
             - Maintains original tone and style]"
        ));
        assert!(prompt.contains(
            "3. Break up [long section] into:\n   - [New subsection 1]\n   - [New subsection 2]\n   - [New subsection 3]\n"
        ));
    }

    #[test]
    fn test_analysis_focus() {
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &settings()).unwrap();
        assert!(prompt.contains("ANALYSIS FOCUS:\n- Readability"));

        let quiet = AnalysisSettings {
            analyze_readability: false,
            analyze_structure: false,
            analyze_entities: false,
            analyze_gaps: false,
            ..settings()
        };
        let prompt = build_optimization_prompt(&document(), "coffee", &[], &[], &quiet).unwrap();
        assert!(!prompt.contains("ANALYSIS FOCUS"));
    }

    #[test]
    fn test_deterministic_and_fails_fast() {
        let doc = document();
        assert_eq!(
            build_optimization_prompt(&doc, "coffee", &[], &[], &settings()).unwrap(),
            build_optimization_prompt(&doc, "coffee", &[], &[], &settings()).unwrap()
        );
        assert!(matches!(
            build_optimization_prompt(&doc, "  ", &[], &[], &settings()),
            Err(ConfigurationError::MissingPrimaryKeyword)
        ));
        assert!(matches!(
            build_optimization_prompt(&doc, "coffee", &[], &[], &AnalysisSettings::default()),
            Err(ConfigurationError::ModeMismatch { .. })
        ));
    }
}
