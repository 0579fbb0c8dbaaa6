use crate::config::{AnalysisSettings, Mode};
use crate::utils::{UNKNOWN, display_stamp, file_stamp, or_unknown};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What the analysis was run on
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportInput {
    /// Target queries for new content
    Queries { queries: Vec<String> },
    /// An existing page and its primary keyword
    Content { url: String, keyword: String },
}

/// Structured record of one run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportRecord<'a> {
    mode: &'static str,
    timestamp: String,
    provider: &'a str,
    model: &'a str,
    input_data: &'a ReportInput,
    settings: &'a AnalysisSettings,
    analysis: &'a str,
}

/// The three exportable forms of one analysis
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
    /// The generated analysis as returned
    pub markdown: String,
    /// Analysis wrapped in a header with run metadata
    pub full_report: String,
    /// Pretty-printed JSON record
    pub json_record: String,
}

fn provider_name(settings: &AnalysisSettings) -> &str {
    settings
        .provider
        .map(|p| p.display_name())
        .unwrap_or(UNKNOWN)
}

fn full_report(
    analysis: &str,
    input: &ReportInput,
    settings: &AnalysisSettings,
    mode: Mode,
    timestamp: &DateTime<Utc>,
) -> String {
    let title = match mode {
        Mode::NewContent => "New Content Planning",
        Mode::OptimizeExisting => "Content Optimization",
    };

    let mut out = vec![
        format!("# Query Fan-Out Analysis Report - {}", title),
        format!("Generated: {}", display_stamp(timestamp)),
        format!("AI Provider: {}", provider_name(settings)),
        format!("Model: {}", or_unknown(settings.model.as_deref())),
        String::new(),
    ];

    match input {
        ReportInput::Queries { queries } => {
            out.push("## Target Queries".to_string());
            out.extend(queries.iter().map(|q| format!("- {}", q)));
        }
        ReportInput::Content { url, keyword } => {
            out.push("## Content Details".to_string());
            out.push(format!("- URL: {}", url));
            out.push(format!("- Primary Keyword: {}", keyword));
        }
    }

    out.push(String::new());
    out.push("## Analysis Settings".to_string());
    out.push(format!(
        "- Optimization Target: {}",
        settings.ai_search_type.as_str()
    ));
    out.push(format!("- Depth: {}", settings.depth.as_str()));
    if mode == Mode::NewContent {
        out.push(format!(
            "- Variant Types: {}",
            settings.variant_types.join(", ")
        ));
    }

    out.push(String::new());
    out.push(match mode {
        Mode::NewContent => "## Analysis Results".to_string(),
        Mode::OptimizeExisting => "## Optimization Recommendations".to_string(),
    });
    out.push(analysis.to_string());
    out.push(String::new());
    out.push("---".to_string());
    out.push("*Generated by Query Fan-Out Analysis Tool*".to_string());

    let mut report = out.join("\n");
    report.push('\n');
    report
}

/// Format a finished analysis into its export artifacts.
///
/// Provider and model fall back to `"Unknown"` when unset.
pub fn assemble(
    analysis: &str,
    input: &ReportInput,
    settings: &AnalysisSettings,
    mode: Mode,
    timestamp: DateTime<Utc>,
) -> Result<ReportArtifacts, serde_json::Error> {
    let record = ReportRecord {
        mode: mode.as_str(),
        timestamp: timestamp.to_rfc3339(),
        provider: provider_name(settings),
        model: or_unknown(settings.model.as_deref()),
        input_data: input,
        settings,
        analysis,
    };

    Ok(ReportArtifacts {
        mode,
        timestamp,
        markdown: analysis.to_string(),
        full_report: full_report(analysis, input, settings, mode, &timestamp),
        json_record: serde_json::to_string_pretty(&record)?,
    })
}

impl ReportArtifacts {
    /// File names for the markdown, full report and JSON record
    pub fn file_names(&self) -> [String; 3] {
        let stamp = file_stamp(&self.timestamp);
        [
            format!("query_fanout_{}_{}.md", self.mode.as_str(), stamp),
            format!("query_fanout_report_{}.md", stamp),
            format!("query_fanout_data_{}.json", stamp),
        ]
    }

    /// Write all three artifacts into `dir`, creating it if needed
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> io::Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let contents = [&self.markdown, &self.full_report, &self.json_record];
        let mut written = Vec::with_capacity(contents.len());
        for (name, content) in self.file_names().iter().zip(contents) {
            let path = dir.join(name);
            fs::write(&path, content)?;
            ::log::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
