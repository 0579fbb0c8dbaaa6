use clap::Parser;
use fanout_report::config::ToolConfig;
use fanout_report::error::ConfigurationError;
use fanout_report::gateway::{ApiKeys, ProviderGateway, models};
use fanout_report::parsers::{QueryFormat, text};
use fanout_report::{Analysis, Mode, PreparedPrompt, ReportArtifacts, fetchers};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod args;
use args::{Args, Command, RunOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Models => {
            print_models();
            Ok(())
        }
        Command::Plan {
            queries_file,
            queries,
            csv,
            options,
        } => {
            let mut all = Vec::new();
            if let Some(path) = &queries_file {
                all.extend(read_queries(path, csv)?);
            }
            all.extend(queries);

            let stats = text::stats(&all);
            ::log::info!(
                "Loaded {} queries ({} unique, {:.1} words on average)",
                stats.total,
                stats.unique,
                stats.average_words
            );

            let (analysis, config) = build_analysis(&options, Mode::NewContent)?;
            let prepared = analysis.prepare_plan(&all)?;
            finish(&analysis, prepared, &options, config.output_dir.as_deref()).await
        }
        Command::Optimize {
            url,
            keyword,
            additional_keywords,
            competitors,
            options,
        } => {
            let (analysis, config) = build_analysis(&options, Mode::OptimizeExisting)?;
            let prepared = analysis
                .prepare_optimization(&url, &keyword, &additional_keywords, &competitors)
                .await?;
            finish(&analysis, prepared, &options, config.output_dir.as_deref()).await
        }
    }
}

/// Read queries from a file, as CSV when asked or when the extension says so
fn read_queries(path: &Path, force_csv: bool) -> Result<Vec<String>, Box<dyn Error>> {
    let content = std::fs::read_to_string(path)?;
    let format = if force_csv {
        QueryFormat::Csv
    } else {
        QueryFormat::from_path(&path.to_string_lossy())
    };
    Ok(text::parse(&content, format))
}

/// Load configuration, apply flags and wire up the pipeline
fn build_analysis(
    options: &RunOptions,
    mode: Mode,
) -> Result<(Analysis, ToolConfig), Box<dyn Error>> {
    let mut config = match &options.config {
        Some(path) => ToolConfig::from_file(path)?,
        None => {
            let mut config = ToolConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    options.apply(&mut config, mode);

    let keys = config.api_keys.clone().or(ApiKeys::from_env());
    let settings = &mut config.settings;

    // Fill in provider and model when only part of the target was chosen
    if settings.provider.is_none() {
        settings.provider = keys.available().first().copied();
    }
    if let Some(provider) = settings.provider {
        if settings.model.as_deref().map_or(true, |m| m.trim().is_empty()) {
            settings.model = Some(models::default_model(provider).to_string());
        }
    }
    if !options.dry_run && settings.provider.is_none() {
        return Err(Box::new(ConfigurationError::MissingProvider));
    }

    let gateway = ProviderGateway::new(keys)?;
    gateway.log_key_warnings();
    let fetcher = fetchers::from_config(&config.fetcher)?;

    let analysis = Analysis::new(config.settings.clone(), Arc::new(gateway), fetcher)
        .with_max_competitors(config.max_competitors);
    Ok((analysis, config))
}

/// Print the prompt for a dry run, otherwise generate and output the report
async fn finish(
    analysis: &Analysis,
    prepared: PreparedPrompt,
    options: &RunOptions,
    output_dir: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    if options.dry_run {
        println!("{}", prepared.prompt);
        return Ok(());
    }

    let start_time = std::time::Instant::now();
    let artifacts = analysis.run(prepared).await?;
    ::log::info!(
        "Analysis complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    output(&artifacts, output_dir)
}

fn output(artifacts: &ReportArtifacts, output_dir: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match output_dir {
        Some(dir) => {
            let written: Vec<PathBuf> = artifacts.write_to_dir(dir)?;
            for path in written {
                println!("{}", path.display());
            }
        }
        None => println!("{}", artifacts.markdown),
    }
    Ok(())
}

fn print_models() {
    let keys = ApiKeys::from_env();
    for provider in fanout_report::ProviderKind::ALL {
        let key_state = if keys.get(provider).is_some() {
            "key set"
        } else {
            "no key"
        };
        println!(
            "{} ({}, {} via {})",
            provider.display_name(),
            provider,
            key_state,
            provider.env_var()
        );
        for model in models::models_for(provider) {
            let marker = if model.id == models::default_model(provider) {
                "*"
            } else {
                " "
            };
            println!("  {} {:<28} {} - {}", marker, model.id, model.name, model.description);
        }
    }
}
