use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use jobpulse::models::{NetworkStatus, SkillsNetwork};
use jobpulse::sources::{
    ArbeitnowSource, JsonFileSource, RateLimiter, RemotiveSource, SourceQuery,
};
use jobpulse::{
    Config, IngestPipeline, NetworkPipeline, NetworkRequest, NetworkScope, PipelineConfig,
    SkillCatalogue, SkillMatcher, Storage,
};

#[derive(Parser, Debug)]
#[command(name = "jobpulse")]
#[command(version = "0.1.0")]
#[command(about = "Collect job postings and map which skills are asked for together")]
struct Args {
    /// Database path (overrides JOBPULSE_DATABASE)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Skill catalogue JSON file (overrides JOBPULSE_CATALOGUE)
    #[arg(long, global = true)]
    catalogue: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch postings from a job source and store new ones
    Ingest {
        #[arg(short, long, value_enum)]
        source: SourceKind,

        /// Search keyword
        #[arg(short, long)]
        query: Option<String>,

        /// JSON file to import (for --source file)
        #[arg(short, long)]
        file: Option<String>,

        /// Maximum postings to keep per source
        #[arg(long)]
        limit: Option<usize>,

        /// Maximum pages for paginated sources
        #[arg(long, default_value = "3")]
        max_pages: u32,
    },

    /// Build the skills co-occurrence network
    Network {
        /// Minimum postings a skill must appear in
        #[arg(long)]
        min_frequency: Option<u32>,

        /// Minimum postings a skill pair must share
        #[arg(long)]
        min_co_occurrence: Option<u32>,

        /// Only postings from the last N days (0 = entire corpus)
        #[arg(long, conflicts_with = "ids")]
        days: Option<u32>,

        /// Only postings mentioning this keyword
        #[arg(short, long, conflicts_with = "ids")]
        keyword: Option<String>,

        /// Only these posting ids (comma separated), e.g. the current search results
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the skills the catalogue recognises
    Catalogue,

    /// Delete postings older than N days
    Prune {
        #[arg(long)]
        days: u32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceKind {
    Remotive,
    Arbeitnow,
    File,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("jobpulse=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(database) = args.database.clone() {
        config.database_path = database;
    }
    if let Some(catalogue) = args.catalogue.clone() {
        config.catalogue_path = Some(catalogue.into());
    }

    match args.command {
        Command::Ingest {
            source,
            query,
            file,
            limit,
            max_pages,
        } => {
            let query = SourceQuery {
                keyword: query,
                limit,
                max_pages,
            };
            run_ingest(&config, source, file, &query).await
        }
        Command::Network {
            min_frequency,
            min_co_occurrence,
            days,
            keyword,
            ids,
            format,
            output,
        } => {
            let scope = if ids.is_empty() {
                let since_days = match days.unwrap_or(config.lookback_days) {
                    0 => None,
                    days => Some(days),
                };
                NetworkScope::Corpus { since_days, keyword }
            } else {
                NetworkScope::Postings(ids)
            };
            let request = NetworkRequest::new(
                scope,
                min_frequency.unwrap_or(config.min_frequency),
                min_co_occurrence.unwrap_or(config.min_co_occurrence),
            )?;
            run_network(&config, &request, format, output.as_deref())
        }
        Command::Catalogue => {
            let catalogue = load_catalogue(&config)?;
            print!("{}", format_catalogue(&catalogue));
            Ok(())
        }
        Command::Prune { days } => {
            let storage = Storage::new(&config.database_path)?;
            let removed = storage.prune_older_than(Utc::now() - Duration::days(i64::from(days)))?;
            tracing::info!("Removed {} postings older than {} days", removed, days);
            Ok(())
        }
    }
}

fn load_catalogue(config: &Config) -> anyhow::Result<SkillCatalogue> {
    Ok(match &config.catalogue_path {
        Some(path) => SkillCatalogue::from_json_file(path)?,
        None => SkillCatalogue::builtin(),
    })
}

async fn run_ingest(
    config: &Config,
    source: SourceKind,
    file: Option<String>,
    query: &SourceQuery,
) -> anyhow::Result<()> {
    let storage = Storage::new(&config.database_path)?;
    let rate_limiter = RateLimiter::new(config.requests_per_minute);
    let pipeline = IngestPipeline::new(storage, PipelineConfig::from(config));

    let pipeline = match source {
        SourceKind::Remotive => pipeline.with_source(RemotiveSource::new(rate_limiter)?),
        SourceKind::Arbeitnow => pipeline.with_source(ArbeitnowSource::new(rate_limiter)?),
        SourceKind::File => {
            let path = file.ok_or_else(|| anyhow::anyhow!("--file is required for --source file"))?;
            pipeline.with_source(JsonFileSource::new(path))
        }
    };

    let report = pipeline.run(query).await?;
    println!(
        "Fetched {} postings: {} new, {} duplicates",
        report.fetched, report.inserted, report.duplicates
    );
    if !report.failed_sources.is_empty() {
        anyhow::bail!("sources failed: {}", report.failed_sources.join(", "));
    }

    Ok(())
}

fn run_network(
    config: &Config,
    request: &NetworkRequest,
    format: OutputFormat,
    output: Option<&str>,
) -> anyhow::Result<()> {
    let matcher = SkillMatcher::new(load_catalogue(config)?)?;
    let storage = Storage::new(&config.database_path)?;
    let pipeline = NetworkPipeline::new(matcher, storage, PipelineConfig::from(config));

    let network = pipeline.build(request)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&network)?,
        OutputFormat::Text => format_text(&network),
    };

    if let Some(path) = output {
        std::fs::write(path, &rendered)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn format_text(network: &SkillsNetwork) -> String {
    let mut output = String::new();

    output.push_str("\n=== Skills Network ===\n\n");
    output.push_str(&format!("Postings analyzed: {}\n", network.total_postings));
    output.push_str(&format!(
        "Thresholds: min frequency {}, min co-occurrence {}\n\n",
        network.min_frequency, network.min_co_occurrence
    ));

    match network.status {
        NetworkStatus::NoData => {
            output.push_str("[placeholder] No job data available yet.\n");
            output.push_str("Run `jobpulse ingest` to collect postings, then try again.\n");
            return output;
        }
        NetworkStatus::BelowThreshold => {
            output.push_str(&format!(
                "No skill appears in at least {} postings. Try a lower --min-frequency.\n",
                network.min_frequency
            ));
            return output;
        }
        NetworkStatus::Ok => {}
    }

    output.push_str("Skills:\n");
    for node in &network.nodes {
        output.push_str(&format!(
            "  - {} ({}): {} postings\n",
            node.label,
            node.category.as_deref().unwrap_or("Uncategorized"),
            node.frequency
        ));
    }

    if !network.edges.is_empty() {
        output.push_str("\nSkill pairs:\n");
        for edge in network.edges.iter().take(25) {
            output.push_str(&format!(
                "  - {} + {}: {} postings\n",
                edge.source, edge.target, edge.weight
            ));
        }
        if network.edges.len() > 25 {
            output.push_str(&format!("  ... and {} more\n", network.edges.len() - 25));
        }
    }

    output
}

fn format_catalogue(catalogue: &SkillCatalogue) -> String {
    let mut output = String::new();
    for category in &catalogue.categories {
        output.push_str(&format!("{}:\n", category.name));
        let names: Vec<_> = category.skills.iter().map(|s| s.name.as_str()).collect();
        output.push_str(&format!("  {}\n", names.join(", ")));
    }
    output
}
