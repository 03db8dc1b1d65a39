use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sparql_client::SparqlClient;
use tgn_common::TgnConfig;
use tgn_graph::GraphClient;
use tgn_harvest::{Pipeline, Settings, Step, TemplateStore, WriterTarget};

#[derive(Parser)]
#[command(name = "tgn-harvest", about = "Harvest Getty TGN places into PITs and relations")]
struct Cli {
    /// Path to the dataset TOML config
    #[arg(long, default_value = "./config/tgn.toml")]
    config: PathBuf,

    /// Directory holding one subdirectory per step
    #[arg(long, default_value = "./data/tgn")]
    data_dir: PathBuf,

    /// Directory with <kind>.sparql templates (defaults to the built-in ones)
    #[arg(long)]
    templates: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = WriterKind::Ndjson)]
    writer: WriterKind,

    /// Steps to run, in order
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [StepArg::Download, StepArg::Transform])]
    steps: Vec<StepArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum WriterKind {
    Ndjson,
    Neo4j,
}

#[derive(Clone, Copy, ValueEnum)]
enum StepArg {
    Download,
    Transform,
}

impl From<StepArg> for Step {
    fn from(arg: StepArg) -> Self {
        match arg {
            StepArg::Download => Step::Download,
            StepArg::Transform => Step::Transform,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("tgn=info".parse()?))
        .init();

    let cli = Cli::parse();
    info!("tgn-harvest starting...");

    let settings = Settings::from_env();

    let config = TgnConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    let templates = match &cli.templates {
        Some(dir) => TemplateStore::from_dir(dir)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
        None => TemplateStore::embedded(),
    };

    let writer = match cli.writer {
        WriterKind::Ndjson => WriterTarget::Ndjson,
        WriterKind::Neo4j => {
            let neo4j = settings.neo4j()?;
            let client = GraphClient::connect(&neo4j)
                .await
                .context("Failed to connect to Neo4j")?;
            WriterTarget::Neo4j(client)
        }
    };

    let client = SparqlClient::new(&settings.sparql_endpoint);
    let pipeline = Pipeline {
        config: &config,
        data_dir: cli.data_dir.clone(),
        templates: &templates,
        query_service: &client,
        writer,
    };

    let steps: Vec<Step> = cli.steps.into_iter().map(Step::from).collect();
    pipeline.run(&steps).await?;

    info!(data_dir = %cli.data_dir.display(), "All steps complete");
    Ok(())
}
