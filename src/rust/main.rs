use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::Context;
use civic_tagger::{server, ClassifierBuilder, RuntimeConfig};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keyword table with `Keyword,Tag` columns
    #[arg(long, env = "CIVIC_KEYWORDS_CSV")]
    keywords: Option<PathBuf>,

    /// Department table with `Tag,Department` columns
    #[arg(long, env = "CIVIC_DEPARTMENTS_CSV")]
    departments: Option<PathBuf>,

    /// Address to serve the HTTP API on
    #[arg(short, long, env = "CIVIC_BIND_ADDR")]
    bind: Option<String>,

    /// Seconds to wait for the remote model before giving up
    #[arg(long, env = "HF_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Classify one description, print the result as JSON and exit
    #[arg(short, long)]
    describe: Option<String>,
}

impl Args {
    fn apply(self, mut config: RuntimeConfig) -> (RuntimeConfig, Option<String>) {
        if let Some(path) = self.keywords {
            config.keywords_path = path;
        }
        if let Some(path) = self.departments {
            config.departments_path = path;
        }
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(secs) = self.timeout_secs.filter(|s| *s > 0) {
            config.timeout = Duration::from_secs(secs);
        }
        (config, self.describe)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Args::parse();
    let (config, describe) = args.apply(RuntimeConfig::from_env());

    info!("=== Starting Civic Issue Classifier ===");
    let start_time = Instant::now();

    let classifier = ClassifierBuilder::from_config(&config)
        .and_then(|builder| builder.build())
        .context("failed to load reference data")?;
    info!("Classifier built in {:.2?}", start_time.elapsed());

    if let Some(description) = describe {
        let result = classifier.classify(&description).await?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    server::serve(listener, Arc::new(classifier)).await?;
    Ok(())
}
