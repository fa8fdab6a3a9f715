use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use jobscrape_cli::{
    config::ExtractorConfig, pipeline::JobPipeline, utils, ErrorPayload, ExtractionRequest,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract structured job data from a listing page", long_about = None)]
struct Args {
    /// Job listing URL
    #[arg(short, long)]
    url: String,

    /// Where to write the extracted record
    #[arg(short, long, default_value = "job.json")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ExtractorConfig::from_env()?;
    let pipeline = JobPipeline::from_config(&config)?;

    match pipeline.run(&ExtractionRequest::new(args.url)).await {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            utils::save_json(&record, &args.output)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("❌ Extraction failed ({}): {}", e.kind(), e);
            eprintln!("{}", serde_json::to_string_pretty(&ErrorPayload::from(&e))?);
            Ok(ExitCode::FAILURE)
        }
    }
}
