//! Video summary CLI.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::{error, info};

use vsum_ai::{OpenAiClient, OpenAiConfig};
use vsum_models::{TitlePlacement, VideoSource};
use vsum_pipeline::{
    init_tracing, prepare_segments, DocumentSink, FileSink, LogSink, PipelineConfig,
    PipelineDriver, PipelineError,
};

/// Transcribe a video and summarize it until the summary fits a size limit.
#[derive(Debug, Parser)]
#[command(name = "vsum", version, about)]
#[command(group(ArgGroup::new("source").required(true).args(["url", "file"])))]
struct Args {
    /// YouTube video URL
    url: Option<String>,

    /// Local video file instead of a URL
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// API key for the speech-to-text and completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum characters per chunk and for the final summary
    #[arg(long, value_name = "N")]
    chunk_limit: Option<usize>,

    /// Maximum reduction passes
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Maximum concurrent external calls per stage
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Put the title before the transcripts instead of after the summaries
    #[arg(long)]
    title_first: bool,

    /// Directory the document is written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn source(&self) -> anyhow::Result<VideoSource> {
        match (&self.url, &self.file) {
            (Some(url), None) => Ok(VideoSource::Remote(url.clone())),
            (None, Some(path)) => Ok(VideoSource::Local(path.clone())),
            _ => anyhow::bail!("pass exactly one of URL or --file"),
        }
    }

    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(limit) = self.chunk_limit {
            config.chunk_limit = limit;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if let Some(concurrency) = self.max_concurrency {
            config.max_concurrency = concurrency;
        }
        if self.title_first {
            config.title_placement = TitlePlacement::First;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let source = args.source()?;

    let mut config = PipelineConfig::from_env();
    args.apply(&mut config);
    info!("Pipeline config: {:?}", config);

    let mut ai_config = OpenAiConfig::from_env();
    if let Some(key) = &args.api_key {
        ai_config = ai_config.with_api_key(key.clone());
    }
    let client = Arc::new(OpenAiClient::new(ai_config).context("failed to create API client")?);

    let driver = PipelineDriver::new(config.clone(), client.clone(), client)?;

    let result = async {
        let segments = prepare_segments(&config, &source).await?;
        driver.run(&segments).await
    }
    .await;

    let document = match result {
        Ok(document) => document,
        Err(e) => {
            report_failure(&e);
            return Err(e.into());
        }
    };

    let file_sink = FileSink::new(&config.output_dir);
    let output = file_sink.run_dir(&document);
    let sinks: Vec<Box<dyn DocumentSink>> = vec![Box::new(LogSink), Box::new(file_sink)];
    for sink in &sinks {
        sink.persist(&document)
            .await
            .context("failed to write document")?;
    }

    if let Some(title) = document.title() {
        println!("{}", title);
    }
    info!(output = %output.display(), "Done");

    Ok(())
}

fn report_failure(err: &PipelineError) {
    match err.failing_index() {
        Some(index) => error!(stage = err.stage(), index, "Pipeline failed: {}", err),
        None => error!(stage = err.stage(), "Pipeline failed: {}", err),
    }
}
