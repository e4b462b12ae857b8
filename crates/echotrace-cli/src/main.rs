use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

mod output;

use echotrace_core::detector::{HtmlWebSearch, SemanticScholar, WebSearchDisabled};
use echotrace_core::{Pacer, ProgressEvent, WebDetector};
use output::ColorMode;

/// Document overlap checker: internal repetition, academic sources, and web
/// content
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the document to check (.pdf, .docx, or .txt)
    document: PathBuf,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Semantic Scholar API key
    #[arg(long)]
    s2_api_key: Option<String>,

    /// Skip the web search stage entirely
    #[arg(long)]
    skip_web: bool,

    /// Write the plain-text report to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Write console output to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the highlighted document after the results
    #[arg(long)]
    highlight: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Resolve configuration: CLI flags > env vars > defaults
    let s2_api_key = args
        .s2_api_key
        .clone()
        .or_else(|| std::env::var("S2_API_KEY").ok());
    let academic_timeout_secs: u64 = std::env::var("ACADEMIC_TIMEOUT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(echotrace_core::DEFAULT_ACADEMIC_TIMEOUT.as_secs());
    let web_delay_ms: u64 = std::env::var("WEB_SEARCH_DELAY_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(echotrace_core::DEFAULT_WEB_PACING.as_millis() as u64);

    let use_color = !args.no_color && args.output.is_none();
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = args.output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    if !args.document.exists() {
        anyhow::bail!("document not found: {}", args.document.display());
    }
    let document_name = args
        .document
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| args.document.display().to_string());

    // Document-read failure aborts the run before any detector is invoked.
    let text = echotrace_ingest::read_document(&args.document)?;
    let segmentation = echotrace_segment::segment(&text);

    output::print_load_banner(
        &mut writer,
        &document_name,
        segmentation.sentences.len(),
        segmentation.word_count,
        color,
    )?;

    if segmentation.is_empty() {
        writeln!(writer, "No sentences to check.")?;
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .user_agent(concat!("echotrace/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let academic = SemanticScholar::new(
        client.clone(),
        s2_api_key,
        Duration::from_secs(academic_timeout_secs),
    );
    let web: Box<dyn WebDetector> = if args.skip_web {
        Box::new(WebSearchDisabled)
    } else {
        let pacer = Arc::new(Pacer::new(Duration::from_millis(web_delay_ms)));
        Box::new(HtmlWebSearch::new(
            client,
            pacer,
            Duration::from_secs(academic_timeout_secs),
        ))
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let bar = indicatif::ProgressBar::new(segmentation.sentences.len() as u64);
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{bar:40} {pos}/{len} sentences {msg}",
        )?,
    );
    let bar_for_cb = bar.clone();
    let progress_cb = move |event: ProgressEvent| match event {
        ProgressEvent::RepetitionScanDone { found } => {
            bar_for_cb.set_message(format!("({found} repeated)"));
        }
        ProgressEvent::CheckingSentence { index, .. } => {
            bar_for_cb.set_position(index as u64);
        }
        ProgressEvent::MatchFound { kind, index } => {
            bar_for_cb.println(format!("{} at sentence {index}", kind.label()));
        }
    };

    let analysis = echotrace_core::analyze(
        &segmentation.sentences,
        segmentation.word_count,
        &academic,
        web.as_ref(),
        progress_cb,
        &cancel,
    )
    .await;

    bar.finish_and_clear();
    writeln!(writer)?;

    output::print_results(&mut writer, &analysis, color)?;
    output::print_summary(&mut writer, &analysis.summary, color)?;

    if args.highlight {
        let opts = output::highlight_options(color);
        let rendered =
            echotrace_reporting::render_highlighted(&segmentation.sentences, &analysis.matches, &opts);
        writeln!(writer)?;
        writeln!(writer, "Highlighted document:")?;
        writeln!(writer, "{rendered}")?;
    }

    if let Some(ref export_path) = args.export {
        let report =
            echotrace_reporting::render_export(&document_name, &analysis, chrono::Utc::now());
        std::fs::write(export_path, report)?;
        writeln!(writer)?;
        writeln!(writer, "Report written to {}", export_path.display())?;
    }

    Ok(())
}
