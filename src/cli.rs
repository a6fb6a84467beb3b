//! CLI commands implementation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::analysis::AnalysisResult;
use crate::config::AppConfig;
use crate::extract::tesseract_available;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "postlens")]
#[command(about = "Social media post analyzer for PDF and image uploads")]
#[command(version)]
pub struct Cli {
    /// Directory for transient upload storage
    #[arg(long, global = true, env = "POSTLENS_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a PDF or image file
    Analyze {
        /// Path to the file to analyze
        file: PathBuf,
        /// Emit the raw JSON result instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Analyze text given directly on the command line
    Text {
        /// The text to analyze
        text: String,
        /// Emit the raw JSON result instead of formatted output
        #[arg(long)]
        json: bool,
    },

    /// Check availability of analysis backends
    Check,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(dir) = cli.upload_dir {
        config.upload.dir = dir;
    }

    match cli.command {
        Commands::Analyze { file, json } => cmd_analyze(config, &file, json).await,
        Commands::Text { text, json } => cmd_text(config, &text, json).await,
        Commands::Check => cmd_check(config).await,
    }
}

async fn cmd_analyze(config: AppConfig, file: &PathBuf, json: bool) -> anyhow::Result<()> {
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid file path: {}", file.display()))?
        .to_string();
    let bytes = std::fs::read(file)
        .map_err(|e| anyhow::anyhow!("cannot read {}: {}", file.display(), e))?;

    let pipeline = Pipeline::init(config).await?;
    let outcome = pipeline.process_upload(&bytes, &filename).await?;

    if json {
        let value = serde_json::json!({
            "source_format": outcome.extracted.format,
            "analysis": outcome.analysis,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "\n{} {}",
        style("Analyzed:").bold(),
        style(&filename).cyan()
    );
    print_analysis(&outcome.analysis);
    Ok(())
}

async fn cmd_text(config: AppConfig, text: &str, json: bool) -> anyhow::Result<()> {
    let pipeline = Pipeline::init(config).await?;
    let result = pipeline.analyze_text(text).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_analysis(&result);
    Ok(())
}

async fn cmd_check(config: AppConfig) -> anyhow::Result<()> {
    println!("\n{}", style("Backend Status").bold());
    println!("{}", "-".repeat(50));

    let ocr_status = if tesseract_available(&config.ocr) {
        style("✓ found").green()
    } else {
        style("✗ not found (install tesseract-ocr)").red()
    };
    println!("  {:<22} {}", "tesseract", ocr_status);

    let classifier_status = match &config.classifier.endpoint {
        Some(endpoint) => {
            use crate::analysis::SentimentScorer;
            let scorer = SentimentScorer::init(&config.classifier).await;
            if scorer.uses_classifier() {
                style(format!("✓ reachable at {}", endpoint)).green()
            } else {
                style(format!("✗ unreachable at {}", endpoint)).red()
            }
        }
        None => style("○ not configured (keyword fallback)".to_string()).yellow(),
    };
    println!("  {:<22} {}", "sentiment classifier", classifier_status);

    let openai_status = if config.openai.api_key.is_some() {
        style(format!("✓ key set (model {})", config.openai.model)).green()
    } else {
        style("○ no API key (rule-based suggestions)".to_string()).yellow()
    };
    println!("  {:<22} {}", "openai", openai_status);

    println!();
    Ok(())
}

fn print_analysis(result: &AnalysisResult) {
    match result {
        AnalysisResult::Failed { error, .. } => {
            println!("\n{} {}", style("Error:").red().bold(), error);
        }
        AnalysisResult::Complete {
            text_length,
            word_count,
            sentiment,
            readability,
            engagement_suggestions,
            ..
        } => {
            println!(
                "\n{} {} characters, {} words",
                style("Text:").bold(),
                text_length,
                word_count
            );

            println!("\n{}", style("Sentiment").bold());
            println!(
                "  {} ({:.0}% confidence)",
                sentiment.label,
                sentiment.confidence * 100.0
            );
            println!("  {}", style(&sentiment.interpretation).dim());

            println!("\n{}", style("Readability").bold());
            if let Some(error) = &readability.error {
                println!("  {}", style(error).red());
            } else {
                println!(
                    "  Flesch-Kincaid grade {:.1}, reading ease {:.1}",
                    readability.flesch_kincaid_grade, readability.flesch_reading_ease
                );
                println!("  {}", style(&readability.interpretation).dim());
            }

            println!(
                "\n{} {}",
                style("Suggestions").bold(),
                style(format!("({})", engagement_suggestions.source.as_str())).dim()
            );
            print_suggestion_list("Content", &engagement_suggestions.content_improvements);
            print_suggestion_list("Tone", &engagement_suggestions.tone_suggestions);
            print_suggestion_list("Hashtags", &engagement_suggestions.hashtag_suggestions);
            print_suggestion_list("Call to action", &engagement_suggestions.cta_recommendations);
            print_suggestion_list("Visual", &engagement_suggestions.visual_enhancements);
            if let Some(note) = &engagement_suggestions.note {
                println!("  {}", style(note).dim());
            }
        }
    }
}

fn print_suggestion_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {}", style(heading).cyan());
    for item in items {
        println!("    - {}", item);
    }
}
