//! Content moderation CLI application.
//!
//! Exposes the moderation filter and the rating accumulator on the command
//! line, mainly for curating phrase lists and checking moderation decisions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use moderator::{
    ModerationConfig, ModerationMode, ModerationService, RatedEntity, RecipeDocument,
    StructuredContentValidator,
};

/// Content Moderation Tool
///
/// Check or redact user-submitted text against a phrase list, validate recipe
/// documents, and record star ratings.
#[derive(Parser)]
#[command(name = "moderator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (phrase list, mask, matcher)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reject text containing a listed phrase (exit code 1 on rejection)
    Check {
        /// Field name used in the rejection message
        #[arg(short, long, default_value = "Nội dung")]
        field: String,

        /// Text to check (reads stdin when omitted)
        text: Option<String>,
    },

    /// Print text with every listed phrase masked
    Redact {
        /// Text to redact (reads stdin when omitted)
        text: Option<String>,
    },

    /// Validate a JSON recipe document (title, description, steps)
    Validate {
        /// Input JSON file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Redact flagged fields instead of rejecting the document
        #[arg(long)]
        redact: bool,
    },

    /// Record a 1-5 star rating in a JSON rating file
    Rate {
        /// Rating state file (created when missing)
        #[arg(short, long, value_name = "FILE")]
        entity: PathBuf,

        /// Identity of the rater
        #[arg(short, long)]
        rater: String,

        /// Star rating from 1 to 5
        #[arg(long, allow_hyphen_values = true)]
        value: i64,
    },
}

/// Command handler with the moderation service injected.
struct ModerationHandler {
    service: ModerationService,
    verbose: bool,
}

impl ModerationHandler {
    /// Creates a handler from the optional configuration file.
    fn new(config: Option<&Path>, verbose: bool) -> Result<Self> {
        let config = match config {
            Some(path) => ModerationConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ModerationConfig::default(),
        };
        let policy = config
            .build_policy()
            .with_context(|| "Failed to build moderation policy")?;

        Ok(Self {
            service: ModerationService::new(policy),
            verbose,
        })
    }

    fn check(&self, text: &str, field: &str) -> Result<()> {
        let verdict = self.service.evaluate(text, field, ModerationMode::Reject)?;
        if self.verbose {
            println!("Matcher: {}", self.service.policy().matcher().name());
        }
        println!("✓ {}: no inappropriate phrases", verdict.field_name);
        Ok(())
    }

    fn redact(&self, text: &str) -> Result<()> {
        let verdict = self.service.evaluate(text, "text", ModerationMode::Redact)?;

        if self.verbose {
            for span in &verdict.spans {
                eprintln!(
                    "  match '{}' at {}..{} ({:?})",
                    span.phrase, span.start, span.end, span.kind
                );
            }
        }

        println!("{}", verdict.text);
        Ok(())
    }

    fn validate(&self, input: &Path, redact: bool) -> Result<()> {
        let source = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let doc: RecipeDocument = serde_json::from_str(&source)
            .with_context(|| format!("Invalid recipe document {}", input.display()))?;

        let mode = if redact {
            ModerationMode::Redact
        } else {
            ModerationMode::Reject
        };
        let policy = self.service.policy();
        let report = StructuredContentValidator::new(&policy).validate_with_report(&doc, mode)?;

        if self.verbose && !report.is_clean() {
            eprintln!("Redacted fields: {}", report.redacted_fields.join(", "));
        }

        println!("{}", serde_json::to_string_pretty(&report.document)?);
        Ok(())
    }

    fn rate(&self, entity_path: &Path, rater: &str, value: i64) -> Result<()> {
        let mut entity = if entity_path.exists() {
            let source = std::fs::read_to_string(entity_path)
                .with_context(|| format!("Failed to read {}", entity_path.display()))?;
            serde_json::from_str::<RatedEntity>(&source)
                .with_context(|| format!("Invalid rating file {}", entity_path.display()))?
        } else {
            RatedEntity::new()
        };

        let summary = entity
            .submit(rater, value)
            .with_context(|| format!("Failed to rate {}", entity_path.display()))?;

        std::fs::write(entity_path, serde_json::to_string_pretty(&entity)?)
            .with_context(|| format!("Failed to write to {}", entity_path.display()))?;

        println!(
            "✓ {} rating(s), average {:.2}",
            summary.count, summary.average
        );
        Ok(())
    }
}

/// Returns the positional text or everything on stdin.
fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .with_context(|| "Failed to read stdin")?;
            Ok(buffer.trim_end_matches(&['\n', '\r'][..]).to_string())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init only fails when a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let handler = ModerationHandler::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check { field, text } => handler.check(&read_text(text)?, &field),
        Commands::Redact { text } => handler.redact(&read_text(text)?),
        Commands::Validate { input, redact } => handler.validate(&input, redact),
        Commands::Rate {
            entity,
            rater,
            value,
        } => handler.rate(&entity, &rater, value),
    }
}
