//! BatchQuery CLI
//!
//! The `batchquery` command asks one question about up to four images.
//!
//! ## Commands
//!
//! - `ask`: one-shot question over image files
//! - `chat`: interactive session with `/add`, `/remove` and questions

mod chat;
mod client;
mod files;
mod preview;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use batchquery_core::{CannedResponder, Conversation, ImageIntake, QuerySubmitter};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use crate::chat::{render_turn, ChatSession, HELP};
use crate::client::{HttpSubmitter, DEFAULT_SERVER_URL};
use crate::files::load_image;
use crate::preview::LabelPreview;

#[derive(Parser)]
#[command(name = "batchquery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ask one question about a batch of images", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines (and a JSON transcript for `ask`)
    #[arg(long, global = true)]
    json: bool,

    /// Batch endpoint URL
    #[arg(long, global = true, env = "BATCHQUERY_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Answer from the built-in canned table instead of a server
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question about 1 to 4 images
    Ask {
        /// The question
        #[arg(short, long)]
        question: String,

        /// Image files
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Start an interactive session
    Chat {
        /// Images to attach at start
        images: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    batchquery_core::init_tracing(cli.json, level);

    let submitter = make_submitter(cli.demo, &cli.server)?;

    match cli.command {
        Commands::Ask { question, images } => {
            cmd_ask(submitter.as_ref(), &question, &images, cli.json).await
        }
        Commands::Chat { images } => cmd_chat(submitter, &images).await,
    }
}

fn make_submitter(demo: bool, server: &str) -> Result<Arc<dyn QuerySubmitter>> {
    if demo {
        info!("demo mode: answering from the canned table");
        return Ok(Arc::new(CannedResponder::new()));
    }
    let submitter = HttpSubmitter::new(server).context("Failed to build HTTP client")?;
    info!(url = %submitter.url(), "using batch server");
    Ok(Arc::new(submitter))
}

/// One-shot question
async fn cmd_ask(
    submitter: &dyn QuerySubmitter,
    question: &str,
    paths: &[PathBuf],
    json: bool,
) -> Result<()> {
    let mut intake = ImageIntake::new(LabelPreview);
    let mut loaded = Vec::with_capacity(paths.len());
    for path in paths {
        loaded.push(load_image(path).await?);
    }
    if let Some(e) = intake.add(loaded) {
        bail!("{e}");
    }

    let mut conversation = Conversation::new();
    conversation
        .submit(submitter, question, intake.images())
        .await?;

    let mut stdout = std::io::stdout().lock();
    if json {
        let transcript = serde_json::to_string_pretty(conversation.transcript())?;
        writeln!(stdout, "{transcript}")?;
    } else {
        for label in intake.previews() {
            writeln!(stdout, "# {label}")?;
        }
        for turn in conversation.transcript() {
            writeln!(stdout, "{}", render_turn(turn))?;
        }
    }
    Ok(())
}

/// Interactive session on stdin/stdout
async fn cmd_chat(submitter: Arc<dyn QuerySubmitter>, initial: &[PathBuf]) -> Result<()> {
    let mut session = ChatSession::new(submitter, std::io::stdout());

    if !initial.is_empty() {
        session.attach(initial.to_vec()).await?;
    }

    println!("{HELP}");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(stdin).await?;

    info!(
        turns = session.conversation().transcript().len(),
        images = session.intake().images().len(),
        "chat ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ask_requires_images() {
        assert!(Cli::try_parse_from(["batchquery", "ask", "-q", "why?"]).is_err());
        let cli =
            Cli::try_parse_from(["batchquery", "--demo", "ask", "-q", "why?", "a.jpg"]).unwrap();
        assert!(cli.demo);
        assert!(matches!(cli.command, Commands::Ask { ref images, .. } if images.len() == 1));
    }

    #[tokio::test]
    async fn test_ask_in_demo_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        let submitter = make_submitter(true, DEFAULT_SERVER_URL).unwrap();
        cmd_ask(
            submitter.as_ref(),
            "Are there any visible defects or issues?",
            &[path],
            false,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_ask_rejects_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();

        let submitter = make_submitter(true, DEFAULT_SERVER_URL).unwrap();
        let err = cmd_ask(submitter.as_ref(), "q", &[path], false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unsupported image type: text/plain");
    }
}
