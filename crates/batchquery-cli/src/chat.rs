//! Interactive chat loop.
//!
//! Lines starting with `/` edit the image set or control the session; any
//! other line is a question about the current images. Image edits keep
//! working while a question resolves.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use batchquery_core::{
    Conversation, ConversationError, ConversationTurn, ImageIntake, PendingQuery, QueryResult,
    QuerySubmitter, Role, SubmitError, MAX_IMAGES,
};
use futures::future::{BoxFuture, OptionFuture};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::files::load_image;
use crate::preview::LabelPreview;

pub const HELP: &str = "\
Commands:
  /add <path>...   attach images (up to 4)
  /remove <n>      detach image number n
  /images          list attached images
  /help            show this help
  /quit            leave
Anything else is asked about the attached images.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Add(Vec<PathBuf>),
    Remove(usize),
    Images,
    Help,
    Quit,
    Ask(String),
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Option<ChatCommand> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if !line.starts_with('/') {
            return Some(ChatCommand::Ask(line.to_string()));
        }

        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let parsed = match command {
            "/add" if !args.is_empty() => ChatCommand::Add(args.iter().map(PathBuf::from).collect()),
            "/add" => ChatCommand::Invalid("usage: /add <path>...".to_string()),
            "/remove" => match args.as_slice() {
                [n] => match n.parse::<usize>() {
                    Ok(n) if n >= 1 => ChatCommand::Remove(n - 1),
                    _ => ChatCommand::Invalid(format!("not an image number: {n}")),
                },
                _ => ChatCommand::Invalid("usage: /remove <n>".to_string()),
            },
            "/images" => ChatCommand::Images,
            "/help" => ChatCommand::Help,
            "/quit" | "/exit" => ChatCommand::Quit,
            other => ChatCommand::Invalid(format!("unknown command {other}; try /help")),
        };
        Some(parsed)
    }
}

type InFlight = BoxFuture<'static, Result<QueryResult, SubmitError>>;

/// Image intake, transcript and the submitter, wired to a terminal.
pub struct ChatSession<W: Write> {
    intake: ImageIntake<LabelPreview>,
    conversation: Conversation,
    submitter: Arc<dyn QuerySubmitter>,
    out: W,
}

impl<W: Write> ChatSession<W> {
    pub fn new(submitter: Arc<dyn QuerySubmitter>, out: W) -> Self {
        ChatSession {
            intake: ImageIntake::new(LabelPreview),
            conversation: Conversation::new(),
            submitter,
            out,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn intake(&self) -> &ImageIntake<LabelPreview> {
        &self.intake
    }

    /// Same as typing `/add` with `paths`.
    pub async fn attach(&mut self, paths: Vec<PathBuf>) -> Result<()> {
        self.handle(ChatCommand::Add(paths)).await
    }

    /// Run until `/quit` or end of input. At end of input an in-flight
    /// question is still awaited; `/quit` abandons it.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut pending: Option<PendingQuery> = None;
        let mut in_flight: Option<InFlight> = None;
        let mut input_open = true;

        loop {
            if !input_open && in_flight.is_none() {
                break;
            }

            tokio::select! {
                biased;

                Some(outcome) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                    in_flight = None;
                    if let Some(ticket) = pending.take() {
                        self.settle(ticket, outcome)?;
                    }
                }

                line = lines.next_line(), if input_open => {
                    let Some(line) = line? else {
                        input_open = false;
                        continue;
                    };
                    let Some(command) = ChatCommand::parse(&line) else {
                        continue;
                    };
                    match command {
                        ChatCommand::Quit => break,
                        ChatCommand::Ask(question) => {
                            if let Some((ticket, call)) = self.ask(&question)? {
                                pending = Some(ticket);
                                in_flight = Some(call);
                            }
                        }
                        other => self.handle(other).await?,
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle(&mut self, command: ChatCommand) -> Result<()> {
        match command {
            ChatCommand::Add(paths) => {
                let mut loaded = Vec::with_capacity(paths.len());
                for path in &paths {
                    match load_image(path).await {
                        Ok(image) => loaded.push(image),
                        Err(e) => writeln!(self.out, "error: {e:#}")?,
                    }
                }
                if let Some(e) = self.intake.add(loaded) {
                    writeln!(self.out, "error: {e}")?;
                }
                self.print_images()?;
            }
            ChatCommand::Remove(index) => {
                if index >= self.intake.images().len() {
                    writeln!(self.out, "error: no image number {}", index + 1)?;
                } else {
                    self.intake.remove_at(index);
                    self.print_images()?;
                }
            }
            ChatCommand::Images => {
                self.print_images()?;
                if let Some(notice) = self.intake.current_error() {
                    writeln!(self.out, "error: {notice}")?;
                }
            }
            ChatCommand::Help => writeln!(self.out, "{HELP}")?,
            ChatCommand::Invalid(message) => writeln!(self.out, "{message}")?,
            ChatCommand::Quit | ChatCommand::Ask(_) => {}
        }
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<Option<(PendingQuery, InFlight)>> {
        match self.conversation.begin(question, self.intake.images()) {
            Ok(ticket) => {
                self.print_new_turns(2)?;
                let submitter = Arc::clone(&self.submitter);
                let request = ticket.request().clone();
                let call: InFlight = Box::pin(async move { submitter.submit(&request).await });
                Ok(Some((ticket, call)))
            }
            Err(ConversationError::SubmissionInFlight) => {
                writeln!(
                    self.out,
                    "error: still answering the previous question; please wait"
                )?;
                Ok(None)
            }
            Err(e) => {
                writeln!(self.out, "error: {e}")?;
                Ok(None)
            }
        }
    }

    fn settle(&mut self, ticket: PendingQuery, outcome: Result<QueryResult, SubmitError>) -> Result<()> {
        match self.conversation.resolve(ticket, outcome) {
            Ok(()) => self.print_new_turns(1)?,
            Err(e) => {
                debug!(error = %e, "question failed");
                writeln!(self.out, "error: {e}")?;
            }
        }
        Ok(())
    }

    fn print_new_turns(&mut self, count: usize) -> Result<()> {
        let transcript = self.conversation.transcript();
        let start = transcript.len().saturating_sub(count);
        for turn in &transcript[start..] {
            writeln!(self.out, "{}", render_turn(turn))?;
        }
        Ok(())
    }

    fn print_images(&mut self) -> Result<()> {
        let previews = self.intake.previews();
        if previews.is_empty() {
            writeln!(self.out, "no images attached")?;
            return Ok(());
        }
        writeln!(self.out, "images ({}/{}):", previews.len(), MAX_IMAGES)?;
        for (i, label) in previews.iter().enumerate() {
            writeln!(self.out, "  {}. {label}", i + 1)?;
        }
        Ok(())
    }
}

pub fn render_turn(turn: &ConversationTurn) -> String {
    match turn.role {
        Role::User => format!("you> {}", turn.text),
        Role::Assistant => format!("assistant> {}", turn.text),
    }
}
