//! Rendering of the conversation.
//!
//! The controller only talks to a `ChatView`; the terminal renderer below is the one
//! used by the binary.

use std::io::Write;

use crate::actors::feedback::{FeedbackControls, FeedbackOutcome};
use crate::actors::messages::{AppError, TurnState};
use crate::models::{Message, RetrainReport, TrainingEntry, Verdict};

const TYPING_INDICATOR: &str = "AI is typing...";

/// Sink for everything the user sees.
pub trait ChatView: Send + 'static {
    fn render_message(&mut self, message: &Message) -> Result<(), AppError>;

    fn render_feedback_controls(&mut self, controls: &FeedbackControls) -> Result<(), AppError>;

    fn render_feedback_outcome(&mut self, outcome: &FeedbackOutcome) -> Result<(), AppError>;

    fn show_typing(&mut self) -> Result<(), AppError>;

    fn hide_typing(&mut self) -> Result<(), AppError>;

    /// Inline status text that is not part of the conversation.
    fn render_notice(&mut self, text: &str) -> Result<(), AppError>;

    fn render_training(&mut self, entries: &[TrainingEntry]) -> Result<(), AppError>;

    fn render_retrain(&mut self, report: &RetrainReport) -> Result<(), AppError> {
        self.render_notice(&report.message)
    }

    /// Called on every turn transition.
    fn turn_state_changed(&mut self, _state: TurnState) {}
}

/// Plain-text renderer over any writer, normally stdout.
pub struct TerminalView<W: Write + Send + 'static> {
    out: W,
    typing: bool,
}

impl<W: Write + Send + 'static> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, typing: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

fn short_id(message: &uuid::Uuid) -> String {
    message.simple().to_string()[..8].to_string()
}

fn indicator(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Fake => "⚠️ ",
        Verdict::Real => "✅ ",
        Verdict::Unknown => "",
    }
}

impl<W: Write + Send + 'static> ChatView for TerminalView<W> {
    fn render_message(&mut self, message: &Message) -> Result<(), AppError> {
        let (avatar, status) = if message.is_user {
            ("U", "")
        } else {
            ("AI", indicator(message.verdict()))
        };
        writeln!(
            self.out,
            "[{}] {:>2} | {}{}",
            short_id(&message.id),
            avatar,
            status,
            message.content
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn render_feedback_controls(&mut self, controls: &FeedbackControls) -> Result<(), AppError> {
        writeln!(
            self.out,
            "           Was this analysis correct?  /yes  /no  /train  ({})",
            short_id(&controls.message_id)
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn render_feedback_outcome(&mut self, outcome: &FeedbackOutcome) -> Result<(), AppError> {
        writeln!(self.out, "[{}]      {}", short_id(&outcome.message_id), outcome.text)?;
        self.out.flush()?;
        Ok(())
    }

    fn show_typing(&mut self) -> Result<(), AppError> {
        if !self.typing {
            write!(self.out, "{}", TYPING_INDICATOR)?;
            self.out.flush()?;
            self.typing = true;
        }
        Ok(())
    }

    fn hide_typing(&mut self) -> Result<(), AppError> {
        if self.typing {
            // Carriage return + erase line.
            write!(self.out, "\r\x1b[2K")?;
            self.out.flush()?;
            self.typing = false;
        }
        Ok(())
    }

    fn render_notice(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.out, "  ** {}", text)?;
        self.out.flush()?;
        Ok(())
    }

    fn render_training(&mut self, entries: &[TrainingEntry]) -> Result<(), AppError> {
        if entries.is_empty() {
            return self.render_notice("Training set is empty.");
        }
        for entry in entries {
            let label = if entry.is_fake { "FAKE" } else { "REAL" };
            writeln!(
                self.out,
                "  #{:<5} {:<4} [{}] {}",
                entry.id,
                label,
                entry.category.as_deref().unwrap_or("general"),
                entry.text
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
