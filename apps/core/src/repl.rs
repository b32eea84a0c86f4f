//! Parsing of terminal input lines into controller requests.

use crate::actors::feedback::FeedbackAction;
use crate::actors::messages::AppError;

pub const HELP_TEXT: &str = "\
Type a news story to analyze it.
  /yes [id]    the last verdict (or reply <id>) was correct
  /no [id]     the verdict was wrong
  /train [id]  add the analyzed text to the training set
  /training    list the training set
  /forget <n>  delete training sample #n
  /retrain     refresh the backend model
  /help        show this help
  /quit        leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text to analyze.
    Say(String),
    Feedback {
        action: FeedbackAction,
        target: Option<String>,
    },
    ListTraining,
    Forget(i64),
    Retrain,
    Help,
    Quit,
    /// Blank input, ignored.
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Empty);
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Ok(Command::Say(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.next().map(str::to_string);

        match name.as_str() {
            "yes" | "no" | "train" => Ok(Command::Feedback {
                action: name.parse()?,
                target: arg,
            }),
            "training" => Ok(Command::ListTraining),
            "forget" => {
                let raw = arg.ok_or_else(|| {
                    AppError::Validation("Usage: /forget <training sample id>".to_string())
                })?;
                let id = raw.parse::<i64>().map_err(|e| {
                    AppError::Validation(format!("Invalid training sample id '{}': {}", raw, e))
                })?;
                Ok(Command::Forget(id))
            }
            "retrain" => Ok(Command::Retrain),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(AppError::Validation(format!(
                "Unknown command '/{}'. Type /help for the list.",
                other
            ))),
        }
    }
}
