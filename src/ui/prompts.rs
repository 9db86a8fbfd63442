//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.
//!
//! Prompts render on stderr so stdout stays clean for piping.

use console::{style, Key, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use thiserror::Error;

use crate::core::select::{MerchantPicker, PickRequest};
use crate::core::types::MerchantId;

/// Rows shown at once by [`search_select`].
const PAGE_SIZE: usize = 10;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for PromptError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::Interrupted {
            PromptError::Cancelled
        } else {
            PromptError::IoError(e.to_string())
        }
    }
}

impl From<dialoguer::Error> for PromptError {
    fn from(e: dialoguer::Error) -> Self {
        match e {
            dialoguer::Error::IO(io) => io.into(),
        }
    }
}

/// Prompt for confirmation (yes/no).
///
/// Returns `Ok(true)` if the user confirms, `Ok(false)` if they decline.
/// Returns `Err(PromptError::NotInteractive)` if not in interactive mode.
pub fn confirm(message: &str, default: bool, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact_on_opt(&Term::stderr())?
        .ok_or(PromptError::Cancelled)
}

/// Prompt to select from a list of options.
///
/// Returns the index of the selected option.
pub fn select<T: AsRef<str>>(
    message: &str,
    options: &[T],
    default: Option<usize>,
    interactive: bool,
) -> Result<usize, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let items: Vec<&str> = options.iter().map(AsRef::as_ref).collect();
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .items(&items)
        .default(default.unwrap_or(0))
        .max_length(PAGE_SIZE)
        .interact_on_opt(&Term::stderr())?
        .ok_or(PromptError::Cancelled)
}

/// One row offered by [`search_select`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Text shown to the user.
    pub label: String,
    /// Value returned when chosen.
    pub value: String,
}

/// Single-choice prompt with incremental search.
///
/// `source` is called with the current input on every keystroke (and once
/// with an empty string up front) and returns the rows to offer. Arrow keys
/// move, Enter picks, Escape cancels.
pub fn search_select<F>(message: &str, interactive: bool, mut source: F) -> Result<String, PromptError>
where
    F: FnMut(&str) -> Vec<Choice>,
{
    if !interactive {
        return Err(PromptError::NotInteractive);
    }

    let term = Term::stderr();
    if !term.is_term() {
        return Err(PromptError::NotInteractive);
    }

    term.hide_cursor()?;
    let mut rendered = 0;
    let result = run_search(&term, message, &mut source, &mut rendered);
    term.clear_last_lines(rendered)?;
    term.show_cursor()?;
    result
}

fn run_search<F>(
    term: &Term,
    message: &str,
    source: &mut F,
    rendered: &mut usize,
) -> Result<String, PromptError>
where
    F: FnMut(&str) -> Vec<Choice>,
{
    let mut input = String::new();
    let mut choices = source(&input);
    let mut cursor = 0usize;

    loop {
        term.clear_last_lines(*rendered)?;
        *rendered = render(term, message, &input, &choices, cursor)?;

        match term.read_key()? {
            Key::Enter => {
                if let Some(choice) = choices.get(cursor) {
                    return Ok(choice.value.clone());
                }
            }
            Key::Escape => return Err(PromptError::Cancelled),
            Key::ArrowUp => {
                cursor = if cursor == 0 {
                    choices.len().saturating_sub(1)
                } else {
                    cursor - 1
                };
            }
            Key::ArrowDown => {
                cursor = if cursor + 1 >= choices.len() { 0 } else { cursor + 1 };
            }
            Key::Backspace => {
                if input.pop().is_some() {
                    choices = source(&input);
                    cursor = 0;
                }
            }
            Key::Char(c) if !c.is_control() => {
                input.push(c);
                choices = source(&input);
                cursor = 0;
            }
            _ => {}
        }
    }
}

/// Draw the prompt line and the visible page. Returns the number of lines.
fn render(
    term: &Term,
    message: &str,
    input: &str,
    choices: &[Choice],
    cursor: usize,
) -> Result<usize, PromptError> {
    term.write_line(&format!("{} {} {}", style("?").green(), style(message).bold(), input))?;

    if choices.is_empty() {
        term.write_line(&format!("  {}", style("No results").dim()))?;
        return Ok(2);
    }

    let start = (cursor + 1).saturating_sub(PAGE_SIZE);
    let visible = choices.iter().enumerate().skip(start).take(PAGE_SIZE);
    let mut lines = 1;
    for (index, choice) in visible {
        if index == cursor {
            term.write_line(&format!("{} {}", style("❯").cyan(), style(&choice.label).cyan()))?;
        } else {
            term.write_line(&format!("  {}", choice.label))?;
        }
        lines += 1;
    }
    Ok(lines)
}

/// Picks merchants with [`search_select`] on the terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPicker {
    interactive: bool,
}

impl TerminalPicker {
    /// Create a picker honoring the interactive flag.
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl MerchantPicker for TerminalPicker {
    fn pick(&mut self, request: &PickRequest<'_>) -> Result<MerchantId, PromptError> {
        let value = search_select(request.message, self.interactive, |input| {
            request
                .candidates(input)
                .into_iter()
                .map(|m| Choice {
                    label: m.label(),
                    value: m.id.to_string(),
                })
                .collect()
        })?;
        Ok(MerchantId::new(value))
    }
}
