//! Line-oriented stdin/stdout implementations of the dialog and notification seams.

use std::io::Write;

use async_trait::async_trait;
use client_core::{Dialog, Notifier, Prompt};
use shared::domain::{EmployeeFields, ShiftTime};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::debug;

/// Field values supplied on the command line. Missing ones are prompted for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub shift_start: Option<ShiftTime>,
    pub shift_end: Option<ShiftTime>,
}

impl PresetFields {
    pub fn complete(&self) -> Option<EmployeeFields> {
        Some(EmployeeFields::new(
            self.first_name.clone()?,
            self.last_name.clone()?,
            self.shift_start?,
            self.shift_end?,
        ))
    }
}

pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// An empty answer keeps `default`.
pub fn resolve_answer<'a>(answer: &'a str, default: Option<&'a str>) -> Option<&'a str> {
    let answer = answer.trim();
    if answer.is_empty() {
        default
    } else {
        Some(answer)
    }
}

pub struct TerminalDialog {
    preset: PresetFields,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalDialog {
    pub fn new(preset: PresetFields) -> Self {
        Self {
            preset,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// `None` on end of input or a read error.
    async fn ask(&self, question: &str) -> Option<String> {
        print!("{question}");
        if let Err(err) = std::io::stdout().flush() {
            debug!(error = %err, "terminal: failed to flush prompt");
        }
        match self.lines.lock().await.next_line().await {
            Ok(line) => line,
            Err(err) => {
                debug!(error = %err, "terminal: failed to read stdin");
                None
            }
        }
    }

    async fn ask_text(&self, label: &str, default: Option<&str>) -> Option<String> {
        loop {
            let question = match default {
                Some(default) => format!("{label} [{default}]: "),
                None => format!("{label}: "),
            };
            let answer = self.ask(&question).await?;
            match resolve_answer(&answer, default) {
                Some(value) => return Some(value.to_string()),
                None => println!("{label} is required."),
            }
        }
    }

    async fn ask_shift(&self, label: &str, default: Option<ShiftTime>) -> Option<ShiftTime> {
        let default = default.map(|time| time.to_string());
        loop {
            let answer = self.ask_text(label, default.as_deref()).await?;
            match answer.parse() {
                Ok(time) => return Some(time),
                Err(err) => println!("{err}"),
            }
        }
    }
}

#[async_trait]
impl Dialog for TerminalDialog {
    async fn confirm(&self, prompt: &Prompt) -> bool {
        println!("{}", prompt.title);
        match self.ask(&format!("{} [y/N]: ", prompt.message)).await {
            Some(answer) => is_confirmation(&answer),
            None => false,
        }
    }

    fn needs_prefill(&self) -> bool {
        self.preset.complete().is_none()
    }

    async fn input(
        &self,
        prompt: &Prompt,
        initial: Option<&EmployeeFields>,
    ) -> Option<EmployeeFields> {
        if let Some(fields) = self.preset.complete() {
            return Some(fields);
        }
        println!("{}\n{}", prompt.title, prompt.message);

        let first_name = match &self.preset.first_name {
            Some(value) => value.clone(),
            None => {
                self.ask_text("First name", initial.map(|f| f.first_name.as_str()))
                    .await?
            }
        };
        let last_name = match &self.preset.last_name {
            Some(value) => value.clone(),
            None => {
                self.ask_text("Last name", initial.map(|f| f.last_name.as_str()))
                    .await?
            }
        };
        let shift_start = match self.preset.shift_start {
            Some(value) => value,
            None => {
                self.ask_shift("Shift start (HH:MM)", initial.map(|f| f.shift_start))
                    .await?
            }
        };
        let shift_end = match self.preset.shift_end {
            Some(value) => value,
            None => {
                self.ask_shift("Shift end (HH:MM)", initial.map(|f| f.shift_end))
                    .await?
            }
        };

        Some(EmployeeFields::new(
            first_name,
            last_name,
            shift_start,
            shift_end,
        ))
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn show_error(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }

    // Errors are printed once and scroll away; nothing stays on screen to clear.
    fn clear_error(&self) {}
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
