//! Interactive prompt adapters.

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use graft_core::{
    application::{ApplicationError, ports::Prompt},
    error::GraftResult,
};

/// Terminal yes/no confirmation with a "no" default.
///
/// Outside a TTY the prompt never blocks: it answers "no", which is always
/// the safe, non-mutating branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermPrompt {
    assume_yes: bool,
}

impl TermPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with "yes" without prompting (`--yes`).
    pub fn assume_yes() -> Self {
        Self { assume_yes: true }
    }
}

impl Prompt for TermPrompt {
    fn confirm(&self, message: &str) -> GraftResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !io::stdin().is_terminal() {
            return Ok(false);
        }

        print!("{message} [y/N] ");
        io::stdout()
            .flush()
            .map_err(|e| ApplicationError::PromptFailed {
                reason: format!("failed to flush stdout: {e}"),
            })?;

        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|e| ApplicationError::PromptFailed {
                reason: format!("failed to read confirmation input: {e}"),
            })?;

        let input = input.trim().to_ascii_lowercase();
        Ok(input == "y" || input == "yes")
    }
}

/// Test prompt replaying a fixed sequence of answers.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }

    /// A prompt that always declines - the normal-termination path.
    pub fn always_no() -> Self {
        Self::default()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, _message: &str) -> GraftResult<bool> {
        Ok(self.answers.lock().unwrap().pop_front().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_prompt_replays_then_declines() {
        let prompt = ScriptedPrompt::new([true, false]);
        assert!(prompt.confirm("first?").unwrap());
        assert!(!prompt.confirm("second?").unwrap());
        assert!(!prompt.confirm("exhausted?").unwrap());
    }

    #[test]
    fn assume_yes_never_blocks() {
        let prompt = TermPrompt::assume_yes();
        assert!(prompt.confirm("remove the package?").unwrap());
    }
}
