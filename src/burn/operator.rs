//! Operator interaction between copies.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// The person feeding blank disks into the drive.
pub trait Operator {
    /// Block until the operator reports a blank disk is inserted.
    fn wait_for_disk(&mut self, prompt: &str) -> Result<()>;

    /// Ask a yes/no question; `false` unless the answer starts with `y`.
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Accepts only answers whose first character is `y` or `Y`.
pub fn is_yes(response: &str) -> bool {
    response
        .chars()
        .next()
        .is_some_and(|c| c.to_ascii_lowercase() == 'y')
}

/// Operator on a terminal: prompts on stdout, answers from stdin.
pub struct ConsoleOperator<R> {
    input: R,
}

impl ConsoleOperator<std::io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            input: std::io::stdin().lock(),
        }
    }
}

impl<R: BufRead> ConsoleOperator<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_answer(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush().context("flushing prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("reading operator response")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> Operator for ConsoleOperator<R> {
    fn wait_for_disk(&mut self, prompt: &str) -> Result<()> {
        match self.read_answer(prompt)? {
            Some(_) => Ok(()),
            None => bail!("input closed while waiting for a blank disk"),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.read_answer(prompt)?.is_some_and(|answer| is_yes(&answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes("Yes"));
        assert!(is_yes("yup"));
        assert!(!is_yes("no"));
        assert!(!is_yes(""));
        assert!(!is_yes("ok y"));
        assert!(!is_yes(" yes"));
        assert!(!is_yes("\tY"));
    }

    #[test]
    fn test_console_operator_reads_lines() {
        let mut operator = ConsoleOperator::new(Cursor::new("\nYES\nnope\n  y\n"));
        operator.wait_for_disk("insert> ").unwrap();
        assert!(operator.confirm("again? ").unwrap());
        assert!(!operator.confirm("again? ").unwrap());
        assert!(!operator.confirm("again? ").unwrap());
    }

    #[test]
    fn test_console_operator_eof() {
        let mut operator = ConsoleOperator::new(Cursor::new(""));
        assert!(!operator.confirm("again? ").unwrap());
        assert!(operator.wait_for_disk("insert> ").is_err());
    }
}
