//! Line-by-line shell session with nested subprompts

use std::io::Write;

use tracing::{error, warn};

use crate::error::Result;
use crate::shell::command::{parse, Parsed};
use crate::shell::executor::execute;
use crate::shell::{help, lexer};
use crate::store::Store;

/// What the reader loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Shell state between lines.
///
/// An incomplete command pushes a subprompt whose words prefix every line
/// typed into it. `end` leaves the innermost subprompt; `end` at the top
/// level and `quit` anywhere leave the shell.
pub struct Session<'a> {
    store: &'a Store,
    stack: Vec<Vec<String>>,
    failures: usize,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            stack: Vec::new(),
            failures: 0,
        }
    }

    /// `> ` at the top level, else the subprompt words.
    pub fn prompt(&self) -> String {
        match self.stack.last() {
            Some(words) => format!("{}> ", words.join(" ")),
            None => "> ".to_string(),
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Commands that failed so far.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Leave the innermost subprompt. Returns `Quit` at the top level.
    pub fn end(&mut self) -> Flow {
        match self.stack.pop() {
            Some(_) => Flow::Continue,
            None => Flow::Quit,
        }
    }

    /// Handle one input line. Command output goes to `out`, problems to
    /// `err`. Only failures to write are returned as errors.
    pub fn handle_line(
        &mut self,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<Flow> {
        let words = match lexer::split(line) {
            Ok(words) => words,
            Err(e) => {
                self.failures += 1;
                writeln!(err, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match words.first().map(String::as_str) {
            None => return Ok(Flow::Continue),
            Some("end") if words.len() == 1 => return Ok(self.end()),
            Some("quit") if words.len() == 1 => return Ok(Flow::Quit),
            Some("?") if !self.stack.is_empty() => writeln!(out, "{}", help::SUBPROMPT)?,
            _ => {}
        }

        let mut full = self.stack.last().cloned().unwrap_or_default();
        full.extend(words);
        self.dispatch(full, out, err)?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, words: Vec<String>, out: &mut dyn Write, err: &mut dyn Write) -> Result<()> {
        match parse(&words) {
            Ok(Parsed::Help(text)) => writeln!(out, "{}", text)?,
            Ok(Parsed::Incomplete) => self.stack.push(words),
            Ok(Parsed::Command(command)) => {
                if let Err(e) = execute(self.store, &command, out) {
                    self.failures += 1;
                    if e.is_user_error() {
                        warn!(error = %e, "command rejected");
                        writeln!(err, "{}", e)?;
                    } else {
                        error!(error = ?e, ?command, "command failed");
                        writeln!(err, "Failed to run `{}`: {}", words.join(" "), e)?;
                    }
                }
            }
            Err(e) => {
                self.failures += 1;
                writeln!(err, "{}", e)?;
            }
        }
        Ok(())
    }
}
