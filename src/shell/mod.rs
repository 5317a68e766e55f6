//! The Isidore command shell: a small word-oriented language over the store

pub mod command;
pub mod executor;
pub mod export;
pub mod help;
pub mod lexer;
pub mod session;

pub use command::{parse, Command, Parsed};
pub use executor::execute;
pub use export::{shell_quote, write_config};
pub use session::{Flow, Session};

use std::io::{BufRead, Write};

use crate::error::{IsidoreError, Result};
use crate::store::Store;

/// Run a single command given as words, as `isidore exec` does.
pub fn run_words(store: &Store, words: &[String], out: &mut dyn Write) -> Result<()> {
    match parse(words)? {
        Parsed::Command(command) => execute(store, &command, out),
        Parsed::Help(text) => Ok(writeln!(out, "{}", text)?),
        Parsed::Incomplete => Err(IsidoreError::Parse(
            "Incomplete command. Enter ? for help.".to_string(),
        )),
    }
}

/// Read commands from `input` without prompting until EOF, `quit` or a top
/// level `end`. Returns how many commands failed.
pub fn run_script(
    store: &Store,
    input: impl BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<usize> {
    let mut session = Session::new(store);
    for line in input.lines() {
        if session.handle_line(&line?, out, err)? == Flow::Quit {
            break;
        }
    }
    Ok(session.failures())
}
