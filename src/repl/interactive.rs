//! Interactive shell on a line editor

use std::io;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::error::{IsidoreError, Result};
use crate::shell::{Flow, Session};
use crate::store::Store;

fn editor_error(e: ReadlineError) -> IsidoreError {
    IsidoreError::Io(io::Error::new(io::ErrorKind::Other, e.to_string()))
}

/// Prompt for commands until `quit`, or until `end`/Ctrl-D at the top level.
/// Ctrl-C drops the line being typed; Ctrl-D leaves the current subprompt.
pub fn run_repl(store: &Store) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(editor_error)?;

    println!("Isidore v{} - Interactive Mode", Store::library_version());
    println!("Enter ? for help, quit to exit\n");

    let mut session = Session::new(store);
    let stdout = io::stdout();
    let stderr = io::stderr();

    loop {
        match rl.readline(&session.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                let flow = session.handle_line(&line, &mut stdout.lock(), &mut stderr.lock())?;
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => {
                println!();
                if session.end() == Flow::Quit {
                    break;
                }
            }
            Err(e) => return Err(editor_error(e)),
        }
    }

    debug!(failures = session.failures(), "leaving interactive shell");
    Ok(())
}
