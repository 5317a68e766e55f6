//! REPL module for interactive mode

#[cfg(feature = "repl")]
pub mod interactive;

#[cfg(feature = "repl")]
pub use interactive::run_repl;

#[cfg(not(feature = "repl"))]
pub fn run_repl(store: &crate::store::Store) -> crate::error::Result<()> {
    use std::io;

    tracing::warn!("line editing not enabled, reading commands from stdin");
    let stdout = io::stdout();
    let stderr = io::stderr();
    crate::shell::run_script(store, io::stdin().lock(), &mut stdout.lock(), &mut stderr.lock())?;
    Ok(())
}
