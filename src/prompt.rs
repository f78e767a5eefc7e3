use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, Write};

/// Asks `Delete <count> suggested files? [y/N]` and waits for one key press.
/// Only `y` confirms.
pub fn confirm_delete(count: usize) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "\nDelete {count} suggested files? [y/N]: ")?;
    stderr.flush()?;

    enable_raw_mode()?;
    let answer = read_answer();
    disable_raw_mode()?;

    writeln!(stderr)?;
    answer
}

fn read_answer() -> Result<bool> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(accepts(key.code));
        }
    }
}

fn accepts(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('y' | 'Y'))
}
