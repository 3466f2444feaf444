//! Stdin/stdout console
//!
//! Stands in for the serial channel on a host: commands come from
//! stdin one line at a time, output goes to stdout. End of input on
//! stdin ends the command loop.

use std::io::{self, BufRead, Write};

use sramprog_core::console::{Console, Line};

/// Line console over the process's standard streams
#[derive(Default)]
pub struct StdioConsole {
    pending: Option<String>,
    eof: bool,
}

impl StdioConsole {
    pub fn new() -> Self {
        Self::default()
    }

    fn fetch(&mut self) {
        if self.pending.is_some() || self.eof {
            return;
        }
        let mut raw = String::new();
        match io::stdin().lock().read_line(&mut raw) {
            Ok(0) => self.eof = true,
            Ok(_) => self.pending = Some(raw),
            Err(e) => {
                log::error!("console read failed: {}", e);
                self.eof = true;
            }
        }
    }
}

impl Console for StdioConsole {
    fn line_available(&mut self) -> bool {
        self.fetch();
        self.pending.is_some()
    }

    fn read_line(&mut self) -> Line {
        self.fetch();
        let raw = self.pending.take().unwrap_or_default();
        let mut line = Line::new();
        for ch in raw.trim_end_matches(['\r', '\n']).chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        line
    }

    fn write_line(&mut self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
    }
}
