//! Scripted serial console
//!
//! Input lines are queued up front; everything written by the system is
//! captured for inspection. Clones share the same queues.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use sramprog_core::console::{Console, Line};

#[derive(Default)]
struct Script {
    input: VecDeque<String>,
    output: Vec<String>,
}

/// Test console with scripted input and captured output
#[derive(Clone, Default)]
pub struct ScriptConsole {
    script: Rc<RefCell<Script>>,
}

impl ScriptConsole {
    /// Create a console with no pending input
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one input line
    pub fn push_line(&self, line: &str) {
        self.script.borrow_mut().input.push_back(line.to_string());
    }

    /// Everything written so far, one entry per line
    pub fn output(&self) -> Vec<String> {
        self.script.borrow().output.clone()
    }

    /// Whether any output line contains `needle`
    pub fn output_contains(&self, needle: &str) -> bool {
        self.script
            .borrow()
            .output
            .iter()
            .any(|line| line.contains(needle))
    }
}

impl Console for ScriptConsole {
    fn line_available(&mut self) -> bool {
        !self.script.borrow().input.is_empty()
    }

    fn read_line(&mut self) -> Line {
        let raw = self
            .script
            .borrow_mut()
            .input
            .pop_front()
            .unwrap_or_default();
        let mut line = Line::new();
        for ch in raw.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        line
    }

    fn write_line(&mut self, line: &str) {
        self.script.borrow_mut().output.push(line.to_string());
    }
}
