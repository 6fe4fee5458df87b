//! Stage narration.
//!
//! The planner reports what it is doing through a [`StatusReporter`] held by
//! the [`MergeContext`](crate::MergeContext). Whether anything is printed is
//! decided by which reporter the caller installs.

use std::sync::{Arc, Mutex};

/// Receives human-readable progress messages.
pub trait StatusReporter: Send + Sync {
    fn status(&self, message: &str);
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl StatusReporter for Silent {
    fn status(&self, _message: &str) {}
}

/// Prints every message on stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct Console;

impl StatusReporter for Console {
    fn status(&self, message: &str) {
        println!("{message}");
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct Recording {
    messages: Mutex<Vec<String>>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StatusReporter for Recording {
    fn status(&self, message: &str) {
        let mut messages = match self.messages.lock() {
            Ok(messages) => messages,
            Err(poisoned) => poisoned.into_inner(),
        };
        messages.push(message.to_string());
    }
}

/// [`Console`] when `verbose`, otherwise [`Silent`].
pub fn reporter_for(verbose: bool) -> Arc<dyn StatusReporter> {
    if verbose {
        Arc::new(Console)
    } else {
        Arc::new(Silent)
    }
}
