//! Reporter abstraction for progress and warning output.
//!
//! Resolution and loading code depends only on this trait, never on a
//! terminal, so it stays testable headlessly. The CLI provides the console
//! implementation.

/// Severity-carrying sink for diagnostic output.
pub trait Reporter {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
}

/// Discards everything. Used in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
}
