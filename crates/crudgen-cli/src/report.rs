use crudgen_schema::Reporter;

/// Console reporter: info to stdout, warnings to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        println!("{msg}");
    }

    fn warn(&self, msg: &str) {
        eprintln!("[WARN] {msg}");
    }
}
