//! Console report sink.

use std::io::{self, Write};

use tracing::warn;

use restcheck_application::ports::ReportSink;

/// Report sink writing lines to a byte stream, stdout by default.
pub struct ConsoleReporter {
    out: Box<dyn Write + Send>,
}

impl ConsoleReporter {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a reporter writing to any stream.
    #[must_use]
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }
}

impl ReportSink for ConsoleReporter {
    fn line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write report line");
        }
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter").finish_non_exhaustive()
    }
}
