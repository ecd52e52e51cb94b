//! Report sink port

/// Line-oriented, write-only output for narration and summaries.
pub trait ReportSink: Send {
    /// Writes one line.
    fn line(&mut self, line: &str);
}

impl ReportSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn line(&mut self, line: &str) {
        (**self).line(line);
    }
}
