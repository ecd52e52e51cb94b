//! Run context
//!
//! Holds the per-run state the executor reads and updates: host aliases,
//! the request filter, output flags, credentials, the PUT body, parameter
//! bindings, the statistics and the narration buffer of the request being
//! executed.

use regex::Regex;

use restcheck_domain::{
    AuthPolicy, Credentials, ExecutionOutcome, HostAliasTable, RunConfig, RunStatistics,
    VariableBindings, request::HttpMethod,
};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::ReportSink;

/// Explicit state of one harness run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    host_aliases: HostAliasTable,
    filter: Option<Regex>,
    show_passed: bool,
    show_body: bool,
    credentials: Option<Credentials>,
    put_body: Option<String>,
    get_auth: AuthPolicy,
    bindings: VariableBindings,
    statistics: RunStatistics,
    narration: Vec<String>,
}

impl RunContext {
    /// Creates a context with default settings and zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from a run configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Config` if the request filter is not a
    /// valid regular expression.
    pub fn from_config(config: &RunConfig) -> ApplicationResult<Self> {
        let mut context = Self {
            host_aliases: config.host_aliases.clone(),
            show_passed: config.show_passed,
            show_body: config.show_body,
            credentials: config.credentials.clone(),
            put_body: config.put_body.clone(),
            get_auth: config.get_auth,
            bindings: config.bindings.clone(),
            ..Self::default()
        };
        if let Some(pattern) = &config.request_filter {
            context.set_filter(pattern)?;
        }
        Ok(context)
    }

    /// Zeroes the statistics for a new run.
    pub fn start(&mut self) {
        self.statistics.reset();
        self.narration.clear();
    }

    /// Registers a host alias.
    pub fn alias_host(&mut self, old: impl Into<String>, new: impl Into<String>) {
        self.host_aliases.alias(old, new);
    }

    /// Returns the host alias table.
    #[must_use]
    pub const fn host_aliases(&self) -> &HostAliasTable {
        &self.host_aliases
    }

    /// Restricts the run to requests whose identity matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Config` if the pattern does not compile.
    pub fn set_filter(&mut self, pattern: &str) -> ApplicationResult<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| ApplicationError::Config(format!("invalid request filter: {e}")))?;
        self.filter = Some(regex);
        Ok(())
    }

    /// Removes the request filter.
    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Returns true if the request identity passes the filter.
    #[must_use]
    pub fn matches_filter(&self, identity: &str) -> bool {
        self.filter.as_ref().is_none_or(|f| f.is_match(identity))
    }

    /// Keeps narration of passing requests when set.
    pub const fn set_show_passed(&mut self, show: bool) {
        self.show_passed = show;
    }

    /// Echoes response bodies of requests with a result descriptor when set.
    pub const fn set_show_body(&mut self, show: bool) {
        self.show_body = show;
    }

    /// Returns whether response bodies are echoed.
    #[must_use]
    pub const fn show_body(&self) -> bool {
        self.show_body
    }

    /// Sets basic-auth credentials.
    pub fn set_credentials(&mut self, credentials: Option<Credentials>) {
        self.credentials = credentials;
    }

    /// Returns the configured credentials.
    #[must_use]
    pub const fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Sets the credential policy for GET requests.
    pub const fn set_get_auth(&mut self, policy: AuthPolicy) {
        self.get_auth = policy;
    }

    /// Returns the credentials to attach to the first call of `method`.
    ///
    /// GET under `AuthPolicy::Always` carries credentials even when none are
    /// configured, in which case they are empty.
    #[must_use]
    pub fn credentials_for(&self, method: HttpMethod) -> Option<Credentials> {
        match (method, self.get_auth, &self.credentials) {
            (_, _, Some(credentials)) => Some(credentials.clone()),
            (HttpMethod::Get, AuthPolicy::Always, None) => Some(Credentials::empty()),
            _ => None,
        }
    }

    /// Sets the body sent with PUT requests.
    pub fn set_put_body(&mut self, body: Option<String>) {
        self.put_body = body;
    }

    /// Returns the body sent with PUT requests.
    #[must_use]
    pub fn put_body(&self) -> Option<&str> {
        self.put_body.as_deref()
    }

    /// Binds a path parameter value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.bind(name, value);
    }

    /// Removes a path parameter binding.
    pub fn unbind(&mut self, name: &str) -> Option<String> {
        self.bindings.unbind(name)
    }

    /// Returns the parameter bindings.
    #[must_use]
    pub const fn bindings(&self) -> &VariableBindings {
        &self.bindings
    }

    /// Returns the statistics accumulated so far.
    #[must_use]
    pub const fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Counts the start of an invocation.
    pub(crate) const fn begin(&mut self) {
        self.statistics.begin();
    }

    /// Buffers a narration line for the current request.
    pub(crate) fn narrate(&mut self, line: impl Into<String>) {
        self.narration.push(line.into());
    }

    /// Drops the narration of the current request.
    pub(crate) fn discard_narration(&mut self) {
        self.narration.clear();
    }

    /// Records `outcome` and flushes or discards the narration buffer.
    ///
    /// Passing requests are only shown when `show_passed` is set.
    pub(crate) fn finalize<S: ReportSink + ?Sized>(&mut self, outcome: &ExecutionOutcome, sink: &mut S) {
        self.statistics.record(outcome);
        if let Some(tag) = outcome.tag() {
            self.narration.push(tag);
        }
        if outcome.is_passed() && !self.show_passed {
            self.narration.clear();
        } else {
            for line in self.narration.drain(..) {
                sink.line(&line);
            }
        }
    }

    /// Writes the run summary to `sink`.
    pub fn print_summary<S: ReportSink + ?Sized>(&self, sink: &mut S) {
        for line in self.statistics.summary_lines() {
            sink.line(&line);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_is_unanchored_regex() {
        let mut ctx = RunContext::new();
        assert!(ctx.matches_filter("GET /anything"));

        ctx.set_filter("items/<id>$").unwrap();
        assert!(ctx.matches_filter("GET /items/<id>"));
        assert!(!ctx.matches_filter("GET /items/<id>/tags"));

        ctx.clear_filter();
        assert!(ctx.matches_filter("GET /items/<id>/tags"));
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let config = RunConfig {
            request_filter: Some("(".to_string()),
            ..RunConfig::default()
        };
        assert!(matches!(
            RunContext::from_config(&config),
            Err(ApplicationError::Config(_))
        ));
    }

    #[test]
    fn test_credentials_policy() {
        let mut ctx = RunContext::new();
        assert_eq!(
            ctx.credentials_for(HttpMethod::Get),
            Some(Credentials::empty())
        );
        assert_eq!(ctx.credentials_for(HttpMethod::Post), None);

        ctx.set_get_auth(AuthPolicy::IfConfigured);
        assert_eq!(ctx.credentials_for(HttpMethod::Get), None);

        ctx.set_credentials(Some(Credentials::new("alice", "secret")));
        assert_eq!(
            ctx.credentials_for(HttpMethod::Put),
            Some(Credentials::new("alice", "secret"))
        );
        assert_eq!(
            ctx.credentials_for(HttpMethod::Get),
            Some(Credentials::new("alice", "secret"))
        );
    }

    #[test]
    fn test_passed_narration_hidden_by_default() {
        let mut ctx = RunContext::new();
        let mut sink = Vec::new();

        ctx.begin();
        ctx.narrate("REQUEST: GET /a");
        ctx.finalize(&ExecutionOutcome::Passed, &mut sink);
        assert!(sink.is_empty());

        ctx.set_show_passed(true);
        ctx.begin();
        ctx.narrate("REQUEST: GET /b");
        ctx.finalize(&ExecutionOutcome::Passed, &mut sink);
        assert_eq!(sink, vec!["REQUEST: GET /b", "  PASSED"]);
        assert_eq!(ctx.statistics().passed, 2);
    }

    #[test]
    fn test_failed_narration_flushed() {
        let mut ctx = RunContext::new();
        let mut sink = Vec::new();

        ctx.begin();
        ctx.narrate("REQUEST: GET /a");
        ctx.finalize(&ExecutionOutcome::error("No host defined"), &mut sink);
        assert_eq!(sink, vec!["REQUEST: GET /a", "  ERROR: No host defined"]);

        ctx.begin();
        ctx.finalize(&ExecutionOutcome::Skipped, &mut sink);
        assert_eq!(sink.len(), 2);
        assert_eq!(ctx.statistics().skipped, 1);
    }

    #[test]
    fn test_from_config_and_start() {
        let mut config = RunConfig::default();
        config.host_aliases.alias("api", "localhost:1");
        config.bindings.bind("id", "7");
        config.put_body = Some("<item/>".to_string());

        let mut ctx = RunContext::from_config(&config).unwrap();
        assert_eq!(ctx.host_aliases().resolve("api"), "localhost:1");
        assert_eq!(ctx.put_body(), Some("<item/>"));
        assert_eq!(ctx.bindings().len(), 1);

        ctx.begin();
        ctx.start();
        assert_eq!(ctx.statistics().tested, 0);
    }
}
