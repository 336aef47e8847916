use std::{error::Error as StdError, fmt, sync::Arc, time::Duration};

use crate::{bind::Value, query::Statement};

/// Observes statement execution.
///
/// Every attempt is reported, including retries. All methods default to
/// doing nothing.
pub trait QueryHook: Send + Sync {
    fn before_execute(&self, _statement: &Statement) {}

    fn after_execute(
        &self,
        _statement: &Statement,
        _elapsed: Duration,
        _error: Option<&(dyn StdError + 'static)>,
    ) {
    }

    /// Asked after a failed attempt, `attempt` starts at 1. The statement is
    /// submitted again when any hook returns `true`.
    fn should_retry(
        &self,
        _statement: &Statement,
        _attempt: u32,
        _error: &(dyn StdError + 'static),
    ) -> bool {
        false
    }
}

#[derive(Clone, Default)]
pub struct Hooks(Vec<Arc<dyn QueryHook>>);

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").field("len", &self.0.len()).finish()
    }
}

impl Hooks {
    pub fn push(&mut self, hook: Arc<dyn QueryHook>) {
        self.0.push(hook);
    }

    pub fn extend(&mut self, other: &Hooks) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn before(&self, statement: &Statement) {
        for hook in &self.0 {
            hook.before_execute(statement);
        }
    }

    pub(crate) fn after(
        &self,
        statement: &Statement,
        elapsed: Duration,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        for hook in &self.0 {
            hook.after_execute(statement, elapsed, error);
        }
    }

    pub(crate) fn should_retry(
        &self,
        statement: &Statement,
        attempt: u32,
        error: &(dyn StdError + 'static),
    ) -> bool {
        self.0
            .iter()
            .any(|hook| hook.should_retry(statement, attempt, error))
    }
}

/// Logs every executed statement through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingHook {
    pub slow_threshold: Option<Duration>,
    pub log_values: bool,
}

impl TracingHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements slower than `threshold` are logged at `WARN`.
    pub fn slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    /// Include bound values in the log lines.
    pub fn log_values(mut self, enabled: bool) -> Self {
        self.log_values = enabled;
        self
    }
}

impl QueryHook for TracingHook {
    fn after_execute(
        &self,
        statement: &Statement,
        elapsed: Duration,
        error: Option<&(dyn StdError + 'static)>,
    ) {
        let args: &[Value] = if self.log_values { &statement.args } else { &[] };
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        if let Some(error) = error {
            tracing::warn!(
                target: "sqlcraft::query",
                sql = %statement.sql,
                args = ?args,
                elapsed_ms,
                error = %error,
                "statement failed",
            );
        } else if self.slow_threshold.is_some_and(|threshold| elapsed >= threshold) {
            tracing::warn!(
                target: "sqlcraft::query",
                sql = %statement.sql,
                args = ?args,
                elapsed_ms,
                "slow statement",
            );
        } else {
            tracing::debug!(
                target: "sqlcraft::query",
                sql = %statement.sql,
                args = ?args,
                elapsed_ms,
                "statement executed",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct RetryTwice(AtomicU32);

    impl QueryHook for RetryTwice {
        fn should_retry(&self, _: &Statement, attempt: u32, _: &(dyn StdError + 'static)) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            attempt < 2
        }
    }

    #[test]
    fn test_any_hook_can_request_retry() {
        let mut hooks = Hooks::default();
        hooks.push(Arc::new(TracingHook::new()));
        hooks.push(Arc::new(RetryTwice(AtomicU32::new(0))));
        let statement = Statement {
            sql: "SELECT 1".into(),
            args: vec![Value::Int(1)],
        };
        let error = std::fmt::Error;
        assert!(hooks.should_retry(&statement, 1, &error));
        assert!(!hooks.should_retry(&statement, 2, &error));
    }
}
