//! Call boundary instrumentation.
//!
//! Services and stores are wrapped in decorators ([`user`]) that time every
//! call, log entry/exit and failures, and flag slow calls against a
//! [`SlowCallPolicy`]. Results are returned untouched.

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use std::time::Instant;

pub mod user;

/// How a call's duration compares to its policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSpeed {
    Normal,
    /// Above the informational threshold
    Notable,
    /// Above the warning threshold
    Slow,
}

/// Duration thresholds for one call boundary. Both bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlowCallPolicy {
    pub warn_after: Duration,
    pub notice_after: Option<Duration>,
}

impl SlowCallPolicy {
    /// Service calls: warn above 3s, report above 1s.
    pub const SERVICE: Self = Self {
        warn_after: Duration::from_millis(3000),
        notice_after: Some(Duration::from_millis(1000)),
    };

    /// Store calls: warn above 1s.
    pub const STORE: Self = Self {
        warn_after: Duration::from_millis(1000),
        notice_after: None,
    };

    pub fn classify(&self, elapsed: Duration) -> CallSpeed {
        if elapsed > self.warn_after {
            CallSpeed::Slow
        } else if self.notice_after.is_some_and(|notice| elapsed > notice) {
            CallSpeed::Notable
        } else {
            CallSpeed::Normal
        }
    }
}

/// Identifies an instrumented call in log lines.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub component: &'static str,
    pub operation: &'static str,
    pub arguments: String,
}

impl CallSite {
    pub fn new(component: &'static str, operation: &'static str) -> Self {
        Self {
            component,
            operation,
            arguments: String::new(),
        }
    }

    /// Attach a rendering of the call arguments, logged when the call fails.
    /// Callers must leave secrets out.
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }
}

/// Run `call`, logging its outcome and duration under `site`.
///
/// The result, including the error value, is returned unchanged.
pub async fn observe_call<T, E, F>(site: CallSite, policy: SlowCallPolicy, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let CallSite {
        component,
        operation,
        arguments,
    } = site;

    tracing::debug!(component, operation, "Call started");

    let started = Instant::now();
    let result = call.await;
    let elapsed = started.elapsed();
    let elapsed_ms = elapsed.as_millis() as u64;

    match &result {
        Ok(_) => {
            tracing::debug!(component, operation, elapsed_ms, "Call completed");

            match policy.classify(elapsed) {
                CallSpeed::Slow => tracing::warn!(
                    component,
                    operation,
                    elapsed_ms,
                    threshold_ms = policy.warn_after.as_millis() as u64,
                    "Slow call detected"
                ),
                CallSpeed::Notable => {
                    tracing::info!(component, operation, elapsed_ms, "Call took longer than usual")
                }
                CallSpeed::Normal => {}
            }
        }
        Err(error) => {
            tracing::error!(
                component,
                operation,
                elapsed_ms,
                error_type = type_name::<E>(),
                error = %error,
                arguments = %arguments,
                "Call failed"
            );
        }
    }

    result
}
