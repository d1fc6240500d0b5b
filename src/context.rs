//! Cancellation and deadline context for client operations.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CapiError, Result};

/// Cancellation signal plus optional deadline, bound to every request and
/// every polling wait an operation performs.
///
/// Cloning a context shares its cancellation token.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use capi::Context;
///
/// let ctx = Context::background().with_timeout(Duration::from_secs(30));
/// let child = ctx.clone();
/// ctx.cancel();
/// assert!(child.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Bind an externally owned cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set an absolute deadline, keeping the earlier one if already set.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Set a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Fire the cancellation signal.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The cancellation token backing this context.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The error this context would fail an operation with right now.
    pub fn err(&self) -> Option<CapiError> {
        if self.token.is_cancelled() {
            return Some(CapiError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CapiError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` until it completes or the context fires.
    ///
    /// The context is checked before `fut` is first polled, so an already
    /// cancelled context never starts the work. When the context fires
    /// mid-flight `fut` is dropped, which aborts the in-flight request.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CapiError::Cancelled),
            _ = deadline => Err(CapiError::DeadlineExceeded),
            result = fut => result,
        }
    }

    /// Sleep for `duration`, returning early with an error if the context fires.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}
