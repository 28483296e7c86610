//! Async job polling.
//!
//! The platform has no completion callback, so long-running jobs are
//! tracked by waiting one interval, checking, and stopping on the job's
//! terminal predicate. Each loop also ends on its deadline or when its
//! cancellation token fires, whichever comes first.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};

/// Kind of server-side job behind a [`JobHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    ContainerAsyncRequest,
    MetadataRetrieve,
    MetadataDeploy,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            JobKind::ContainerAsyncRequest => "ContainerAsyncRequest",
            JobKind::MetadataRetrieve => "MetadataRetrieve",
            JobKind::MetadataDeploy => "MetadataDeploy",
        })
    }
}

/// Id of a submitted job together with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    id: String,
    kind: JobKind,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, kind: JobKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// The id, if this handle belongs to `expected`.
    pub(crate) fn id_for(&self, expected: JobKind) -> Result<&str> {
        if self.kind == expected {
            Ok(&self.id)
        } else {
            Err(Error::new(ErrorKind::InvalidJob {
                expected,
                actual: self.kind,
            }))
        }
    }
}

/// Delay before each status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCadence {
    Fixed(Duration),
    /// `initial` for the first `initial_waits` waits, `then` afterwards.
    Stepped {
        initial: Duration,
        initial_waits: u32,
        then: Duration,
    },
}

impl PollCadence {
    /// Delay before check number `wait` (zero-based).
    pub fn delay(&self, wait: u32) -> Duration {
        match *self {
            PollCadence::Fixed(every) => every,
            PollCadence::Stepped {
                initial,
                initial_waits,
                then,
            } => {
                if wait < initial_waits {
                    initial
                } else {
                    then
                }
            }
        }
    }
}

/// Cadence and deadline of one poll kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub cadence: PollCadence,
    /// `None` polls until the job ends or the token is cancelled.
    pub deadline: Option<Duration>,
}

impl PollOptions {
    pub fn new(cadence: PollCadence, deadline: Option<Duration>) -> Self {
        Self { cadence, deadline }
    }

    pub fn with_cadence(mut self, cadence: PollCadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

/// Poll configuration for every job kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub container: PollOptions,
    pub retrieve: PollOptions,
    pub deploy: PollOptions,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            container: PollOptions::new(
                PollCadence::Stepped {
                    initial: Duration::from_millis(200),
                    initial_waits: 4,
                    then: Duration::from_millis(1000),
                },
                Some(Duration::from_secs(5 * 60)),
            ),
            retrieve: PollOptions::new(
                PollCadence::Fixed(Duration::from_secs(5)),
                Some(Duration::from_secs(30 * 60)),
            ),
            deploy: PollOptions::new(
                PollCadence::Fixed(Duration::from_secs(10)),
                Some(Duration::from_secs(2 * 60 * 60)),
            ),
        }
    }
}

impl PollSettings {
    pub fn with_container(mut self, options: PollOptions) -> Self {
        self.container = options;
        self
    }

    pub fn with_retrieve(mut self, options: PollOptions) -> Self {
        self.retrieve = options;
        self
    }

    pub fn with_deploy(mut self, options: PollOptions) -> Self {
        self.deploy = options;
        self
    }

    /// Drop every deadline; polls then end only on a terminal state or
    /// cancellation.
    pub fn unbounded(mut self) -> Self {
        self.container.deadline = None;
        self.retrieve.deadline = None;
        self.deploy.deadline = None;
        self
    }

    pub fn for_kind(&self, kind: JobKind) -> &PollOptions {
        match kind {
            JobKind::ContainerAsyncRequest => &self.container,
            JobKind::MetadataRetrieve => &self.retrieve,
            JobKind::MetadataDeploy => &self.deploy,
        }
    }
}

/// Wait, check, repeat until `is_terminal` accepts a check result.
///
/// `observe` sees every result, the terminal one included. A failing check
/// ends the loop with its error.
pub async fn poll_until<T, F, Fut>(
    handle: &JobHandle,
    options: &PollOptions,
    cancel: &CancellationToken,
    mut check: F,
    is_terminal: impl Fn(&T) -> bool,
    mut observe: impl FnMut(&T),
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    // A deadline past the clock's range never expires.
    let deadline = options
        .deadline
        .and_then(|limit| Instant::now().checked_add(limit).map(|at| (at, limit)));
    let mut wait = 0u32;

    loop {
        let delay = options.cadence.delay(wait);
        wait = wait.saturating_add(1);

        let step = async {
            tokio::time::sleep(delay).await;
            check().await
        };
        let expired = async {
            match deadline {
                Some((at, _)) => tokio::time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        let value = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(job = %handle.id(), kind = %handle.kind(), "Polling cancelled");
                return Err(Error::new(ErrorKind::Cancelled {
                    kind: handle.kind(),
                    id: handle.id().to_string(),
                }));
            }
            _ = expired => {
                return Err(Error::new(ErrorKind::PollTimedOut {
                    kind: handle.kind(),
                    id: handle.id().to_string(),
                    after: deadline.map(|(_, limit)| limit).unwrap_or_default(),
                }));
            }
            value = step => value?,
        };

        observe(&value);
        if is_terminal(&value) {
            debug!(job = %handle.id(), checks = wait, "Job reached a terminal state");
            return Ok(value);
        }
    }
}
