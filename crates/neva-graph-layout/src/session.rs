//! Generation-guarded application of layout results.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use neva_graph_core::Graph;
use tracing::{debug, warn};

use crate::provider::{resolve, LayoutProvider};
use crate::{LayoutError, LayoutResult};

/// Handle for one layout request. Generations grow monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayoutTicket {
    generation: u64,
}

impl LayoutTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Observable state of the layout stage.
#[derive(Debug, Clone)]
pub enum LayoutStatus {
    /// No layout was ever requested.
    Idle,
    /// A request is in flight; `generation` is the newest one issued.
    Pending { generation: u64 },
    /// The snapshot of `generation` is on screen.
    Ready { generation: u64 },
    /// The newest request failed; the previous snapshot is kept.
    Failed {
        generation: u64,
        error: Arc<LayoutError>,
    },
}

impl LayoutStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, LayoutStatus::Pending { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LayoutStatus::Failed { .. })
    }
}

impl fmt::Display for LayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutStatus::Idle => write!(f, "idle"),
            LayoutStatus::Pending { generation } => write!(f, "pending (#{generation})"),
            LayoutStatus::Ready { generation } => write!(f, "ready (#{generation})"),
            LayoutStatus::Failed { generation, error } => {
                write!(f, "failed (#{generation}): {error}")
            }
        }
    }
}

/// What happened to a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// The result replaced the current snapshot.
    Applied,
    /// A newer request had already resolved; the result was discarded.
    Stale,
    /// The request failed; the current snapshot was kept.
    Failed,
}

/// Owns the current positioned snapshot and decides which layout results
/// may replace it.
#[derive(Debug)]
pub struct LayoutSession {
    snapshot: Arc<Graph>,
    status: LayoutStatus,
    issued: u64,
    resolved: u64,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(Graph::empty()),
            status: LayoutStatus::Idle,
            issued: 0,
            resolved: 0,
        }
    }
}

impl LayoutSession {
    /// A session showing an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Arc<Graph> {
        &self.snapshot
    }

    pub fn status(&self) -> &LayoutStatus {
        &self.status
    }

    /// Generation of the newest request that resolved, successfully or not.
    pub fn resolved_generation(&self) -> u64 {
        self.resolved
    }

    /// Register a new request.
    pub fn begin(&mut self) -> LayoutTicket {
        self.issued += 1;
        self.status = LayoutStatus::Pending {
            generation: self.issued,
        };
        debug!(generation = self.issued, "Layout requested");
        LayoutTicket {
            generation: self.issued,
        }
    }

    /// Apply the result of `ticket` unless a newer request already resolved.
    pub fn complete(&mut self, ticket: LayoutTicket, result: LayoutResult<Graph>) -> LayoutOutcome {
        let generation = ticket.generation;
        if generation <= self.resolved {
            debug!(
                generation,
                resolved = self.resolved,
                "Discarding stale layout result"
            );
            return LayoutOutcome::Stale;
        }
        self.resolved = generation;

        match result {
            Ok(graph) => {
                self.snapshot = Arc::new(graph.into_neutral());
                self.status = if self.issued > generation {
                    LayoutStatus::Pending {
                        generation: self.issued,
                    }
                } else {
                    LayoutStatus::Ready { generation }
                };
                LayoutOutcome::Applied
            }
            Err(error) => {
                warn!(generation, %error, "Layout failed; keeping previous snapshot");
                self.status = if self.issued > generation {
                    LayoutStatus::Pending {
                        generation: self.issued,
                    }
                } else {
                    LayoutStatus::Failed {
                        generation,
                        error: Arc::new(error),
                    }
                };
                LayoutOutcome::Failed
            }
        }
    }

    /// Request, await and apply a layout in one step.
    pub async fn run<P>(
        &mut self,
        provider: &P,
        graph: &Graph,
        timeout: Option<Duration>,
    ) -> LayoutOutcome
    where
        P: LayoutProvider + ?Sized,
    {
        let ticket = self.begin();
        let result = resolve(provider, graph, timeout).await;
        self.complete(ticket, result)
    }

    /// Replace the snapshot after highlighting, without touching generations.
    pub fn replace_snapshot(&mut self, snapshot: Arc<Graph>) {
        self.snapshot = snapshot;
    }

    /// Drop the current snapshot (e.g. the entity model changed) and
    /// invalidate every request still in flight.
    pub fn reset(&mut self) {
        self.snapshot = Arc::new(Graph::empty());
        self.resolved = self.issued;
        self.status = LayoutStatus::Idle;
    }
}
