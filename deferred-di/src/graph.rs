use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque token naming one resolution episode ("object graph").
///
/// All instances resolved while serving a single top-level request share the
/// same graph, which lets graph-scoped components be reused between the
/// dependencies of that request. Wrappers treat it purely as a cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphIdentifier(u64);

impl GraphIdentifier {
    /// Mints an identifier that was never handed out before in this process
    pub fn new() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for GraphIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "graph#{}", self.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

tokio::task_local! {
    static CURRENT_GRAPH: GraphIdentifier;
}

/// Graph of the resolution episode the current task is running in
pub(crate) fn current() -> Option<GraphIdentifier> {
    CURRENT_GRAPH.try_with(|g| *g).ok()
}

/// Runs the future with `graph` as the current object graph. Scopes nest: the
/// outer graph is restored once the future completes.
pub(crate) async fn enter<F>(graph: GraphIdentifier, f: F) -> F::Output
where
    F: Future,
{
    if current() == Some(graph) {
        f.await
    } else {
        CURRENT_GRAPH.scope(graph, f).await
    }
}

/// Runs the future in the current object graph, starting a new one if the task
/// is not resolving anything yet.
pub(crate) async fn enter_current_or_new<F>(f: F) -> F::Output
where
    F: Future,
{
    match current() {
        Some(_) => f.await,
        None => CURRENT_GRAPH.scope(GraphIdentifier::new(), f).await,
    }
}
