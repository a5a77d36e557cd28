use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::{GraphIdentifier, InjectionError, Instance};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub type FactoryResult = Result<Option<Instance>, InjectionError>;

/// Asynchronous capability supplied by the container for a wrapped type.
///
/// Given the graph to resolve in (or `None` to resolve outside any captured
/// graph), produces a type-erased instance. `Ok(None)` means that nothing was
/// produced, while `Err` reports a failure of the factory itself.
///
/// The factory may be invoked any number of times, and is not assumed to
/// return the same instance twice - wrappers decide how often it runs.
#[derive(Clone)]
pub struct InstanceFactory {
    f: Arc<dyn Fn(Option<GraphIdentifier>) -> BoxFuture<'static, FactoryResult> + Send + Sync>,
}

impl InstanceFactory {
    pub fn new<Fct, Fut>(f: Fct) -> Self
    where
        Fct: Fn(Option<GraphIdentifier>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FactoryResult> + Send + 'static,
    {
        Self {
            f: Arc::new(move |graph| f(graph).boxed()),
        }
    }

    pub fn call(&self, graph: Option<GraphIdentifier>) -> BoxFuture<'static, FactoryResult> {
        (self.f)(graph)
    }
}

impl std::fmt::Debug for InstanceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceFactory").finish_non_exhaustive()
    }
}
