use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::OnceCell;

use crate::types::WeakInstance;
use crate::{FactoryResult, GraphIdentifier, InjectionError, Instance};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Produces a new instance for a scope that has nothing cached
pub type BuildInstance<'a> = dyn Fn() -> BoxFuture<'a, FactoryResult> + Send + Sync + 'a;

/// Controls the lifetime of an instance created by a registered factory.
///
/// Every resolution happens within some object graph, which scopes may use to
/// decide whether a cached instance can be reused. Scopes that cache must let
/// concurrent resolutions wait for a single `build` instead of racing it.
#[async_trait]
pub trait Scope: Send + Sync {
    async fn get_or_build<'a>(
        &self,
        graph: GraphIdentifier,
        build: &BuildInstance<'a>,
    ) -> FactoryResult;
}

/// `Err(None)` leaves a cache slot empty without failing the resolution
fn into_cached(res: FactoryResult) -> Result<Instance, Option<InjectionError>> {
    res.map_err(Some)?.ok_or(None)
}

fn from_cached(res: Result<Instance, Option<InjectionError>>) -> FactoryResult {
    match res {
        Ok(inst) => Ok(Some(inst)),
        Err(None) => Ok(None),
        Err(Some(err)) => Err(err),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Transient
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Never caches so that every dependency resolution will result in a new
/// instance.
pub struct Transient;

impl Default for Transient {
    fn default() -> Self {
        Self::new()
    }
}

impl Transient {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl Scope for Transient {
    async fn get_or_build<'a>(
        &self,
        _graph: GraphIdentifier,
        build: &BuildInstance<'a>,
    ) -> FactoryResult {
        build().await
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Singleton
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Caches an instance upon first creation for the entire duration of the
/// program.
pub struct Singleton {
    instance: OnceCell<Instance>,
}

impl Default for Singleton {
    fn default() -> Self {
        Self::new()
    }
}

impl Singleton {
    pub fn new() -> Self {
        Self {
            instance: OnceCell::new(),
        }
    }
}

#[async_trait]
impl Scope for Singleton {
    async fn get_or_build<'a>(
        &self,
        _graph: GraphIdentifier,
        build: &BuildInstance<'a>,
    ) -> FactoryResult {
        let res = self
            .instance
            .get_or_try_init(move || async move { into_cached(build().await) })
            .await;

        from_cached(res.cloned())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Graph
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Shares one instance between all resolutions of the same object graph.
///
/// Instances are held weakly: once a graph's components are dropped, its
/// instance is released and the slot is pruned.
pub struct Graph {
    slots: Mutex<HashMap<GraphIdentifier, Arc<OnceCell<WeakInstance>>>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, graph: GraphIdentifier) -> Arc<OnceCell<WeakInstance>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        // Drop released instances and empty slots nobody is waiting on
        slots.retain(|_, s| match s.get() {
            Some(weak) => weak.is_alive(),
            None => Arc::strong_count(s) > 1,
        });
        slots.entry(graph).or_default().clone()
    }
}

#[async_trait]
impl Scope for Graph {
    async fn get_or_build<'a>(
        &self,
        graph: GraphIdentifier,
        build: &BuildInstance<'a>,
    ) -> FactoryResult {
        loop {
            let slot = self.slot(graph);
            let mut built = None;
            let built_ref = &mut built;

            let res = slot
                .get_or_try_init(move || async move {
                    let inst = into_cached(build().await)?;
                    let weak = inst.downgrade();
                    *built_ref = Some(inst);
                    Ok::<_, Option<InjectionError>>(weak)
                })
                .await;

            let weak = match res {
                Ok(weak) => weak,
                Err(err) => return from_cached(Err(err)),
            };

            if let Some(inst) = built.or_else(|| weak.upgrade()) {
                return Ok(Some(inst));
            }

            // Released by its last user right after it was cached
            tracing::trace!(%graph, "Graph-scoped instance was released, building again");
        }
    }
}
