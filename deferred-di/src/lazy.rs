use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::wrapper::require_instance;
use crate::*;

/// Represents a value whose construction is delayed upon request rather than
/// resolved from the catalog immediately. This is often useful in cases when
/// some expensive type is used rarely, thus it's beneficial to only construct
/// it on-demand.
///
/// `LazyAsync<T>` does not need to be registered in the [`Catalog`] - it can be
/// requested as long as there is a registration for `T`.
///
/// The first call to [`Self::instance()`] invokes the factory, all other calls
/// return the same instance. The factory runs in the object graph that was
/// current when the wrapper was created, so graph-scoped dependencies resolve
/// to the instances shared by the rest of that graph, no matter when or where
/// the value is finally requested.
///
/// Concurrent callers that arrive while the instance is being resolved wait for
/// that single resolution instead of starting their own. A failed or cancelled
/// resolution is not remembered and the next call will try again.
///
/// Clones share the cached instance.
///
/// ### Examples
///
/// ```
/// use deferred_di::*;
/// use tokio::runtime::Runtime;
///
/// Runtime::new().unwrap().block_on(async {
///     let cat = Catalog::builder()
///         .add_factory(Transient::new(), |_| async { Ok(String::from("expensive")) })
///         .build();
///
///     let lazy = cat.get::<LazyAsync<String>>().await.unwrap();
///     assert!(!lazy.is_resolved());
///
///     // Value is created on-demand during this call
///     let a = lazy.instance().await.unwrap();
///     let b = lazy.instance().await.unwrap();
///     assert_eq!(a.as_str(), "expensive");
///     assert!(std::sync::Arc::ptr_eq(&a, &b));
/// })
/// ```
pub struct LazyAsync<S> {
    inner: Arc<LazyInner<S>>,
}

struct LazyInner<S> {
    factory: InstanceFactory,
    graph: Option<GraphIdentifier>,
    catalog: CatalogWeakRef,
    instance: OnceCell<Arc<S>>,
}

impl<S> LazyAsync<S>
where
    S: Send + Sync + 'static,
{
    /// Captures the factory together with the catalog's current object graph
    pub fn new(catalog: &Catalog, factory: InstanceFactory) -> Self {
        Self {
            inner: Arc::new(LazyInner {
                factory,
                graph: catalog.current_object_graph(),
                catalog: catalog.weak_ref(),
                instance: OnceCell::new(),
            }),
        }
    }

    /// Returns the wrapped instance, resolving it on first access
    pub async fn instance(&self) -> Result<Arc<S>, InjectionError> {
        let inst = self
            .inner
            .instance
            .get_or_try_init(|| self.make_instance())
            .await?;

        Ok(inst.clone())
    }

    /// Returns the instance only if it was already resolved
    pub fn get(&self) -> Option<Arc<S>> {
        self.inner.instance.get().cloned()
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.instance.initialized()
    }

    /// Object graph captured when the wrapper was created
    pub fn graph_identifier(&self) -> Option<GraphIdentifier> {
        self.inner.graph
    }

    /// Catalog that created the wrapper, if it's still alive
    pub fn catalog(&self) -> Option<Catalog> {
        self.inner.catalog.upgrade()
    }

    async fn make_instance(&self) -> Result<Arc<S>, InjectionError> {
        tracing::debug!(
            service = std::any::type_name::<S>(),
            graph = ?self.inner.graph,
            "Resolving lazy instance"
        );

        let res = require_instance::<S>(self.inner.factory.call(self.inner.graph).await);

        if let Err(err) = &res {
            tracing::debug!(
                service = std::any::type_name::<S>(),
                error = %err,
                "Lazy instance resolution failed, will retry on next access"
            );
        }

        res
    }
}

impl<S> Clone for LazyAsync<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> std::fmt::Debug for LazyAsync<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyAsync")
            .field("service", &std::any::type_name::<S>())
            .field("graph", &self.inner.graph)
            .field("resolved", &self.inner.instance.initialized())
            .field("catalog", &self.inner.catalog)
            .finish()
    }
}

#[async_trait]
impl<S> InstanceWrapper for LazyAsync<S>
where
    S: Send + Sync + 'static,
{
    type Service = S;

    const KIND: WrapperKind = WrapperKind::Lazy;

    async fn wrap(
        catalog: &Catalog,
        factory: Option<InstanceFactory>,
    ) -> Result<Option<Self>, InjectionError> {
        Ok(factory.map(|f| Self::new(catalog, f)))
    }
}
