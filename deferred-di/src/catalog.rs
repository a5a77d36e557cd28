use std::any::TypeId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) type BuildFn = Arc<dyn Fn(Catalog) -> BoxFuture<'static, FactoryResult> + Send + Sync>;

pub(crate) struct Registration {
    pub(crate) type_info: TypeInfo,
    pub(crate) scope: Box<dyn Scope>,
    pub(crate) build: BuildFn,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Registration table that supplies factories to the instance wrappers.
///
/// Cloning is cheap and all clones refer to the same registrations and cached
/// instances.
#[derive(Clone)]
pub struct Catalog(pub(crate) Arc<CatalogImpl>);

pub(crate) struct CatalogImpl {
    pub(crate) registrations: HashMap<TypeId, Registration>,
    pub(crate) mismatch_policy: MismatchPolicy,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub(crate) fn new(pimpl: Arc<CatalogImpl>) -> Self {
        Self(pimpl)
    }

    pub fn weak_ref(&self) -> CatalogWeakRef {
        CatalogWeakRef::new(&self.0)
    }

    /// Returns `true` if both handles point to the same catalog
    pub fn ptr_eq(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn mismatch_policy(&self) -> MismatchPolicy {
        self.0.mismatch_policy
    }

    pub fn is_registered<Iface: 'static + ?Sized>(&self) -> bool {
        self.0.registrations.contains_key(&TypeId::of::<Iface>())
    }

    pub fn registered_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.0.registrations.values().map(|r| r.type_info)
    }

    /// Object graph of the resolution currently running in this task.
    ///
    /// Returns `None` when called outside of any resolution or
    /// [`Self::with_object_graph()`] block.
    pub fn current_object_graph(&self) -> Option<GraphIdentifier> {
        graph::current()
    }

    /// Runs the future with `graph` as the current object graph.
    ///
    /// Graphs can be nested - at the end of the inner block the graph from an
    /// outer block will be restored as "current".
    ///
    /// ### Examples
    ///
    /// ```
    /// use deferred_di::*;
    /// use tokio::runtime::Runtime;
    ///
    /// Runtime::new().unwrap().block_on(async {
    ///     let cat = Catalog::builder().build();
    ///     let graph = GraphIdentifier::new();
    ///
    ///     assert_eq!(cat.current_object_graph(), None);
    ///     cat.with_object_graph(graph, async {
    ///         assert_eq!(cat.current_object_graph(), Some(graph));
    ///     }).await;
    /// })
    /// ```
    pub async fn with_object_graph<F>(&self, graph: GraphIdentifier, f: F) -> F::Output
    where
        F: Future,
    {
        graph::enter(graph, f).await
    }

    /// Returns a factory for the registered type or `None` if the type is not
    /// registered.
    ///
    /// The factory only keeps a weak reference to the catalog and fails with
    /// [`InjectionError::CatalogDropped`] once the catalog is gone.
    pub fn instance_factory(&self, type_info: TypeInfo) -> Option<InstanceFactory> {
        if !self.0.registrations.contains_key(&type_info.id) {
            return None;
        }

        let catalog = self.weak_ref();
        Some(InstanceFactory::new(move |graph| {
            let catalog = catalog.clone();
            async move {
                let catalog = catalog.upgrade().ok_or(InjectionError::CatalogDropped)?;
                catalog.resolve(type_info, graph).await
            }
        }))
    }

    /// Creates an instance wrapper for the wrapped type's registration.
    ///
    /// When called outside of a resolution a new object graph is started, so
    /// [`LazyAsync`] wrappers obtained this way get a graph of their own.
    pub async fn get<W>(&self) -> Result<W, InjectionError>
    where
        W: InstanceWrapper,
    {
        let type_info = W::wrapped_type();
        let factory = self.instance_factory(type_info);

        let wrapper = graph::enter_current_or_new(async move {
            tracing::debug!(
                kind = ?W::KIND,
                service = type_info.name,
                registered = factory.is_some(),
                graph = ?graph::current(),
                "Creating instance wrapper"
            );
            W::wrap(self, factory).await
        })
        .await?;

        wrapper.ok_or(InjectionError::Unregistered(UnregisteredTypeError {
            type_info,
        }))
    }

    /// Resolves an instance of the registered type directly
    pub async fn get_one<S>(&self) -> Result<Arc<S>, InjectionError>
    where
        S: Send + Sync + 'static,
    {
        match self.resolve(TypeInfo::of::<S>(), None).await? {
            Some(inst) => inst
                .downcast::<S>()
                .map_err(InjectionError::type_mismatch::<S>),
            None if self.is_registered::<S>() => Err(InjectionError::missing_instance::<S>()),
            None => Err(InjectionError::unregistered::<S>()),
        }
    }

    /// Resolves in the specified graph, falling back to the current graph of
    /// the task, or a new one. Caching is left to the registration's scope.
    pub(crate) async fn resolve(
        &self,
        type_info: TypeInfo,
        graph: Option<GraphIdentifier>,
    ) -> FactoryResult {
        let Some(reg) = self.0.registrations.get(&type_info.id) else {
            return Ok(None);
        };

        let graph = graph
            .or_else(graph::current)
            .unwrap_or_else(GraphIdentifier::new);

        let build = move || {
            let catalog = self.clone();
            tracing::debug!(service = type_info.name, %graph, "Building instance");
            graph::enter(graph, async move { (reg.build)(catalog).await }).boxed()
        };

        reg.scope.get_or_build(graph, &build).await
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.registered_types().map(|t| t.name).collect();
        types.sort_unstable();

        f.debug_struct("Catalog")
            .field("registrations", &types)
            .field("mismatch_policy", &self.0.mismatch_policy)
            .finish()
    }
}
