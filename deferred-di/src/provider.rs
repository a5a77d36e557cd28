use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::wrapper::require_instance;
use crate::*;

/// Resolves a new instance from the catalog every time it is accessed.
///
/// `ProviderAsync<T>` does not need to be registered in the [`Catalog`] - it
/// can be requested as long as there is a registration for `T`.
///
/// Unlike [`LazyAsync`] it does not remember the object graph it was created
/// in: every access is a resolution of its own. Note that the registered
/// [`Scope`] of `T` still controls the lifetime, so a provider of a
/// [`Singleton`] keeps returning the same instance.
pub struct ProviderAsync<S> {
    factory: InstanceFactory,
    _dummy: PhantomData<fn() -> S>,
}

impl<S> ProviderAsync<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(factory: InstanceFactory) -> Self {
        Self {
            factory,
            _dummy: PhantomData,
        }
    }

    /// Invokes the factory and returns a freshly resolved instance
    pub async fn instance(&self) -> Result<Arc<S>, InjectionError> {
        tracing::debug!(
            service = std::any::type_name::<S>(),
            "Resolving provided instance"
        );

        require_instance::<S>(self.factory.call(None).await)
    }
}

impl<S> Clone for ProviderAsync<S> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            _dummy: PhantomData,
        }
    }
}

impl<S> std::fmt::Debug for ProviderAsync<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAsync")
            .field("service", &std::any::type_name::<S>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<S> InstanceWrapper for ProviderAsync<S>
where
    S: Send + Sync + 'static,
{
    type Service = S;

    const KIND: WrapperKind = WrapperKind::Provider;

    async fn wrap(
        _catalog: &Catalog,
        factory: Option<InstanceFactory>,
    ) -> Result<Option<Self>, InjectionError> {
        Ok(factory.map(Self::new))
    }
}
