use std::sync::Arc;

use async_trait::async_trait;

use crate::{Catalog, FactoryResult, InjectionError, InstanceFactory, TypeInfo};

/////////////////////////////////////////////////////////////////////////////////////////
// WrapperKind
/////////////////////////////////////////////////////////////////////////////////////////

/// The fixed set of deferred-resolution wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// Resolves once on first access, see [`crate::LazyAsync`]
    Lazy,
    /// Resolves on every access, see [`crate::ProviderAsync`]
    Provider,
    /// Resolves once during construction, see [`crate::OptionalAsync`]
    Optional,
}

/////////////////////////////////////////////////////////////////////////////////////////
// InstanceWrapper
/////////////////////////////////////////////////////////////////////////////////////////

/// Contract shared by all wrappers that let a consumer request a service
/// without the wrapper type itself being registered in the [`Catalog`].
///
/// The catalog supplies a factory for [`Self::wrapped_type()`] and the wrapper
/// decides when and how many times it runs.
#[async_trait]
pub trait InstanceWrapper: Sized + Send + Sync + 'static {
    type Service: Send + Sync + 'static;

    const KIND: WrapperKind;

    /// Type whose registration the wrapper decorates
    fn wrapped_type() -> TypeInfo {
        TypeInfo::of::<Self::Service>()
    }

    /// Creates the wrapper.
    ///
    /// Returns `Ok(None)` when `factory` is absent, meaning that the wrapped
    /// type has no registration. Only wrappers that resolve eagerly can fail.
    async fn wrap(
        catalog: &Catalog,
        factory: Option<InstanceFactory>,
    ) -> Result<Option<Self>, InjectionError>;
}

/////////////////////////////////////////////////////////////////////////////////////////

/// Narrows a factory result for wrappers that must yield a value
pub(crate) fn require_instance<S>(res: FactoryResult) -> Result<Arc<S>, InjectionError>
where
    S: Send + Sync + 'static,
{
    match res? {
        Some(inst) => inst
            .downcast::<S>()
            .map_err(InjectionError::type_mismatch::<S>),
        None => Err(InjectionError::missing_instance::<S>()),
    }
}
