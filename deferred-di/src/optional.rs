use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;

use crate::*;

/// Dependency that may be absent.
///
/// The factory is invoked exactly once, while the wrapper is being created, and
/// the outcome stays fixed for the wrapper's lifetime. A type without
/// registration, or a factory that produces nothing, results in an empty
/// wrapper rather than an error.
///
/// What happens when the factory produces a value of a different type is
/// controlled by the catalog's [`MismatchPolicy`].
///
/// ### Examples
///
/// ```
/// use deferred_di::*;
/// use tokio::runtime::Runtime;
///
/// Runtime::new().unwrap().block_on(async {
///     let cat = Catalog::builder().add_value(42_i32).build();
///
///     let present = cat.get::<OptionalAsync<i32>>().await.unwrap();
///     assert_eq!(present.instance().as_deref(), Some(&42));
///
///     let absent = cat.get::<OptionalAsync<String>>().await.unwrap();
///     assert!(absent.is_none());
/// })
/// ```
pub struct OptionalAsync<S> {
    value: Option<Arc<S>>,
}

impl<S> OptionalAsync<S>
where
    S: Send + Sync + 'static,
{
    /// Resolves the value right away
    pub async fn new(
        catalog: &Catalog,
        factory: Option<InstanceFactory>,
    ) -> Result<Self, InjectionError> {
        let Some(factory) = factory else {
            return Ok(Self::none());
        };

        tracing::debug!(
            service = std::any::type_name::<S>(),
            "Resolving optional instance"
        );

        let inst = match factory.call(None).await {
            Ok(Some(inst)) => inst,
            Ok(None) | Err(InjectionError::Unregistered(_)) => return Ok(Self::none()),
            Err(err) => return Err(err),
        };

        match inst.downcast::<S>() {
            Ok(value) => Ok(Self { value: Some(value) }),
            Err(actual) => match catalog.mismatch_policy() {
                MismatchPolicy::Absent => {
                    tracing::warn!(
                        service = std::any::type_name::<S>(),
                        actual = actual.name,
                        "Optional instance has unexpected type, treating as absent"
                    );
                    Ok(Self::none())
                }
                MismatchPolicy::Fail => Err(InjectionError::type_mismatch::<S>(actual)),
            },
        }
    }

    pub fn none() -> Self {
        Self { value: None }
    }

    pub fn instance(&self) -> Option<Arc<S>> {
        self.value.clone()
    }

    pub fn get(&self) -> Option<&Arc<S>> {
        self.value.as_ref()
    }

    pub fn into_inner(self) -> Option<Arc<S>> {
        self.value
    }
}

impl<S> Deref for OptionalAsync<S> {
    type Target = Option<Arc<S>>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<S> From<OptionalAsync<S>> for Option<Arc<S>> {
    fn from(value: OptionalAsync<S>) -> Self {
        value.value
    }
}

impl<S> Clone for OptionalAsync<S> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for OptionalAsync<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OptionalAsync").field(&self.value).finish()
    }
}

#[async_trait]
impl<S> InstanceWrapper for OptionalAsync<S>
where
    S: Send + Sync + 'static,
{
    type Service = S;

    const KIND: WrapperKind = WrapperKind::Optional;

    async fn wrap(
        catalog: &Catalog,
        factory: Option<InstanceFactory>,
    ) -> Result<Option<Self>, InjectionError> {
        Ok(Some(Self::new(catalog, factory).await?))
    }
}
