use std::any::TypeId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::FutureExt;

use crate::catalog::{CatalogImpl, Registration};
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct CatalogBuilder {
    registrations: HashMap<TypeId, Registration>,
    mismatch_policy: MismatchPolicy,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
            mismatch_policy: MismatchPolicy::default(),
        }
    }

    /// Registers an asynchronous factory for type `S`.
    ///
    /// The factory receives the catalog to resolve its own dependencies with,
    /// and the `scope` decides whether produced instances are reused.
    pub fn add_factory<S, Sc, Fct, Fut>(&mut self, scope: Sc, factory: Fct) -> &mut Self
    where
        S: Send + Sync + 'static,
        Sc: Scope + 'static,
        Fct: Fn(Catalog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, InjectionError>> + Send + 'static,
    {
        self.add_erased::<S, _, _, _>(scope, move |cat| {
            let fut = factory(cat);
            async move {
                let value = fut.await?;
                Ok::<_, InjectionError>(Some(Instance::new(value)))
            }
        })
    }

    /// Registers an existing value, every resolution returns the same instance
    pub fn add_value<S>(&mut self, value: S) -> &mut Self
    where
        S: Send + Sync + 'static,
    {
        let inst = Instance::new(value);
        self.add_erased::<S, _, _, _>(Singleton::new(), move |_| {
            let inst = inst.clone();
            async move { Ok(Some(inst)) }
        })
    }

    /// Registers a type-erased producer for type `S`.
    ///
    /// Nothing checks that the produced instances are actually of type `S` -
    /// this is left to the wrappers narrowing them.
    ///
    /// ### Panics
    ///
    /// Will panic if a factory for `S` is already registered.
    pub fn add_erased<S, Sc, Fct, Fut>(&mut self, scope: Sc, factory: Fct) -> &mut Self
    where
        S: 'static + ?Sized,
        Sc: Scope + 'static,
        Fct: Fn(Catalog) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FactoryResult> + Send + 'static,
    {
        let type_info = TypeInfo::of::<S>();
        assert!(
            !self.registrations.contains_key(&type_info.id),
            "Factory for type {} is already registered",
            type_info.name
        );

        self.registrations.insert(
            type_info.id,
            Registration {
                type_info,
                scope: Box::new(scope),
                build: Arc::new(move |cat| factory(cat).boxed()),
            },
        );

        self
    }

    pub fn with_mismatch_policy(&mut self, policy: MismatchPolicy) -> &mut Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn build(&mut self) -> Catalog {
        let registrations = std::mem::take(&mut self.registrations);

        tracing::debug!(
            registrations = registrations.len(),
            mismatch_policy = ?self.mismatch_policy,
            "Building catalog"
        );

        Catalog::new(Arc::new(CatalogImpl {
            registrations,
            mismatch_policy: self.mismatch_policy,
        }))
    }
}
