use std::sync::Arc;

use thiserror::Error;

use crate::TypeInfo;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone)]
pub enum InjectionError {
    #[error(transparent)]
    Unregistered(UnregisteredTypeError),
    #[error(transparent)]
    TypeMismatch(TypeMismatchError),
    #[error(transparent)]
    MissingInstance(MissingInstanceError),
    #[error(transparent)]
    FactoryFailed(FactoryError),
    #[error("Catalog was already dropped")]
    CatalogDropped,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl InjectionError {
    pub fn unregistered<Iface: 'static + ?Sized>() -> Self {
        Self::Unregistered(UnregisteredTypeError {
            type_info: TypeInfo::of::<Iface>(),
        })
    }

    pub fn type_mismatch<Iface: 'static + ?Sized>(actual: TypeInfo) -> Self {
        Self::TypeMismatch(TypeMismatchError {
            expected: TypeInfo::of::<Iface>(),
            actual,
        })
    }

    pub fn missing_instance<Iface: 'static + ?Sized>() -> Self {
        Self::MissingInstance(MissingInstanceError {
            type_info: TypeInfo::of::<Iface>(),
        })
    }

    pub fn factory_failed<Iface: 'static + ?Sized>(
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FactoryFailed(FactoryError {
            type_info: TypeInfo::of::<Iface>(),
            source: Arc::from(source.into()),
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unregistered type: {type_info}")]
pub struct UnregisteredTypeError {
    pub type_info: TypeInfo,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Type mismatch: expected {expected} but factory produced {actual}")]
pub struct TypeMismatchError {
    pub expected: TypeInfo,
    pub actual: TypeInfo,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Factory of a registered type did not produce an instance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No instance produced for type: {type_info}")]
pub struct MissingInstanceError {
    pub type_info: TypeInfo,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone)]
#[error("Factory for {type_info} failed: {source}")]
pub struct FactoryError {
    pub type_info: TypeInfo,
    pub source: Arc<dyn std::error::Error + Send + Sync>,
}
