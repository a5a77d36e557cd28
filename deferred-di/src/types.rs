use std::any::{type_name, Any, TypeId};
use std::sync::{Arc, Weak};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Type id and name of a service, used as a registration key and in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }
}

impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Type-erased value produced by an [`crate::InstanceFactory`].
///
/// Remembers the concrete type it was created from so that a failed
/// [`Instance::downcast()`] can report what was actually produced.
#[derive(Clone)]
pub struct Instance {
    info: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T>(value: T) -> Self
    where
        T: 'static + Send + Sync,
    {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T>(value: Arc<T>) -> Self
    where
        T: 'static + Send + Sync,
    {
        Self {
            info: TypeInfo::of::<T>(),
            value,
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        self.info
    }

    /// Narrows the instance to `T`, returning the actual type on mismatch
    pub fn downcast<T>(&self) -> Result<Arc<T>, TypeInfo>
    where
        T: 'static + Send + Sync,
    {
        Arc::downcast::<T>(self.value.clone()).map_err(|_| self.info)
    }

    pub(crate) fn downgrade(&self) -> WeakInstance {
        WeakInstance {
            info: self.info,
            value: Arc::downgrade(&self.value),
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.name).finish()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) struct WeakInstance {
    info: TypeInfo,
    value: Weak<dyn Any + Send + Sync>,
}

impl WeakInstance {
    pub(crate) fn upgrade(&self) -> Option<Instance> {
        self.value.upgrade().map(|value| Instance {
            info: self.info,
            value,
        })
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.value.strong_count() != 0
    }
}
