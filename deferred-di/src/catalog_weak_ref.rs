use std::sync::{Arc, Weak};

use crate::catalog::CatalogImpl;
use crate::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// A weak reference to the `Catalog` held by wrappers and factories.
///
/// It never keeps the catalog alive, so a component cached inside a catalog may
/// hold wrappers produced by that same catalog without creating a reference
/// cycle. Once the catalog is dropped the reference reads as absent.
#[derive(Clone)]
pub struct CatalogWeakRef(Weak<CatalogImpl>);

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl CatalogWeakRef {
    pub(crate) fn new(pimpl: &Arc<CatalogImpl>) -> Self {
        Self(Arc::downgrade(pimpl))
    }

    pub fn upgrade(&self) -> Option<Catalog> {
        self.0.upgrade().map(Catalog::new)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() != 0
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Debug for CatalogWeakRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(p) = self.0.upgrade() {
            write!(f, "CatalogWeakRef(0x{:x})", Arc::as_ptr(&p) as usize)
        } else {
            write!(f, "CatalogWeakRef(<dropped>)")
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
