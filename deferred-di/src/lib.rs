//! Deferred dependency resolution for asynchronous code.
//!
//! A consumer often needs something other than "give me the instance right
//! now": resolve it only when it is first used, get a fresh one every time, or
//! accept that it may not exist at all. The wrappers in this crate express those
//! needs without requiring the wrapper types themselves to be registered - the
//! [`Catalog`] only knows how to build the wrapped type.
//!
//! | Wrapper              | Factory runs                         |
//! |----------------------|--------------------------------------|
//! | [`LazyAsync<T>`]     | at most once, on first access        |
//! | [`ProviderAsync<T>`] | on every access                      |
//! | [`OptionalAsync<T>`] | once, while the wrapper is created   |
//!
//! # Examples
//!
//! ## Deferring an expensive dependency
//!
//! ```
//! use deferred_di::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tokio::runtime::Runtime;
//!
//! Runtime::new().unwrap().block_on(async {
//!     let calls = Arc::new(AtomicUsize::new(0));
//!     let counter = calls.clone();
//!
//!     let cat = Catalog::builder()
//!         .add_factory(Transient::new(), move |_| {
//!             counter.fetch_add(1, Ordering::SeqCst);
//!             async { Ok(42_i32) }
//!         })
//!         .build();
//!
//!     let lazy = cat.get::<LazyAsync<i32>>().await.unwrap();
//!     assert_eq!(calls.load(Ordering::SeqCst), 0);
//!
//!     assert_eq!(*lazy.instance().await.unwrap(), 42);
//!     assert_eq!(*lazy.instance().await.unwrap(), 42);
//!     assert_eq!(calls.load(Ordering::SeqCst), 1);
//! })
//! ```
//!
//! ## Resolving a new instance on every access
//!
//! ```
//! use deferred_di::*;
//! use std::sync::Arc;
//! use tokio::runtime::Runtime;
//!
//! struct Connection;
//!
//! Runtime::new().unwrap().block_on(async {
//!     let cat = Catalog::builder()
//!         .add_factory(Transient::new(), |_| async { Ok(Connection) })
//!         .build();
//!
//!     let connections = cat.get::<ProviderAsync<Connection>>().await.unwrap();
//!     let a = connections.instance().await.unwrap();
//!     let b = connections.instance().await.unwrap();
//!     assert!(!Arc::ptr_eq(&a, &b));
//! })
//! ```
//!
//! ## Object graphs
//!
//! Every top-level resolution is an "object graph". Components registered in the
//! [`Graph`] scope are shared between all dependencies resolved within one
//! graph. A [`LazyAsync`] remembers the graph it was created in and resolves its
//! value there later, so it receives the same graph-scoped instances as its
//! siblings did.
//!
//! ```
//! use deferred_di::*;
//! use std::sync::Arc;
//! use tokio::runtime::Runtime;
//!
//! struct Session;
//!
//! struct Handler {
//!     session: Arc<Session>,
//!     audit: LazyAsync<Session>,
//! }
//!
//! Runtime::new().unwrap().block_on(async {
//!     let cat = Catalog::builder()
//!         .add_factory(Graph::new(), |_| async { Ok(Session) })
//!         .add_factory(Transient::new(), |cat: Catalog| async move {
//!             Ok::<_, InjectionError>(Handler {
//!                 session: cat.get_one::<Session>().await?,
//!                 audit: cat.get::<LazyAsync<Session>>().await?,
//!             })
//!         })
//!         .build();
//!
//!     let handler = cat.get_one::<Handler>().await.unwrap();
//!     let later = handler.audit.instance().await.unwrap();
//!     assert!(Arc::ptr_eq(&handler.session, &later));
//! })
//! ```

mod catalog;
pub use catalog::*;

mod catalog_builder;
pub use catalog_builder::*;

mod catalog_weak_ref;
pub use catalog_weak_ref::*;

mod errors;
pub use errors::*;

mod factory;
pub use factory::*;

mod graph;
pub use graph::*;

mod lazy;
pub use lazy::*;

mod optional;
pub use optional::*;

mod options;
pub use options::*;

mod provider;
pub use provider::*;

mod scopes;
pub use scopes::*;

mod types;
pub use types::*;

mod wrapper;
pub use wrapper::*;
