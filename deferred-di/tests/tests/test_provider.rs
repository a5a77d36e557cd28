use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use deferred_di::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

struct Connection {
    id: usize,
}

fn connection_catalog<Sc: Scope + 'static>(scope: Sc, calls: &Arc<AtomicUsize>) -> Catalog {
    let calls = calls.clone();
    Catalog::builder()
        .add_factory(scope, move |_| {
            let id = calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Connection { id }) }
        })
        .build()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[tokio::test]
async fn test_provider_resolves_on_every_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cat = connection_catalog(Transient::new(), &calls);

    let provider = cat.get::<ProviderAsync<Connection>>().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let mut instances = Vec::new();
    for _ in 0..5 {
        instances.push(provider.instance().await.unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 5);

    let ids: Vec<_> = instances.iter().map(|c| c.id).collect();
    pretty_assertions::assert_eq!(ids, vec![0, 1, 2, 3, 4]);

    for (i, a) in instances.iter().enumerate() {
        for b in &instances[i + 1..] {
            assert!(!Arc::ptr_eq(a, b));
        }
    }
}

#[tokio::test]
async fn test_provider_follows_registered_scope() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cat = connection_catalog(Singleton::new(), &calls);

    let provider = cat.get::<ProviderAsync<Connection>>().await.unwrap();

    let a = provider.instance().await.unwrap();
    let b = provider.instance().await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_provider_starts_new_graph_on_every_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cat = connection_catalog(Graph::new(), &calls);

    let provider = cat.get::<ProviderAsync<Connection>>().await.unwrap();

    let a = provider.instance().await.unwrap();
    let b = provider.instance().await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_passes_no_graph() {
    let cat = Catalog::builder().build();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let factory = {
        let seen = seen.clone();
        InstanceFactory::new(move |graph| {
            seen.lock().unwrap().push(graph);
            async { Ok(Some(Instance::new(1_i32))) }
        })
    };

    let graph = GraphIdentifier::new();
    let provider = cat
        .with_object_graph(graph, async {
            ProviderAsync::<i32>::wrap(&cat, Some(factory)).await
        })
        .await
        .unwrap()
        .unwrap();

    provider.instance().await.unwrap();
    cat.with_object_graph(graph, provider.instance())
        .await
        .unwrap();

    pretty_assertions::assert_eq!(*seen.lock().unwrap(), vec![None, None]);
}

#[tokio::test]
async fn test_provider_unregistered() {
    let cat = Catalog::builder().build();

    let res = cat.get::<ProviderAsync<Connection>>().await;
    assert!(
        matches!(&res, Err(InjectionError::Unregistered(e)) if e.type_info == TypeInfo::of::<Connection>())
    );

    let wrapper = ProviderAsync::<Connection>::wrap(&cat, None).await.unwrap();
    assert!(wrapper.is_none());
    assert_eq!(ProviderAsync::<Connection>::KIND, WrapperKind::Provider);
}

#[tokio::test]
async fn test_provider_type_mismatch_on_every_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let cat = Catalog::builder()
        .add_erased::<i32, _, _, _>(Transient::new(), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(Some(Instance::new(1_u64))) }
        })
        .build();

    let provider = cat.get::<ProviderAsync<i32>>().await.unwrap();

    for _ in 0..2 {
        let res = provider.instance().await;
        assert!(
            matches!(
                &res,
                Err(InjectionError::TypeMismatch(e)) if e.actual == TypeInfo::of::<u64>()
            ),
            "{res:?}"
        );
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_provider_failure_does_not_affect_next_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let cat = Catalog::builder()
        .add_factory(Transient::new(), move |_| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt % 2 == 0 {
                    Err(InjectionError::factory_failed::<usize>("flaky"))
                } else {
                    Ok(attempt)
                }
            }
        })
        .build();

    let provider = cat.get::<ProviderAsync<usize>>().await.unwrap();

    assert!(matches!(
        provider.instance().await,
        Err(InjectionError::FactoryFailed(_))
    ));
    assert_eq!(*provider.instance().await.unwrap(), 1);
    assert!(matches!(
        provider.instance().await,
        Err(InjectionError::FactoryFailed(_))
    ));
    assert_eq!(*provider.instance().await.unwrap(), 3);
}

#[tokio::test]
async fn test_provider_missing_instance() {
    let cat = Catalog::builder()
        .add_erased::<i32, _, _, _>(Transient::new(), |_| async { Ok(None) })
        .build();

    let provider = cat.get::<ProviderAsync<i32>>().await.unwrap();
    assert!(matches!(
        provider.instance().await,
        Err(InjectionError::MissingInstance(_))
    ));
}

#[tokio::test]
async fn test_provider_after_catalog_dropped() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cat = connection_catalog(Transient::new(), &calls);

    let provider = cat.get::<ProviderAsync<Connection>>().await.unwrap();
    drop(cat);

    assert!(matches!(
        provider.instance().await,
        Err(InjectionError::CatalogDropped)
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
