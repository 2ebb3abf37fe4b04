use bson::doc;
use docgate_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::QueryError,
    orchestrator::QueryOrchestrator,
    page::StoreLimitPolicy,
    params::RawParams,
};
use docgate_memory::InMemoryStore;

async fn people() -> InMemoryStore {
    let store = InMemoryStore::builder().build().await.unwrap();
    for (id, fields) in [
        ("a", doc! { "age": 30, "name": "X" }),
        ("b", doc! { "age": 25, "name": "Y" }),
        ("c", doc! { "age": 20, "name": "Z" }),
        ("d", doc! { "age": 15, "name": "W" }),
    ] {
        store.insert_document(id, fields, "people").await.unwrap();
    }
    store
}

fn params(pairs: &[(&str, &str)]) -> RawParams {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn filters_sorts_pages_and_projects() {
    let store = people().await;
    let query = params(&[
        ("age_gte", "18"),
        ("order_by", "-age"),
        ("limit", "2"),
        ("offset", "1"),
        ("fields", "name"),
    ]);

    let page = QueryOrchestrator::default().run(&store, "people", &query).await.unwrap();

    assert_eq!(page.data, vec![doc! { "name": "Y", "id": "b" }, doc! { "name": "Z", "id": "c" }]);
    assert_eq!((page.limit, page.offset, page.count), (2, 1, 2));
}

#[tokio::test]
async fn limit_only_policy_truncates_before_the_offset() {
    let store = people().await;
    let query = params(&[("age_gte", "18"), ("order_by", "-age"), ("limit", "2"), ("offset", "1")]);

    let page = QueryOrchestrator::new(StoreLimitPolicy::LimitOnly)
        .run(&store, "people", &query)
        .await
        .unwrap();

    assert_eq!(page.data, vec![doc! { "age": 25, "name": "Y", "id": "b" }]);
    assert_eq!(page.count, 1);
}

#[tokio::test]
async fn in_filters_coerce_each_value() {
    let store = people().await;
    let query = params(&[("age_in", "15,30,x"), ("fields", "name")]);

    let page = QueryOrchestrator::default().run(&store, "people", &query).await.unwrap();

    assert_eq!(page.data, vec![doc! { "name": "X", "id": "a" }, doc! { "name": "W", "id": "d" }]);
}

#[tokio::test]
async fn store_limits_surface_as_invalid_filters() {
    let store = people().await;
    let query = params(&[("age_gt", "1"), ("name_lt", "Z")]);

    let err = QueryOrchestrator::default().run(&store, "people", &query).await.unwrap_err();

    assert!(matches!(err, QueryError::InvalidFilter { .. }));
    assert_eq!(err.status_code().as_u16(), 400);
}

#[tokio::test]
async fn sorting_a_field_of_mixed_kinds_orders_numbers_before_strings() {
    let store = InMemoryStore::new();
    let mut seed: u64 = 1;
    for i in 0..400 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let value = (seed >> 40) % 1000;
        let fields = if seed >> 63 == 0 {
            doc! { "v": value as i64 }
        } else {
            doc! { "v": format!("s{value:03}") }
        };
        store.insert_document(&format!("d{i:03}"), fields, "mixed").await.unwrap();
    }

    let query = params(&[("order_by", "v"), ("limit", "1000")]);
    let page = QueryOrchestrator::default().run(&store, "mixed", &query).await.unwrap();
    assert_eq!(page.count, 400);

    let numbers: Vec<i64> = page.data.iter().filter_map(|doc| doc.get_i64("v").ok()).collect();
    let strings: Vec<&str> = page.data.iter().filter_map(|doc| doc.get_str("v").ok()).collect();
    assert!(!numbers.is_empty() && !strings.is_empty());
    assert!(numbers.is_sorted());
    assert!(strings.is_sorted());
    assert!(page.data[..numbers.len()].iter().all(|doc| doc.get_i64("v").is_ok()));
}
