//! Integration tests for the shopping cart over the in-process store.
//!
//! Run with: cargo test -p quickcart-integration-tests --test cart_flow

use std::collections::BTreeMap;

use quickcart::Error;
use quickcart::services::CartService;
use quickcart_core::CartSummary;
use quickcart_integration_tests::{memory_state, seed_sample, sku, user};

// ============================================================================
// Sample Scenario
// ============================================================================

#[tokio::test]
async fn test_sample_scenario_totals() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");

    cart.add_item(&parker, &sku("sku123"), 2)
        .await
        .expect("add AirPods");
    cart.add_item(&parker, &sku("sku456"), 1)
        .await
        .expect("add keyboard");

    let summary = cart.view_cart(&parker).await.expect("view cart");
    assert_eq!(summary.total().expect("total").to_string(), "$489.97");

    let lines = summary.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "AirPods");
    assert_eq!(lines[0].quantity.get(), 2);
    assert_eq!(lines[0].line_total.to_string(), "$399.98");
    assert_eq!(lines[1].name, "Mechanical Keyboard");
    assert_eq!(lines[1].line_total.to_string(), "$89.99");

    let remaining = cart
        .remove_item(&parker, &sku("sku123"), 1)
        .await
        .expect("remove one AirPods");
    assert_eq!(remaining, 1);

    let summary = cart.view_cart(&parker).await.expect("view cart");
    assert_eq!(summary.total().expect("total").to_string(), "$289.98");
    assert_eq!(summary.item_count(), Some(2));
}

#[tokio::test]
async fn test_summary_json_shape() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");

    let empty = serde_json::to_value(cart.view_cart(&parker).await.expect("view"))
        .expect("serialize");
    assert_eq!(empty, serde_json::json!({ "status": "empty" }));

    cart.add_item(&parker, &sku("sku456"), 3)
        .await
        .expect("add keyboard");
    let full = serde_json::to_value(cart.view_cart(&parker).await.expect("view"))
        .expect("serialize");
    assert_eq!(full["status"], "items");
    assert_eq!(full["total"], "269.97");
    assert_eq!(full["lines"][0]["sku_id"], "sku456");
    assert_eq!(full["lines"][0]["quantity"], 3);
}

// ============================================================================
// Invariants
// ============================================================================

/// Replays add/remove steps against a plain map and checks that every stored
/// quantity stays positive and matches the model.
#[tokio::test]
async fn test_quantities_track_a_simple_model() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");

    let steps: &[(&str, i64)] = &[
        ("sku123", 3),
        ("sku456", 2),
        ("sku123", -1),
        ("sku456", -5),
        ("sku123", 4),
        ("sku123", -6),
        ("sku456", 1),
        ("sku123", 2),
        ("sku123", -2),
        ("sku456", -1),
    ];

    let mut model: BTreeMap<&str, i64> = BTreeMap::new();
    for &(id, delta) in steps {
        if delta > 0 {
            cart.add_item(&parker, &sku(id), delta).await.expect("add");
            *model.entry(id).or_default() += delta;
        } else {
            cart.remove_item(&parker, &sku(id), -delta)
                .await
                .expect("remove");
            let left = model.get(id).copied().unwrap_or_default() + delta;
            if left > 0 {
                model.insert(id, left);
            } else {
                model.remove(id);
            }
        }

        let stored: BTreeMap<String, i64> = cart
            .contents(&parker)
            .await
            .expect("contents")
            .into_iter()
            .map(|(k, q)| (k.into_inner(), q.get()))
            .collect();
        let expected: BTreeMap<String, i64> =
            model.iter().map(|(k, v)| ((*k).to_string(), *v)).collect();
        assert_eq!(stored, expected);
        assert!(stored.values().all(|q| *q > 0));
    }

    assert!(cart.view_cart(&parker).await.expect("view").is_empty());
}

#[tokio::test]
async fn test_over_removal_then_add_starts_fresh() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");

    cart.add_item(&parker, &sku("sku123"), 2)
        .await
        .expect("add");
    assert_eq!(
        cart.remove_item(&parker, &sku("sku123"), 99)
            .await
            .expect("remove"),
        0
    );
    let now = cart
        .add_item(&parker, &sku("sku123"), 1)
        .await
        .expect("add again");
    assert_eq!(now.get(), 1);
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);

    cart.add_item(&user("1"), &sku("sku123"), 1)
        .await
        .expect("add for 1");
    cart.add_item(&user("2"), &sku("sku456"), 4)
        .await
        .expect("add for 2");

    let one = cart.contents(&user("1")).await.expect("contents 1");
    let two = cart.contents(&user("2")).await.expect("contents 2");
    assert_eq!(one.len(), 1);
    assert!(one.contains_key(&sku("sku123")));
    assert_eq!(two.len(), 1);
    assert_eq!(two[&sku("sku456")].get(), 4);
}

#[tokio::test]
async fn test_concurrent_removals_never_go_negative() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let parker = user("1");

    CartService::new(&state)
        .add_item(&parker, &sku("sku123"), 10)
        .await
        .expect("add");

    let mut handles = Vec::new();
    for _ in 0..25 {
        let state = state.clone();
        let parker = parker.clone();
        handles.push(tokio::spawn(async move {
            CartService::new(&state)
                .remove_item(&parker, &sku("sku123"), 1)
                .await
        }));
    }

    let mut remainders = Vec::new();
    for handle in handles {
        remainders.push(
            handle
                .await
                .expect("task panicked")
                .expect("remove should succeed"),
        );
    }

    // Each decrement is observed exactly once; the rest find nothing left.
    remainders.sort_unstable();
    let positive: Vec<i64> = remainders.iter().copied().filter(|r| *r > 0).collect();
    assert_eq!(positive, (1..=9).collect::<Vec<i64>>());
    assert_eq!(remainders.iter().filter(|r| **r == 0).count(), 16);
    assert!(
        CartService::new(&state)
            .contents(&parker)
            .await
            .expect("contents")
            .is_empty()
    );
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_invalid_quantities_leave_cart_untouched() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");
    cart.add_item(&parker, &sku("sku123"), 2)
        .await
        .expect("add");

    for bad in [0, -1] {
        assert!(matches!(
            cart.add_item(&parker, &sku("sku123"), bad).await,
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            cart.remove_item(&parker, &sku("sku123"), bad).await,
            Err(Error::InvalidArgument(_))
        ));
    }

    let contents = cart.contents(&parker).await.expect("contents");
    assert_eq!(contents[&sku("sku123")].get(), 2);
}

#[tokio::test]
async fn test_unknown_sku_is_not_found() {
    let (state, _) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);

    assert!(matches!(
        cart.add_item(&user("1"), &sku("sku999"), 1).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        cart.remove_item(&user("1"), &sku("sku999"), 1).await,
        Err(Error::NotFound(_))
    ));
    assert_eq!(
        cart.remove_item(&user("1"), &sku("sku123"), 1)
            .await
            .expect("absent entry counts as zero"),
        0
    );
}

#[tokio::test]
async fn test_unavailable_store_surfaces_on_every_operation() {
    let (state, store) = memory_state();
    seed_sample(&state).await;
    let cart = CartService::new(&state);
    let parker = user("1");
    cart.add_item(&parker, &sku("sku123"), 1)
        .await
        .expect("add");

    store.set_available(false);

    assert!(matches!(
        cart.add_item(&parker, &sku("sku123"), 1).await,
        Err(Error::StoreUnavailable(_))
    ));
    assert!(matches!(
        cart.remove_item(&parker, &sku("sku123"), 1).await,
        Err(Error::StoreUnavailable(_))
    ));
    assert!(matches!(
        cart.view_cart(&parker).await,
        Err(Error::StoreUnavailable(_))
    ));

    store.set_available(true);
    let summary = cart.view_cart(&parker).await.expect("view");
    assert!(matches!(summary, CartSummary::Items { .. }));
    assert_eq!(summary.lines()[0].quantity.get(), 1);
}
