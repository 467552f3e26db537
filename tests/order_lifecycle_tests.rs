//! Order queries and status administration

mod common;

use common::*;
use shop::prelude::*;
use std::time::Duration;

async fn place_order(host: &ShopHost, user: &Identity, product: &Product, quantity: u32) -> OrderView {
    host.cart.add_item(&user.user_id, &product.id, quantity).await.unwrap();
    host.checkout.checkout(user, None).await.unwrap()
}

async fn register(host: &ShopHost, name: &str, role: Role) -> Identity {
    let profile = host
        .stores
        .users
        .create(UserProfile::new(
            name.to_string(),
            format!("{}@example.com", name.to_lowercase()),
            role,
        ))
        .await
        .unwrap();
    Identity::new(profile.id, role)
}

// =============================================================================
// Reading orders
// =============================================================================

mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_my_orders_newest_first_and_own_only() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = customer();
        let bob = customer();

        let first = place_order(&host, &alice, &dune, 1).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = place_order(&host, &alice, &dune, 2).await;
        place_order(&host, &bob, &dune, 1).await;

        let orders = host.orders.find_for_user(&alice.user_id).await.unwrap();

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(orders.iter().all(|o| o.user_id == alice.user_id));
        assert!(orders.iter().all(|o| o.user.is_none()));
    }

    #[tokio::test]
    async fn test_find_all_is_admin_only_and_includes_buyer() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = register(&host, "Alice", Role::Customer).await;
        let ghost = customer();
        place_order(&host, &alice, &dune, 1).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        place_order(&host, &ghost, &dune, 1).await;

        let err = host.orders.find_all(&alice).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let orders = host.orders.find_all(&admin()).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].user_id, ghost.user_id);
        assert!(orders[0].user.is_none());
        let buyer = orders[1].user.as_ref().expect("profile joined");
        assert_eq!(buyer.name, "Alice");
        assert_eq!(buyer.email, "alice@example.com");
        assert_eq!(buyer.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_find_one_visibility() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = customer();
        let order = place_order(&host, &alice, &dune, 1).await;

        assert_eq!(host.orders.find_one(&alice, &order.id).await.unwrap().id, order.id);
        assert_eq!(host.orders.find_one(&admin(), &order.id).await.unwrap().id, order.id);

        let err = host.orders.find_one(&customer(), &order.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = host.orders.find_one(&alice, &Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_deleted_product_keeps_order_line() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = customer();
        let order = place_order(&host, &alice, &dune, 2).await;

        host.catalog.delete_product(&admin(), &dune.id).await.unwrap();

        let reloaded = host.orders.find_one(&alice, &order.id).await.unwrap();
        assert_eq!(reloaded.items.len(), 1);
        assert_eq!(reloaded.items[0].product_id, dune.id);
        assert_eq!(reloaded.items[0].price, dec("20.00"));
        assert!(reloaded.items[0].product.is_none());
        assert_eq!(reloaded.total, dec("40.00"));
    }
}

// =============================================================================
// Status changes
// =============================================================================

mod status_tests {
    use super::*;

    #[tokio::test]
    async fn test_admin_can_move_to_any_status() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = customer();
        let order = place_order(&host, &alice, &dune, 1).await;
        let admin = admin();

        for status in [
            OrderStatus::Delivered,
            OrderStatus::Pending,
            OrderStatus::Cancelled,
            OrderStatus::Shipped,
        ] {
            let updated = host.orders.update_status(&admin, &order.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }

        let reloaded = host.orders.find_one(&alice, &order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Shipped);
        assert!(reloaded.updated_at >= reloaded.created_at);
        assert_eq!(reloaded.total, order.total);
    }

    #[tokio::test]
    async fn test_customer_cannot_change_status() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let alice = customer();
        let order = place_order(&host, &alice, &dune, 1).await;

        let err = host
            .orders
            .update_status(&alice, &order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let reloaded = host.orders.find_one(&alice, &order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let host = host();

        let err = host
            .orders
            .update_status(&admin(), &Uuid::new_v4(), OrderStatus::Shipped)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
