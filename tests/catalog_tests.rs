//! Catalog behavior: categories, products and their references

mod common;

use common::*;
use shop::prelude::*;

fn product_request(category: &str, name: &str, price: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: name.to_string(),
        description: None,
        price: dec(price),
        category_id: category.to_string(),
        stock: 3,
        image: None,
    }
}

// =============================================================================
// Categories
// =============================================================================

mod category_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_trims_and_rejects_duplicates() {
        let host = host();

        let books = host
            .catalog
            .create_category(
                &admin(),
                CreateCategoryRequest {
                    name: "  Books ".to_string(),
                    description: Some("  Paper and ink  ".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(books.name, "Books");
        assert_eq!(books.description.as_deref(), Some("Paper and ink"));

        let err = host
            .catalog
            .create_category(
                &admin(),
                CreateCategoryRequest {
                    name: "Books  ".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(host.catalog.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let host = host();

        let err = host
            .catalog
            .create_category(
                &admin(),
                CreateCategoryRequest {
                    name: "   ".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_customers_cannot_write_categories() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let user = customer();

        let err = host
            .catalog
            .create_category(
                &user,
                CreateCategoryRequest {
                    name: "Games".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = host
            .catalog
            .update_category(&user, &books.id, UpdateCategoryRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = host.catalog.delete_category(&user, &books.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert!(host.catalog.get_category(&books.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_rename_conflicts_with_other_category_only() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        seed_category(&host, "Games").await;

        let err = host
            .catalog
            .update_category(
                &admin(),
                &books.id,
                UpdateCategoryRequest {
                    name: Some("Games".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let renamed = host
            .catalog
            .update_category(
                &admin(),
                &books.id,
                UpdateCategoryRequest {
                    name: Some(" Books ".to_string()),
                    description: Some("Novels".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Books");
        assert_eq!(renamed.description.as_deref(), Some("Novels"));
        assert_eq!(renamed.created_at, books.created_at);
    }

    #[tokio::test]
    async fn test_missing_category_is_not_found() {
        let host = host();
        let missing = Uuid::new_v4();

        assert_eq!(
            host.catalog.get_category(&missing).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            host.catalog
                .update_category(&admin(), &missing, UpdateCategoryRequest::default())
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            host.catalog.delete_category(&admin(), &missing).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_deleted_category_leaves_products_uncategorized() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;

        host.catalog.delete_category(&admin(), &books.id).await.unwrap();

        let view = host.catalog.get_product(&dune.id).await.unwrap();
        assert_eq!(view.product.category_id, books.id);
        assert!(view.category.is_none());
    }
}

// =============================================================================
// Category references
// =============================================================================

mod reference_tests {
    use super::*;

    #[tokio::test]
    async fn test_ensure_category_exists() {
        let host = host();
        let books = seed_category(&host, "Books").await;

        let id = host
            .catalog
            .ensure_category_exists(&books.id.to_string())
            .await
            .unwrap();
        assert_eq!(id, books.id);

        let err = host.catalog.ensure_category_exists("not-an-id").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = host
            .catalog
            .ensure_category_exists(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let host = host();

        let err = host
            .catalog
            .create_product(&admin(), product_request(&Uuid::new_v4().to_string(), "Dune", "20.00"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(host.catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_with_malformed_category_is_invalid() {
        let host = host();
        seed_category(&host, "Books").await;

        let err = host
            .catalog
            .create_product(&admin(), product_request("not-an-id", "Dune", "20.00"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(host.catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_move_requires_existing_category() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let games = seed_category(&host, "Games").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;

        let err = host
            .catalog
            .update_product(
                &admin(),
                &dune.id,
                UpdateProductRequest {
                    category_id: Some(Uuid::new_v4().to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let moved = host
            .catalog
            .update_product(
                &admin(),
                &dune.id,
                UpdateProductRequest {
                    category_id: Some(games.id.to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.category_id, games.id);
    }
}

// =============================================================================
// Products
// =============================================================================

mod product_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_product_joins_category() {
        let host = host();
        let books = seed_category(&host, "Books").await;

        let mut request = product_request(&books.id.to_string(), "  Dune ", "19.99");
        request.description = Some("  Spice  ".to_string());
        let dune = host.catalog.create_product(&admin(), request).await.unwrap();

        assert_eq!(dune.name, "Dune");
        assert_eq!(dune.description.as_deref(), Some("Spice"));
        assert_eq!(dune.price, dec("19.99"));
        assert_eq!(dune.stock, 3);
        assert!(dune.image_url.is_none());

        let view = host.catalog.get_product(&dune.id).await.unwrap();
        assert_eq!(view.category.as_ref().map(|c| c.id), Some(books.id));

        let listed = host.catalog.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].product.id, dune.id);
    }

    #[tokio::test]
    async fn test_invalid_product_fields_are_collected() {
        let host = host();
        let books = seed_category(&host, "Books").await;

        let mut request = product_request(&books.id.to_string(), " ", "-1.00");
        request.stock = -4;
        let err = host.catalog.create_product(&admin(), request).await.unwrap_err();

        match err {
            ShopError::InvalidFields(violations) => {
                let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "price", "stock"]);
            }
            other => panic!("expected field violations, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_customers_cannot_write_products() {
        let host = host();
        let books = seed_category(&host, "Books").await;
        let dune = seed_product(&host, &books, "Dune", "20.00").await;
        let user = customer();

        let err = host
            .catalog
            .create_product(&user, product_request(&books.id.to_string(), "Emma", "5.00"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = host
            .catalog
            .update_product(&user, &dune.id, UpdateProductRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = host.catalog.delete_product(&user, &dune.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_image_is_kept_unless_replaced() {
        let host = host();
        let books = seed_category(&host, "Books").await;

        let mut request = product_request(&books.id.to_string(), "Dune", "20.00");
        request.image = Some("products/dune.png".to_string());
        let dune = host.catalog.create_product(&admin(), request).await.unwrap();
        let original = dune.image_url.clone().expect("image stored");
        assert!(original.ends_with("dune.png"));

        let renamed = host
            .catalog
            .update_product(
                &admin(),
                &dune.id,
                UpdateProductRequest {
                    name: Some("Dune Messiah".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.image_url.as_deref(), Some(original.as_str()));

        let replaced = host
            .catalog
            .update_product(
                &admin(),
                &dune.id,
                UpdateProductRequest {
                    image: Some("products/messiah.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(replaced.image_url.unwrap().ends_with("messiah.png"));
    }

    #[tokio::test]
    async fn test_image_outside_upload_dir_is_rejected() {
        let host = host();
        let books = seed_category(&host, "Books").await;

        let mut request = product_request(&books.id.to_string(), "Dune", "20.00");
        request.image = Some("../secrets.txt".to_string());
        let err = host.catalog.create_product(&admin(), request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(host.catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let host = host();
        let missing = Uuid::new_v4();

        assert_eq!(
            host.catalog.get_product(&missing).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            host.catalog
                .update_product(&admin(), &missing, UpdateProductRequest::default())
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            host.catalog.delete_product(&admin(), &missing).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert!(!host.catalog.product_exists(&missing).await.unwrap());
    }
}
