//! Integration tests for menu filtering, search and the admin password gate.

use dulsan_core::access::{LoginError, Page};
use dulsan_core::catalog::{self, CatalogQuery, CategoryFilter};
use dulsan_core::{CategoryId, ProductUpdate};
use dulsan_integration_tests::{ADMIN_PASSWORD, Harness, new_product};

fn visible_names(harness: &Harness, query: &CatalogQuery) -> Vec<String> {
    harness.data.read(|s| {
        query
            .apply(&s.products.value)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    })
}

// =============================================================================
// Filtering
// =============================================================================

#[tokio::test]
async fn test_category_filter_shows_only_available_members() {
    let harness = Harness::new();
    let croissant = harness
        .data
        .products()
        .into_iter()
        .find(|p| p.name == "Croissant")
        .expect("default product");
    harness.data.update_product(
        &croissant.id,
        ProductUpdate {
            available: Some(false),
            ..ProductUpdate::default()
        },
    );

    let query = CatalogQuery {
        category: CategoryFilter::Only(CategoryId::new("otros")),
        search: String::new(),
    };
    let names = visible_names(&harness, &query);
    assert_eq!(names, vec!["Muffin", "Galletas", "Brownie"]);

    let counts = harness
        .data
        .read(|s| catalog::category_counts(&s.categories.value, &s.products.value));
    let otros = counts
        .iter()
        .find(|c| c.id.as_str() == "otros")
        .expect("otros count");
    assert_eq!(otros.count, 3);
}

#[tokio::test]
async fn test_search_spans_categories() {
    let harness = Harness::new();
    let query = CatalogQuery {
        category: CategoryFilter::from_query(Some("all")),
        search: "brownie".to_string(),
    };

    let names = visible_names(&harness, &query);
    assert_eq!(names, vec!["Brownie con Helado", "Brownie"]);
}

#[tokio::test]
async fn test_search_and_category_combine() {
    let harness = Harness::new();
    harness
        .data
        .add_product(new_product("Pay de Queso", "Con base de galleta"));

    let query = CatalogQuery {
        category: CategoryFilter::Only(CategoryId::new("otros")),
        search: "GALLET".to_string(),
    };
    assert_eq!(
        visible_names(&harness, &query),
        vec!["Galletas", "Pay de Queso"]
    );
}

#[tokio::test]
async fn test_deleted_category_leaves_products_dangling() {
    let harness = Harness::new();
    assert!(harness.data.delete_category(&CategoryId::new("tortas")));

    let dangling = harness.data.read(|s| {
        s.products
            .value
            .iter()
            .filter(|p| p.category.as_str() == "tortas")
            .map(|p| catalog::category_of(&s.categories.value, p).is_none())
            .collect::<Vec<_>>()
    });
    assert_eq!(dangling, vec![true; 4]);

    // Still listed under "all".
    let all = visible_names(&harness, &CatalogQuery::default());
    assert!(all.iter().any(|n| n == "Torta de Chocolate"));
}

// =============================================================================
// Admin gate
// =============================================================================

#[tokio::test]
async fn test_login_against_current_config() {
    let harness = Harness::new();
    let page = Page::default().open_admin();
    assert_eq!(page, Page::AdminLogin);

    let config = harness.data.config();
    assert_eq!(
        page.submit_password("wrong", &config),
        Err(LoginError::WrongPassword)
    );
    assert_eq!(
        page.submit_password(ADMIN_PASSWORD, &config),
        Ok(Page::Admin)
    );
}

#[tokio::test]
async fn test_changed_password_takes_effect() {
    let harness = Harness::new();
    let mut config = harness.data.config();
    config.admin_password = "pan-dulce".to_string();
    harness.data.save_config(config);

    let config = harness.data.config();
    assert_eq!(
        Page::AdminLogin.submit_password(ADMIN_PASSWORD, &config),
        Err(LoginError::WrongPassword)
    );
    assert_eq!(
        Page::AdminLogin.submit_password("pan-dulce", &config),
        Ok(Page::Admin)
    );
}
