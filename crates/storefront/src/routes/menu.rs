//! Public menu route handler.

use axum::{
    Json,
    extract::{Query, State},
};
use dulsan_core::catalog::{self, CatalogQuery, CategoryCount, CategoryFilter};
use dulsan_core::manifest::{self, MetaTag};
use dulsan_core::{
    AboutConfig, BusinessConfig, CategoryId, ImageRef, ImagesConfig, Price, Product, ProductId,
    SocialConfig, SocialNetwork,
};
use dulsan_data::Freshness;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Query parameters for the menu.
#[derive(Debug, Default, Deserialize)]
pub struct MenuParams {
    /// Category id, or `all`.
    pub category: Option<String>,
    /// Search text.
    pub q: Option<String>,
}

/// Business details safe to show to anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicBusiness {
    pub name: String,
    pub slogan: String,
    pub phone: String,
    pub address: String,
    pub schedule: String,
    pub primary_color: String,
    pub secondary_color: String,
}

impl From<BusinessConfig> for PublicBusiness {
    fn from(config: BusinessConfig) -> Self {
        Self {
            name: config.name,
            slogan: config.slogan,
            phone: config.phone,
            address: config.address,
            schedule: config.schedule,
            primary_color: config.primary_color,
            secondary_color: config.secondary_color,
        }
    }
}

/// A product card with its category label resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image: ImageRef,
    pub category: CategoryId,
    /// `None` when the product points at a deleted category.
    pub category_name: Option<String>,
}

/// A social link button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    pub network: SocialNetwork,
    pub label: &'static str,
    pub url: String,
}

/// Everything the public menu page shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub business: PublicBusiness,
    pub images: ImagesConfig,
    pub about: AboutConfig,
    pub social: SocialConfig,
    /// Only the links that are set, in display order.
    pub social_links: Vec<SocialLink>,
    pub meta: Vec<MetaTag>,
    /// Available products across every category.
    pub all_count: usize,
    pub categories: Vec<CategoryCount>,
    pub products: Vec<MenuProduct>,
    pub freshness: Freshness,
}

/// `GET /api/menu?category=&q=`
pub async fn show(State(state): State<AppState>, Query(params): Query<MenuParams>) -> Json<MenuResponse> {
    let query = CatalogQuery {
        category: CategoryFilter::from_query(params.category.as_deref()),
        search: params.q.unwrap_or_default().trim().to_owned(),
    };

    let response = state.data().read(|s| {
        let products = &s.products.value;
        let categories = &s.categories.value;

        MenuResponse {
            business: s.config.value.clone().into(),
            images: s.images.value.clone(),
            about: s.about.value.clone(),
            social: s.social.value.clone(),
            social_links: social_links(&s.social.value),
            meta: manifest::meta_tags(&s.config.value, &s.images.value),
            all_count: catalog::count_available(products, &CategoryFilter::All),
            categories: catalog::category_counts(categories, products),
            products: query
                .apply(products)
                .into_iter()
                .map(|p| menu_product(p, catalog::category_of(categories, p).map(|c| c.name.clone())))
                .collect(),
            freshness: s.products.freshness,
        }
    });

    Json(response)
}

fn social_links(social: &SocialConfig) -> Vec<SocialLink> {
    social
        .links()
        .map(|(network, url)| SocialLink {
            network,
            label: network.label(),
            url: url.trim().to_owned(),
        })
        .collect()
}

fn menu_product(product: &Product, category_name: Option<String>) -> MenuProduct {
    MenuProduct {
        id: product.id.clone(),
        name: product.name.clone(),
        price: product.price,
        description: product.description.clone(),
        image: product.image.clone(),
        category: product.category.clone(),
        category_name,
    }
}

#[cfg(test)]
mod tests {
    use dulsan_core::defaults;

    use super::*;

    #[test]
    fn test_public_business_drops_password() {
        let public = PublicBusiness::from(defaults::business_config());
        let json = serde_json::to_string(&public).expect("serialize");
        assert!(json.contains("primaryColor"));
        assert!(!json.contains("admin123"));
        assert!(!json.contains("adminPassword"));
    }

    #[test]
    fn test_social_links_in_display_order() {
        let social = SocialConfig {
            tiktok: "https://tiktok.com/@dulsan".to_string(),
            instagram: " https://instagram.com/dulsan ".to_string(),
            ..SocialConfig::default()
        };
        let links = social_links(&social);
        let labels: Vec<_> = links.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Instagram", "TikTok"]);
        assert_eq!(
            links.first().map(|l| l.url.as_str()),
            Some("https://instagram.com/dulsan")
        );
    }
}
