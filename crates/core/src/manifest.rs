//! Installability manifest.
//!
//! The web app manifest and the PWA meta tags are derived from the business
//! config and the logo, so renaming the business or changing the logo updates
//! the installed app's name and icon.

use serde::Serialize;

use crate::models::{BusinessConfig, ImagesConfig};

/// Description used when the business has no slogan.
pub const DEFAULT_DESCRIPTION: &str = "Menú digital";

const BACKGROUND_COLOR: &str = "#ffffff";
const ICON_SIZES: [&str; 2] = ["192x192", "512x512"];

/// A web app manifest icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: &'static str,
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub purpose: &'static str,
}

/// A web app manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: &'static str,
    pub display: &'static str,
    pub background_color: &'static str,
    pub theme_color: String,
    pub orientation: &'static str,
    pub icons: Vec<ManifestIcon>,
}

impl WebManifest {
    /// Build the manifest. Icons are omitted when no logo is set.
    #[must_use]
    pub fn new(config: &BusinessConfig, images: &ImagesConfig) -> Self {
        let icons = if images.logo_url.is_empty() {
            Vec::new()
        } else {
            ICON_SIZES
                .iter()
                .map(|sizes| ManifestIcon {
                    src: images.logo_url.as_str().to_owned(),
                    sizes,
                    content_type: "image/png",
                    purpose: "any maskable",
                })
                .collect()
        };

        Self {
            name: config.name.clone(),
            short_name: config.name.clone(),
            description: description(config).to_owned(),
            start_url: "/",
            display: "standalone",
            background_color: BACKGROUND_COLOR,
            theme_color: config.primary_color.clone(),
            orientation: "portrait",
            icons,
        }
    }
}

/// A `<meta>` tag, addressed either by `name` or by `property` (Open Graph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    pub key: &'static str,
    pub property: bool,
    pub content: String,
}

/// PWA and Open Graph meta tags for the document head.
#[must_use]
pub fn meta_tags(config: &BusinessConfig, images: &ImagesConfig) -> Vec<MetaTag> {
    let named = |key, content: &str| MetaTag {
        key,
        property: false,
        content: content.to_owned(),
    };
    let property = |key, content: &str| MetaTag {
        key,
        property: true,
        content: content.to_owned(),
    };

    vec![
        named("theme-color", &config.primary_color),
        named("apple-mobile-web-app-capable", "yes"),
        named("apple-mobile-web-app-status-bar-style", "black-translucent"),
        named("apple-mobile-web-app-title", &config.name),
        named("application-name", &config.name),
        property("og:title", &config.name),
        property("og:description", description(config)),
        property("og:image", images.logo_url.as_str()),
    ]
}

fn description(config: &BusinessConfig) -> &str {
    if config.slogan.trim().is_empty() {
        DEFAULT_DESCRIPTION
    } else {
        &config.slogan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::types::ImageRef;

    #[test]
    fn test_manifest_from_config() {
        let config = defaults::business_config();
        let images = defaults::images_config();
        let manifest = WebManifest::new(&config, &images);

        assert_eq!(manifest.name, "Dulsan Cafetería");
        assert_eq!(manifest.description, "Sabores que te conquistan");
        assert_eq!(manifest.theme_color, "#a87880");
        assert_eq!(manifest.icons.len(), 2);
        assert!(manifest.icons.iter().all(|i| i.src == images.logo_url.as_str()));

        let json = serde_json::to_value(&manifest).expect("serialize");
        assert_eq!(json["icons"][0]["type"], "image/png");
        assert_eq!(json["display"], "standalone");
    }

    #[test]
    fn test_manifest_without_slogan_or_logo() {
        let mut config = defaults::business_config();
        config.slogan.clear();
        let images = ImagesConfig {
            logo_url: ImageRef::default(),
            ..defaults::images_config()
        };

        let manifest = WebManifest::new(&config, &images);
        assert_eq!(manifest.description, DEFAULT_DESCRIPTION);
        assert!(manifest.icons.is_empty());
    }

    #[test]
    fn test_meta_tags() {
        let tags = meta_tags(&defaults::business_config(), &defaults::images_config());
        let og_title = tags.iter().find(|t| t.key == "og:title");
        assert!(og_title.is_some_and(|t| t.property && t.content == "Dulsan Cafetería"));
        assert!(tags.iter().any(|t| t.key == "theme-color" && !t.property));
    }
}
