//! Singleton configuration records.
//!
//! Exactly one instance of each of these exists at all times: in memory it is
//! never absent (defaults fill in), and in the remote store each is a single
//! well-known document.

use serde::{Deserialize, Serialize};

use crate::types::ImageRef;

/// Business details shown on the menu, plus the admin password.
///
/// Implements `Debug` manually to redact the admin password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessConfig {
    pub name: String,
    #[serde(default)]
    pub slogan: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub schedule: String,
    /// Shared plaintext admin password. Compared by equality only.
    pub admin_password: String,
    pub primary_color: String,
    pub secondary_color: String,
}

impl std::fmt::Debug for BusinessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessConfig")
            .field("name", &self.name)
            .field("slogan", &self.slogan)
            .field("phone", &self.phone)
            .field("address", &self.address)
            .field("schedule", &self.schedule)
            .field("admin_password", &"[REDACTED]")
            .field("primary_color", &self.primary_color)
            .field("secondary_color", &self.secondary_color)
            .finish()
    }
}

impl BusinessConfig {
    /// Check a candidate admin password.
    #[must_use]
    pub fn admin_password_matches(&self, candidate: &str) -> bool {
        self.admin_password == candidate
    }
}

/// The three site images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagesConfig {
    /// Logo, also used as the installable app icon.
    pub logo_url: ImageRef,
    pub hero_image: ImageRef,
    pub about_us_image: ImageRef,
}

/// "About us" section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutConfig {
    pub title: String,
    pub text: String,
}

/// Outbound social links. An empty string means the link is not shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub facebook: String,
    pub instagram: String,
    pub whatsapp: String,
    pub tiktok: String,
}

/// Social networks with a link slot in [`SocialConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialNetwork {
    Facebook,
    Instagram,
    Whatsapp,
    Tiktok,
}

impl SocialNetwork {
    /// Display label for the network.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Whatsapp => "WhatsApp",
            Self::Tiktok => "TikTok",
        }
    }
}

impl SocialConfig {
    /// All link slots, including empty ones.
    fn slots(&self) -> [(SocialNetwork, &str); 4] {
        [
            (SocialNetwork::Facebook, self.facebook.as_str()),
            (SocialNetwork::Instagram, self.instagram.as_str()),
            (SocialNetwork::Whatsapp, self.whatsapp.as_str()),
            (SocialNetwork::Tiktok, self.tiktok.as_str()),
        ]
    }

    /// Links that are actually set.
    pub fn links(&self) -> impl Iterator<Item = (SocialNetwork, &str)> {
        self.slots()
            .into_iter()
            .filter(|(_, url)| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_debug_redacts_password() {
        let config = defaults::business_config();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(&config.admin_password));
    }

    #[test]
    fn test_password_equality() {
        let config = defaults::business_config();
        assert!(config.admin_password_matches("admin123"));
        assert!(!config.admin_password_matches("Admin123"));
        assert!(!config.admin_password_matches(""));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(defaults::business_config()).expect("serialize");
        assert!(json.get("adminPassword").is_some());
        assert!(json.get("primaryColor").is_some());

        let images = serde_json::to_value(defaults::images_config()).expect("serialize");
        assert!(images.get("logoUrl").is_some());
        assert!(images.get("aboutUsImage").is_some());
    }

    #[test]
    fn test_social_links_skip_empty() {
        let social = SocialConfig {
            facebook: "https://facebook.com/dulsan".to_string(),
            whatsapp: " ".to_string(),
            ..SocialConfig::default()
        };
        let links: Vec<_> = social.links().collect();
        assert_eq!(links, vec![(SocialNetwork::Facebook, "https://facebook.com/dulsan")]);
    }
}
