//! Admin API handlers.
//!
//! Every handler except [`login`] extracts [`RequireAdmin`]. Mutations go
//! through the synchronization session, so they are visible immediately and
//! written through to the remote store in the background.

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use dulsan_core::access::Page;
use dulsan_core::catalog::ReservationBoard;
use dulsan_core::{
    AboutConfig, BusinessConfig, Category, CategoryId, CategoryUpdate, ImageRef, ImagesConfig,
    NewCategory, NewProduct, Product, ProductId, ProductUpdate, Reservation, ReservationId,
    SocialConfig,
};
use dulsan_data::State as DataState;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Login result: the page the client should show next.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub page: Page,
}

/// `POST /api/admin/login`
///
/// Same check as the login page: the password must equal the business
/// config's admin password.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let config = state.data().config();
    match Page::default().open_admin().submit_password(&form.password, &config) {
        Ok(page) => {
            tracing::info!("Admin logged in");
            Ok(Json(LoginResponse { page }))
        }
        Err(e) => {
            tracing::warn!("Admin login failed");
            Err(AppError::Unauthorized(e.to_string()))
        }
    }
}

/// `GET /api/admin/data`
///
/// The whole in-memory state, each entity tagged with its freshness.
pub async fn data(_admin: RequireAdmin, State(state): State<AppState>) -> Json<DataState> {
    Json(state.data().state())
}

// =============================================================================
// Products
// =============================================================================

/// `POST /api/admin/products`
#[instrument(skip_all)]
pub async fn create_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = NewProduct {
        name: required(&product.name, "name")?,
        image: image(&product.image)?,
        ..product
    };

    let product = state.data().add_product(product);
    add_breadcrumb("admin", "Product added", Some(&[("product_id", product.id.as_str())]));
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn update_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    let update = ProductUpdate {
        name: update.name.as_deref().map(|n| required(n, "name")).transpose()?,
        image: update.image.as_ref().map(image).transpose()?,
        ..update
    };

    state
        .data()
        .update_product(&id, update)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// `DELETE /api/admin/products/{id}`
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete_product(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    if state.data().delete_product(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}

// =============================================================================
// Categories
// =============================================================================

/// `POST /api/admin/categories`
///
/// The id is derived from the name; a category whose name derives the same id
/// replaces the existing one.
#[instrument(skip_all)]
pub async fn create_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(category): Json<NewCategory>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = NewCategory {
        name: required(&category.name, "name")?,
        icon: category.icon.trim().to_owned(),
    };

    let category = state.data().add_category(category);
    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /api/admin/categories/{id}`
///
/// Renaming never changes the id.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn update_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
    Json(update): Json<CategoryUpdate>,
) -> Result<Json<Category>> {
    let update = CategoryUpdate {
        name: update.name.as_deref().map(|n| required(n, "name")).transpose()?,
        ..update
    };

    state
        .data()
        .update_category(&id, update)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))
}

/// `DELETE /api/admin/categories/{id}`
///
/// Products pointing at the category keep their dangling reference.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn delete_category(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<StatusCode> {
    if state.data().delete_category(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("category {id}")))
    }
}

// =============================================================================
// Singleton configuration
// =============================================================================

/// `PUT /api/admin/config`
pub async fn save_config(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(config): Json<BusinessConfig>,
) -> Result<StatusCode> {
    let config = BusinessConfig {
        name: required(&config.name, "name")?,
        // An empty password would lock everyone out of the admin
        admin_password: required(&config.admin_password, "adminPassword")?,
        primary_color: color(&config.primary_color, "primaryColor")?,
        secondary_color: color(&config.secondary_color, "secondaryColor")?,
        ..config
    };

    state.data().save_config(config);
    add_breadcrumb("admin", "Business config saved", None);
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/admin/images`
pub async fn save_images(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(images): Json<ImagesConfig>,
) -> Result<StatusCode> {
    let images = ImagesConfig {
        logo_url: image(&images.logo_url)?,
        hero_image: image(&images.hero_image)?,
        about_us_image: image(&images.about_us_image)?,
    };

    state.data().save_images(images);
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/admin/about`
pub async fn save_about(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(about): Json<AboutConfig>,
) -> StatusCode {
    state.data().save_about(about);
    StatusCode::NO_CONTENT
}

/// `PUT /api/admin/social`
///
/// Empty strings hide the link; anything else must be a URL.
pub async fn save_social(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Json(social): Json<SocialConfig>,
) -> Result<StatusCode> {
    let social = SocialConfig {
        facebook: link(&social.facebook, "facebook")?,
        instagram: link(&social.instagram, "instagram")?,
        whatsapp: link(&social.whatsapp, "whatsapp")?,
        tiktok: link(&social.tiktok, "tiktok")?,
    };

    state.data().save_social(social);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Uploads
// =============================================================================

/// Upload result.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub image: ImageRef,
}

/// `POST /api/admin/uploads`
///
/// Takes the first multipart field and returns it as an inline data URL, ready
/// to be stored in a product or the images config.
#[instrument(skip_all)]
pub async fn upload(_admin: RequireAdmin, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
        .ok_or_else(|| AppError::BadRequest("no file uploaded".to_string()))?;

    let content_type = field
        .content_type()
        .map(str::to_owned)
        .ok_or_else(|| AppError::BadRequest("missing content type".to_string()))?;
    let bytes = field.bytes().await.map_err(multipart_error)?;

    let image = ImageRef::inline(&content_type, &bytes)?;
    tracing::info!(content_type = %content_type, size = bytes.len(), "Image uploaded");
    Ok(Json(UploadResponse { image }))
}

/// Body-limit failures stay 413; anything else is a malformed request.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

// =============================================================================
// Reservations
// =============================================================================

/// `GET /api/admin/reservations`
pub async fn reservations(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Json<ReservationBoard> {
    let board = state
        .data()
        .read(|s| ReservationBoard::from_reservations(&s.reservations.value));
    Json(board)
}

/// `POST /api/admin/reservations/{id}/confirm`
#[instrument(skip_all, fields(reservation_id = %id))]
pub async fn confirm_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<Reservation>> {
    state
        .data()
        .confirm_reservation(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("reservation {id}")))
}

/// `DELETE /api/admin/reservations/{id}`
#[instrument(skip_all, fields(reservation_id = %id))]
pub async fn delete_reservation(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<StatusCode> {
    if state.data().delete_reservation(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("reservation {id}")))
    }
}

// =============================================================================
// Reset
// =============================================================================

/// `POST /api/admin/reset`
///
/// Restores the defaults on this server only. The remote store is untouched,
/// so the next live snapshot brings the shared data back.
pub async fn reset(_admin: RequireAdmin, State(state): State<AppState>) -> StatusCode {
    state.data().reset();
    tracing::warn!("Local data reset to defaults");
    StatusCode::NO_CONTENT
}

// =============================================================================
// Validation helpers
// =============================================================================

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn image(reference: &ImageRef) -> Result<ImageRef> {
    Ok(ImageRef::parse(reference.as_str())?)
}

fn link(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    Url::parse(value).map_err(|e| AppError::BadRequest(format!("{field}: {e}")))?;
    Ok(value.to_owned())
}

fn color(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    let hex = value.strip_prefix('#').unwrap_or_default();
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(value.to_owned())
    } else {
        Err(AppError::BadRequest(format!("{field} must be a hex color like #a87880")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_validation() {
        assert_eq!(link("  ", "facebook").expect("empty ok"), "");
        assert_eq!(
            link("https://wa.me/525551234567", "whatsapp").expect("url"),
            "https://wa.me/525551234567"
        );
        assert!(link("instagram dot com", "instagram").is_err());
    }

    #[test]
    fn test_color_validation() {
        assert!(color("#a87880", "primaryColor").is_ok());
        assert!(color("#fff", "primaryColor").is_ok());
        assert!(color("a87880", "primaryColor").is_err());
        assert!(color("#zzzzzz", "primaryColor").is_err());
    }

    #[test]
    fn test_image_validation() {
        assert!(image(&ImageRef::new("https://images.unsplash.com/x.jpg")).is_ok());
        assert!(image(&ImageRef::new("")).is_ok());
        assert!(matches!(
            image(&ImageRef::new("ftp://example.com/x.jpg")),
            Err(AppError::Image(_))
        ));
    }
}
