//! Domain models.
//!
//! Field names follow the stored document format (camelCase) so that the
//! same serialization is used for the local cache and the remote store.

pub mod business;
pub mod category;
pub mod product;
pub mod reservation;

pub use business::{AboutConfig, BusinessConfig, ImagesConfig, SocialConfig, SocialNetwork};
pub use category::{Category, CategoryUpdate, NewCategory};
pub use product::{NewProduct, Product, ProductUpdate};
pub use reservation::{NewReservation, Reservation, ReservationUpdate};
