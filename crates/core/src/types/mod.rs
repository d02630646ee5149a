//! Core types for the Dulsan menu.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod image;
pub mod price;
pub mod status;

pub use id::*;
pub use image::{ImageError, ImageRef};
pub use price::{Price, PriceError};
pub use status::ReservationStatus;
