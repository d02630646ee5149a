//! Public reservation request handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use dulsan_core::{NewReservation, Reservation};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Largest party a single request may book.
pub const MAX_PEOPLE: u32 = 10;

/// `POST /api/reservations`
///
/// Creates a pending reservation. The admin confirms or deletes it later.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewReservation>,
) -> Result<(StatusCode, Json<Reservation>)> {
    let request = validate(request)?;
    let reservation = state.data().add_reservation(request);

    add_breadcrumb(
        "reservation",
        "Reservation requested",
        Some(&[("reservation_id", reservation.id.as_str())]),
    );
    tracing::info!(
        reservation_id = %reservation.id,
        date = %reservation.date,
        people = reservation.people,
        "Reservation requested"
    );

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// Trim and check a reservation request.
///
/// # Errors
///
/// Returns `AppError::BadRequest` naming the first offending field.
pub fn validate(request: NewReservation) -> Result<NewReservation> {
    let name = required(&request.name, "name")?;
    let phone = required(&request.phone, "phone")?;

    let date = request.date.trim();
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("date must be YYYY-MM-DD".to_string()))?;

    let time = request.time.trim();
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::BadRequest("time must be HH:MM".to_string()))?;

    if !(1..=MAX_PEOPLE).contains(&request.people) {
        return Err(AppError::BadRequest(format!(
            "people must be between 1 and {MAX_PEOPLE}"
        )));
    }

    Ok(NewReservation {
        name,
        phone,
        date: date.to_owned(),
        time: time.to_owned(),
        people: request.people,
        notes: request.notes.trim().to_owned(),
    })
}

fn required(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewReservation {
        NewReservation {
            name: " Ana López ".to_string(),
            phone: "5551234567".to_string(),
            date: "2026-10-24".to_string(),
            time: "18:30".to_string(),
            people: 2,
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_request_is_trimmed() {
        let valid = validate(request()).expect("valid");
        assert_eq!(valid.name, "Ana López");
        assert_eq!(valid.people, 2);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let cases = [
            NewReservation {
                name: "   ".to_string(),
                ..request()
            },
            NewReservation {
                phone: String::new(),
                ..request()
            },
            NewReservation {
                date: "24/10/2026".to_string(),
                ..request()
            },
            NewReservation {
                time: "6pm".to_string(),
                ..request()
            },
            NewReservation {
                people: 0,
                ..request()
            },
            NewReservation {
                people: 11,
                ..request()
            },
        ];

        for case in cases {
            assert!(matches!(validate(case), Err(AppError::BadRequest(_))));
        }
    }
}
