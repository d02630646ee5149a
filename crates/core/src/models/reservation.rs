//! Table reservations requested by visitors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ReservationId, ReservationStatus};

/// A reservation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: ReservationId,
    pub name: String,
    pub phone: String,
    /// Requested day, `YYYY-MM-DD`.
    pub date: String,
    /// Requested time, `HH:MM`.
    pub time: String,
    /// Party size.
    pub people: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields a visitor submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub name: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub people: u32,
    #[serde(default)]
    pub notes: String,
}

impl NewReservation {
    /// Create the reservation. New reservations are always pending.
    #[must_use]
    pub fn into_reservation(self, id: ReservationId, created_at: DateTime<Utc>) -> Reservation {
        Reservation {
            id,
            name: self.name,
            phone: self.phone,
            date: self.date,
            time: self.time,
            people: self.people,
            notes: self.notes,
            status: ReservationStatus::Pending,
            created_at,
        }
    }
}

/// Partial update for a reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub people: Option<u32>,
    pub notes: Option<String>,
    pub status: Option<ReservationStatus>,
}

impl ReservationUpdate {
    /// Update that only changes the status.
    #[must_use]
    pub fn status(status: ReservationStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl Reservation {
    /// Merge a partial update into this reservation.
    pub fn apply(&mut self, update: ReservationUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(people) = update.people {
            self.people = people;
        }
        if let Some(notes) = update.notes {
            self.notes = notes;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NewReservation {
        NewReservation {
            name: "Ana".to_string(),
            phone: "555 123".to_string(),
            date: "2026-10-20".to_string(),
            time: "09:30".to_string(),
            people: 4,
            notes: String::new(),
        }
    }

    #[test]
    fn test_new_reservation_is_pending() {
        let reservation = request().into_reservation(ReservationId::new("1"), Utc::now());
        assert_eq!(reservation.status, ReservationStatus::Pending);
    }

    #[test]
    fn test_confirm() {
        let mut reservation = request().into_reservation(ReservationId::new("1"), Utc::now());
        reservation.apply(ReservationUpdate::status(ReservationStatus::Confirmed));
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.people, 4);
    }

    #[test]
    fn test_reads_stored_timestamp() {
        let reservation: Reservation = serde_json::from_str(
            r#"{"id":"1","name":"Ana","phone":"1","date":"2026-10-20","time":"09:30",
                "people":2,"notes":"","status":"pending","createdAt":"2026-10-17T15:04:05.123Z"}"#,
        )
        .expect("deserialize");
        assert_eq!(reservation.created_at.timestamp_subsec_millis(), 123);
    }
}
