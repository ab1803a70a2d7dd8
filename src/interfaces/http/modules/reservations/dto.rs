//! Reservation DTOs

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::ReservationView;
use crate::domain::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Request to book a slot
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    /// Calendar date, `YYYY-MM-DD`
    #[schema(example = "2023-10-13")]
    pub date: String,
    /// Start time, `HH:MM` (`HH:MM:00` is also accepted)
    #[schema(example = "13:00")]
    pub time: String,
    /// Name of the reserving party
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "baker")]
    pub name: String,
    /// Theme to play
    #[validate(range(min = 1))]
    pub theme_id: i32,
}

impl CreateReservationRequest {
    pub fn parse_date(&self) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            DomainError::Validation(format!(
                "Invalid date '{}', expected YYYY-MM-DD",
                self.date
            ))
        })
    }

    /// Slots are minute-precise; non-zero seconds are rejected.
    pub fn parse_time(&self) -> Result<NaiveTime, DomainError> {
        let raw = self.time.trim();
        let invalid =
            || DomainError::Validation(format!("Invalid time '{}', expected HH:MM", self.time));

        let time = NaiveTime::parse_from_str(raw, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|_| invalid())?;
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(invalid());
        }
        Ok(time)
    }
}

/// Reservation joined with its theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    #[schema(example = "2023-10-13")]
    pub date: String,
    #[schema(example = "13:00")]
    pub time: String,
    pub name: String,
    pub theme_name: String,
    pub theme_desc: String,
    pub theme_price: i32,
}

impl From<ReservationView> for ReservationDto {
    fn from(view: ReservationView) -> Self {
        let ReservationView { reservation, theme } = view;
        Self {
            id: reservation.id(),
            date: reservation.date.format(DATE_FORMAT).to_string(),
            time: reservation.time.format(TIME_FORMAT).to_string(),
            name: reservation.name,
            theme_name: theme.name,
            theme_desc: theme.description,
            theme_price: theme.price,
        }
    }
}

/// Number of rows a delete removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Reservation, Theme};

    fn request(date: &str, time: &str) -> CreateReservationRequest {
        CreateReservationRequest {
            date: date.into(),
            time: time.into(),
            name: "baker".into(),
            theme_id: 1,
        }
    }

    #[test]
    fn parses_short_and_long_times() {
        let short = request("2023-10-13", "13:00").parse_time().unwrap();
        let long = request("2023-10-13", "13:00:00").parse_time().unwrap();
        assert_eq!(short, long);
        assert_eq!(
            request("2023-10-13", "13:00").parse_date().unwrap(),
            NaiveDate::from_ymd_opt(2023, 10, 13).unwrap()
        );
    }

    #[test]
    fn rejects_seconds_within_the_minute() {
        assert!(matches!(
            request("2023-10-13", "13:00:30").parse_time(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            request("13/10/2023", "13:00").parse_date(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            request("2023-10-13", "25:00").parse_time(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn dto_formats_view() {
        let view = ReservationView {
            reservation: Reservation::restore(
                1,
                NaiveDate::from_ymd_opt(2023, 10, 13).unwrap(),
                NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                "baker".into(),
                1,
            ),
            theme: Theme {
                id: 1,
                name: "Haunted Manor".into(),
                description: "Spooky".into(),
                price: 29000,
            },
        };

        assert_eq!(
            ReservationDto::from(view),
            ReservationDto {
                id: 1,
                date: "2023-10-13".into(),
                time: "13:00".into(),
                name: "baker".into(),
                theme_name: "Haunted Manor".into(),
                theme_desc: "Spooky".into(),
                theme_price: 29000,
            }
        );
    }
}
