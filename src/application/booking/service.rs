//! Booking service: application-layer orchestration
//!
//! Create / read / delete for reservations on top of the repository
//! traits. HTTP handlers are thin wrappers that delegate here.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, DomainResult, NewReservation, RepositoryProvider, Reservation, Theme,
};

/// What deleting an unknown reservation id does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// Return a count of 0
    #[default]
    ReturnCount,
    /// Fail with `NotFound`
    RequireExisting,
}

/// A reservation joined with the theme it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationView {
    pub reservation: Reservation,
    pub theme: Theme,
}

/// Booking service, stateless, shared behind an `Arc`.
pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    delete_mode: DeleteMode,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, delete_mode: DeleteMode) -> Self {
        Self { repos, delete_mode }
    }

    // ── Reservations ────────────────────────────────────────────

    /// Book a slot. Fails with `Validation` for a blank name or an unknown
    /// theme and with `DuplicateReservation` when the slot is taken.
    pub async fn create_reservation(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        name: &str,
        theme_id: i32,
    ) -> DomainResult<Reservation> {
        let new = NewReservation::new(date, time, name, theme_id)?;

        if self.repos.themes().find_by_id(theme_id).await?.is_none() {
            return Err(DomainError::Validation(format!(
                "Theme {} does not exist",
                theme_id
            )));
        }

        let reservations = self.repos.reservations();
        if reservations.exists_conflicting(&new.slot()).await? {
            return Err(DomainError::DuplicateReservation { date, time });
        }

        // The store re-checks the slot atomically, a concurrent winner
        // still surfaces as DuplicateReservation here.
        reservations.insert(new).await
    }

    /// Get a reservation together with its theme.
    pub async fn get_reservation(&self, id: i32) -> DomainResult<ReservationView> {
        let reservation = self
            .repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", id))?;

        let theme = self.get_theme(reservation.theme_id).await?;

        Ok(ReservationView { reservation, theme })
    }

    /// Delete a reservation and return how many were removed (0 or 1).
    pub async fn delete_reservation(&self, id: i32) -> DomainResult<u64> {
        let removed = self.repos.reservations().delete_by_id(id).await?;

        if removed == 0 && self.delete_mode == DeleteMode::RequireExisting {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(removed)
    }

    // ── Themes ──────────────────────────────────────────────────

    pub async fn get_theme(&self, id: i32) -> DomainResult<Theme> {
        self.repos
            .themes()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Theme", id))
    }

    /// Delete a theme nobody has booked.
    pub async fn delete_theme(&self, id: i32) -> DomainResult<u64> {
        let referencing = self.repos.reservations().count_by_theme(id).await?;
        if referencing > 0 {
            return Err(DomainError::ReferentialIntegrity(format!(
                "Theme {} is referenced by {} reservation(s)",
                id, referencing
            )));
        }
        self.repos.themes().delete_by_id(id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
