//! Reservation repository interface

use async_trait::async_trait;

use super::model::{NewReservation, Reservation, Slot, SlotScope};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Uniqueness policy this store enforces
    fn slot_scope(&self) -> SlotScope;

    /// Whether a stored reservation already occupies the slot
    async fn exists_conflicting(&self, slot: &Slot) -> DomainResult<bool>;

    /// Persist a new reservation and assign its id.
    ///
    /// Fails with `DuplicateReservation` if the slot is taken at the moment
    /// of insertion, even when an earlier `exists_conflicting` said it was free.
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    /// Delete by ID, returning the number of removed rows (0 or 1)
    async fn delete_by_id(&self, id: i32) -> DomainResult<u64>;

    /// Number of reservations referencing a theme
    async fn count_by_theme(&self, theme_id: i32) -> DomainResult<u64>;
}
