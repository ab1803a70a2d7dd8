//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::reservation::SlotKey;
use crate::domain::{
    DomainError, DomainResult, NewReservation, NewTheme, RepositoryProvider, Reservation,
    ReservationRepository, Slot, SlotScope, Theme, ThemeRepository,
};

/// In-memory storage for development and testing.
///
/// Slot uniqueness is enforced through the `slots` index: claiming a key
/// goes through the DashMap entry API, which holds the shard lock for the
/// whole check-and-insert.
pub struct InMemoryStorage {
    scope: SlotScope,
    reservations: DashMap<i32, Reservation>,
    slots: DashMap<SlotKey, i32>,
    themes: DashMap<i32, Theme>,
    theme_names: DashMap<String, i32>,
    reservation_counter: AtomicI32,
    theme_counter: AtomicI32,
}

impl InMemoryStorage {
    pub fn new(scope: SlotScope) -> Self {
        Self {
            scope,
            reservations: DashMap::new(),
            slots: DashMap::new(),
            themes: DashMap::new(),
            theme_names: DashMap::new(),
            reservation_counter: AtomicI32::new(1),
            theme_counter: AtomicI32::new(1),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new(SlotScope::default())
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn themes(&self) -> &dyn ThemeRepository {
        self
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStorage {
    fn slot_scope(&self) -> SlotScope {
        self.scope
    }

    async fn exists_conflicting(&self, slot: &Slot) -> DomainResult<bool> {
        Ok(self.slots.contains_key(&self.scope.key(slot)))
    }

    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation> {
        // Held until the reservation is stored, so the theme cannot be
        // deleted in between.
        let Some(_theme) = self.themes.get(&reservation.theme_id) else {
            return Err(DomainError::Validation(format!(
                "Theme {} does not exist",
                reservation.theme_id
            )));
        };

        match self.slots.entry(self.scope.key(&reservation.slot())) {
            Entry::Occupied(_) => Err(DomainError::DuplicateReservation {
                date: reservation.date,
                time: reservation.time,
            }),
            Entry::Vacant(slot) => {
                let id = self.reservation_counter.fetch_add(1, Ordering::SeqCst);
                let stored = reservation.into_reservation(id);
                self.reservations.insert(id, stored.clone());
                slot.insert(id);
                Ok(stored)
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<u64> {
        match self.reservations.remove(&id) {
            Some((_, removed)) => {
                self.slots
                    .remove_if(&self.scope.key(&removed.slot()), |_, owner| *owner == id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn count_by_theme(&self, theme_id: i32) -> DomainResult<u64> {
        Ok(self
            .reservations
            .iter()
            .filter(|r| r.theme_id == theme_id)
            .count() as u64)
    }
}

#[async_trait]
impl ThemeRepository for InMemoryStorage {
    async fn insert(&self, theme: NewTheme) -> DomainResult<Theme> {
        match self.theme_names.entry(theme.name.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Theme name '{}' is already taken",
                theme.name
            ))),
            Entry::Vacant(name) => {
                let id = self.theme_counter.fetch_add(1, Ordering::SeqCst);
                let stored = theme.into_theme(id);
                self.themes.insert(id, stored.clone());
                name.insert(id);
                Ok(stored)
            }
        }
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Theme>> {
        Ok(self.themes.get(&id).map(|t| t.clone()))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Theme>> {
        let id = self.theme_names.get(name).map(|id| *id);
        Ok(id.and_then(|id| self.themes.get(&id).map(|t| t.clone())))
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<u64> {
        // Lock order: themes, then reservations. Same as `insert`.
        let removed = match self.themes.entry(id) {
            Entry::Vacant(_) => return Ok(0),
            Entry::Occupied(theme) => {
                if self.reservations.iter().any(|r| r.theme_id == id) {
                    return Err(DomainError::ReferentialIntegrity(format!(
                        "Theme {} is still referenced by reservations",
                        id
                    )));
                }
                theme.remove()
            }
        };
        self.theme_names.remove(&removed.name);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn new_reservation(hour: u32, theme_id: i32) -> NewReservation {
        NewReservation::new(
            NaiveDate::from_ymd_opt(2023, 10, 13).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            "baker",
            theme_id,
        )
        .unwrap()
    }

    async fn storage_with_theme(scope: SlotScope) -> InMemoryStorage {
        let storage = InMemoryStorage::new(scope);
        ThemeRepository::insert(&storage, NewTheme::new("Theme", "desc", 1000).unwrap())
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let storage = storage_with_theme(SlotScope::Global).await;
        let first = ReservationRepository::insert(&storage, new_reservation(10, 1)).await.unwrap();
        let second = ReservationRepository::insert(&storage, new_reservation(11, 1)).await.unwrap();
        assert_eq!((first.id(), second.id()), (1, 2));

        ReservationRepository::delete_by_id(&storage, second.id()).await.unwrap();
        let third = ReservationRepository::insert(&storage, new_reservation(11, 1)).await.unwrap();
        assert_eq!(third.id(), 3);
    }

    #[tokio::test]
    async fn insert_rejects_taken_slot() {
        let storage = storage_with_theme(SlotScope::Global).await;
        assert_eq!(storage.slot_scope(), SlotScope::Global);
        ReservationRepository::insert(&storage, new_reservation(10, 1)).await.unwrap();

        assert!(storage.exists_conflicting(&new_reservation(10, 1).slot()).await.unwrap());
        let err = ReservationRepository::insert(&storage, new_reservation(10, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReservation { .. }));
    }

    #[tokio::test]
    async fn delete_frees_the_slot() {
        let storage = storage_with_theme(SlotScope::Global).await;
        let r = ReservationRepository::insert(&storage, new_reservation(10, 1)).await.unwrap();

        assert_eq!(ReservationRepository::delete_by_id(&storage, r.id()).await.unwrap(), 1);
        assert_eq!(ReservationRepository::delete_by_id(&storage, r.id()).await.unwrap(), 0);
        assert!(!storage.exists_conflicting(&r.slot()).await.unwrap());
        assert!(ReservationRepository::find_by_id(&storage, r.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_requires_existing_theme() {
        let storage = InMemoryStorage::default();
        let err = ReservationRepository::insert(&storage, new_reservation(10, 999))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn theme_names_are_unique() {
        let storage = storage_with_theme(SlotScope::Global).await;
        let err = ThemeRepository::insert(&storage, NewTheme::new("Theme", "other", 0).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let found = storage.find_by_name("Theme").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn referenced_theme_is_kept() {
        let storage = storage_with_theme(SlotScope::PerTheme).await;
        ReservationRepository::insert(&storage, new_reservation(10, 1)).await.unwrap();
        assert_eq!(storage.count_by_theme(1).await.unwrap(), 1);

        let err = ThemeRepository::delete_by_id(&storage, 1).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferentialIntegrity(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_theme_delete_never_orphans_a_reservation() {
        let storage = std::sync::Arc::new(InMemoryStorage::new(SlotScope::PerTheme));

        for round in 0..500 {
            let theme_id = ThemeRepository::insert(
                storage.as_ref(),
                NewTheme::new(format!("Theme {}", round), "", 0).unwrap(),
            )
            .await
            .unwrap()
            .id;

            let booking = {
                let storage = storage.clone();
                tokio::spawn(async move {
                    ReservationRepository::insert(storage.as_ref(), new_reservation(10, theme_id))
                        .await
                })
            };
            let removal = {
                let storage = storage.clone();
                tokio::spawn(async move {
                    ThemeRepository::delete_by_id(storage.as_ref(), theme_id).await
                })
            };

            let booked = booking.await.unwrap();
            let removed = removal.await.unwrap();
            match (booked, removed) {
                (Ok(_), Err(DomainError::ReferentialIntegrity(_))) => {
                    assert!(ThemeRepository::find_by_id(storage.as_ref(), theme_id)
                        .await
                        .unwrap()
                        .is_some());
                }
                (Err(DomainError::Validation(_)), Ok(1)) => {}
                (booked, removed) => panic!(
                    "inconsistent outcome in round {}: {:?} / {:?}",
                    round, booked, removed
                ),
            }
        }
    }
}
