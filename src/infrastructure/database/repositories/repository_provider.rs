//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{ReservationRepository, SlotScope};
use crate::domain::theme::ThemeRepository;
use crate::domain::DomainResult;

use super::db_err;
use super::reservation_repository::SeaOrmReservationRepository;
use super::theme_repository::SeaOrmThemeRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::init(db.clone(), SlotScope::Global).await?;
/// let theme = repos.themes().find_by_id(1).await?;
/// let removed = repos.reservations().delete_by_id(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    reservations: SeaOrmReservationRepository,
    themes: SeaOrmThemeRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection, scope: SlotScope) -> Self {
        Self {
            reservations: SeaOrmReservationRepository::new(db.clone(), scope),
            themes: SeaOrmThemeRepository::new(db.clone()),
            db,
        }
    }

    /// Build the provider and install the schema constraint for `scope`.
    /// Expects migrations to have run.
    pub async fn init(db: DatabaseConnection, scope: SlotScope) -> DomainResult<Self> {
        let provider = Self::new(db, scope);
        provider.reservations.install_slot_constraint().await?;
        Ok(provider)
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn themes(&self) -> &dyn ThemeRepository {
        &self.themes
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(db_err)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm_migration::MigratorTrait;

    use crate::domain::{DomainError, NewReservation, NewTheme};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::{init_database, DatabaseConfig};

    async fn provider(scope: SlotScope) -> SeaOrmRepositoryProvider {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let repos = SeaOrmRepositoryProvider::init(db, scope).await.unwrap();
        repos
            .themes()
            .insert(NewTheme::new("Haunted Manor", "Spooky", 1000).unwrap())
            .await
            .unwrap();
        repos
            .themes()
            .insert(NewTheme::new("Lab 404", "", 2000).unwrap())
            .await
            .unwrap();
        repos
    }

    fn booking(hour: u32, theme_id: i32) -> NewReservation {
        NewReservation::new(
            NaiveDate::from_ymd_opt(2023, 10, 13).unwrap(),
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            "baker",
            theme_id,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_then_read_back() {
        let repos = provider(SlotScope::Global).await;
        let saved = repos.reservations().insert(booking(13, 1)).await.unwrap();
        assert_eq!(saved.id(), 1);

        let found = repos.reservations().find_by_id(1).await.unwrap().unwrap();
        assert_eq!(found, saved);
        assert_eq!(found.time, NaiveTime::from_hms_opt(13, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let repos = provider(SlotScope::Global).await;
        assert!(repos.reservations().find_by_id(10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn global_index_rejects_same_slot_other_theme() {
        let repos = provider(SlotScope::Global).await;
        repos.reservations().insert(booking(13, 1)).await.unwrap();

        assert!(repos
            .reservations()
            .exists_conflicting(&booking(13, 2).slot())
            .await
            .unwrap());
        let err = repos.reservations().insert(booking(13, 2)).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReservation { .. }));
    }

    #[tokio::test]
    async fn per_theme_scope_allows_other_theme() {
        let repos = provider(SlotScope::PerTheme).await;
        repos.reservations().insert(booking(13, 1)).await.unwrap();

        assert!(!repos
            .reservations()
            .exists_conflicting(&booking(13, 2).slot())
            .await
            .unwrap());
        repos.reservations().insert(booking(13, 2)).await.unwrap();

        let err = repos.reservations().insert(booking(13, 2)).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReservation { .. }));
    }

    #[tokio::test]
    async fn ids_survive_deleting_the_highest() {
        let repos = provider(SlotScope::Global).await;
        repos.reservations().insert(booking(10, 1)).await.unwrap();
        let second = repos.reservations().insert(booking(11, 1)).await.unwrap();

        assert_eq!(repos.reservations().delete_by_id(second.id()).await.unwrap(), 1);
        assert_eq!(repos.reservations().delete_by_id(second.id()).await.unwrap(), 0);

        let third = repos.reservations().insert(booking(11, 1)).await.unwrap();
        assert!(third.id() > second.id());
    }

    #[tokio::test]
    async fn unknown_theme_fails_validation() {
        let repos = provider(SlotScope::Global).await;
        let err = repos.reservations().insert(booking(13, 999)).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn theme_lookup_and_unique_name() {
        let repos = provider(SlotScope::Global).await;

        let theme = repos.themes().find_by_name("Lab 404").await.unwrap().unwrap();
        assert_eq!(theme.id, 2);
        assert_eq!(theme.description, "");

        let err = repos
            .themes()
            .insert(NewTheme::new("Lab 404", "again", 0).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn referenced_theme_delete_is_restricted() {
        let repos = provider(SlotScope::Global).await;
        repos.reservations().insert(booking(13, 1)).await.unwrap();
        assert_eq!(repos.reservations().count_by_theme(1).await.unwrap(), 1);

        let err = repos.themes().delete_by_id(1).await.unwrap_err();
        assert!(matches!(err, DomainError::ReferentialIntegrity(_)));
        assert_eq!(repos.themes().delete_by_id(2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn switching_to_per_theme_drops_global_index() {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmRepositoryProvider::init(db.clone(), SlotScope::Global)
            .await
            .unwrap();
        let repos = SeaOrmRepositoryProvider::init(db, SlotScope::PerTheme)
            .await
            .unwrap();
        repos.themes().insert(NewTheme::new("A", "", 0).unwrap()).await.unwrap();
        repos.themes().insert(NewTheme::new("B", "", 0).unwrap()).await.unwrap();

        repos.reservations().insert(booking(9, 1)).await.unwrap();
        repos.reservations().insert(booking(9, 2)).await.unwrap();
        repos.ping().await.unwrap();
    }
}
