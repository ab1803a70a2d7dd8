//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Index;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr, Statement,
};

use super::db_err;
use crate::domain::reservation::{
    NewReservation, Reservation, ReservationRepository, Slot, SlotScope,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::reservation;

/// Unique index backing `SlotScope::Global`
const GLOBAL_SLOT_INDEX: &str = "idx_reservations_slot";

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
    scope: SlotScope,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection, scope: SlotScope) -> Self {
        Self { db, scope }
    }

    /// Make the schema enforce the configured slot scope.
    ///
    /// The per-theme index comes with the migrations. The global scope
    /// adds a unique (date, time) index; switching back to per-theme drops it.
    pub async fn install_slot_constraint(&self) -> DomainResult<()> {
        let backend = self.db.get_database_backend();

        let stmt = match self.scope {
            SlotScope::Global => backend.build(
                &Index::create()
                    .if_not_exists()
                    .name(GLOBAL_SLOT_INDEX)
                    .table(reservation::Entity)
                    .col(reservation::Column::Date)
                    .col(reservation::Column::Time)
                    .unique()
                    .to_owned(),
            ),
            SlotScope::PerTheme => Statement::from_string(
                backend,
                format!("DROP INDEX IF EXISTS {}", GLOBAL_SLOT_INDEX),
            ),
        };

        debug!("Installing slot constraint for scope {}", self.scope);
        self.db.execute(stmt).await.map_err(db_err)?;
        Ok(())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation::restore(m.id, m.date, m.time, m.name, m.theme_id)
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    fn slot_scope(&self) -> SlotScope {
        self.scope
    }

    async fn exists_conflicting(&self, slot: &Slot) -> DomainResult<bool> {
        let key = self.scope.key(slot);

        let mut query = reservation::Entity::find()
            .filter(reservation::Column::Date.eq(key.date))
            .filter(reservation::Column::Time.eq(key.time));
        if let Some(theme_id) = key.theme_id {
            query = query.filter(reservation::Column::ThemeId.eq(theme_id));
        }

        let count = query.count(&self.db).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, r: NewReservation) -> DomainResult<Reservation> {
        debug!("Saving reservation: {} {} theme={}", r.date, r.time, r.theme_id);

        let (date, time, theme_id) = (r.date, r.time, r.theme_id);
        let model = reservation::ActiveModel {
            id: NotSet,
            date: Set(r.date),
            time: Set(r.time),
            name: Set(r.name),
            theme_id: Set(r.theme_id),
        };

        match model.insert(&self.db).await {
            Ok(saved) => Ok(model_to_domain(saved)),
            Err(e) => Err(match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    DomainError::DuplicateReservation { date, time }
                }
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    DomainError::Validation(format!("Theme {} does not exist", theme_id))
                }
                _ => db_err(e),
            }),
        }
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<u64> {
        debug!("Deleting reservation: {}", id);

        let result = reservation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn count_by_theme(&self, theme_id: i32) -> DomainResult<u64> {
        reservation::Entity::find()
            .filter(reservation::Column::ThemeId.eq(theme_id))
            .count(&self.db)
            .await
            .map_err(db_err)
    }
}
