//! SeaORM implementation of ThemeRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set, SqlErr,
};

use super::db_err;
use crate::domain::theme::{NewTheme, Theme, ThemeRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::theme;

pub struct SeaOrmThemeRepository {
    db: DatabaseConnection,
}

impl SeaOrmThemeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: theme::Model) -> Theme {
    Theme {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
    }
}

#[async_trait]
impl ThemeRepository for SeaOrmThemeRepository {
    async fn insert(&self, t: NewTheme) -> DomainResult<Theme> {
        debug!("Saving theme: {}", t.name);

        let name = t.name.clone();
        let model = theme::ActiveModel {
            id: NotSet,
            name: Set(t.name),
            description: Set(t.description),
            price: Set(t.price),
        };

        model.insert(&self.db).await.map(model_to_domain).map_err(|e| {
            match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    DomainError::Conflict(format!("Theme name '{}' is already taken", name))
                }
                _ => db_err(e),
            }
        })
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Theme>> {
        let model = theme::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Theme>> {
        let model = theme::Entity::find()
            .filter(theme::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn delete_by_id(&self, id: i32) -> DomainResult<u64> {
        debug!("Deleting theme: {}", id);

        match theme::Entity::delete_by_id(id).exec(&self.db).await {
            Ok(result) => Ok(result.rows_affected),
            Err(e) => Err(match e.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    DomainError::ReferentialIntegrity(format!(
                        "Theme {} is still referenced by reservations",
                        id
                    ))
                }
                _ => db_err(e),
            }),
        }
    }
}
