//! Theme repository interface

use async_trait::async_trait;

use super::model::{NewTheme, Theme};
use crate::domain::DomainResult;

#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Persist a new theme; a taken name fails with `Conflict`
    async fn insert(&self, theme: NewTheme) -> DomainResult<Theme>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Theme>>;

    async fn find_by_name(&self, name: &str) -> DomainResult<Option<Theme>>;

    /// Delete by ID. Fails with `ReferentialIntegrity` while any
    /// reservation still points at the theme.
    async fn delete_by_id(&self, id: i32) -> DomainResult<u64>;
}
