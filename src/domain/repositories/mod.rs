//! Repository access for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `DomainResult`: standard result type for domain operations

use async_trait::async_trait;

use super::reservation::ReservationRepository;
use super::theme::ThemeRepository;
pub use crate::shared::errors::DomainResult;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let theme = repos.themes().find_by_id(1).await?;
///     let taken = repos.reservations().exists_conflicting(&slot).await?;
/// }
/// ```
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn themes(&self) -> &dyn ThemeRepository;

    /// Round-trip to the backing medium, for health checks
    async fn ping(&self) -> DomainResult<()> {
        Ok(())
    }
}
