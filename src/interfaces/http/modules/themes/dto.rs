//! Theme DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Theme;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ThemeDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit
    pub price: i32,
}

impl From<Theme> for ThemeDto {
    fn from(t: Theme) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            price: t.price,
        }
    }
}
