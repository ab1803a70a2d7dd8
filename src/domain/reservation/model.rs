//! Reservation domain entity

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::shared::errors::{DomainError, DomainResult};

/// One bookable unit: a date and a wall-clock time for a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub theme_id: i32,
}

/// Whether the theme is part of the slot uniqueness key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotScope {
    /// Only one reservation per (date, time), whatever the theme
    #[default]
    Global,
    /// One reservation per (date, time, theme)
    PerTheme,
}

/// Projection of a [`Slot`] onto the uniqueness key of a [`SlotScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub theme_id: Option<i32>,
}

impl SlotScope {
    pub fn key(&self, slot: &Slot) -> SlotKey {
        SlotKey {
            date: slot.date,
            time: slot.time,
            theme_id: match self {
                Self::Global => None,
                Self::PerTheme => Some(slot.theme_id),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerTheme => "per_theme",
        }
    }
}

impl std::fmt::Display for SlotScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation request that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub theme_id: i32,
}

impl NewReservation {
    /// Build a reservation request. The reserving party's name is trimmed
    /// and must not be blank.
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        name: impl AsRef<str>,
        theme_id: i32,
    ) -> DomainResult<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "Reservation name must not be blank".into(),
            ));
        }
        Ok(Self {
            date,
            time,
            name: name.to_string(),
            theme_id,
        })
    }

    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            time: self.time,
            theme_id: self.theme_id,
        }
    }

    /// Attach the identifier assigned by a store.
    pub(crate) fn into_reservation(self, id: i32) -> Reservation {
        Reservation {
            id,
            date: self.date,
            time: self.time,
            name: self.name,
            theme_id: self.theme_id,
        }
    }
}

/// A stored reservation. Only stores can create one, so the id is always
/// the one the store assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub theme_id: i32,
}

impl Reservation {
    /// Rebuild a reservation read back from storage.
    pub(crate) fn restore(
        id: i32,
        date: NaiveDate,
        time: NaiveTime,
        name: String,
        theme_id: i32,
    ) -> Self {
        Self {
            id,
            date,
            time,
            name,
            theme_id,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn slot(&self) -> Slot {
        Slot {
            date: self.date,
            time: self.time,
            theme_id: self.theme_id,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
