//! Result ordering for listings.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordering requested by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Shuffle within the fetched page only.
    Random,
    /// Whatever order the store yields.
    Natural,
}

/// Ordering a store must apply before windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOrder {
    CreatedDesc,
    CreatedAsc,
    /// Insertion order in memory. Postgres has no stable insertion order, so
    /// it sorts by `created_at, id` ascending there, the same as `CreatedAsc`.
    /// A guest search without `sort` therefore lists oldest posts first.
    Natural,
}

impl SortOrder {
    pub fn store_order(self) -> StoreOrder {
        match self {
            Self::Newest => StoreOrder::CreatedDesc,
            Self::Oldest => StoreOrder::CreatedAsc,
            Self::Random | Self::Natural => StoreOrder::Natural,
        }
    }

    /// Post-fetch step applied to an already paginated window.
    pub fn arrange<T, R: Rng + ?Sized>(self, items: &mut [T], rng: &mut R) {
        if self == Self::Random {
            shuffle(items, rng);
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "random" => Ok(Self::Random),
            _ => Err(UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Random => "random",
            Self::Natural => "natural",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order '{0}', expected newest, oldest or random")]
pub struct UnknownSortOrder(pub String);

/// Fisher-Yates: walk from the last index down to 1, swapping each slot
/// with a uniformly chosen index in `0..=i`.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
