//! Single-selection category filter.

use crate::domain::{Listing, Offering};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The category chip currently selected. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// No predicate.
    #[default]
    All,
    /// Listings offering iftaar.
    Iftaar,
    /// Listings offering biriyani.
    Biriyani,
    /// Listings with enough confirmations to count as verified.
    Verified,
    /// No predicate; asks for distance ordering.
    Nearby,
}

impl Category {
    /// Every category, in chip order.
    pub const ALL: [Self; 5] = [Self::All, Self::Iftaar, Self::Biriyani, Self::Verified, Self::Nearby];

    /// Returns `true` if `listing` passes this category's predicate.
    ///
    /// `Nearby` is a sort directive rather than a filter and passes everything.
    #[must_use]
    pub fn admits(self, listing: &Listing) -> bool {
        match self {
            Self::All | Self::Nearby => true,
            Self::Iftaar => listing.offerings.has(Offering::Iftaar),
            Self::Biriyani => listing.offerings.has(Offering::Biriyani),
            Self::Verified => listing.is_verified(),
        }
    }

    /// Chip label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Iftaar => "Iftaar",
            Self::Biriyani => "Biriyani",
            Self::Verified => "Verified",
            Self::Nearby => "Nearby",
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Iftaar => "iftaar",
            Self::Biriyani => "biriyani",
            Self::Verified => "verified",
            Self::Nearby => "nearby",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
