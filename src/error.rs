//! Error taxonomy shown to the user

use serde::{Deserialize, Serialize};

use crate::catalog::Region;
use crate::source::SourceError;

/// Failures surfaced by search, page loads and evolution lookups.
///
/// The `Display` text is what the status line shows; raw transport detail
/// is kept in `Network` for the log only.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BrowseError {
    #[error("Search may only contain letters, numbers, spaces and hyphens")]
    Validation { query: String },
    #[error("#{id} is not in {region}: try #{start}-{end}")]
    OutOfRegion {
        id: u32,
        region: Region,
        start: u32,
        end: u32,
    },
    #[error("No pokemon found for \"{query}\"")]
    NotFound { query: String },
    #[error("Could not reach the pokedex, check your connection")]
    Network { detail: String },
}

impl BrowseError {
    pub fn out_of_region(id: u32, region: Region) -> Self {
        let bounds = region.bounds();
        BrowseError::OutOfRegion {
            id,
            region,
            start: bounds.start,
            end: bounds.end,
        }
    }

    /// Maps a data source failure at an operation boundary.
    pub fn from_source(error: SourceError, query: &str) -> Self {
        match error {
            SourceError::NotFound(_) => BrowseError::NotFound {
                query: query.to_string(),
            },
            SourceError::Transport(detail) | SourceError::Malformed(detail) => {
                BrowseError::Network { detail }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_region_names_valid_range() {
        let error = BrowseError::out_of_region(200, Region::Kanto);
        assert_eq!(error.to_string(), "#200 is not in KANTO: try #1-151");
    }

    #[test]
    fn source_errors_map_to_user_categories() {
        let not_found = BrowseError::from_source(SourceError::NotFound("x".into()), "mew");
        assert_eq!(
            not_found,
            BrowseError::NotFound {
                query: "mew".into()
            }
        );

        let malformed = BrowseError::from_source(SourceError::Malformed("eof".into()), "mew");
        assert!(matches!(malformed, BrowseError::Network { .. }));
        assert!(!malformed.to_string().contains("eof"));
    }
}
