//! Region catalog - fixed id ranges that partition the dataset

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Inclusive id range of a region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub start: u32,
    pub end: u32,
}

impl RegionBounds {
    pub fn contains(&self, id: u32) -> bool {
        (self.start..=self.end).contains(&id)
    }

    /// Number of ids in the region
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.end - self.start + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Kanto,
    Johto,
    Hoenn,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Kanto, Region::Johto, Region::Hoenn];

    /// Looks up a region by key, falling back to the first region.
    pub fn from_key(key: &str) -> Region {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.key().eq_ignore_ascii_case(key))
            .unwrap_or(Self::ALL[0])
    }

    pub fn key(self) -> &'static str {
        match self {
            Region::Kanto => "kanto",
            Region::Johto => "johto",
            Region::Hoenn => "hoenn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Kanto => "KANTO",
            Region::Johto => "JOHTO",
            Region::Hoenn => "HOENN",
        }
    }

    pub fn bounds(self) -> RegionBounds {
        match self {
            Region::Kanto => RegionBounds { start: 1, end: 151 },
            Region::Johto => RegionBounds {
                start: 152,
                end: 251,
            },
            Region::Hoenn => RegionBounds {
                start: 252,
                end: 386,
            },
        }
    }

    /// Ascending ids of the region, generated lazily.
    pub fn ids(self) -> RangeInclusive<u32> {
        let bounds = self.bounds();
        bounds.start..=bounds.end
    }

    /// Steps through the catalog, wrapping at both ends.
    pub fn cycle(self, step: i16) -> Region {
        let len = Self::ALL.len() as i16;
        let current = Self::ALL
            .iter()
            .position(|region| *region == self)
            .unwrap_or(0) as i16;
        let next = (current + step).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_cover_bounds_in_ascending_order() {
        for region in Region::ALL {
            let bounds = region.bounds();
            let ids: Vec<u32> = region.ids().collect();
            assert_eq!(ids.len(), bounds.len());
            assert_eq!(ids.first(), Some(&bounds.start));
            assert_eq!(ids.last(), Some(&bounds.end));
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn regions_are_disjoint_and_contiguous_from_one() {
        let mut expected_start = 1;
        for region in Region::ALL {
            let bounds = region.bounds();
            assert!(bounds.start <= bounds.end);
            assert_eq!(bounds.start, expected_start);
            expected_start = bounds.end + 1;
        }
        assert_eq!(expected_start, 387);
    }

    #[test]
    fn unknown_key_defaults_to_first_region() {
        assert_eq!(Region::from_key("johto"), Region::Johto);
        assert_eq!(Region::from_key(" HOENN "), Region::Hoenn);
        assert_eq!(Region::from_key("sinnoh"), Region::Kanto);
        assert_eq!(Region::from_key(""), Region::Kanto);
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(Region::Kanto.cycle(1), Region::Johto);
        assert_eq!(Region::Hoenn.cycle(1), Region::Kanto);
        assert_eq!(Region::Kanto.cycle(-1), Region::Hoenn);
    }

    #[test]
    fn bounds_contains_is_inclusive() {
        let kanto = Region::Kanto.bounds();
        assert!(kanto.contains(1));
        assert!(kanto.contains(151));
        assert!(!kanto.contains(0));
        assert!(!kanto.contains(152));
    }
}
