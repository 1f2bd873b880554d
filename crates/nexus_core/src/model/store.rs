//! In-memory store and its first-run seed.
//!
//! # Invariants
//! - The store is only replaced wholesale by import; partners are only appended otherwise.
//! - First-run contents come from an explicit `StoreSeed`, never from load-path branching.

use crate::model::partner::{Partner, PartnerId};
use crate::model::profile::{SelfProfile, DEFAULT_SELF_NAME};
use std::collections::BTreeSet;

/// Static description of one seeded partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerSeed {
    pub id: PartnerId,
    pub name: &'static str,
    pub smashes: u32,
    pub rating: f64,
}

/// First-run store contents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreSeed {
    pub partners: &'static [PartnerSeed],
    pub self_name: &'static str,
}

/// Sample data shown on first run.
#[rustfmt::skip]
pub const DEFAULT_SEED: StoreSeed = StoreSeed {
    partners: &[
        PartnerSeed { id: 1, name: "IB", smashes: 64, rating: 4.2 },
        PartnerSeed { id: 2, name: "Mark", smashes: 8, rating: 3.3 },
        PartnerSeed { id: 3, name: "RF", smashes: 5, rating: 5.0 },
        PartnerSeed { id: 4, name: "Random M", smashes: 16, rating: 4.4 },
        PartnerSeed { id: 5, name: "SSB", smashes: 34, rating: 3.2 },
        PartnerSeed { id: 6, name: "A ogrr", smashes: 0, rating: 0.0 },
        PartnerSeed { id: 7, name: "T", smashes: 0, rating: 0.0 },
        PartnerSeed { id: 8, name: "Test 4", smashes: 0, rating: 0.0 },
    ],
    self_name: DEFAULT_SELF_NAME,
};

/// Seed with no sample partners.
pub const EMPTY_SEED: StoreSeed = StoreSeed {
    partners: &[],
    self_name: DEFAULT_SELF_NAME,
};

impl StoreSeed {
    pub fn partners(&self) -> Vec<Partner> {
        self.partners
            .iter()
            .map(|seed| Partner {
                id: seed.id,
                name: seed.name.to_string(),
                smashes: seed.smashes,
                rating: seed.rating,
                avatar: None,
            })
            .collect()
    }

    pub fn self_profile(&self) -> SelfProfile {
        SelfProfile::named(self.self_name)
    }

    pub fn store(&self) -> Store {
        Store::new(self.partners(), self.self_profile())
    }
}

/// Partner list plus self profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub partners: Vec<Partner>,
    pub self_profile: SelfProfile,
}

impl Store {
    pub fn new(partners: Vec<Partner>, self_profile: SelfProfile) -> Self {
        Self {
            partners,
            self_profile,
        }
    }

    pub fn max_partner_id(&self) -> Option<PartnerId> {
        self.partners.iter().map(|partner| partner.id).max()
    }

    /// Next id for a partner created at `now_ms`: the timestamp, bumped past any existing id.
    ///
    /// When the largest id is already `i64::MAX`, the nearest unused id at or below
    /// `now_ms` is taken instead, then the nearest above it. `None` only when every
    /// id is in use.
    pub fn next_partner_id(&self, now_ms: i64) -> Option<PartnerId> {
        let max = match self.max_partner_id() {
            Some(max) if max >= now_ms => max,
            _ => return Some(now_ms),
        };
        if let Some(next) = max.checked_add(1) {
            return Some(next);
        }

        let taken = self
            .partners
            .iter()
            .map(|partner| partner.id)
            .collect::<BTreeSet<_>>();
        (i64::MIN..=now_ms)
            .rev()
            .chain((now_ms..=i64::MAX).skip(1))
            .find(|candidate| !taken.contains(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::{Store, StoreSeed, DEFAULT_SEED, EMPTY_SEED};
    use crate::model::partner::{validate_partners, Partner};
    use crate::model::profile::SelfProfile;

    #[test]
    fn default_seed_is_valid_sample_data() {
        let store = DEFAULT_SEED.store();
        assert_eq!(store.partners.len(), 8);
        assert_eq!(store.partners[0].name, "IB");
        assert_eq!(store.partners[0].smashes, 64);
        assert_eq!(store.self_profile.name, "Self");
        assert!(validate_partners(&store.partners).is_ok());
    }

    #[test]
    fn next_id_uses_timestamp_unless_it_collides() {
        let store = DEFAULT_SEED.store();
        assert_eq!(
            store.next_partner_id(1_700_000_000_000),
            Some(1_700_000_000_000)
        );
        assert_eq!(store.next_partner_id(5), Some(9));
        assert_eq!(EMPTY_SEED.store().next_partner_id(3), Some(3));
    }

    #[test]
    fn next_id_does_not_overflow_past_largest_id() {
        let store = Store::new(
            vec![Partner::new(i64::MAX, "Max"), Partner::new(10, "Ten")],
            SelfProfile::default(),
        );
        assert_eq!(store.next_partner_id(10), Some(9));
        assert_eq!(store.next_partner_id(i64::MAX), Some(i64::MAX - 1));

        let store = Store::new(
            vec![Partner::new(i64::MAX, "Max"), Partner::new(i64::MIN, "Min")],
            SelfProfile::default(),
        );
        assert_eq!(store.next_partner_id(i64::MIN), Some(i64::MIN + 1));
    }

    #[test]
    fn custom_seed_builds_profile_name() {
        let seed = StoreSeed {
            partners: &[],
            self_name: "Me",
        };
        assert_eq!(seed.store().self_profile.name, "Me");
        assert!(seed.store().partners.is_empty());
    }
}
