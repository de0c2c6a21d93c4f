use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Remaining uses of an obstruction kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quota {
    Unlimited,
    Remaining(u16),
}

impl Quota {
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::Remaining(0))
    }

    /// Remaining uses, `-1` when unlimited.
    pub const fn as_count(self) -> i32 {
        match self {
            Self::Unlimited => -1,
            Self::Remaining(count) => count as i32,
        }
    }
}

/// How non-fallback quotas are chosen when a game starts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaPolicy {
    /// Between one and `side_length` uses, rolled per kind.
    #[default]
    Randomized,
    Fixed(u16),
}

/// Per-kind quotas for a single game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuotaTable {
    quotas: [Quota; ObstructionKind::COUNT],
}

impl QuotaTable {
    pub fn generate<R: Rng + ?Sized>(policy: QuotaPolicy, side_length: Coord, rng: &mut R) -> Self {
        let mut quotas = [Quota::Unlimited; ObstructionKind::COUNT];
        for kind in ObstructionKind::ALL {
            if kind.is_fallback() {
                continue;
            }
            let uses = match policy {
                QuotaPolicy::Randomized => {
                    let max = side_length.max(1) as u16;
                    1 + rng.random_range(0..max)
                }
                QuotaPolicy::Fixed(uses) => uses,
            };
            quotas[kind.index()] = Quota::Remaining(uses);
        }
        log::debug!("Obstruction quotas: {:?}", quotas);
        Self { quotas }
    }

    pub fn get(&self, kind: ObstructionKind) -> Quota {
        self.quotas[kind.index()]
    }

    pub fn is_available(&self, kind: ObstructionKind) -> bool {
        self.get(kind).is_available()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObstructionKind, Quota)> + '_ {
        ObstructionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
    }

    /// Uses up one obstruction of `kind`, returning whether this use
    /// exhausted it.
    pub(crate) fn consume(&mut self, kind: ObstructionKind) -> bool {
        match &mut self.quotas[kind.index()] {
            Quota::Unlimited => false,
            Quota::Remaining(0) => {
                log::warn!("Consumed {:?} with no uses left", kind);
                false
            }
            Quota::Remaining(count) => {
                *count -= 1;
                *count == 0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn fallback_is_always_unlimited() {
        let mut rng = SmallRng::seed_from_u64(11);

        for policy in [QuotaPolicy::Randomized, QuotaPolicy::Fixed(0)] {
            let table = QuotaTable::generate(policy, 5, &mut rng);
            assert_eq!(table.get(ObstructionKind::FALLBACK), Quota::Unlimited);
            assert_eq!(table.get(ObstructionKind::FALLBACK).as_count(), -1);
        }
    }

    #[test]
    fn randomized_quota_stays_within_side_length() {
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..100 {
            let table = QuotaTable::generate(QuotaPolicy::Randomized, 4, &mut rng);
            for (kind, quota) in table.iter().filter(|(kind, _)| !kind.is_fallback()) {
                assert!(
                    (1..=4).contains(&quota.as_count()),
                    "{:?} got {:?}",
                    kind,
                    quota
                );
            }
        }
    }

    #[test]
    fn consume_counts_down_to_exhaustion() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut table = QuotaTable::generate(QuotaPolicy::Fixed(2), 5, &mut rng);

        assert!(!table.consume(ObstructionKind::Triangle));
        assert_eq!(table.get(ObstructionKind::Triangle), Quota::Remaining(1));
        assert!(table.consume(ObstructionKind::Triangle));
        assert!(!table.is_available(ObstructionKind::Triangle));
        assert!(!table.consume(ObstructionKind::Triangle));
        assert_eq!(table.get(ObstructionKind::Triangle), Quota::Remaining(0));

        assert!(!table.consume(ObstructionKind::FALLBACK));
        assert!(table.is_available(ObstructionKind::FALLBACK));
    }
}
