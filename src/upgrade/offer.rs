//! Upgrade offers and their application
//!
//! An [`UpgradeOffer`] is built fresh for every query from the current tier
//! index and the stored level. Applying it charges the cost and raises the
//! stored level by one; the host applies the returned effect.

use thiserror::Error;

use crate::formula::EvalError;
use crate::save::{LevelStore, StoreError};
use crate::tiers::{Dimension, DimensionIndex, Quote, UpgradeValues};

/// Why a [`Payment`] collaborator refused a withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("no account for this payer")]
    NoAccount,
    /// Any other refusal, with the collaborator's own message
    #[error("{0}")]
    Rejected(String),
}

/// Money collaborator
pub trait Payment {
    fn has(&self, payer: &str, amount: i64) -> bool;

    /// Take `amount` from `payer`
    fn withdraw(&self, payer: &str, amount: i64) -> Result<(), PaymentError>;
}

/// Island facts bound into formulas
pub trait IslandInfo {
    /// Island level, `None` when no level provider is installed
    fn island_level(&self, island_id: &str) -> Option<i64>;

    fn member_count(&self, island_id: &str) -> i64;
}

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("{payer} could not pay {amount}: {source}")]
    Withdraw {
        payer: String,
        amount: i64,
        source: PaymentError,
    },
    #[error("level changed since the offer was made (offered at {offered}, now {current})")]
    Stale { offered: i64, current: i64 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// The next step of one dimension for one island
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOffer {
    pub dimension: Dimension,
    pub namespace: String,
    pub upgrade_name: String,
    pub current_level: i64,
    pub max_level: i64,
    pub tier_id: String,
    pub tier_name: String,
    pub permission_level: i32,
    pub quote: Quote,
    pub values: UpgradeValues,
}

impl UpgradeOffer {
    /// Offer for `dimension` at `current_level`. `Ok(None)` means fully upgraded.
    pub fn new(
        index: &DimensionIndex,
        dimension: &Dimension,
        namespace: &str,
        current_level: i64,
        island_level: i64,
        players: i64,
    ) -> Result<Option<Self>, EvalError> {
        let Some(tier) = index.resolve_tier(dimension, namespace, current_level) else {
            return Ok(None);
        };
        let quote = tier.quote(current_level, island_level, players)?;
        Ok(Some(Self {
            dimension: dimension.clone(),
            namespace: namespace.to_string(),
            upgrade_name: dimension.upgrade_name(),
            current_level,
            max_level: index.max_level(dimension, namespace),
            tier_id: tier.id.clone(),
            tier_name: tier.tier_name.clone(),
            permission_level: tier.permission_level,
            quote,
            values: quote.truncated(),
        }))
    }

    /// Offer for an island, reading its stored level and island facts
    pub fn for_island(
        index: &DimensionIndex,
        dimension: &Dimension,
        namespace: &str,
        island_id: &str,
        store: &dyn LevelStore,
        island: &dyn IslandInfo,
    ) -> Result<Option<Self>, UpgradeError> {
        let level = store.get_progress_level(island_id, &dimension.upgrade_name())?;
        let island_level = island.island_level(island_id).unwrap_or(0);
        let players = island.member_count(island_id);
        Ok(Self::new(index, dimension, namespace, level, island_level, players)?)
    }
}

/// Whether the offer can be bought: the island level (when known) must reach
/// the gate, and the payer (when a payment collaborator exists) must afford it
pub fn can_upgrade(offer: &UpgradeOffer, island_level: Option<i64>, payer: &str, payment: Option<&dyn Payment>) -> bool {
    if let Some(level) = island_level {
        if level < offer.values.island_level {
            return false;
        }
    }
    if let Some(payment) = payment {
        if !payment.has(payer, offer.values.cost) {
            return false;
        }
    }
    true
}

/// Charge the offer and raise the stored level by one. Returns the effect
/// magnitude for the host to apply.
pub fn apply_upgrade(
    offer: &UpgradeOffer,
    island_id: &str,
    payer: &str,
    store: &dyn LevelStore,
    payment: Option<&dyn Payment>,
) -> Result<i64, UpgradeError> {
    let current = store.get_progress_level(island_id, &offer.upgrade_name)?;
    if current != offer.current_level {
        return Err(UpgradeError::Stale {
            offered: offer.current_level,
            current,
        });
    }

    if let Some(payment) = payment {
        if let Err(source) = payment.withdraw(payer, offer.values.cost) {
            log::warn!("Upgrade {} for {}: withdraw failed: {}", offer.upgrade_name, payer, source);
            return Err(UpgradeError::Withdraw {
                payer: payer.to_string(),
                amount: offer.values.cost,
                source,
            });
        }
    }

    store.set_progress_level(island_id, &offer.upgrade_name, current + 1)?;
    log::info!(
        "{} upgraded {} on {} to level {}",
        payer,
        offer.upgrade_name,
        island_id,
        current + 1
    );
    Ok(offer.values.effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parse;
    use crate::save::MemoryLevelStore;
    use crate::tiers::{Tier, UNBOUNDED};
    use parking_lot::Mutex;

    struct Wallet(Mutex<i64>);

    impl Payment for Wallet {
        fn has(&self, _payer: &str, amount: i64) -> bool {
            *self.0.lock() >= amount
        }

        fn withdraw(&self, _payer: &str, amount: i64) -> Result<(), PaymentError> {
            let mut balance = self.0.lock();
            if *balance < amount {
                return Err(PaymentError::InsufficientFunds);
            }
            *balance -= amount;
            Ok(())
        }
    }

    struct Island;

    impl IslandInfo for Island {
        fn island_level(&self, _island_id: &str) -> Option<i64> {
            Some(12)
        }

        fn member_count(&self, _island_id: &str) -> i64 {
            3
        }
    }

    fn make_index() -> DimensionIndex {
        let mut index = DimensionIndex::new();
        index.range.default.insert(Tier {
            effect: parse("10").unwrap(),
            min_secondary_level: parse("[level] * 5").unwrap(),
            cost: parse("[level] * 100 + [numberPlayer] * 0.5").unwrap(),
            ..Tier::new("tier1", 2)
        });
        index.record_max_level(&Dimension::Range, None, 2);
        index
    }

    #[test]
    fn test_offer_values() {
        let index = make_index();
        let offer = UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 1, 0, 3)
            .unwrap()
            .unwrap();

        assert_eq!(offer.upgrade_name, "RangeUpgrade");
        assert_eq!(offer.max_level, 2);
        assert_eq!(offer.tier_id, "tier1");
        assert!((offer.quote.cost - 101.5).abs() < 1e-9);
        assert_eq!(offer.values, UpgradeValues { island_level: 5, cost: 101, effect: 10 });
    }

    #[test]
    fn test_fully_upgraded_has_no_offer() {
        let index = make_index();
        assert_eq!(UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 3, 0, 1), Ok(None));
    }

    #[test]
    fn test_can_upgrade_checks() {
        let index = make_index();
        let offer = UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 2, 0, 1)
            .unwrap()
            .unwrap();
        let rich = Wallet(Mutex::new(1_000));
        let poor = Wallet(Mutex::new(10));

        assert!(can_upgrade(&offer, Some(10), "alice", Some(&rich)));
        assert!(!can_upgrade(&offer, Some(9), "alice", Some(&rich)));
        assert!(!can_upgrade(&offer, Some(10), "alice", Some(&poor)));
        assert!(can_upgrade(&offer, None, "alice", None));
    }

    #[test]
    fn test_apply_walks_to_maxed() {
        let index = make_index();
        let store = MemoryLevelStore::new();
        let wallet = Wallet(Mutex::new(1_000));

        let offer = UpgradeOffer::for_island(&index, &Dimension::Range, "BSkyBlock", "island-1", &store, &Island)
            .unwrap()
            .unwrap();
        assert_eq!(offer.current_level, 0);
        assert_eq!(apply_upgrade(&offer, "island-1", "alice", &store, Some(&wallet)).unwrap(), 10);
        assert_eq!(*wallet.0.lock(), 1_000 - 1);

        for expected in [1, 2] {
            let offer = UpgradeOffer::for_island(&index, &Dimension::Range, "BSkyBlock", "island-1", &store, &Island)
                .unwrap()
                .unwrap();
            assert_eq!(offer.current_level, expected);
            apply_upgrade(&offer, "island-1", "alice", &store, None).unwrap();
        }

        let done = UpgradeOffer::for_island(&index, &Dimension::Range, "BSkyBlock", "island-1", &store, &Island).unwrap();
        assert!(done.is_none());
        assert_eq!(store.get_progress_level("island-1", "RangeUpgrade"), Ok(3));
    }

    #[test]
    fn test_failed_withdraw_keeps_level() {
        let index = make_index();
        let store = MemoryLevelStore::new();
        store.set_progress_level("island-1", "RangeUpgrade", 2).unwrap();
        let wallet = Wallet(Mutex::new(5));

        let offer = UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 2, 0, 1)
            .unwrap()
            .unwrap();
        let result = apply_upgrade(&offer, "island-1", "alice", &store, Some(&wallet));

        assert!(matches!(
            result,
            Err(UpgradeError::Withdraw { amount: 200, source: PaymentError::InsufficientFunds, .. })
        ));
        assert_eq!(store.get_progress_level("island-1", "RangeUpgrade"), Ok(2));
        assert_eq!(*wallet.0.lock(), 5);
    }

    #[test]
    fn test_stale_offer_rejected() {
        let index = make_index();
        let store = MemoryLevelStore::new();
        let offer = UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 0, 0, 1)
            .unwrap()
            .unwrap();
        store.set_progress_level("island-1", "RangeUpgrade", 1).unwrap();

        assert!(matches!(
            apply_upgrade(&offer, "island-1", "alice", &store, None),
            Err(UpgradeError::Stale { offered: 0, current: 1 })
        ));
    }

    #[test]
    fn test_unbounded_tier_never_maxes() {
        let mut index = DimensionIndex::new();
        index.range.default.insert(Tier {
            effect: parse("1").unwrap(),
            ..Tier::new("forever", UNBOUNDED)
        });
        let offer = UpgradeOffer::new(&index, &Dimension::Range, "BSkyBlock", 10_000, 0, 1).unwrap();
        assert_eq!(offer.map(|o| o.max_level), Some(0));
    }
}
