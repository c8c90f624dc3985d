//! Defines events emitted by the sorted positions registry.
//!
//! Indexers and the liquidation/redemption engines follow these to track list changes
//! without re-scanning the list.

use scrypto::prelude::*;

/// Event emitted when a position is linked into the list, by `insert` or by the second half of `re_insert`.
#[derive(ScryptoSbor, ScryptoEvent, Clone)]
pub struct EventNodeAdded {
    /// The `NonFungibleLocalId` of the position that was added.
    pub id: NonFungibleLocalId,
    /// The risk score the position was ordered by.
    pub risk_score: Decimal,
}

/// Event emitted when a position is unlinked from the list, by `remove` or by the first half of `re_insert`.
#[derive(ScryptoSbor, ScryptoEvent, Clone)]
pub struct EventNodeRemoved {
    /// The `NonFungibleLocalId` of the position that was removed.
    pub id: NonFungibleLocalId,
}

/// Event emitted once, when the registry authority is bound.
#[derive(ScryptoSbor, ScryptoEvent, Clone)]
pub struct EventAuthoritySet {
    /// The badge whose proof is required for every list mutation.
    pub authority_badge: ResourceAddress,
    /// The component queried for live risk scores.
    pub risk_score_source: ComponentAddress,
}

#[derive(ScryptoSbor, ScryptoEvent, Clone)]
pub struct EventMaxSizeChanged {
    pub max_size: u64,
}
