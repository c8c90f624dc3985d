//! # Sorted Positions shared structs
//! Structs used by the registry blueprint and by the components that read it.

use scrypto::prelude::*;

/// Link data of one position in the sorted list.
///
/// Presence of a `Node` in the registry's store is what makes an id a member;
/// the node itself only records its neighbors.
#[derive(ScryptoSbor, Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// The neighbor closer to the head (higher or equal risk score), `None` for the head itself.
    pub prev_id: Option<NonFungibleLocalId>,
    /// The neighbor closer to the tail (lower or equal risk score), `None` for the tail itself.
    pub next_id: Option<NonFungibleLocalId>,
}

/// Direction to walk the list in.
#[derive(ScryptoSbor, ManifestSbor, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalDirection {
    /// From the safest position (highest risk score) towards the riskiest.
    HeadToTail,
    /// From the riskiest position (lowest risk score) towards the safest.
    TailToHead,
}

/// A summarized view of the registry, returned by `get_registry_info`.
#[derive(ScryptoSbor, Clone, Debug, PartialEq, Eq)]
pub struct RegistryInfo {
    /// The safest position, `None` if the list is empty.
    pub head: Option<NonFungibleLocalId>,
    /// The riskiest position, `None` if the list is empty.
    pub tail: Option<NonFungibleLocalId>,
    /// Number of positions currently in the list.
    pub size: u64,
    /// Capacity of the list.
    pub max_size: u64,
    /// Resource address of the badge that authorizes mutations, once bound.
    pub authority_badge: Option<ResourceAddress>,
    /// Component queried for live risk scores, once bound.
    pub risk_score_source: Option<ComponentAddress>,
}

/// The on-ledger spelling of "no position". Position receipts are numbered from 1,
/// so `#0#` never names a real position and can never be a member.
pub fn empty_position_id() -> NonFungibleLocalId {
    NonFungibleLocalId::integer(0)
}

/// Whether `id` is the reserved empty id.
pub fn is_empty_position_id(id: &NonFungibleLocalId) -> bool {
    *id == empty_position_id()
}
