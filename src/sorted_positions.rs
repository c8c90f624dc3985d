#![allow(deprecated)]

//! # The Sorted Positions Blueprint
//!
//! This blueprint defines the ordered registry of open positions (CDPs) that liquidations,
//! redemptions and interest accrual walk through. Positions are kept in a doubly linked list,
//! ordered by risk score in non-increasing order: the head is the safest position, the tail is
//! the riskiest one.
//!
//! ## Overview
//! - **No stored scores:** The registry only stores links. Whenever it has to compare positions
//!   it asks the bound risk score source for the *current* score of each position it looks at.
//! - **Single authority:** All mutations (`insert`, `remove`, `re_insert`) require a proof of one
//!   authority badge, bound once through `set_authority`. Every read is public.
//! - **Hinted insertion:** Callers pass the neighbors they expect the position to land between.
//!   A correct hint costs a constant number of score lookups. A stale or wrong hint is repaired
//!   by walking the list from the hint, or from the head when the hint is unusable.
//! - **Staleness:** Scores drift (prices move, interest accrues) without the list noticing.
//!   A position only moves when `re_insert` is called for it, so the order is the order at the
//!   time each position was last (re-)inserted. `get_riskiest_positions` returns live scores
//!   so callers can re-check before acting.
//!
//! ## Interaction with Other Components
//! - **Risk score source:** Usually the position manager. Exposes a method taking a
//!   `NonFungibleLocalId` and returning a `Decimal` score. `Decimal::MAX` marks a position
//!   without debt. The method must not call back into this registry.
//! - **Liquidation / redemption engines, indexers:** Read the list from either end and follow
//!   the `EventNodeAdded` / `EventNodeRemoved` events.

use crate::errors::RegistryError;
use crate::events::*;
use crate::shared_structs::*;
use scrypto::prelude::*;

#[blueprint]
#[types(NonFungibleLocalId, Node)]
#[events(
    EventNodeAdded,
    EventNodeRemoved,
    EventAuthoritySet,
    EventMaxSizeChanged,
)]
mod sorted_positions {
    enable_method_auth! {
        methods {
            set_authority => restrict_to: [OWNER];
            set_max_size => restrict_to: [OWNER];
            insert => PUBLIC;
            remove => PUBLIC;
            re_insert => PUBLIC;
            find_insert_position => PUBLIC;
            valid_insert_position => PUBLIC;
            contains => PUBLIC;
            is_empty => PUBLIC;
            is_full => PUBLIC;
            get_size => PUBLIC;
            get_max_size => PUBLIC;
            get_first => PUBLIC;
            get_last => PUBLIC;
            get_prev => PUBLIC;
            get_next => PUBLIC;
            get_positions => PUBLIC;
            get_riskiest_positions => PUBLIC;
            get_registry_info => PUBLIC;
            get_authority => PUBLIC;
        }
    }

    struct SortedPositions {
        /// Links of every member, keyed by position id. An id is a member iff it has an entry here.
        nodes: KeyValueStore<NonFungibleLocalId, Node>,
        /// The position with the highest risk score.
        head: Option<NonFungibleLocalId>,
        /// The position with the lowest risk score.
        tail: Option<NonFungibleLocalId>,
        /// Number of members. Zero iff `head` and `tail` are both `None`.
        size: u64,
        /// Capacity of the list.
        max_size: u64,
        /// Badge required to mutate the list. Bound once.
        authority_badge: Option<ResourceAddress>,
        /// Component queried for live risk scores. Bound together with the authority.
        risk_score_source: Option<ComponentAddress>,
        /// Method called on `risk_score_source`, taking a `NonFungibleLocalId` and returning a `Decimal`.
        risk_score_method_name: String,
    }

    impl SortedPositions {
        /// Instantiates an empty registry.
        ///
        /// The registry cannot be mutated until `set_authority` has been called by the owner.
        ///
        /// # Arguments
        /// * `owner_role`: The `OwnerRole` guarding configuration (`set_authority`, `set_max_size`).
        ///   It does not grant list mutation rights. Must be a real role: with `OwnerRole::None`
        ///   nobody can call `set_authority`, and the list stays empty and immutable forever.
        ///
        /// # Returns
        /// * `Global<SortedPositions>`: A global reference to the new registry.
        pub fn instantiate(owner_role: OwnerRole) -> Global<SortedPositions> {
            Self {
                nodes: KeyValueStore::new_with_registered_type(),
                head: None,
                tail: None,
                size: 0,
                max_size: u64::MAX,
                authority_badge: None,
                risk_score_source: None,
                risk_score_method_name: String::new(),
            }
            .instantiate()
            .prepare_to_globalize(owner_role)
            .metadata(metadata! {
                init {
                    "name" => "Sorted Positions".to_string(), updatable;
                    "description" => "Registry of open positions, ordered by risk score".to_string(), updatable;
                    "info_url" => Url::of("https://flux.ilikeitstable.com"), updatable;
                }
            })
            .globalize()
        }

        /// Binds the single authority allowed to mutate the list, and the component that
        /// provides its risk scores.
        ///
        /// # Arguments
        /// * `authority_badge`: Resource address of the badge whose proof every mutation requires.
        /// * `risk_score_source`: Component queried for live risk scores.
        /// * `risk_score_method_name`: Method of `risk_score_source` returning the score of a position.
        ///
        /// # Panics
        /// * `AlreadyInitialized` if the authority has been bound before.
        pub fn set_authority(
            &mut self,
            authority_badge: ResourceAddress,
            risk_score_source: ComponentAddress,
            risk_score_method_name: String,
        ) {
            assert!(
                self.authority_badge.is_none(),
                "{}",
                RegistryError::AlreadyInitialized
            );

            self.authority_badge = Some(authority_badge);
            self.risk_score_source = Some(risk_score_source);
            self.risk_score_method_name = risk_score_method_name;

            Runtime::emit_event(EventAuthoritySet {
                authority_badge,
                risk_score_source,
            });
        }

        /// Set the maximum number of positions the list may hold.
        ///
        /// # Panics
        /// * `InvalidMaxSize` if `new_max_size` is zero or below the current size.
        pub fn set_max_size(&mut self, new_max_size: u64) {
            assert!(
                new_max_size > 0 && new_max_size >= self.size,
                "{}",
                RegistryError::InvalidMaxSize
            );
            self.max_size = new_max_size;

            Runtime::emit_event(EventMaxSizeChanged {
                max_size: new_max_size,
            });
        }

        /// Inserts a position into the list at the place its risk score dictates.
        ///
        /// The hint is revalidated against live scores. If it no longer fits, the correct
        /// place is searched for, starting from the hint where possible.
        ///
        /// # Arguments
        /// * `authority_proof`: A proof of the authority badge.
        /// * `id`: The position to insert.
        /// * `risk_score`: The position's current risk score. Should match what the risk score
        ///   source reports for `id`, as later searches compare other positions against that.
        /// * `hint_prev_id`: Expected neighbor closer to the head, `None` to hint at the head.
        /// * `hint_next_id`: Expected neighbor closer to the tail, `None` to hint at the tail.
        ///
        /// # Panics
        /// * `Unauthorized`, `ZeroIdentifier`, `DuplicateIdentifier`, `ZeroRiskScore`, `ListFull`.
        pub fn insert(
            &mut self,
            authority_proof: Proof,
            id: NonFungibleLocalId,
            risk_score: Decimal,
            hint_prev_id: Option<NonFungibleLocalId>,
            hint_next_id: Option<NonFungibleLocalId>,
        ) {
            self.check_authority(authority_proof);
            assert!(!is_empty_position_id(&id), "{}", RegistryError::ZeroIdentifier);
            assert!(!self.is_member(&id), "{}", RegistryError::DuplicateIdentifier);
            assert!(risk_score > Decimal::ZERO, "{}", RegistryError::ZeroRiskScore);
            assert!(self.size < self.max_size, "{}", RegistryError::ListFull);

            self.link(id, risk_score, hint_prev_id, hint_next_id);
        }

        /// Removes a position from the list, linking its former neighbors to each other.
        ///
        /// # Panics
        /// * `Unauthorized`, or `NotAMember` if `id` is not in the list.
        pub fn remove(&mut self, authority_proof: Proof, id: NonFungibleLocalId) {
            self.check_authority(authority_proof);
            assert!(self.is_member(&id), "{}", RegistryError::NotAMember);

            self.unlink(&id);
        }

        /// Moves a position to the place its new risk score dictates.
        ///
        /// Same as `remove` followed by `insert` with the same arguments, within one call:
        /// `EventNodeRemoved` is emitted first, then `EventNodeAdded`. Hints are validated
        /// against the list without `id` in it.
        ///
        /// # Panics
        /// * `Unauthorized`, `ZeroIdentifier`, `NotAMember`, `ZeroRiskScore`. All checks run
        ///   before the position is unlinked.
        pub fn re_insert(
            &mut self,
            authority_proof: Proof,
            id: NonFungibleLocalId,
            new_risk_score: Decimal,
            hint_prev_id: Option<NonFungibleLocalId>,
            hint_next_id: Option<NonFungibleLocalId>,
        ) {
            self.check_authority(authority_proof);
            assert!(!is_empty_position_id(&id), "{}", RegistryError::ZeroIdentifier);
            assert!(self.is_member(&id), "{}", RegistryError::NotAMember);
            assert!(new_risk_score > Decimal::ZERO, "{}", RegistryError::ZeroRiskScore);

            self.unlink(&id);
            self.link(id, new_risk_score, hint_prev_id, hint_next_id);
        }

        /// Finds the neighbors a position with `risk_score` would be inserted between.
        ///
        /// Used off-ledger to compute hints before calling `insert` / `re_insert`. The result
        /// is only good for the list state it was computed on; mutating calls revalidate it.
        ///
        /// # Returns
        /// * `(Option<NonFungibleLocalId>, Option<NonFungibleLocalId>)`: the previous and next
        ///   neighbor, `None` at the respective end of the list.
        pub fn find_insert_position(
            &self,
            risk_score: Decimal,
            hint_prev_id: Option<NonFungibleLocalId>,
            hint_next_id: Option<NonFungibleLocalId>,
        ) -> (Option<NonFungibleLocalId>, Option<NonFungibleLocalId>) {
            self.resolve_position(risk_score, hint_prev_id, hint_next_id)
        }

        /// Checks whether a position with `risk_score` may be inserted between `prev_id` and `next_id`.
        ///
        /// A pair is valid when the two are adjacent (or `None` at the matching end of the list)
        /// and `score(prev_id) >= risk_score >= score(next_id)` by live scores. `(None, None)` is
        /// valid exactly when the list is empty.
        pub fn valid_insert_position(
            &self,
            risk_score: Decimal,
            prev_id: Option<NonFungibleLocalId>,
            next_id: Option<NonFungibleLocalId>,
        ) -> bool {
            self.is_valid_position(risk_score, &prev_id, &next_id)
        }

        pub fn contains(&self, id: NonFungibleLocalId) -> bool {
            self.is_member(&id)
        }

        pub fn is_empty(&self) -> bool {
            self.size == 0
        }

        pub fn is_full(&self) -> bool {
            self.size == self.max_size
        }

        pub fn get_size(&self) -> u64 {
            self.size
        }

        pub fn get_max_size(&self) -> u64 {
            self.max_size
        }

        /// The safest position (highest risk score at insertion), `None` if the list is empty.
        pub fn get_first(&self) -> Option<NonFungibleLocalId> {
            self.head.clone()
        }

        /// The riskiest position (lowest risk score at insertion), `None` if the list is empty.
        pub fn get_last(&self) -> Option<NonFungibleLocalId> {
            self.tail.clone()
        }

        /// The neighbor of `id` closer to the head. `None` for the head and for non-members.
        pub fn get_prev(&self, id: NonFungibleLocalId) -> Option<NonFungibleLocalId> {
            self.prev_of(&id)
        }

        /// The neighbor of `id` closer to the tail. `None` for the tail and for non-members.
        pub fn get_next(&self, id: NonFungibleLocalId) -> Option<NonFungibleLocalId> {
            self.next_of(&id)
        }

        /// Retrieves up to `count` position ids, walking the list in `direction`.
        ///
        /// # Arguments
        /// * `start`: The position to start from (included in the result). `None` starts at the
        ///   head for `HeadToTail` and at the tail for `TailToHead`.
        /// * `direction`: The direction to walk in.
        /// * `count`: The maximum number of ids to return.
        ///
        /// # Returns
        /// * `Vec<NonFungibleLocalId>`: The ids in walking order. Empty if `start` is not a member.
        pub fn get_positions(
            &self,
            start: Option<NonFungibleLocalId>,
            direction: TraversalDirection,
            count: u64,
        ) -> Vec<NonFungibleLocalId> {
            let mut positions: Vec<NonFungibleLocalId> = vec![];

            let mut current = match start {
                Some(id) if self.is_member(&id) => Some(id),
                Some(_) => None,
                None => match direction {
                    TraversalDirection::HeadToTail => self.head.clone(),
                    TraversalDirection::TailToHead => self.tail.clone(),
                },
            };

            while let Some(id) = current {
                if positions.len() as u64 >= count {
                    break;
                }
                current = match direction {
                    TraversalDirection::HeadToTail => self.next_of(&id),
                    TraversalDirection::TailToHead => self.prev_of(&id),
                };
                positions.push(id);
            }

            positions
        }

        /// Retrieves up to `count` of the riskiest positions, starting at the tail, each with
        /// its live risk score.
        ///
        /// Scores may have drifted since the positions were inserted, so the returned scores
        /// are not necessarily in order. Liquidation and redemption engines should act on the
        /// live score, not on the list position.
        pub fn get_riskiest_positions(&self, count: u64) -> Vec<(NonFungibleLocalId, Decimal)> {
            self.get_positions(None, TraversalDirection::TailToHead, count)
                .into_iter()
                .map(|id| {
                    let risk_score = self.risk_score(&id);
                    (id, risk_score)
                })
                .collect()
        }

        pub fn get_registry_info(&self) -> RegistryInfo {
            RegistryInfo {
                head: self.head.clone(),
                tail: self.tail.clone(),
                size: self.size,
                max_size: self.max_size,
                authority_badge: self.authority_badge,
                risk_score_source: self.risk_score_source,
            }
        }

        pub fn get_authority(&self) -> Option<ResourceAddress> {
            self.authority_badge
        }

        // -------------------------------------------------------------------------------------
        // Helpers
        // -------------------------------------------------------------------------------------

        /// Panics with `Unauthorized` unless `authority_proof` proves a non-zero amount of the
        /// bound authority badge. Also panics if no authority has been bound yet.
        fn check_authority(&self, authority_proof: Proof) {
            let authority_badge = match self.authority_badge {
                Some(authority_badge) => authority_badge,
                None => panic!("{}", RegistryError::Unauthorized),
            };

            let authority_proof = authority_proof
                .check_with_message(authority_badge, RegistryError::Unauthorized.message());

            assert!(
                authority_proof.amount() > Decimal::ZERO,
                "{}",
                RegistryError::Unauthorized
            );
        }

        /// Live risk score of `id`, as reported by the risk score source.
        fn risk_score(&self, id: &NonFungibleLocalId) -> Decimal {
            let risk_score_source: Global<AnyComponent> = match self.risk_score_source {
                Some(address) => Global::from(address),
                None => panic!("{}", RegistryError::RiskScoreSourceNotSet),
            };

            risk_score_source.call_raw(&self.risk_score_method_name, scrypto_args!(id.clone()))
        }

        fn is_member(&self, id: &NonFungibleLocalId) -> bool {
            self.nodes.get(id).is_some()
        }

        fn node(&self, id: &NonFungibleLocalId) -> Option<Node> {
            self.nodes.get(id).map(|node| Node::clone(&node))
        }

        fn prev_of(&self, id: &NonFungibleLocalId) -> Option<NonFungibleLocalId> {
            self.node(id).and_then(|node| node.prev_id)
        }

        fn next_of(&self, id: &NonFungibleLocalId) -> Option<NonFungibleLocalId> {
            self.node(id).and_then(|node| node.next_id)
        }

        fn set_prev(&mut self, id: &NonFungibleLocalId, prev_id: Option<NonFungibleLocalId>) {
            if let Some(mut node) = self.nodes.get_mut(id) {
                node.prev_id = prev_id;
            }
        }

        fn set_next(&mut self, id: &NonFungibleLocalId, next_id: Option<NonFungibleLocalId>) {
            if let Some(mut node) = self.nodes.get_mut(id) {
                node.next_id = next_id;
            }
        }

        /// Links a new node for `id` at its resolved position and emits `EventNodeAdded`.
        /// Callers have checked that `id` is a valid non-member and that the list has room.
        fn link(
            &mut self,
            id: NonFungibleLocalId,
            risk_score: Decimal,
            hint_prev_id: Option<NonFungibleLocalId>,
            hint_next_id: Option<NonFungibleLocalId>,
        ) {
            let (prev_id, next_id) = self.resolve_position(risk_score, hint_prev_id, hint_next_id);

            self.nodes.insert(
                id.clone(),
                Node {
                    prev_id: prev_id.clone(),
                    next_id: next_id.clone(),
                },
            );

            match &prev_id {
                Some(prev) => self.set_next(prev, Some(id.clone())),
                None => self.head = Some(id.clone()),
            }
            match &next_id {
                Some(next) => self.set_prev(next, Some(id.clone())),
                None => self.tail = Some(id.clone()),
            }
            self.size += 1;

            Runtime::emit_event(EventNodeAdded { id, risk_score });
        }

        /// Unlinks `id`, deletes its node and emits `EventNodeRemoved`.
        fn unlink(&mut self, id: &NonFungibleLocalId) {
            let node = match self.nodes.remove(id) {
                Some(node) => node,
                None => panic!("{}", RegistryError::NotAMember),
            };

            match &node.prev_id {
                Some(prev) => self.set_next(prev, node.next_id.clone()),
                None => self.head = node.next_id.clone(),
            }
            match &node.next_id {
                Some(next) => self.set_prev(next, node.prev_id.clone()),
                None => self.tail = node.prev_id.clone(),
            }
            self.size -= 1;

            Runtime::emit_event(EventNodeRemoved { id: id.clone() });
        }

        /// Structural check first (adjacency / list ends), scores only when the structure fits.
        fn is_valid_position(
            &self,
            risk_score: Decimal,
            prev_id: &Option<NonFungibleLocalId>,
            next_id: &Option<NonFungibleLocalId>,
        ) -> bool {
            match (prev_id, next_id) {
                (None, None) => self.size == 0,
                (None, Some(next)) => {
                    self.head.as_ref() == Some(next) && self.risk_score(next) <= risk_score
                }
                (Some(prev), None) => {
                    self.tail.as_ref() == Some(prev) && self.risk_score(prev) >= risk_score
                }
                (Some(prev), Some(next)) => {
                    self.next_of(prev).as_ref() == Some(next)
                        && self.risk_score(prev) >= risk_score
                        && risk_score >= self.risk_score(next)
                }
            }
        }

        /// Returns the hint if it is still valid, otherwise repairs it.
        ///
        /// # Logic
        /// 1. A valid hint is returned as is.
        /// 2. A `hint_prev_id` that is a member scoring at least `risk_score` is a start for
        ///    descending towards the tail.
        /// 3. Otherwise a `hint_next_id` that is a member scoring below `risk_score` is a start
        ///    for ascending towards the head.
        /// 4. Otherwise the search descends from the head.
        ///
        /// Repaired positions always end up behind every position with an equal score that the
        /// search passes.
        fn resolve_position(
            &self,
            risk_score: Decimal,
            hint_prev_id: Option<NonFungibleLocalId>,
            hint_next_id: Option<NonFungibleLocalId>,
        ) -> (Option<NonFungibleLocalId>, Option<NonFungibleLocalId>) {
            if self.is_valid_position(risk_score, &hint_prev_id, &hint_next_id) {
                return (hint_prev_id, hint_next_id);
            }

            let descent_start = hint_prev_id
                .filter(|prev| self.is_member(prev) && self.risk_score(prev) >= risk_score);
            if descent_start.is_some() {
                debug!("Stale hint, descending from {:?}", descent_start);
                return self.descend_list(risk_score, descent_start);
            }

            let ascent_start = hint_next_id
                .filter(|next| self.is_member(next) && self.risk_score(next) < risk_score);
            if let Some(next) = ascent_start {
                debug!("Stale hint, ascending from {:?}", next);
                return self.ascend_list(risk_score, next);
            }

            debug!("Unusable hint, descending from the head");
            self.descend_list(risk_score, None)
        }

        /// Walks towards the tail from `start` (or from the head when `None`) while the next
        /// position still scores at least `risk_score`. `start` must score at least `risk_score`.
        fn descend_list(
            &self,
            risk_score: Decimal,
            start: Option<NonFungibleLocalId>,
        ) -> (Option<NonFungibleLocalId>, Option<NonFungibleLocalId>) {
            let mut next_id = match &start {
                Some(prev) => self.next_of(prev),
                None => self.head.clone(),
            };
            let mut prev_id = start;

            while let Some(next) = next_id {
                if self.risk_score(&next) < risk_score {
                    return (prev_id, Some(next));
                }
                next_id = self.next_of(&next);
                prev_id = Some(next);
            }

            (prev_id, None)
        }

        /// Walks towards the head from `start` while the previous position still scores below
        /// `risk_score`. `start` must score below `risk_score`.
        fn ascend_list(
            &self,
            risk_score: Decimal,
            start: NonFungibleLocalId,
        ) -> (Option<NonFungibleLocalId>, Option<NonFungibleLocalId>) {
            let mut prev_id = self.prev_of(&start);
            let mut next_id = start;

            while let Some(prev) = prev_id {
                if self.risk_score(&prev) >= risk_score {
                    return (Some(prev), Some(next_id));
                }
                prev_id = self.prev_of(&prev);
                next_id = prev;
            }

            (None, Some(next_id))
        }
    }
}
