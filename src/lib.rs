//! # Position Registry Crate
//!
//! This crate contains the Scrypto blueprint for the ordered position registry of a CDP protocol:
//! a list of all open positions sorted by risk score, which liquidations and redemptions walk from
//! the riskiest end. Positions are ordered by scores read live from an external risk score source
//! (the position manager), and only the holder of a single authority badge can change the list.
//!
//! ## Modules
//!
//! - `sorted_positions`: Defines the `SortedPositions` component: the doubly linked list, its
//!   authority-gated mutators (`insert`, `remove`, `re_insert`), the hinted insert position search
//!   and the public read accessors.
//! - `events`: Defines the events emitted when positions are added to or removed from the list, and
//!   when the registry is configured.
//! - `errors`: Defines `RegistryError`, the failure kinds the registry panics with.
//! - `shared_structs`: Contains data structures shared between the registry and its readers, such as
//!   `Node`, `TraversalDirection` and `RegistryInfo`.

pub mod errors;
pub mod events;
pub mod shared_structs;
pub mod sorted_positions;
