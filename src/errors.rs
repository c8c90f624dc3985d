//! Failure kinds of the sorted positions registry.
//!
//! Components fail by panicking, which reverts the whole transaction. Every check in the
//! registry panics with the message of one of these kinds before touching any state, so
//! callers and tests can tell the kinds apart by the leading kind name.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// A mutating call without a proof of the authority badge.
    Unauthorized,
    /// A second attempt to bind the authority.
    AlreadyInitialized,
    /// The reserved empty id used as a position id.
    ZeroIdentifier,
    /// Inserting an id that is already in the list.
    DuplicateIdentifier,
    /// A risk score of zero (or below), which cannot be ordered.
    ZeroRiskScore,
    /// Removing or re-inserting an id that is not in the list.
    NotAMember,
    /// Inserting into a list that holds `max_size` positions.
    ListFull,
    /// A capacity of zero, or below the current size.
    InvalidMaxSize,
    /// A risk score lookup before any source was bound.
    RiskScoreSourceNotSet,
}

impl RegistryError {
    pub const fn message(&self) -> &'static str {
        match self {
            RegistryError::Unauthorized => {
                "Unauthorized: a proof of the registry authority badge is required"
            }
            RegistryError::AlreadyInitialized => {
                "AlreadyInitialized: the registry authority is already bound"
            }
            RegistryError::ZeroIdentifier => {
                "ZeroIdentifier: the empty position id cannot be a member"
            }
            RegistryError::DuplicateIdentifier => {
                "DuplicateIdentifier: position is already in the list"
            }
            RegistryError::ZeroRiskScore => "ZeroRiskScore: risk score must be positive",
            RegistryError::NotAMember => "NotAMember: position is not in the list",
            RegistryError::ListFull => "ListFull: the list holds its maximum number of positions",
            RegistryError::InvalidMaxSize => {
                "InvalidMaxSize: max size must be positive and not below the current size"
            }
            RegistryError::RiskScoreSourceNotSet => {
                "RiskScoreSourceNotSet: no risk score source has been bound"
            }
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
