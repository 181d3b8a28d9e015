use thiserror::Error;

/// Failures surfaced by the simulation core.
///
/// None of these are fatal to the process; callers decide whether to
/// continue. Unset-buffer preconditions are unrepresentable under
/// ownership, so only the range conditions remain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    /// An address fell outside the buffer it indexes.
    #[error("address {address:#06X} out of range (limit {limit:#06X})")]
    AddressOutOfRange { address: usize, limit: usize },

    /// The overflow recovery shift would move the payload start below
    /// address zero.
    #[error("payload overflow: shifting start {start_address:#06X} back by {shift} bytes leaves no valid start")]
    AddressOverflow { start_address: usize, shift: usize },

    /// Every page table entry already has its PRESENT bit set.
    #[error("page table exhausted, no free entry available")]
    AllocationExhausted,
}
