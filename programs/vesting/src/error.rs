use anchor_lang::prelude::*;

/// Error codes for the grant vesting engine.
#[error_code]
pub enum VestingError {
    #[msg("Unauthorized: admin signature required")]
    Unauthorized,

    #[msg("Invalid public key")]
    InvalidPubkey,

    #[msg("Invalid pool configuration")]
    InvalidConfig,

    #[msg("Pool not found")]
    PoolNotFound,

    #[msg("Allocation not found")]
    AllocationNotFound,

    #[msg("Beneficiary already whitelisted in this pool")]
    AlreadyWhitelisted,

    #[msg("Beneficiary is not whitelisted in this pool")]
    NotWhitelisted,

    #[msg("Invalid allocation (must be > 0)")]
    InvalidAllocation,

    #[msg("New allocation is below the amount already distributed")]
    AmountBelowDistributed,

    #[msg("Pool change would vest less than already distributed")]
    VestedBelowDistributed,

    #[msg("Pool is not revocable")]
    NotRevocable,

    #[msg("Allocation is revoked")]
    AllocationRevoked,

    #[msg("Nothing to claim")]
    NothingToClaim,

    #[msg("Beneficiary is blocked")]
    Blocked,

    #[msg("Asset transfer failed")]
    TransferFailed,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Engine snapshot could not be decoded")]
    SnapshotCorrupt,
}
