use anchor_lang::prelude::*;

/// A beneficiary's grant inside one pool.
///
/// Records are never deleted: removal only sets `disabled`, so the
/// beneficiary cannot be whitelisted into the same pool again.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Full grant, in raw asset units.
    pub total_granted: u64,
    /// Amount already paid out.
    pub distributed_amount: u64,
    /// When the beneficiary was whitelisted (unix seconds).
    pub join_time: i64,
    /// Frozen at `distributed_amount` once set.
    pub revoked: bool,
    pub revoke_time: i64,
    /// Soft-removed; kept as a historical record.
    pub disabled: bool,
}

impl Allocation {
    pub fn new(total_granted: u64, join_time: i64) -> Self {
        Self {
            total_granted,
            distributed_amount: 0,
            join_time,
            revoked: false,
            revoke_time: 0,
            disabled: false,
        }
    }

    /// Grant not yet paid out. Revoked and removed allocations have nothing left.
    pub fn remaining(&self) -> u64 {
        if self.revoked || self.disabled {
            return 0;
        }
        self.total_granted.saturating_sub(self.distributed_amount)
    }
}

/// Instruction input (beneficiary + grant).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationInput {
    pub beneficiary: Pubkey,
    pub total_granted: u64,
}
