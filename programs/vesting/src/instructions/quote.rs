use anchor_lang::prelude::*;

use crate::engine::{AssetMetadata, TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::state::VestingPool;
use crate::utils::vesting;

/// One allocation as seen by operators.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationView {
    pub beneficiary: Pubkey,
    pub claimed: u64,
    pub remaining: u64,
    pub revoked: bool,
    pub disabled: bool,
}

/// A beneficiary's position in one pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolPosition {
    pub pool_id: u64,
    pub pool_name: String,
    pub asset: Pubkey,
    pub claimed: u64,
    pub remaining: u64,
    pub releasable: u64,
    /// `claimed` in whole display units; `None` if the asset's decimals are unknown.
    pub claimed_ui: Option<u64>,
    pub remaining_ui: Option<u64>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WalletSummary {
    pub beneficiary: Pubkey,
    pub blacklisted: bool,
    /// Raw-unit sums across every pool, whatever the asset.
    pub total_claimed: u64,
    pub total_remaining: u64,
    pub pools: Vec<PoolPosition>,
}

impl<C: TimeSource> VestingEngine<C> {
    /// Vested amount of one allocation at the current time.
    pub fn vested_amount(&self, pool_id: u64, beneficiary: &Pubkey) -> Result<u64> {
        let pool = self.pool(pool_id)?;
        let allocation = pool
            .allocations
            .get(beneficiary)
            .ok_or(VestingError::AllocationNotFound)?;
        vesting::vested_amount(pool, allocation, self.now())
    }

    /// What a claim on this pool alone would pay right now.
    /// Paused pools and removed allocations release nothing.
    pub fn releasable_amount(&self, pool_id: u64, beneficiary: &Pubkey) -> Result<u64> {
        let pool = self.pool(pool_id)?;
        let allocation = pool
            .allocations
            .get(beneficiary)
            .ok_or(VestingError::AllocationNotFound)?;
        if pool.paused || allocation.disabled {
            return Ok(0);
        }
        vesting::releasable_amount(pool, allocation, self.now())
    }

    pub fn allocations_for_pool(&self, pool_id: u64) -> Result<Vec<AllocationView>> {
        let pool = self.pool(pool_id)?;
        Ok(pool
            .allocations
            .iter()
            .map(|(beneficiary, a)| AllocationView {
                beneficiary: *beneficiary,
                claimed: a.distributed_amount,
                remaining: a.remaining(),
                revoked: a.revoked,
                disabled: a.disabled,
            })
            .collect())
    }

    pub fn wallet_summary<M: AssetMetadata + ?Sized>(
        &self,
        beneficiary: &Pubkey,
        metadata: &M,
    ) -> Result<WalletSummary> {
        let now = self.now();
        let mut summary = WalletSummary {
            beneficiary: *beneficiary,
            blacklisted: self.is_blocked(beneficiary),
            total_claimed: 0,
            total_remaining: 0,
            pools: Vec::new(),
        };

        for pool in self.state.pools.values() {
            let Some(allocation) = pool.allocations.get(beneficiary) else {
                continue;
            };
            let releasable = if pool.paused || allocation.disabled {
                0
            } else {
                vesting::releasable_amount(pool, allocation, now)?
            };
            let entry = position(
                pool,
                allocation.distributed_amount,
                allocation.remaining(),
                releasable,
                metadata,
            );

            summary.total_claimed = summary
                .total_claimed
                .checked_add(entry.claimed)
                .ok_or(VestingError::MathOverflow)?;
            summary.total_remaining = summary
                .total_remaining
                .checked_add(entry.remaining)
                .ok_or(VestingError::MathOverflow)?;
            summary.pools.push(entry);
        }

        Ok(summary)
    }

    /// Emits the current vesting position of one allocation as an event.
    pub fn emit_vesting_quote(&self, pool_id: u64, beneficiary: Pubkey) -> Result<()> {
        let pool = self.pool(pool_id)?;
        let allocation = pool
            .allocations
            .get(&beneficiary)
            .ok_or(VestingError::AllocationNotFound)?;
        let vested = vesting::vested_amount(pool, allocation, self.now())?;
        let releasable = self.releasable_amount(pool_id, &beneficiary)?;

        emit!(VestingQuote {
            pool_id,
            beneficiary,
            vested_amount: vested,
            distributed_amount: allocation.distributed_amount,
            releasable,
        });
        Ok(())
    }
}

fn position<M: AssetMetadata + ?Sized>(
    pool: &VestingPool,
    claimed: u64,
    remaining: u64,
    releasable: u64,
    metadata: &M,
) -> PoolPosition {
    let decimals = metadata.decimals(&pool.asset);
    PoolPosition {
        pool_id: pool.id,
        pool_name: pool.name.clone(),
        asset: pool.asset,
        claimed,
        remaining,
        releasable,
        claimed_ui: decimals.map(|d| to_display_units(claimed, d)),
        remaining_ui: decimals.map(|d| to_display_units(remaining, d)),
    }
}

/// `amount / 10^decimals`, truncating. Reporting only, never accounting.
pub fn to_display_units(amount: u64, decimals: u8) -> u64 {
    match 10u64.checked_pow(decimals as u32) {
        Some(scale) => amount / scale,
        None => 0,
    }
}

#[event]
pub struct VestingQuote {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub vested_amount: u64,
    pub distributed_amount: u64,
    pub releasable: u64,
}
