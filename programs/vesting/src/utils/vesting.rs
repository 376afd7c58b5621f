//! Cumulative vested amount for one allocation under its pool's strategy.
//!
//! All amounts are raw asset units; products are taken in `u128` and the result
//! never exceeds `total_granted`.

use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::error::VestingError;
use crate::state::{Allocation, VestingPool, VestingStrategy};
use crate::utils::schedule_index::steps_elapsed;

/// Amount of `allocation` unlocked at `now`.
///
/// Revoked allocations are frozen at what was already paid out.
pub fn vested_amount(pool: &VestingPool, allocation: &Allocation, now: i64) -> Result<u64> {
    let total = allocation.total_granted;
    let initial = bps_of(total, pool.initial_unlock_bps as u64)?;

    if allocation.revoked {
        return Ok(allocation.distributed_amount.min(total));
    }
    if now < pool.start {
        return Ok(0);
    }
    if now < pool.cliff {
        return Ok(initial);
    }

    let remaining = total - initial;
    let since_cliff = (now as i128 - pool.cliff as i128) as u128;

    let unlocked_bps: u128 = match &pool.strategy {
        VestingStrategy::Linear { duration } => {
            let duration = *duration as u128;
            if since_cliff >= duration {
                return Ok(total);
            }
            let linear = (remaining as u128)
                .checked_mul(since_cliff)
                .ok_or(VestingError::MathOverflow)?
                / duration;
            return to_u64(initial as u128 + linear).map(|v| v.min(total));
        }
        VestingStrategy::Interval {
            interval_length,
            unlock_per_interval,
        } => {
            let steps = since_cliff / (*interval_length as u128);
            steps.saturating_mul(*unlock_per_interval as u128)
        }
        VestingStrategy::Monthly {
            unlock_per_interval,
            schedule,
            ..
        } => {
            let steps = steps_elapsed(&schedule.timestamps, now) as u128;
            steps.saturating_mul(*unlock_per_interval as u128)
        }
        VestingStrategy::Custom { schedule } => {
            let steps = steps_elapsed(&schedule.timestamps, now);
            schedule.bps_after(steps) as u128
        }
    };

    step_vested(total, initial, unlocked_bps)
}

/// Vested minus already distributed; never negative.
pub fn releasable_amount(pool: &VestingPool, allocation: &Allocation, now: i64) -> Result<u64> {
    let vested = vested_amount(pool, allocation, now)?;
    Ok(vested.saturating_sub(allocation.distributed_amount))
}

fn step_vested(total: u64, initial: u64, unlocked_bps: u128) -> Result<u64> {
    if unlocked_bps >= BPS_DENOMINATOR as u128 {
        return Ok(total);
    }
    let remaining = (total - initial) as u128;
    let stepped = remaining
        .checked_mul(unlocked_bps)
        .ok_or(VestingError::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    to_u64(initial as u128 + stepped).map(|v| v.min(total))
}

/// `amount * bps / 10_000`, truncating.
pub fn bps_of(amount: u64, bps: u64) -> Result<u64> {
    let v = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(VestingError::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    to_u64(v)
}

fn to_u64(v: u128) -> Result<u64> {
    Ok(u64::try_from(v).map_err(|_| VestingError::MathOverflow)?)
}
