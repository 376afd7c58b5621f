use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::{
    BPS_DENOMINATOR, MAX_CALENDAR_TS, MAX_MONTH_GAP, MAX_POOL_NAME_LEN, MIN_CALENDAR_TS,
};
use crate::error::VestingError;
use crate::state::Allocation;
use crate::utils::time;

/// Unlock table for schedule-driven strategies (Monthly, Custom).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UnlockSchedule {
    /// Strictly ascending unlock boundaries (unix seconds).
    pub timestamps: Vec<i64>,
    /// Bps released at each boundary, parallel to `timestamps`.
    pub unlock_bps: Vec<u16>,
    /// Prefix sums of `unlock_bps`; `cumulative_bps[i]` covers steps `0..=i`.
    pub cumulative_bps: Vec<u64>,
}

impl UnlockSchedule {
    /// Validates and builds a schedule from caller-supplied parallel arrays.
    pub fn new(timestamps: Vec<i64>, unlock_bps: Vec<u16>, max_steps: usize) -> Result<Self> {
        require!(!timestamps.is_empty(), VestingError::InvalidConfig);
        require!(timestamps.len() <= max_steps, VestingError::InvalidConfig);
        require!(
            timestamps.len() == unlock_bps.len(),
            VestingError::InvalidConfig
        );
        require!(
            timestamps.windows(2).all(|w| w[0] < w[1]),
            VestingError::InvalidConfig
        );
        require!(
            unlock_bps.iter().all(|&bps| bps as u64 <= BPS_DENOMINATOR),
            VestingError::InvalidConfig
        );

        let mut cumulative_bps = Vec::with_capacity(unlock_bps.len());
        let mut sum: u64 = 0;
        for &bps in unlock_bps.iter() {
            sum = sum
                .checked_add(bps as u64)
                .ok_or(VestingError::MathOverflow)?;
            cumulative_bps.push(sum);
        }

        Ok(Self {
            timestamps,
            unlock_bps,
            cumulative_bps,
        })
    }

    /// Re-checks a stored table, prefix sums included.
    pub fn validate(&self, max_steps: usize) -> Result<()> {
        let rebuilt = Self::new(self.timestamps.clone(), self.unlock_bps.clone(), max_steps)?;
        require!(
            rebuilt.cumulative_bps == self.cumulative_bps,
            VestingError::InvalidConfig
        );
        Ok(())
    }

    /// Calendar-month table anchored at `cliff`: step `k` (1-based) unlocks at
    /// `cliff + k * month_gap` months. Every step releases `unlock_per_interval`
    /// bps except the last, which releases whatever is left of 100%.
    pub fn monthly(
        cliff: i64,
        unlock_per_interval: u16,
        month_gap: u32,
        max_steps: usize,
    ) -> Result<Self> {
        require!(unlock_per_interval > 0, VestingError::InvalidConfig);
        require!(
            month_gap > 0 && month_gap <= MAX_MONTH_GAP,
            VestingError::InvalidConfig
        );
        require!(
            (MIN_CALENDAR_TS..=MAX_CALENDAR_TS).contains(&cliff),
            VestingError::InvalidConfig
        );

        let per_step = unlock_per_interval as u64;
        let steps = BPS_DENOMINATOR.div_ceil(per_step) as usize;
        require!(steps <= max_steps, VestingError::InvalidConfig);

        let mut timestamps = Vec::with_capacity(steps);
        let mut unlock_bps = Vec::with_capacity(steps);
        let mut cumulative: u64 = 0;
        let mut k: i64 = 0;
        while cumulative < BPS_DENOMINATOR {
            k += 1;
            let boundary = time::add_months(cliff, k * month_gap as i64);
            let step = per_step.min(BPS_DENOMINATOR - cumulative);
            timestamps.push(boundary);
            unlock_bps.push(step as u16);
            cumulative += step;
        }

        Self::new(timestamps, unlock_bps, max_steps)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Cumulative bps after the first `steps` boundaries.
    pub fn bps_after(&self, steps: usize) -> u64 {
        match steps.min(self.cumulative_bps.len()) {
            0 => 0,
            n => self.cumulative_bps[n - 1],
        }
    }
}

/// Strategy parameters as supplied at pool creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum StrategyConfig {
    Linear {
        duration: i64,
    },
    Interval {
        interval_length: i64,
        unlock_per_interval: u16,
    },
    Monthly {
        unlock_per_interval: u16,
        month_gap: u32,
    },
    Custom {
        timestamps: Vec<i64>,
        unlock_bps: Vec<u16>,
    },
}

/// Strategy as stored on a pool. The variant never changes after creation.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum VestingStrategy {
    /// Straight line from `cliff` to `cliff + duration`.
    Linear { duration: i64 },
    /// Fixed-length steps starting at `cliff`.
    Interval {
        interval_length: i64,
        unlock_per_interval: u16,
    },
    /// Calendar-month steps generated from `cliff`.
    Monthly {
        unlock_per_interval: u16,
        month_gap: u32,
        schedule: UnlockSchedule,
    },
    /// Arbitrary ascending unlock table.
    Custom { schedule: UnlockSchedule },
}

impl VestingStrategy {
    pub fn build(config: StrategyConfig, cliff: i64, max_steps: usize) -> Result<Self> {
        match config {
            StrategyConfig::Linear { duration } => {
                require!(duration >= 0, VestingError::InvalidConfig);
                Ok(Self::Linear { duration })
            }
            StrategyConfig::Interval {
                interval_length,
                unlock_per_interval,
            } => {
                require!(interval_length > 0, VestingError::InvalidConfig);
                require!(unlock_per_interval > 0, VestingError::InvalidConfig);
                Ok(Self::Interval {
                    interval_length,
                    unlock_per_interval,
                })
            }
            StrategyConfig::Monthly {
                unlock_per_interval,
                month_gap,
            } => Ok(Self::Monthly {
                unlock_per_interval,
                month_gap,
                schedule: UnlockSchedule::monthly(
                    cliff,
                    unlock_per_interval,
                    month_gap,
                    max_steps,
                )?,
            }),
            StrategyConfig::Custom {
                timestamps,
                unlock_bps,
            } => Ok(Self::Custom {
                schedule: UnlockSchedule::new(timestamps, unlock_bps, max_steps)?,
            }),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Interval { .. } => "interval",
            Self::Monthly { .. } => "monthly",
            Self::Custom { .. } => "custom",
        }
    }
}

/// Instruction input for `create_pool`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    pub name: String,
    pub asset: Pubkey,
    pub start: i64,
    pub cliff_duration: i64,
    pub initial_unlock_bps: u16,
    pub revocable: bool,
    pub strategy: StrategyConfig,
}

/// Instruction input for `modify_pool`. `None` leaves a field untouched.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolUpdate {
    pub cliff_duration: Option<i64>,
    pub start: Option<i64>,
    /// Linear `duration` or Interval `interval_length`.
    pub duration: Option<i64>,
    pub initial_unlock_bps: Option<u16>,
    /// Custom pools only; must be supplied together with `unlock_bps`.
    pub timestamps: Option<Vec<i64>>,
    pub unlock_bps: Option<Vec<u16>>,
}

/// A vesting pool and every allocation granted in it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VestingPool {
    pub id: u64,
    pub name: String,
    /// Vested asset (mint).
    pub asset: Pubkey,
    /// Vesting start (unix seconds).
    pub start: i64,
    pub cliff_duration: i64,
    /// `start + cliff_duration`, kept in sync on every edit.
    pub cliff: i64,
    /// Released at `start`, in bps of each grant.
    pub initial_unlock_bps: u16,
    pub revocable: bool,
    /// Serving flag: paused pools release nothing and are skipped by claims.
    pub paused: bool,
    pub strategy: VestingStrategy,
    pub allocations: BTreeMap<Pubkey, Allocation>,
}

impl VestingPool {
    pub fn new(id: u64, config: PoolConfig, max_steps: usize) -> Result<Self> {
        validate_name(&config.name)?;
        require!(config.asset != Pubkey::default(), VestingError::InvalidPubkey);
        validate_initial_unlock(config.initial_unlock_bps)?;
        let cliff = cliff_of(config.start, config.cliff_duration)?;
        let strategy = VestingStrategy::build(config.strategy, cliff, max_steps)?;

        Ok(Self {
            id,
            name: config.name,
            asset: config.asset,
            start: config.start,
            cliff_duration: config.cliff_duration,
            cliff,
            initial_unlock_bps: config.initial_unlock_bps,
            revocable: config.revocable,
            paused: false,
            strategy,
            allocations: BTreeMap::new(),
        })
    }

    /// Returns a copy of this pool with `update` applied. `self` is left
    /// untouched so the caller can vet the result before swapping it in.
    pub fn with_update(&self, update: &PoolUpdate, max_steps: usize) -> Result<Self> {
        let mut next = self.clone();

        if let Some(start) = update.start {
            next.start = start;
        }
        if let Some(cliff_duration) = update.cliff_duration {
            next.cliff_duration = cliff_duration;
        }
        next.cliff = cliff_of(next.start, next.cliff_duration)?;

        if let Some(bps) = update.initial_unlock_bps {
            validate_initial_unlock(bps)?;
            next.initial_unlock_bps = bps;
        }

        let custom_table = match (&update.timestamps, &update.unlock_bps) {
            (None, None) => None,
            (Some(ts), Some(bps)) => Some((ts.clone(), bps.clone())),
            _ => return Err(VestingError::InvalidConfig.into()),
        };

        next.strategy = match (&self.strategy, update.duration, custom_table) {
            (VestingStrategy::Linear { duration }, new_duration, None) => {
                let duration = new_duration.unwrap_or(*duration);
                require!(duration >= 0, VestingError::InvalidConfig);
                VestingStrategy::Linear { duration }
            }
            (
                VestingStrategy::Interval {
                    interval_length,
                    unlock_per_interval,
                },
                new_length,
                None,
            ) => {
                let interval_length = new_length.unwrap_or(*interval_length);
                require!(interval_length > 0, VestingError::InvalidConfig);
                VestingStrategy::Interval {
                    interval_length,
                    unlock_per_interval: *unlock_per_interval,
                }
            }
            (
                VestingStrategy::Monthly {
                    unlock_per_interval,
                    month_gap,
                    schedule,
                },
                None,
                None,
            ) => {
                // Boundaries hang off the cliff; regenerate only when it moved.
                let schedule = if next.cliff == self.cliff {
                    schedule.clone()
                } else {
                    UnlockSchedule::monthly(
                        next.cliff,
                        *unlock_per_interval,
                        *month_gap,
                        max_steps,
                    )?
                };
                VestingStrategy::Monthly {
                    unlock_per_interval: *unlock_per_interval,
                    month_gap: *month_gap,
                    schedule,
                }
            }
            (VestingStrategy::Custom { schedule }, None, table) => match table {
                Some((ts, bps)) => VestingStrategy::Custom {
                    schedule: UnlockSchedule::new(ts, bps, max_steps)?,
                },
                None => VestingStrategy::Custom {
                    schedule: schedule.clone(),
                },
            },
            _ => return Err(VestingError::InvalidConfig.into()),
        };

        Ok(next)
    }

    /// Re-checks every rule `new` and `with_update` enforce, for pools that did
    /// not come through them (restored snapshots).
    pub fn validate(&self, max_steps: usize) -> Result<()> {
        validate_name(&self.name)?;
        require!(self.asset != Pubkey::default(), VestingError::InvalidPubkey);
        validate_initial_unlock(self.initial_unlock_bps)?;
        require!(
            cliff_of(self.start, self.cliff_duration)? == self.cliff,
            VestingError::InvalidConfig
        );

        match &self.strategy {
            VestingStrategy::Linear { duration } => {
                require!(*duration >= 0, VestingError::InvalidConfig);
            }
            VestingStrategy::Interval {
                interval_length,
                unlock_per_interval,
            } => {
                require!(*interval_length > 0, VestingError::InvalidConfig);
                require!(*unlock_per_interval > 0, VestingError::InvalidConfig);
            }
            VestingStrategy::Monthly {
                unlock_per_interval,
                month_gap,
                schedule,
            } => {
                let expected = UnlockSchedule::monthly(
                    self.cliff,
                    *unlock_per_interval,
                    *month_gap,
                    max_steps,
                )?;
                require!(*schedule == expected, VestingError::InvalidConfig);
            }
            VestingStrategy::Custom { schedule } => schedule.validate(max_steps)?,
        }

        for allocation in self.allocations.values() {
            require!(
                allocation.total_granted > 0
                    && allocation.distributed_amount <= allocation.total_granted,
                VestingError::InvalidAllocation
            );
        }
        Ok(())
    }

    /// Allocation that still participates in vesting (present and not removed).
    pub fn live_allocation(&self, beneficiary: &Pubkey) -> Option<&Allocation> {
        self.allocations.get(beneficiary).filter(|a| !a.disabled)
    }
}

fn validate_name(name: &str) -> Result<()> {
    require!(!name.is_empty(), VestingError::InvalidConfig);
    require!(name.len() <= MAX_POOL_NAME_LEN, VestingError::InvalidConfig);
    Ok(())
}

fn validate_initial_unlock(bps: u16) -> Result<()> {
    require!(bps as u64 <= BPS_DENOMINATOR, VestingError::InvalidConfig);
    Ok(())
}

fn cliff_of(start: i64, cliff_duration: i64) -> Result<i64> {
    require!(cliff_duration >= 0, VestingError::InvalidConfig);
    Ok(start
        .checked_add(cliff_duration)
        .ok_or(VestingError::MathOverflow)?)
}
