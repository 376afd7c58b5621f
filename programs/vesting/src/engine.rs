use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::MAX_SCHEDULE_STEPS;
use crate::error::VestingError;
use crate::state::{Allocation, DenyList, VestingPool};

/// Current-time source supplied by the host. Must never go backwards.
pub trait TimeSource {
    fn unix_timestamp(&self) -> i64;
}

/// Moves `amount` raw units of `asset` to `to`. An `Err` means nothing moved.
pub trait AssetTransfer {
    fn transfer(&mut self, asset: &Pubkey, to: &Pubkey, amount: u64) -> Result<()>;
}

/// Asset metadata used only for display-unit reporting.
pub trait AssetMetadata {
    fn decimals(&self, asset: &Pubkey) -> Option<u8>;
}

/// Runtime knobs, persisted with the rest of the engine state.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Reject pools whose `start` is not strictly after the creation time.
    pub require_future_start: bool,
    /// Cap on generated or supplied unlock steps per pool.
    pub max_schedule_steps: u32,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.max_schedule_steps > 0 && self.max_schedule_steps as usize <= MAX_SCHEDULE_STEPS,
            VestingError::InvalidConfig
        );
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            require_future_start: false,
            max_schedule_steps: MAX_SCHEDULE_STEPS as u32,
        }
    }
}

/// Everything the engine persists.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct EngineState {
    pub admin: Pubkey,
    pub config: EngineConfig,
    /// Id handed to the next created pool.
    pub next_pool_id: u64,
    pub pools: BTreeMap<u64, VestingPool>,
    pub deny_list: DenyList,
}

impl EngineState {
    /// Checks everything the operations would have enforced on the way in.
    pub fn validate(&self) -> Result<()> {
        require!(self.admin != Pubkey::default(), VestingError::InvalidPubkey);
        self.config.validate()?;
        require!(self.next_pool_id > 0, VestingError::InvalidConfig);
        let max_steps = self.config.max_schedule_steps as usize;
        for (id, pool) in self.pools.iter() {
            require!(
                *id == pool.id && *id > 0 && *id < self.next_pool_id,
                VestingError::InvalidConfig
            );
            pool.validate(max_steps)?;
        }
        Ok(())
    }
}

/// Owns all pools, allocations and the deny-list.
///
/// Every mutating operation takes `&mut self`, so operations on one engine are
/// serialized; hosts sharing an engine across threads put it behind a mutex.
pub struct VestingEngine<C: TimeSource> {
    pub(crate) state: EngineState,
    pub(crate) clock: C,
}

impl<C: TimeSource> VestingEngine<C> {
    pub fn new(admin: Pubkey, config: EngineConfig, clock: C) -> Result<Self> {
        require!(admin != Pubkey::default(), VestingError::InvalidPubkey);
        config.validate()?;
        msg!("vesting engine initialized, admin {}", admin);
        Ok(Self {
            state: EngineState {
                admin,
                config,
                next_pool_id: 1,
                pools: BTreeMap::new(),
                deny_list: DenyList::default(),
            },
            clock,
        })
    }

    /// Rebuilds an engine from bytes produced by [`VestingEngine::snapshot`].
    ///
    /// Bytes that decode but describe a state the operations could never have
    /// produced are rejected as well.
    pub fn restore(bytes: &[u8], clock: C) -> Result<Self> {
        let mut buf = bytes;
        let state =
            EngineState::deserialize(&mut buf).map_err(|_| VestingError::SnapshotCorrupt)?;
        require!(buf.is_empty(), VestingError::SnapshotCorrupt);
        if let Err(err) = state.validate() {
            msg!("snapshot rejected: {}", err);
            return Err(VestingError::SnapshotCorrupt.into());
        }
        Ok(Self { state, clock })
    }

    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.state
            .serialize(&mut out)
            .map_err(|_| VestingError::SnapshotCorrupt)?;
        Ok(out)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn admin(&self) -> Pubkey {
        self.state.admin
    }

    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    pub fn now(&self) -> i64 {
        self.clock.unix_timestamp()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pool(&self, pool_id: u64) -> Result<&VestingPool> {
        Ok(self
            .state
            .pools
            .get(&pool_id)
            .ok_or(VestingError::PoolNotFound)?)
    }

    pub fn pool_ids(&self) -> Vec<u64> {
        self.state.pools.keys().copied().collect()
    }

    pub fn allocation(&self, pool_id: u64, beneficiary: &Pubkey) -> Result<&Allocation> {
        Ok(self
            .pool(pool_id)?
            .allocations
            .get(beneficiary)
            .ok_or(VestingError::AllocationNotFound)?)
    }

    pub fn is_blocked(&self, identity: &Pubkey) -> bool {
        self.state.deny_list.contains(identity)
    }

    pub(crate) fn pool_mut(&mut self, pool_id: u64) -> Result<&mut VestingPool> {
        Ok(self
            .state
            .pools
            .get_mut(&pool_id)
            .ok_or(VestingError::PoolNotFound)?)
    }

    pub(crate) fn max_steps(&self) -> usize {
        self.state.config.max_schedule_steps as usize
    }

    /// Capability guard for administrative operations.
    pub(crate) fn require_admin(&self, signer: &Pubkey) -> Result<()> {
        require_keys_eq!(*signer, self.state.admin, VestingError::Unauthorized);
        Ok(())
    }
}
