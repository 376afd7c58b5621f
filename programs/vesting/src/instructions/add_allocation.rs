use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;
use crate::state::{Allocation, AllocationInput};

impl<C: TimeSource> VestingEngine<C> {
    /// Whitelists `beneficiary` in a pool with a grant of `total_granted`.
    pub fn add_allocation(
        &mut self,
        signer: &Pubkey,
        pool_id: u64,
        beneficiary: Pubkey,
        total_granted: u64,
    ) -> Result<()> {
        self.add_allocations(
            signer,
            pool_id,
            &[AllocationInput {
                beneficiary,
                total_granted,
            }],
        )
    }

    /// Whitelists a batch of beneficiaries. Either every entry is added or none is.
    pub fn add_allocations(
        &mut self,
        signer: &Pubkey,
        pool_id: u64,
        inputs: &[AllocationInput],
    ) -> Result<()> {
        self.require_admin(signer)?;
        require!(!inputs.is_empty(), VestingError::InvalidAllocation);
        let now = self.now();
        let pool = self.pool_mut(pool_id)?;

        let mut seen = BTreeSet::new();
        for input in inputs.iter() {
            require!(
                input.beneficiary != Pubkey::default(),
                VestingError::InvalidPubkey
            );
            require!(input.total_granted > 0, VestingError::InvalidAllocation);
            // A removed record still counts: beneficiaries are never re-added.
            require!(
                !pool.allocations.contains_key(&input.beneficiary),
                VestingError::AlreadyWhitelisted
            );
            require!(
                seen.insert(input.beneficiary),
                VestingError::AlreadyWhitelisted
            );
        }

        for input in inputs.iter() {
            pool.allocations
                .insert(input.beneficiary, Allocation::new(input.total_granted, now));
            emit!(AllocationAdded {
                pool_id,
                beneficiary: input.beneficiary,
                total_granted: input.total_granted,
                join_time: now,
            });
        }

        Ok(())
    }
}

#[event]
pub struct AllocationAdded {
    pub pool_id: u64,
    pub beneficiary: Pubkey,
    pub total_granted: u64,
    pub join_time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::state::{PoolConfig, StrategyConfig};

    fn setup() -> (VestingEngine<ManualClock>, Pubkey, u64) {
        let admin = Pubkey::new_unique();
        let clock = ManualClock::at(1_234);
        let mut e = engine(admin, &clock);
        let id = e
            .create_pool(
                &admin,
                PoolConfig {
                    name: "seed".to_string(),
                    asset: Pubkey::new_unique(),
                    start: 0,
                    cliff_duration: 0,
                    initial_unlock_bps: 0,
                    revocable: true,
                    strategy: StrategyConfig::Linear { duration: 10 },
                },
            )
            .unwrap();
        (e, admin, id)
    }

    #[test]
    fn records_join_time() {
        let (mut e, admin, id) = setup();
        let alice = Pubkey::new_unique();
        e.add_allocation(&admin, id, alice, 500).unwrap();
        let a = e.allocation(id, &alice).unwrap();
        assert_eq!(*a, Allocation::new(500, 1_234));
    }

    #[test]
    fn rejects_duplicates_and_bad_input() {
        let (mut e, admin, id) = setup();
        let alice = Pubkey::new_unique();
        e.add_allocation(&admin, id, alice, 500).unwrap();
        assert_eq!(
            e.add_allocation(&admin, id, alice, 1).unwrap_err(),
            anchor_err(VestingError::AlreadyWhitelisted)
        );
        assert_eq!(
            e.add_allocation(&admin, id, Pubkey::default(), 1).unwrap_err(),
            anchor_err(VestingError::InvalidPubkey)
        );
        assert_eq!(
            e.add_allocation(&admin, id, Pubkey::new_unique(), 0).unwrap_err(),
            anchor_err(VestingError::InvalidAllocation)
        );
        assert_eq!(
            e.add_allocation(&alice, id, Pubkey::new_unique(), 1).unwrap_err(),
            anchor_err(VestingError::Unauthorized)
        );
        assert_eq!(
            e.add_allocation(&admin, 9, Pubkey::new_unique(), 1).unwrap_err(),
            anchor_err(VestingError::PoolNotFound)
        );
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let (mut e, admin, id) = setup();
        let bob = Pubkey::new_unique();
        let carol = Pubkey::new_unique();
        let batch = [
            AllocationInput {
                beneficiary: bob,
                total_granted: 10,
            },
            AllocationInput {
                beneficiary: carol,
                total_granted: 20,
            },
            AllocationInput {
                beneficiary: bob,
                total_granted: 30,
            },
        ];
        assert_eq!(
            e.add_allocations(&admin, id, &batch).unwrap_err(),
            anchor_err(VestingError::AlreadyWhitelisted)
        );
        assert!(e.allocation(id, &carol).is_err());

        e.add_allocations(&admin, id, &batch[..2]).unwrap();
        assert_eq!(e.allocation(id, &carol).unwrap().total_granted, 20);
    }

    #[test]
    fn removed_beneficiary_cannot_rejoin() {
        let (mut e, admin, id) = setup();
        let dave = Pubkey::new_unique();
        e.add_allocation(&admin, id, dave, 100).unwrap();
        e.remove_allocation(&admin, id, dave).unwrap();
        assert_eq!(
            e.add_allocation(&admin, id, dave, 100).unwrap_err(),
            anchor_err(VestingError::AlreadyWhitelisted)
        );
    }
}
