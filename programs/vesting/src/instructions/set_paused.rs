use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};

impl<C: TimeSource> VestingEngine<C> {
    /// Stops (or resumes) serving a pool. Accrual continues while paused;
    /// only releases are withheld.
    pub fn set_paused(&mut self, signer: &Pubkey, pool_id: u64, paused: bool) -> Result<()> {
        self.require_admin(signer)?;
        let pool = self.pool_mut(pool_id)?;
        pool.paused = paused;
        emit!(PoolPauseSet { pool_id, paused });
        Ok(())
    }
}

#[event]
pub struct PoolPauseSet {
    pub pool_id: u64,
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::*;
    use crate::error::VestingError;
    use crate::state::{PoolConfig, StrategyConfig};

    #[test]
    fn pause_withholds_but_keeps_accruing() {
        let admin = Pubkey::new_unique();
        let clock = ManualClock::at(0);
        let mut e = engine(admin, &clock);
        let id = e
            .create_pool(
                &admin,
                PoolConfig {
                    name: "ops".to_string(),
                    asset: Pubkey::new_unique(),
                    start: 0,
                    cliff_duration: 0,
                    initial_unlock_bps: 0,
                    revocable: false,
                    strategy: StrategyConfig::Linear { duration: 100 },
                },
            )
            .unwrap();
        let bob = Pubkey::new_unique();
        e.add_allocation(&admin, id, bob, 100).unwrap();

        e.set_paused(&admin, id, true).unwrap();
        clock.set(40);
        assert_eq!(e.releasable_amount(id, &bob).unwrap(), 0);

        e.set_paused(&admin, id, false).unwrap();
        assert_eq!(e.releasable_amount(id, &bob).unwrap(), 40);

        assert_eq!(
            e.set_paused(&bob, id, true).unwrap_err(),
            anchor_err(VestingError::Unauthorized)
        );
        assert_eq!(
            e.set_paused(&admin, 42, true).unwrap_err(),
            anchor_err(VestingError::PoolNotFound)
        );
    }
}
