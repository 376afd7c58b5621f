use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;

impl<C: TimeSource> VestingEngine<C> {
    /// Adds `identity` to, or removes it from, the global deny-list.
    pub fn set_blocked(&mut self, signer: &Pubkey, identity: Pubkey, blocked: bool) -> Result<()> {
        self.require_admin(signer)?;
        require!(identity != Pubkey::default(), VestingError::InvalidPubkey);
        let changed = self.state.deny_list.set(identity, blocked);
        if changed {
            emit!(BlockedSet { identity, blocked });
        }
        Ok(())
    }
}

#[event]
pub struct BlockedSet {
    pub identity: Pubkey,
    pub blocked: bool,
}
