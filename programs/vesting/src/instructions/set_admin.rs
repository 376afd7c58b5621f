use anchor_lang::prelude::*;

use crate::engine::{TimeSource, VestingEngine};
use crate::error::VestingError;

impl<C: TimeSource> VestingEngine<C> {
    /// Hands administration to `new_admin`. Takes effect immediately.
    pub fn set_admin(&mut self, signer: &Pubkey, new_admin: Pubkey) -> Result<()> {
        self.require_admin(signer)?;
        require!(new_admin != Pubkey::default(), VestingError::InvalidPubkey);
        require!(new_admin != self.state.admin, VestingError::InvalidConfig);

        let old_admin = self.state.admin;
        self.state.admin = new_admin;

        emit!(AdminSet {
            old_admin,
            new_admin,
        });
        Ok(())
    }
}

#[event]
pub struct AdminSet {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
}
