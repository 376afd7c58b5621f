use std::collections::BTreeSet;

use anchor_lang::prelude::*;

/// Identities barred from claiming, whatever their allocations say.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DenyList {
    blocked: BTreeSet<Pubkey>,
}

impl DenyList {
    /// Returns true if membership changed.
    pub fn set(&mut self, identity: Pubkey, blocked: bool) -> bool {
        if blocked {
            self.blocked.insert(identity)
        } else {
            self.blocked.remove(&identity)
        }
    }

    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.blocked.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }
}
