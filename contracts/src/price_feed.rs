//! Admin-driven price feed quoting the stablecoin in CSPR value units.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::mock_errors::MockError;
use crate::types::RoundData;

#[odra::module]
pub struct PriceFeed {
    admin: Var<Address>,
    answer: Var<U256>,
    decimals: Var<u8>,
    round_id: Var<u64>,
    started_at: Var<u64>,
    updated_at: Var<u64>,
}

#[odra::module]
impl PriceFeed {
    pub fn init(&mut self, answer: U256, decimals: u8) {
        let now = self.env().get_block_time();
        self.admin.set(self.env().caller());
        self.answer.set(answer);
        self.decimals.set(decimals);
        self.round_id.set(1);
        self.started_at.set(now);
        self.updated_at.set(now);
    }

    /// Publish a new round (admin only)
    pub fn set_answer(&mut self, answer: U256) {
        if self.admin.get() != Some(self.env().caller()) {
            self.env().revert(MockError::Unauthorized);
        }
        let now = self.env().get_block_time();
        self.answer.set(answer);
        self.round_id.set(self.round_id.get().unwrap_or_default() + 1);
        self.started_at.set(now);
        self.updated_at.set(now);
    }

    pub fn latest_round_data(&self) -> RoundData {
        let round_id = self.round_id.get().unwrap_or_default();
        if round_id == 0 {
            self.env().revert(MockError::NotInitialized);
        }
        RoundData {
            round_id,
            answer: self.answer.get().unwrap_or_default(),
            started_at: self.started_at.get().unwrap_or_default(),
            updated_at: self.updated_at.get().unwrap_or_default(),
            answered_in_round: round_id,
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals.get().unwrap_or(18)
    }
}
