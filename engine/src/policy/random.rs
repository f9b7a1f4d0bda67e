// engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::{Game, SlideMove};

use super::base::Policy;

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose_move(&mut self, g: &Game) -> Option<SlideMove> {
        let ids = g.valid_move_ids();
        let &mid = ids.choose(&mut self.rng)?;
        Some(SlideMove::from_id(mid))
    }
}
