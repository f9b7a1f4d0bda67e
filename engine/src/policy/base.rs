// engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::{Game, SlideMove};

/// Policy chooses the slide to play before the pending row is inserted.
///
/// Returns `None` to play the turn without sliding.
///
/// Object-safe so it can be used as `Box<dyn Policy>`.
pub trait Policy {
    fn choose_move(&mut self, g: &Game) -> Option<SlideMove>;
}

/// Never slides; every turn just takes the incoming row.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn choose_move(&mut self, _g: &Game) -> Option<SlideMove> {
        None
    }
}
