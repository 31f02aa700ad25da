use crate::commands::{CmdMessage, CmdResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// Small prompts to take a walk somewhere unplanned.
pub const NUDGES: [&str; 8] = [
    "Turn left at the next corner",
    "Find three blue things",
    "Head toward the sound of water",
    "Stop and look at the color of the sky",
    "At the next fork, take the way you never choose",
    "Follow a smell that catches your attention",
    "Walk briskly for just five minutes",
    "Find somewhere to sit and take a deep breath",
];

pub fn run<R: Rng + ?Sized>(rng: &mut R) -> CmdResult {
    let mut result = CmdResult::default();
    if let Some(nudge) = NUDGES.choose(rng) {
        result.add_message(CmdMessage::info(*nudge));
    }
    result
}
