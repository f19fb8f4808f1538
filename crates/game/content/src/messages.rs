//! Ambient narration and warnings.

use game_core::GameRng;

/// A line with a relative weight, available from `min_floor` down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightedLine {
    pub text: &'static str,
    pub weight: u32,
    pub min_floor: u32,
}

const fn line(text: &'static str, weight: u32, min_floor: u32) -> WeightedLine {
    WeightedLine {
        text,
        weight,
        min_floor,
    }
}

pub const AMBIENT: &[WeightedLine] = &[
    line("Water drips somewhere in the darkness...", 2, 1),
    line("You hear skittering in the walls.", 2, 1),
    line("A cold draft chills your bones.", 1, 1),
    line("The air feels heavy and oppressive.", 1, 1),
    line("Strange shadows dance at the edge of your vision.", 1, 1),
    line("You hear distant echoes of... something.", 1, 1),
    line("The walls seem to close in around you.", 1, 3),
    line("An unnatural silence fills the air.", 1, 1),
    line("You smell decay and ancient dust.", 1, 1),
    line("Your footsteps echo ominously.", 2, 1),
    line("Something moves in the shadows...", 1, 5),
    line("The darkness feels alive.", 1, 7),
    line("You sense you're being watched.", 1, 4),
    line("Ancient stonework crumbles at your touch.", 1, 1),
    line("Cobwebs brush against your face.", 1, 1),
];

pub const LOW_HEALTH: &[&str] = &[
    "Your wounds ache terribly.",
    "You're badly injured.",
    "Blood drips from your wounds.",
    "You need healing, badly.",
    "Your vision blurs from pain.",
];

/// Weighted pick among the lines unlocked on `floor`.
pub fn ambient_line(floor: u32, rng: &mut GameRng) -> Option<&'static str> {
    let unlocked = || AMBIENT.iter().filter(move |line| floor >= line.min_floor);
    let total: u32 = unlocked().map(|line| line.weight).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.range(0, total - 1);
    for line in unlocked() {
        if roll < line.weight {
            return Some(line.text);
        }
        roll -= line.weight;
    }
    None
}

pub fn low_health_line(rng: &mut GameRng) -> &'static str {
    rng.choose(LOW_HEALTH).copied().unwrap_or(LOW_HEALTH[0])
}
