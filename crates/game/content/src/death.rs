//! End-of-game narration.

use game_core::GameRng;

const BY_RAT: &[&str] = &[
    "The rats overwhelm you in the darkness...",
    "Tiny teeth and claws prove your undoing.",
    "Death by a thousand tiny bites.",
    "The vermin claim another victim.",
];

const BY_GOBLIN: &[&str] = &[
    "The goblin's blade finds your heart.",
    "Outsmarted by a goblin. How embarrassing.",
    "The goblin cackles as you fall.",
    "Green skin, sharp blade, your end.",
];

const BY_ORC: &[&str] = &[
    "The orc's massive club crushes you.",
    "Brute force wins this day.",
    "The orc roars in victory.",
    "You are no match for orcish strength.",
];

const BY_SKELETON: &[&str] = &[
    "The skeleton's bony fingers squeeze the life from you.",
    "Death comes for you... literally.",
    "Bones rattle as you fall.",
    "The undead claim another soul.",
];

/// `{killer}` is replaced with the killer's name.
const BY_OTHER: &[&str] = &[
    "You have been slain by {killer}.",
    "The {killer} proves too strong.",
    "{killer} stands victorious over your corpse.",
    "Your journey ends at the hands of {killer}.",
];

const HINTS_EARLY: &[&str] = &[
    "Tip: Use corridors to fight enemies one at a time.",
    "Tip: Save health potions for emergencies.",
    "Tip: Press '?' to view controls.",
    "Tip: Don't let enemies surround you.",
];

const HINTS_MID: &[&str] = &[
    "Tip: Some enemies are best avoided.",
    "Tip: Explore thoroughly for better items.",
    "Tip: Learn enemy patterns to survive.",
    "Tip: Retreat is sometimes the best option.",
];

const HINTS_LATE: &[&str] = &[
    "Tip: The deeper you go, the deadlier it gets.",
    "Tip: Boss enemies require special tactics.",
    "Tip: Manage your resources carefully.",
    "You were so close! Try again?",
];

const EPITAPHS: &[&str] = &[
    "Here lies an adventurer, brave but foolish.",
    "Another soul lost to the dungeon.",
    "They came seeking glory, found only death.",
    "R.I.P. - Really Incompetent Player",
    "Died as they lived: poorly.",
    "At least you tried.",
    "The dungeon hungers for more...",
    "Your bones will warn the next adventurer.",
];

const EPITAPH_CHANCE: f32 = 0.3;

/// What the narrator knows about a death.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeathContext {
    pub killer: Option<String>,
    pub floor: u32,
    pub turns_alive: u64,
    pub enemies_killed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathReport {
    /// Empty when the killer is unknown.
    pub message: String,
    pub hint: String,
    pub epitaph: Option<String>,
}

fn killer_lines(killer: &str) -> Option<&'static [&'static str]> {
    match killer.to_lowercase().as_str() {
        "rat" => Some(BY_RAT),
        "goblin" => Some(BY_GOBLIN),
        "orc" => Some(BY_ORC),
        "skeleton" => Some(BY_SKELETON),
        _ => None,
    }
}

fn pick(lines: &'static [&'static str], rng: &mut GameRng) -> &'static str {
    rng.choose(lines).copied().unwrap_or_default()
}

pub fn death_message(killer: &str, rng: &mut GameRng) -> String {
    match killer_lines(killer) {
        Some(lines) => pick(lines, rng).to_owned(),
        None => pick(BY_OTHER, rng).replacen("{killer}", killer, 1),
    }
}

pub fn progress_hint(floor: u32, rng: &mut GameRng) -> &'static str {
    let lines = match floor {
        0..=3 => HINTS_EARLY,
        4..=7 => HINTS_MID,
        _ => HINTS_LATE,
    };
    pick(lines, rng)
}

pub fn epitaph(rng: &mut GameRng) -> Option<&'static str> {
    rng.chance(EPITAPH_CHANCE).then(|| pick(EPITAPHS, rng))
}

/// Message, hint and optional epitaph, drawn in that order.
pub fn compose_death_report(context: &DeathContext, rng: &mut GameRng) -> DeathReport {
    let message = context
        .killer
        .as_deref()
        .map(|killer| death_message(killer, rng))
        .unwrap_or_default();
    let hint = progress_hint(context.floor, rng).to_owned();
    let epitaph = epitaph(rng).map(str::to_owned);

    tracing::debug!(
        killer = context.killer.as_deref(),
        floor = context.floor,
        turns = context.turns_alive,
        kills = context.enemies_killed,
        "death report composed"
    );
    DeathReport {
        message,
        hint,
        epitaph,
    }
}
