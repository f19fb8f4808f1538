//! Combat message templates.
//!
//! `{enemy}` is the non-player side of the exchange; `{attacker}`, `{target}`
//! and `{damage}` are available to bystander templates.

use crate::rng::GameRng;

use super::result::AttackCategory;

const PLAYER_ABSORBED: &[&str] = &[
    "Your blow glances off the {enemy}'s hide.",
    "The {enemy} shrugs off your attack.",
];
const PLAYER_WEAK: &[&str] = &[
    "You barely scratch the {enemy}.",
    "A glancing blow to the {enemy}.",
    "You graze the {enemy}.",
    "Your weak strike connects.",
];
const PLAYER_NORMAL: &[&str] = &[
    "You strike the {enemy}!",
    "A solid hit to the {enemy}!",
    "You wound the {enemy}.",
    "Your attack finds its mark!",
];
const PLAYER_STRONG: &[&str] = &[
    "You deliver a crushing blow to the {enemy}!",
    "Critical strike against the {enemy}!",
    "You devastate the {enemy} with a powerful attack!",
    "A mighty blow sends the {enemy} reeling!",
];
const PLAYER_KILL: &[&str] = &[
    "You slay the {enemy}!",
    "The {enemy} falls before you!",
    "Victory! The {enemy} is defeated.",
    "Your final blow destroys the {enemy}.",
];

const ENEMY_ABSORBED: &[&str] = &[
    "The {enemy}'s attack bounces off your armor.",
    "You shrug off the {enemy}'s blow.",
];
const ENEMY_WEAK: &[&str] = &[
    "The {enemy} grazes you.",
    "The {enemy} barely hits you.",
    "A glancing blow from the {enemy}.",
    "The {enemy}'s weak attack connects.",
];
const ENEMY_NORMAL: &[&str] = &[
    "The {enemy} hits you!",
    "The {enemy} wounds you.",
    "You take a hit from the {enemy}.",
    "The {enemy}'s attack connects!",
];
const ENEMY_STRONG: &[&str] = &[
    "The {enemy} lands a vicious blow!",
    "Critical hit from the {enemy}!",
    "The {enemy} strikes you hard!",
    "A devastating attack from the {enemy}!",
];
const ENEMY_KILL: &[&str] = &["The {enemy} deals the killing blow!"];

fn table_pick(table: &'static [&'static str], rng: &mut GameRng) -> &'static str {
    rng.choose(table).copied().unwrap_or("")
}

/// Template for the player hitting something.
pub fn player_attack(category: AttackCategory, rng: &mut GameRng) -> &'static str {
    let table = match category {
        AttackCategory::Absorbed => PLAYER_ABSORBED,
        AttackCategory::Weak => PLAYER_WEAK,
        AttackCategory::Normal => PLAYER_NORMAL,
        AttackCategory::Strong => PLAYER_STRONG,
        AttackCategory::Kill => PLAYER_KILL,
    };
    table_pick(table, rng)
}

/// Template for something hitting the player.
pub fn enemy_attack(category: AttackCategory, rng: &mut GameRng) -> &'static str {
    let table = match category {
        AttackCategory::Absorbed => ENEMY_ABSORBED,
        AttackCategory::Weak => ENEMY_WEAK,
        AttackCategory::Normal => ENEMY_NORMAL,
        AttackCategory::Strong => ENEMY_STRONG,
        AttackCategory::Kill => ENEMY_KILL,
    };
    table_pick(table, rng)
}

/// Template for fights the player is not part of. Draws no randomness.
pub fn bystander_attack(category: AttackCategory) -> &'static str {
    match category {
        AttackCategory::Absorbed => "{attacker}'s attack bounces off {target}.",
        AttackCategory::Kill => "{attacker} kills {target}!",
        _ => "{attacker} hits {target} for {damage} damage!",
    }
}

/// Fills `{attacker}`, `{target}` and `{damage}`.
pub fn format(template: &str, attacker: &str, target: &str, damage: u32) -> String {
    template
        .replace("{attacker}", attacker)
        .replace("{target}", target)
        .replace("{damage}", &damage.to_string())
}

/// Fills `{enemy}` with a lowercase name.
pub fn format_enemy(message: &str, enemy: &str) -> String {
    message.replace("{enemy}", &enemy.to_lowercase())
}
