//! Per-floor flavour.

use game_core::GameRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorTheme {
    pub name: &'static str,
    pub description: &'static str,
    /// Shown once when the floor is entered.
    pub enter_message: &'static str,
    pub ambient: &'static [&'static str],
}

const THEMES: [FloorTheme; 10] = [
    FloorTheme {
        name: "Dungeon Entrance",
        description: "The upper levels, recently abandoned",
        enter_message: "You enter the dungeon, leaving the world above behind...",
        ambient: &[
            "Fresh air still reaches here from above.",
            "You can almost see daylight behind you.",
            "These halls were inhabited recently.",
            "Footprints in the dust lead deeper.",
        ],
    },
    FloorTheme {
        name: "Abandoned Halls",
        description: "Once-occupied chambers now empty",
        enter_message: "The halls grow quieter as you descend.",
        ambient: &[
            "Broken furniture litters the floor.",
            "Old torches still smolder in their sconces.",
            "Signs of a hasty evacuation are everywhere.",
            "Something drove the inhabitants away...",
        ],
    },
    FloorTheme {
        name: "Forgotten Chambers",
        description: "Ancient rooms untouched for years",
        enter_message: "You enter the forgotten chambers of the dungeon.",
        ambient: &[
            "Thick dust coats everything.",
            "Cobwebs span every corner.",
            "The air tastes stale and old.",
            "These rooms have been sealed for ages.",
        ],
    },
    FloorTheme {
        name: "The Warrens",
        description: "Twisting passages and small chambers",
        enter_message: "The dungeon becomes a maze of passages.",
        ambient: &[
            "The walls close in around you.",
            "Passages branch in all directions.",
            "You're losing your sense of direction.",
            "Is that the way you came from?",
        ],
    },
    FloorTheme {
        name: "The Deep Halls",
        description: "Far from the surface world",
        enter_message: "You descend into the deep halls, far from safety.",
        ambient: &[
            "No natural light has ever reached here.",
            "The weight of stone above is oppressive.",
            "Strange fungi glow in the corners.",
            "The darkness seems almost solid.",
        ],
    },
    FloorTheme {
        name: "The Catacombs",
        description: "Ancient burial grounds",
        enter_message: "You enter the catacombs. The air reeks of death.",
        ambient: &[
            "Bones crunch under your feet.",
            "Empty alcoves line the walls.",
            "Death permeates this place.",
            "The dead do not rest easy here.",
        ],
    },
    FloorTheme {
        name: "The Depths",
        description: "Deep underground caverns",
        enter_message: "The constructed halls give way to natural caverns.",
        ambient: &[
            "Water drips from stalactites above.",
            "The walls are wet and slippery.",
            "Strange sounds echo from below.",
            "You've never been this deep before.",
        ],
    },
    FloorTheme {
        name: "The Abyss Edge",
        description: "Passages near the great void",
        enter_message: "You stand at the edge of the abyss.",
        ambient: &[
            "You hear a distant, endless falling of water.",
            "Chasms open into impenetrable darkness.",
            "One wrong step could be your last.",
            "The abyss calls to you...",
        ],
    },
    FloorTheme {
        name: "The Inner Sanctum",
        description: "Sacred chambers of ancient evil",
        enter_message: "You breach the inner sanctum. Evil dwells here.",
        ambient: &[
            "Unholy symbols cover the walls.",
            "You feel a malevolent presence.",
            "The very air opposes your presence.",
            "Dark magic crackles in the air.",
        ],
    },
    FloorTheme {
        name: "The Heart of Darkness",
        description: "The source of all evil",
        enter_message: "You've reached the heart of darkness. This is the end.",
        ambient: &[
            "This is it. The final floor.",
            "Ancient evil stirs at your approach.",
            "The darkness here is almost alive.",
            "Your quest nears its end, one way or another.",
        ],
    },
];

const UNKNOWN: FloorTheme = FloorTheme {
    name: "Unknown Depths",
    description: "Uncharted territory",
    enter_message: "You enter unknown depths...",
    ambient: &["You've gone deeper than any map shows."],
};

/// Theme for a 1-based floor number; floors outside 1..=10 share a fallback.
pub fn floor_theme(floor: u32) -> &'static FloorTheme {
    floor
        .checked_sub(1)
        .and_then(|index| THEMES.get(index as usize))
        .unwrap_or(&UNKNOWN)
}

pub fn floor_ambient_line(floor: u32, rng: &mut GameRng) -> Option<&'static str> {
    rng.choose(floor_theme(floor).ambient).copied()
}
