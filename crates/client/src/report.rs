//! End-of-game report rendering.
use std::fmt::Write;

use game_core::GameOutcome;
use runtime::SessionSummary;

pub fn render_text(summary: &SessionSummary) -> String {
    let stats = &summary.report.stats;
    let mut out = String::new();

    let headline = match summary.report.outcome {
        GameOutcome::Victory => "VICTORY",
        GameOutcome::Defeat => "GAME OVER",
    };
    let _ = writeln!(out, "=== {headline} ===");
    if let Some(death) = &summary.death {
        let _ = writeln!(out, "{}", death.message);
        if let Some(epitaph) = &death.epitaph {
            let _ = writeln!(out, "  \"{epitaph}\"");
        }
    }
    let _ = writeln!(out, "Floor reached:   {}", stats.floor);
    let _ = writeln!(out, "Enemies slain:   {}", stats.enemies_killed);
    let _ = writeln!(out, "Items collected: {}", stats.items_collected);
    let _ = writeln!(out, "Turns survived:  {}", stats.turns_survived);
    if let Some(death) = &summary.death {
        let _ = writeln!(out, "Hint: {}", death.hint);
    }
    let _ = writeln!(out, "Seed:   {}", summary.seed);
    let _ = write!(out, "Digest: {}", summary.digest_hex());
    out
}

pub fn render_json(summary: &SessionSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}
