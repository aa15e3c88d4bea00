//! Dismissal message sets.

/// Messages used while ten or more participants remain after an elimination.
pub const REGULAR_DISMISSALS: [&str; 11] = [
    "Bowled!",
    "Caught!",
    "LBW!",
    "Run Out!",
    "Stumped!",
    "Golden Duck!",
    "Duck!",
    "Diamond Duck!",
    "Caught Behind!",
    "Chopped On!",
    "Bounced Out!",
];

/// Messages drawn without replacement once fewer than ten remain.
pub const FINALE_DISMISSALS: [&str; 9] = [
    "Retired Hurt!",
    "Caught at Gully: Adamant it's a Bump Ball!",
    "Level 3 Offence: Swearing at the Umpire!",
    "Run Out: Deflected by the Bowler (Non Striker)!",
    "Bowled: Left a Straight One!",
    "Hit Wicket: Cutting the Off Spinner!",
    "LBW: You've Middled It!",
    "Mankad by the Bowler!",
    "Stumped Off a Wide!",
];

/// How long a regular message stays on screen.
pub const REGULAR_DISPLAY_MS: u64 = 2_000;

/// How long a finale message stays on screen.
pub const FINALE_DISPLAY_MS: u64 = 10_000;

/// Finale messages start once the post-elimination alive count drops below
/// this.
pub const FINALE_THRESHOLD: usize = 10;
