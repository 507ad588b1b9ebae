/// Number of faces on the race die.
pub const DIE_FACES: u8 = 6;
/// Score a participant has to reach to finish a race.
pub const DEFAULT_TARGET_SCORE: u32 = 50;
/// Points credited for winning a solo race.
pub const SOLO_REWARD: Points = 5_000;
/// Points credited for winning a 1v1 challenge.
pub const CHALLENGE_REWARD: Points = 10_000;
/// Number of roll lines kept for display.
pub const DEFAULT_TURN_LOG_RETENTION: usize = 4;
/// Display names and ids get clipped to this many characters.
pub const MAX_NAME_LENGTH: usize = 32;

/// Point balances and rewards.
pub type Points = u64;
