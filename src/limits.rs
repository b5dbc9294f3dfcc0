/// Participant count at or above this percentage of `max_capacity` raises a
/// "nearly full" warning.
pub const NEAR_CAPACITY_PERCENT: u32 = 90;

/// Max alternative resources listed in a single suggestion line.
pub const MAX_SUGGESTED_ALTERNATIVES: usize = 3;

/// Interval bounds are minutes since midnight; this value is end of day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Sessions never span midnight, so one calendar day is the hard ceiling.
pub const MAX_SESSION_DURATION_MINUTES: u32 = MINUTES_PER_DAY;
