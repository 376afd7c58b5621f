//! Engine-wide constants.

/// Basis-point denominator: 10_000 bps == 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Seconds per day (UTC, no leap seconds).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Max byte length of a pool display name.
pub const MAX_POOL_NAME_LEN: usize = 64;

/// Hard ceiling on unlock steps in a Monthly or Custom schedule.
/// A Monthly pool with 1 bps per step needs exactly 10_000 steps.
pub const MAX_SCHEDULE_STEPS: usize = 10_000;

/// Largest gap between Monthly unlocks (100 years).
pub const MAX_MONTH_GAP: u32 = 1_200;

/// Calendar range accepted as a Monthly anchor: 0001-01-01 ..= 9999-12-31T23:59:59.
pub const MIN_CALENDAR_TS: i64 = -62_135_596_800;
pub const MAX_CALENDAR_TS: i64 = 253_402_300_799;
