//! Compile time configuration shared by every board.

/// Suspension between two polls of the sensors.
pub const POLL_INTERVAL_MS: u32 = 2000;

/// Longest console line, excluding the newline.
pub const CONSOLE_LINE_SIZE: usize = 96;

/// Callbacks a single button dispatcher can hold.
pub const MAX_BUTTON_CALLBACKS: usize = 4;

// Part names used in the `ERROR: <part> Update failed` lines
pub const LIGHT_PART: &str = "OPT3001";
pub const TEMP_RH_PART: &str = "HDC2010";
pub const ACCEL_PART: &str = "LIS2DH12";
