//! GPIO pin assignments for the SmartZipper board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Hall-effect sensor (open-drain output, magnet present pulls LOW)
// ---------------------------------------------------------------------------

/// Digital input with internal pull-up.  LOW = magnet present (zipper
/// closed), HIGH = magnet absent.  Interrupt fires on both edges.
pub const HALL_SENSOR_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Indicator LEDs (active HIGH, unused in normal operation)
// ---------------------------------------------------------------------------

pub const LED_A_GPIO: i32 = 6;
pub const LED_B_GPIO: i32 = 7;

/// Both indicator outputs, in the order they are initialised.
pub const INDICATOR_GPIOS: [i32; 2] = [LED_A_GPIO, LED_B_GPIO];
