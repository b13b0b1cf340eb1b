//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `ble`      | RadioPort          | Bluedroid GATT server    |
//! |            | LinkPort           |                          |
//! | `hardware` | BoardPort          | ESP32 GPIO, power mgmt   |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `time`     | DelayNs            | FreeRTOS delay           |

pub mod ble;
pub mod hardware;
pub mod log_sink;
pub mod time;
