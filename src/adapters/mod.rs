//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter          | Implements                  | Connects to                 |
//! |------------------|-----------------------------|-----------------------------|
//! | `hardware`       | ProcessIo                   | ESP32 ADC1, LEDC, GPIO      |
//! | `sim_plant`      | ProcessIo                   | Simulated tank (host)       |
//! | `log_sink`       | EventSink                   | Serial log output           |
//! |                  | DisplayPort, IndicatorPort  |                             |
//! | `time`           | ClockPort                   | ESP32 system timer          |

pub mod hardware;
pub mod log_sink;
pub mod sim_plant;
pub mod time;
