//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements     | Connects to                   |
//! |---------------|----------------|-------------------------------|
//! | `alarm_file`  | AlarmPort      | `<type>.alarm` marker files   |
//! | `config_file` | ConfigPort     | `config.json`                 |
//! | `gpio`        | OutputPin      | rppal GPIO / simulated line   |
//! | `hardware`    | ActuatorPort   | brew relay driver             |
//! | `init_file`   | InitRecordPort | `init` timestamp file         |
//! | `lock_file`   | LockPort       | `<type>.lock` files           |
//! | `log_sink`    | EventSink      | process log                   |
//! | `time`        | ClockPort      | local wall clock              |
//! |               | DelayNs        | `thread::sleep`               |

pub mod alarm_file;
pub mod config_file;
pub mod fs;
pub mod gpio;
pub mod hardware;
pub mod init_file;
pub mod lock_file;
pub mod log_sink;
pub mod time;
