//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the brew controller:
//! due-checking alarm markers, the init-throttle policy, and marker
//! retirement. All interaction with files and the relay happens through
//! **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
