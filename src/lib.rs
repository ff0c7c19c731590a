//! Brewtimer library.
//!
//! Turns a scheduled alarm marker into exactly one timed activation of
//! the coffee machine's brew relay. The domain core lives in [`app`];
//! everything that touches a file, a clock or a GPIO line is an adapter.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod brew;
pub mod config;
pub mod drivers;
pub mod error;
pub mod runner;
pub mod timestamp;

#[cfg(test)]
mod test_log;
