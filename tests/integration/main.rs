//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the evaluator against
//! the real file stores in a temporary directory, with the relay line,
//! delays and clock replaced by recording mocks. No real hardware and no
//! real sleeping.

mod mock_hw;
mod store_tests;
