//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the shifter against mock
//! adapters on a fake clock.  All tests run on the host with no real
//! hardware required.

mod fault_tests;
mod rig;
mod scenario_tests;
