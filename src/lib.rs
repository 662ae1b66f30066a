// RosterSleuth - lib.rs
//
// Library entry point, exposing the roster core and its persistence for the
// command-line front end, integration tests, and other front ends.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
