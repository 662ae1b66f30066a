// RosterSleuth - app/mod.rs
//
// Application layer: file-backed persistence entry points, shared roster
// access, caller-side validation.
// Dependencies: core and platform layers.

pub mod shared;
pub mod storage;
pub mod validate;
