// RosterSleuth - core/mod.rs
//
// Core business logic layer: record model, algorithms, roster manager,
// file-format codecs.
// Must NOT depend on: platform, app, or any filesystem path handling.

pub mod algorithms;
pub mod manager;
pub mod model;
pub mod persist;
