//! Process path assignment desk.
//!
//! `engine` and `scoring` hold the pure decision; `history` holds the
//! board and rotation history it reads; `desk` is the stateful caller
//! that persists decisions through `store`.

pub mod clock;
pub mod command;
pub mod config;
pub mod desk;
pub mod drill;
pub mod engine;
pub mod error;
pub mod event;
pub mod history;
pub mod name_generator;
pub mod rng;
pub mod roster;
pub mod scoring;
pub mod snapshot;
pub mod store;
pub mod types;
