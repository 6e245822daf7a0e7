//! City Flyover Library
//!
//! An endless procedural city with a small traffic simulation that can run
//! headless or with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
