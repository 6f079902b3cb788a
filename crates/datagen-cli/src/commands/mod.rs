//! Command implementations for the synth-datagen CLI.

pub mod generate;
