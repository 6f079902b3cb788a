//! synth-datagen CLI library.
//!
//! This crate provides the configuration loader and the commands behind the
//! `synth-datagen` binary.

pub mod commands;
pub mod config;
