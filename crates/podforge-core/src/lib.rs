//! Core types, config, errors, and the pure transcript/WAV algorithms for podforge.

pub mod config;
pub mod error;
pub mod transcript;
pub mod voices;
pub mod wav;
