// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod specs;

pub mod file;
pub mod graph;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod registry;
pub mod rows;
pub mod tables;
