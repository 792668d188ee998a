//! CLI library components for the `btap` tool.

#![deny(unsafe_code)]

pub mod commands;
pub mod logging;
