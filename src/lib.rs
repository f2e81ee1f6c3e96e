#![doc = include_str!("../README.md")]
//!

//! This crate re-exports the exectime engine. The `exectime` command-line
//! tool lives in the `exectime-cli` package.

pub use exectime_core::*;
