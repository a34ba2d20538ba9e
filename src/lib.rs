//! DentForge application support
//!
//! The geometry engine lives in `dentforge_core`; this crate holds the
//! configuration used by the batch binary.

pub mod config;
