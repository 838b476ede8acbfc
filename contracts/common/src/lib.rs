//! Shared utilities for the pool contract suite.
//!
//! This crate provides:
//! - [`auth`] — the tiered access registry consulted before administrative
//!   configuration changes.
//! - [`reentrancy`] — the call-depth guard wrapped around every mutating
//!   entry point.

#![no_std]

pub mod auth;
pub mod reentrancy;

pub use auth::AccessTier;
