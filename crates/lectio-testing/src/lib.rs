//! Test utilities for Lectio crates and services.
//!
//! Provides `MockAuth` for bearer headers and a fixture loader for seed
//! documents. Import from test code only.

pub mod auth;
pub mod fixture;
