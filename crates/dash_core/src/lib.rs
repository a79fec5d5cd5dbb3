//! Canonical language vocabulary for Dash.
//!
//! This crate is intentionally tiny and dependency-free. It holds the registries that both the syntax frontend and any
//! downstream tooling (highlighters, formatters, reference docs) agree on.
//!
//! ## Notes
//!
//! - **No IO**, no global state, no syntax-tree types.
//! - Enforcement of syntax rules lives in `dash_syntax`; this crate only names things and records their metadata.

pub mod lang;
