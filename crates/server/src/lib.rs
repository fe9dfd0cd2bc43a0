//! Reference rules service: stores metric alert rules per app id and
//! environment, answers app id checks, and rejects invalid entries with
//! field-indexed error payloads.

pub mod config;
pub mod rest;
pub mod store;
