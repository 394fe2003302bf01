//! Google Sheets persistence
//!
//! One worksheet per target group. Two operations are needed by the
//! pipeline: read every `job_id` already recorded (column 1, header
//! excluded) and bulk-append new rows. Authentication uses a service
//! account key: an RS256-signed JWT assertion is exchanged for a bearer
//! token at the key's `token_uri` and cached until shortly before expiry.

pub mod auth;
pub mod client;

pub use auth::ServiceAccountKey;
pub use client::{SheetsClient, SheetsError, COLUMNS};
