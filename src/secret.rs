//! Kubernetes secret model.
//!
//! A secret exists in two shapes inside lazysecret:
//! - [`SecretDocument`] - the `v1/Secret` manifest written to disk before encryption
//! - the payload text - the `key: value` lines the user edits, see [`decode`] and [`encode`]

mod document;
mod payload;

pub use document::{SecretData, SecretDocument, SecretSummary};
pub use payload::{decode, encode};
