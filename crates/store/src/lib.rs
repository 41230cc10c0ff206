#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Versioned-artifact store client for artsync
//!
//! The remote store is driven through its command-line tool, one process per
//! call: listing the recorded versions of a project in a cluster, and adding
//! a new version from a local file. The listing output is free-form text;
//! [`listing`] extracts the revision tokens from it.

mod client;
pub mod listing;

pub use client::StoreClient;
