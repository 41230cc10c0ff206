#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared data model for artsync
//!
//! The central type is [`PackageRecord`]: one record per manifest, shared by
//! reference across every pipeline stage. Stage results are recorded through
//! write-once cells so that the "one task owns a record's writes per stage"
//! rule is enforced by the type system instead of by convention.

mod record;
mod revision;

pub use record::{DownloadedArtifact, PackageRecord};
pub use revision::Revision;

use serde::{Deserialize, Serialize};

/// Color output preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
