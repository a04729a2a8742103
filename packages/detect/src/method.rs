//! Named change detection methods.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ChangeDetector;
use crate::error::DetectError;
use crate::modtime::ModTimeDetector;
use crate::sha256::Sha256Detector;

/// The change detection method selected for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateMethod {
    /// Size and modification time comparison.
    #[serde(rename = "modtime")]
    ModTime,
    /// SHA-256 content comparison.
    #[serde(rename = "sha256")]
    Sha256,
}

impl UpdateMethod {
    /// All supported methods, in the order they are documented.
    pub const ALL: [Self; 2] = [Self::ModTime, Self::Sha256];

    /// The name used on the command line and in config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModTime => "modtime",
            Self::Sha256 => "sha256",
        }
    }

    /// Instantiate the detector for this method.
    #[must_use]
    pub fn detector(self) -> Box<dyn ChangeDetector> {
        match self {
            Self::ModTime => Box::new(ModTimeDetector),
            Self::Sha256 => Box::new(Sha256Detector),
        }
    }
}

impl FromStr for UpdateMethod {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| DetectError::UnsupportedMethod(s.to_string()))
    }
}

impl fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
