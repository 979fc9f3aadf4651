// ── Quality catalog ──
//
// Discrete bandwidth tiers an orchestrator can request for a virtual link,
// and the queue shaping parameters each tier translates to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::CoreError;

/// Bandwidth tier requested for a virtual link.
///
/// Tags are matched exactly and case-sensitively (`"HIGH"`, not `"high"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Quality {
    Low,
    Medium,
    High,
}

/// Shaping parameters of one queue, in kbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueParams {
    pub min_rate: u64,
    pub max_rate: u64,
}

impl Quality {
    /// Map a raw quality tag to its tier.
    pub fn classify(tag: &str) -> Result<Self, CoreError> {
        tag.parse().map_err(|_| CoreError::UnknownQualityTag {
            tag: tag.to_owned(),
        })
    }

    /// Queue parameters guaranteed to traffic of this tier.
    pub fn queue_params(self) -> QueueParams {
        match self {
            Self::Low => QueueParams {
                min_rate: 1_000,
                max_rate: 2_000,
            },
            Self::Medium => QueueParams {
                min_rate: 3_000,
                max_rate: 5_000,
            },
            Self::High => QueueParams {
                min_rate: 6_000,
                max_rate: 10_000,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Free-function form of [`Quality::classify`].
pub fn classify(tag: &str) -> Result<Quality, CoreError> {
    Quality::classify(tag)
}
