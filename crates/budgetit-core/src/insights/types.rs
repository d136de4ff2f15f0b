//! Core types for the Insight Engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// Spending needs attention
    Warning,
    /// Worth keeping an eye on
    Info,
    /// On track
    Success,
    /// Well under budget
    Celebration,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Success => "success",
            InsightKind::Celebration => "celebration",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(InsightKind::Warning),
            "info" => Ok(InsightKind::Info),
            "success" => Ok(InsightKind::Success),
            "celebration" => Ok(InsightKind::Celebration),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// Which percentage band the overall spending falls into
///
/// Bands are resolved in declaration order with strict comparisons, so the
/// edges 50 and 75 land in `Balanced` and 90 lands in `Approaching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingBand {
    /// Above 90%
    Overspending,
    /// Above 75%, up to and including 90%
    Approaching,
    /// Below 50%
    Saving,
    /// 50% to 75% inclusive
    Balanced,
}

impl SpendingBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 90.0 {
            SpendingBand::Overspending
        } else if percentage > 75.0 {
            SpendingBand::Approaching
        } else if percentage < 50.0 {
            SpendingBand::Saving
        } else {
            SpendingBand::Balanced
        }
    }

    pub fn kind(&self) -> InsightKind {
        match self {
            SpendingBand::Overspending => InsightKind::Warning,
            SpendingBand::Approaching => InsightKind::Info,
            SpendingBand::Saving => InsightKind::Celebration,
            SpendingBand::Balanced => InsightKind::Success,
        }
    }
}

/// A display-ready recommendation or status line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    /// Actionable advice, if any
    pub tip: Option<String>,
    /// Motivational quote, if any
    pub quote: Option<String>,
}

impl Insight {
    pub fn new(kind: InsightKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            tip: None,
            quote: None,
        }
    }

    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    pub fn with_quote(mut self, quote: impl Into<String>) -> Self {
        self.quote = Some(quote.into());
        self
    }
}
