//! Target modes and training actions.

use std::{fmt, str::FromStr};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::TrainError;

/// How the excess-return label is presented to a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetMode {
    /// Regress on the excess return itself.
    Pct,
    /// Classify the sign: `1` for a positive excess return, else `0`.
    WinLoss,
}

impl TargetMode {
    /// Map raw excess returns to model labels.
    #[must_use]
    pub fn transform(&self, target: &Array1<f64>) -> Array1<f64> {
        match self {
            Self::Pct => target.clone(),
            Self::WinLoss => target.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
        }
    }

    /// Whether the mode is a classification task.
    #[must_use]
    pub const fn is_classification(&self) -> bool {
        matches!(self, Self::WinLoss)
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pct => "pct",
            Self::WinLoss => "winloss",
        })
    }
}

impl FromStr for TargetMode {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pct" => Ok(Self::Pct),
            "winloss" => Ok(Self::WinLoss),
            other => Err(TrainError::Parse(format!("unknown target mode: {other}"))),
        }
    }
}

/// Which models a training run fits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrainAction {
    /// Both models.
    #[default]
    All,
    /// Only the regression model.
    Pct,
    /// Only the classification model.
    WinLoss,
}

impl TrainAction {
    /// Target modes covered by the action, in training order.
    #[must_use]
    pub fn modes(&self) -> Vec<TargetMode> {
        match self {
            Self::All => vec![TargetMode::Pct, TargetMode::WinLoss],
            Self::Pct => vec![TargetMode::Pct],
            Self::WinLoss => vec![TargetMode::WinLoss],
        }
    }
}

impl FromStr for TrainAction {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pct" => Ok(Self::Pct),
            "winloss" => Ok(Self::WinLoss),
            other => Err(TrainError::Parse(format!("unknown train action: {other}"))),
        }
    }
}
