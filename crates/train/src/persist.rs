//! JSON model files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use mlstock_primitives::TradeDate;
use mlstock_traits::{Predictor, TrainerError};
use mlstock_utils::stamped_file_name;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Evaluation, LinearClassifier, LinearModel, TargetMode, TrainError};

/// A fitted model with everything needed to apply and audit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    /// Target mode the model was trained for.
    pub mode: TargetMode,
    /// Trainer name.
    pub trainer: String,
    /// Selected ridge penalty.
    pub alpha: f64,
    /// Feature names, in coefficient order.
    pub feature_names: Vec<String>,
    /// Train/test split date.
    pub split_date: TradeDate,
    /// Fitted coefficients.
    pub model: LinearModel,
    /// Out-of-sample evaluation.
    pub evaluation: Evaluation,
}

impl SavedModel {
    /// `{mode}_ridge_{timestamp}.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        stamped_file_name(&format!("{}_ridge", self.mode), "json")
    }

    /// Write the model as pretty JSON under `dir`; returns the file path.
    ///
    /// # Errors
    /// Returns `TrainError::Io` or `TrainError::Json` if writing fails.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, TrainError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!(path = %path.display(), mode = %self.mode, "saved model");
        Ok(path)
    }

    /// Read a model written by [`SavedModel::save`].
    ///
    /// # Errors
    /// Returns `TrainError::Io` or `TrainError::Json` if reading fails.
    pub fn load(path: &Path) -> Result<Self, TrainError> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

impl Predictor for SavedModel {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, TrainerError> {
        match self.mode {
            TargetMode::Pct => self.model.predict(x),
            TargetMode::WinLoss => LinearClassifier { linear: self.model.clone() }.predict(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{ClassificationMetrics, RegressionMetrics};

    fn saved(mode: TargetMode) -> SavedModel {
        SavedModel {
            mode,
            trainer: "ridge".to_string(),
            alpha: 0.1,
            feature_names: vec!["mom".to_string(), "vol".to_string()],
            split_date: TradeDate::parse("20190101").unwrap(),
            model: LinearModel { coefficients: vec![1.0, -1.0], intercept: 0.25, r_squared: 0.5 },
            evaluation: Evaluation::Regression(RegressionMetrics {
                n: 10,
                r2: 0.1,
                rmse: 1.0,
                sign_agreement: 0.6,
            }),
        }
    }

    #[test]
    fn save_and_load() {
        let dir = std::env::temp_dir().join(format!("mlstock-train-{}", std::process::id()));
        let model = saved(TargetMode::Pct);

        let path = model.save(&dir).unwrap();
        let back = SavedModel::load(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert!(path.file_name().unwrap().to_string_lossy().starts_with("pct_ridge_"));
        assert_eq!(back, model);
    }

    #[test]
    fn json_layout() {
        let mut model = saved(TargetMode::WinLoss);
        model.evaluation = Evaluation::Classification(ClassificationMetrics {
            n: 4,
            accuracy: 0.5,
            precision: 0.5,
            recall: 1.0,
            f1: 2.0 / 3.0,
        });
        let json: serde_json::Value = serde_json::to_value(&model).unwrap();
        assert_eq!(json["mode"], "winloss");
        assert_eq!(json["split_date"], "20190101");
        assert_eq!(json["evaluation"]["kind"], "classification");
    }

    #[test]
    fn winloss_model_predicts_labels() {
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        assert_eq!(saved(TargetMode::Pct).predict(&x).unwrap(), array![1.25, -0.75]);
        assert_eq!(saved(TargetMode::WinLoss).predict(&x).unwrap(), array![1.0, 0.0]);
    }
}
