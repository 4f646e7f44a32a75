//! Training runs over an assembled dataset.

use std::path::PathBuf;

use mlstock_dataset::Dataset;
use mlstock_traits::{ModelTrainer, Predictor};
use tracing::info;

use crate::{
    ClassificationMetrics, Evaluation, GridSearch, RegressionMetrics, RidgeClassifier, RidgeConfig,
    RidgeRegressor, SavedModel, TargetMode, TrainAction, TrainConfig, TrainError, accuracy_score,
    r2_score, split_by_date,
};

/// Result of training one target mode.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// The saved model.
    pub model: SavedModel,
    /// Where it was written.
    pub path: PathBuf,
    /// Training and test observation counts.
    pub sizes: (usize, usize),
}

/// Train, evaluate and save the model of one target mode.
///
/// # Errors
/// Returns `TrainError` if the configuration is invalid, a split side is
/// empty, the search finds no penalty or the model cannot be saved.
pub fn train_mode(
    dataset: &Dataset,
    mode: TargetMode,
    config: &TrainConfig,
) -> Result<TrainOutcome, TrainError> {
    config.validate()?;

    let x = dataset.features()?;
    let y = mode.transform(&dataset.target()?);
    let dates = dataset.trade_dates()?;
    let split = split_by_date(&x, &y, &dates, config.split_date)?;
    let sizes = (split.y_train.len(), split.y_test.len());
    info!(%mode, train = sizes.0, test = sizes.1, split = %config.split_date, "training");

    let search = GridSearch::new(config.alphas.clone(), config.folds)?
        .with_intercept(config.fit_intercept);
    let ridge = |alpha| RidgeConfig { alpha, fit_intercept: config.fit_intercept };

    let (trainer, alpha, model, evaluation) = match mode {
        TargetMode::Pct => {
            let found = search.run::<RidgeRegressor, _>(&split.x_train, &split.y_train, r2_score)?;
            let trainer = RidgeRegressor::with_config(ridge(found.best_alpha));
            let model = trainer.fit(&split.x_train, &split.y_train)?;
            let pred = model.predict(&split.x_test)?;
            let metrics = RegressionMetrics::compute(&split.y_test, &pred);
            (trainer.name().to_string(), found.best_alpha, model, Evaluation::Regression(metrics))
        }
        TargetMode::WinLoss => {
            let found =
                search.run::<RidgeClassifier, _>(&split.x_train, &split.y_train, accuracy_score)?;
            let trainer = RidgeClassifier::with_config(ridge(found.best_alpha));
            let classifier = trainer.fit(&split.x_train, &split.y_train)?;
            let pred = classifier.predict(&split.x_test)?;
            let metrics = ClassificationMetrics::compute(&split.y_test, &pred);
            (
                trainer.name().to_string(),
                found.best_alpha,
                classifier.linear,
                Evaluation::Classification(metrics),
            )
        }
    };
    info!(%mode, alpha, "{evaluation}");

    let model = SavedModel {
        mode,
        trainer,
        alpha,
        feature_names: dataset.feature_names().to_vec(),
        split_date: config.split_date,
        model,
        evaluation,
    };
    let path = model.save(&config.output_dir)?;
    Ok(TrainOutcome { model, path, sizes })
}

/// Train every mode covered by `action`.
///
/// # Errors
/// Returns the first error of any mode.
pub fn train(
    dataset: &Dataset,
    action: TrainAction,
    config: &TrainConfig,
) -> Result<Vec<TrainOutcome>, TrainError> {
    action.modes().into_iter().map(|mode| train_mode(dataset, mode, config)).collect()
}
