//! Learned ranking model
//!
//! Loads a model artifact once at startup and exposes a uniform
//! `predict(features) -> score` contract over every supported bundle shape.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub mod bundle;
pub mod error;
pub mod predictor;

pub use bundle::ModelBundle;
pub use error::ModelError;
use predictor::Arity;

/// Number of feature names reported by [`RankerModel::info`]
const INFO_FEATURE_NAMES: usize = 10;

/// Ranker model and its optional calibration mapping.
///
/// Both are written once by [`RankerModel::load`] and only read afterwards.
#[derive(Debug)]
pub struct RankerModel {
    model_path: PathBuf,
    calibration_path: Option<PathBuf>,
    loaded: Option<LoadedModel>,
    calibration: Option<Map<String, Value>>,
}

#[derive(Debug)]
struct LoadedModel {
    bundle: ModelBundle,
    arity: Arity,
}

/// Diagnostic snapshot of the model state
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ModelInfo {
    pub loaded: bool,
    pub model_type: Option<String>,
    pub schema_version: Option<String>,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    pub has_scaler: bool,
    pub has_calibration: bool,
}

impl RankerModel {
    pub fn new(model_path: impl Into<PathBuf>, calibration_path: Option<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            calibration_path,
            loaded: None,
            calibration: None,
        }
    }

    /// Load the model artifact and, when present, the calibration file
    pub fn load(&mut self) -> Result<(), ModelError> {
        if !self.model_path.exists() {
            return Err(ModelError::ModelNotFound(self.model_path.clone()));
        }

        tracing::info!(path = %self.model_path.display(), "Loading ranker model");

        let raw = read_file(&self.model_path)?;
        let value: Value = serde_json::from_str(&raw)?;
        let bundle = ModelBundle::classify(value)?;
        let arity = bundle.input_arity()?;

        tracing::info!(
            model_type = bundle.kind().as_str(),
            predictor = bundle.predictor().kind(),
            schema_version = ?bundle.schema_version(),
            "Resolved model bundle"
        );

        let calibration = match self.calibration_path.as_deref() {
            Some(path) if path.exists() => {
                let calibration = load_calibration(path)?;
                tracing::info!(path = %path.display(), "Loaded calibration");
                Some(calibration)
            }
            _ => None,
        };

        self.loaded = Some(LoadedModel { bundle, arity });
        self.calibration = calibration;

        let info = self.info();
        tracing::info!(
            model_type = ?info.model_type,
            features = info.n_features,
            calibration = info.has_calibration,
            "Ranker model ready"
        );

        Ok(())
    }

    /// Score every row of `features`, preserving row order
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let loaded = self.loaded.as_ref().ok_or(ModelError::ModelNotLoaded)?;
        let predictor = loaded.bundle.predictor();
        let scaler = loaded.bundle.scaler();

        features
            .iter()
            .map(|row| {
                if !loaded.arity.accepts(row.len()) {
                    return Err(ModelError::FeatureShapeMismatch {
                        expected: loaded.arity.minimum(),
                        actual: row.len(),
                    });
                }
                match scaler {
                    Some(scaler) => Ok(predictor.score(&scaler.transform(row)?)),
                    None => Ok(predictor.score(row)),
                }
            })
            .collect()
    }

    /// Score a single feature vector
    pub fn predict_single(&self, features: &[f64]) -> Result<f64, ModelError> {
        let scores = self.predict(&[features.to_vec()])?;
        scores
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidModel("prediction returned no score".to_string()))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn calibration(&self) -> Option<&Map<String, Value>> {
        self.calibration.as_ref()
    }

    pub fn info(&self) -> ModelInfo {
        let bundle = self.loaded.as_ref().map(|l| &l.bundle);
        let feature_names = bundle.map(|b| b.feature_names()).unwrap_or_default();

        ModelInfo {
            loaded: self.is_loaded(),
            model_type: bundle.map(|b| b.kind().as_str().to_string()),
            schema_version: bundle.and_then(|b| b.schema_version()).map(str::to_string),
            n_features: feature_names.len(),
            feature_names: feature_names
                .iter()
                .take(INFO_FEATURE_NAMES)
                .cloned()
                .collect(),
            has_scaler: bundle.is_some_and(|b| b.scaler().is_some()),
            has_calibration: self.calibration.is_some(),
        }
    }
}

fn read_file(path: &Path) -> Result<String, ModelError> {
    fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_calibration(path: &Path) -> Result<Map<String, Value>, ModelError> {
    let raw = read_file(path)?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ModelError::Calibration {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", json_type(&other)),
        }),
        Err(e) => Err(ModelError::Calibration {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    fn write_json(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn loaded_model(artifact: Value) -> (RankerModel, NamedTempFile) {
        let file = write_json(&artifact);
        let mut model = RankerModel::new(file.path(), None);
        model.load().unwrap();
        (model, file)
    }

    #[test]
    fn test_missing_artifact_is_model_not_found() {
        let mut model = RankerModel::new("/nonexistent/ranker.json", None);
        assert!(matches!(model.load(), Err(ModelError::ModelNotFound(_))));
        assert!(!model.is_loaded());
    }

    #[test]
    fn test_garbage_artifact_fails_load() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let mut model = RankerModel::new(file.path(), None);
        assert!(matches!(model.load(), Err(ModelError::Deserialize(_))));
    }

    #[test]
    fn test_predict_before_load() {
        let model = RankerModel::new("ranker.json", None);
        assert!(matches!(
            model.predict(&[vec![1.0]]),
            Err(ModelError::ModelNotLoaded)
        ));
        assert!(matches!(
            model.predict_single(&[1.0]),
            Err(ModelError::ModelNotLoaded)
        ));
    }

    #[test]
    fn test_predict_preserves_row_order() {
        let (model, _file) = loaded_model(json!({
            "type": "linear", "weights": [1.0, 10.0], "bias": 0.0
        }));
        let scores = model
            .predict(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 2.0]])
            .unwrap();
        assert_eq!(scores, vec![1.0, 10.0, 22.0]);
        assert_eq!(model.predict_single(&[0.0, 1.0]).unwrap(), 10.0);
    }

    #[test]
    fn test_scaler_runs_before_predict() {
        let (model, _file) = loaded_model(json!({
            "ranker": {"type": "linear", "weights": [1.0, 1.0]},
            "scaler": {"mean": [1.0, 1.0], "scale": [2.0, 4.0]},
            "feature_names": ["a", "b"]
        }));
        let rows = vec![vec![3.0, 5.0]];
        assert_eq!(model.predict(&rows).unwrap(), vec![2.0]);
        assert_eq!(rows, vec![vec![3.0, 5.0]]);
    }

    #[test]
    fn test_wrong_feature_width_is_rejected() {
        let (model, _file) = loaded_model(json!({
            "model": {"type": "linear", "weights": [1.0, 1.0]},
            "feature_names": ["a", "b"]
        }));
        assert!(matches!(
            model.predict_single(&[1.0, 2.0, 3.0]),
            Err(ModelError::FeatureShapeMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_calibration_is_optional() {
        let artifact = write_json(&json!({"type": "linear", "weights": [1.0]}));

        let mut model = RankerModel::new(
            artifact.path(),
            Some(PathBuf::from("/nonexistent/calibration.json")),
        );
        model.load().unwrap();
        assert!(model.calibration().is_none());

        let calibration = write_json(&json!({"a": 1.0, "b": 0.0}));
        let mut model = RankerModel::new(artifact.path(), Some(calibration.path().to_path_buf()));
        model.load().unwrap();
        assert_eq!(model.calibration().unwrap().len(), 2);
    }

    #[test]
    fn test_non_object_calibration_fails_load() {
        let artifact = write_json(&json!({"type": "linear", "weights": [1.0]}));
        let calibration = write_json(&json!([1, 2, 3]));
        let mut model = RankerModel::new(artifact.path(), Some(calibration.path().to_path_buf()));
        assert!(matches!(model.load(), Err(ModelError::Calibration { .. })));
        assert!(!model.is_loaded());
        assert!(model.predict_single(&[1.0]).is_err());
    }

    #[test]
    fn test_reload_drops_removed_calibration() {
        let artifact = write_json(&json!({"type": "linear", "weights": [1.0]}));
        let calibration = write_json(&json!({"a": 1.0}));
        let mut model = RankerModel::new(artifact.path(), Some(calibration.path().to_path_buf()));
        model.load().unwrap();
        assert!(model.calibration().is_some());

        calibration.close().unwrap();
        model.load().unwrap();
        assert!(model.is_loaded());
        assert!(model.calibration().is_none());
    }

    #[test]
    fn test_info_snapshot() {
        let unloaded = RankerModel::new("ranker.json", None).info();
        assert!(!unloaded.loaded);
        assert_eq!(unloaded.model_type, None);
        assert_eq!(unloaded.n_features, 0);

        let names: Vec<String> = (0..12).map(|i| format!("f{i}")).collect();
        let (model, _file) = loaded_model(json!({
            "model": {"type": "linear", "weights": vec![0.5; 12]},
            "feature_names": names,
            "schema_version": "2024-12"
        }));
        let info = model.info();
        assert!(info.loaded);
        assert_eq!(info.model_type.as_deref(), Some("dict_model_bundle"));
        assert_eq!(info.schema_version.as_deref(), Some("2024-12"));
        assert_eq!(info.n_features, 12);
        assert_eq!(info.feature_names.len(), 10);
        assert_eq!(info.feature_names[0], "f0");
        assert!(!info.has_scaler);
        assert!(!info.has_calibration);

        let artifact = write_json(&json!({
            "ranker": {"type": "linear", "weights": [1.0]},
            "scaler": {"mean": [0.0], "scale": [1.0]},
            "feature_names": ["a"]
        }));
        let calibration = write_json(&json!({"a": 1.0}));
        let mut model = RankerModel::new(artifact.path(), Some(calibration.path().to_path_buf()));
        model.load().unwrap();
        let info = model.info();
        assert_eq!(info.model_type.as_deref(), Some("dict_ranker_bundle"));
        assert!(info.has_scaler);
        assert!(info.has_calibration);
    }
}
