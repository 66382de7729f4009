//! Structural classification of model artifacts
//!
//! An artifact is resolved into exactly one [`ModelBundle`] variant at load
//! time. Keys are checked in a fixed order: `"model"` (current schema) shadows
//! `"ranker"` (legacy schema), and anything else is taken to be the predictor
//! itself.

use serde::Deserialize;
use serde_json::Value;

use super::error::ModelError;
use super::predictor::{Arity, Predictor, Scaler};

/// Loaded model artifact
#[derive(Debug, Clone)]
pub enum ModelBundle {
    /// `{"model": ..., "feature_names": [...], "schema_version": ..., "scaler": ...}`
    DictModel(DictModelBundle),
    /// Legacy `{"ranker": ..., "scaler": ..., "feature_names": [...]}`
    DictRanker(DictRankerBundle),
    /// The artifact is the predictor itself
    Direct(Predictor),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictModelBundle {
    pub model: Predictor,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub schema_version: Option<String>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictRankerBundle {
    pub ranker: Predictor,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    #[serde(default)]
    pub feature_names: Vec<String>,
}

/// Variant tag reported in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    DictModelBundle,
    DictRankerBundle,
    DirectModel,
}

impl BundleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleKind::DictModelBundle => "dict_model_bundle",
            BundleKind::DictRankerBundle => "dict_ranker_bundle",
            BundleKind::DirectModel => "direct_model",
        }
    }
}

impl ModelBundle {
    /// Resolve a deserialized artifact into a bundle and validate it
    pub fn classify(value: Value) -> Result<Self, ModelError> {
        let (has_model, has_ranker) = match value.as_object() {
            Some(map) => (map.contains_key("model"), map.contains_key("ranker")),
            None => (false, false),
        };

        let bundle = if has_model {
            ModelBundle::DictModel(serde_json::from_value(value)?)
        } else if has_ranker {
            ModelBundle::DictRanker(serde_json::from_value(value)?)
        } else {
            ModelBundle::Direct(serde_json::from_value(value)?)
        };

        bundle.input_arity()?;
        Ok(bundle)
    }

    pub fn kind(&self) -> BundleKind {
        match self {
            ModelBundle::DictModel(_) => BundleKind::DictModelBundle,
            ModelBundle::DictRanker(_) => BundleKind::DictRankerBundle,
            ModelBundle::Direct(_) => BundleKind::DirectModel,
        }
    }

    pub fn predictor(&self) -> &Predictor {
        match self {
            ModelBundle::DictModel(b) => &b.model,
            ModelBundle::DictRanker(b) => &b.ranker,
            ModelBundle::Direct(p) => p,
        }
    }

    pub fn scaler(&self) -> Option<&Scaler> {
        match self {
            ModelBundle::DictModel(b) => b.scaler.as_ref(),
            ModelBundle::DictRanker(b) => b.scaler.as_ref(),
            ModelBundle::Direct(_) => None,
        }
    }

    pub fn feature_names(&self) -> &[String] {
        match self {
            ModelBundle::DictModel(b) => &b.feature_names,
            ModelBundle::DictRanker(b) => &b.feature_names,
            ModelBundle::Direct(_) => &[],
        }
    }

    pub fn schema_version(&self) -> Option<&str> {
        match self {
            ModelBundle::DictModel(b) => b.schema_version.as_deref(),
            _ => None,
        }
    }

    /// Width accepted for input rows, after checking that feature names,
    /// scaler and predictor agree with each other
    pub fn input_arity(&self) -> Result<Arity, ModelError> {
        let predictor = self.predictor();
        predictor.validate()?;

        let mut arity = predictor.arity();

        if let Some(scaler) = self.scaler() {
            scaler.validate()?;
            if !arity.accepts(scaler.width()) {
                return Err(ModelError::InvalidModel(format!(
                    "scaler width {} does not fit a {} predictor reading {} features",
                    scaler.width(),
                    predictor.kind(),
                    arity.minimum()
                )));
            }
            arity = Arity::Exact(scaler.width());
        }

        let names = self.feature_names();
        if !names.is_empty() {
            if !arity.accepts(names.len()) {
                return Err(ModelError::InvalidModel(format!(
                    "{} feature names declared but the model reads {}",
                    names.len(),
                    arity.minimum()
                )));
            }
            arity = Arity::Exact(names.len());
        }

        Ok(arity)
    }
}
