use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::evaluator::{Evaluation, StretchEvaluator, StretchOutput};
use crate::schema::{AttrValue, STRETCH_SCHEMA};
use crate::types::AttributeId;

/// One snapshot of the node's five input channels.
///
/// Field names (de)serialise as the channel long names, so a YAML snapshot
/// reads like the host attributes:
///
/// ```yaml
/// enable: 1.0
/// rootPosition: [0.0, 0.0, 0.0]
/// endPosition: [0.0, 10.0, 0.0]
/// stretchDistance: 5.0
/// volumePreservation: 1.0
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StretchInputs {
    pub enable: f64,
    pub root_position: DVec3,
    pub end_position: DVec3,
    pub stretch_distance: f64,
    pub volume_preservation: f64,
}

impl Default for StretchInputs {
    fn default() -> Self {
        Self {
            enable: 1.0,
            root_position: DVec3::ZERO,
            end_position: DVec3::ZERO,
            stretch_distance: 1.0,
            volume_preservation: 1.0,
        }
    }
}

impl StretchInputs {
    /// Applies the host's attribute range constraints (`enable` into
    /// `[0, 1]`, `stretchDistance` at least `0.001`).
    pub fn constrained(&self) -> Self {
        let clamp = |id: AttributeId, v: f64| match STRETCH_SCHEMA
            .attribute(id)
            .constrain(AttrValue::Float(v))
        {
            AttrValue::Float(c) => c,
            AttrValue::Double3(_) => v,
        };

        Self {
            enable: clamp(AttributeId::Enable, self.enable),
            stretch_distance: clamp(AttributeId::StretchDistance, self.stretch_distance),
            volume_preservation: clamp(AttributeId::VolumePreservation, self.volume_preservation),
            ..*self
        }
    }

    pub fn breakdown(&self) -> Evaluation {
        StretchEvaluator::breakdown(
            self.enable,
            self.root_position,
            self.end_position,
            self.stretch_distance,
            self.volume_preservation,
        )
    }

    pub fn evaluate(&self) -> StretchOutput {
        self.breakdown().output
    }

    pub fn try_evaluate(&self) -> Result<StretchOutput> {
        StretchEvaluator::try_evaluate(
            self.enable,
            self.root_position,
            self.end_position,
            self.stretch_distance,
            self.volume_preservation,
        )
    }
}

pub fn load_from_yaml_str(s: &str) -> Result<StretchInputs> {
    let inputs: StretchInputs = serde_yaml::from_str(s)?;
    Ok(inputs)
}

pub fn load_from_json_str(s: &str) -> Result<StretchInputs> {
    let inputs: StretchInputs = serde_json::from_str(s)?;
    Ok(inputs)
}

/// Loads a snapshot file; `.json` files are parsed as JSON, anything else
/// as YAML.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<StretchInputs> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_from_json_str(&data)
    } else {
        load_from_yaml_str(&data)
    }
}
