//! The stretch/squash evaluation routine.
//!
//! Given a root and end joint position, a rest distance, an enable weight
//! and a volume-preservation exponent, [`StretchEvaluator`] computes:
//!
//! 1. `distance`: Euclidean distance between root and end.
//! 2. `raw_stretch = distance / stretch_distance`.
//! 3. `blend = 1 - enable`.
//! 4. `stretch = enable * raw_stretch + blend * 1.0` (a lerp, not a clamp).
//! 5. `volume = 1 / stretch.powf(volume_exponent)`, from the stretch
//!    **before** flooring.
//! 6. The reported stretch is floored at `1.0`.
//!
//! Step 5 uses the pre-floor value, so a compressed chain
//! reports `stretch == 1.0` together with a volume factor above one.

use glam::DVec3;

use crate::error::{Result, StretchError};
use crate::types::AttributeId;

/// Final values written to the node's output channels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StretchOutput {
    /// Scale along the stretch axis, never below `1.0` for valid inputs.
    pub stretch: f64,
    /// Scale applied to both non-stretch axes.
    pub volume: f64,
}

impl StretchOutput {
    /// Packs the result as `(stretch, volume, volume)`.
    pub fn channels(&self) -> DVec3 {
        DVec3::new(self.stretch, self.volume, self.volume)
    }
}

/// Every intermediate of one evaluation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Evaluation {
    pub distance: f64,
    pub raw_stretch: f64,
    pub blend: f64,
    pub pre_floor_stretch: f64,
    pub output: StretchOutput,
}

/// Stateless evaluator; all methods are pure functions of their arguments.
#[derive(Debug, Default, Copy, Clone)]
pub struct StretchEvaluator;

impl StretchEvaluator {
    /// Runs the evaluation and returns every intermediate value.
    ///
    /// No argument is validated. `stretch_distance == 0` divides by zero and
    /// `enable` outside `[0, 1]` extrapolates linearly; results follow IEEE
    /// arithmetic (`inf` / `NaN`).
    pub fn breakdown(
        enable: f64,
        root: DVec3,
        end: DVec3,
        stretch_distance: f64,
        volume_exponent: f64,
    ) -> Evaluation {
        let distance = root.distance(end);
        let raw_stretch = distance / stretch_distance;
        let blend = 1.0 - enable;
        let pre_floor_stretch = enable * raw_stretch + blend * 1.0;

        let volume = 1.0 / pre_floor_stretch.powf(volume_exponent);

        let stretch = if pre_floor_stretch < 1.0 {
            1.0
        } else {
            pre_floor_stretch
        };

        Evaluation {
            distance,
            raw_stretch,
            blend,
            pre_floor_stretch,
            output: StretchOutput { stretch, volume },
        }
    }

    /// Computes `(stretch, volume)` without any precondition checks.
    ///
    /// When root and end coincide with `enable == 1` and a positive
    /// exponent, the volume factor is `+inf`.
    #[inline]
    pub fn evaluate(
        enable: f64,
        root: DVec3,
        end: DVec3,
        stretch_distance: f64,
        volume_exponent: f64,
    ) -> StretchOutput {
        Self::breakdown(enable, root, end, stretch_distance, volume_exponent).output
    }

    /// Computes `(stretch, volume)`, rejecting inputs whose result would be
    /// undefined.
    ///
    /// ### Errors
    /// - [`StretchError::InvalidDivisor`] if `stretch_distance` is not
    ///   strictly positive.
    /// - [`StretchError::NonFiniteInput`] if `enable`, either position or
    ///   `volume_exponent` holds a NaN or infinite component.
    /// - [`StretchError::DomainError`] if the pre-floor stretch is negative
    ///   and `volume_exponent` is not an integer.
    /// - [`StretchError::SingularVolume`] if the pre-floor stretch is zero
    ///   and `volume_exponent` is positive.
    pub fn try_evaluate(
        enable: f64,
        root: DVec3,
        end: DVec3,
        stretch_distance: f64,
        volume_exponent: f64,
    ) -> Result<StretchOutput> {
        if !(stretch_distance > 0.0) {
            return Err(StretchError::InvalidDivisor(stretch_distance));
        }

        let finite = [
            (AttributeId::Enable, enable.is_finite()),
            (AttributeId::RootPosition, root.is_finite()),
            (AttributeId::EndPosition, end.is_finite()),
            (AttributeId::VolumePreservation, volume_exponent.is_finite()),
        ];
        if let Some(&(attribute, _)) = finite.iter().find(|(_, ok)| !ok) {
            return Err(StretchError::NonFiniteInput(attribute));
        }

        let eval = Self::breakdown(enable, root, end, stretch_distance, volume_exponent);
        let s = eval.pre_floor_stretch;

        if s < 0.0 && volume_exponent.fract() != 0.0 {
            return Err(StretchError::DomainError {
                stretch: s,
                exponent: volume_exponent,
            });
        }
        if s == 0.0 && volume_exponent > 0.0 {
            return Err(StretchError::SingularVolume(volume_exponent));
        }

        Ok(eval.output)
    }
}
