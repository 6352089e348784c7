//! Multi-octave fractal noise layers.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::source::NoiseSource;
use crate::error::{DeformError, ParamLocation};

/// Parameters for one octave stack of displacement noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseLayerParams {
    /// Number of noise octaves summed in this layer (>= 1).
    pub num_octaves: u32,
    /// Amplitude decay per octave (0-1 typical).
    pub persistence: f32,
    /// Sampling frequency of the first octave (> 0).
    pub base_frequency: f32,
    /// Frequency growth per octave, a.k.a. roughness (2.0 typical).
    pub frequency_multiplier: f32,
    /// Multiplier applied to the clamped octave sum (>= 0).
    pub strength: f32,
    /// Floor applied to the octave sum before `strength`.
    pub min_value: f32,
    /// Offset added to the sampling coordinates at every octave.
    pub center: Vec3,
}

impl Default for NoiseLayerParams {
    fn default() -> Self {
        Self {
            num_octaves: 4,
            persistence: 0.5,
            base_frequency: 1.0,
            frequency_multiplier: 2.0,
            strength: 0.8,
            min_value: 1.0,
            center: Vec3::ZERO,
        }
    }
}

impl NoiseLayerParams {
    /// Gentle, low-frequency hills.
    pub fn smooth() -> Self {
        Self {
            num_octaves: 3,
            persistence: 0.4,
            base_frequency: 0.8,
            frequency_multiplier: 2.0,
            strength: 0.15,
            min_value: 0.0,
            center: Vec3::ZERO,
        }
    }

    /// Many octaves of fine, rough detail.
    pub fn rugged() -> Self {
        Self {
            num_octaves: 8,
            persistence: 0.55,
            base_frequency: 1.5,
            frequency_multiplier: 2.3,
            strength: 0.3,
            min_value: 0.9,
            center: Vec3::ZERO,
        }
    }

    /// Returns a copy panned to `center`.
    pub fn with_center(self, center: Vec3) -> Self {
        Self { center, ..self }
    }

    /// Returns a copy with a different `strength`.
    pub fn with_strength(self, strength: f32) -> Self {
        Self { strength, ..self }
    }

    /// Checks that the parameters describe a usable octave stack.
    pub fn validate(&self) -> Result<(), DeformError> {
        self.validate_at(ParamLocation::Standalone)
    }

    pub(crate) fn validate_at(&self, location: ParamLocation) -> Result<(), DeformError> {
        let fail = |reason: String| DeformError::InvalidParameter { location, reason };

        if self.num_octaves == 0 {
            return Err(fail("num_octaves must be at least 1".into()));
        }
        if !(self.base_frequency.is_finite() && self.base_frequency > 0.0) {
            return Err(fail(format!(
                "base_frequency must be finite and > 0, got {}",
                self.base_frequency
            )));
        }
        if !(self.frequency_multiplier.is_finite() && self.frequency_multiplier > 0.0) {
            return Err(fail(format!(
                "frequency_multiplier must be finite and > 0, got {}",
                self.frequency_multiplier
            )));
        }
        if !(self.strength.is_finite() && self.strength >= 0.0) {
            return Err(fail(format!(
                "strength must be finite and >= 0, got {}",
                self.strength
            )));
        }
        if !self.persistence.is_finite() {
            return Err(fail(format!("persistence must be finite, got {}", self.persistence)));
        }
        if !self.min_value.is_finite() {
            return Err(fail(format!("min_value must be finite, got {}", self.min_value)));
        }
        if !self.center.is_finite() {
            return Err(fail(format!("center must be finite, got {}", self.center)));
        }
        Ok(())
    }
}

/// Evaluates one noise layer at `point`.
///
/// Each octave sample is remapped from `[-1, 1]` to `[0, 1]` and weighted by
/// the current amplitude. The floor `min_value` is applied once to the full
/// octave sum, then the result is multiplied by `strength`.
///
/// # Arguments
/// * `noise` - The noise field to sample
/// * `point` - Sampling position, typically a unit direction
/// * `params` - Octave stack parameters (assumed valid)
///
/// # Returns
/// The layer value, never below `min_value * strength` when finite. Returns a
/// non-finite value, never floored, if the amplitude or frequency recurrence
/// overflows or an octave coordinate leaves the field's sampling range.
pub fn evaluate<N>(noise: &N, point: Vec3, params: &NoiseLayerParams) -> f32
where
    N: NoiseSource + ?Sized,
{
    let limit = noise.max_coordinate();
    let mut value = 0.0f32;
    let mut frequency = params.base_frequency;
    let mut amplitude = 1.0f32;

    for _ in 0..params.num_octaves {
        let coordinate = point * frequency + params.center;
        if !(coordinate.is_finite() && coordinate.abs().max_element() <= limit) {
            return f32::NAN;
        }
        let sample = noise.sample(coordinate);
        value += (sample + 1.0) * 0.5 * amplitude;
        amplitude *= params.persistence;
        frequency *= params.frequency_multiplier;
    }

    if !value.is_finite() {
        return value;
    }
    value.max(params.min_value) * params.strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{NoiseBackend, SeededNoise};

    fn constant(v: f32) -> impl Fn(Vec3) -> f32 + Send + Sync {
        move |_| v
    }

    #[test]
    fn test_default_params() {
        let params = NoiseLayerParams::default();
        assert_eq!(params.num_octaves, 4);
        assert_eq!(params.persistence, 0.5);
        assert_eq!(params.base_frequency, 1.0);
        assert_eq!(params.frequency_multiplier, 2.0);
        assert_eq!(params.strength, 0.8);
        assert_eq!(params.min_value, 1.0);
        assert_eq!(params.center, Vec3::ZERO);
        assert!(params.validate().is_ok());
        assert!(NoiseLayerParams::smooth().validate().is_ok());
        assert!(NoiseLayerParams::rugged().validate().is_ok());
    }

    #[test]
    fn test_single_octave_constant_sample() {
        let params = NoiseLayerParams {
            num_octaves: 1,
            persistence: 0.5,
            base_frequency: 1.0,
            frequency_multiplier: 2.0,
            strength: 1.0,
            min_value: 0.0,
            center: Vec3::ZERO,
        };
        let value = evaluate(&constant(0.2), Vec3::X, &params);
        assert!((value - 0.6).abs() < 1e-6, "expected 0.6, got {}", value);
    }

    #[test]
    fn test_floor_applies_to_sum_not_octaves() {
        // Each octave contributes 0.25, 0.125: sum 0.375 lies below the floor.
        let params = NoiseLayerParams {
            num_octaves: 2,
            persistence: 0.5,
            min_value: 0.5,
            strength: 2.0,
            ..Default::default()
        };
        let value = evaluate(&constant(-0.5), Vec3::Y, &params);
        assert!((value - 1.0).abs() < 1e-6, "floor 0.5 * strength 2 = 1, got {}", value);

        // Above the floor the sum passes through untouched.
        let value = evaluate(&constant(1.0), Vec3::Y, &params);
        assert!((value - 3.0).abs() < 1e-6, "(1 + 0.5) * 2 = 3, got {}", value);
    }

    #[test]
    fn test_octave_increments_strictly_decrease() {
        let noise = constant(0.2);
        let mut previous_value = 0.0f32;
        let mut previous_increment = f32::INFINITY;

        for octaves in 1..=8 {
            let params = NoiseLayerParams {
                num_octaves: octaves,
                persistence: 0.5,
                min_value: f32::MIN,
                strength: 1.0,
                ..Default::default()
            };
            let value = evaluate(&noise, Vec3::Z, &params);
            let increment = value - previous_value;
            assert!(increment > 0.0);
            assert!(
                increment < previous_increment,
                "octave {} added {} after {}",
                octaves,
                increment,
                previous_increment
            );
            previous_value = value;
            previous_increment = increment;
        }

        // The geometric series bounds the total at 0.6 / (1 - 0.5).
        assert!(previous_value < 1.2);
    }

    #[test]
    fn test_center_pans_sampling_coordinates() {
        let probe = |p: Vec3| (p.x - 3.0).clamp(-1.0, 1.0);
        let params = NoiseLayerParams {
            num_octaves: 1,
            min_value: f32::MIN,
            strength: 1.0,
            center: Vec3::new(3.0, 0.0, 0.0),
            ..Default::default()
        };
        // point.x * 1.0 + 3.0 - 3.0 == 0 => sample 0 => remapped 0.5
        let value = evaluate(&probe, Vec3::ZERO, &params);
        assert!((value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_runaway_frequency_is_not_sampled() {
        let params = NoiseLayerParams {
            num_octaves: 3,
            frequency_multiplier: 1e30,
            ..Default::default()
        };
        // The third octave's frequency overflows to infinity.
        let guarded = |p: Vec3| {
            assert!(p.is_finite(), "sampled at {:?}", p);
            0.0f32
        };
        assert!(evaluate(&guarded, Vec3::X, &params).is_nan());

        for backend in [NoiseBackend::Simplex, NoiseBackend::Perlin, NoiseBackend::Simd] {
            let value = evaluate(&SeededNoise::new(backend, 3), Vec3::X, &params);
            assert!(value.is_nan(), "{:?} gave {}", backend, value);
        }
    }

    #[test]
    fn test_non_finite_sum_is_not_floored() {
        let params = NoiseLayerParams {
            num_octaves: 4,
            persistence: -1e13,
            min_value: 0.0,
            ..Default::default()
        };
        let value = evaluate(&constant(0.2), Vec3::X, &params);
        assert!(!value.is_finite(), "runaway amplitude was floored to {}", value);

        let value = evaluate(&constant(f32::NAN), Vec3::X, &NoiseLayerParams::default());
        assert!(value.is_nan(), "NaN sample was floored to {}", value);
    }

    #[test]
    fn test_value_never_below_floor() {
        let noise = SeededNoise::simplex(99);
        let params = NoiseLayerParams::default();
        for i in 0..200 {
            let t = i as f32 * 0.13;
            let p = Vec3::new(t.cos(), t.sin(), (t * 0.5).sin()).normalize();
            let v = evaluate(&noise, p, &params);
            assert!(v >= params.min_value * params.strength - 1e-6);
        }
    }

    #[test]
    fn test_validation_rejects_bad_fields() {
        let bad = [
            NoiseLayerParams { num_octaves: 0, ..Default::default() },
            NoiseLayerParams { base_frequency: 0.0, ..Default::default() },
            NoiseLayerParams { base_frequency: -1.0, ..Default::default() },
            NoiseLayerParams { frequency_multiplier: 0.0, ..Default::default() },
            NoiseLayerParams { strength: -0.1, ..Default::default() },
            NoiseLayerParams { persistence: f32::NAN, ..Default::default() },
            NoiseLayerParams { min_value: f32::INFINITY, ..Default::default() },
            NoiseLayerParams { center: Vec3::new(f32::NAN, 0.0, 0.0), ..Default::default() },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(DeformError::InvalidParameter { .. })),
                "{:?} should be rejected",
                params
            );
        }
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: NoiseLayerParams =
            serde_json::from_str(r#"{ "strength": 1.5, "center": [1.0, 2.0, 3.0] }"#).unwrap();
        assert_eq!(params.strength, 1.5);
        assert_eq!(params.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(params.num_octaves, 4);
    }
}
