use crate::errors::{LocomotionError, LocomotionResult};
use bevy::math::Vec3;
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

pub trait SampleCurve {
    type Output;
    fn sample(&self, x: f32) -> Self::Output;
}

/// Piecewise-linear scalar curve. Sampling outside the key range holds the end values.
///
/// Serialized as a plain list of `(x, y)` pairs; keys are kept sorted by `x`.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct FloatCurve {
    keys: Vec<(f32, f32)>,
}

impl FloatCurve {
    pub fn new(mut keys: Vec<(f32, f32)>) -> Self {
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn constant(value: f32) -> Self {
        Self::new(vec![(0., value)])
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    pub fn is_set(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Fails with [`LocomotionError::UnsetCurve`] if the curve has no keys.
    pub fn require(&self, name: &'static str) -> LocomotionResult<&Self> {
        if self.is_set() {
            Ok(self)
        } else {
            Err(LocomotionError::UnsetCurve(name))
        }
    }
}

impl From<Vec<(f32, f32)>> for FloatCurve {
    fn from(keys: Vec<(f32, f32)>) -> Self {
        Self::new(keys)
    }
}

impl From<FloatCurve> for Vec<(f32, f32)> {
    fn from(curve: FloatCurve) -> Self {
        curve.keys
    }
}

impl SampleCurve for FloatCurve {
    type Output = f32;

    fn sample(&self, x: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.;
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }

        // First key strictly after x; guaranteed to be in 1..len by the checks above
        let next = self.keys.partition_point(|k| k.0 <= x);
        let (x0, y0) = self.keys[next - 1];
        let (x1, y1) = self.keys[next];
        let f = if x1 == x0 { 0. } else { (x - x0) / (x1 - x0) };

        y0 + (y1 - y0) * f
    }
}

/// Three independent scalar curves sampled together.
#[derive(Reflect, Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct VectorCurve {
    pub x: FloatCurve,
    pub y: FloatCurve,
    pub z: FloatCurve,
}

impl VectorCurve {
    pub fn new(x: FloatCurve, y: FloatCurve, z: FloatCurve) -> Self {
        Self { x, y, z }
    }

    pub fn is_set(&self) -> bool {
        self.x.is_set() && self.y.is_set() && self.z.is_set()
    }

    pub fn require(&self, name: &'static str) -> LocomotionResult<&Self> {
        if self.is_set() {
            Ok(self)
        } else {
            Err(LocomotionError::UnsetCurve(name))
        }
    }
}

impl SampleCurve for VectorCurve {
    type Output = Vec3;

    fn sample(&self, x: f32) -> Vec3 {
        Vec3::new(self.x.sample(x), self.y.sample(x), self.z.sample(x))
    }
}
