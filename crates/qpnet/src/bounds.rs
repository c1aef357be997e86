use crate::{NetError, Tensor};
use serde::{Deserialize, Serialize};

/// Range of returns a value network can predict.
///
/// The network itself produces values in `[-1, 1]`; these bounds map that
/// interval onto `[lower, upper]` and back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueBounds {
    pub lower: f32,
    pub upper: f32,
}

impl Default for ValueBounds {
    fn default() -> Self {
        Self { lower: -200.0, upper: 400.0 }
    }
}

impl ValueBounds {
    /// # Errors
    /// Returns [`NetError::InvalidBounds`] unless `lower < upper` (both finite).
    pub fn new(lower: f32, upper: f32) -> Result<Self, NetError> {
        let bounds = Self { lower, upper };
        bounds.validate()?;
        Ok(bounds)
    }

    /// # Errors
    /// Returns [`NetError::InvalidBounds`] unless `lower < upper` (both finite).
    pub fn validate(&self) -> Result<(), NetError> {
        if self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper {
            Ok(())
        } else {
            Err(NetError::InvalidBounds { lower: self.lower, upper: self.upper })
        }
    }

    #[must_use]
    pub fn span(&self) -> f32 {
        self.upper - self.lower
    }

    /// Maps a return into `[-1, 1]`, clipping anything outside the bounds.
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        (2.0 * (value - self.lower) / self.span() - 1.0).clamp(-1.0, 1.0)
    }

    /// Maps a network output in `[-1, 1]` back onto `[lower, upper]`.
    #[must_use]
    pub fn denormalize(&self, y: f32) -> f32 {
        (y + 1.0) / 2.0 * self.span() + self.lower
    }

    #[must_use]
    pub fn normalize_tensor(&self, values: &Tensor) -> Tensor {
        values.map(|v| self.normalize(v))
    }

    /// Denormalizes and clamps, so rounding can never leave the bounds.
    #[must_use]
    pub fn denormalize_tensor(&self, y: &Tensor) -> Tensor {
        y.map(|v| self.denormalize(v).clamp(self.lower, self.upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_to_unit_interval() {
        let b = ValueBounds::default();
        assert_eq!(b.normalize(-200.0), -1.0);
        assert_eq!(b.normalize(400.0), 1.0);
        assert_eq!(b.normalize(100.0), 0.0);
        assert_eq!(b.denormalize(-1.0), -200.0);
        assert_eq!(b.denormalize(1.0), 400.0);
        assert_eq!(b.denormalize(0.0), 100.0);
    }

    #[test]
    fn normalize_clips_out_of_range() {
        let b = ValueBounds::default();
        assert_eq!(b.normalize(-1000.0), -1.0);
        assert_eq!(b.normalize(1000.0), 1.0);
    }

    #[test]
    fn round_trip_within_bounds() {
        let b = ValueBounds::new(-200.0, 400.0).unwrap();
        for i in 0..=600 {
            #[allow(clippy::cast_precision_loss)]
            let v = -200.0 + i as f32;
            let back = b.denormalize(b.normalize(v));
            assert!((back - v).abs() < 1e-3, "{v} -> {back}");
        }
    }

    #[test]
    fn rejects_inverted_or_degenerate_bounds() {
        assert!(ValueBounds::new(1.0, 1.0).is_err());
        assert!(ValueBounds::new(5.0, -5.0).is_err());
        assert!(ValueBounds::new(f32::NAN, 1.0).is_err());
        assert!(ValueBounds::new(-1.0, f32::INFINITY).is_err());
    }
}
