//! Piecewise-linear scales between coordinate spaces.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("A scale needs at least 2 control points, got {0}")]
    TooFewPoints(usize),
    #[error("Domain has {domain} points but range has {range}")]
    LengthMismatch { domain: usize, range: usize },
    #[error("Control point is not finite: {0}")]
    NonFinite(f64),
}

/// Maps a domain onto a range through matching control points.
///
/// Values between two domain points are interpolated linearly; values outside
/// the domain extrapolate along the first or last segment. A segment whose
/// domain points coincide maps to the midpoint of its range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ControlPoints")]
pub struct LinearScale {
    domain: Vec<f64>,
    range: Vec<f64>,
}

/// Serialized form, checked by [`LinearScale::new`] on the way in.
#[derive(Deserialize)]
struct ControlPoints {
    domain: Vec<f64>,
    range: Vec<f64>,
}

impl TryFrom<ControlPoints> for LinearScale {
    type Error = ScaleError;

    fn try_from(points: ControlPoints) -> Result<Self, Self::Error> {
        Self::new(points.domain, points.range)
    }
}

impl LinearScale {
    pub fn new(domain: Vec<f64>, range: Vec<f64>) -> Result<Self, ScaleError> {
        if domain.len() != range.len() {
            return Err(ScaleError::LengthMismatch {
                domain: domain.len(),
                range: range.len(),
            });
        }
        if domain.len() < 2 {
            return Err(ScaleError::TooFewPoints(domain.len()));
        }
        if let Some(&bad) = domain.iter().chain(range.iter()).find(|v| !v.is_finite()) {
            return Err(ScaleError::NonFinite(bad));
        }
        Ok(Self { domain, range })
    }

    /// Two-point scale `[d0, d1] -> [r0, r1]`.
    ///
    /// Always has two points; values must be finite, use [`LinearScale::new`]
    /// for unchecked input.
    pub fn linear(domain: [f64; 2], range: [f64; 2]) -> Self {
        debug_assert!(domain.iter().chain(&range).all(|v| v.is_finite()));
        Self {
            domain: domain.to_vec(),
            range: range.to_vec(),
        }
    }

    pub fn identity(extent: [f64; 2]) -> Self {
        Self::linear(extent, extent)
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    pub fn apply(&self, x: f64) -> f64 {
        let n = self.domain.len();
        let descending = self.domain[n - 1] < self.domain[0];

        let (segment, d0, d1, r0, r1) = if descending {
            // Walk the control points back to front so the domain ascends.
            let reversed: Vec<f64> = self.domain.iter().rev().copied().collect();
            let i = Self::segment_index(&reversed, x);
            let (a, b) = (n - 1 - i, n - 2 - i);
            (i, self.domain[a], self.domain[b], self.range[a], self.range[b])
        } else {
            let i = Self::segment_index(&self.domain, x);
            (i, self.domain[i], self.domain[i + 1], self.range[i], self.range[i + 1])
        };
        debug_assert!(segment + 1 < n);

        let span = d1 - d0;
        let t = if span != 0.0 { (x - d0) / span } else { 0.5 };
        r0 * (1.0 - t) + r1 * t
    }

    /// Index of the segment `[domain[i], domain[i + 1]]` used for `x`.
    fn segment_index(domain: &[f64], x: f64) -> usize {
        let interior = &domain[1..domain.len() - 1];
        interior.partition_point(|&d| d <= x)
    }
}
