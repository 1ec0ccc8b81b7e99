/*
    Unit Converters
        Coefficients are ordered from the highest degree to the constant term
*/

use super::*;

/* --------------------------- Converter Trait -------------------------- */
pub trait Converter {
    fn convert(&self, value: f32) -> f32;
}

fn horner(coefficients: &[f32], value: f32) -> f32 {
    coefficients
        .iter()
        .fold(0.0, |acc, coefficient| acc * value + coefficient)
}

/* --------------------------- Polynomial -------------------------- */
pub struct PolynomialConverter<const NC: usize> {
    coefficients: [f32; NC],
}

impl<const NC: usize> PolynomialConverter<NC> {
    pub const fn new(coefficients: [f32; NC]) -> Self {
        Self { coefficients }
    }
}

impl<const NC: usize> Converter for PolynomialConverter<NC> {
    fn convert(&self, value: f32) -> f32 {
        horner(&self.coefficients, value)
    }
}

/* --------------------------- Spline -------------------------- */
/// NB breakpoints split the input axis into NS = NB + 1 polynomial segments.
pub struct SplineConverter<const NB: usize, const NS: usize, const NC: usize> {
    breaks: [f32; NB],
    segments: [[f32; NC]; NS],
}

impl<const NB: usize, const NS: usize, const NC: usize> SplineConverter<NB, NS, NC> {
    pub fn new(breaks: [f32; NB], segments: [[f32; NC]; NS]) -> Result<Self, ConfigError> {
        if NS != NB + 1 {
            return Err(ConfigError::SegmentCountMismatch);
        }
        if breaks.windows(2).any(|pair| !(pair[0] < pair[1])) {
            return Err(ConfigError::UnsortedBreakpoints);
        }

        Ok(Self { breaks, segments })
    }

    fn segment(&self, value: f32) -> &[f32; NC] {
        let index = self.breaks
            .iter()
            .position(|limit| value <= *limit)
            .unwrap_or(NB);

        &self.segments[index]
    }

    /// Largest difference between the two segments meeting at a breakpoint.
    pub fn continuity_error(&self) -> f32 {
        self.breaks
            .iter()
            .enumerate()
            .map(|(i, limit)| {
                let left = horner(&self.segments[i], *limit);
                let right = horner(&self.segments[i + 1], *limit);
                fabsf(left - right)
            })
            .fold(0.0, f32::max)
    }
}

impl<const NB: usize, const NS: usize, const NC: usize> Converter for SplineConverter<NB, NS, NC> {
    fn convert(&self, value: f32) -> f32 {
        horner(self.segment(value), value)
    }
}

/* --------------------------- Test -------------------------- */
