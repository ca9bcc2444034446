use crate::general::validate_edges;
use crate::{Binning, Error, Result, Transform};

/// An equispaced binning scheme.
///
/// The bin edges are uniform under some [`Transform`] between set limits, so
/// the bin index is found in constant time.
///
/// `nbins` requested bins between `low` and `high` give `nbins + 2` bins in
/// total: underflow, the requested ones, overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct Uniform {
    name: String,
    edges: Vec<f64>,
    transform: Transform,
    offset: f64,
    range: f64,
    min: f64,
    max: f64,
    nbins: usize,
}

impl Uniform {
    /// `nbins` bins between `low` and `high`, equispaced under `transform`.
    ///
    /// # Errors
    /// `NoBins` if `nbins == 0`. `InvalidRange` if the limits are not finite
    /// and increasing, or if the transform cannot produce strictly increasing
    /// finite edges spanning exactly `[low, high]` (e.g. `Log10` with
    /// `low <= 0`, or `Cosine` outside `[0, π]`).
    pub fn new(low: f64, high: f64, nbins: usize, transform: Transform, name: impl Into<String>) -> Result<Self> {
        let invalid = || Error::InvalidRange { low, high, transform };
        if nbins == 0 { return Err(Error::NoBins) }
        if !(low.is_finite() && high.is_finite() && low < high) { return Err(invalid()) }
        if transform == Transform::Power(0) { return Err(invalid()) }

        let offset = transform.imap(low);
        let range  = transform.imap(high) - offset;
        if !(offset.is_finite() && range.is_finite() && range != 0.0) { return Err(invalid()) }

        let mut this = Self {
            name: name.into(),
            edges: Vec::with_capacity(nbins + 3),
            transform, offset, range,
            min: 0.0, max: 0.0,
            nbins,
        };
        this.min = this.map(0.0);
        this.max = this.map(1.0);

        // Limits outside the transform's monotonic domain come back as other values
        let tolerance = 1e-9 * low.abs().max(high.abs()).max(high - low);
        if !((this.min - low).abs() <= tolerance && (this.max - high).abs() <= tolerance) {
            return Err(invalid())
        }

        this.edges.push(f64::NEG_INFINITY);
        for i in 0..=nbins {
            let edge = this.map(i as f64 / nbins as f64);
            this.edges.push(edge);
        }
        this.edges.push(f64::INFINITY);
        validate_edges(&this.edges).map_err(|_| invalid())?;
        Ok(this)
    }

    pub fn linear(low: f64, high: f64, nbins: usize, name: impl Into<String>) -> Result<Self> {
        Self::new(low, high, nbins, Transform::Identity, name)
    }

    pub fn log10(low: f64, high: f64, nbins: usize, name: impl Into<String>) -> Result<Self> {
        Self::new(low, high, nbins, Transform::Log10, name)
    }

    pub fn cosine(low: f64, high: f64, nbins: usize, name: impl Into<String>) -> Result<Self> {
        Self::new(low, high, nbins, Transform::Cosine, name)
    }

    pub fn power(n: i32, low: f64, high: f64, nbins: usize, name: impl Into<String>) -> Result<Self> {
        Self::new(low, high, nbins, Transform::Power(n), name)
    }

    /// Lower limit of the finite range (start of bin 1)
    pub fn low(&self) -> f64 { self.min }
    /// Upper limit of the finite range (start of the overflow bin)
    pub fn high(&self) -> f64 { self.max }

    pub fn transform(&self) -> Transform { self.transform }

    // Unit interval to value axis
    #[inline]
    fn map(&self, u: f64) -> f64 { self.transform.map(self.range * u + self.offset) }

    // Value axis to unit interval
    #[inline]
    fn imap(&self, x: f64) -> f64 { (self.transform.imap(x) - self.offset) / self.range }
}

impl Binning for Uniform {
    #[inline]
    fn index(&self, value: f64) -> usize {
        if value.is_nan() || value < self.min { 0 }
        else if value >= self.max             { self.nbins + 1 }
        else {
            let step = (self.nbins as f64 * self.imap(value)).floor() as usize;
            step.min(self.nbins - 1) + 1
        }
    }

    fn edges(&self) -> &[f64] { &self.edges }

    fn nbins(&self) -> usize { self.nbins + 2 }

    fn name(&self) -> &str { &self.name }
}
