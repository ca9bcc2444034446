//! Binning schemes: rules mapping a scalar value onto a zero-based bin index.
//!
//! Every scheme covers the whole real line. Values below the user-supplied
//! range land in the underflow bin (index 0), values above it in the overflow
//! bin (index `nbins() - 1`), so `index` never fails for a non-NaN input.

mod general;
mod transform;
mod uniform;

pub use general::General;
pub use transform::Transform;
pub use uniform::Uniform;

pub use ndhistogram::axis::BinInterval;

use ndhistogram::axis::Axis;

/// Problems detected while constructing a binning scheme.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("malformed bin edges: {0}")]
    MalformedEdges(String),

    #[error("uniform binning needs at least one bin")]
    NoBins,

    #[error("cannot bin uniformly between {low} and {high} under {transform:?}")]
    InvalidRange { low: f64, high: f64, transform: Transform },
}

pub type Result<T> = std::result::Result<T, Error>;

/// The capabilities shared by all binning schemes.
pub trait Binning {
    /// Index of the bin containing `value`, in `[0, nbins())`.
    ///
    /// NaN is not meaningful here; schemes send it to the underflow bin, but
    /// callers are expected to filter it out beforehand.
    fn index(&self, value: f64) -> usize;

    /// Bin boundaries, `nbins() + 1` of them, from `-inf` to `+inf`.
    fn edges(&self) -> &[f64];

    fn nbins(&self) -> usize { self.edges().len() - 1 }

    fn name(&self) -> &str;

    /// The interval covered by bin `index`.
    fn bin(&self, index: usize) -> Option<BinInterval<f64>> {
        let edges = self.edges();
        let (&lo, &hi) = (edges.get(index)?, edges.get(index + 1)?);
        Some(if      lo == f64::NEG_INFINITY { BinInterval::underflow(hi) }
             else if hi == f64::INFINITY     { BinInterval::overflow (lo) }
             else                            { BinInterval::new  (lo, hi) })
    }
}

/// Any of the available binning schemes, as stored by a histogram.
#[derive(Clone, Debug, PartialEq)]
pub enum Dimension {
    General(General),
    Uniform(Uniform),
}

impl Binning for Dimension {
    #[inline]
    fn index(&self, value: f64) -> usize {
        match self {
            Dimension::General(d) => Binning::index(d, value),
            Dimension::Uniform(d) => Binning::index(d, value),
        }
    }

    fn edges(&self) -> &[f64] {
        match self {
            Dimension::General(d) => d.edges(),
            Dimension::Uniform(d) => d.edges(),
        }
    }

    fn name(&self) -> &str {
        match self {
            Dimension::General(d) => d.name(),
            Dimension::Uniform(d) => d.name(),
        }
    }
}

impl From<General> for Dimension { fn from(d: General) -> Self { Self::General(d) } }
impl From<Uniform> for Dimension { fn from(d: Uniform) -> Self { Self::Uniform(d) } }

// --------------------------------------------------------------------------------
// Let the schemes act as `ndhistogram` axes. NaN has no bin there.
macro_rules! binning_axis {
    ($($scheme:ty),*) => {
        $(
            impl Axis for $scheme {
                type Coordinate = f64;
                type BinInterval = BinInterval<f64>;
                fn index(&self, coordinate: &f64) -> Option<usize> {
                    if coordinate.is_nan() { None }
                    else                   { Some(Binning::index(self, *coordinate)) }
                }
                fn num_bins(&self) -> usize { Binning::nbins(self) }
                fn bin(&self, index: usize) -> Option<Self::BinInterval> { Binning::bin(self, index) }
            }
        )*
    };
}

binning_axis!(General, Uniform, Dimension);


#[cfg(test)]
mod test_ndhistogram_axis {
    use super::{Dimension, General, Uniform, Result};
    use ndhistogram::{ndhistogram, Histogram, axis::Axis};

    #[test]
    fn fill_ndhistogram_with_binning_axes() -> Result<()> {
        let x = Uniform::linear(0.0, 10.0, 10, "x")?;
        let y = General::new(&[0.0, 1.0, 2.0], "y")?;
        assert_eq!(Axis::num_bins(&x), 12);
        let mut h = ndhistogram!(x, y; usize);
        h.fill(&(3.5, 1.5));
        h.fill(&(3.5, 1.5));
        h.fill(&(f64::NAN, 1.5));
        assert_eq!(h.value(&(3.5, 1.5)), Some(&2));
        assert_eq!(h.value(&(3.5, 0.5)), Some(&0));
        Ok(())
    }

    #[test]
    fn nan_has_no_axis_bin() -> Result<()> {
        let d: Dimension = General::new(&[0.0], "")?.into();
        assert_eq!(Axis::index(&d, &f64::NAN), None);
        assert_eq!(Axis::index(&d, &-1.0), Some(0));
        Ok(())
    }
}
