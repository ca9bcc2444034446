//! Composition of per-dimension bin indices into one flat storage offset.

use binning::{Binning, Dimension};

use crate::{index, Error, Result};

/// The ordered dimensions of a histogram, together with the precomputed
/// row-major layout of its storage.
#[derive(Clone, Debug, PartialEq)]
pub struct Axes {
    dimensions: Vec<Dimension>,
    shape: Vec<usize>,
    strides: Vec<usize>,
    size: usize,
}

impl Axes {
    /// # Errors
    /// `NoDimensions` for an empty list, `TooManyBins` if the number of bins
    /// does not fit in `usize`.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self> {
        if dimensions.is_empty() { return Err(Error::NoDimensions) }
        let shape: Vec<usize> = dimensions.iter().map(Binning::nbins).collect();
        let strides = index::strides(&shape).ok_or_else(|| Error::TooManyBins(shape.clone()))?;
        let size    = index::size   (&shape).ok_or_else(|| Error::TooManyBins(shape.clone()))?;
        Ok(Self { dimensions, shape, strides, size })
    }

    /// Flat offset of the bin containing `values`: one value per dimension,
    /// in dimension order.
    ///
    /// NaN values are not rejected here; check with [`Axes::valid`] first.
    ///
    /// # Errors
    /// `ArityMismatch` unless exactly one value per dimension is supplied.
    #[inline]
    pub fn index(&self, values: &[f64]) -> Result<usize> {
        self.check_arity(values.len())?;
        Ok(self.offset(values))
    }

    // Caller guarantees one value per dimension
    #[inline]
    pub(crate) fn offset(&self, values: &[f64]) -> usize {
        self.dimensions.iter()
            .zip(&self.strides)
            .zip(values)
            .map(|((d, stride), &v)| Binning::index(d, v) * stride)
            .sum()
    }

    /// `false` if any value is NaN. Out-of-range values are valid: they land
    /// in the under/overflow bins.
    #[inline]
    pub fn valid(&self, values: &[f64]) -> bool { !values.iter().any(|v| v.is_nan()) }

    #[inline]
    pub(crate) fn check_arity(&self, got: usize) -> Result<()> {
        let expected = self.ndim();
        if got == expected { Ok(()) }
        else               { Err(Error::ArityMismatch { expected, got }) }
    }

    /// Number of bins in each dimension, including under/overflow.
    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn strides(&self) -> &[usize] { &self.strides }

    /// Total number of bins.
    pub fn size(&self) -> usize { self.size }

    pub fn ndim(&self) -> usize { self.dimensions.len() }

    pub fn dimensions(&self) -> &[Dimension] { &self.dimensions }

    /// Bin edges of every dimension, in dimension order.
    pub fn binedges(&self) -> Vec<Vec<f64>> {
        self.dimensions.iter().map(|d| d.edges().to_vec()).collect()
    }

    /// Names of every dimension, in dimension order.
    pub fn labels(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.name().to_owned()).collect()
    }

    /// Per-dimension bin indices of flat `offset`.
    pub fn unravel(&self, offset: usize) -> Option<Vec<usize>> { index::unravel(offset, &self.shape) }

    /// Flat offset of per-dimension bin indices.
    pub fn ravel(&self, bins: &[usize]) -> Option<usize> { index::ravel(bins, &self.shape) }
}

#[cfg(test)]
mod test_axes {
    use super::*;
    use binning::{General, Uniform};
    use rstest::{fixture, rstest};
    use pretty_assertions::assert_eq;

    const INF: f64 = f64::INFINITY;

    #[fixture]
    fn axes() -> Axes {
        let x = Uniform::linear(0.0, 10.0, 11, "x").unwrap();
        let y = General::new(&[0.0, 1.0, 2.0], "y").unwrap();
        Axes::new(vec![x.into(), y.into()]).unwrap()
    }

    #[rstest]
    fn shape_and_strides(axes: Axes) {
        assert_eq!(axes.shape(), &[13, 4]);
        assert_eq!(axes.strides(), &[4, 1]);
        assert_eq!(axes.size(), 52);
        assert_eq!(axes.ndim(), 2);
        assert_eq!(axes.labels(), vec!["x".to_string(), "y".to_string()]);
        assert_eq!(axes.binedges()[1], vec![-INF, 0.0, 1.0, 2.0, INF]);
        assert_eq!(axes.binedges()[0].len(), 14);
    }

    #[rstest]
    fn offset_combines_dimension_indices(axes: Axes) -> Result<()> {
        let dims = axes.dimensions();
        let expected = Binning::index(&dims[0], 1.0) * 4 + Binning::index(&dims[1], 1.0);
        assert_eq!(expected, 10);
        assert_eq!(axes.index(&[1.0, 1.0])?, 10);
        assert_eq!(axes.index(&[-INF, -INF])?, 0);
        assert_eq!(axes.index(&[ INF,  INF])?, 51);
        assert_eq!(axes.unravel(10), Some(vec![2, 2]));
        assert_eq!(axes.ravel(&[2, 2]), Some(10));
        Ok(())
    }

    #[rstest]
    fn wrong_arity(axes: Axes) {
        let values: [&[f64]; 3] = [&[], &[1.0], &[1.0, 2.0, 3.0]];
        for values in values {
            assert!(matches!(axes.index(values),
                             Err(Error::ArityMismatch { expected: 2, got }) if got == values.len()));
        }
    }

    #[rstest]
    fn nan_is_invalid_anywhere(axes: Axes) {
        assert!( axes.valid(&[1.0, 1.0]));
        assert!( axes.valid(&[-1e300, INF]));
        assert!(!axes.valid(&[f64::NAN, 1.0]));
        assert!(!axes.valid(&[1.0, f64::NAN]));
    }

    #[test]
    fn no_dimensions() {
        assert!(matches!(Axes::new(vec![]), Err(Error::NoDimensions)));
    }

    #[test]
    fn too_many_bins() -> Result<()> {
        let edges: Vec<f64> = (0..100_000).map(f64::from).collect();
        let d: Dimension = General::new(&edges, "")?.into();
        assert!(matches!(Axes::new(vec![d; 4]), Err(Error::TooManyBins(_))));
        Ok(())
    }
}
