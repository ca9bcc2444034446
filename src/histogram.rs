//! The histogram accumulator: bin contents and squared weights over a fixed
//! set of dimensions.

use binning::{Binning, Dimension};
use ndarray::{ArrayViewD, IxDyn};
use rayon::prelude::*;

use crate::{index, Axes, Error, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    title: String,
    axes: Axes,
    bincontent: Vec<f64>,
    squaredweights: Vec<f64>,
    n_entries: u64,
}

impl Histogram {
    /// An empty histogram over `dimensions`, in the given order.
    ///
    /// # Errors
    /// `NoDimensions` if `dimensions` is empty, `TooManyBins` if the storage
    /// size overflows.
    pub fn new(dimensions: Vec<Dimension>, title: impl Into<String>) -> Result<Self> {
        let axes = Axes::new(dimensions)?;
        let size = axes.size();
        let title = title.into();
        tracing::debug!(%title, shape = ?axes.shape(), "new histogram");
        Ok(Self {
            title,
            axes,
            bincontent:     vec![0.0; size],
            squaredweights: vec![0.0; size],
            n_entries: 0,
        })
    }

    /// Rebuild a histogram from previously accumulated arrays.
    ///
    /// # Errors
    /// `ShapeMismatch` if either array's length differs from the number of
    /// bins implied by `dimensions`.
    pub fn from_parts(
        dimensions: Vec<Dimension>,
        title: impl Into<String>,
        n_entries: u64,
        bincontent: Vec<f64>,
        squaredweights: Vec<f64>,
    ) -> Result<Self> {
        let axes = Axes::new(dimensions)?;
        let expected = axes.size();
        for (what, data) in [("bincontent", &bincontent), ("squaredweights", &squaredweights)] {
            if data.len() != expected {
                return Err(Error::ShapeMismatch { what: what.into(), expected, got: data.len() });
            }
        }
        Ok(Self { title: title.into(), axes, bincontent, squaredweights, n_entries })
    }

    /// Fill with unit weight. See [`Histogram::fill_with_weight`].
    #[inline]
    pub fn fill(&mut self, values: &[f64]) -> Result<bool> { self.fill_with_weight(1.0, values) }

    /// Add `weight` to the bin containing `values`, one value per dimension in
    /// dimension order.
    ///
    /// Returns `Ok(false)`, leaving the histogram untouched, if any value is
    /// NaN.
    ///
    /// # Errors
    /// `ArityMismatch` unless exactly one value per dimension is supplied.
    #[inline]
    pub fn fill_with_weight(&mut self, weight: f64, values: &[f64]) -> Result<bool> {
        self.axes.check_arity(values.len())?;
        Ok(self.accumulate(weight, values))
    }

    // Caller guarantees one value per dimension
    #[inline]
    fn accumulate(&mut self, weight: f64, values: &[f64]) -> bool {
        if !self.axes.valid(values) { return false }
        let offset = self.axes.offset(values);
        self.bincontent    [offset] += weight;
        self.squaredweights[offset] += weight * weight;
        self.n_entries += 1;
        true
    }

    /// Fill with unit weight each of `events`, splitting the work across the
    /// current `rayon` thread pool in chunks of `job_size` events.
    ///
    /// Every chunk accumulates into its own empty copy of the histogram, and
    /// the copies are then summed, so each chunk costs one allocation and one
    /// addition over all bins. `job_size` is raised as needed to keep the
    /// number of chunks at most [`SHARDS_PER_THREAD`] per pool thread.
    ///
    /// Returns the number of events that were accepted (NaN-free).
    ///
    /// # Errors
    /// `ArityMismatch` if any event has the wrong number of values, in which
    /// case nothing is filled.
    pub fn fill_par<E>(&mut self, events: &[E], job_size: usize) -> Result<u64>
    where
        E: AsRef<[f64]> + Sync,
    {
        if let Some(bad) = events.iter().find(|e| e.as_ref().len() != self.ndim()) {
            self.axes.check_arity(bad.as_ref().len())?;
        }

        let shard = {
            let empty_histogram = || self.empty_clone();
            let add_histograms = |mut a: Histogram, b: Histogram| { a.add_unchecked(&b); a };
            let event_into_histogram = |mut h: Histogram, event: &E| { h.accumulate(1.0, event.as_ref()); h };

            events.par_iter()
                .fold_chunks(shard_size(job_size, events.len(), rayon::current_num_threads()),
                             empty_histogram, event_into_histogram)
                .reduce(empty_histogram, add_histograms)
        };

        let accepted = shard.n_entries;
        self.add_unchecked(&shard);
        Ok(accepted)
    }

    /// Add the contents of `other` into `self`.
    ///
    /// # Errors
    /// `IncompatibleBinning` unless both histograms have identical bin edges
    /// in every dimension.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        self.check_compatible(other)?;
        self.add_unchecked(other);
        Ok(())
    }

    fn check_compatible(&self, other: &Histogram) -> Result<()> {
        if self.ndim() != other.ndim() {
            return Err(Error::IncompatibleBinning(
                format!("{} dimensions vs {}", self.ndim(), other.ndim())
            ));
        }
        let pairs = self.axes.dimensions().iter().zip(other.axes.dimensions());
        for (i, (a, b)) in pairs.enumerate() {
            if a.edges() != b.edges() {
                return Err(Error::IncompatibleBinning(
                    format!("edges of dimension {i} (`{}` vs `{}`) differ", a.name(), b.name())
                ));
            }
        }
        Ok(())
    }

    fn add_unchecked(&mut self, other: &Histogram) {
        for (a, b) in self.bincontent    .iter_mut().zip(&other.bincontent    ) { *a += b }
        for (a, b) in self.squaredweights.iter_mut().zip(&other.squaredweights) { *a += b }
        self.n_entries += other.n_entries;
    }

    fn empty_clone(&self) -> Self {
        let size = self.axes.size();
        Self {
            title: self.title.clone(),
            axes: self.axes.clone(),
            bincontent:     vec![0.0; size],
            squaredweights: vec![0.0; size],
            n_entries: 0,
        }
    }

    pub fn bincontent    (&self) -> BinView<'_> { BinView { data: &self.bincontent    , shape: self.axes.shape() } }
    pub fn squaredweights(&self) -> BinView<'_> { BinView { data: &self.squaredweights, shape: self.axes.shape() } }

    /// Number of successful fills
    pub fn n_entries(&self) -> u64 { self.n_entries }

    pub fn title(&self) -> &str { &self.title }
    pub fn set_title(&mut self, title: impl Into<String>) { self.title = title.into() }

    pub fn ndim(&self) -> usize { self.axes.ndim() }
    pub fn shape(&self) -> &[usize] { self.axes.shape() }
    pub fn binedges(&self) -> Vec<Vec<f64>> { self.axes.binedges() }
    pub fn labels(&self) -> Vec<String> { self.axes.labels() }
    pub fn axes(&self) -> &Axes { &self.axes }
}

/// Upper limit on the number of histogram copies per thread made by
/// [`Histogram::fill_par`]
pub const SHARDS_PER_THREAD: usize = 4;

// Events per chunk: at least `job_size`, and large enough that `n_events` make
// at most `SHARDS_PER_THREAD` chunks per thread
fn shard_size(job_size: usize, n_events: usize, threads: usize) -> usize {
    let fewest = n_events.div_ceil(SHARDS_PER_THREAD * threads.max(1));
    job_size.max(fewest).max(1)
}

/// Panics if the bin edges differ; [`Histogram::merge`] is the fallible
/// version.
impl std::ops::AddAssign<&Histogram> for Histogram {
    fn add_assign(&mut self, rhs: &Histogram) {
        if let Err(e) = self.merge(rhs) { panic!("{e}") }
    }
}

// --------------------------------------------------------------------------------
/// Read-only view of one of a histogram's flat arrays, together with the
/// histogram's shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinView<'h> {
    data: &'h [f64],
    shape: &'h [usize],
}

impl<'h> BinView<'h> {
    /// Row-major flat data
    pub fn data(&self) -> &'h [f64] { self.data }

    pub fn shape(&self) -> &'h [usize] { self.shape }

    /// Value in the bin with the given per-dimension indices.
    pub fn get(&self, bins: &[usize]) -> Option<f64> {
        index::ravel(bins, self.shape).map(|i| self.data[i])
    }

    pub fn sum(&self) -> f64 { self.data.iter().sum() }

    /// N-dimensional `ndarray` view of the data.
    pub fn as_array(&self) -> Result<ArrayViewD<'h, f64>> {
        Ok(ArrayViewD::from_shape(IxDyn(self.shape), self.data)?)
    }
}
