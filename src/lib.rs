//! Multi-dimensional histograms with independently binned dimensions.
//!
//! Each dimension maps a continuous value onto a bin with a [`Binning`]
//! scheme: [`General`] for arbitrary edges, [`Uniform`] for edges that are
//! equispaced under a [`Transform`]. A [`Histogram`] combines any number of
//! dimensions and accumulates weighted fills into row-major storage.

pub mod axes;
pub mod config;
pub mod error;
pub mod histogram;
pub mod index;
pub mod io;
pub mod utils;

pub use axes::Axes;
pub use error::{Error, Result};
pub use histogram::{BinView, Histogram};

pub use binning::{Binning, Dimension, General, Transform, Uniform};

/// Create an empty [`Histogram`] from a title and any number of binning
/// schemes, in dimension order.
///
/// ```
/// use multihist::{histogram, General, Uniform};
/// let h = histogram!("demo";
///     Uniform::linear(0.0, 10.0, 11, "x")?,
///     General::new(&[0.0, 1.0, 2.0], "y")?,
/// )?;
/// assert_eq!(h.shape(), &[13, 4]);
/// # Ok::<(), multihist::Error>(())
/// ```
#[macro_export]
macro_rules! histogram {
    ($title:expr; $($dimension:expr),+ $(,)?) => {
        $crate::Histogram::new(vec![$($crate::Dimension::from($dimension)),+], $title)
    };
}
