use crate::{Binning, Error, Result};

/// A non-equispaced binning scheme.
///
/// The bin containing a value is found in logarithmic time by binary search
/// over the edges.
#[derive(Clone, Debug, PartialEq)]
pub struct General {
    name: String,
    edges: Vec<f64>,
}

impl General {
    /// Construct a binning scheme from an ordered list of bin edges.
    ///
    /// Under- and overflow bins are added, by prepending `-inf` and appending
    /// `+inf`, unless the supplied edges already reach that far.
    ///
    /// # Errors
    /// `MalformedEdges` if `edges` is empty, contains NaN, or is not strictly
    /// increasing.
    pub fn new(edges: &[f64], name: impl Into<String>) -> Result<Self> {
        validate_edges(edges)?;
        let mut all = Vec::with_capacity(edges.len() + 2);
        if edges[0] > f64::NEG_INFINITY { all.push(f64::NEG_INFINITY) }
        all.extend_from_slice(edges);
        if edges[edges.len() - 1] < f64::INFINITY { all.push(f64::INFINITY) }
        Ok(Self { name: name.into(), edges: all })
    }
}

impl Binning for General {
    #[inline]
    fn index(&self, value: f64) -> usize {
        // Position of the first edge strictly greater than `value`. The
        // leading edge is -inf, so this is at least 1 for anything but NaN.
        let above = self.edges.partition_point(|&edge| edge <= value);
        above.saturating_sub(1).min(self.edges.len() - 2)
    }

    fn edges(&self) -> &[f64] { &self.edges }

    fn name(&self) -> &str { &self.name }
}

/// Check that `edges` is non-empty, NaN-free and strictly increasing.
pub(crate) fn validate_edges(edges: &[f64]) -> Result<()> {
    if edges.is_empty() {
        return Err(Error::MalformedEdges("no edges supplied".into()));
    }
    if let Some(i) = edges.iter().position(|e| e.is_nan()) {
        return Err(Error::MalformedEdges(format!("edge {i} is NaN")));
    }
    if let Some(i) = edges.windows(2).position(|pair| pair[0] >= pair[1]) {
        let (a, b) = (edges[i], edges[i + 1]);
        return Err(Error::MalformedEdges(
            format!("edges {i} and {} ({a}, {b}) are not strictly increasing", i + 1)
        ));
    }
    Ok(())
}
