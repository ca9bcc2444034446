use serde::{Deserialize, Serialize};

/// A monotonic transformation under which uniform bins are equispaced.
///
/// `map` takes a transformed coordinate back to the value axis, `imap` is its
/// inverse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Bin edges linear in `x`
    #[default]
    Identity,
    /// Bin edges linear in `log10(x)`
    Log10,
    /// Bin edges linear in `cos(θ)`
    Cosine,
    /// Bin edges linear in `x^N`
    Power(i32),
}

impl Transform {
    #[inline]
    pub fn map(self, v: f64) -> f64 {
        match self {
            Transform::Identity => v,
            Transform::Log10    => 10_f64.powf(v),
            Transform::Cosine   => v.acos(),
            Transform::Power(2) => v * v,
            Transform::Power(n) => v.powi(n),
        }
    }

    #[inline]
    pub fn imap(self, v: f64) -> f64 {
        match self {
            Transform::Identity => v,
            Transform::Log10    => v.log10(),
            Transform::Cosine   => v.cos(),
            // Closed form avoids fractional powers near zero
            Transform::Power(2) => v.sqrt(),
            Transform::Power(n) => v.powf(1.0 / n as f64),
        }
    }
}
