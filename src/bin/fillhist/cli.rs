use std::path::PathBuf;

/// Command line interface for `fillhist` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "fillhist",
    about = "Fill a multi-dimensional histogram and store it in HDF5",
)]
pub (super) struct Cli {
    /// TOML file describing the histogram's dimensions and output location
    #[clap(short, long)]
    pub config: PathBuf,

    /// Events as raw little-endian f64, one value per dimension
    #[clap(short, long)]
    pub input: Option<PathBuf>,

    /// Number of normally distributed random events to add
    #[clap(short, long)]
    pub random: Option<usize>,

    /// Seed of the random event generator
    #[clap(long, default_value = "0")]
    pub seed: u64,

    /// HDF5 output file, overriding the one given in the config
    #[clap(short, long)]
    pub out: Option<PathBuf>,

    /// Maximum number of rayon threads used for filling
    #[clap(short = 'j', long, default_value = "4")]
    pub threads: usize,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[clap(long, default_value = "info")]
    pub log_level: tracing::Level,
}
