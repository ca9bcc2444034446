mod cli;

use std::error::Error;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::Itertools;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use multihist::{Binning, Histogram};
use multihist::config::read_config_file;
use multihist::io::{hdf5, read_events};
use multihist::utils::{group_digits as g, timing::Progress};

use cli::Cli;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    tracing_subscriber::fmt().with_max_level(args.log_level).with_target(false).init();

    let mut progress = Progress::new();

    progress.start("Reading config");
    let config = read_config_file(&args.config)?;
    let mut hist = config.histogram()?;
    progress.done();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads).build()?;

    if let Some(input) = &args.input {
        progress.start(&format!("Reading events from {}", input.display()));
        let events = read_events(input, hist.ndim())?;
        progress.done_with_message(&format!("loaded {}", g(events.len())));
        fill(&mut hist, &events, &pool, args.threads)?;
    }

    if let Some(n) = args.random {
        progress.start(&format!("Generating {} random events", g(n)));
        let events = random_events(&hist, n, args.seed)?;
        progress.done();
        fill(&mut hist, &events, &pool, args.threads)?;
    }

    report(&hist);

    let output = &config.output;
    let file = args.out.as_ref().unwrap_or(&output.file);
    progress.start(&format!("Writing histogram to {}", file.display()));
    hdf5::save_to_path(&hist, file, &output.group, &output.name, output.overwrite)?;
    progress.done();
    Ok(())
}

/// Fill `hist` with `events` in batches, updating a progress bar after each
fn fill(hist: &mut Histogram, events: &[Vec<f64>], pool: &rayon::ThreadPool, threads: usize) -> Result<(), Box<dyn Error>> {
    if events.is_empty() { return Ok(()) }
    let batch_size = (events.len() / 100).max(10_000);
    let job_size = (batch_size / threads.max(1)).max(1);

    let bar = ProgressBar::new(events.len() as u64);
    bar.set_style(ProgressStyle::default_bar()
                  .template("Filling: [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")?);

    let mut accepted = 0;
    for batch in events.chunks(batch_size) {
        accepted += pool.install(|| hist.fill_par(batch, job_size))?;
        bar.inc(batch.len() as u64);
    }
    bar.finish();

    let rejected = events.len() as u64 - accepted;
    if rejected > 0 {
        tracing::warn!("{} of {} events contained NaN and were ignored", g(rejected), g(events.len()));
    }
    Ok(())
}

/// `n` events, each value drawn from a normal distribution covering the finite
/// part of its dimension
fn random_events(hist: &Histogram, n: usize, seed: u64) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let distributions = hist.axes().dimensions().iter()
        .map(|d| {
            let (centre, width) = finite_extent(d.edges());
            Normal::new(centre, width / 4.0)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..n)
       .map(|_| distributions.iter().map(|d| d.sample(&mut rng)).collect())
       .collect())
}

// Centre and width of the finite edges, falling back to unit width
fn finite_extent(edges: &[f64]) -> (f64, f64) {
    let finite = edges.iter().copied().filter(|e| e.is_finite());
    match finite.minmax().into_option() {
        Some((lo, hi)) if lo < hi => ((lo + hi) / 2.0, hi - lo),
        Some((lo, _))             => (lo, 1.0),
        None                      => (0.0, 1.0),
    }
}

fn report(hist: &Histogram) {
    println!("Histogram `{}`: {} entries, shape {:?}", hist.title(), g(hist.n_entries()), hist.shape());
    for (i, d) in hist.axes().dimensions().iter().enumerate() {
        println!("  {i}: {:12} {:4} bins  edges [{}]", d.name(), d.nbins(), d.edges().iter().join(", "));
    }
    println!("  sum of weights: {}", hist.bincontent().sum());
}
