//! Store histograms in HDF5 groups, and read them back.
//!
//! A histogram occupies one group holding
//!
//! + attributes `ndim`, `nentries`, `title` and `label_<i>` for each dimension
//! + datasets `_h_bincontent` and `_h_squaredweights`, shaped like the
//!   histogram
//! + datasets `_h_binedges_<i>` with the bin edges of each dimension.

use std::path::Path;

use ::hdf5::{File, Group, H5Type, types::VarLenUnicode};

use crate::{Binning, Dimension, Error, General, Histogram, Result};

/// Upper limit on the size of one dataset chunk
pub const MAX_CHUNK_BYTES: usize = 2 << 15;

const DEFLATE_LEVEL: u8 = 6;

/// Chunk shape for a dataset of the given `shape` whose elements are
/// `element_size` bytes, holding at most `max_bytes` per chunk.
///
/// The fastest-varying (last) dimensions are kept whole first.
pub fn chunk_shape(shape: &[usize], element_size: usize, max_bytes: usize) -> Vec<usize> {
    let budget = (max_bytes / element_size.max(1)).max(1);
    let mut elements = 1;
    let mut chunk = vec![1; shape.len()];
    for (c, &n) in chunk.iter_mut().zip(shape).rev() {
        *c = (budget / elements).clamp(1, n.max(1));
        elements *= *c;
    }
    chunk
}

// Attribute values found in a stored histogram
enum Attribute<'a> {
    Count(u64),
    Text(&'a VarLenUnicode),
}

fn to_text(text: &str) -> Result<VarLenUnicode> {
    text.parse().map_err(|_| Error::InvalidText(text.into()))
}

fn write_attribute(group: &Group, name: &str, value: Attribute<'_>) -> Result<()> {
    match value {
        Attribute::Count(n) => group
            .new_attr::<u64>()
            .create(name)?
            .write_scalar(&n)?,
        Attribute::Text(text) => group
            .new_attr::<VarLenUnicode>()
            .create(name)?
            .write_scalar(text)?,
    }
    Ok(())
}

fn read_count(group: &Group, name: &str) -> Result<u64> {
    Ok(group.attr(name)?.read_scalar::<u64>()?)
}

fn read_text(group: &Group, name: &str) -> Result<String> {
    let text: VarLenUnicode = group.attr(name)?.read_scalar()?;
    Ok(text.as_str().to_owned())
}

fn write_dataset<T: H5Type>(group: &Group, name: &str, data: &[T], shape: &[usize]) -> Result<()> {
    let chunk = chunk_shape(shape, std::mem::size_of::<T>(), MAX_CHUNK_BYTES);
    group
        .new_dataset::<T>()
        .shape(shape.to_vec())
        .chunk(chunk)
        .shuffle()
        .deflate(DEFLATE_LEVEL)
        .create(name)?
        .write_raw(data)?;
    Ok(())
}

// Open the group at `path`, creating any missing groups along the way
fn require_group(file: &File, path: &str) -> Result<Group> {
    let mut group = file.group("/")?;
    for name in path.split('/').filter(|s| !s.is_empty()) {
        group = if group.link_exists(name) { group.group(name)?        }
                else                       { group.create_group(name)? };
    }
    Ok(group)
}

fn join(location: &str, name: &str) -> String {
    format!("{}/{name}", location.trim_end_matches('/'))
}

/// Write `hist` into a new group `name` inside `location` (created if
/// missing) of `file`.
///
/// Nothing is left behind in `file` when an error occurs after the group has
/// been created.
///
/// # Errors
/// `GroupExists` if the group is already there and `overwrite` is false;
/// with `overwrite` the old group is replaced. `InvalidText` if the title or
/// a label cannot be stored, in which case `file` is not touched.
pub fn save(hist: &Histogram, file: &File, location: &str, name: &str, overwrite: bool) -> Result<()> {
    let title  = to_text(hist.title())?;
    let labels = hist.labels().iter().map(|l| to_text(l)).collect::<Result<Vec<_>>>()?;

    let parent = require_group(file, location)?;
    if parent.link_exists(name) {
        if !overwrite { return Err(Error::GroupExists(join(location, name))) }
        tracing::debug!(group = %join(location, name), "replacing existing group");
        parent.unlink(name)?;
    }
    let group = parent.create_group(name)?;

    if let Err(e) = write_record(hist, &group, &title, &labels) {
        tracing::warn!(group = %join(location, name), error = %e, "removing incomplete group");
        drop(group);
        parent.unlink(name)?;
        return Err(e);
    }

    tracing::info!(file = %file.filename(), group = %join(location, name), shape = ?hist.shape(),
                   entries = hist.n_entries(), "saved histogram");
    Ok(())
}

fn write_record(hist: &Histogram, group: &Group, title: &VarLenUnicode, labels: &[VarLenUnicode]) -> Result<()> {
    write_attribute(group, "ndim"    , Attribute::Count(hist.ndim() as u64))?;
    write_attribute(group, "nentries", Attribute::Count(hist.n_entries()))?;
    write_attribute(group, "title"   , Attribute::Text (title))?;

    let shape = hist.shape();
    write_dataset(group, "_h_bincontent"    , hist.bincontent()    .data(), shape)?;
    write_dataset(group, "_h_squaredweights", hist.squaredweights().data(), shape)?;

    for (i, (dimension, label)) in hist.axes().dimensions().iter().zip(labels).enumerate() {
        let edges = dimension.edges();
        write_dataset  (group, &format!("_h_binedges_{i}"), edges, &[edges.len()])?;
        write_attribute(group, &format!("label_{i}"), Attribute::Text(label))?;
    }
    Ok(())
}

/// [`save`] into the file at `path`, which is created if it does not exist.
pub fn save_to_path(hist: &Histogram, path: impl AsRef<Path>, location: &str, name: &str, overwrite: bool) -> Result<()> {
    let file = File::append(path)?;
    save(hist, &file, location, name, overwrite)
}

/// Read the histogram stored in group `path` of `file`.
///
/// Every dimension comes back as a [`General`] binning with the stored edges.
pub fn load(file: &File, path: &str) -> Result<Histogram> {
    let group = file.group(path)?;
    let ndim      = read_count(&group, "ndim")? as usize;
    let n_entries = read_count(&group, "nentries")?;
    let title     = read_text (&group, "title")?;

    let dimensions = (0..ndim)
        .map(|i| {
            let edges = group.dataset(&format!("_h_binedges_{i}"))?.read_raw::<f64>()?;
            let label = read_text(&group, &format!("label_{i}"))?;
            Ok(Dimension::from(General::new(&edges, label)?))
        })
        .collect::<Result<Vec<_>>>()?;

    let bincontent     = group.dataset("_h_bincontent"    )?.read_raw::<f64>()?;
    let squaredweights = group.dataset("_h_squaredweights")?.read_raw::<f64>()?;
    tracing::debug!(file = %file.filename(), group = path, "loaded histogram");
    Histogram::from_parts(dimensions, title, n_entries, bincontent, squaredweights)
}

/// [`load`] from the file at `path`, opened read-only.
pub fn load_from_path(path: impl AsRef<Path>, group: &str) -> Result<Histogram> {
    load(&File::open(path)?, group)
}


#[cfg(test)]
mod test_roundtrip {
    use super::*;
    use crate::{histogram, Uniform};
    use pretty_assertions::assert_eq;

    fn filled() -> Result<Histogram> {
        let mut h = histogram!("energy vs angle";
            Uniform::log10 (1.0, 1000.0, 3, "energy")?,
            Uniform::cosine(0.0, std::f64::consts::PI, 4, "theta")?,
            General::new(&[-1.0, 0.0, 0.5, 2.0], "z")?,
        )?;
        for i in 0..500 {
            let i = i as f64;
            h.fill_with_weight(0.5 + i / 100.0, &[1.7_f64.powf(i / 40.0), i / 150.0, i / 200.0 - 1.2])?;
        }
        Ok(h)
    }

    #[test]
    fn save_then_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("roundtrip.h5");
        let original = filled()?;

        save_to_path(&original, &path, "/runs/first", "hist", false)?;
        let loaded = load_from_path(&path, "/runs/first/hist")?;

        assert_eq!(loaded.title(), original.title());
        assert_eq!(loaded.n_entries(), 500);
        assert_eq!(loaded.shape(), original.shape());
        assert_eq!(loaded.labels(), original.labels());
        assert_eq!(loaded.binedges(), original.binedges());
        assert_eq!(loaded.bincontent(), original.bincontent());
        assert_eq!(loaded.squaredweights(), original.squaredweights());
        Ok(())
    }

    #[test]
    fn record_layout() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("layout.h5");
        let original = filled()?;
        save_to_path(&original, &path, "/", "h", true)?;

        let file = File::open(&path)?;
        let group = file.group("h")?;
        assert_eq!(read_count(&group, "ndim")?, 3);
        assert_eq!(read_count(&group, "nentries")?, 500);
        assert_eq!(read_text(&group, "title")?, "energy vs angle");
        assert_eq!(read_text(&group, "label_0")?, "energy");
        assert_eq!(read_text(&group, "label_2")?, "z");
        assert_eq!(group.dataset("_h_bincontent")?.shape(), vec![5, 6, 5]);
        assert_eq!(group.dataset("_h_squaredweights")?.shape(), vec![5, 6, 5]);
        assert_eq!(group.dataset("_h_binedges_1")?.shape(), vec![7]);
        assert_eq!(group.dataset("_h_binedges_2")?.read_raw::<f64>()?,
                   vec![f64::NEG_INFINITY, -1.0, 0.0, 0.5, 2.0, f64::INFINITY]);
        Ok(())
    }

    #[test]
    fn existing_group_needs_overwrite() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("overwrite.h5");
        let mut h = filled()?;

        save_to_path(&h, &path, "/", "h", false)?;
        assert!(matches!(save_to_path(&h, &path, "/", "h", false), Err(Error::GroupExists(_))));

        h.set_title("second");
        save_to_path(&h, &path, "/", "h", true)?;
        assert_eq!(load_from_path(&path, "h")?.title(), "second");
        Ok(())
    }

    #[test]
    fn several_histograms_share_a_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shared.h5");
        let h = filled()?;
        let file = File::create(&path)?;
        save(&h, &file, "a", "one", false)?;
        save(&h, &file, "a", "two", false)?;
        save(&h, &file, "b/c", "one", false)?;
        for group in ["a/one", "a/two", "b/c/one"] {
            assert_eq!(load(&file, group)?.n_entries(), 500);
        }
        Ok(())
    }

    #[test]
    fn interior_nul_is_not_storable() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nul.h5");
        let mut h = filled()?;
        h.set_title("bad\0title");
        assert!(matches!(save_to_path(&h, &path, "/", "h", false), Err(Error::InvalidText(_))));
        assert!(!File::open(&path)?.link_exists("h"));

        // A valid title can then be saved without overwriting
        h.set_title("good title");
        save_to_path(&h, &path, "/", "h", false)?;
        assert_eq!(load_from_path(&path, "h")?.title(), "good title");
        Ok(())
    }

    #[test]
    fn interior_nul_in_label_leaves_no_group() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nul-label.h5");
        let h = histogram!("labelled";
            Uniform::linear(0.0, 1.0, 2, "fine")?,
            General::new(&[0.0, 1.0], "bad\0label")?,
        )?;
        let file = File::create(&path)?;
        assert!(matches!(save(&h, &file, "/runs", "h", false), Err(Error::InvalidText(_))));
        assert!(!file.link_exists("runs"));

        // An unstorable replacement leaves the existing record in place
        save(&filled()?, &file, "/runs", "h", false)?;
        assert!(matches!(save(&h, &file, "/runs", "h", true), Err(Error::InvalidText(_))));
        assert!(file.link_exists("/runs/h"));
        assert_eq!(load(&file, "/runs/h")?.n_entries(), 500);
        Ok(())
    }
}
