//! Point and constraint files.
//!
//! Points come from CSV or Parquet. A CSV whose first row names `x`, `y` and
//! `z` (any case, any order) is read by those columns; a first row naming
//! none of them is taken as data, with the first three columns as `x`, `y`,
//! `z`. Parquet files must carry the named columns.

use anyhow::{bail, Context, Result};
use cubic::planes::Vec3;
use cubic::Constraints;
use polars::prelude::*;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const AXES: [&str; 3] = ["x", "y", "z"];

/// Read one point per row from `path` (`.csv` or `.parquet`).
pub fn read_points(path: &Path) -> Result<Vec<Vec3>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let (lf, columns) = match ext.as_deref() {
        Some("csv") => scan_csv(path)?,
        Some("parquet") => {
            let mut lf = LazyFrame::scan_parquet(path, ScanArgsParquet::default())
                .with_context(|| format!("scanning {}", path.display()))?;
            let schema = lf
                .collect_schema()
                .with_context(|| format!("reading schema of {}", path.display()))?;
            let names: Vec<String> = schema.iter_names().map(|n| n.to_string()).collect();
            let columns = named_axes(&names)?
                .with_context(|| format!("{} has no x, y, z columns", path.display()))?;
            (lf, columns)
        }
        _ => bail!("unsupported input {} (expected .csv or .parquet)", path.display()),
    };
    let df = lf
        .select(
            columns
                .iter()
                .zip(AXES)
                .map(|(name, axis)| col(name.as_str()).cast(DataType::Float64).alias(axis))
                .collect::<Vec<_>>(),
        )
        .collect()
        .with_context(|| format!("reading coordinates from {}", path.display()))?;
    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    let zs = df.column("z")?.f64()?;
    let mut points = Vec::with_capacity(df.height());
    for (row, ((x, y), z)) in xs.into_iter().zip(ys).zip(zs).enumerate() {
        match (x, y, z) {
            (Some(x), Some(y), Some(z)) => points.push(Vec3::new(x, y, z)),
            _ => bail!("row {row} of {} has a missing or non-numeric coordinate", path.display()),
        }
    }
    tracing::info!(path = %path.display(), points = points.len(), "read_points");
    Ok(points)
}

fn scan_csv(path: &Path) -> Result<(LazyFrame, [String; 3])> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .with_context(|| format!("reading {}", path.display()))?;
    let names: Vec<String> = first
        .trim_end_matches(['\r', '\n'])
        .split(',')
        .map(|s| s.trim().trim_matches('"').to_string())
        .collect();
    let (has_header, columns) = match named_axes(&names)? {
        Some(columns) => (true, columns),
        None => {
            if names.len() < 3 {
                bail!("{} needs at least 3 columns for x, y and z", path.display());
            }
            // polars names headerless columns column_1, column_2, ...
            (false, ["column_1".into(), "column_2".into(), "column_3".into()])
        }
    };
    let lf = LazyCsvReader::new(path)
        .with_has_header(has_header)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("scanning {}", path.display()))?;
    Ok((lf, columns))
}

/// Column names for `x`, `y`, `z` among `names`, matched case-insensitively.
///
/// `None` when no axis is named; an error when only some are.
fn named_axes(names: &[String]) -> Result<Option<[String; 3]>> {
    let find = |axis: &str| names.iter().find(|n| n.eq_ignore_ascii_case(axis)).cloned();
    match (find("x"), find("y"), find("z")) {
        (Some(x), Some(y), Some(z)) => Ok(Some([x, y, z])),
        (None, None, None) => Ok(None),
        _ => bail!("header names some but not all of x, y and z: {names:?}"),
    }
}

/// Contents of a constraints file.
#[derive(Debug, Default, Deserialize)]
pub struct ConstraintFile {
    /// Pairs that must end in different partitions.
    #[serde(default)]
    pub different_partition: Vec<[usize; 2]>,
    /// Pairs that must end in the same partition; not supported by the engines.
    #[serde(default)]
    pub same_partition: Vec<[usize; 2]>,
}

impl ConstraintFile {
    /// Validate against `n` elements.
    pub fn into_constraints(self, n: usize) -> Result<Constraints> {
        if !self.same_partition.is_empty() {
            bail!(
                "same_partition constraints are not supported ({} given); \
                 only different_partition pairs can be enforced",
                self.same_partition.len()
            );
        }
        let pairs = self.different_partition.into_iter().map(|[i, j]| (i, j));
        Ok(Constraints::from_pairs(n, pairs)?)
    }
}

/// Read and validate the constraints file at `path` for `n` elements.
pub fn read_constraints(path: &Path, n: usize) -> Result<Constraints> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: ConstraintFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing constraints in {}", path.display()))?;
    let constraints = file
        .into_constraints(n)
        .with_context(|| format!("invalid constraints in {}", path.display()))?;
    tracing::info!(path = %path.display(), pairs = constraints.pairs().count(), "read_constraints");
    Ok(constraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_header_is_case_insensitive_and_unordered() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "Z,id,X,y\n3,0,1,2\n6.5,1,4,5\n").unwrap();
        let points = read_points(&path).unwrap();
        assert_eq!(points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.5)]);
    }

    #[test]
    fn csv_without_header_uses_first_three_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "1,2,3,9\n4,5,6,9\n").unwrap();
        let points = read_points(&path).unwrap();
        assert_eq!(points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn csv_with_partial_header_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.csv");
        fs::write(&path, "x,y,w\n1,2,3\n").unwrap();
        let err = read_points(&path).unwrap_err();
        assert!(format!("{err:#}").contains("some but not all"));
    }

    #[test]
    fn parquet_columns_are_read_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.parquet");
        let mut df = polars::df!(
            "y" => [2.0, 5.0],
            "x" => [1.0, 4.0],
            "z" => [3.0, 6.0]
        )
        .unwrap();
        ParquetWriter::new(File::create(&path).unwrap())
            .finish(&mut df)
            .unwrap();
        let points = read_points(&path).unwrap();
        assert_eq!(points, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(read_points(Path::new("points.txt")).is_err());
    }

    #[test]
    fn constraints_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("constraints.json");
        fs::write(&path, r#"{"different_partition": [[0, 2], [3, 1]]}"#).unwrap();
        let c = read_constraints(&path, 4).unwrap();
        assert!(c.forbids(2, 0));
        assert!(c.forbids(1, 3));
        assert!(!c.forbids(0, 1));
    }

    #[test]
    fn same_partition_constraints_are_rejected() {
        let file: ConstraintFile =
            serde_json::from_str(r#"{"same_partition": [[0, 1]]}"#).unwrap();
        let err = file.into_constraints(3).unwrap_err();
        assert!(err.to_string().contains("same_partition"));
    }

    #[test]
    fn out_of_range_constraint_is_rejected() {
        let file: ConstraintFile =
            serde_json::from_str(r#"{"different_partition": [[0, 5]]}"#).unwrap();
        assert!(file.into_constraints(3).is_err());
    }
}
