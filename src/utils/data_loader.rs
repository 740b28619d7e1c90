//! Data loading utilities

use crate::error::{PlannerError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Default incident dataset file name
pub const DEFAULT_DATASET: &str = "WSQ000301.csv";

/// CSV loader for the incident table
pub struct DataLoader {
    /// Field separator
    delimiter: u8,
    /// Rows used for schema inference, `None` scans the whole file
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            infer_schema_length: None,
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file with a header row
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path)
            .map_err(|e| PlannerError::DataError(format!("{}: {}", path.display(), e)))?;

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| PlannerError::DataError(format!("{}: {}", path.display(), e)))?;

        if df.width() == 0 {
            return Err(PlannerError::DataError(format!("{}: no columns", path.display())));
        }

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded dataset"
        );
        Ok(df)
    }

    /// Write a frame as CSV with a header row
    pub fn save_csv(&self, df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path.as_ref())?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(self.delimiter)
            .finish(df)?;
        Ok(())
    }
}

/// Finds the incident dataset by probing a list of candidate paths
#[derive(Debug, Clone)]
pub struct DatasetLocator {
    explicit: Option<PathBuf>,
    relative: Vec<PathBuf>,
    roots: Vec<PathBuf>,
}

impl Default for DatasetLocator {
    fn default() -> Self {
        let relative = ["datasets", "../datasets", "../../datasets"]
            .iter()
            .map(|dir| Path::new(dir).join(DEFAULT_DATASET))
            .collect();

        let mut roots = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            roots.push(cwd);
        }
        if let Some(dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
            if !roots.contains(&dir) {
                roots.push(dir);
            }
        }

        Self { explicit: None, relative, roots }
    }
}

impl DatasetLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe only this path
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Replace the directories relative candidates are resolved against
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.roots = roots;
        self
    }

    /// Candidate paths in probing order
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(path) = &self.explicit {
            return vec![path.clone()];
        }
        self.roots
            .iter()
            .flat_map(|root| self.relative.iter().map(move |rel| root.join(rel)))
            .collect()
    }

    /// First candidate that exists and parses
    pub fn locate(&self, loader: &DataLoader) -> Result<(PathBuf, DataFrame)> {
        self.locate_with(loader, Ok)
    }

    /// First candidate that exists, parses and is accepted by `accept`.
    /// Rejected candidates are logged and skipped.
    pub fn locate_with<T, F>(&self, loader: &DataLoader, mut accept: F) -> Result<(PathBuf, T)>
    where
        F: FnMut(DataFrame) -> Result<T>,
    {
        let candidates = self.candidates();
        for path in &candidates {
            info!(path = %path.display(), "Probing dataset path");
            if !path.is_file() {
                continue;
            }
            let df = match loader.load_csv(path) {
                Ok(df) => df,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse dataset");
                    continue;
                }
            };
            match accept(df) {
                Ok(value) => return Ok((path.clone(), value)),
                Err(e) => warn!(path = %path.display(), error = %e, "Dataset rejected"),
            }
        }

        Err(PlannerError::DataNotFound {
            probed: candidates.iter().map(|p| p.display().to_string()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_csv() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "data.csv", "WDSP,HMDT\n1.5,40\n2.0,\n");

        let df = DataLoader::new().load_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut df = df!("a" => [1.0, 2.0], "b" => [3.0, 4.0]).unwrap();

        let loader = DataLoader::new();
        loader.save_csv(&mut df, &path).unwrap();
        let back = loader.load_csv(&path).unwrap();
        assert_eq!(back.shape(), (2, 2));
    }

    #[test]
    fn test_locator_order() {
        let locator = DatasetLocator::new().with_roots(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        let candidates = locator.candidates();
        assert_eq!(candidates.len(), 6);
        assert_eq!(candidates[0], Path::new("/a/datasets").join(DEFAULT_DATASET));
        assert_eq!(candidates[3], Path::new("/b/datasets").join(DEFAULT_DATASET));

        let explicit = DatasetLocator::new().with_explicit("x.csv");
        assert_eq!(explicit.candidates(), vec![PathBuf::from("x.csv")]);
    }

    #[test]
    fn test_locator_finds_parent_dataset() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("work");
        std::fs::create_dir_all(&nested).unwrap();
        write(dir.path(), &format!("datasets/{}", DEFAULT_DATASET), "WDSP\n1.0\n");

        let (path, df) = DatasetLocator::new()
            .with_roots(vec![nested])
            .locate(&DataLoader::new())
            .unwrap();
        assert!(path.ends_with(Path::new("datasets").join(DEFAULT_DATASET)));
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn test_locator_skips_rejected_candidate() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("work");
        write(&nested, &format!("datasets/{}", DEFAULT_DATASET), "foo,bar\n1,2\n");
        write(dir.path(), &format!("datasets/{}", DEFAULT_DATASET), "WDSP,HMDT\n1.0,40\n2.0,55\n");

        let (path, df) = DatasetLocator::new()
            .with_roots(vec![nested.clone()])
            .locate_with(&DataLoader::new(), |df| {
                df.column("WDSP")?;
                Ok(df)
            })
            .unwrap();
        assert_eq!(path, nested.join("../datasets").join(DEFAULT_DATASET));
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_locator_all_rejected_is_not_found() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), &format!("datasets/{}", DEFAULT_DATASET), "foo,bar\n1,2\n");

        let err = DatasetLocator::new()
            .with_roots(vec![dir.path().to_path_buf()])
            .locate_with(&DataLoader::new(), |df| df.column("WDSP").map(|_| ()).map_err(Into::into))
            .unwrap_err();
        assert!(matches!(err, PlannerError::DataNotFound { .. }));
    }

    #[test]
    fn test_late_decimal_in_integer_looking_column() {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from("WDSP,HMDT\n");
        for i in 0..150 {
            csv.push_str(&format!("{},{}\n", i % 9, 40 + i % 20));
        }
        csv.push_str("2.5,41\n");
        let path = write(dir.path(), "late.csv", &csv);

        let df = DataLoader::new().load_csv(&path).unwrap();
        assert_eq!(df.height(), 151);
        let wind = df.column("WDSP").unwrap().cast(&DataType::Float64).unwrap();
        assert_eq!(wind.f64().unwrap().get(150), Some(2.5));
    }

    #[test]
    fn test_locator_reports_probed_paths() {
        let dir = TempDir::new().unwrap();
        let err = DatasetLocator::new()
            .with_roots(vec![dir.path().to_path_buf()])
            .locate(&DataLoader::new())
            .unwrap_err();
        match err {
            PlannerError::DataNotFound { probed } => assert_eq!(probed.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
