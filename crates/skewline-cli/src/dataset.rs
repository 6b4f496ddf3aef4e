//! Labelled image directories.
//!
//! Every file in the image directory is paired with `<labels>/<stem>.txt`.
//! A label file holds the page's skew as its first whitespace-separated
//! token; the stored sign convention is opposite to the estimator's, so the
//! value is negated on read.
//!
//! A label that is empty or does not parse as a finite number is an error,
//! never a zero angle. The affected image is skipped with a warning and
//! counted in [`Evaluation::skipped`], so it cannot pull the metrics towards
//! an unlevelled page.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use skewline_core::{estimate_angle_with, RasterImage, SkewConfig};
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::ErrorMetrics;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("label file {} is empty", .0.display())]
    EmptyLabel(PathBuf),

    #[error("label file {} does not start with a number: {token:?}", path.display())]
    InvalidLabel { path: PathBuf, token: String },

    #[error("no label for {}", .0.display())]
    MissingLabel(PathBuf),

    #[error("skew estimation failed for {}: {source}", path.display())]
    Estimate {
        path: PathBuf,
        #[source]
        source: skewline_core::SkewError,
    },
}

/// Decode an image file into a raster.
pub fn load_image(path: &Path) -> Result<RasterImage, DatasetError> {
    let img = image::open(path).map_err(|source| DatasetError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(RasterImage::from_dynamic(img))
}

/// Regular files in `dir`, sorted by path.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<labels_dir>/<stem>.txt` for an image path.
pub fn label_path(labels_dir: &Path, image: &Path) -> Option<PathBuf> {
    let stem = image.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".txt");
    Some(labels_dir.join(name))
}

/// Parse label text, returning the negated first token.
pub fn parse_label(text: &str, path: &Path) -> Result<f64, DatasetError> {
    let token = text
        .split_whitespace()
        .next()
        .ok_or_else(|| DatasetError::EmptyLabel(path.to_path_buf()))?;
    let value: f64 = token.parse().map_err(|_| DatasetError::InvalidLabel {
        path: path.to_path_buf(),
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(DatasetError::InvalidLabel {
            path: path.to_path_buf(),
            token: token.to_string(),
        });
    }
    Ok(-value)
}

pub fn read_label(path: &Path) -> Result<f64, DatasetError> {
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_label(&text, path)
}

/// One evaluated image.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRow {
    pub file: String,
    pub predicted: f64,
    pub actual: f64,
    pub abs_error: f64,
    pub line_count: usize,
}

/// Outcome of evaluating a directory.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub rows: Vec<EvaluationRow>,
    pub skipped: usize,
    pub metrics: Option<ErrorMetrics>,
}

fn evaluate_one(
    image_path: &Path,
    labels_dir: &Path,
    config: &SkewConfig,
) -> Result<EvaluationRow, DatasetError> {
    let label = label_path(labels_dir, image_path)
        .filter(|p| p.is_file())
        .ok_or_else(|| DatasetError::MissingLabel(image_path.to_path_buf()))?;
    let actual = read_label(&label)?;
    let raster = load_image(image_path)?;
    let estimate = estimate_angle_with(&raster, config).map_err(|source| DatasetError::Estimate {
        path: image_path.to_path_buf(),
        source,
    })?;

    let file = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(EvaluationRow {
        file,
        predicted: estimate.fixed_angle,
        actual,
        abs_error: (estimate.fixed_angle - actual).abs(),
        line_count: estimate.line_count,
    })
}

/// Estimate every labelled image in `images_dir` and compare against its
/// label. Images that cannot be paired, read, or decoded are skipped with a
/// warning.
///
/// # Errors
/// Only fails when `images_dir` itself cannot be listed.
pub fn evaluate_dataset(
    images_dir: &Path,
    labels_dir: &Path,
    config: &SkewConfig,
) -> Result<Evaluation, DatasetError> {
    let files = list_images(images_dir)?;
    let mut rows = Vec::with_capacity(files.len());
    let mut skipped = 0;

    for path in &files {
        match evaluate_one(path, labels_dir, config) {
            Ok(row) => {
                debug!(
                    file = %row.file,
                    predicted = row.predicted,
                    actual = row.actual,
                    "evaluated"
                );
                rows.push(row);
            }
            Err(err) => {
                warn!("skipping: {}", err);
                skipped += 1;
            }
        }
    }

    let pairs: Vec<(f64, f64)> = rows.iter().map(|r| (r.predicted, r.actual)).collect();
    let metrics = ErrorMetrics::from_pairs(&pairs);

    Ok(Evaluation {
        rows,
        skipped,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::TempDir;

    #[test]
    fn test_parse_label_negates() {
        let p = Path::new("a.txt");
        assert_eq!(parse_label("2.5", p).unwrap(), -2.5);
        assert_eq!(parse_label("  -1.25\n", p).unwrap(), 1.25);
        assert_eq!(parse_label("3 extra tokens here", p).unwrap(), -3.0);
    }

    #[test]
    fn test_parse_label_errors() {
        let p = Path::new("a.txt");
        assert!(matches!(
            parse_label("   \n", p),
            Err(DatasetError::EmptyLabel(_))
        ));
        assert!(matches!(
            parse_label("abc", p),
            Err(DatasetError::InvalidLabel { .. })
        ));
        assert!(parse_label("NaN", p).is_err());
    }

    #[test]
    fn test_label_path_uses_stem() {
        let labels = Path::new("/data/labels");
        assert_eq!(
            label_path(labels, Path::new("/data/images/page_01.png")),
            Some(PathBuf::from("/data/labels/page_01.txt"))
        );
        assert_eq!(
            label_path(labels, Path::new("scan.v2.jpg")),
            Some(PathBuf::from("/data/labels/scan.v2.txt"))
        );
    }

    #[test]
    fn test_list_images_sorted_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            list_images(&dir.path().join("absent")),
            Err(DatasetError::Io { .. })
        ));
    }

    #[test]
    fn test_evaluate_skips_unusable_items() {
        let images = TempDir::new().unwrap();
        let labels = TempDir::new().unwrap();

        GrayImage::from_pixel(40, 30, Luma([255]))
            .save(images.path().join("good.png"))
            .unwrap();
        GrayImage::from_pixel(40, 30, Luma([255]))
            .save(images.path().join("unlabelled.png"))
            .unwrap();
        fs::write(images.path().join("broken.png"), b"not an image").unwrap();

        fs::write(labels.path().join("good.txt"), "1.5\n").unwrap();
        fs::write(labels.path().join("broken.txt"), "0").unwrap();

        let eval = evaluate_dataset(images.path(), labels.path(), &SkewConfig::default()).unwrap();
        assert_eq!(eval.rows.len(), 1);
        assert_eq!(eval.skipped, 2);

        let row = &eval.rows[0];
        assert_eq!(row.file, "good.png");
        assert_eq!(row.predicted, 0.0);
        assert_eq!(row.actual, -1.5);
        assert_eq!(row.abs_error, 1.5);

        let metrics = eval.metrics.unwrap();
        assert_eq!(metrics.count, 1);
        assert_eq!(metrics.mae, 1.5);
    }

    #[test]
    fn test_non_numeric_label_is_skipped_not_zero() {
        let images = TempDir::new().unwrap();
        let labels = TempDir::new().unwrap();

        for name in ["level.png", "garbled.png"] {
            GrayImage::from_pixel(40, 30, Luma([255]))
                .save(images.path().join(name))
                .unwrap();
        }
        fs::write(labels.path().join("level.txt"), "-4").unwrap();
        fs::write(labels.path().join("garbled.txt"), "four degrees").unwrap();

        let eval = evaluate_dataset(images.path(), labels.path(), &SkewConfig::default()).unwrap();
        assert_eq!(eval.skipped, 1);
        assert_eq!(eval.rows.len(), 1);
        assert_eq!(eval.rows[0].file, "level.png");
        assert_eq!(eval.metrics.unwrap().mae, 4.0);
    }

    #[test]
    fn test_evaluate_empty_dir_has_no_metrics() {
        let images = TempDir::new().unwrap();
        let labels = TempDir::new().unwrap();
        let eval = evaluate_dataset(images.path(), labels.path(), &SkewConfig::default()).unwrap();
        assert!(eval.rows.is_empty());
        assert!(eval.metrics.is_none());
    }
}
