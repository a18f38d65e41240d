//! Fill application and selection validation seams.
//!
//! The host design application owns the document: it knows what is selected
//! and how to replace a shape's pattern fill. This module defines the traits
//! the pipeline talks to, plus a file-writing applicator for headless use.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors from applying an image fill to a target.
#[derive(Error, Debug)]
pub enum FillError {
    /// The applicator could not write the image into its target.
    #[error("Failed to apply fill: {0}")]
    Apply(String),
}

/// Consumer of the pipeline's final image bytes.
///
/// Implementations replace their target's fill with the given image in one
/// step. The pipeline only calls this once full image bytes are in hand, so
/// a failing applicator leaves the previous fill untouched.
pub trait FillApplicator: Send + Sync {
    /// Replace the target's fill with the given image bytes.
    fn apply_fill(&self, image: &[u8]) -> Result<(), FillError>;
}

/// Fill applicator that writes the image bytes to a file.
///
/// Stands in for the host document when running headless: the "shape" is a
/// path on disk, and applying the fill means writing the bytes there.
#[derive(Debug, Clone)]
pub struct FileFillApplicator {
    path: PathBuf,
}

impl FileFillApplicator {
    /// Create an applicator targeting the given output path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The output path this applicator writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FillApplicator for FileFillApplicator {
    fn apply_fill(&self, image: &[u8]) -> Result<(), FillError> {
        debug!(
            path = %self.path.display(),
            bytes = image.len(),
            "Writing map image"
        );

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| FillError::Apply(e.to_string()))?;
            }
        }

        fs::write(&self.path, image).map_err(|e| FillError::Apply(e.to_string()))
    }
}

/// Errors from checking the host document's selection.
///
/// The display strings are the exact messages shown to the user.
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Zero or multiple layers are selected.
    #[error("You have to select 1 shape layer.")]
    WrongCount,

    /// Exactly one layer is selected, but it is not a shape.
    #[error("Your selection was a “{0}”, that is not a shape layer. Please select a shape layer.")]
    NotAShapeLayer(String),
}

/// Answers "is exactly one shape layer selected" before the pipeline runs.
pub trait SelectionValidator: Send + Sync {
    /// Check that the current selection is a single shape layer.
    fn validate_selection(&self) -> Result<(), SelectionError>;
}

/// One layer in the host document's selection.
#[derive(Debug, Clone)]
pub struct SelectedLayer {
    /// The layer's display name, echoed back in refusal messages.
    pub name: String,
    /// Whether the layer is a shape (can carry a pattern fill).
    pub is_shape: bool,
}

impl SelectedLayer {
    /// A selected shape layer.
    pub fn shape(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_shape: true,
        }
    }

    /// A selected layer of some other kind (text, bitmap, group).
    pub fn other(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_shape: false,
        }
    }
}

/// Selection validator over a snapshot of the host's selected layers.
#[derive(Debug, Clone)]
pub struct LayerSelection {
    layers: Vec<SelectedLayer>,
}

impl LayerSelection {
    /// Create a validator over the given selection snapshot.
    pub fn new(layers: Vec<SelectedLayer>) -> Self {
        Self { layers }
    }
}

impl SelectionValidator for LayerSelection {
    fn validate_selection(&self) -> Result<(), SelectionError> {
        if self.layers.len() != 1 {
            return Err(SelectionError::WrongCount);
        }

        let layer = &self.layers[0];
        if !layer.is_shape {
            return Err(SelectionError::NotAShapeLayer(layer.name.clone()));
        }

        Ok(())
    }
}

/// Selection validator that always passes.
///
/// For hosts with no document selection to check. The CLI always targets a
/// file, so its "selection" is trivially valid.
#[derive(Debug, Clone)]
pub struct AlwaysValidSelection;

impl SelectionValidator for AlwaysValidSelection {
    fn validate_selection(&self) -> Result<(), SelectionError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_shape_selection_is_valid() {
        let selection = LayerSelection::new(vec![SelectedLayer::shape("Rectangle")]);
        assert!(selection.validate_selection().is_ok());
    }

    #[test]
    fn test_empty_selection_is_wrong_count() {
        let selection = LayerSelection::new(vec![]);
        let err = selection.validate_selection().unwrap_err();

        assert!(matches!(err, SelectionError::WrongCount));
        assert_eq!(err.to_string(), "You have to select 1 shape layer.");
    }

    #[test]
    fn test_multiple_layers_is_wrong_count() {
        let selection = LayerSelection::new(vec![
            SelectedLayer::shape("Rectangle"),
            SelectedLayer::shape("Oval"),
        ]);

        assert!(matches!(
            selection.validate_selection(),
            Err(SelectionError::WrongCount)
        ));
    }

    #[test]
    fn test_non_shape_layer_names_the_layer() {
        let selection = LayerSelection::new(vec![SelectedLayer::other("Some Text")]);
        let err = selection.validate_selection().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Your selection was a “Some Text”, that is not a shape layer. Please select a shape layer."
        );
    }

    #[test]
    fn test_always_valid_selection() {
        assert!(AlwaysValidSelection.validate_selection().is_ok());
    }

    #[test]
    fn test_file_applicator_writes_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("map.png");
        let applicator = FileFillApplicator::new(&path);

        applicator.apply_fill(&[0x89, 0x50, 0x4E, 0x47]).unwrap();

        assert_eq!(fs::read(&path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_file_applicator_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deep").join("map.png");
        let applicator = FileFillApplicator::new(&path);

        applicator.apply_fill(b"image bytes").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_file_applicator_reports_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        // Target the directory itself so the write fails.
        let applicator = FileFillApplicator::new(temp_dir.path());

        let err = applicator.apply_fill(b"image bytes").unwrap_err();

        assert!(err.to_string().starts_with("Failed to apply fill:"));
    }

    #[test]
    fn test_file_applicator_path_accessor() {
        let applicator = FileFillApplicator::new("/tmp/out.png");
        assert_eq!(applicator.path(), Path::new("/tmp/out.png"));
    }

    #[test]
    fn test_applicator_as_trait_object() {
        let temp_dir = TempDir::new().unwrap();
        let applicator: Box<dyn FillApplicator> =
            Box::new(FileFillApplicator::new(temp_dir.path().join("map.png")));

        assert!(applicator.apply_fill(b"bytes").is_ok());
    }

    #[test]
    fn test_validators_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayerSelection>();
        assert_send_sync::<AlwaysValidSelection>();
        assert_send_sync::<FileFillApplicator>();
    }
}
