//! Batch validation
//!
//! Walks a directory, decodes every recognised file in parallel and reports
//! which ones fail to parse.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, ErrorCategory, Result};
use crate::formats::{FileFormat, cfg, p3d, rap, rtm};

/// Options for [`validate_directory`]
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Lowercase extensions (without the dot) to consider.
    pub extensions: Vec<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extensions: ["p3d", "rtm", "bin", "cpp", "hpp", "cfg"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl BatchOptions {
    fn accepts(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| {
            let ext = ext.to_string_lossy();
            self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
    }
}

/// Outcome for one file
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub format: Option<FileFormat>,
    /// Short description on success, error message on failure.
    pub message: String,
    /// `None` when the file decoded cleanly.
    pub failure: Option<ErrorCategory>,
}

impl FileValidation {
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

/// Result of a batch validation
#[derive(Debug, Clone, Default)]
pub struct BatchValidationResult {
    /// Number of files that decoded cleanly
    pub success_count: usize,
    /// Number of files that failed
    pub fail_count: usize,
    /// Per-file outcomes, sorted by path
    pub files: Vec<FileValidation>,
}

impl BatchValidationResult {
    pub fn failures(&self) -> impl Iterator<Item = &FileValidation> {
        self.files.iter().filter(|f| !f.is_ok())
    }

    pub fn is_clean(&self) -> bool {
        self.fail_count == 0
    }
}

/// Find all files under `dir` whose extension `options` accepts
///
/// # Returns
/// A sorted list of matching paths.
///
/// # Errors
/// Returns an error if the directory cannot be traversed.
pub fn find_files<P: AsRef<Path>>(dir: P, options: &BatchOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && options.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one file and describe what it contains
///
/// # Errors
/// Returns the decoding error, or [`Error::UnknownFormat`] if the file is
/// not a recognised format.
pub fn validate_file<P: AsRef<Path>>(path: P) -> Result<(FileFormat, String)> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    let format = FileFormat::detect(path, &data)
        .ok_or_else(|| Error::UnknownFormat(path.display().to_string()))?;

    let summary = match format {
        FileFormat::P3d => {
            let model = p3d::parse_p3d_bytes(&data)?;
            format!("{} LODs", model.lods.len())
        }
        FileFormat::Rtm => match rtm::parse_rtm_bytes(&data)? {
            rtm::AnimationFile::Rtm(file) => format!(
                "{} bones, {} frames",
                file.anim.bones.len(),
                file.anim.frames.len()
            ),
            rtm::AnimationFile::Bmtr(file) => format!(
                "legacy v{}, {} bones, {} frames",
                file.version,
                file.bones.len(),
                file.frames.len()
            ),
        },
        FileFormat::RapifiedConfig => {
            let config = rap::parse_rap_bytes(&data)?;
            format!("{} classes", config.class_count())
        }
        FileFormat::ConfigText => {
            let text = String::from_utf8_lossy(&data);
            let config = cfg::parse_cfg(&text, &cfg::CfgParseOptions::default())?;
            format!("{} classes", config.class_count())
        }
    };
    Ok((format, summary))
}

/// Validate every matching file under `dir` in parallel
///
/// # Errors
/// Returns an error if `dir` is not a directory or cannot be traversed.
/// Failures of individual files are reported in the result instead.
pub fn validate_directory<P: AsRef<Path>>(
    dir: P,
    options: &BatchOptions,
) -> Result<BatchValidationResult> {
    validate_directory_with_progress(dir, options, |_, _, _| {})
}

/// Validate every matching file under `dir` in parallel with progress callback
///
/// The callback receives `(current, total, path)` as each file starts.
///
/// # Errors
/// Returns an error if `dir` is not a directory or cannot be traversed.
pub fn validate_directory_with_progress<P, F>(
    dir: P,
    options: &BatchOptions,
    progress: F,
) -> Result<BatchValidationResult>
where
    P: AsRef<Path>,
    F: Fn(usize, usize, &Path) + Send + Sync,
{
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InvalidPath(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let paths = find_files(dir, options)?;
    let total = paths.len();
    tracing::info!("Validating {} files under {:?}", total, dir);

    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);
    let processed = AtomicUsize::new(0);

    let files: Vec<FileValidation> = paths
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(current, total, path);

            match validate_file(path) {
                Ok((format, message)) => {
                    success_counter.fetch_add(1, Ordering::SeqCst);
                    FileValidation {
                        path: path.clone(),
                        format: Some(format),
                        message,
                        failure: None,
                    }
                }
                Err(e) => {
                    tracing::debug!("Validation failed for {:?}: {}", path, e);
                    fail_counter.fetch_add(1, Ordering::SeqCst);
                    FileValidation {
                        path: path.clone(),
                        format: fs::read(path)
                            .ok()
                            .and_then(|data| FileFormat::detect(path, &data)),
                        message: e.to_string(),
                        failure: Some(e.category()),
                    }
                }
            }
        })
        .collect();

    Ok(BatchValidationResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        files,
    })
}
