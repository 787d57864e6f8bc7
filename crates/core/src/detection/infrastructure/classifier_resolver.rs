use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{APP_DIR_NAME, CLASSIFIER_FILE_NAME};

#[derive(Error, Debug)]
pub enum ClassifierResolveError {
    #[error("failed to create classifier directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write classifier to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Retrieves a remote classifier definition into a local file.
pub trait ClassifierFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressFn>,
    ) -> Result<(), ClassifierResolveError>;
}

/// Blocking HTTP fetcher that streams into `<dest>.part` and renames on
/// success, so an interrupted download never leaves a truncated classifier.
pub struct HttpFetcher;

impl ClassifierFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<ProgressFn>,
    ) -> Result<(), ClassifierResolveError> {
        download(url, dest, progress)
    }
}

/// Makes sure a classifier file exists at `path`, downloading it from `url`
/// when absent. Returns the path to load.
pub fn ensure(
    path: &Path,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ClassifierResolveError> {
    ensure_with(&HttpFetcher, path, url, progress)
}

/// [`ensure`] with an explicit fetcher.
pub fn ensure_with(
    fetcher: &dyn ClassifierFetcher,
    path: &Path,
    url: &str,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ClassifierResolveError> {
    if path.is_file() {
        log::debug!("Using classifier at {}", path.display());
        return Ok(path.to_path_buf());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ClassifierResolveError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    log::info!("Downloading cascade classifier from {url}");
    fetcher.fetch(url, path, progress)?;
    log::info!("Classifier saved to {}", path.display());
    Ok(path.to_path_buf())
}

/// Default classifier location inside the platform cache directory.
///
/// - macOS: `~/Library/Application Support/Haarscope/classifiers/`
/// - Linux: `$XDG_CACHE_HOME/Haarscope/classifiers/` or `~/.cache/Haarscope/classifiers/`
/// - Windows: `%LOCALAPPDATA%/Haarscope/classifiers/`
pub fn default_classifier_path() -> Result<PathBuf, ClassifierResolveError> {
    Ok(classifier_cache_dir()?.join(CLASSIFIER_FILE_NAME))
}

pub fn classifier_cache_dir() -> Result<PathBuf, ClassifierResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("classifiers"))
            .ok_or(ClassifierResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("classifiers"))
            .ok_or(ClassifierResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ClassifierResolveError> {
    let temp_path = dest.with_extension("part");

    let result = download_inner(url, dest, &temp_path, progress);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<ProgressFn>,
) -> Result<(), ClassifierResolveError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ClassifierResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let write_err = |e: std::io::Error| ClassifierResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(ref cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| ClassifierResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
