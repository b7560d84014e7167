use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::models::ModelInfo;

/// An existing `model.onnx` larger than this is taken as a finished download
/// when no hash is configured.
pub const MIN_MODEL_BYTES: u64 = 1_000_000;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not downloaded: {0}")]
    NotDownloaded(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Model verification failed for {0}")]
    VerificationFailed(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error("No download source configured for model '{0}'")]
    MissingSource(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Model,
    Tokenizer,
}

impl FileKind {
    fn as_str(self) -> &'static str {
        match self {
            FileKind::Model => "model",
            FileKind::Tokenizer => "tokenizer",
        }
    }

    fn min_bytes(self) -> u64 {
        match self {
            FileKind::Model => MIN_MODEL_BYTES,
            FileKind::Tokenizer => 0,
        }
    }
}

/// Locates, verifies and downloads model artifacts under a cache directory.
///
/// Each model lives in `<models_dir>/<name>/` as `model.onnx` plus
/// `tokenizer.json`.
#[derive(Debug, Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("MINDSCAN_CACHE") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("mindscan").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("mindscan").join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("mindscan").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self {
            models_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name)
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.get_model_dir(name).join("model.onnx")
    }

    pub fn get_tokenizer_path(&self, name: &str) -> PathBuf {
        self.get_model_dir(name).join("tokenizer.json")
    }

    /// Both files are present and the model is past the size threshold.
    pub fn is_model_downloaded(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        let tokenizer_path = self.get_tokenizer_path(name);
        let model_size = file_size(&model_path);
        log::debug!("Checking if model '{}' is downloaded:", name);
        log::debug!("  Model path: {:?} ({:?} bytes)", model_path, model_size);
        log::debug!("  Tokenizer path: {:?} (exists: {})", tokenizer_path, tokenizer_path.exists());
        model_size.is_some_and(|size| size > MIN_MODEL_BYTES) && tokenizer_path.is_file()
    }

    /// Downloads whatever part of the artifact is missing or fails
    /// verification. Files that are already in place are left alone. On
    /// failure only the files fetched by this call are removed.
    pub async fn download_model(&self, info: &ModelInfo) -> Result<(), ModelError> {
        let _lock = self.download_lock.lock().await;

        let model_dir = self.get_model_dir(&info.name);
        log::info!("Preparing model directory at {:?}", model_dir);
        fs::create_dir_all(&model_dir)?;

        let mut fetched = Vec::new();
        match self.fetch_missing(info, &mut fetched).await {
            Ok(()) => {
                log::info!("Model and tokenizer ready to use");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to set up model '{}': {}", info.name, e);
                for path in &fetched {
                    if let Err(cleanup) = fs::remove_file(path) {
                        log::warn!("Could not remove {:?} after failed download: {}", path, cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    /// Fetches the model then the tokenizer, recording each path it writes.
    async fn fetch_missing(&self, info: &ModelInfo, fetched: &mut Vec<PathBuf>) -> Result<(), ModelError> {
        let model_path = self.get_model_path(&info.name);
        if self
            .ensure_file(info, &info.model_url, &model_path, info.model_hash.as_deref(), FileKind::Model)
            .await?
        {
            fetched.push(model_path);
        }

        let tokenizer_path = self.get_tokenizer_path(&info.name);
        if self
            .ensure_file(
                info,
                &info.tokenizer_url,
                &tokenizer_path,
                info.tokenizer_hash.as_deref(),
                FileKind::Tokenizer,
            )
            .await?
        {
            fetched.push(tokenizer_path);
        }
        Ok(())
    }

    /// Returns `true` when the file had to be downloaded.
    async fn ensure_file(
        &self,
        info: &ModelInfo,
        url: &str,
        path: &Path,
        expected_hash: Option<&str>,
        kind: FileKind,
    ) -> Result<bool, ModelError> {
        if self.file_is_ready(path, expected_hash, kind)? {
            log::info!("{} file already present at {:?}, skipping download", kind.as_str(), path);
            return Ok(false);
        }
        if url.trim().is_empty() {
            return Err(ModelError::MissingSource(info.name.clone()));
        }
        self.download_and_verify_file(url, path, expected_hash, kind).await?;
        Ok(true)
    }

    fn file_is_ready(&self, path: &Path, expected_hash: Option<&str>, kind: FileKind) -> Result<bool, ModelError> {
        let Some(size) = file_size(path) else {
            return Ok(false);
        };
        match expected_hash {
            Some(hash) => {
                let ok = self.verify_file(path, hash)?;
                if !ok {
                    log::warn!("{} file at {:?} failed verification", kind.as_str(), path);
                }
                Ok(ok)
            }
            None => Ok(size > kind.min_bytes()),
        }
    }

    /// Compares the SHA-256 of a file against `expected_hash` (hex).
    pub fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ModelError> {
        let bytes = fs::read(path)?;
        let hash = sha256_hex(&bytes);
        log::debug!("Verifying {:?}: calculated {}, expected {}", path, hash, expected_hash);
        Ok(hash.eq_ignore_ascii_case(expected_hash))
    }

    /// Checks the files of a model against its configured hashes, or
    /// against the size rule when no hash is set.
    pub fn verify_model(&self, info: &ModelInfo) -> Result<bool, ModelError> {
        let model_ok = self.file_is_ready(
            &self.get_model_path(&info.name),
            info.model_hash.as_deref(),
            FileKind::Model,
        )?;
        let tokenizer_ok = self.file_is_ready(
            &self.get_tokenizer_path(&info.name),
            info.tokenizer_hash.as_deref(),
            FileKind::Tokenizer,
        )?;

        log::info!(
            "Verification of '{}': model {}, tokenizer {}",
            info.name,
            model_ok,
            tokenizer_ok
        );
        Ok(model_ok && tokenizer_ok)
    }

    async fn download_and_verify_file(
        &self,
        url: &str,
        path: &Path,
        expected_hash: Option<&str>,
        kind: FileKind,
    ) -> Result<(), ModelError> {
        log::info!("Downloading {} file from {} to {:?}", kind.as_str(), url, path);
        let response = reqwest::get(url).await?.error_for_status()?;
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());

        if let Some(expected) = expected_hash {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                log::error!("{} hash mismatch: expected {}, got {}", kind.as_str(), expected, actual);
                return Err(ModelError::HashMismatch {
                    file_type: kind.as_str().to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        } else if (bytes.len() as u64) <= kind.min_bytes() {
            return Err(ModelError::VerificationFailed(format!(
                "{} download is only {} bytes",
                kind.as_str(),
                bytes.len()
            )));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let partial = path.with_extension("part");
        fs::write(&partial, &bytes)?;
        fs::rename(&partial, path)?;

        log::info!("{} file downloaded to {:?}", kind.as_str(), path);
        Ok(())
    }

    pub fn remove_download(&self, name: &str) -> Result<(), ModelError> {
        for path in [self.get_model_path(name), self.get_tokenizer_path(name)] {
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Ensures that a model is downloaded and verified.
    /// Files that fail verification are downloaded again.
    pub async fn ensure_model_downloaded(&self, info: &ModelInfo) -> Result<(), ModelError> {
        if self.verify_model(info)? {
            log::info!("Model '{}' verified", info.name);
            return Ok(());
        }
        if !info.has_source() {
            return Err(ModelError::NotDownloaded(info.name.clone()));
        }
        log::info!("Model '{}' missing or invalid, downloading...", info.name);
        self.download_model(info).await
    }
}

fn file_size(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifact(manager: &ModelManager, name: &str, model_bytes: usize) {
        fs::create_dir_all(manager.get_model_dir(name)).unwrap();
        fs::write(manager.get_model_path(name), vec![0u8; model_bytes]).unwrap();
        fs::write(manager.get_tokenizer_path(name), b"{}").unwrap();
    }

    #[test]
    fn test_default_models_dir() {
        env::set_var("MINDSCAN_CACHE", "/tmp/test-cache");
        let path = ModelManager::get_default_models_dir();
        assert_eq!(path, PathBuf::from("/tmp/test-cache/models"));
        env::remove_var("MINDSCAN_CACHE");

        let path = ModelManager::get_default_models_dir();
        assert!(path.ends_with("mindscan/models"));
    }

    #[test]
    fn test_size_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();

        write_artifact(&manager, "small", 1_000_000);
        assert!(!manager.is_model_downloaded("small"));

        write_artifact(&manager, "large", 1_000_001);
        assert!(manager.is_model_downloaded("large"));
    }

    #[test]
    fn test_verify_file_hash() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"abc").unwrap();

        let sha = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(manager.verify_file(&path, sha).unwrap());
        assert!(manager.verify_file(&path, &sha.to_uppercase()).unwrap());
        assert!(!manager.verify_file(&path, "00").unwrap());
    }

    #[tokio::test]
    async fn test_download_skips_existing_files() -> Result<(), ModelError> {
        let dir = tempfile::tempdir()?;
        let manager = ModelManager::new(dir.path())?;
        write_artifact(&manager, "cached", 1_000_001);

        // Nothing listens on the discard port; a fetch would fail.
        let info = ModelInfo::new("cached", "http://127.0.0.1:9/model.onnx", "http://127.0.0.1:9/tokenizer.json");
        manager.download_model(&info).await?;
        assert!(manager.is_model_downloaded("cached"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        let info = ModelInfo::new("absent", "", "");

        let result = manager.download_model(&info).await;
        assert!(matches!(result, Err(ModelError::MissingSource(name)) if name == "absent"));
        assert!(matches!(
            manager.ensure_model_downloaded(&info).await,
            Err(ModelError::NotDownloaded(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_download_keeps_files_it_did_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        fs::create_dir_all(manager.get_model_dir("partial")).unwrap();
        fs::write(manager.get_model_path("partial"), vec![0u8; 2_000_000]).unwrap();

        let info = ModelInfo::new("partial", "", "");
        let result = manager.download_model(&info).await;
        assert!(matches!(result, Err(ModelError::MissingSource(_))));
        assert_eq!(file_size(&manager.get_model_path("partial")), Some(2_000_000));
        assert!(!manager.get_tokenizer_path("partial").exists());
    }

    #[tokio::test]
    async fn test_unreachable_tokenizer_source_keeps_cached_model() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        fs::create_dir_all(manager.get_model_dir("offline")).unwrap();
        fs::write(manager.get_model_path("offline"), vec![0u8; 1_500_000]).unwrap();

        let info = ModelInfo::new("offline", "http://127.0.0.1:9/model.onnx", "http://127.0.0.1:9/tokenizer.json");
        assert!(manager.ensure_model_downloaded(&info).await.is_err());
        assert!(manager.get_model_path("offline").is_file());
    }

    #[test]
    fn test_remove_download() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ModelManager::new(dir.path()).unwrap();
        write_artifact(&manager, "gone", 10);

        manager.remove_download("gone").unwrap();
        assert!(!manager.get_model_path("gone").exists());
        assert!(!manager.get_tokenizer_path("gone").exists());
        assert!(manager.remove_download("gone").is_ok());
    }
}
