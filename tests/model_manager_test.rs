use std::fs;

use mindscan::{ModelError, ModelInfo, ModelManager, DEFAULT_MODEL_NAME};

fn sha256_of(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(bytes))
}

fn offline_info(name: &str) -> ModelInfo {
    // Port 9 is discard; nothing should ever be fetched from it.
    ModelInfo::new(name, "http://127.0.0.1:9/model.onnx", "http://127.0.0.1:9/tokenizer.json")
}

#[tokio::test]
async fn test_model_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path().join("models"))?;

    assert!(manager.models_dir().exists());
    assert!(manager.get_model_path(DEFAULT_MODEL_NAME).ends_with("mental-bert/model.onnx"));
    assert!(manager.get_tokenizer_path(DEFAULT_MODEL_NAME).ends_with("mental-bert/tokenizer.json"));
    assert!(!manager.is_model_downloaded(DEFAULT_MODEL_NAME));
    Ok(())
}

#[tokio::test]
async fn test_model_verification_with_hashes() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;

    let model_bytes = vec![7u8; 2_000_000];
    let tokenizer_bytes = b"{\"version\":\"1.0\"}".to_vec();
    let info = offline_info("hashed").with_hashes(Some(sha256_of(&model_bytes)), Some(sha256_of(&tokenizer_bytes)));

    assert!(!manager.verify_model(&info)?);

    fs::create_dir_all(manager.get_model_dir("hashed"))?;
    fs::write(manager.get_model_path("hashed"), &model_bytes)?;
    fs::write(manager.get_tokenizer_path("hashed"), &tokenizer_bytes)?;
    assert!(manager.verify_model(&info)?);

    // Corrupt file and verify
    fs::write(manager.get_tokenizer_path("hashed"), b"corrupted data")?;
    assert!(!manager.verify_model(&info)?);
    Ok(())
}

#[tokio::test]
async fn test_existing_artifact_is_not_downloaded_again() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    fs::create_dir_all(manager.get_model_dir("cached"))?;
    fs::write(manager.get_model_path("cached"), vec![1u8; 1_500_000])?;
    fs::write(manager.get_tokenizer_path("cached"), b"{}")?;

    let info = offline_info("cached");
    manager.ensure_model_downloaded(&info).await?;
    manager.download_model(&info).await?;
    assert!(manager.is_model_downloaded("cached"));
    Ok(())
}

#[tokio::test]
async fn test_failed_download_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    fs::create_dir_all(manager.get_model_dir("partial"))?;
    // too small to count as a finished download
    fs::write(manager.get_model_path("partial"), b"truncated")?;

    let result = manager.download_model(&offline_info("partial")).await;
    assert!(matches!(result, Err(ModelError::DownloadError(_))));
    assert_eq!(fs::read(manager.get_model_path("partial"))?, b"truncated");
    assert!(!manager.get_model_path("partial").with_extension("part").exists());
    assert!(!manager.get_tokenizer_path("partial").exists());
    Ok(())
}

#[test]
fn test_missing_source_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path())?;
    let info = ModelInfo::new(DEFAULT_MODEL_NAME, "", "");

    let err = tokio_test::block_on(manager.download_model(&info)).unwrap_err();
    assert!(matches!(err, ModelError::MissingSource(_)));
    assert!(err.to_string().contains(DEFAULT_MODEL_NAME));
    Ok(())
}
