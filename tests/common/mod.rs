//! Hermetic file trees for integration tests

use envtoken::{EnvConfig, Settings};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `relative`, creating parent directories
    pub fn add_file(&self, relative: &str, content: &str) -> PathBuf {
        self.add_bytes(relative, content.as_bytes())
    }

    /// Write raw bytes to `relative`, creating parent directories
    pub fn add_bytes(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read_bytes(&self, relative: &str) -> Vec<u8> {
        fs::read(self.root().join(relative)).unwrap()
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).unwrap()
    }
}

pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Settings as loaded from the given `INPUT_*` entries
pub fn settings(inputs: &[(&str, &str)]) -> Settings {
    let config = EnvConfig::from_map(vars(inputs)).unwrap();
    Settings::load(&config).unwrap()
}
