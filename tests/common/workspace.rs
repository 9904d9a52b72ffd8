use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary directory holding the input CSV and receiving the outputs.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn with_input(csv: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("Failed to create data dir");
        std::fs::write(dir.path().join("data").join("cleaned_dataset.csv"), csv)
            .expect("Failed to write input dataset");
        Self { dir }
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join("data").join("cleaned_dataset.csv")
    }

    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join("data").join("complete_dataset.csv")
    }

    pub fn cache_file(&self) -> PathBuf {
        self.dir.path().join("data").join("enrichment_cache.json")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read_output(&self) -> String {
        std::fs::read_to_string(self.output_path()).expect("Failed to read output dataset")
    }

    pub fn read_cache_json(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.cache_file()).expect("Failed to read cache file");
        serde_json::from_str(&content).expect("Cache file is not valid JSON")
    }
}
