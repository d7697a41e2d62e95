use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ai::Knowledge;
use crate::error::KnowledgeError;

/// Reads and writes a model file holding one [`Knowledge`] record as JSON.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        KnowledgeStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn write_error(&self, source: std::io::Error) -> KnowledgeError {
        KnowledgeError::Write {
            path: self.path.clone(),
            source,
        }
    }

    /// Write `knowledge` next to the model file, then rename it into place so
    /// readers never see a partial record.
    pub fn save(&self, knowledge: &Knowledge) -> Result<(), KnowledgeError> {
        let json = serde_json::to_string_pretty(knowledge)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        let tmp = self.tmp_path();
        fs::write(&tmp, json).map_err(|e| self.write_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.write_error(e))?;
        info!(
            path = %self.path.display(),
            states = knowledge.learned_states(),
            iterations = knowledge.iterations,
            "Saved knowledge"
        );
        Ok(())
    }

    /// Load the model file. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<Knowledge>, KnowledgeError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(KnowledgeError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let knowledge = serde_json::from_str(&json).map_err(|source| KnowledgeError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(knowledge))
    }

    /// Load the model file, starting fresh when it is missing or unreadable.
    pub fn load_or_fresh(&self) -> Knowledge {
        match self.load() {
            Ok(Some(knowledge)) => {
                info!(
                    path = %self.path.display(),
                    states = knowledge.learned_states(),
                    iterations = knowledge.iterations,
                    "Loaded knowledge"
                );
                knowledge
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No model file, starting fresh");
                Knowledge::new()
            }
            Err(e) => {
                warn!(error = %e, "Could not load knowledge, starting fresh");
                Knowledge::new()
            }
        }
    }

    /// Make sure the model file can be written before a long run starts.
    /// Existing content is left untouched.
    pub fn check_writable(&self) -> Result<(), KnowledgeError> {
        if self.path.exists() {
            fs::OpenOptions::new()
                .write(true)
                .open(&self.path)
                .map_err(|e| self.write_error(e))?;
        } else {
            fs::write(&self.path, b"").map_err(|e| self.write_error(e))?;
            fs::remove_file(&self.path).map_err(|e| self.write_error(e))?;
        }
        Ok(())
    }
}
