use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not locate state directory: {0}")]
    Location(String),
}

#[derive(Debug)]
enum Backend {
    File(PathBuf),
    Memory(Mutex<Map<String, Value>>),
}

/// String-keyed JSON storage, either file-backed or in memory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    backend: Arc<Backend>,
}

impl LocalStorage {
    /// `~/.local/state/ims/session.json`.
    pub fn open_default() -> Result<Self, SessionError> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("ims")
            .map_err(|e| SessionError::Location(e.to_string()))?;
        Ok(Self::at(xdg_dirs.get_state_home().join("session.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Arc::new(Backend::File(path.into())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Arc::new(Backend::Memory(Mutex::new(Map::new()))),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &*self.backend {
            Backend::File(p) => Some(p),
            Backend::Memory(_) => None,
        }
    }

    fn read_all(&self) -> Result<Map<String, Value>, SessionError> {
        match &*self.backend {
            Backend::Memory(map) => Ok(map.lock().unwrap_or_else(|e| e.into_inner()).clone()),
            Backend::File(path) => match fs::read_to_string(path) {
                Ok(data) if data.trim().is_empty() => Ok(Map::new()),
                Ok(data) => serde_json::from_str(&data).map_err(|source| SessionError::Corrupt {
                    path: path.clone(),
                    source,
                }),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
                Err(source) => Err(SessionError::Io {
                    path: path.clone(),
                    source,
                }),
            },
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> Result<(), SessionError> {
        match &*self.backend {
            Backend::Memory(m) => {
                *m.lock().unwrap_or_else(|e| e.into_inner()) = map;
                Ok(())
            }
            Backend::File(path) => {
                let io_err = |source| SessionError::Io {
                    path: path.clone(),
                    source,
                };
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(io_err)?;
                }
                let data = serde_json::to_string_pretty(&Value::Object(map))
                    .map_err(|source| SessionError::Corrupt {
                        path: path.clone(),
                        source,
                    })?;
                // Replace atomically: write a sibling temp file, then rename over.
                let tmp = path.with_extension("json.tmp");
                fs::write(&tmp, data).map_err(io_err)?;
                fs::rename(&tmp, path).map_err(io_err)
            }
        }
    }

    pub fn get_item(&self, key: &str) -> Result<Option<Value>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: Value) -> Result<(), SessionError> {
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }

    /// Set several keys in one write.
    pub fn set_items(&self, items: Vec<(&str, Value)>) -> Result<(), SessionError> {
        let mut map = self.read_all()?;
        for (k, v) in items {
            map.insert(k.to_string(), v);
        }
        self.write_all(map)
    }

    pub fn remove_item(&self, key: &str) -> Result<(), SessionError> {
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(map)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        match &*self.backend {
            Backend::Memory(m) => {
                m.lock().unwrap_or_else(|e| e.into_inner()).clear();
                Ok(())
            }
            Backend::File(path) => match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(SessionError::Io {
                    path: path.clone(),
                    source,
                }),
            },
        }
    }
}
