//! Monitored-domain registry.
//!
//! The registry is a flat text file (`domains.txt` in the state directory)
//! with one registrable domain per line. It is deliberately human-editable:
//! adding a line by hand and running a scan is a supported workflow.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::REGISTRY_FILE;
use crate::error_handling::RegistryError;

/// Handle to the monitored-domain registry file.
pub struct DomainRegistry {
    path: PathBuf,
}

impl DomainRegistry {
    /// Creates a handle to the registry inside `state_dir`. The file itself
    /// is created lazily on first write.
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(REGISTRY_FILE),
        }
    }

    /// Path of the underlying registry file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>, RegistryError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()),
            // A missing registry is an empty registry
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns all monitored domains in file order.
    pub fn list(&self) -> Result<Vec<String>, RegistryError> {
        self.read_lines()
    }

    /// Whether `domain` is currently monitored.
    pub fn contains(&self, domain: &str) -> Result<bool, RegistryError> {
        Ok(self.read_lines()?.iter().any(|d| d == domain))
    }

    /// Appends `domain` to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AlreadyMonitored`] if the domain is already
    /// listed; the file is left untouched in that case.
    pub fn add(&self, domain: &str) -> Result<(), RegistryError> {
        if self.contains(domain)? {
            return Err(RegistryError::AlreadyMonitored(domain.to_string()));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", domain)?;
        Ok(())
    }

    /// Removes `domain` from the registry, preserving the order of the
    /// remaining entries.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotMonitored`] if the domain is not listed;
    /// the file is left byte-for-byte unchanged in that case.
    pub fn remove(&self, domain: &str) -> Result<(), RegistryError> {
        let lines = self.read_lines()?;
        if !lines.iter().any(|d| d == domain) {
            return Err(RegistryError::NotMonitored(domain.to_string()));
        }
        let remaining: Vec<String> = lines.into_iter().filter(|d| d != domain).collect();
        self.rewrite(&remaining)
    }

    /// Empties the registry, leaving an empty file behind.
    pub fn clear(&self) -> Result<(), RegistryError> {
        self.rewrite(&[])
    }

    /// Replaces the registry contents via a temp file and rename, so a crash
    /// mid-write can never leave a half-written registry.
    fn rewrite(&self, domains: &[String]) -> Result<(), RegistryError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        for domain in domains {
            writeln!(tmp, "{}", domain)?;
        }
        tmp.persist(&self.path).map_err(|e| RegistryError::Io(e.error))?;
        Ok(())
    }
}
