//! Project registry: which Toggl projects are synced, and under what name.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::error::{SyncError, SyncResult};

/// Projects synced when no registry file is configured.
const DEFAULT_PROJECTS: &[(&str, i64)] = &[("TrueWork", 210645944), ("Entertainment", 211402336)];

/// On-disk registry format:
///
/// ```toml
/// [projects]
/// TrueWork = 210645944
/// Entertainment = 211402336
/// ```
#[derive(Deserialize)]
struct RegistryFile {
    projects: BTreeMap<String, i64>,
}

/// Name → project id mapping, with the inverse used for lookups.
#[derive(Debug, Clone)]
pub struct ProjectRegistry {
    by_name: BTreeMap<String, i64>,
    by_id: HashMap<i64, String>,
}

impl ProjectRegistry {
    /// Build a registry, rejecting ids claimed by more than one name.
    pub fn new<I, S>(projects: I) -> SyncResult<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut by_name = BTreeMap::new();
        let mut by_id: HashMap<i64, String> = HashMap::new();

        for (name, id) in projects {
            let name = name.into();
            if let Some(existing) = by_id.get(&id) {
                return Err(SyncError::Config(format!(
                    "Project id {} is mapped to both '{}' and '{}'",
                    id, existing, name
                )));
            }
            by_id.insert(id, name.clone());
            by_name.insert(name, id);
        }

        if by_name.is_empty() {
            return Err(SyncError::Config("Project registry is empty".into()));
        }

        Ok(ProjectRegistry { by_name, by_id })
    }

    pub fn from_toml_str(contents: &str) -> SyncResult<Self> {
        let file: RegistryFile = toml::from_str(contents)
            .map_err(|e| SyncError::Config(format!("Invalid project registry: {e}")))?;
        Self::new(file.projects)
    }

    pub fn load(path: &Path) -> SyncResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!(
                "Could not read project registry {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Project name for an id, if the project is synced.
    pub fn name_for(&self, project_id: i64) -> Option<&str> {
        self.by_id.get(&project_id).map(String::as_str)
    }

    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        let by_name: BTreeMap<String, i64> = DEFAULT_PROJECTS
            .iter()
            .map(|(name, id)| (name.to_string(), *id))
            .collect();
        let by_id = by_name.iter().map(|(name, id)| (*id, name.clone())).collect();
        ProjectRegistry { by_name, by_id }
    }
}
