// src/config/validate.rs

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::model::{
    Environment, Profile, RawEnvironment, RawProfile, RawWorker, Script, Worker,
};
use crate::errors::{DrenvError, Result};

/// Script argument replaced by the owning profile's name.
const PROFILE_NAME_ARG: &str = "$name";

impl TryFrom<RawEnvironment> for Environment {
    type Error = DrenvError;

    fn try_from(raw: RawEnvironment) -> std::result::Result<Self, Self::Error> {
        Environment::resolve(raw, None)
    }
}

impl Environment {
    /// Resolve a raw environment into the tree the orchestrator works on.
    ///
    /// - prefixes every profile name with `name_prefix`,
    /// - names anonymous workers `<scope>/<index>`,
    /// - binds `$name` in profile worker args to the profile name,
    /// - rejects empty or duplicate names and zero-sized clusters.
    pub fn resolve(raw: RawEnvironment, name_prefix: Option<&str>) -> Result<Self> {
        if raw.name.trim().is_empty() {
            return Err(DrenvError::ConfigError(
                "environment name must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(raw.profiles.len());

        for raw_profile in raw.profiles {
            let profile = resolve_profile(raw_profile, name_prefix)?;
            if !seen.insert(profile.name.clone()) {
                return Err(DrenvError::ConfigError(format!(
                    "duplicate profile name '{}'",
                    profile.name
                )));
            }
            profiles.push(Arc::new(profile));
        }

        let workers = resolve_workers(raw.workers, &raw.name, None)?;

        Ok(Environment {
            name: raw.name,
            profiles,
            workers,
        })
    }
}

fn resolve_profile(raw: RawProfile, name_prefix: Option<&str>) -> Result<Profile> {
    if raw.name.trim().is_empty() {
        return Err(DrenvError::ConfigError(
            "profile name must not be empty".to_string(),
        ));
    }

    let name = match name_prefix {
        Some(prefix) => format!("{prefix}{}", raw.name),
        None => raw.name,
    };

    if raw.nodes == 0 {
        return Err(DrenvError::ConfigError(format!(
            "profile '{name}': nodes must be >= 1 (got 0)"
        )));
    }
    if raw.cpus == 0 {
        return Err(DrenvError::ConfigError(format!(
            "profile '{name}': cpus must be >= 1 (got 0)"
        )));
    }

    let workers = resolve_workers(raw.workers, &name, Some(&name))?;

    Ok(Profile {
        name,
        driver: raw.driver,
        container_runtime: raw.container_runtime,
        extra_disks: raw.extra_disks,
        disk_size: raw.disk_size,
        nodes: raw.nodes,
        cni: raw.cni,
        cpus: raw.cpus,
        memory: raw.memory,
        network: raw.network,
        addons: raw.addons,
        workers,
    })
}

fn resolve_workers(
    raw: Vec<RawWorker>,
    scope: &str,
    profile: Option<&str>,
) -> Result<Vec<Arc<Worker>>> {
    let mut seen = HashSet::new();
    let mut workers = Vec::with_capacity(raw.len());

    for (index, raw_worker) in raw.into_iter().enumerate() {
        let name = raw_worker
            .name
            .unwrap_or_else(|| format!("{scope}/{index}"));

        if !seen.insert(name.clone()) {
            return Err(DrenvError::ConfigError(format!(
                "duplicate worker name '{name}' in '{scope}'"
            )));
        }

        let scripts = raw_worker
            .scripts
            .into_iter()
            .map(|script| resolve_script(script, &name, profile))
            .collect::<Result<Vec<_>>>()?;

        workers.push(Arc::new(Worker { name, scripts }));
    }

    Ok(workers)
}

fn resolve_script(script: Script, worker: &str, profile: Option<&str>) -> Result<Script> {
    if script.name.trim().is_empty() {
        return Err(DrenvError::ConfigError(format!(
            "worker '{worker}' has a script with an empty name"
        )));
    }

    let args = match profile {
        Some(profile) => script
            .args
            .into_iter()
            .map(|arg| {
                if arg == PROFILE_NAME_ARG {
                    profile.to_string()
                } else {
                    arg
                }
            })
            .collect(),
        None => script.args,
    };

    Ok(Script {
        name: script.name,
        args,
    })
}
