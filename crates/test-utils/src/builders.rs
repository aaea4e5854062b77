#![allow(dead_code)]

use drenv::config::{Environment, RawEnvironment, RawProfile, RawWorker, Script};

/// Builder for `Environment` to simplify test setup.
pub struct EnvironmentBuilder {
    env: RawEnvironment,
}

impl EnvironmentBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            env: RawEnvironment {
                name: name.to_string(),
                profiles: Vec::new(),
                workers: Vec::new(),
            },
        }
    }

    pub fn with_profile(mut self, profile: RawProfile) -> Self {
        self.env.profiles.push(profile);
        self
    }

    pub fn with_worker(mut self, worker: RawWorker) -> Self {
        self.env.workers.push(worker);
        self
    }

    pub fn raw(self) -> RawEnvironment {
        self.env
    }

    pub fn build(self) -> Environment {
        Environment::try_from(self.env).expect("Failed to build valid environment from builder")
    }
}

/// Builder for `RawProfile`.
pub struct ProfileBuilder {
    profile: RawProfile,
}

impl ProfileBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            profile: RawProfile::named(name),
        }
    }

    pub fn driver(mut self, driver: &str) -> Self {
        self.profile.driver = driver.to_string();
        self
    }

    pub fn nodes(mut self, nodes: u32) -> Self {
        self.profile.nodes = nodes;
        self
    }

    pub fn addon(mut self, addon: &str) -> Self {
        self.profile.addons.push(addon.to_string());
        self
    }

    pub fn network(mut self, network: &str) -> Self {
        self.profile.network = network.to_string();
        self
    }

    pub fn worker(mut self, worker: RawWorker) -> Self {
        self.profile.workers.push(worker);
        self
    }

    pub fn build(self) -> RawProfile {
        self.profile
    }
}

/// Builder for `RawWorker`.
pub struct WorkerBuilder {
    worker: RawWorker,
}

impl WorkerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            worker: RawWorker {
                name: Some(name.to_string()),
                scripts: Vec::new(),
            },
        }
    }

    /// A worker that gets its name from its position.
    pub fn anonymous() -> Self {
        Self {
            worker: RawWorker::default(),
        }
    }

    pub fn script(mut self, name: &str) -> Self {
        self.worker.scripts.push(Script::new(name));
        self
    }

    pub fn script_with_args(mut self, name: &str, args: &[&str]) -> Self {
        self.worker.scripts.push(Script {
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        self
    }

    pub fn build(self) -> RawWorker {
        self.worker
    }
}
