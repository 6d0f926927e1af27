#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use camino::{Utf8Path, Utf8PathBuf};
use hotbuild_app_core::{
    BuildInvoker, BuildOrchestrator, HostServices, PackageProvisioner, ProjectProbe,
};
use hotbuild_core::{BuildOutcome, ProvisionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Exists,
    Provision { ok: bool },
    Invoke { mode: String, targets: Vec<String> },
    NotifyScriptsReloaded,
    RestartTimer,
    IsReloadNeeded,
    ReloadAssemblies { soft: bool },
}

#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Calls made past the precondition check.
    pub fn effects(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::Exists)
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }
}

pub struct FakeProbe {
    pub log: CallLog,
    pub exists: bool,
}

impl ProjectProbe for FakeProbe {
    fn exists(&self, _path: &Utf8Path) -> bool {
        self.log.push(Call::Exists);
        self.exists
    }
}

pub struct FakeProvisioner {
    pub log: CallLog,
    pub fail: bool,
}

impl PackageProvisioner for FakeProvisioner {
    fn provision(&self) -> Result<(), ProvisionError> {
        self.log.push(Call::Provision { ok: !self.fail });
        if self.fail {
            Err(ProvisionError::MissingSource(Utf8PathBuf::from(
                "/nonexistent/packages",
            )))
        } else {
            Ok(())
        }
    }
}

pub struct FakeInvoker {
    pub log: CallLog,
    pub succeed: bool,
}

impl BuildInvoker for FakeInvoker {
    fn invoke(&self, mode: &str, targets: &[String]) -> BuildOutcome {
        self.log.push(Call::Invoke {
            mode: mode.to_string(),
            targets: targets.to_vec(),
        });
        BuildOutcome::from_success(self.succeed)
    }
}

pub struct FakeHost {
    pub log: CallLog,
    pub reload_needed: bool,
}

impl HostServices for FakeHost {
    fn notify_scripts_reloaded(&self) {
        self.log.push(Call::NotifyScriptsReloaded);
    }

    fn restart_timer(&self) {
        self.log.push(Call::RestartTimer);
    }

    fn is_reload_needed(&self) -> bool {
        self.log.push(Call::IsReloadNeeded);
        self.reload_needed
    }

    fn reload_assemblies(&self, soft: bool) {
        self.log.push(Call::ReloadAssemblies { soft });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub project_exists: bool,
    pub provision_fails: bool,
    pub build_succeeds: bool,
    pub reload_needed: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            project_exists: true,
            provision_fails: false,
            build_succeeds: true,
            reload_needed: true,
        }
    }
}

pub type FakeOrchestrator = BuildOrchestrator<FakeProbe, FakeProvisioner, FakeInvoker, FakeHost>;

pub fn orchestrator(scenario: Scenario) -> (FakeOrchestrator, CallLog) {
    let log = CallLog::default();
    let orch = BuildOrchestrator::new(
        Utf8PathBuf::from("/project/Game.sln"),
        "Debug",
        FakeProbe {
            log: log.clone(),
            exists: scenario.project_exists,
        },
        FakeProvisioner {
            log: log.clone(),
            fail: scenario.provision_fails,
        },
        FakeInvoker {
            log: log.clone(),
            succeed: scenario.build_succeeds,
        },
        FakeHost {
            log: log.clone(),
            reload_needed: scenario.reload_needed,
        },
    );
    (orch, log)
}

pub fn invoke(targets: &[&str]) -> Call {
    Call::Invoke {
        mode: "Debug".into(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn is_reload_step(call: &Call) -> bool {
    matches!(
        call,
        Call::NotifyScriptsReloaded
            | Call::RestartTimer
            | Call::IsReloadNeeded
            | Call::ReloadAssemblies { .. }
    )
}
