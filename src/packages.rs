use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::environment::EnvironmentLayout;
use crate::error::{Result, BridgeError};
use crate::notice::{Notice, NoticeSink};
use crate::process::{ProcessCommand, ProcessRunner};

/// A package the environment must provide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Distribution name, as `pip show` reports it
    pub name: String,
    /// Version constraint appended to the name on install (e.g., "<2")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<String>,
    /// Extra `pip install` arguments (e.g., an index URL)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_args: Vec<String>,
}

impl PackageSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            requirement: None,
            extra_args: Vec::new(),
        }
    }

    pub fn with_requirement<S: Into<String>>(mut self, requirement: S) -> Self {
        self.requirement = Some(requirement.into());
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Requirement string handed to `pip install`
    pub fn install_target(&self) -> String {
        match &self.requirement {
            Some(requirement) => format!("{}{}", self.name, requirement),
            None => self.name.clone(),
        }
    }
}

/// Installs packages into an existing environment with its own pip
pub struct PackageInstaller {
    layout: EnvironmentLayout,
    runner: Arc<dyn ProcessRunner>,
    notices: NoticeSink,
    install_timeout: Option<Duration>,
}

impl PackageInstaller {
    pub fn new(layout: EnvironmentLayout, runner: Arc<dyn ProcessRunner>, notices: NoticeSink) -> Self {
        Self {
            layout,
            runner,
            notices,
            install_timeout: None,
        }
    }

    pub fn with_install_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.install_timeout = timeout;
        self
    }

    /// Whether `pip show` reports the package. A failing query counts as
    /// not installed, so the install is simply attempted again.
    pub async fn is_installed(&self, name: &str) -> bool {
        let command = ProcessCommand::new(self.layout.package_manager(), "Package query")
            .arg("show")
            .arg(name);

        match self.runner.run(&command).await {
            Ok(output) => reports_package(&output.stdout, name),
            Err(e) => {
                debug!("pip show {} failed, treating as not installed: {}", name, e);
                false
            }
        }
    }

    /// Install the package unless it is already present
    pub async fn ensure_installed(&self, package: &PackageSpec) -> Result<()> {
        self.check_environment()?;

        if self.is_installed(&package.name).await {
            debug!("{} is already installed", package.name);
            return Ok(());
        }

        info!("Installing {}", package.install_target());
        let command = ProcessCommand::new(self.layout.package_manager(), "Package install")
            .arg("install")
            .arg(package.install_target())
            .args(package.extra_args.iter().cloned())
            .timeout(self.install_timeout);
        let output = self.runner.run(&command).await?;

        if !output.stderr.is_empty() {
            return Err(BridgeError::Installation {
                package: package.name.clone(),
                message: output.stderr,
            });
        }

        self.notices.emit(Notice::PackageInstalled {
            package: package.name.clone(),
            output: output.stdout,
        });
        Ok(())
    }

    fn check_environment(&self) -> Result<()> {
        let required = [
            self.layout.root().to_path_buf(),
            self.layout.scripts_dir(),
            self.layout.package_manager(),
        ];
        for path in required {
            if !path.exists() {
                return Err(BridgeError::EnvironmentState(format!(
                    "{} does not exist.",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// True when `pip show` output carries a `Name: <name>` line
fn reports_package(stdout: &str, name: &str) -> bool {
    stdout.lines().any(|line| {
        line.strip_prefix("Name:")
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(name))
    })
}
