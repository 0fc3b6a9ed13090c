use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

use super::EnvironmentLayout;
use crate::error::{Result, BridgeError};
use crate::process::{ProcessCommand, ProcessRunner};

/// Owns the on-disk lifecycle of one virtual environment
pub struct EnvironmentManager {
    layout: EnvironmentLayout,
    system_interpreter: String,
    runner: Arc<dyn ProcessRunner>,
}

impl EnvironmentManager {
    pub fn new<S: Into<String>>(
        layout: EnvironmentLayout,
        system_interpreter: S,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            layout,
            system_interpreter: system_interpreter.into(),
            runner,
        }
    }

    pub fn layout(&self) -> &EnvironmentLayout {
        &self.layout
    }

    pub fn system_interpreter(&self) -> &str {
        &self.system_interpreter
    }

    /// Whether the directory exists without an interpreter in it, as left
    /// behind by a failed creation
    pub fn is_incomplete(&self) -> bool {
        self.layout.exists() && !self.layout.interpreter().exists()
    }

    /// Create the environment if its directory is absent; with `force`,
    /// delete an existing directory first.
    ///
    /// Presence of the root directory is what makes this idempotent; its
    /// contents are not inspected. A failed creation leaves the directory
    /// in place (see `is_incomplete`), so retry with `force`.
    pub async fn ensure(&self, force: bool) -> Result<()> {
        let root = self.layout.root();

        if force && root.exists() {
            info!("Removing existing environment at {}", root.display());
            fs::remove_dir_all(root).await?;
        }

        if root.exists() {
            debug!("Environment already present at {}", root.display());
            return Ok(());
        }

        info!("Creating virtual environment at {}", root.display());
        fs::create_dir_all(root).await?;

        let command = ProcessCommand::new(&self.system_interpreter, "Environment creation")
            .args(["-m", "venv"])
            .path_arg(root);
        let output = self.runner.run(&command).await?;

        if !self.layout.interpreter().exists() {
            return Err(BridgeError::EnvironmentState(format!(
                "{} was not created: {}",
                self.layout.interpreter().display(),
                output.stderr.trim()
            )));
        }

        info!("Virtual environment ready at {}", root.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use crate::process::ProcessOutput;

    /// Materializes the interpreter the way `-m venv` would and records calls
    struct VenvStub {
        layout: EnvironmentLayout,
        calls: Mutex<Vec<ProcessCommand>>,
        materialize: bool,
    }

    impl VenvStub {
        fn new(layout: EnvironmentLayout, materialize: bool) -> Arc<Self> {
            Arc::new(Self { layout, calls: Mutex::new(Vec::new()), materialize })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProcessRunner for VenvStub {
        async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
            self.calls.lock().unwrap().push(command.clone());
            if !self.materialize {
                return Ok(ProcessOutput::stderr("No module named venv"));
            }
            std::fs::create_dir_all(self.layout.scripts_dir())?;
            std::fs::write(self.layout.interpreter(), "")?;
            std::fs::write(self.layout.package_manager(), "")?;
            Ok(ProcessOutput::default())
        }
    }

    fn manager_with(stub: &Arc<VenvStub>) -> EnvironmentManager {
        EnvironmentManager::new(stub.layout.clone(), "python3", stub.clone())
    }

    #[tokio::test]
    async fn test_creates_missing_environment_with_venv_module() {
        let temp = tempfile::tempdir().unwrap();
        let layout = EnvironmentLayout::for_current_platform(temp.path().join("venv"));
        let stub = VenvStub::new(layout.clone(), true);

        manager_with(&stub).ensure(false).await.unwrap();

        let calls = stub.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program_name(), "python3");
        assert_eq!(
            calls[0].args,
            vec!["-m".to_string(), "venv".to_string(), layout.root().to_string_lossy().to_string()]
        );
        assert!(layout.interpreter().exists());
        assert!(!manager_with(&stub).is_incomplete());
    }

    #[tokio::test]
    async fn test_existing_environment_is_left_alone() {
        let temp = tempfile::tempdir().unwrap();
        let layout = EnvironmentLayout::for_current_platform(temp.path().join("venv"));
        std::fs::create_dir_all(layout.root()).unwrap();
        let stub = VenvStub::new(layout.clone(), true);

        let manager = manager_with(&stub);
        manager.ensure(false).await.unwrap();

        assert_eq!(stub.call_count(), 0);
        assert!(manager.is_incomplete());
    }

    #[tokio::test]
    async fn test_force_recreates_environment() {
        let temp = tempfile::tempdir().unwrap();
        let layout = EnvironmentLayout::for_current_platform(temp.path().join("venv"));
        std::fs::create_dir_all(layout.root()).unwrap();
        let stale = layout.root().join("stale-marker");
        std::fs::write(&stale, "old").unwrap();
        let stub = VenvStub::new(layout.clone(), true);

        manager_with(&stub).ensure(true).await.unwrap();

        assert_eq!(stub.call_count(), 1);
        assert!(!stale.exists());
        assert!(layout.interpreter().exists());
    }

    #[tokio::test]
    async fn test_failed_materialization_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let layout = EnvironmentLayout::for_current_platform(temp.path().join("venv"));
        let stub = VenvStub::new(layout.clone(), false);

        let err = manager_with(&stub).ensure(false).await.unwrap_err();

        match err {
            BridgeError::EnvironmentState(message) => assert!(message.contains("No module named venv")),
            other => panic!("unexpected error: {other:?}"),
        }
        // No cleanup: the directory stays until a forced retry.
        assert!(layout.root().exists());
        assert!(manager_with(&stub).is_incomplete());
    }
}
