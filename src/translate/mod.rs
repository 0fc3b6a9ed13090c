// Translation orchestration
//
// Translator owns one environment and its setup state:
// - setup: create the environment and install the required packages once
// - translate: validate a request and run the translation script once
//
// Output of the script is interpreted by classify::OutputClassifier.

pub mod classify;
pub mod script;

use futures::future::try_join_all;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub use classify::{Classification, OutputClassifier};

use crate::catalog::{LanguageCatalog, ModelCatalog};
use crate::config::{Config, InstallPolicy, PackagesConfig, TranslateConfig};
use crate::environment::{EnvironmentLayout, EnvironmentManager};
use crate::error::{Result, BridgeError};
use crate::notice::{Notice, NoticeSink};
use crate::packages::PackageInstaller;
use crate::process::{ProcessCommand, ProcessRunner};

pub struct Translator {
    translate: TranslateConfig,
    packages: PackagesConfig,
    environment: EnvironmentManager,
    installer: PackageInstaller,
    models: ModelCatalog,
    languages: LanguageCatalog,
    classifier: OutputClassifier,
    runner: Arc<dyn ProcessRunner>,
    notices: NoticeSink,
    setup_completed: bool,
}

impl Translator {
    pub fn new(config: Config, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        Self::with_notices(config, runner, NoticeSink::new())
    }

    /// Like `new`, delivering install and download notices to `notices`
    pub fn with_notices(config: Config, runner: Arc<dyn ProcessRunner>, notices: NoticeSink) -> Result<Self> {
        let layout = EnvironmentLayout::for_current_platform(&config.environment.root);
        let languages = LanguageCatalog::load(config.translate.languages_path.as_deref())?;
        let models = ModelCatalog::new(config.translate.models.clone());
        if models.is_empty() {
            return Err(BridgeError::Config("No translation models configured".to_string()));
        }

        let environment = EnvironmentManager::new(
            layout.clone(),
            config.environment.system_interpreter.clone(),
            runner.clone(),
        );
        let installer = PackageInstaller::new(layout, runner.clone(), notices.clone())
            .with_install_timeout(config.packages.install_timeout());
        let classifier = OutputClassifier::new(config.translate.download_markers.clone());

        Ok(Self {
            translate: config.translate,
            packages: config.packages,
            environment,
            installer,
            models,
            languages,
            classifier,
            runner,
            notices,
            setup_completed: false,
        })
    }

    pub fn models(&self) -> &ModelCatalog {
        &self.models
    }

    pub fn languages(&self) -> &LanguageCatalog {
        &self.languages
    }

    pub fn environment(&self) -> &EnvironmentManager {
        &self.environment
    }

    pub fn is_setup_completed(&self) -> bool {
        self.setup_completed
    }

    /// Prepare the environment and required packages.
    ///
    /// A completed setup is skipped unless `force` is set, in which case the
    /// environment is recreated from scratch. On error the setup stays
    /// incomplete and can be retried. An environment directory left behind
    /// by a failed creation is recreated even without `force`.
    pub async fn setup(&mut self, force: bool) -> Result<()> {
        if self.setup_completed && !force {
            info!("Setup already completed.");
            return Ok(());
        }
        self.setup_completed = false;

        let incomplete = self.environment.is_incomplete();
        if incomplete && !force {
            info!("Environment at {} has no interpreter, recreating",
                  self.environment.layout().root().display());
        }
        self.environment.ensure(force || incomplete).await?;

        let required = &self.packages.required;
        match self.packages.policy {
            InstallPolicy::Sequential => {
                for package in required {
                    self.installer.ensure_installed(package).await?;
                }
            }
            InstallPolicy::Concurrent => {
                try_join_all(required.iter().map(|package| self.installer.ensure_installed(package)))
                    .await?;
            }
        }

        script::install_bundled(&self.translate.script_path).await?;

        info!("Setup completed ({} packages)", required.len());
        self.setup_completed = true;
        Ok(())
    }

    /// Translate `text` into `target_language` with the model at
    /// `model_index` (0 when absent). Runs the script exactly once.
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
        model_index: Option<usize>,
    ) -> Result<String> {
        let language = self.languages.resolve(target_language)?;
        let model = self.models.resolve(model_index)?;

        let command = ProcessCommand::new(self.interpreter(), "Translation")
            .path_arg(&self.translate.script_path)
            .arg(model)
            .arg(text)
            .arg(language)
            .timeout(self.translate.timeout());

        debug!("Translating {} chars to {} with {}", text.chars().count(), language, model);
        let output = self.runner.run(&command).await?;

        let classification = self.classifier.classify(&output);
        if let Some(output) = classification.notice {
            self.notices.emit(Notice::ModelDownload {
                model: model.to_string(),
                output,
            });
        }

        classification.result.map_err(BridgeError::Execution)
    }

    /// Environment interpreter, or the system one before the environment exists
    fn interpreter(&self) -> PathBuf {
        let interpreter = self.environment.layout().interpreter();
        if interpreter.exists() {
            interpreter
        } else {
            PathBuf::from(self.environment.system_interpreter())
        }
    }
}
