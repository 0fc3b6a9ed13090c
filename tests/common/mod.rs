/*!
 * Scripted process runner for integration tests
 *
 * Behaves like python/pip/the translation script closely enough for the
 * orchestration layer: `-m venv` lays out the environment on disk,
 * `pip show`/`pip install` track packages as marker files inside the
 * environment, and translation runs are answered by a responder closure.
 * A broken venv module can be simulated with `break_venv`.
 * Every command is recorded.
 */

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nllb_bridge::config::Config;
use nllb_bridge::environment::EnvironmentLayout;
use nllb_bridge::error::{BridgeError, Result};
use nllb_bridge::process::{ProcessCommand, ProcessOutput, ProcessRunner};

pub const SYSTEM_PYTHON: &str = "python3-test";
pub const SCRIPT: &str = "translate.py";

type Responder = Box<dyn Fn(&str, &str, &str) -> Result<ProcessOutput> + Send + Sync>;

pub struct ScriptedRunner {
    layout: EnvironmentLayout,
    calls: Mutex<Vec<ProcessCommand>>,
    failing_installs: Mutex<HashSet<String>>,
    venv_broken: Mutex<bool>,
    responder: Mutex<Responder>,
}

impl ScriptedRunner {
    pub fn new(layout: EnvironmentLayout) -> Arc<Self> {
        Arc::new(Self {
            layout,
            calls: Mutex::new(Vec::new()),
            failing_installs: Mutex::new(HashSet::new()),
            venv_broken: Mutex::new(false),
            responder: Mutex::new(Box::new(|_, text, code| {
                Ok(ProcessOutput::stdout(format!("[{}] {}\n", code, text)))
            })),
        })
    }

    /// Answer translation runs with `responder(model, text, code)`
    pub fn respond_with<F>(&self, responder: F)
    where
        F: Fn(&str, &str, &str) -> Result<ProcessOutput> + Send + Sync + 'static,
    {
        *self.responder.lock().unwrap() = Box::new(responder);
    }

    pub fn fail_install(&self, package: &str) {
        self.failing_installs.lock().unwrap().insert(package.to_string());
    }

    pub fn allow_install(&self, package: &str) {
        self.failing_installs.lock().unwrap().remove(package);
    }

    /// `-m venv` reports an error and creates nothing
    pub fn break_venv(&self) {
        *self.venv_broken.lock().unwrap() = true;
    }

    pub fn repair_venv(&self) {
        *self.venv_broken.lock().unwrap() = false;
    }

    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count<F: Fn(&ProcessCommand) -> bool>(&self, predicate: F) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    pub fn venv_creations(&self) -> usize {
        self.count(|c| c.args.first().map(String::as_str) == Some("-m"))
    }

    pub fn installs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == self.layout.package_manager() && c.args[0] == "install")
            .map(|c| c.args[1].clone())
            .collect()
    }

    pub fn translations(&self) -> Vec<ProcessCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.args.first().is_some_and(|a| is_script(a)))
            .collect()
    }

    fn marker(&self, package: &str) -> PathBuf {
        self.layout.root().join("site-packages").join(package)
    }

    fn create_environment(&self, root: &Path) -> Result<ProcessOutput> {
        assert_eq!(root, self.layout.root());
        if *self.venv_broken.lock().unwrap() {
            return Ok(ProcessOutput::stderr("/usr/bin/python3: No module named venv\n"));
        }
        std::fs::create_dir_all(self.layout.scripts_dir())?;
        std::fs::create_dir_all(self.layout.root().join("site-packages"))?;
        std::fs::write(self.layout.interpreter(), "")?;
        std::fs::write(self.layout.package_manager(), "")?;
        Ok(ProcessOutput::default())
    }

    fn pip(&self, args: &[String]) -> Result<ProcessOutput> {
        match args[0].as_str() {
            "show" => {
                let name = &args[1];
                if self.marker(name).exists() {
                    Ok(ProcessOutput::stdout(format!("Name: {}\nVersion: 1.0.0\n", name)))
                } else {
                    Ok(ProcessOutput::stderr(format!("WARNING: Package(s) not found: {}\n", name)))
                }
            }
            "install" => {
                let target = &args[1];
                let name: String = target
                    .chars()
                    .take_while(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                    .collect();
                if self.failing_installs.lock().unwrap().contains(&name) {
                    return Ok(ProcessOutput::new(
                        format!("Collecting {}\n", target),
                        format!("ERROR: No matching distribution found for {}\n", target),
                    ));
                }
                std::fs::write(self.marker(&name), "")?;
                Ok(ProcessOutput::stdout(format!("Successfully installed {}-1.0.0\n", name)))
            }
            other => panic!("unexpected pip subcommand {other}"),
        }
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &ProcessCommand) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push(command.clone());
        let args = &command.args;

        if command.program == self.layout.package_manager() {
            return self.pip(args);
        }

        let is_python = command.program == self.layout.interpreter()
            || command.program == Path::new(SYSTEM_PYTHON);
        if !is_python {
            return Err(BridgeError::Launch {
                program: command.program_name(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        match args.first().map(String::as_str) {
            Some("-m") => self.create_environment(Path::new(&args[2])),
            Some(script) if is_script(script) => {
                let responder = self.responder.lock().unwrap();
                responder(&args[1], &args[2], &args[3])
            }
            _ => panic!("unexpected python invocation {:?}", args),
        }
    }
}

fn is_script(arg: &str) -> bool {
    Path::new(arg).file_name() == Some(OsStr::new(SCRIPT))
}

/// Default config rooted in `dir`, wired to the scripted interpreter
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.environment.root = dir.join("venv");
    config.environment.system_interpreter = SYSTEM_PYTHON.to_string();
    config.translate.script_path = dir.join(SCRIPT);
    config
}

pub fn layout_for(config: &Config) -> EnvironmentLayout {
    EnvironmentLayout::for_current_platform(&config.environment.root)
}
