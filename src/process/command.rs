use std::path::{Path, PathBuf};
use std::time::Duration;

/// One invocation of an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub description: String,
    pub timeout: Option<Duration>,
}

impl ProcessCommand {
    /// Create a new command
    pub fn new<P: AsRef<Path>, S: Into<String>>(program: P, description: S) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            description: description.into(),
            timeout: None,
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add a path argument
    pub fn path_arg<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Bound the run time; the child is killed when it is exceeded
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program name for messages
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}
