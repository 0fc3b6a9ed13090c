use std::path::{Path, PathBuf};

/// Platform family that decides the environment's directory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    fn scripts_dir_name(self) -> &'static str {
        match self {
            Platform::Windows => "Scripts",
            Platform::Unix => "bin",
        }
    }

    fn executable_suffix(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Unix => "",
        }
    }

    fn activate_script(self) -> &'static str {
        match self {
            Platform::Windows => "activate.bat",
            Platform::Unix => "activate",
        }
    }

    fn deactivate_script(self) -> &'static str {
        match self {
            Platform::Windows => "deactivate.bat",
            Platform::Unix => "deactivate",
        }
    }
}

/// Paths inside a virtual environment, derived purely from root and platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    root: PathBuf,
    platform: Platform,
}

impl EnvironmentLayout {
    pub fn new<P: AsRef<Path>>(root: P, platform: Platform) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            platform,
        }
    }

    /// Layout for the platform this binary was compiled for
    pub fn for_current_platform<P: AsRef<Path>>(root: P) -> Self {
        Self::new(root, Platform::current())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(self.platform.scripts_dir_name())
    }

    pub fn interpreter(&self) -> PathBuf {
        self.executable("python")
    }

    pub fn package_manager(&self) -> PathBuf {
        self.executable("pip")
    }

    /// Not invoked here; listed for callers that want a shell in the environment.
    pub fn activate_script(&self) -> PathBuf {
        self.scripts_dir().join(self.platform.activate_script())
    }

    pub fn deactivate_script(&self) -> PathBuf {
        self.scripts_dir().join(self.platform.deactivate_script())
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    fn executable(&self, name: &str) -> PathBuf {
        self.scripts_dir()
            .join(format!("{}{}", name, self.platform.executable_suffix()))
    }
}
