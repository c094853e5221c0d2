//! Composer command lines.
//!
//! Pure builders: every step the orchestrator runs is described here as a
//! `CommandLine` so tests can assert exact argument lists.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::install_state::INSTALLER_FILE;

/// Canonical location of the Composer installer script.
pub const DEFAULT_INSTALLER_URL: &str = "https://getcomposer.org/installer";

/// File name the installer is asked to produce inside the install directory.
pub const COMPOSER_EXE_NAME: &str = "composer";

/// Default PHP interpreter.
pub const DEFAULT_PHP: &str = "php";

/// A program plus its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Builds the Composer command lines for one install directory.
#[derive(Debug, Clone, Copy)]
pub struct Composer<'a> {
    php: &'a str,
    dir: &'a Path,
}

impl<'a> Composer<'a> {
    #[must_use]
    pub fn new(php: &'a str, dir: &'a Path) -> Self {
        Self { php, dir }
    }

    /// Path of the installed `composer` executable.
    #[must_use]
    pub fn executable(&self) -> PathBuf {
        self.dir.join(COMPOSER_EXE_NAME)
    }

    /// `php <dir>/installer -- --install-dir=<dir> --filename=composer`
    #[must_use]
    pub fn run_installer(&self) -> CommandLine {
        self.php_with(vec![
            self.dir.join(INSTALLER_FILE).display().to_string(),
            "--".to_string(),
            format!("--install-dir={}", self.dir.display()),
            format!("--filename={COMPOSER_EXE_NAME}"),
        ])
    }

    /// `php <dir>/composer self-update`
    #[must_use]
    pub fn self_update(&self) -> CommandLine {
        self.composer_with(&["self-update"])
    }

    /// `php <dir>/composer global update`
    #[must_use]
    pub fn global_update(&self) -> CommandLine {
        self.composer_with(&["global", "update"])
    }

    /// `php <dir>/composer global require <pkg>...`
    #[must_use]
    pub fn global_require<'p>(&self, packages: impl IntoIterator<Item = &'p str>) -> CommandLine {
        let mut args = vec!["global", "require"];
        args.extend(packages);
        self.composer_with(&args)
    }

    fn composer_with(&self, sub: &[&str]) -> CommandLine {
        let mut args = vec![self.executable().display().to_string()];
        args.extend(sub.iter().map(|s| (*s).to_string()));
        self.php_with(args)
    }

    fn php_with(&self, args: Vec<String>) -> CommandLine {
        CommandLine {
            program: self.php.to_string(),
            args,
        }
    }
}
