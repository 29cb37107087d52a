use std::collections::{BTreeMap, HashMap};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::ShellType;
use crate::utils::is_readable_file;

/// History files found for each shell, at most one per dialect
pub type DetectedSources = BTreeMap<ShellType, PathBuf>;

/// Where detection reads environment overrides from
#[derive(Debug, Clone, Default)]
pub enum EnvLookup {
    /// The current process environment
    #[default]
    Process,
    /// A fixed set of variables; anything missing counts as unset
    Fixed(HashMap<String, OsString>),
}

impl EnvLookup {
    /// An environment with no variables set
    pub fn empty() -> Self {
        EnvLookup::Fixed(HashMap::new())
    }

    /// Add a variable, turning a process lookup into a fixed one
    pub fn with_var(self, key: &str, value: impl Into<OsString>) -> Self {
        let mut vars = match self {
            EnvLookup::Process => HashMap::new(),
            EnvLookup::Fixed(vars) => vars,
        };
        vars.insert(key.to_string(), value.into());
        EnvLookup::Fixed(vars)
    }

    /// Non-empty value of `key`
    pub fn get(&self, key: &str) -> Option<OsString> {
        let value = match self {
            EnvLookup::Process => env::var_os(key),
            EnvLookup::Fixed(vars) => vars.get(key).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Locate history files under `home` using the process environment
pub fn detect_shells(home: &Path) -> DetectedSources {
    detect_shells_with_env(home, &EnvLookup::Process)
}

/// Locate history files under `home`
///
/// For each shell the environment override is tried first, then the default
/// locations. The first candidate that is a readable regular file wins. A
/// shell with no readable candidate is left out of the result; detection
/// itself never fails.
pub fn detect_shells_with_env(home: &Path, env: &EnvLookup) -> DetectedSources {
    let mut found = DetectedSources::new();

    for shell in ShellType::DETECTABLE {
        let candidates = candidate_paths(shell, home, env);
        match candidates.into_iter().find(|path| is_readable_file(path)) {
            Some(path) => {
                debug!(%shell, path = %path.display(), "found history file");
                found.insert(shell, path);
            }
            None => debug!(%shell, "no readable history file"),
        }
    }

    found
}

/// Candidate history paths for `shell`, most specific first
pub fn candidate_paths(shell: ShellType, home: &Path, env: &EnvLookup) -> Vec<PathBuf> {
    let var_path = |key: &str| env.get(key).map(|v| expand_home(PathBuf::from(v), home));
    let mut paths = Vec::new();

    match shell {
        ShellType::Bash => {
            // HISTFILE is shared with zsh; only trust it when it isn't a zsh file
            if let Some(path) = var_path("HISTFILE")
                && !names_zsh_file(&path)
            {
                paths.push(path);
            }
            paths.push(home.join(".bash_history"));
        }
        ShellType::Zsh => {
            if let Some(dir) = var_path("ZDOTDIR") {
                paths.push(dir.join(".zsh_history"));
            }
            if let Some(path) = var_path("HISTFILE")
                && names_zsh_file(&path)
            {
                paths.push(path);
            }
            paths.push(home.join(".zsh_history"));
            paths.push(home.join(".histfile"));
        }
        ShellType::Fish => {
            if let Some(dir) = var_path("XDG_DATA_HOME") {
                paths.push(dir.join("fish").join("fish_history"));
            }
            paths.push(home.join(".local").join("share").join("fish").join("fish_history"));
        }
        ShellType::PowerShell => {
            if let Some(path) = var_path("PSHISTFILE") {
                paths.push(path);
            }
            if cfg!(windows) {
                paths.push(
                    home.join("AppData")
                        .join("Roaming")
                        .join("Microsoft")
                        .join("Windows")
                        .join("PowerShell")
                        .join("history.json"),
                );
            } else {
                paths.push(home.join(".local").join("share").join("powershell").join("history.json"));
            }
        }
        ShellType::Unknown => {}
    }

    paths
}

fn names_zsh_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name.to_string_lossy().contains("zsh"))
}

/// Resolve a leading `~` against `home`
fn expand_home(path: PathBuf, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path,
    }
}
