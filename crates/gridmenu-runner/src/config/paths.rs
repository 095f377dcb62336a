use std::path::PathBuf;

/// Per-application directories.
///
/// Unix-like systems follow XDG (`$XDG_CONFIG_HOME/{name}`, falling back to
/// `~/.config/{name}`, and `$XDG_DATA_HOME/{name}`, falling back to
/// `~/.local/share/{name}`). Windows uses `%APPDATA%\{name}` for both.
pub struct ProjectPaths {
    name: String,
}

impl ProjectPaths {
    /// `None` when no home directory can be found
    pub fn new(name: &str) -> Option<Self> {
        home_dir()?;
        Some(ProjectPaths {
            name: name.to_string(),
        })
    }

    pub fn config_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            windows_appdata(&self.name)
        }

        #[cfg(not(target_os = "windows"))]
        {
            xdg_dir("XDG_CONFIG_HOME", &[".config"], &self.name)
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            windows_appdata(&self.name)
        }

        #[cfg(not(target_os = "windows"))]
        {
            xdg_dir("XDG_DATA_HOME", &[".local", "share"], &self.name)
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(not(target_os = "windows"))]
fn xdg_dir(var: &str, fallback: &[&str], name: &str) -> PathBuf {
    let relative: PathBuf = fallback.iter().collect();
    std::env::var(var)
        .ok()
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|h| h.join(&relative)))
        .unwrap_or(relative)
        .join(name)
}

#[cfg(target_os = "windows")]
fn windows_appdata(name: &str) -> PathBuf {
    std::env::var("APPDATA")
        .ok()
        .map(|p| PathBuf::from(p).join(name))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_contain_name() {
        if let Some(paths) = ProjectPaths::new("gridmenu") {
            assert!(paths.config_dir().ends_with("gridmenu"));
            assert!(paths.data_dir().ends_with("gridmenu"));
        }
    }

    #[test]
    #[cfg(not(target_os = "windows"))]
    fn test_xdg_fallback_shape() {
        let dir = xdg_dir("GRIDMENU_UNSET_TEST_VAR", &[".local", "share"], "x");
        assert!(dir.ends_with(".local/share/x"));
    }
}
