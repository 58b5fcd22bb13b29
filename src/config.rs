//! Saved defaults and the macro file location.
//!
//! Defaults are stored as command-line flags, one or more per line, in a
//! global config file and an optional `.cliplinerc` in the working directory.
//! A `--macros` line is the exception: its path runs to the end of the line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable naming the macro file when no flag does.
pub const MACROS_ENV: &str = "CLIPLINE_MACROS";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub macros: Option<PathBuf>,
    pub verbose: bool,
    pub json: bool,
}

impl ConfigFlags {
    /// Merge two flag sets; `other` wins for valued options.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            macros: other.macros.clone().or_else(|| self.macros.clone()),
            verbose: self.verbose || other.verbose,
            json: self.json || other.json,
        }
    }

    /// The macro file to load: the configured path, else `CLIPLINE_MACROS`.
    pub fn macro_path(&self) -> Option<PathBuf> {
        self.macros
            .clone()
            .or_else(|| std::env::var_os(MACROS_ENV).map(PathBuf::from))
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("clipline").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("clipline")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("clipline").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("clipline")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".cliplinerc")
}

/// Read flags from `path`. A missing file yields no flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(line_tokens)
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Split one config line into flag tokens.
///
/// A `--macros` line takes the rest of the line as its path, spaces included.
fn line_tokens(line: &str) -> Vec<String> {
    for flag in ["--macros=", "--macros ", "-m "] {
        if let Some(value) = line.strip_prefix(flag) {
            return vec!["--macros".to_string(), value.trim().to_string()];
        }
    }
    line.split_whitespace().map(ToOwned::to_owned).collect()
}

/// Write `flags` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# clipline defaults (saved with --save)".to_string());
    if let Some(macros) = &flags.macros {
        lines.push(format!("--macros={}", macros.display()));
    }
    if flags.verbose {
        lines.push("--verbose".to_string());
    }
    if flags.json {
        lines.push("--json".to_string());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove saved defaults, if any.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the flags this module knows out of an argument list, ignoring the rest.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--" {
            // Everything after is the command.
            break;
        } else if token == "--verbose" || token == "-v" {
            flags.verbose = true;
        } else if token == "--json" {
            flags.json = true;
        } else if token == "--macros" || token == "-m" {
            if let Some(next) = tokens.get(i + 1) {
                flags.macros = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--macros=") {
            flags.macros = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "clipline".to_string(),
            "--verbose".to_string(),
            "--macros".to_string(),
            "macros.json5".to_string(),
            "--json".to_string(),
            "columnAlign".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.verbose);
        assert!(flags.json);
        assert_eq!(flags.macros, Some(PathBuf::from("macros.json5")));
    }

    #[test]
    fn test_parse_flag_tokens_stops_at_double_dash() {
        let args = vec![
            "clipline".to_string(),
            "--".to_string(),
            "replace".to_string(),
            "--json".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(!flags.json);
    }

    #[test]
    fn test_config_union_prefers_cli_macro_path() {
        let file = ConfigFlags {
            macros: Some(PathBuf::from("file.json5")),
            verbose: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            macros: Some(PathBuf::from("cli.json5")),
            json: true,
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.verbose);
        assert!(merged.json);
        assert_eq!(merged.macros, Some(PathBuf::from("cli.json5")));
    }

    #[test]
    fn test_configured_macro_path_wins_over_environment() {
        let flags = ConfigFlags {
            macros: Some(PathBuf::from("flag.json5")),
            ..ConfigFlags::default()
        };
        assert_eq!(flags.macro_path(), Some(PathBuf::from("flag.json5")));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            macros: Some(PathBuf::from("macros.json5")),
            verbose: true,
            json: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }

    #[test]
    fn test_saved_macro_path_keeps_spaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        let flags = ConfigFlags {
            macros: Some(PathBuf::from("/Users/me/Application Support/clipline/macros.json5")),
            ..ConfigFlags::default()
        };

        save_config_flags(&path, &flags).unwrap();
        assert_eq!(load_config_flags(&path).unwrap(), flags);
    }

    #[test]
    fn test_hand_written_macros_line_keeps_spaces() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "--verbose\n--macros  my macros/all.json5 \n").unwrap();
        let flags = load_config_flags(&path).unwrap();
        assert!(flags.verbose);
        assert_eq!(flags.macros, Some(PathBuf::from("my macros/all.json5")));
    }
}
