use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Policy governing whether output lines carry their source file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameMode {
    /// Prefix only when more than one file is being searched.
    #[default]
    Auto,
    /// Always prefix.
    Always,
    /// Never prefix, regardless of the number of files.
    Never,
}

/// Per-invocation search configuration.
///
/// Built once from caller-supplied parameters (optionally layered over a
/// config file) and never mutated afterwards. One `SearchJob` drives one
/// dispatch call; searching several patterns means one job per pattern over
/// the same path set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    /// The literal pattern searched for in each line.
    #[serde(default)]
    pub pattern: String,

    /// Whether matched lines are prefixed with their 1-based line number.
    #[serde(default)]
    pub line_numbers: bool,

    /// Whether matched lines are prefixed with their source file path.
    #[serde(default)]
    pub filename_mode: FilenameMode,

    /// Whether directories found during enumeration are expanded recursively.
    /// When false, a directory root is an error.
    #[serde(default)]
    pub recursive: bool,

    /// Number of worker threads one dispatch call spawns.
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(4).unwrap()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchJob {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            line_numbers: false,
            filename_mode: FilenameMode::default(),
            recursive: false,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
        }
    }
}

impl SearchJob {
    /// Creates a job for `pattern` with every other field at its default.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration, layering the global config file, the local
    /// `.linescout.yaml`, and finally `config_path` if given.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("linescout/config.yaml")),
            // Local config
            Some(PathBuf::from(".linescout.yaml")),
            // Custom config
            config_path.map(PathBuf::from),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// CLI values take precedence; flags left at their defaults keep whatever
    /// the config file said.
    pub fn merge_with_cli(mut self, cli: SearchJob) -> Self {
        if !cli.pattern.is_empty() {
            self.pattern = cli.pattern;
        }
        if cli.line_numbers {
            self.line_numbers = true;
        }
        if cli.filename_mode != FilenameMode::Auto {
            self.filename_mode = cli.filename_mode;
        }
        if cli.recursive {
            self.recursive = true;
        }
        if cli.thread_count != default_thread_count() {
            // Cap explicit over-subscription at twice the core count.
            let cap = NonZeroUsize::new(num_cpus::get().max(1) * 2).unwrap();
            self.thread_count = cli.thread_count.min(cap);
        }
        if cli.log_level != default_log_level() {
            self.log_level = cli.log_level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let job = SearchJob::new("needle");
        assert_eq!(job.pattern, "needle");
        assert!(!job.line_numbers);
        assert_eq!(job.filename_mode, FilenameMode::Auto);
        assert!(!job.recursive);
        assert_eq!(job.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(job.log_level, "warn");
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            pattern: "TODO"
            line_numbers: true
            filename_mode: always
            recursive: true
            thread_count: 8
            log_level: "debug"
        "#;
        fs::write(&config_path, config_content).unwrap();

        let job = SearchJob::load_from(Some(&config_path)).unwrap();
        assert_eq!(job.pattern, "TODO");
        assert!(job.line_numbers);
        assert_eq!(job.filename_mode, FilenameMode::Always);
        assert!(job.recursive);
        assert_eq!(job.thread_count, NonZeroUsize::new(8).unwrap());
        assert_eq!(job.log_level, "debug");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "line_numbers: true\n").unwrap();

        let job = SearchJob::load_from(Some(&config_path)).unwrap();
        assert!(job.line_numbers);
        assert_eq!(job.filename_mode, FilenameMode::Auto);
        assert_eq!(job.thread_count, NonZeroUsize::new(4).unwrap());
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        fs::write(&config_path, "thread_count: \"invalid\"\n").unwrap();

        let result = SearchJob::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_merge_with_cli() {
        let file_job = SearchJob {
            pattern: "TODO".to_string(),
            line_numbers: false,
            filename_mode: FilenameMode::Never,
            recursive: false,
            thread_count: NonZeroUsize::new(2).unwrap(),
            log_level: "info".to_string(),
        };

        let cli_job = SearchJob {
            pattern: "FIXME".to_string(),
            line_numbers: true,
            filename_mode: FilenameMode::Always,
            recursive: true,
            thread_count: NonZeroUsize::new(3).unwrap(),
            log_level: "debug".to_string(),
        };

        let merged = file_job.merge_with_cli(cli_job);
        assert_eq!(merged.pattern, "FIXME"); // CLI value
        assert!(merged.line_numbers); // CLI value
        assert_eq!(merged.filename_mode, FilenameMode::Always); // CLI value
        assert!(merged.recursive); // CLI value
        assert_eq!(merged.thread_count, NonZeroUsize::new(3).unwrap()); // CLI value
        assert_eq!(merged.log_level, "debug"); // CLI value
    }

    #[test]
    fn test_merge_keeps_file_values_for_default_flags() {
        let file_job = SearchJob {
            pattern: "TODO".to_string(),
            line_numbers: true,
            filename_mode: FilenameMode::Never,
            recursive: true,
            thread_count: NonZeroUsize::new(2).unwrap(),
            log_level: "info".to_string(),
        };

        let merged = file_job.merge_with_cli(SearchJob::default());
        assert_eq!(merged.pattern, "TODO");
        assert!(merged.line_numbers);
        assert_eq!(merged.filename_mode, FilenameMode::Never);
        assert!(merged.recursive);
        assert_eq!(merged.thread_count, NonZeroUsize::new(2).unwrap());
        assert_eq!(merged.log_level, "info");
    }

    #[test]
    fn test_merge_caps_thread_count() {
        let cap = num_cpus::get().max(1) * 2;
        let cli_job = SearchJob {
            thread_count: NonZeroUsize::new(cap + 100).unwrap(),
            ..SearchJob::default()
        };

        let merged = SearchJob::default().merge_with_cli(cli_job);
        assert_eq!(merged.thread_count.get(), cap);
    }
}
