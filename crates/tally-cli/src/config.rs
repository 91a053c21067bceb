//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tally_core::{GroupConfig, Rule};

/// Application configuration.
///
/// ```toml
/// [group]
/// groupByRules = true
///
/// [[rules]]
/// field = "comment"
/// values = ["bugfix", "hotfix"]
/// key = "fixes"
/// name = "Fixes"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Grouping toggles.
    #[serde(default)]
    pub group: GroupConfig,

    /// Classification rules, in precedence order.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Per-toggle overrides read from `TALLY_BY_*` variables.
#[derive(Debug, Default, Deserialize)]
struct EnvToggles {
    by_task: Option<bool>,
    by_comment: Option<bool>,
    by_rules: Option<bool>,
}

impl EnvToggles {
    fn apply(self, group: GroupConfig) -> GroupConfig {
        GroupConfig {
            group_by_task: self.by_task.unwrap_or(group.group_by_task),
            group_by_comment: self.by_comment.unwrap_or(group.group_by_comment),
            group_by_rules: self.by_rules.unwrap_or(group.group_by_rules),
        }
    }
}

impl Config {
    /// Loads configuration from default locations, then `config_path` if
    /// given, then `TALLY_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        let mut config: Self = figment.extract()?;

        // Environment variables (TALLY_BY_*) override single toggles
        let env: EnvToggles =
            Figment::from(Env::prefixed("TALLY_").only(&["by_task", "by_comment", "by_rules"]))
                .extract()?;
        config.group = env.apply(config.group);

        Ok(config)
    }
}

/// Returns the platform-specific config directory for tally.
///
/// On Linux: `~/.config/tally`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tally"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tally_core::LogField;

    #[test]
    fn test_dirs_config_path_ends_with_tally() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "tally");
    }

    #[test]
    fn test_default_config_groups_nothing() {
        let config = Config::default();
        assert_eq!(config.group, GroupConfig::default());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_load_rules_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(
            &path,
            r#"
[group]
groupByRules = true

[[rules]]
field = "comment"
values = ["bugfix"]
key = "r1"
name = "Bugfix"

[[rules]]
action = "includes"
field = "issue"
values = ["OPS-"]
key = "ops"
name = "Operations"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(
            config.group,
            GroupConfig {
                group_by_rules: true,
                ..GroupConfig::default()
            }
        );
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].key.as_str(), "r1");
        assert_eq!(config.rules[1].field, LogField::Issue);
    }

    #[test]
    fn test_group_table_sets_every_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(
            &path,
            "[group]\ngroupByTask = true\ngroupByComment = true\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!(config.group.group_by_task);
        assert!(config.group.group_by_comment);
        assert!(!config.group.group_by_rules);
    }

    #[test]
    fn test_env_toggle_overrides_file() {
        let partial = EnvToggles {
            by_task: Some(false),
            by_rules: Some(true),
            ..EnvToggles::default()
        };
        let group = partial.apply(GroupConfig {
            group_by_task: true,
            group_by_comment: true,
            group_by_rules: false,
        });
        assert_eq!(
            group,
            GroupConfig {
                group_by_task: false,
                group_by_comment: true,
                group_by_rules: true,
            }
        );
    }

    #[test]
    fn test_invalid_rule_field_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.toml");
        std::fs::write(
            &path,
            r#"
[[rules]]
field = "author"
values = ["me"]
key = "mine"
"#,
        )
        .unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid rule field"), "{err}");
    }
}
