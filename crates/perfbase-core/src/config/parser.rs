//! TOML parser with helpful error messages

use super::schema::PerfbaseConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse perfbase.toml with detailed error messages
pub fn parse_perfbase_toml(path: &Path) -> Result<PerfbaseConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_perfbase_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse perfbase.toml content from string
pub fn parse_perfbase_toml_str(content: &str) -> Result<PerfbaseConfig> {
    let config: PerfbaseConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate()?;

    Ok(config)
}

/// Attach the offending lines to a TOML error when it carries a location
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();

    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())]
                .matches('\n')
                .count()
                + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                get_line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    lines[start.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &PerfbaseConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_perfbase_toml_str("").unwrap();
        assert_eq!(config.fork_point.remote, "origin");
        assert_eq!(config.fork_point.master_branch, "master");
        assert_eq!(config.fork_point.release_branch, "release");
        assert_eq!(config.fork_point.version_file, "version.txt");
        assert_eq!(config.distribution.build_tool, "./gradlew");
        assert!(config.build_cache.is_empty());
        assert!(config.performance_tests.is_empty());
    }

    #[test]
    fn parses_performance_tests_in_order() {
        let config = parse_perfbase_toml_str(
            r#"
[[performance_test]]
name = "performanceTest"
baselines = "last"

[[performance_test]]
name = "distributedPerformanceTest"
baselines = "5.0-commit-abc123"

[[performance_test]]
name = "adhocPerformanceTest"
"#,
        )
        .unwrap();

        assert_eq!(
            config.configured_baselines(),
            vec!["last".to_string(), "5.0-commit-abc123".to_string()]
        );
    }

    #[test]
    fn partial_fork_point_table_keeps_other_defaults() {
        let config = parse_perfbase_toml_str("[fork_point]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.fork_point.remote, "upstream");
        assert_eq!(config.fork_point.master_branch, "master");
    }

    #[test]
    fn rejects_empty_branch_name() {
        let err = parse_perfbase_toml_str("[fork_point]\nrelease_branch = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("fork_point.release_branch"));
    }

    #[test]
    fn rejects_invalid_cache_url() {
        let err =
            parse_perfbase_toml_str("[build_cache.remote]\nurl = \"not a url\"\n").unwrap_err();
        assert!(err.to_string().contains("build_cache.remote.url"));
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse_perfbase_toml_str("[fork_point]\nremote = \n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = PerfbaseConfig::new();
        config.build_cache.enabled = Some(true);
        config
            .performance_tests
            .push(crate::config::PerformanceTestEntry {
                name: "performanceTest".to_string(),
                baselines: Some("5.1-commit-def456a".to_string()),
            });

        let text = to_toml(&config).unwrap();
        assert_eq!(parse_perfbase_toml_str(&text).unwrap(), config);
    }
}
