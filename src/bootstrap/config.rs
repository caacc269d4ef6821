//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - Read the TOML configuration file / 读取 TOML 配置文件
//! - Map it onto `AppConfig` / 映射为 `AppConfig`
//! - Report I/O and parsing errors with context / 报告带上下文的错误
//!
//! Pure data loading. Defaults come from `AppConfig` itself and directories are
//! resolved later during wiring.
//! 仅做纯数据加载。默认值由 `AppConfig` 提供，目录在装配阶段解析。

use std::path::PathBuf;

use anyhow::Context;
use sc_core::config::AppConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// - File cannot be read / 无法读取文件
/// - Content is not valid TOML or does not match the model / 内容不是合法 TOML 或结构不匹配
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let file = write_config(
            r#"
            [storage]
            store_dir = "/var/tmp/clips"
            dir_name = "Clips"

            [log]
            filter = "debug,sc_infra=trace"
            file_logging = true
            "#,
        );

        let config = load_config(file.path().to_path_buf()).unwrap();

        assert_eq!(config.storage.store_dir, Some(PathBuf::from("/var/tmp/clips")));
        assert_eq!(config.storage.dir_name, "Clips");
        assert_eq!(config.log.filter.as_deref(), Some("debug,sc_infra=trace"));
        assert!(config.log.file_logging);
        assert_eq!(config.log.log_dir, None);
    }

    /// 测试缺失的部分使用默认值
    #[test]
    fn test_load_config_fills_missing_sections() {
        let file = write_config("");
        let config = load_config(file.path().to_path_buf()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let file = write_config("[storage\nstore_dir = ");
        let err = load_config(file.path().to_path_buf()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_config_reports_missing_file() {
        let err = load_config(PathBuf::from("/nonexistent/superclip.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
