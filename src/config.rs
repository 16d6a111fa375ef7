use crate::error::{OrderAiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 解析APIのベースURLを指定する環境変数
pub const API_URL_ENV: &str = "ORDER_AI_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// 解析APIのベースURL（`/api/analyze-simple` は含まない）
    #[serde(default)]
    pub api_url: Option<String>,

    /// 共有コマンド（プログラム + 引数）
    #[serde(default)]
    pub share_command: Option<Vec<String>>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OrderAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("order-ai").join("config.json"))
    }

    /// 解析APIのベースURL
    pub fn api_url(&self) -> Result<String> {
        // 環境変数を優先
        let from_env = std::env::var(API_URL_ENV).ok();
        Self::resolve_api_url(from_env, self.api_url.as_deref())
    }

    fn resolve_api_url(from_env: Option<String>, from_file: Option<&str>) -> Result<String> {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                from_file
                    .filter(|url| !url.trim().is_empty())
                    .map(str::to_string)
            })
            .map(|url| url.trim().to_string())
            .ok_or(OrderAiError::MissingApiUrl)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        self.api_url = Some(url);
        self.save()
    }

    /// 共有コマンドを設定（プログラム + 引数、空なら解除）
    pub fn set_share_command(&mut self, argv: Vec<String>) -> Result<()> {
        self.share_command = Self::share_command_from_argv(argv);
        self.save()
    }

    /// 各要素はそのまま保持する（空白を含むパスも分割しない）
    fn share_command_from_argv(argv: Vec<String>) -> Option<Vec<String>> {
        match argv.first() {
            Some(program) if !program.trim().is_empty() => Some(argv),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_url_takes_priority() {
        let url = Config::resolve_api_url(
            Some("https://env.example.com".into()),
            Some("https://file.example.com"),
        )
        .unwrap();
        assert_eq!(url, "https://env.example.com");
    }

    #[test]
    fn test_file_url_used_when_env_blank() {
        let url = Config::resolve_api_url(Some("  ".into()), Some(" https://file.example.com ")).unwrap();
        assert_eq!(url, "https://file.example.com");
    }

    #[test]
    fn test_missing_url() {
        let err = Config::resolve_api_url(None, None).unwrap_err();
        assert!(matches!(err, OrderAiError::MissingApiUrl));
    }

    #[test]
    fn test_share_command_keeps_spaces() {
        let argv = vec![
            "/opt/My Share/bin/share".to_string(),
            "--title".to_string(),
            "訂單 資訊".to_string(),
        ];
        assert_eq!(Config::share_command_from_argv(argv.clone()), Some(argv));
    }

    #[test]
    fn test_share_command_cleared() {
        assert_eq!(Config::share_command_from_argv(Vec::new()), None);
        assert_eq!(Config::share_command_from_argv(vec![" ".to_string()]), None);
    }

    #[test]
    fn test_config_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"api_url": "http://localhost:8000"}"#).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:8000"));
        assert!(config.share_command.is_none());
    }
}
