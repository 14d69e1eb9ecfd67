//! 설정 로드.
//!
//! 기본값 ← 설정 파일 ← 환경변수 순서로 `config` crate 소스를 쌓아 [`AppConfig`]를 만든다.
//! 파일 형식(JSON/TOML/YAML)은 확장자로 판별한다.

use crate::config::AppConfig;
use crate::error::CoreError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 설정 파일 이름 (기본 경로 탐색용)
const CONFIG_FILE_NAME: &str = "config.toml";

/// 환경변수 접두사 (`RUNIFY_POLL__INTERVAL_MS` 형태)
const ENV_PREFIX: &str = "RUNIFY";

/// 설정 관리자
///
/// 로드된 설정과 실제로 읽은 파일 경로를 보관한다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 설정 로드
    ///
    /// `path`가 주어지면 해당 파일이 반드시 존재해야 한다.
    /// 주어지지 않으면 플랫폼별 기본 경로를 시도하고, 없으면 기본값만 사용한다.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let (file, required) = match path {
            Some(p) => (Some(p.to_path_buf()), true),
            None => (Self::default_config_path(), false),
        };

        let mut builder = config::Config::builder();
        if let Some(ref file) = file {
            debug!("설정 파일 소스 추가: {} (필수={required})", file.display());
            builder = builder.add_source(config::File::from(file.as_path()).required(required));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        let config_path = file.filter(|p| p.exists());
        match config_path {
            Some(ref p) => info!("설정 로드 완료: {}", p.display()),
            None => info!("설정 파일 없음, 기본값 + 환경변수 사용"),
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// 현재 설정 반환 (복제본)
    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// 설정 변경 후 재검증
    ///
    /// CLI 인자 오버라이드에 사용한다.
    pub fn update_with<F>(&mut self, updater: F) -> Result<&AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut next = self.config.clone();
        updater(&mut next);
        next.validate()?;
        self.config = next;
        Ok(&self.config)
    }

    /// 실제로 읽은 설정 파일 경로
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 플랫폼별 기본 설정 파일 경로
    ///
    /// - macOS: `~/Library/Application Support/dev.runify.dashboard/config.toml`
    /// - Windows: `%APPDATA%\runify\dashboard\config\config.toml`
    /// - Linux: `~/.config/dashboard/config.toml`
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "runify", "dashboard")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
