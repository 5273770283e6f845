//! 기동 인자와 전역 설정
//!
//! 서버 인자는 `-flag value` 토큰 쌍을 인자 목록에서 찾는 방식이다.
//! 파서는 프로세스를 종료하지 않고 `Result`를 돌려주므로 종료 여부는
//! 호출한 바이너리가 결정한다.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_VENV_DIR: &str = "venv";

const CONFIG_PATH: &str = "config/launchpad.toml";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    #[error("please specify '{flag} <value>'")]
    Missing { flag: &'static str },
}

/// HTTPS 서버 기동 인자 — 셋 다 필수, 순서 무관
#[derive(Debug, Clone)]
pub struct ServerArgs {
    pub ip: String,
    pub key_path: PathBuf,
    pub cert_path: PathBuf,
}

impl ServerArgs {
    pub fn from_env() -> Result<Self, ArgsError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::parse(&args)
    }

    pub fn parse(args: &[String]) -> Result<Self, ArgsError> {
        Ok(Self {
            ip: flag_value(args, "-ip")?,
            key_path: PathBuf::from(flag_value(args, "-server_key_path")?),
            cert_path: PathBuf::from(flag_value(args, "-server_cer_path")?),
        })
    }
}

/// 플래그 토큰 바로 다음 토큰을 값으로 돌려준다. 플래그가 없거나 값
/// 토큰이 없으면 `ArgsError::Missing`.
pub fn flag_value(args: &[String], flag: &'static str) -> Result<String, ArgsError> {
    optional_flag_value(args, flag).ok_or(ArgsError::Missing { flag })
}

pub fn optional_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    let value = args.get(idx + 1)?;
    tracing::debug!("input arg {} has value {}", flag, value);
    Some(value.clone())
}

/// 전역 설정 — 없으면 전부 기본값. 디렉토리 위치만 재배치할 수 있고
/// 포트(443)와 플래그 이름은 고정이다.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GlobalConfig {
    pub public_dir: Option<String>,
    pub venv_dir: Option<String>,
}

impl GlobalConfig {
    pub fn load() -> Self {
        let s = std::fs::read_to_string(CONFIG_PATH).unwrap_or_default();
        toml::from_str(&s).unwrap_or_default()
    }

    pub fn resolve_public_dir(&self) -> PathBuf {
        PathBuf::from(self.public_dir.as_deref().unwrap_or(DEFAULT_PUBLIC_DIR))
    }

    pub fn resolve_venv_dir(&self) -> PathBuf {
        PathBuf::from(self.venv_dir.as_deref().unwrap_or(DEFAULT_VENV_DIR))
    }
}
