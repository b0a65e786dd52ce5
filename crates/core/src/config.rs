//! 설정 관리: junkyard.toml 파싱 및 런타임 설정
//!
//! [`JunkyardConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`JUNKYARD_LOOKUP_ENABLED=false` 형식)
//! 3. 설정 파일 (`junkyard.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), junkyard_core::error::JunkyardError> {
//! use junkyard_core::config::JunkyardConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = JunkyardConfig::load("junkyard.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = JunkyardConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, JunkyardError};
use crate::types::DEFAULT_LOCATION;

/// 재고 문서 기본 키
pub const DEFAULT_INVENTORY_KEY: &str = "junkyardInventory";
/// 부품 카탈로그 문서 기본 키
pub const DEFAULT_CATALOG_KEY: &str = "junkyardPartsCatalog";
/// 첨부 파일 기본 최대 크기 (5 MiB)
pub const DEFAULT_MAX_ATTACHMENT_SIZE: u64 = 5 * 1024 * 1024;

/// Junkyard 통합 설정
///
/// `junkyard.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JunkyardConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 재고 설정
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// 원격 VIN 조회 설정
    #[serde(default)]
    pub lookup: LookupConfig,
    /// 스캐너 설정
    #[serde(default)]
    pub scanner: ScannerConfig,
    /// 첨부 파일 설정
    #[serde(default)]
    pub attachments: AttachmentConfig,
}

impl JunkyardConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, JunkyardError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, JunkyardError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                JunkyardError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                JunkyardError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, JunkyardError> {
        toml::from_str(toml_str).map_err(|e| {
            JunkyardError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `JUNKYARD_{SECTION}_{FIELD}`
    /// 예: `JUNKYARD_STORAGE_DATA_DIR=/srv/junkyard`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "JUNKYARD_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "JUNKYARD_GENERAL_LOG_FORMAT");

        // Storage
        override_string(&mut self.storage.data_dir, "JUNKYARD_STORAGE_DATA_DIR");
        override_string(
            &mut self.storage.inventory_key,
            "JUNKYARD_STORAGE_INVENTORY_KEY",
        );
        override_string(&mut self.storage.catalog_key, "JUNKYARD_STORAGE_CATALOG_KEY");

        // Inventory
        override_parsed(
            &mut self.inventory.allow_duplicate_vins,
            "JUNKYARD_INVENTORY_ALLOW_DUPLICATE_VINS",
        );
        override_string(
            &mut self.inventory.default_location,
            "JUNKYARD_INVENTORY_DEFAULT_LOCATION",
        );

        // Lookup
        override_parsed(&mut self.lookup.enabled, "JUNKYARD_LOOKUP_ENABLED");
        override_string(&mut self.lookup.endpoint, "JUNKYARD_LOOKUP_ENDPOINT");
        override_parsed(&mut self.lookup.timeout_secs, "JUNKYARD_LOOKUP_TIMEOUT_SECS");

        // Scanner
        override_parsed(&mut self.scanner.frame_rate, "JUNKYARD_SCANNER_FRAME_RATE");
        override_parsed(
            &mut self.scanner.fallback_delay_ms,
            "JUNKYARD_SCANNER_FALLBACK_DELAY_MS",
        );
        override_parsed(
            &mut self.scanner.capture_delay_ms,
            "JUNKYARD_SCANNER_CAPTURE_DELAY_MS",
        );
        override_csv(&mut self.scanner.demo_vins, "JUNKYARD_SCANNER_DEMO_VINS");

        // Attachments
        override_parsed(
            &mut self.attachments.max_size_bytes,
            "JUNKYARD_ATTACHMENTS_MAX_SIZE_BYTES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), JunkyardError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.storage.data_dir.trim().is_empty() {
            return Err(invalid("storage.data_dir", "must not be empty"));
        }
        for (field, key) in [
            ("storage.inventory_key", &self.storage.inventory_key),
            ("storage.catalog_key", &self.storage.catalog_key),
        ] {
            if !is_valid_storage_key(key) {
                return Err(invalid(
                    field,
                    "must be non-empty and contain only letters, digits, '-' or '_'",
                ));
            }
        }
        if self.storage.inventory_key == self.storage.catalog_key {
            return Err(invalid(
                "storage.catalog_key",
                "must differ from storage.inventory_key",
            ));
        }

        if self.lookup.enabled {
            let endpoint = self.lookup.endpoint.as_str();
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(invalid(
                    "lookup.endpoint",
                    "must be an http(s) URL when lookup is enabled",
                ));
            }
            if self.lookup.timeout_secs == 0 {
                return Err(invalid("lookup.timeout_secs", "must be greater than 0"));
            }
        }

        if !(1..=240).contains(&self.scanner.frame_rate) {
            return Err(invalid("scanner.frame_rate", "must be between 1 and 240"));
        }
        if self
            .scanner
            .demo_vins
            .iter()
            .any(|v| !crate::vin::Vin::is_valid(v))
        {
            return Err(invalid(
                "scanner.demo_vins",
                "every entry must be a valid 17-character VIN",
            ));
        }

        if self.attachments.max_size_bytes == 0 {
            return Err(invalid(
                "attachments.max_size_bytes",
                "must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> JunkyardError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 저장 키는 파일명으로 쓰이므로 경로 구분자를 허용하지 않습니다.
fn is_valid_storage_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 저장소 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 데이터 디렉토리 (`<data_dir>/<key>.json`)
    pub data_dir: String,
    /// 재고 문서 키
    pub inventory_key: String,
    /// 부품 카탈로그 문서 키
    pub catalog_key: String,
}

impl StorageConfig {
    /// 데이터 디렉토리 경로
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./junkyard-data".to_owned(),
            inventory_key: DEFAULT_INVENTORY_KEY.to_owned(),
            catalog_key: DEFAULT_CATALOG_KEY.to_owned(),
        }
    }
}

/// 재고 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// 같은 VIN의 중복 등록 허용 여부
    pub allow_duplicate_vins: bool,
    /// 위치 미입력 시 기본값
    pub default_location: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_vins: false,
            default_location: DEFAULT_LOCATION.to_owned(),
        }
    }
}

/// 원격 VIN 조회 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// 원격 조회 사용 여부 (false면 로컬 디코더만 사용)
    pub enabled: bool,
    /// 조회 엔드포인트 (`{endpoint}/{VIN}?format=json`)
    pub endpoint: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVin".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// 스캐너 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// 프레임 샘플링 주기 (Hz)
    pub frame_rate: u32,
    /// 감지 기능이 없을 때 데모 결과를 내기까지의 지연 (밀리초)
    pub fallback_delay_ms: u64,
    /// 유효한 VIN 감지 후 캡처까지의 지연 (밀리초)
    pub capture_delay_ms: u64,
    /// 데모 VIN 풀 (비어 있으면 내장 풀 사용)
    pub demo_vins: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            fallback_delay_ms: 3000,
            capture_delay_ms: 1000,
            demo_vins: Vec::new(),
        }
    }
}

/// 첨부 파일 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// 파일 하나의 최대 크기 (바이트)
    pub max_size_bytes: u64,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_ATTACHMENT_SIZE,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

/// 파싱에 실패하면 경고만 남기고 기존 값을 유지합니다.
fn override_parsed<T: FromStr>(target: &mut T, env_key: &str) {
    let Ok(val) = std::env::var(env_key) else {
        return;
    };
    match val.trim().parse::<T>() {
        Ok(parsed) => *target = parsed,
        Err(_) => warn!(
            env_key,
            value = val.as_str(),
            expected = std::any::type_name::<T>(),
            "ignoring unparsable env override"
        ),
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
