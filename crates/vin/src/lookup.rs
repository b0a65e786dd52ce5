//! 원격 차량 정보 조회
//!
//! [`VehicleLookup`] trait은 외부 차량 정보 서비스를 추상화합니다.
//! 운영 환경에서는 [`VpicClient`](NHTSA vPIC 형식)를, 테스트에서는 mock을 사용합니다.
//!
//! [`VinResolver`]는 원격 조회를 먼저 시도하고, 어떤 이유로든 실패하면
//! (네트워크, 상태 코드, 잘못된 응답, 필수 필드 누락) 로컬 디코더로 대체합니다.
//! 재시도는 하지 않습니다.
//!
//! # 응답 형식
//!
//! ```text
//! GET {endpoint}/{VIN}?format=json
//! {"Results": [{"Variable": "Make", "Value": "NISSAN"}, ...]}
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use junkyard_core::config::LookupConfig;
use junkyard_core::types::{BodyType, DecodedVehicleAttributes};
use junkyard_core::vin::Vin;

use crate::decoder::VinDecoder;
use crate::error::LookupError;
use crate::region::Region;
use crate::tables::{self, UNKNOWN};

/// 외부 차량 정보 조회 trait
pub trait VehicleLookup: Send + Sync {
    /// 조회 서비스 이름 (로그용)
    fn name(&self) -> &str;

    /// VIN으로 차량 속성을 조회합니다.
    fn lookup(
        &self,
        vin: &Vin,
    ) -> impl Future<Output = Result<DecodedVehicleAttributes, LookupError>> + Send;
}

/// vPIC 응답 본문
#[derive(Debug, Deserialize)]
pub struct VpicResponse {
    #[serde(rename = "Results")]
    pub results: Vec<VpicVariable>,
}

/// vPIC 응답의 변수 하나
#[derive(Debug, Clone, Deserialize)]
pub struct VpicVariable {
    #[serde(rename = "Variable", default)]
    pub variable: Option<String>,
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
}

impl VpicVariable {
    pub fn new(variable: &str, value: &str) -> Self {
        Self {
            variable: Some(variable.to_owned()),
            value: Some(value.to_owned()),
        }
    }
}

/// 변수 이름으로 비어 있지 않은 값을 찾습니다.
fn find_value<'a>(results: &'a [VpicVariable], variable: &str) -> Option<&'a str> {
    results
        .iter()
        .find(|item| item.variable.as_deref() == Some(variable))
        .and_then(|item| item.value.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// vPIC 변수 목록을 차량 속성으로 변환합니다.
///
/// `Make`가 없으면 실패입니다. 연식이 없거나 숫자가 아니면 VIN의 연식 코드를 사용하고,
/// `Engine Model`이 없으면 `"<기통 수> Cylinder"`로 대체합니다.
pub fn attributes_from_results(
    vin: &Vin,
    results: &[VpicVariable],
) -> Result<DecodedVehicleAttributes, LookupError> {
    if results.is_empty() {
        return Err(LookupError::Malformed("empty Results".to_owned()));
    }

    let make = find_value(results, "Make")
        .ok_or_else(|| LookupError::MissingField("Make".to_owned()))?
        .to_uppercase();

    let year = find_value(results, "Model Year")
        .and_then(|y| y.parse::<i32>().ok())
        .unwrap_or_else(|| tables::model_year_or_default(vin.model_year_code()));

    let engine = match find_value(results, "Engine Model") {
        Some(engine) => engine.to_owned(),
        None => find_value(results, "Engine Number of Cylinders")
            .map(|cylinders| format!("{cylinders} Cylinder"))
            .unwrap_or_else(|| UNKNOWN.to_owned()),
    };

    Ok(DecodedVehicleAttributes {
        make,
        model: find_value(results, "Model").unwrap_or(UNKNOWN).to_owned(),
        year,
        color: find_value(results, "Color").map(str::to_owned),
        engine,
        trim: find_value(results, "Trim").unwrap_or(UNKNOWN).to_owned(),
        body_type: find_value(results, "Vehicle Type")
            .map(BodyType::from_str_loose)
            .unwrap_or_default(),
    })
}

/// NHTSA vPIC 형식 조회 클라이언트 (`reqwest`)
pub struct VpicClient {
    client: reqwest::Client,
    endpoint: String,
}

impl VpicClient {
    /// 엔드포인트와 요청 타임아웃으로 클라이언트를 생성합니다.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Client(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// `[lookup]` 설정으로 클라이언트를 생성합니다.
    pub fn from_config(config: &LookupConfig) -> Result<Self, LookupError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// 요청 URL
    pub fn request_url(&self, vin: &Vin) -> String {
        format!("{}/{}?format=json", self.endpoint.trim_end_matches('/'), vin)
    }
}

impl VehicleLookup for VpicClient {
    fn name(&self) -> &str {
        "vpic"
    }

    async fn lookup(&self, vin: &Vin) -> Result<DecodedVehicleAttributes, LookupError> {
        let url = self.request_url(vin);
        debug!(url = url.as_str(), "requesting vehicle data");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body: VpicResponse = response
            .json()
            .await
            .map_err(|e| LookupError::Malformed(e.to_string()))?;

        attributes_from_results(vin, &body.results)
    }
}

/// 조회 결과 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupSource {
    /// 원격 서비스
    Remote,
    /// 로컬 디코더
    Local,
}

impl fmt::Display for LookupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// 조회/디코딩 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVehicle {
    pub source: LookupSource,
    /// 로컬 디코더가 사용한 지역 (원격 조회 시 `None`)
    pub region: Option<Region>,
    pub attributes: DecodedVehicleAttributes,
}

/// 원격 조회 후 로컬 디코더로 대체하는 해석기
pub struct VinResolver<L> {
    remote: Option<L>,
    decoder: VinDecoder,
}

impl VinResolver<VpicClient> {
    /// 설정에 따라 해석기를 구성합니다.
    ///
    /// 조회가 비활성화되었거나 클라이언트 생성에 실패하면 로컬 디코더만 사용합니다.
    pub fn from_config(config: &LookupConfig) -> Self {
        if !config.enabled {
            return Self::local_only(VinDecoder::new());
        }
        match VpicClient::from_config(config) {
            Ok(client) => Self::new(Some(client), VinDecoder::new()),
            Err(e) => {
                warn!(error = %e, "lookup client unavailable, using local decoder only");
                Self::local_only(VinDecoder::new())
            }
        }
    }
}

impl<L: VehicleLookup> VinResolver<L> {
    pub fn new(remote: Option<L>, decoder: VinDecoder) -> Self {
        Self { remote, decoder }
    }

    /// 로컬 디코더만 사용하는 해석기
    pub fn local_only(decoder: VinDecoder) -> Self {
        Self::new(None, decoder)
    }

    /// 원격 조회 사용 여부
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// 로컬 디코더
    pub fn decoder(&self) -> &VinDecoder {
        &self.decoder
    }

    /// VIN을 해석합니다. 원격 조회 실패는 로그만 남기고 로컬 결과를 반환합니다.
    pub async fn resolve(&self, vin: &Vin) -> ResolvedVehicle {
        if let Some(remote) = &self.remote {
            match remote.lookup(vin).await {
                Ok(attributes) => {
                    info!(
                        vin = %vin,
                        service = remote.name(),
                        make = attributes.make.as_str(),
                        "vehicle data loaded from remote lookup"
                    );
                    return ResolvedVehicle {
                        source: LookupSource::Remote,
                        region: None,
                        attributes,
                    };
                }
                Err(e) => {
                    warn!(
                        vin = %vin,
                        service = remote.name(),
                        error = %e,
                        "remote lookup failed, falling back to local decoder"
                    );
                }
            }
        }

        let decoded = self.decoder.decode_vin(vin);
        ResolvedVehicle {
            source: LookupSource::Local,
            region: Some(decoded.region),
            attributes: decoded.attributes,
        }
    }
}
