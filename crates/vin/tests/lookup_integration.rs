//! 원격 조회 통합 테스트
//!
//! 로컬 TCP 서버로 vPIC 응답을 흉내 내어 `VpicClient`와 `VinResolver`의
//! 성공/실패/대체 경로를 검증합니다.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use junkyard_core::types::BodyType;
use junkyard_core::vin::Vin;
use junkyard_vin::{
    LookupError, LookupSource, Region, VehicleLookup, VinDecoder, VinResolver, VpicClient,
};

/// 요청 하나에 고정 응답을 돌려주는 HTTP 서버를 띄우고 엔드포인트를 반환합니다.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{addr}/api/vehicles/DecodeVin")
}

/// 연결을 받지 않는 주소 (바인드 후 즉시 해제)
async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/vehicles/DecodeVin")
}

fn altima() -> Vin {
    Vin::parse("1N4AL3AP8JC231503").unwrap()
}

const ALTIMA_BODY: &str = r#"{"Count":6,"Message":"Results returned successfully","Results":[
{"Value":"NISSAN","ValueId":"478","Variable":"Make","VariableId":26},
{"Value":"Altima","ValueId":"1904","Variable":"Model","VariableId":28},
{"Value":"2018","ValueId":"","Variable":"Model Year","VariableId":29},
{"Value":"QR25","ValueId":"","Variable":"Engine Model","VariableId":18},
{"Value":"SR","ValueId":"","Variable":"Trim","VariableId":38},
{"Value":"PASSENGER CAR","ValueId":"2","Variable":"Vehicle Type","VariableId":39}]}"#;

#[tokio::test]
async fn vpic_client_parses_successful_response() {
    let endpoint = serve_once("200 OK", ALTIMA_BODY).await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();

    let attrs = client.lookup(&altima()).await.unwrap();
    assert_eq!(attrs.make, "NISSAN");
    assert_eq!(attrs.model, "Altima");
    assert_eq!(attrs.year, 2018);
    assert_eq!(attrs.engine, "QR25");
    assert_eq!(attrs.trim, "SR");
    assert_eq!(attrs.body_type, BodyType::Car);
}

#[tokio::test]
async fn vpic_client_reports_http_status() {
    let endpoint = serve_once("503 Service Unavailable", "{}").await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();

    let err = client.lookup(&altima()).await.unwrap_err();
    assert!(matches!(err, LookupError::Status(503)));
}

#[tokio::test]
async fn vpic_client_reports_malformed_body() {
    let endpoint = serve_once("200 OK", "not json").await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();

    let err = client.lookup(&altima()).await.unwrap_err();
    assert!(matches!(err, LookupError::Malformed(_)));
}

#[tokio::test]
async fn vpic_client_reports_transport_failure() {
    let endpoint = closed_endpoint().await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();

    let err = client.lookup(&altima()).await.unwrap_err();
    assert!(matches!(err, LookupError::Transport(_)));
}

#[tokio::test]
async fn resolver_uses_remote_when_available() {
    let endpoint = serve_once("200 OK", ALTIMA_BODY).await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();
    let resolver = VinResolver::new(Some(client), VinDecoder::new());

    let resolved = resolver.resolve(&altima()).await;
    assert_eq!(resolved.source, LookupSource::Remote);
    assert_eq!(resolved.attributes.trim, "SR");
}

#[tokio::test]
async fn resolver_falls_back_when_remote_missing_make() {
    let endpoint = serve_once(
        "200 OK",
        r#"{"Results":[{"Variable":"Make","Value":""},{"Variable":"Model","Value":"X"}]}"#,
    )
    .await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();
    let resolver = VinResolver::new(Some(client), VinDecoder::new());

    let resolved = resolver.resolve(&altima()).await;
    assert_eq!(resolved.source, LookupSource::Local);
    assert_eq!(resolved.region, Some(Region::Nissan));
    assert_eq!(resolved.attributes.make, "NISSAN");
    assert_eq!(resolved.attributes.model, "ALTIMA");
    assert_eq!(resolved.attributes.year, 2018);
}

#[tokio::test]
async fn resolver_falls_back_on_transport_failure() {
    let endpoint = closed_endpoint().await;
    let client = VpicClient::new(endpoint, Duration::from_secs(5)).unwrap();
    let resolver = VinResolver::new(Some(client), VinDecoder::new());

    let resolved = resolver.resolve(&Vin::parse("1HGCM82633A004352").unwrap()).await;
    assert_eq!(resolved.source, LookupSource::Local);
    assert_eq!(resolved.attributes.model, "ACCORD");
}
