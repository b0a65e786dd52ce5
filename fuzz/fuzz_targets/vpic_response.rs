#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use junkyard_core::vin::Vin;
use junkyard_vin::lookup::{attributes_from_results, VpicResponse, VpicVariable};

const VIN_CHARS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 17자 VIN 후보
    vin: [u8; 17],
    /// 원시 JSON 본문
    body: Vec<u8>,
    /// 구조적 변수 목록 (최대 32개로 제한)
    variables: Vec<(String, String)>,
}

fuzz_target!(|input: FuzzInput| {
    let raw: String = input
        .vin
        .iter()
        .map(|b| char::from(VIN_CHARS[usize::from(*b) % VIN_CHARS.len()]))
        .collect();
    let Ok(vin) = Vin::parse(&raw) else {
        return;
    };

    // 임의 본문: 파싱 실패는 괜찮지만 크래시는 안 됨
    if let Ok(response) = serde_json::from_slice::<VpicResponse>(&input.body) {
        let _ = attributes_from_results(&vin, &response.results);
    }

    let results: Vec<VpicVariable> = input
        .variables
        .iter()
        .take(32)
        .map(|(variable, value)| VpicVariable::new(variable, value))
        .collect();

    if let Ok(attrs) = attributes_from_results(&vin, &results) {
        // Make는 항상 대문자로 정규화된다
        assert_eq!(attrs.make, attrs.make.to_uppercase());
        assert!(!attrs.make.is_empty());
    }
});
