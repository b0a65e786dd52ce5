#![no_main]

use libfuzzer_sys::fuzz_target;
use junkyard_vin::VinDecoder;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        let decoder = VinDecoder::new();
        // 형식이 맞으면 항상 속성이 채워져야 한다
        if let Some(decoded) = decoder.decode(raw) {
            assert!(!decoded.attributes.make.is_empty());
            assert!(!decoded.attributes.model.is_empty());
        }
    }
});
