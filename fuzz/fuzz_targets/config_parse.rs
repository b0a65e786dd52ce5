#![no_main]

use libfuzzer_sys::fuzz_target;
use junkyard_core::config::JunkyardConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = JunkyardConfig::parse(content) {
            let _ = config.validate();
        }
    }
});
