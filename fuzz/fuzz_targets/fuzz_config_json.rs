#![no_main]

use libfuzzer_sys::fuzz_target;
use lightmeter::config::AppConfig;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON must either fail to parse or yield settings we can validate
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<AppConfig>(s) {
            let _ = config.device.validate();
        }
    }
});
