#![no_main]

use libfuzzer_sys::fuzz_target;
use lightmeter::protocol::{LineBuffer, decode_line};

fuzz_target!(|data: &[u8]| {
    // Raw serial bytes through framing and decoding must never panic
    let mut buffer = LineBuffer::new();
    for line in buffer.extend(data) {
        let update = decode_line(&line);
        if let Some(summary) = update.summary {
            assert!(summary.ev.is_finite());
            assert!(!summary.shutter_speed.is_empty());
        }
    }
});
