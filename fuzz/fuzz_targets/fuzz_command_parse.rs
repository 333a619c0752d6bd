#![no_main]

use libfuzzer_sys::fuzz_target;
use lightmeter::protocol::Command;

fuzz_target!(|data: &[u8]| {
    // Any accepted command must encode to a line that parses back to itself
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(command) = Command::parse(s) {
            assert_eq!(Command::parse(&command.encode()).ok(), Some(command));
        }
    }
});
