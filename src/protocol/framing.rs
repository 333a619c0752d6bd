//! Line framing for the serial link
//!
//! Outbound lines are terminated with CRLF. Inbound bytes are assembled into
//! lines the way the device console does it: CR or LF ends a line, backspace and
//! delete erase the previous byte, and input beyond the buffer size is dropped.

/// Terminator appended to every outbound line
pub const LINE_TERMINATOR: &str = "\r\n";
/// Size of the device's command buffer, including the terminating NUL
pub const LINE_BUFFER_SIZE: usize = 256;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Append the line terminator
pub fn frame_line(line: &str) -> String {
    let mut framed = String::with_capacity(line.len() + LINE_TERMINATOR.len());
    framed.push_str(line);
    framed.push_str(LINE_TERMINATOR);
    framed
}

/// Incremental line assembler for a raw byte stream
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, returning a line when it completes one
    ///
    /// Blank and whitespace-only lines are swallowed, so a CRLF pair yields a
    /// single line.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\r' | b'\n' => {
                let raw = std::mem::take(&mut self.pending);
                let line = String::from_utf8_lossy(&raw).trim().to_string();
                (!line.is_empty()).then_some(line)
            }
            BACKSPACE | DELETE => {
                self.pending.pop();
                None
            }
            _ => {
                if self.pending.len() < LINE_BUFFER_SIZE - 1 {
                    self.pending.push(byte);
                }
                None
            }
        }
    }

    /// Feed a chunk of bytes, returning every line it completes
    pub fn extend(&mut self, bytes: &[u8]) -> Vec<String> {
        bytes.iter().filter_map(|&byte| self.push(byte)).collect()
    }

    /// Bytes received since the last line break
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }
}
