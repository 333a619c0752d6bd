//! Line pump from a byte stream into the controller's event queue

use crate::controller::DeviceEvent;
use crate::error::Result;
use crate::protocol::LineBuffer;
use std::io::{ErrorKind, Read};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Size of a single read from the underlying stream
const READ_CHUNK_SIZE: usize = 256;

/// Reads lines from a byte stream and forwards them as `LineReceived` events
///
/// Lines are framed by [`LineBuffer`], so CR, LF and CRLF endings, backspace and
/// delete are handled the way the device console handles them. A final line
/// without terminator is forwarded at end of stream.
pub struct LineReader<R> {
    reader: R,
    buffer: LineBuffer,
    event_sender: mpsc::SyncSender<DeviceEvent>,
}

impl<R: Read> LineReader<R> {
    /// Create a reader forwarding to `event_sender`
    pub fn new(reader: R, event_sender: mpsc::SyncSender<DeviceEvent>) -> Self {
        Self {
            reader,
            buffer: LineBuffer::new(),
            event_sender,
        }
    }

    /// Forward lines until end of stream or until the event queue closes
    ///
    /// Returns the number of lines forwarded.
    pub fn pump(&mut self) -> Result<usize> {
        use tracing::debug;

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let mut forwarded = 0;

        loop {
            let read = match self.reader.read(&mut chunk) {
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            let lines = if read == 0 {
                // Flush an unterminated last line
                self.buffer.push(b'\n').into_iter().collect()
            } else {
                self.buffer.extend(&chunk[..read])
            };

            for line in lines {
                if self.event_sender.send(DeviceEvent::LineReceived(line)).is_err() {
                    debug!("Event queue closed, line reader stopping");
                    return Ok(forwarded);
                }
                forwarded += 1;
            }

            if read == 0 {
                debug!("End of input after {} lines", forwarded);
                return Ok(forwarded);
            }
        }
    }
}

impl<R: Read + Send + 'static> LineReader<R> {
    /// Start the reader thread
    pub fn start(mut self) -> JoinHandle<()> {
        thread::spawn(move || {
            if let Err(e) = self.pump() {
                tracing::error!("Error reading input lines: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(rx: &mpsc::Receiver<DeviceEvent>) -> Vec<String> {
        rx.try_iter()
            .filter_map(|event| match event {
                DeviceEvent::LineReceived(line) => Some(line),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_forwards_each_line() {
        let (tx, rx) = mpsc::sync_channel(16);
        let mut reader = LineReader::new(Cursor::new("config iso 400\r\n\r\nstart measure\n"), tx);

        assert_eq!(reader.pump().unwrap(), 2);
        assert_eq!(collect(&rx), vec!["config iso 400", "start measure"]);
    }

    #[test]
    fn test_flushes_unterminated_last_line() {
        let (tx, rx) = mpsc::sync_channel(16);
        let mut reader = LineReader::new(Cursor::new("help\nreset"), tx);

        assert_eq!(reader.pump().unwrap(), 2);
        assert_eq!(collect(&rx), vec!["help", "reset"]);
    }

    #[test]
    fn test_stops_when_queue_closes() {
        let (tx, rx) = mpsc::sync_channel(16);
        drop(rx);
        let mut reader = LineReader::new(Cursor::new("help\nreset\n"), tx);
        assert_eq!(reader.pump().unwrap(), 0);
    }

    #[test]
    fn test_thread_finishes_at_end_of_input() {
        let (tx, rx) = mpsc::sync_channel(16);
        let handle = LineReader::new(Cursor::new(b"ISO 200, 1/15 (EV: 6.0)\n".to_vec()), tx).start();
        handle.join().unwrap();
        assert_eq!(collect(&rx), vec!["ISO 200, 1/15 (EV: 6.0)"]);
    }
}
