use bytes::BytesMut;
use serde_json::Value;
use tracing::debug;

/// Incremental frame scanner for the CRLF-delimited JSON feed.
///
/// Frames are records terminated by a run of one or more consecutive CRLF
/// sequences; the run is consumed with the frame, so blank keep-alive lines
/// between records never surface as frames of their own. The scanner keeps
/// a resume index so each chunk is inspected once, with no rescanning of
/// the whole buffer per chunk.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
    scan: usize,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and extract every complete record now available.
    ///
    /// A candidate that fails to parse as JSON is discarded and extraction
    /// halts until the next `feed`: the terminator may have landed
    /// mid-value, so the rest of the buffer is suspect until more bytes
    /// arrive.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Value> {
        self.buf.extend_from_slice(chunk);

        let mut records = Vec::new();
        while let Some(at) = self.find_terminator() {
            let run_end = self.terminator_run_end(at);
            let frame = self.buf.split_to(run_end);
            self.scan = 0;

            let text = String::from_utf8_lossy(&frame[..at]);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                // keep-alive ping
                continue;
            }

            match serde_json::from_str(trimmed) {
                Ok(value) => records.push(value),
                Err(e) => {
                    debug!(error = %e, len = trimmed.len(), "discarding undecodable frame");
                    break;
                }
            }
        }
        records
    }

    /// Bytes currently held back waiting for a terminator.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Index of the first CRLF at or after the resume point, if any.
    fn find_terminator(&mut self) -> Option<usize> {
        let mut i = self.scan;
        while i + 1 < self.buf.len() {
            if self.buf[i] == b'\r' && self.buf[i + 1] == b'\n' {
                return Some(i);
            }
            i += 1;
        }
        // The last byte is unchecked; it may pair with the next chunk.
        self.scan = i;
        None
    }

    /// Extend a terminator into its full run of consecutive CRLFs, as far
    /// as bytes are available. A run cut off by the chunk boundary simply
    /// continues as a leading run on the next pass.
    fn terminator_run_end(&self, at: usize) -> usize {
        let mut end = at;
        while end + 1 < self.buf.len() && self.buf[end] == b'\r' && self.buf[end + 1] == b'\n' {
            end += 2;
        }
        end
    }
}
