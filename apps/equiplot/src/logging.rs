use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Bounded buffer of formatted log lines, shown by the viewer's log panel.
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
    evicted: u64,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        if line.trim().is_empty() {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
            self.evicted += 1;
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines evicted since startup because the buffer was full.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let skip = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(skip).cloned().collect()
    }
}

pub type SharedLogBuffer = Arc<Mutex<LogBuffer>>;

#[derive(Clone)]
pub struct BufferMakeWriter {
    buffer: SharedLogBuffer,
}

impl BufferMakeWriter {
    pub fn new(buffer: SharedLogBuffer) -> Self {
        Self { buffer }
    }
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buffer: self.buffer.clone(),
            pending: Vec::new(),
        }
    }
}

/// Splits written bytes on `\n` and pushes each complete line.
pub struct LineWriter {
    buffer: SharedLogBuffer,
    pending: Vec<u8>,
}

impl LineWriter {
    fn emit(&self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim_end_matches('\r');
        if !line.is_empty() {
            self.buffer.lock().push(line);
        }
    }
}

impl Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line[..pos]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BufferMakeWriter, LogBuffer};
    use parking_lot::Mutex;
    use std::io::Write;
    use std::sync::Arc;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn buffer_keeps_newest_lines_up_to_capacity() {
        let mut buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {i}"));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.evicted(), 2);
        assert_eq!(buffer.tail(10), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.tail(1), vec!["line 4"]);
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut buffer = LogBuffer::new(4);
        buffer.push("");
        buffer.push("   ");
        assert!(buffer.is_empty());
    }

    #[test]
    fn writer_splits_lines_across_partial_writes() {
        let shared = Arc::new(Mutex::new(LogBuffer::new(10)));
        let make = BufferMakeWriter::new(shared.clone());
        {
            let mut writer = make.make_writer();
            writer.write_all(b"first li").expect("write");
            writer.write_all(b"ne\r\nsecond line\nthi").expect("write");
            writer.write_all(b"rd").expect("write");
            assert_eq!(shared.lock().len(), 2);
        }
        assert_eq!(
            shared.lock().tail(10),
            vec!["first line", "second line", "third"]
        );
    }
}
