use core::fmt::{self, Write as _};

use embedded_io_async::Write;
use heapless::String;

use crate::config::CONSOLE_LINE_SIZE;

/// Line oriented text sink.
///
/// Each line is rendered into a fixed buffer, written out with a trailing newline and
/// flushed before the call returns. Write failures are logged and otherwise ignored,
/// there is nobody to report them to.
pub struct Console<W: Write> {
    writer: W,
}

impl<W: Write> Console<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub async fn line(&mut self, args: fmt::Arguments<'_>) {
        let mut buf = String::<CONSOLE_LINE_SIZE>::new();
        if buf.write_fmt(args).is_err() {
            warn!("Console> Line truncated to {} bytes", CONSOLE_LINE_SIZE);
        }
        self.write(buf.as_bytes()).await;
        self.write(b"\n").await;
        self.flush().await;
    }

    pub async fn blank(&mut self) {
        self.write(b"\n").await;
        self.flush().await;
    }

    async fn write(&mut self, bytes: &[u8]) {
        if let Err(_e) = self.writer.write_all(bytes).await {
            warn!("Console> Write failed");
        }
    }

    async fn flush(&mut self) {
        if let Err(_e) = self.writer.flush().await {
            warn!("Console> Flush failed");
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}
