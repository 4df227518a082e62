use async_trait::async_trait;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Random-access byte source the container parsers read from
#[async_trait]
pub trait SeekableStream: Send {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    async fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Fill `buf` completely or fail with `UnexpectedEof`.
    async fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream ended after {} of {} bytes", filled, buf.len()),
                ));
            }
            filled += n;
        }
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    async fn read_range(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.seek(SeekFrom::Start(offset)).await?;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf).await?;
        Ok(buf)
    }

    async fn len(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::End(0)).await
    }
}

/// Local file wrapper
pub struct LocalSeekableStream(File);

impl LocalSeekableStream {
    pub async fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(LocalSeekableStream(File::open(path).await?))
    }
}

#[async_trait]
impl SeekableStream for LocalSeekableStream {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf).await
    }

    async fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos).await
    }
}

/// In-memory stream, used for buffers that are already fully loaded
pub struct MemorySeekableStream {
    data: Vec<u8>,
    position: u64,
}

impl MemorySeekableStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }
}

#[async_trait]
impl SeekableStream for MemorySeekableStream {
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let start = (self.position as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.position += n as u64;
        Ok(n)
    }

    async fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::End(offset) => len + offset,
            SeekFrom::Current(offset) => self.position as i64 + offset,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }
        self.position = target as u64;
        Ok(self.position)
    }
}
