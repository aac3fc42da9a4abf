use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::config::StreamConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{BoatError, BoatResult};
use crate::stream::opc;
use crate::stream::sink::PixelSink;

/// Open Pixel Control client over TCP.
///
/// Connects lazily on the first frame and again after any write error, attempting at most once
/// per `retry` interval. While the endpoint is down every frame fails fast with a transport
/// error and nothing blocks longer than the connect timeout. The host name is resolved once, at
/// construction, so reconnects never wait on DNS.
#[derive(Debug)]
pub struct OpcClient {
    address: String,
    addrs: Vec<SocketAddr>,
    channel: u8,
    connect_timeout: Duration,
    retry: Duration,
    stream: Option<TcpStream>,
    last_attempt: Option<Instant>,
    buf: Vec<u8>,
}

impl OpcClient {
    pub fn new(cfg: &StreamConfig) -> Self {
        let address = cfg.address();
        let addrs = match address.to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(err) => {
                tracing::warn!(%address, error = %err, "controller address did not resolve");
                Vec::new()
            }
        };
        Self {
            address,
            addrs,
            channel: cfg.channel,
            connect_timeout: Duration::from_millis(cfg.connect_timeout_ms),
            retry: Duration::from_millis(cfg.retry_ms),
            stream: None,
            last_attempt: None,
            buf: Vec::with_capacity(opc::HEADER_LEN + 512 * 3),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn connect(&mut self) -> BoatResult<&mut TcpStream> {
        if self.stream.is_none() {
            if let Some(at) = self.last_attempt
                && at.elapsed() < self.retry
            {
                return Err(BoatError::transport(format!(
                    "{} unreachable, waiting to retry",
                    self.address
                )));
            }
            self.last_attempt = Some(Instant::now());
            let stream = open(&self.address, &self.addrs, self.connect_timeout)?;
            tracing::info!(address = %self.address, "connected to pixel controller");
            self.stream = Some(stream);
        }
        self.stream
            .as_mut()
            .ok_or_else(|| BoatError::transport("no connection"))
    }
}

fn open(address: &str, addrs: &[SocketAddr], timeout: Duration) -> BoatResult<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                stream.set_write_timeout(Some(timeout.max(Duration::from_millis(100))))?;
                return Ok(stream);
            }
            Err(err) => last_err = Some(err),
        }
    }
    Err(match last_err {
        Some(err) => BoatError::transport(format!("connect {address}: {err}")),
        None => BoatError::transport(format!("{address} did not resolve")),
    })
}

impl PixelSink for OpcClient {
    fn put_pixels(&mut self, pixels: &[Rgb8]) -> BoatResult<()> {
        opc::encode_set_pixels(&mut self.buf, self.channel, pixels)?;
        let buf = std::mem::take(&mut self.buf);
        let res = self.connect().and_then(|s| s.write_all(&buf).map_err(BoatError::from));
        self.buf = buf;
        if res.is_err() && self.stream.take().is_some() {
            self.last_attempt = Some(Instant::now());
        }
        res
    }
}
