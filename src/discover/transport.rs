use crate::constant::{SSDP_MX, SSDP_ST};
use crate::Result;

use async_trait::async_trait;
use tokio::net::UdpSocket;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::str;

/// One SSDP search response: a mapping of header names to values.
///
/// Header names are uppercased on insert so lookups are effectively
/// case-insensitive, matching how devices vary the casing on the wire.
#[derive(Debug, Clone)]
pub(crate) struct SsdpResponse {
    headers: HashMap<String, String>,
}

impl SsdpResponse {
    pub(crate) fn new(headers: HashMap<String, String>) -> Self {
        Self {
            headers: headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_uppercase(), value))
                .collect(),
        }
    }

    /// Parse a raw datagram. Anything that is not an HTTP-style response
    /// with valid header lines yields `None`.
    pub(crate) fn parse(raw: &[u8]) -> Option<Self> {
        let mut headers = [httparse::EMPTY_HEADER; 32];
        let mut res = httparse::Response::new(&mut headers);
        res.parse(raw).ok()?;

        let mut map = HashMap::new();
        for header in res.headers.iter() {
            if let Ok(value) = str::from_utf8(header.value) {
                map.insert(header.name.to_ascii_uppercase(), value.trim().to_string());
            }
        }
        Some(Self { headers: map })
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }
}

/// The multicast search capability consumed by the discovery session.
///
/// Handed to the `Finder` explicitly so tests can substitute an in-memory
/// implementation. Dropping the transport releases its socket.
#[async_trait]
pub(crate) trait SsdpTransport: Send + Sync {
    /// Send one discovery broadcast, fire-and-forget.
    async fn search_once(&self) -> Result<()>;

    /// Wait for the next inbound search response.
    async fn recv_response(&self) -> Result<SsdpResponse>;
}

/// Real SSDP transport over UDP.
pub(crate) struct UdpTransport {
    socket: UdpSocket,
    target: String,
    search: String,
}

impl UdpTransport {
    /// Bind a search socket. The client side of SSDP uses an ephemeral
    /// port; only devices listen on 1900.
    pub(crate) async fn bind(target: &str) -> Result<Self> {
        let socket = UdpSocket::bind(SocketAddr::from(([0, 0, 0, 0], 0))).await?;

        let search: String = [
            "M-SEARCH * HTTP/1.1",
            &format!("HOST: {}", target),
            "MAN: \"ssdp:discover\"",
            &format!("ST: {}", SSDP_ST),
            &format!("MX: {}", SSDP_MX),
            "",
            "",
        ]
        .join("\r\n");

        Ok(Self {
            socket,
            target: target.to_string(),
            search,
        })
    }
}

#[async_trait]
impl SsdpTransport for UdpTransport {
    async fn search_once(&self) -> Result<()> {
        self.socket
            .send_to(self.search.as_bytes(), self.target.as_str())
            .await?;
        Ok(())
    }

    async fn recv_response(&self) -> Result<SsdpResponse> {
        let mut rbuf = [0; 1024];
        loop {
            let len = self.socket.recv(&mut rbuf).await?;
            match SsdpResponse::parse(&rbuf[..len]) {
                Some(response) => return Ok(response),
                None => {
                    log::trace!(target: "rokuecp::discover", "dropping unparseable ssdp datagram");
                }
            }
        }
    }
}
