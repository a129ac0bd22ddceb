use crate::constant::{DEFAULT_DISCOVERY_TIMEOUT, SSDP_HOST};
use crate::{Error, Result};

mod finder;
mod transport;

use self::finder::{Event, Finder};
use self::transport::{SsdpTransport, UdpTransport};

use url::Url;

use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Normalized network address of a Roku device's control endpoint.
///
/// Derived from the LOCATION header of an SSDP response by dropping the
/// path, so every response from the same device maps to the same address
/// no matter which resource it advertised. Serializes as
/// `scheme://host:port` with no trailing slash:
///
/// ```
/// let address: rokuecp::DeviceAddress = "http://192.168.1.17:8060".parse().unwrap();
/// assert_eq!(address.to_string(), "http://192.168.1.17:8060");
/// assert_eq!(address.port(), Some(8060));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceAddress {
    url: Url,
}

impl DeviceAddress {
    /// Normalize an SSDP LOCATION value. `None` when it is not a URL or
    /// has no host to connect back to.
    pub(crate) fn from_location(location: &str) -> Option<Self> {
        let mut url = Url::parse(location).ok()?;
        if !url.has_host() {
            return None;
        }
        url.set_path("");
        url.set_query(None);
        url.set_fragment(None);
        Some(Self { url })
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }
}

impl Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Url always serializes the empty path as "/"
        write!(f, "{}", self.url.as_str().trim_end_matches('/'))
    }
}

impl FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_location(s)
            .ok_or_else(|| Error::Other(format!("'{}' is not a valid device address", s)))
    }
}

/// Find the first Roku device to answer a search on the local network.
///
/// Broadcasts an SSDP search every second until a device answers or
/// `timeout` elapses (10 seconds when `None`). Resolves as soon as the
/// first device is seen.
///
/// ```no_run
/// # async fn first() -> Result<(), rokuecp::Error> {
/// let address = rokuecp::discover(None).await?;
/// println!("{}", address);
/// // > "http://192.168.1.17:8060"
/// # Ok(())
/// # }
/// ```
pub async fn discover(timeout: Option<Duration>) -> Result<DeviceAddress> {
    let timeout = timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT);
    let transport = UdpTransport::bind(SSDP_HOST).await?;
    first_device(transport, timeout).await
}

/// Find every Roku device on the local network.
///
/// Always waits out the full `timeout` window (10 seconds when `None`),
/// then resolves to the de-duplicated addresses in the order they first
/// answered. Errors if no device answered at all.
pub async fn discover_all(timeout: Option<Duration>) -> Result<Vec<DeviceAddress>> {
    let timeout = timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT);
    let transport = UdpTransport::bind(SSDP_HOST).await?;
    all_devices(transport, timeout).await
}

/// Report each Roku device to `on_found` as soon as it is first seen,
/// instead of buffering until the timeout.
///
/// Resolves once the window elapses, however many devices were found;
/// finding none is not an error here since the caller already observed
/// the (empty) stream.
pub async fn discover_each<F>(on_found: F, timeout: Option<Duration>) -> Result<()>
where
    F: FnMut(DeviceAddress),
{
    let timeout = timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT);
    let transport = UdpTransport::bind(SSDP_HOST).await?;
    each_device(transport, timeout, on_found).await
}

async fn first_device<T>(transport: T, timeout: Duration) -> Result<DeviceAddress>
where
    T: SsdpTransport + 'static,
{
    let start = Instant::now();
    let mut finder = Finder::new();
    let mut events = finder.start(transport, timeout);

    while let Some(event) = events.recv().await {
        match event {
            Event::Found(address) => {
                finder.stop();
                log::debug!(
                    target: "rokuecp::discover",
                    "found roku device at {} after {}ms",
                    address,
                    start.elapsed().as_millis()
                );
                return Ok(address);
            }
            Event::TimedOut => break,
        }
    }
    finder.stop();
    Err(Error::no_devices_found(timeout))
}

async fn all_devices<T>(transport: T, timeout: Duration) -> Result<Vec<DeviceAddress>>
where
    T: SsdpTransport + 'static,
{
    let start = Instant::now();
    let mut finder = Finder::new();
    let mut events = finder.start(transport, timeout);
    let mut addresses: Vec<DeviceAddress> = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            Event::Found(address) => {
                if !addresses.contains(&address) {
                    addresses.push(address);
                }
            }
            Event::TimedOut => break,
        }
    }
    finder.stop();

    if addresses.is_empty() {
        Err(Error::no_devices_found(timeout))
    } else {
        log::debug!(
            target: "rokuecp::discover",
            "found {} roku device(s) after {}ms",
            addresses.len(),
            start.elapsed().as_millis()
        );
        Ok(addresses)
    }
}

async fn each_device<T, F>(transport: T, timeout: Duration, mut on_found: F) -> Result<()>
where
    T: SsdpTransport + 'static,
    F: FnMut(DeviceAddress),
{
    let mut finder = Finder::new();
    let mut events = finder.start(transport, timeout);
    let mut seen: Vec<DeviceAddress> = Vec::new();

    while let Some(event) = events.recv().await {
        match event {
            Event::Found(address) => {
                if !seen.contains(&address) {
                    on_found(address.clone());
                    seen.push(address);
                }
            }
            Event::TimedOut => break,
        }
    }
    finder.stop();
    Ok(())
}
