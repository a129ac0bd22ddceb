use crate::constant::{DEFAULT_HTTP_TIMEOUT, ECP_PORT};
use crate::{DeviceAddress, Result};

mod remote;

pub use self::remote::Key;
use self::remote::KeyEvent;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use std::time::Duration;

/// A Roku device
///
/// More specifically, a client for the External Control Protocol a Roku
/// device serves on port 8060. Search for devices on your local network
/// with [`discover()`](crate::discover) or connect directly using
/// [`Device::from_ip()`](Device::from_ip).
#[derive(Debug, Clone)]
pub struct Device {
    address: DeviceAddress,
    client: Client,
}

impl Device {
    /// Build a client for the device at `address`.
    pub fn new(address: DeviceAddress) -> Result<Self> {
        Ok(Self {
            address,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT))
                .pool_idle_timeout(Some(Duration::from_secs(5)))
                .build()?,
        })
    }

    /// Build a client for a device with a known IP, assuming the standard
    /// control port.
    ///
    /// # Example
    ///
    /// ```
    /// # use rokuecp::Device;
    /// #
    /// # fn connect_ip() -> Result<Device, rokuecp::Error> {
    /// let dev = Device::from_ip("192.168.1.17")?;
    /// assert_eq!(dev.address().to_string(), "http://192.168.1.17:8060");
    /// #
    /// # Ok(dev)
    /// # }
    /// ```
    pub fn from_ip<S: Into<String>>(ip_addr: S) -> Result<Self> {
        let address = format!("http://{}:{}", ip_addr.into(), ECP_PORT).parse()?;
        Self::new(address)
    }

    /// Connect to the first Roku device found on the local network.
    ///
    /// ```no_run
    /// # use rokuecp::{Device, Key};
    /// #
    /// # async fn go_home() -> Result<(), rokuecp::Error> {
    /// let dev = Device::discover(None).await?;
    /// dev.key_press(Key::Home).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn discover(timeout: Option<Duration>) -> Result<Self> {
        let address = crate::discover(timeout).await?;
        Self::new(address)
    }

    /// Connect to every Roku device found on the local network. Waits the
    /// full timeout window.
    pub async fn discover_all(timeout: Option<Duration>) -> Result<Vec<Self>> {
        crate::discover_all(timeout)
            .await?
            .into_iter()
            .map(Self::new)
            .collect()
    }

    /// The device's control endpoint address
    pub fn address(&self) -> &DeviceAddress {
        &self.address
    }

    /// Click a remote key once
    pub async fn key_press(&self, key: Key) -> Result<()> {
        self.send_key(KeyEvent::Press, key.code()).await
    }

    /// Hold a remote key down. Pair with [`key_up()`](Self::key_up).
    pub async fn key_down(&self, key: Key) -> Result<()> {
        self.send_key(KeyEvent::Down, key.code()).await
    }

    /// Release a held remote key
    pub async fn key_up(&self, key: Key) -> Result<()> {
        self.send_key(KeyEvent::Up, key.code()).await
    }

    /// Type text into the focused text field, one keypress per character
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use rokuecp::{Device, Key};
    /// #
    /// # async fn search() -> Result<(), rokuecp::Error> {
    /// let dev = Device::from_ip("192.168.1.17")?;
    ///
    /// dev.key_press(Key::Search).await?;
    /// dev.text("grand budapest hotel").await?;
    /// dev.key_press(Key::Enter).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn text<S: AsRef<str>>(&self, text: S) -> Result<()> {
        for c in text.as_ref().chars() {
            let mut buf = [0; 4];
            let encoded = utf8_percent_encode(c.encode_utf8(&mut buf), NON_ALPHANUMERIC);
            self.send_key(KeyEvent::Press, &format!("Lit_{}", encoded))
                .await?;
        }
        Ok(())
    }

    /// Launch an installed channel by its app id
    pub async fn launch<S: ToString>(&self, app_id: S) -> Result<()> {
        let url = format!("{}/launch/{}", self.address, app_id.to_string());
        self.client
            .post(&url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn send_key(&self, event: KeyEvent, code: &str) -> Result<()> {
        let url = format!("{}/{}/{}", self.address, event.endpoint(), code);
        log::trace!(target: "rokuecp::device", "POST {}", url);
        self.client
            .post(&url)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
