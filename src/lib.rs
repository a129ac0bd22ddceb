//! Discover and control Roku devices on the local network.
//!
//! Devices are located with an SSDP-style multicast search and controlled
//! over the HTTP External Control Protocol they serve on port 8060.
//!
//! ```no_run
//! # async fn demo() -> Result<(), rokuecp::Error> {
//! use rokuecp::{Device, Key};
//!
//! let dev = Device::discover(None).await?;
//! dev.key_press(Key::Home).await?;
//! # Ok(())
//! # }
//! ```

mod constant;
mod device;
mod discover;
mod error;

pub use device::{Device, Key};
pub use discover::{discover, discover_all, discover_each, DeviceAddress};
pub use error::{Error, Result};
