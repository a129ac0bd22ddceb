use std::time::Duration;

pub const SSDP_HOST: &str = "239.255.255.250:1900";
pub const SSDP_ST: &str = "roku:ecp";
pub const SSDP_MX: u8 = 3;

/// How long a discovery call waits when the caller gives no timeout
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_millis(10_000);
/// Cadence of M-SEARCH re-broadcasts within a session
pub const BROADCAST_INTERVAL: Duration = Duration::from_millis(1_000);

/// Roku devices serve the External Control Protocol on this port
pub const ECP_PORT: u16 = 8060;
pub const DEFAULT_HTTP_TIMEOUT: u64 = 3;
