use super::transport::{SsdpResponse, SsdpTransport};
use super::DeviceAddress;
use crate::constant::BROADCAST_INTERVAL;

use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, sleep, Duration, Instant};

/// Events a running discovery session delivers to its owner.
///
/// A session emits any number of `Found` events followed by at most one
/// `TimedOut`, then closes the channel. Stopping the session early closes
/// the channel without a `TimedOut`.
#[derive(Debug)]
pub(super) enum Event {
    Found(DeviceAddress),
    TimedOut,
}

/// One discovery sweep: re-broadcasts the search every second, filters
/// responses for Roku identity, and reports addresses as they are found.
///
/// The `Finder` is decoupled from any aggregation policy; the façade that
/// owns it decides when enough is enough and calls [`stop()`](Finder::stop).
pub(super) struct Finder {
    stop_tx: Option<watch::Sender<bool>>,
}

impl Finder {
    pub fn new() -> Self {
        Self { stop_tx: None }
    }

    /// Begin a session. If one is already running it is fully stopped
    /// first, so timers never stack.
    pub fn start<T>(&mut self, transport: T, timeout: Duration) -> mpsc::UnboundedReceiver<Event>
    where
        T: SsdpTransport + 'static,
    {
        self.stop();

        let (stop_tx, stop_rx) = watch::channel(false);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.stop_tx = Some(stop_tx);

        tokio::spawn(run_session(transport, timeout, event_tx, stop_rx));
        event_rx
    }

    /// End the session. Safe to call repeatedly and after the session has
    /// already ended on its own; redundant calls are no-ops.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

impl Drop for Finder {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Session driver. Owns the transport for the whole session and drops it on
/// every exit path. Once this loop breaks, nothing further can be emitted,
/// which is what guarantees that a response already in flight when the
/// session stops cannot resurface.
async fn run_session<T: SsdpTransport>(
    transport: T,
    timeout: Duration,
    events: mpsc::UnboundedSender<Event>,
    mut stop_rx: watch::Receiver<bool>,
) {
    // First broadcast goes out at start, before the timers are armed, so
    // even a zero timeout gets one search off. The deadline is armed once
    // for the whole session.
    log::debug!(target: "rokuecp::discover", "beginning search for roku devices");
    if let Err(e) = transport.search_once().await {
        log::debug!(target: "rokuecp::discover", "search broadcast failed: {}", e);
    }
    let mut broadcast = interval_at(Instant::now() + BROADCAST_INTERVAL, BROADCAST_INTERVAL);
    let deadline = sleep(timeout);
    tokio::pin!(deadline);

    loop {
        // Biased: a stop request must win over anything else already
        // queued, and the deadline over a same-instant re-broadcast.
        tokio::select! {
            biased;
            _ = stop_rx.changed() => {
                break;
            }
            _ = &mut deadline => {
                let _ = events.send(Event::TimedOut);
                break;
            }
            _ = broadcast.tick() => {
                log::debug!(target: "rokuecp::discover", "re-broadcasting search for roku devices");
                if let Err(e) = transport.search_once().await {
                    // Lost broadcasts are masked by the 1s re-broadcast cadence
                    log::debug!(target: "rokuecp::discover", "search broadcast failed: {}", e);
                }
            }
            received = transport.recv_response() => {
                match received {
                    Ok(response) => {
                        if let Some(address) = roku_address(&response) {
                            if events.send(Event::Found(address)).is_err() {
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!(target: "rokuecp::discover", "transport receive failed: {}", e);
                        break;
                    }
                }
            }
        }
    }
}

/// A response qualifies when its SERVER header contains the case-sensitive
/// substring "Roku" and its LOCATION header parses as a URL with a host.
/// Everything else is dropped without comment.
fn roku_address(response: &SsdpResponse) -> Option<DeviceAddress> {
    let server = response.header("SERVER")?;
    if !server.contains("Roku") {
        return None;
    }
    let location = response.header("LOCATION")?;
    match DeviceAddress::from_location(location) {
        Some(address) => Some(address),
        None => {
            log::trace!(target: "rokuecp::discover", "ignoring unparseable location '{}'", location);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::FakeTransport;
    use super::{roku_address, Event, Finder};
    use crate::discover::transport::SsdpResponse;

    use tokio::time::Duration;

    use std::collections::HashMap;

    fn response(pairs: &[(&str, &str)]) -> SsdpResponse {
        SsdpResponse::new(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn qualifying_responses() {
        // Substring match is case-sensitive
        let found = roku_address(&response(&[
            ("SERVER", "Roku UPnP/1.0 MiniUPnPd/1.4"),
            ("LOCATION", "http://192.168.1.17:8060/dial/dd.xml"),
        ]));
        assert_eq!(found.unwrap().to_string(), "http://192.168.1.17:8060");

        let rejected = [
            vec![
                ("SERVER", "roku upnp/1.0"),
                ("LOCATION", "http://192.168.1.17:8060/"),
            ],
            // Missing location
            vec![("SERVER", "Roku UPnP/1.0")],
            // Missing server identity
            vec![("LOCATION", "http://192.168.1.17:8060/")],
            // Location is not a url
            vec![("SERVER", "Roku UPnP/1.0"), ("LOCATION", "not a url")],
            // Location has no host
            vec![("SERVER", "Roku UPnP/1.0"), ("LOCATION", "uuid:roku:ecp")],
        ];
        for headers in rejected.iter() {
            assert!(roku_address(&response(headers)).is_none());
        }
    }

    #[tokio::test]
    async fn times_out_once_then_closes() {
        let transport = FakeTransport::with_responses(vec![]);
        let mut finder = Finder::new();
        let mut events = finder.start(transport, Duration::from_millis(100));

        match events.recv().await {
            Some(Event::TimedOut) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
        // Channel closes after the terminal event; nothing else arrives
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn no_events_after_stop() {
        let transport = FakeTransport::with_responses(vec![response(&[
            ("SERVER", "Roku"),
            ("LOCATION", "http://192.168.1.17:8060/"),
        ])]);
        let mut finder = Finder::new();
        let mut events = finder.start(transport, Duration::from_millis(200));

        match events.recv().await {
            Some(Event::Found(address)) => {
                assert_eq!(address.to_string(), "http://192.168.1.17:8060")
            }
            other => panic!("expected a device, got {:?}", other),
        }

        finder.stop();
        finder.stop();

        // Stopped before the deadline: the channel closes with no TimedOut
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn restart_stops_previous_session() {
        let mut finder = Finder::new();
        let mut first = finder.start(
            FakeTransport::with_responses(vec![]),
            Duration::from_millis(5_000),
        );
        let mut second = finder.start(
            FakeTransport::with_responses(vec![]),
            Duration::from_millis(100),
        );

        // The replaced session ends without firing its timeout
        assert!(first.recv().await.is_none());
        match second.recv().await {
            Some(Event::TimedOut) => {}
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rebroadcasts_every_second() {
        let transport = FakeTransport::with_responses(vec![]);
        let searches = transport.search_count();
        let mut finder = Finder::new();
        let mut events = finder.start(transport, Duration::from_millis(2_500));

        while let Some(event) = events.recv().await {
            match event {
                Event::TimedOut => break,
                other => panic!("expected no devices, got {:?}", other),
            }
        }
        // Broadcasts at 0ms, 1000ms, 2000ms
        assert!(searches.load(std::sync::atomic::Ordering::SeqCst) >= 3);
    }
}
