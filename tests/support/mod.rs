#![allow(dead_code)]

use rokuecp::Device;

use warp::http::StatusCode;
use warp::Filter;

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// An in-process stand-in for a Roku's External Control Protocol server.
///
/// Serves on an ephemeral loopback port, answers the key and launch
/// endpoints, and records every request path it accepts so tests can
/// assert on exactly what went over the wire.
pub struct EmulatedDevice {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl EmulatedDevice {
    /// Start an emulated device with the given installed app ids.
    pub async fn start(apps: &[&str]) -> Self {
        if let Err(e) = pretty_env_logger::try_init() {
            log::warn!(target: "test::support", "Logger init() returned '{}'", e);
        }

        let requests = Arc::new(Mutex::new(Vec::new()));
        let installed: Arc<HashSet<String>> =
            Arc::new(apps.iter().map(|id| id.to_string()).collect());

        let launch = {
            let requests = requests.clone();
            warp::post()
                .and(warp::path("launch"))
                .and(warp::path::param::<String>())
                .and(warp::path::end())
                .map(move |app_id: String| {
                    if installed.contains(&app_id) {
                        requests.lock().unwrap().push(format!("launch/{}", app_id));
                        StatusCode::OK
                    } else {
                        StatusCode::NOT_FOUND
                    }
                })
        };

        let keys = {
            let requests = requests.clone();
            warp::post()
                .and(warp::path::param::<String>())
                .and(warp::path::param::<String>())
                .and(warp::path::end())
                .map(move |event: String, key: String| match event.as_str() {
                    "keypress" | "keydown" | "keyup" => {
                        requests.lock().unwrap().push(format!("{}/{}", event, key));
                        StatusCode::OK
                    }
                    _ => StatusCode::NOT_FOUND,
                })
        };

        let (addr, server) =
            warp::serve(launch.or(keys)).bind_ephemeral(SocketAddr::from(([127, 0, 0, 1], 0)));
        tokio::spawn(server);

        Self { addr, requests }
    }

    /// A client pointed at this emulated device
    pub fn device(&self) -> Device {
        let address = format!("http://{}", self.addr).parse().unwrap();
        Device::new(address).unwrap()
    }

    /// Every request path accepted so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}
