//! Endpoint discovery for local-compatible inference servers.
//!
//! Builds a candidate set by crossing loopback hostnames with well-known
//! inference-server ports, then races a lightweight identification probe
//! against every candidate at once. The first candidate that identifies
//! itself wins; the losing probe futures are dropped, which aborts their
//! in-flight requests.
//!
//! Discovery never fails: an unreachable or unidentified candidate is a
//! `None`, not an error.

use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use serde::Deserialize;
use tracing::debug;

use crate::telemetry;

const LOOPBACK_HOSTS: &[&str] = &["127.0.0.1", "localhost"];
const SERVER_PORTS: &[u16] = &[5000, 5001, 5002];

/// Public instances probed only when running in a hosted environment
/// where loopback can never resolve to a user's machine.
const PUBLIC_INSTANCES: &[&str] = &["https://api.koboldai.net", "https://lite.koboldai.net"];

/// Substring that identifies the expected server kind in the version reply.
const SERVER_KIND: &str = "kobold";

/// Model name reported by an idle server with nothing loaded.
pub(crate) const IDLE_MODEL: &str = "ReadOnly";

/// Per-probe timeout for loopback candidates.
pub const LOCAL_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-probe timeout for public instances.
pub const PUBLIC_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Deserialize)]
struct VersionReply {
    result: String,
}

#[derive(Deserialize)]
struct ModelReply {
    result: String,
}

/// Probe one candidate base URL and return it if it identifies itself.
///
/// Primary check: the version endpoint names the expected server kind.
/// Secondary check: the model endpoint reports a non-empty loaded model.
/// Exposed so tests can point a probe at a mock server.
pub async fn probe_endpoint(
    client: &reqwest::Client,
    base: &str,
    timeout: Duration,
) -> Option<String> {
    let version_url = format!("{base}/api/extra/version");
    if let Ok(response) = client.get(&version_url).timeout(timeout).send().await
        && let Ok(reply) = response.json::<VersionReply>().await
        && reply.result.to_lowercase().contains(SERVER_KIND)
    {
        debug!(endpoint = base, kind = %reply.result, "probe identified server");
        return Some(base.to_string());
    }

    let model_url = format!("{base}/api/v1/model");
    if let Ok(response) = client.get(&model_url).timeout(timeout).send().await
        && let Ok(reply) = response.json::<ModelReply>().await
        && !reply.result.is_empty()
        && reply.result != IDLE_MODEL
    {
        debug!(endpoint = base, model = %reply.result, "probe found loaded model");
        return Some(base.to_string());
    }

    None
}

/// Race identification probes against `candidates`; first hit wins.
pub async fn discover_among(
    client: &reqwest::Client,
    candidates: &[String],
    timeout: Duration,
) -> Option<String> {
    let mut probes: FuturesUnordered<_> = candidates
        .iter()
        .map(|base| probe_endpoint(client, base, timeout))
        .collect();

    while let Some(outcome) = probes.next().await {
        if let Some(endpoint) = outcome {
            metrics::counter!(telemetry::PROBE_ATTEMPTS_TOTAL, "status" => "hit").increment(1);
            return Some(endpoint);
        }
        metrics::counter!(telemetry::PROBE_ATTEMPTS_TOTAL, "status" => "miss").increment(1);
    }
    None
}

/// Find a reachable local inference server, if any.
///
/// Returns `None` when nothing answers in time; callers must treat that
/// as "no local server available", not an error.
pub async fn discover_local_endpoint(client: &reqwest::Client) -> Option<String> {
    let candidates: Vec<String> = LOOPBACK_HOSTS
        .iter()
        .flat_map(|host| {
            SERVER_PORTS
                .iter()
                .map(move |port| format!("http://{host}:{port}"))
        })
        .collect();
    discover_among(client, &candidates, LOCAL_PROBE_TIMEOUT).await
}

/// Find a reachable public instance of the local-compatible server kind.
///
/// Used only in hosted execution contexts, with a longer timeout than the
/// loopback sweep.
pub async fn discover_public_endpoint(client: &reqwest::Client) -> Option<String> {
    let candidates: Vec<String> = PUBLIC_INSTANCES.iter().map(|s| s.to_string()).collect();
    discover_among(client, &candidates, PUBLIC_PROBE_TIMEOUT).await
}

/// Normalise an explicit endpoint override into a probe-ready base URL.
///
/// Overrides are sometimes given as bare `host` or `host:port`.
pub fn normalize_endpoint(raw: &str) -> String {
    let with_scheme = if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };
    with_scheme.trim_end_matches('/').to_string()
}
