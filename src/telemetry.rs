//! Telemetry metric name constants.
//!
//! Centralised metric names for bragi operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bragi_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — backend family name (e.g. "hosted", "local", "horde")
//! - `operation` — step invoked (e.g. "generate", "health", "poll")
//! - `status` — outcome: "ok" or "error"

/// Total generation requests dispatched through the facade.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bragi_requests_total";

/// Generation request duration in seconds.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "bragi_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `provider`, `operation`.
pub const RETRIES_TOTAL: &str = "bragi_retries_total";

/// Total discovery probes issued.
///
/// Labels: `status` ("hit" | "miss").
pub const PROBE_ATTEMPTS_TOTAL: &str = "bragi_probe_attempts_total";

/// Total poll ticks against the distributed network.
pub const POLL_TICKS_TOTAL: &str = "bragi_poll_ticks_total";

/// Total persona breaks flagged by the post-processor.
pub const PERSONA_BREAKS_TOTAL: &str = "bragi_persona_breaks_total";
