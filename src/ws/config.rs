use std::time::Duration;

use bon::Builder;

use crate::HEARTBEAT_INTERVAL_SECS;

const DEFAULT_HEARTBEAT_INTERVAL_DURATION: Duration = Duration::from_secs(HEARTBEAT_INTERVAL_SECS);

/// Configuration for real-time client behavior.
///
/// ```rust
/// use std::time::Duration;
///
/// use slack_rtm_client::ws::Config;
///
/// let config = Config::builder()
///     .heartbeat_interval(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.heartbeat_interval, Duration::from_secs(10));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Interval between PING control frames sent to keep the connection alive. The default is
    /// thirty (30) seconds.
    #[builder(default = DEFAULT_HEARTBEAT_INTERVAL_DURATION)]
    pub heartbeat_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL_DURATION,
        }
    }
}
