//! Interpreter run options

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Options for one procedure run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Timeout for each request sent while evaluating response rules
    #[serde(default = "default_request_timeout", with = "millis")]
    pub request_timeout: Duration,
    /// Step visits allowed before the run is aborted
    #[serde(default = "default_max_step_visits")]
    pub max_step_visits: usize,
}

fn default_request_timeout() -> Duration {
    Duration::from_millis(1000)
}

fn default_max_step_visits() -> usize {
    256
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            max_step_visits: default_max_step_visits(),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
