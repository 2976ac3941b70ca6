use std::time::Duration;

/// Artificial delays that mimic a remote backend. Disabled by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Latency {
    enabled: bool,
}

impl Latency {
    pub const LOOKUP_MS: u64 = 200;
    pub const QUERY_MS: u64 = 300;
    pub const ANALYTICS_MS: u64 = 400;
    pub const WRITE_MS: u64 = 500;
    pub const AUTH_MS: u64 = 1000;
    pub const PAYMENT_MS: u64 = 2000;

    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub const fn disabled() -> Self {
        Self { enabled: false }
    }

    pub async fn simulate(&self, millis: u64) {
        if self.enabled {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }
}
