//! Rate Limiter (Token Bucket)
//!
//! A measurement run spawns a subprocess and saturates the network link for
//! its duration, so the run method is throttled far below typical RPC rates.

use std::time::Instant;
use tokio::sync::Mutex;

/// Token bucket rate limiter
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    max_tokens: u32,
    refill_rate: u32, // tokens per second
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// # Arguments
    /// * `max_tokens` - Maximum burst size
    /// * `refill_rate` - Tokens added per second
    pub fn new(max_tokens: u32, refill_rate: u32) -> Self {
        Self {
            bucket: Mutex::new(Bucket {
                tokens: max_tokens as f64,
                last_refill: Instant::now(),
            }),
            max_tokens,
            refill_rate,
        }
    }

    /// Check if a request is allowed (consumes 1 token).
    ///
    /// Returns true if allowed, false if rate limited.
    pub async fn check(&self) -> bool {
        let mut bucket = self.bucket.lock().await;

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.refill_rate as f64)
            .min(self.max_tokens as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
