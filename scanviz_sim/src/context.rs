//! Simulation context implementing ScanVizContext for deterministic runs.

use async_trait::async_trait;
use scanviz_env::ScanVizContext;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Simulation context backed by a virtual clock.
///
/// Time only moves when the harness advances it (directly or through
/// `sleep`), so two runs over the same inputs stamp identical markers.
pub struct SimContext {
    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<Mutex<u64>>,
    
    /// Epoch offset (virtual time 0 maps to this wall-clock time)
    epoch: SystemTime,
}

impl SimContext {
    /// Creates a new SimContext starting at 2024-01-01 00:00:00 UTC.
    pub fn new() -> Self {
        Self::with_epoch(UNIX_EPOCH + Duration::from_secs(1704067200))
    }
    
    /// Creates a SimContext whose virtual time 0 maps to `epoch`.
    pub fn with_epoch(epoch: SystemTime) -> Self {
        Self {
            virtual_time_ns: Arc::new(Mutex::new(0)),
            epoch,
        }
    }
    
    /// Creates an Arc-wrapped context for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
    
    /// Advances virtual time by the given duration.
    ///
    /// Saturates at `u64::MAX` nanoseconds (about 584 years).
    pub fn advance_time(&self, duration: Duration) {
        let step = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let mut time = self.lock_time();
        *time = time.saturating_add(step);
    }
    
    /// Sets the virtual time to a specific value.
    pub fn set_time(&self, time_ns: u64) {
        *self.lock_time() = time_ns;
    }
    
    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        *self.lock_time()
    }
    
    fn lock_time(&self) -> std::sync::MutexGuard<'_, u64> {
        // A poisoned clock still holds a valid counter
        self.virtual_time_ns.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
            epoch: self.epoch,
        }
    }
}

#[async_trait]
impl ScanVizContext for SimContext {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }
    
    fn system_time(&self) -> SystemTime {
        self.epoch + self.now()
    }
    
    async fn sleep(&self, duration: Duration) {
        // In simulation, sleep advances virtual time
        self.advance_time(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanviz_env::Time;
    
    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new();
        assert_eq!(ctx.now(), Duration::ZERO);
        
        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));
        
        ctx.advance_time(Duration::from_millis(500));
        assert_eq!(ctx.now(), Duration::from_millis(1500));
        
        ctx.set_time(42);
        assert_eq!(ctx.time_ns(), 42);
    }
    
    #[test]
    fn test_system_time_follows_virtual_clock() {
        let ctx = SimContext::new();
        ctx.advance_time(Duration::from_millis(100));
        
        assert_eq!(Time::from(ctx.system_time()), Time::new(1704067200, 100_000_000));
    }
    
    #[tokio::test]
    async fn test_sleep_advances_time() {
        let ctx = SimContext::new();
        ctx.sleep(Duration::from_secs(3)).await;
        assert_eq!(ctx.now(), Duration::from_secs(3));
    }
    
    #[test]
    fn test_advance_time_saturates() {
        let ctx = SimContext::new();
        ctx.set_time(u64::MAX - 10);
        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.time_ns(), u64::MAX);
        
        let ctx = SimContext::new();
        ctx.advance_time(Duration::MAX);
        assert_eq!(ctx.time_ns(), u64::MAX);
    }
    
    #[test]
    fn test_sim_context_clone_shares_time() {
        let ctx1 = SimContext::new();
        let ctx2 = ctx1.clone();
        
        ctx1.advance_time(Duration::from_secs(5));
        
        // Both should see the same time
        assert_eq!(ctx1.now(), ctx2.now());
    }
}
