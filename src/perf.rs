use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

static SLOW_STAGE_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();
static TOTAL_REMOTE_CALLS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static REMOTE_CALL_COUNT: Cell<u64> = Cell::new(0);
    static FALLBACK_COUNT: Cell<u64> = Cell::new(0);
}

/// 慢阶段阈值（毫秒）
///
/// `VE_OPTIMIZER_SLOW_STAGE_MS=500` 覆盖默认值; Debug 默认 200, Release 默认 1000
fn slow_stage_threshold_ms() -> u64 {
    *SLOW_STAGE_THRESHOLD_MS.get_or_init(|| {
        std::env::var("VE_OPTIMIZER_SLOW_STAGE_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 200 } else { 1000 })
    })
}

/// 记录一次外部评估调用（仅在 PerfGuard 作用域内计数）
pub fn record_remote_call() {
    TOTAL_REMOTE_CALLS.fetch_add(1, Ordering::Relaxed);
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        REMOTE_CALL_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 记录一次规则回退
pub fn record_fallback() {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        FALLBACK_COUNT.with(|c| c.set(c.get().saturating_add(1)));
    }
}

/// 进程内外部评估调用总数
pub fn total_remote_calls() -> u64 {
    TOTAL_REMOTE_CALLS.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms + 外部评估调用数 + 回退数
///
/// 使用方式：
/// ```ignore
/// let _perf = ve_optimizer::perf::PerfGuard::new("score_alternatives");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    remote_start: u64,
    fallback_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let remote_start = REMOTE_CALL_COUNT.with(|c| c.get());
        let fallback_start = FALLBACK_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            remote_start,
            fallback_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let remote_calls = REMOTE_CALL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.remote_start);
        let fallbacks = FALLBACK_COUNT
            .with(|c| c.get())
            .saturating_sub(self.fallback_start);

        if elapsed_ms >= slow_stage_threshold_ms() {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                remote_calls,
                fallbacks,
                "slow stage"
            );
        } else {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                remote_calls,
                fallbacks,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_only_inside_guard() {
        let before = REMOTE_CALL_COUNT.with(|c| c.get());
        record_remote_call();
        assert_eq!(REMOTE_CALL_COUNT.with(|c| c.get()), before);

        {
            let guard = PerfGuard::new("unit");
            record_remote_call();
            record_remote_call();
            record_fallback();
            assert_eq!(REMOTE_CALL_COUNT.with(|c| c.get()) - guard.remote_start, 2);
            assert_eq!(FALLBACK_COUNT.with(|c| c.get()) - guard.fallback_start, 1);
        }
        assert_eq!(PERF_DEPTH.with(|d| d.get()), 0);
        assert!(total_remote_calls() >= 3);
    }
}
