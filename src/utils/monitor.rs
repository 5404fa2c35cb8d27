#[cfg(feature = "cli")]
use std::cell::Cell;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResourceSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub memory_percent: f32,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// Process resource reporter for `--monitor`. Only used from the CLI thread.
#[cfg(feature = "cli")]
pub struct ResourceMonitor {
    inner: Option<(std::cell::RefCell<System>, Pid)>,
    started: Instant,
    peak_memory_mb: Cell<u64>,
}

#[cfg(feature = "cli")]
impl ResourceMonitor {
    pub fn new(enabled: bool) -> Self {
        let inner = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some((std::cell::RefCell::new(system), pid))
                }
                Err(e) => {
                    tracing::warn!("Resource monitoring disabled, no current pid: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            inner,
            started: Instant::now(),
            peak_memory_mb: Cell::new(0),
        }
    }

    pub fn snapshot(&self) -> Option<ResourceSnapshot> {
        let (system, pid) = self.inner.as_ref()?;
        let mut system = system.borrow_mut();
        system.refresh_all();

        let process = system.process(*pid)?;
        let memory_mb = process.memory() / 1024 / 1024;
        let total_mb = system.total_memory() / 1024 / 1024;
        let memory_percent = if total_mb > 0 {
            memory_mb as f32 / total_mb as f32 * 100.0
        } else {
            0.0
        };

        let peak = self.peak_memory_mb.get().max(memory_mb);
        self.peak_memory_mb.set(peak);

        Some(ResourceSnapshot {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            memory_percent,
            peak_memory_mb: peak,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(s) = self.snapshot() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Time: {:?}",
                phase,
                s.cpu_usage,
                s.memory_mb,
                s.memory_percent,
                s.peak_memory_mb,
                s.elapsed
            );
        }
    }

    pub fn log_final(&self) {
        if let Some(s) = self.snapshot() {
            tracing::info!(
                "📊 Session total - Time: {:?}, Peak Memory: {}MB",
                s.elapsed,
                s.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct ResourceMonitor;

#[cfg(not(feature = "cli"))]
impl ResourceMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_final(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
