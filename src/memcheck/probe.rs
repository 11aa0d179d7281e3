/// Process and system memory observation

use serde::Serialize;
use sysinfo::System;

use crate::Result;

/// Point-in-time system memory reading, in bytes.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SystemMemory {
    pub total: u64,
    pub available: u64,
}

/// Whole-system memory snapshot for report context.
pub fn system_memory() -> SystemMemory {
    let mut system = System::new();
    system.refresh_memory();
    SystemMemory {
        total: system.total_memory(),
        available: system.available_memory(),
    }
}

/// Current process resident set size in bytes.
///
/// Reads /proc directly on Linux; sysinfo covers the other platforms.
#[cfg(target_os = "linux")]
pub fn process_rss() -> Result<u64> {
    use crate::StrandError;

    let status = std::fs::read_to_string("/proc/self/status")?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kb: u64 = rest
                .trim()
                .trim_end_matches("kB")
                .trim()
                .parse()
                .map_err(|e| StrandError::MemoryProbe(format!("bad VmRSS field: {e}")))?;
            return Ok(kb * 1024);
        }
    }
    Err(StrandError::MemoryProbe(
        "VmRSS not present in /proc/self/status".into(),
    ))
}

/// Current process resident set size in bytes.
#[cfg(not(target_os = "linux"))]
pub fn process_rss() -> Result<u64> {
    use crate::StrandError;
    use sysinfo::{get_current_pid, ProcessesToUpdate};

    let pid = get_current_pid().map_err(|e| StrandError::MemoryProbe(e.to_string()))?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system
        .process(pid)
        .map(|process| process.memory())
        .ok_or_else(|| StrandError::MemoryProbe(format!("process {pid} not visible")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rss_is_nonzero_for_a_live_process() {
        let rss = process_rss().expect("probe own process");
        assert!(rss > 0);
    }

    #[test]
    fn system_memory_reports_totals() {
        let memory = system_memory();
        assert!(memory.total > 0);
        assert!(memory.available <= memory.total);
    }
}
