use parking_lot::Mutex;
use sysinfo::System;

/// Answers "is a process with this executable name running"
pub trait ProcessProbe: Send + Sync {
    fn is_running(&self, name: &str) -> bool;
}

/// Process probe backed by the OS process table
pub struct SysinfoProbe {
    system: Mutex<System>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for SysinfoProbe {
    fn is_running(&self, name: &str) -> bool {
        let mut system = self.system.lock();
        system.refresh_processes();
        let found = system.processes_by_exact_name(name).next().is_some();
        log::debug!("Process check for {}: {}", name, found);
        found
    }
}

/// Probe that reports every process as running (`--no-process-check`)
#[derive(Debug, Default)]
pub struct AlwaysRunning;

impl ProcessProbe for AlwaysRunning {
    fn is_running(&self, _name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_process_is_not_running() {
        let probe = SysinfoProbe::new();
        assert!(!probe.is_running("westtek-no-such-process.exe"));
    }
}
