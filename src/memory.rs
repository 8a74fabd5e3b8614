//! Resident set size tracking via `/proc/self/status`.
//!
//! Search can easily eat all available memory on hard levels; the search loop
//! polls this and aborts before the OOM killer gets involved.

use std::fs;

/// 2 GiB, matching the usual competition server limit.
pub const DEFAULT_MAX_USAGE: u64 = 2048 * 1024 * 1024;

/// Current resident set size in bytes. Returns 0 when it cannot be determined
/// (non-Linux or unexpected procfs format) so the limit check degrades to a no-op.
pub fn usage() -> u64 {
    let status = match fs::read_to_string("/proc/self/status") {
        Ok(status) => status,
        Err(_) => return 0,
    };
    for line in status.lines() {
        // format: "VmRSS:      1234 kB"
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            let kib: u64 = rest
                .trim()
                .trim_end_matches("kB")
                .trim()
                .parse()
                .unwrap_or(0);
            return kib * 1024;
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_is_nonzero_on_linux() {
        if cfg!(target_os = "linux") {
            assert!(usage() > 0);
        }
    }

    #[test]
    fn usage_is_below_default_limit() {
        assert!(usage() < DEFAULT_MAX_USAGE);
    }
}
