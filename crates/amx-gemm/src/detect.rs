//! AMX hardware detection.
//!
//! The coprocessor is undocumented, so there is no feature flag to query;
//! availability is inferred from the CPU brand string. Both the version and
//! the performance-core count are read once and cached.

use once_cell::sync::OnceCell;

/// Apple Silicon generation, as inferred from the CPU brand string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmxVersion {
    /// Apple M1 family.
    M1,
    /// Apple M2 family.
    M2,
    /// Apple M3 family.
    M3,
    /// Apple M4 family.
    M4,
    /// Apple Silicon newer than this crate knows about; AMX is assumed present.
    Unknown,
}

static DETECTED: OnceCell<Option<AmxVersion>> = OnceCell::new();
static PERF_CORES: OnceCell<usize> = OnceCell::new();

/// Worker parallelism is capped regardless of what the OS reports.
const MAX_PERF_CORES: usize = 16;

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
mod sysctl {
    use std::ffi::CStr;
    use std::os::raw::{c_char, c_int, c_void};

    extern "C" {
        fn sysctlbyname(
            name: *const c_char,
            oldp: *mut c_void,
            oldlenp: *mut usize,
            newp: *mut c_void,
            newlen: usize,
        ) -> c_int;
    }

    pub(super) fn string(name: &CStr) -> Option<String> {
        let mut size: usize = 0;
        // SAFETY: sysctlbyname is a standard macOS syscall; the two-call
        // pattern first asks for the value's size, then fills the buffer.
        unsafe {
            if sysctlbyname(
                name.as_ptr(),
                std::ptr::null_mut(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) != 0
            {
                return None;
            }

            let mut buf = vec![0u8; size];
            if sysctlbyname(
                name.as_ptr(),
                buf.as_mut_ptr().cast(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) != 0
            {
                return None;
            }

            buf.truncate(size);
            if buf.last() == Some(&0) {
                buf.pop();
            }
            String::from_utf8(buf).ok()
        }
    }

    pub(super) fn u32_value(name: &CStr) -> Option<u32> {
        let mut value: u32 = 0;
        let mut size = std::mem::size_of::<u32>();
        // SAFETY: same syscall, fixed-size integer output.
        unsafe {
            if sysctlbyname(
                name.as_ptr(),
                (&mut value as *mut u32).cast(),
                &mut size,
                std::ptr::null_mut(),
                0,
            ) != 0
            {
                return None;
            }
        }
        Some(value)
    }
}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn detect_internal() -> Option<AmxVersion> {
    let brand = sysctl::string(c"machdep.cpu.brand_string")?;

    if !brand.contains("Apple") {
        return None;
    }

    // Every Apple Silicon generation so far ships AMX.
    let version = match () {
        _ if brand.contains("M1") => AmxVersion::M1,
        _ if brand.contains("M2") => AmxVersion::M2,
        _ if brand.contains("M3") => AmxVersion::M3,
        _ if brand.contains("M4") => AmxVersion::M4,
        _ => AmxVersion::Unknown,
    };

    Some(version)
}

#[cfg(not(all(target_arch = "aarch64", target_os = "macos")))]
fn detect_internal() -> Option<AmxVersion> {
    None
}

#[cfg(all(target_arch = "aarch64", target_os = "macos"))]
fn perf_cores_internal() -> usize {
    sysctl::u32_value(c"hw.perflevel0.logicalcpu")
        .map(|n| n as usize)
        .unwrap_or(1)
}

#[cfg(not(all(target_arch = "aarch64", target_os = "macos")))]
fn perf_cores_internal() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Detect AMX availability and version.
///
/// Returns `Some(version)` on Apple Silicon, `None` anywhere else.
/// The result is cached after the first call.
#[must_use]
pub fn detect() -> Option<AmxVersion> {
    *DETECTED.get_or_init(detect_internal)
}

/// Check whether the AMX engine can be used on this machine.
///
/// Equivalent to `detect().is_some()`.
#[must_use]
#[inline]
pub fn is_available() -> bool {
    detect().is_some()
}

/// Number of performance cores available for worker dispatch.
///
/// Reads `hw.perflevel0.logicalcpu` on macOS and the scheduler-reported
/// parallelism elsewhere, clamped to `[1, 16]`. Cached after the first call.
#[must_use]
pub fn performance_cores() -> usize {
    *PERF_CORES.get_or_init(|| perf_cores_internal().clamp(1, MAX_PERF_CORES))
}
