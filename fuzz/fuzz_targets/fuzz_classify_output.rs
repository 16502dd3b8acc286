//! Fuzz target: `getvmip` output classification.
//!
//! Arbitrary script output must never panic, and a `Ready` address is
//! always non-empty and never the placeholder.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vmprov_core::{classify_output, Readiness, PLACEHOLDER_HOSTNAME};

fuzz_target!(|data: &[u8]| {
    let output = String::from_utf8_lossy(data);
    if let Readiness::Ready(ip) = classify_output(&output) {
        assert!(!ip.is_empty());
        assert_ne!(ip, PLACEHOLDER_HOSTNAME);
    }
});
