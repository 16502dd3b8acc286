//! Fuzz target: password escaping.
//!
//! Every `!` gains exactly one backslash and nothing else changes.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vmprov_core::escape_password;

fuzz_target!(|data: &str| {
    let escaped = escape_password(data);
    assert_eq!(escaped.len(), data.len() + data.matches('!').count());
    assert_eq!(escaped.replace("\\!", "!"), data);
});
