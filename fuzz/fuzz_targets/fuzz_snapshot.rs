//! Fuzz target for inventory snapshot decoding.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_snapshot
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = netreach_inventory::fuzz::parse_snapshot(text);
    }
});
