//! Fuzz target for firewall rule record parsing.
//!
//! Goal: The parsers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_json
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = netreach_inventory::fuzz::parse_vpc_rule_json(text);
        let _ = netreach_inventory::fuzz::parse_policy_rule_json(text);
    }
});
