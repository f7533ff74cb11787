//! Structured fuzz target: well-formed JSON, adversarial field values.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_fields
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct RuleFields {
    name: String,
    priority: i64,
    direction: String,
    action: String,
    protocol: String,
    ports: Vec<String>,
    ranges: Vec<String>,
    tags: Vec<String>,
    disabled: bool,
}

fuzz_target!(|f: RuleFields| {
    let vpc = serde_json::json!({
        "name": f.name,
        "priority": f.priority,
        "direction": f.direction,
        "sourceRanges": f.ranges,
        "destinationRanges": f.ranges,
        "sourceTags": f.tags,
        "allowed": [{"IPProtocol": f.protocol, "ports": f.ports}],
        "disabled": f.disabled,
    });
    let _ = netreach_inventory::parse_vpc_rule(&vpc);

    let policy = serde_json::json!({
        "description": f.name,
        "priority": f.priority,
        "direction": f.direction,
        "action": f.action,
        "match": {
            "srcIpRanges": f.ranges,
            "layer4Configs": [{"ipProtocol": f.protocol, "ports": f.ports}],
        },
        "disabled": f.disabled,
    });
    let _ = netreach_inventory::parse_policy_rule(&policy);
});
