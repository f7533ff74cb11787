use netreach_types::{Action, AddressRange, Direction, PolicyScope, PortRange, Protocol};
use std::collections::BTreeSet;

/// One (protocol, ports) pair of a rule. Empty `ports` means every port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct L4Filter {
    pub protocol: Protocol,
    pub ports: Vec<PortRange>,
}

impl L4Filter {
    pub fn all() -> Self {
        Self {
            protocol: Protocol::All,
            ports: Vec::new(),
        }
    }
}

/// One access-control entry, already validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    /// VPC rule name, or the hierarchical rule description (may be empty).
    pub name: String,
    pub direction: Direction,
    pub action: Action,
    /// 0..=65535, lower wins.
    pub priority: u16,
    /// Empty means every protocol.
    pub filters: Vec<L4Filter>,
    pub source_ranges: Vec<AddressRange>,
    pub destination_ranges: Vec<AddressRange>,
    pub source_tags: BTreeSet<String>,
    pub target_tags: BTreeSet<String>,
    pub source_service_accounts: BTreeSet<String>,
    pub target_service_accounts: BTreeSet<String>,
    pub disabled: bool,
}

impl Rule {
    /// A rule with no selectors at all: matches every flow in its direction.
    pub fn new(name: &str, direction: Direction, action: Action, priority: u16) -> Self {
        Self {
            name: name.to_string(),
            direction,
            action,
            priority,
            filters: Vec::new(),
            source_ranges: Vec::new(),
            destination_ranges: Vec::new(),
            source_tags: BTreeSet::new(),
            target_tags: BTreeSet::new(),
            source_service_accounts: BTreeSet::new(),
            target_service_accounts: BTreeSet::new(),
            disabled: false,
        }
    }

    /// The address field compared against a query: sources for ingress,
    /// destinations for egress.
    pub fn ranges_for(&self, direction: Direction) -> &[AddressRange] {
        match direction {
            Direction::Ingress => &self.source_ranges,
            Direction::Egress => &self.destination_ranges,
        }
    }
}

/// An ordered set of rules attached at one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    /// Only used in explanations, never for ordering.
    pub name: String,
    pub scope: PolicyScope,
    pub rules: Vec<Rule>,
}

/// Policies applicable to one (project, network) pair, in scope order:
/// organization, folders root-most first, then the network itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyChain {
    policies: Vec<Policy>,
}

impl PolicyChain {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Every rule in chain order, paired with the policy that owns it.
    pub fn rules(&self) -> impl Iterator<Item = (&Policy, &Rule)> {
        self.policies
            .iter()
            .flat_map(|p| p.rules.iter().map(move |r| (p, r)))
    }

    /// The trailing network-level policy, if the chain has one.
    pub fn network_policy(&self) -> Option<&Policy> {
        self.policies
            .last()
            .filter(|p| p.scope == PolicyScope::Network)
    }
}

/// A hypothetical flow to evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub direction: Direction,
    pub protocol: Protocol,
    pub port: Option<u16>,
    /// Source range for ingress, destination range for egress. `None` is any address.
    pub range: Option<AddressRange>,
    pub source_tags: BTreeSet<String>,
    pub target_tags: BTreeSet<String>,
    pub source_service_account: Option<String>,
    pub target_service_account: Option<String>,
}

impl Query {
    pub fn new(direction: Direction, protocol: Protocol) -> Self {
        Self {
            direction,
            protocol,
            port: None,
            range: None,
            source_tags: BTreeSet::new(),
            target_tags: BTreeSet::new(),
            source_service_account: None,
            target_service_account: None,
        }
    }

    pub fn ingress(protocol: Protocol) -> Self {
        Self::new(Direction::Ingress, protocol)
    }

    pub fn egress(protocol: Protocol) -> Self {
        Self::new(Direction::Egress, protocol)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_range(mut self, range: AddressRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_source_tag(mut self, tag: &str) -> Self {
        self.source_tags.insert(tag.to_string());
        self
    }

    pub fn with_target_tag(mut self, tag: &str) -> Self {
        self.target_tags.insert(tag.to_string());
        self
    }

    pub fn with_source_service_account(mut self, email: &str) -> Self {
        self.source_service_account = Some(email.to_string());
        self
    }

    pub fn with_target_service_account(mut self, email: &str) -> Self {
        self.target_service_account = Some(email.to_string());
        self
    }
}
