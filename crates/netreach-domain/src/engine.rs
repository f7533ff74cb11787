use crate::config::{EffectiveConfig, TieBreak};
use crate::matcher::rule_matches;
use crate::model::{Policy, PolicyChain, Query, Rule};
use netreach_types::{Decision, MatchedRule};
use std::cmp::Ordering;

/// A matching rule together with its position in the chain.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    pub policy_index: usize,
    pub policy: &'a Policy,
    pub rule: &'a Rule,
}

/// Evaluate a query with the default configuration.
pub fn evaluate(chain: &PolicyChain, query: &Query) -> Decision {
    evaluate_with(chain, query, &EffectiveConfig::default())
}

pub fn evaluate_with(chain: &PolicyChain, query: &Query, cfg: &EffectiveConfig) -> Decision {
    let candidates = matching_rules(chain, query, cfg);

    let decision = match candidates.first() {
        None => Decision::implicit(query.direction.implicit_action()),
        Some(winner) => Decision::matched(
            winner.rule.action,
            MatchedRule {
                policy: winner.policy.name.clone(),
                scope: winner.policy.scope,
                name: winner.rule.name.clone(),
                priority: winner.rule.priority,
            },
        ),
    };

    tracing::trace!(
        direction = %query.direction,
        protocol = %query.protocol,
        port = ?query.port,
        matches = candidates.len(),
        action = %decision.action,
        matched_by = %decision.matched_by,
        "evaluated query"
    );

    decision
}

/// Every rule matching `query`, in precedence order (winner first).
pub fn matching_rules<'a>(
    chain: &'a PolicyChain,
    query: &Query,
    cfg: &EffectiveConfig,
) -> Vec<Candidate<'a>> {
    let mut candidates: Vec<Candidate<'a>> = chain
        .policies()
        .iter()
        .enumerate()
        .flat_map(|(policy_index, policy)| {
            policy.rules.iter().map(move |rule| Candidate {
                policy_index,
                policy,
                rule,
            })
        })
        .filter(|c| rule_matches(query, c.rule))
        .collect();

    // Stable sort: remaining ties keep chain order.
    candidates.sort_by(|a, b| compare_candidates(a, b, cfg.tie_break));
    candidates
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>, tie_break: TieBreak) -> Ordering {
    // Ordering priority:
    // 1) rule priority (lower wins)
    // 2) chain position, only with HierarchyFirst
    // 3) action (deny before allow)
    let by_priority = a.rule.priority.cmp(&b.rule.priority);
    let by_action = a.rule.action.tie_rank().cmp(&b.rule.action.tie_rank());
    match tie_break {
        TieBreak::Numeric => by_priority.then(by_action),
        TieBreak::HierarchyFirst => by_priority
            .then(a.policy_index.cmp(&b.policy_index))
            .then(by_action),
    }
}
