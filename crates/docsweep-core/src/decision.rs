use crate::model::{CleanupPlan, Resolution};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answer for a single duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupDecision {
    /// Remove every non-survivor member.
    Apply,
    /// Leave the group untouched and move on to the next one.
    Skip,
    /// Leave this group and every remaining group untouched.
    Abort,
}

/// Source of the confirmations a destructive cleanup needs.
///
/// `confirm_cleanup` gates the whole run; nothing is removed unless it
/// returns `true`. `decide_group` is asked once per group, in order, before
/// that group's removals begin.
pub trait DecisionProvider: Send + Sync {
    fn confirm_cleanup(&self, plan: &CleanupPlan) -> bool;

    fn decide_group(&self, _resolution: &Resolution) -> GroupDecision {
        GroupDecision::Apply
    }
}

/// Batch approval of the run and every group.
pub struct AutoApprove;

impl DecisionProvider for AutoApprove {
    fn confirm_cleanup(&self, _plan: &CleanupPlan) -> bool {
        true
    }
}

/// Declines the top-level confirmation, so nothing is ever removed.
pub struct DeclineAll;

impl DecisionProvider for DeclineAll {
    fn confirm_cleanup(&self, _plan: &CleanupPlan) -> bool {
        false
    }

    fn decide_group(&self, _resolution: &Resolution) -> GroupDecision {
        GroupDecision::Abort
    }
}

/// Replays a fixed list of group decisions. Groups past the end of the
/// script get `fallback`.
pub struct ScriptedDecisions {
    confirm: bool,
    decisions: Mutex<VecDeque<GroupDecision>>,
    fallback: GroupDecision,
}

impl ScriptedDecisions {
    pub fn new(confirm: bool, decisions: impl IntoIterator<Item = GroupDecision>) -> Self {
        Self {
            confirm,
            decisions: Mutex::new(decisions.into_iter().collect()),
            fallback: GroupDecision::Skip,
        }
    }

    pub fn with_fallback(mut self, fallback: GroupDecision) -> Self {
        self.fallback = fallback;
        self
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn confirm_cleanup(&self, _plan: &CleanupPlan) -> bool {
        self.confirm
    }

    fn decide_group(&self, _resolution: &Resolution) -> GroupDecision {
        match self.decisions.lock() {
            Ok(mut queue) => queue.pop_front().unwrap_or(self.fallback),
            Err(_) => GroupDecision::Abort,
        }
    }
}
