//! Canonical ordering of task lists.
//!
//! Two policies exist because guest and per-owner lists were historically
//! sorted differently:
//!
//! - [`OrderingPolicy::CompletionFirst`]: incomplete before complete, then
//!   newest first.
//! - [`OrderingPolicy::RecencyFirst`]: newest first, then most recently
//!   completed first with pending tasks last.
//!
//! Both end with identity ascending so the order is total. Which policy
//! applies to which [`TaskScope`] is decided by [`TaskOrdering`].

use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::models::Task;

/// Which tasks a list covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskScope {
    /// Tasks without an owner
    Guest,
    /// Tasks belonging to one owner
    Owner(Uuid),
}

impl TaskScope {
    pub fn for_owner(owner_id: Option<Uuid>) -> Self {
        owner_id.map_or(TaskScope::Guest, TaskScope::Owner)
    }

    /// Whether `task` is visible within this scope
    pub fn contains(&self, task: &Task) -> bool {
        task.owner_id() == self.owner_id()
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            TaskScope::Guest => None,
            TaskScope::Owner(owner_id) => Some(*owner_id),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderingPolicy {
    #[default]
    CompletionFirst,
    RecencyFirst,
}

impl OrderingPolicy {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        let primary = match self {
            OrderingPolicy::CompletionFirst => a
                .completed()
                .cmp(&b.completed())
                .then_with(|| b.created_at().cmp(&a.created_at())),
            OrderingPolicy::RecencyFirst => b
                .created_at()
                .cmp(&a.created_at())
                .then_with(|| completed_at_key(a).cmp(&completed_at_key(b))),
        };

        primary.then_with(|| a.id().cmp(&b.id()))
    }

    pub fn sort(self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

/// Most recent completion first, missing completion last.
fn completed_at_key(task: &Task) -> (bool, Option<Reverse<chrono::DateTime<chrono::Utc>>>) {
    let completed_at = task.completed_at();
    (completed_at.is_none(), completed_at.map(Reverse))
}

/// Ordering policy per scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskOrdering {
    pub guest: OrderingPolicy,
    pub owner: OrderingPolicy,
}

impl TaskOrdering {
    pub fn new(guest: OrderingPolicy, owner: OrderingPolicy) -> Self {
        Self { guest, owner }
    }

    pub fn policy_for(&self, scope: TaskScope) -> OrderingPolicy {
        match scope {
            TaskScope::Guest => self.guest,
            TaskScope::Owner(_) => self.owner,
        }
    }

    pub fn sort(&self, scope: TaskScope, tasks: &mut [Task]) {
        self.policy_for(scope).sort(tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use crate::values::{DescriptionValue, TitleValue};
    use chrono::{DateTime, Duration, Utc};
    use std::str::FromStr;

    fn stored(
        id: i64,
        created_days_ago: i64,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Task {
        let created_at = now - Duration::days(created_days_ago);
        Task::restore(
            TaskId::new(id),
            None,
            TitleValue::new(format!("task {id}")).unwrap(),
            DescriptionValue::new("d").unwrap(),
            completed_at.is_some(),
            created_at,
            created_at,
            completed_at,
        )
    }

    fn task(id: i64, completed: bool, created_days_ago: i64, now: DateTime<Utc>) -> Task {
        let completed_at = completed.then_some(now - Duration::days(created_days_ago));
        stored(id, created_days_ago, completed_at, now)
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().filter_map(|t| t.id()).map(TaskId::value).collect()
    }

    #[test]
    fn test_completion_first_puts_incomplete_newest_first() {
        let now = Utc::now();
        let a = task(1, false, 2, now);
        let b = task(2, true, 1, now);
        let c = task(3, false, 5, now);

        let mut tasks = vec![b, c, a];
        OrderingPolicy::CompletionFirst.sort(&mut tasks);

        assert_eq!(ids(&tasks), vec![1, 3, 2]);
    }

    #[test]
    fn test_recency_first_ignores_completion_as_primary_key() {
        let now = Utc::now();
        let a = task(1, false, 2, now);
        let b = task(2, true, 1, now);
        let c = task(3, false, 5, now);

        let mut tasks = vec![a, c, b];
        OrderingPolicy::RecencyFirst.sort(&mut tasks);

        assert_eq!(ids(&tasks), vec![2, 1, 3]);
    }

    #[test]
    fn test_recency_first_tiebreak_on_completed_at() {
        let now = Utc::now();
        let pending = task(1, false, 3, now);

        let early = stored(2, 3, Some(now - Duration::days(2)), now);
        let late = stored(3, 3, Some(now - Duration::days(1)), now);

        let mut tasks = vec![pending, early, late];
        OrderingPolicy::RecencyFirst.sort(&mut tasks);

        assert_eq!(ids(&tasks), vec![3, 2, 1]);
    }

    #[test]
    fn test_identity_breaks_remaining_ties() {
        let now = Utc::now();
        let mut tasks = vec![task(9, false, 1, now), task(4, false, 1, now), task(6, false, 1, now)];

        OrderingPolicy::CompletionFirst.sort(&mut tasks);
        assert_eq!(ids(&tasks), vec![4, 6, 9]);

        OrderingPolicy::RecencyFirst.sort(&mut tasks);
        assert_eq!(ids(&tasks), vec![4, 6, 9]);
    }

    #[test]
    fn test_sorting_is_stable_across_calls() {
        let now = Utc::now();
        let mut first = vec![
            task(5, true, 1, now),
            task(2, false, 1, now),
            task(3, false, 4, now),
            task(1, true, 1, now),
        ];
        let mut second: Vec<Task> = first.iter().rev().cloned().collect();

        OrderingPolicy::CompletionFirst.sort(&mut first);
        OrderingPolicy::CompletionFirst.sort(&mut second);

        assert_eq!(ids(&first), ids(&second));
        assert_eq!(ids(&first), vec![2, 3, 1, 5]);
    }

    #[test]
    fn test_scope_selects_policy() {
        let ordering = TaskOrdering::new(OrderingPolicy::CompletionFirst, OrderingPolicy::RecencyFirst);

        assert_eq!(ordering.policy_for(TaskScope::Guest), OrderingPolicy::CompletionFirst);
        assert_eq!(
            ordering.policy_for(TaskScope::Owner(Uuid::new_v4())),
            OrderingPolicy::RecencyFirst
        );
    }

    #[test]
    fn test_scope_contains_only_matching_owner() {
        let now = Utc::now();
        let owner = Uuid::new_v4();
        let guest_task = task(1, false, 1, now);
        let owned_task = Task::new(
            Some(owner),
            TitleValue::new("mine").unwrap(),
            DescriptionValue::new("d").unwrap(),
            now,
        );

        assert!(TaskScope::Guest.contains(&guest_task));
        assert!(!TaskScope::Guest.contains(&owned_task));
        assert!(TaskScope::Owner(owner).contains(&owned_task));
        assert!(!TaskScope::Owner(owner).contains(&guest_task));
        assert!(!TaskScope::Owner(Uuid::new_v4()).contains(&owned_task));
        assert_eq!(TaskScope::for_owner(Some(owner)), TaskScope::Owner(owner));
        assert_eq!(TaskScope::for_owner(None), TaskScope::Guest);
    }

    #[test]
    fn test_policy_parses_from_config_strings() {
        assert_eq!(
            OrderingPolicy::from_str("completion_first").unwrap(),
            OrderingPolicy::CompletionFirst
        );
        assert_eq!(
            OrderingPolicy::from_str("recency_first").unwrap(),
            OrderingPolicy::RecencyFirst
        );
        assert!(OrderingPolicy::from_str("newest").is_err());
        assert_eq!(OrderingPolicy::RecencyFirst.to_string(), "recency_first");
    }
}
