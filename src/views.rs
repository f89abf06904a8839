use crate::models::{FilterSelection, Task};

/// Number of entries shown in the recent-activity timeline.
pub const TIMELINE_LEN: usize = 4;

/// Tasks matching `filter`, in collection order.
pub fn filter_tasks(tasks: &[Task], filter: FilterSelection) -> Vec<&Task> {
    match filter.status() {
        None => tasks.iter().collect(),
        Some(status) => tasks.iter().filter(|task| task.status == status).collect(),
    }
}

/// The most recently created tasks, newest first, regardless of filter.
pub fn timeline(tasks: &[Task]) -> Vec<&Task> {
    let mut recent: Vec<&Task> = tasks.iter().collect();
    // Stable sort: equal timestamps keep collection order.
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(TIMELINE_LEN);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Status, TaskId};
    use chrono::{Duration, TimeZone, Utc};

    fn board() -> Vec<Task> {
        let base = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        let statuses = [
            Status::Queued,
            Status::Complete,
            Status::Queued,
            Status::InProgress,
            Status::Queued,
            Status::Complete,
        ];
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Task {
                id: TaskId::from(format!("t{i}")),
                title: format!("Task {i}"),
                note: String::new(),
                priority: Priority::Flow,
                status: *status,
                // Oldest first, the reverse of a board built through the store.
                created_at: base + Duration::minutes(i as i64),
            })
            .collect()
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn all_returns_everything_in_order() {
        let tasks = board();
        assert_eq!(
            ids(&filter_tasks(&tasks, FilterSelection::All)),
            ["t0", "t1", "t2", "t3", "t4", "t5"]
        );
    }

    #[test]
    fn status_filter_keeps_matching_subset_in_order() {
        let tasks = board();
        let queued = filter_tasks(&tasks, FilterSelection::Queued);
        assert_eq!(ids(&queued), ["t0", "t2", "t4"]);
        assert!(queued.iter().all(|t| t.status == Status::Queued));
        assert_eq!(ids(&filter_tasks(&tasks, FilterSelection::Complete)), ["t1", "t5"]);
        assert_eq!(ids(&filter_tasks(&tasks, FilterSelection::InProgress)), ["t3"]);
        assert!(filter_tasks(&[], FilterSelection::Queued).is_empty());
    }

    #[test]
    fn timeline_is_newest_four_by_creation_time() {
        let tasks = board();
        let recent = timeline(&tasks);
        assert_eq!(recent.len(), TIMELINE_LEN);
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(ids(&recent), ["t5", "t4", "t3", "t2"]);
    }

    #[test]
    fn timeline_handles_short_collections() {
        let tasks = board();
        assert_eq!(timeline(&tasks[..2]).len(), 2);
        assert!(timeline(&[]).is_empty());
    }
}
