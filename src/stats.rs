use crate::models::{Priority, Status, Task, TaskStats};

pub fn build_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        match task.status {
            Status::Queued => stats.queued += 1,
            Status::InProgress => stats.active += 1,
            Status::Complete => stats.completed += 1,
        }
        if task.priority == Priority::Focus {
            stats.focus_count += 1;
        }
    }

    stats.completion_rate = completion_rate(stats.completed, stats.total);
    stats
}

/// Whole percent, rounded half up; zero for an empty board.
fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rate = (completed as f64 / total as f64 * 100.0).round();
    rate.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;
    use chrono::Utc;

    fn task(status: Status, priority: Priority) -> Task {
        Task {
            id: TaskId::generate(),
            title: "t".into(),
            note: String::new(),
            priority,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_board_has_zero_rate() {
        let stats = build_stats(&[]);
        assert_eq!(stats, TaskStats::default());
        assert_eq!(stats.completion_rate, 0);
    }

    #[test]
    fn stats_count_statuses_and_focus() {
        let tasks = vec![
            task(Status::Complete, Priority::Focus),
            task(Status::InProgress, Priority::Focus),
            task(Status::Queued, Priority::Spark),
        ];
        let stats = build_stats(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.queued, 1);
        assert_eq!(stats.focus_count, 2);
        assert_eq!(stats.completion_rate, 33);
        assert!(stats.completed + stats.active <= stats.total);
    }

    #[test]
    fn completion_rate_rounds_to_nearest_percent() {
        assert_eq!(completion_rate(2, 3), 67);
        assert_eq!(completion_rate(1, 8), 13);
        assert_eq!(completion_rate(1, 200), 1);
        assert_eq!(completion_rate(4, 4), 100);
    }
}
