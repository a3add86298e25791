//! `Schedule` — a vehicle's ordered task list.
//!
//! # Layout
//!
//! ```text
//! tasks:   [ history … | current | pending … ]
//!                        ^ current (index)
//! ```
//!
//! Tasks before `current` are immutable history.  The current task may be
//! shortened or diverted, and everything after it may be replaced.  Tasks are
//! addressed by index only; callers re-resolve after each mutation.

use std::fmt;

use crate::task::Task;
use crate::{ScheduleError, ScheduleResult};

/// Slack allowed when comparing task boundaries.  Travel times are summed
/// along paths, so exact equality can fail by an ulp or two.
pub const TIME_EPSILON: f64 = 1e-6;

// ── ScheduleStatus ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScheduleStatus {
    /// Service has not begun; no task is current.
    Planned,
    /// Exactly one task is current.
    Started,
    /// Every task has ended.
    Completed,
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleStatus::Planned   => "planned",
            ScheduleStatus::Started   => "started",
            ScheduleStatus::Completed => "completed",
        })
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    tasks:   Vec<Task>,
    current: usize,
    status:  ScheduleStatus,
}

impl Schedule {
    /// A planned schedule holding `initial` as its first task.
    pub fn new(initial: Task) -> Self {
        Self { tasks: vec![initial], current: 0, status: ScheduleStatus::Planned }
    }

    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task(&self, idx: usize) -> Option<&Task> {
        self.tasks.get(idx)
    }

    pub fn task_mut(&mut self, idx: usize) -> Option<&mut Task> {
        self.tasks.get_mut(idx)
    }

    /// Index of the current task, `None` unless started.
    pub fn current_index(&self) -> Option<usize> {
        (self.status == ScheduleStatus::Started).then_some(self.current)
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current_index().map(|i| &self.tasks[i])
    }

    pub fn current_task_mut(&mut self) -> Option<&mut Task> {
        self.current_index().map(|i| &mut self.tasks[i])
    }

    /// First task that may still be changed: the current one, or the first
    /// task of a schedule that has not started.  `None` once completed.
    pub fn mutable_from(&self) -> Option<usize> {
        match self.status {
            ScheduleStatus::Planned   => Some(0),
            ScheduleStatus::Started   => Some(self.current),
            ScheduleStatus::Completed => None,
        }
    }

    pub fn last_task(&self) -> &Task {
        // `tasks` is never empty: `new` seeds it and truncation keeps the
        // current task.
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn last_task_mut(&mut self) -> &mut Task {
        let last = self.tasks.len() - 1;
        &mut self.tasks[last]
    }

    /// End of the last task.
    pub fn end_time(&self) -> f64 {
        self.last_task().end()
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Remove and return every task after index `idx`.
    pub fn truncate_after(&mut self, idx: usize) -> Vec<Task> {
        if idx + 1 >= self.tasks.len() {
            return Vec::new();
        }
        self.tasks.split_off(idx + 1)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// `Planned → Started` with the first task current.  No-op otherwise.
    pub fn start(&mut self) {
        if self.status == ScheduleStatus::Planned {
            self.status = ScheduleStatus::Started;
            self.current = 0;
        }
    }

    /// Make the next task current, or complete the schedule after the last
    /// one.  Returns the new current index.
    pub fn next_task(&mut self) -> Option<usize> {
        if self.status != ScheduleStatus::Started {
            return None;
        }
        if self.current + 1 < self.tasks.len() {
            self.current += 1;
            Some(self.current)
        } else {
            self.status = ScheduleStatus::Completed;
            None
        }
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check non-negative durations plus time and link continuity between
    /// consecutive tasks.
    pub fn validate(&self) -> ScheduleResult<()> {
        for (i, task) in self.tasks.iter().enumerate() {
            if task.end() + TIME_EPSILON < task.begin() {
                return Err(ScheduleError::Inconsistent {
                    task:   i,
                    reason: format!("{} ends at {} before it begins at {}", task.kind(), task.end(), task.begin()),
                });
            }
            if let Some(d) = task.as_drive() {
                if d.path.links.len() != d.path.travel_times.len() {
                    return Err(ScheduleError::Inconsistent {
                        task:   i,
                        reason: "drive path has mismatched link and travel-time counts".to_string(),
                    });
                }
            }
        }

        for (i, pair) in self.tasks.windows(2).enumerate() {
            let (prev, next) = (&pair[0], &pair[1]);
            if (prev.end() - next.begin()).abs() > TIME_EPSILON {
                return Err(ScheduleError::Inconsistent {
                    task:   i + 1,
                    reason: format!("begins at {} but previous task ends at {}", next.begin(), prev.end()),
                });
            }
            if prev.end_link() != next.start_link() {
                return Err(ScheduleError::Inconsistent {
                    task:   i + 1,
                    reason: format!("starts on link {} but previous task ends on {}", next.start_link(), prev.end_link()),
                });
            }
        }
        Ok(())
    }
}
