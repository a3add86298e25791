//! Task types: `Stay`, `Drive`, and `Stop`.
//!
//! # Timing
//!
//! Every task occupies `[begin, end)`.  A `Drive`'s interval is derived from
//! its [`LinkPath`], so diverting the path moves its end automatically.
//!
//! # Diversion
//!
//! A vehicle in the middle of a drive cannot turn before it reaches the end
//! of the link it is on.  [`DriveTask::diversion_point`] names that link and
//! the earliest time the turn can happen; everything on the path up to the
//! diversion point is physically committed and survives
//! [`DriveTask::divert`].

use std::collections::BTreeSet;
use std::fmt;

use fb_core::{LinkId, RequestId};
use fb_network::LinkPath;

use crate::{ScheduleError, ScheduleResult};

// ── TaskKind ──────────────────────────────────────────────────────────────────

/// Discriminant of a [`Task`], also used as the vehicle state on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Stay,
    Drive,
    Stop,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Stay  => "stay",
            TaskKind::Drive => "drive",
            TaskKind::Stop  => "stop",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── StayTask ──────────────────────────────────────────────────────────────────

/// Idle on a link, either waiting for a stop's earliest start or parked at
/// the end of the schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct StayTask {
    pub link:  LinkId,
    pub begin: f64,
    pub end:   f64,
}

// ── StopTask ──────────────────────────────────────────────────────────────────

/// Serve passengers on a link.
///
/// Dropoffs happen when the stop begins, pickups when it ends.
#[derive(Clone, Debug, PartialEq)]
pub struct StopTask {
    pub link:     LinkId,
    pub begin:    f64,
    pub end:      f64,
    pub pickups:  BTreeSet<RequestId>,
    pub dropoffs: BTreeSet<RequestId>,
}

impl StopTask {
    pub fn serves(&self, request: RequestId) -> bool {
        self.pickups.contains(&request) || self.dropoffs.contains(&request)
    }
}

// ── DriveTask ─────────────────────────────────────────────────────────────────

/// Live position of a vehicle inside a started drive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriveTracker {
    /// Index into the drive's `LinkPath::links`.
    pub current_link_idx: usize,
    /// Time the vehicle entered that link.
    pub enter_time:       f64,
}

/// The earliest place and time at which a drive can change course.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DiversionPoint {
    pub link:     LinkId,
    /// Index of `link` in the drive's path.
    pub link_idx: usize,
    pub time:     f64,
}

/// Move along a timed link path.
#[derive(Clone, Debug, PartialEq)]
pub struct DriveTask {
    pub path:    LinkPath,
    /// `None` until the host simulation starts moving the vehicle.
    pub tracker: Option<DriveTracker>,
}

impl DriveTask {
    pub fn new(path: LinkPath) -> Self {
        Self { path, tracker: None }
    }

    #[inline]
    pub fn begin(&self) -> f64 {
        self.path.departure
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.path.arrival_time()
    }

    /// Index of the link the vehicle is on.  A drive that has not been
    /// tracked yet is still on its first link.
    pub fn current_link_idx(&self) -> usize {
        self.tracker.map_or(0, |t| t.current_link_idx)
    }

    pub fn current_link(&self) -> LinkId {
        self.path.links[self.current_link_idx()]
    }

    /// Time the vehicle frees its current link.
    pub fn current_link_exit_time(&self) -> f64 {
        self.path.link_exit_time(self.current_link_idx())
    }

    /// Move the tracker to the link occupied at `now`.
    pub fn track(&mut self, now: f64) {
        let idx = self.path.link_index_at(now);
        self.tracker = Some(DriveTracker {
            current_link_idx: idx,
            enter_time:       self.path.link_enter_time(idx),
        });
    }

    /// The end of the current link, or `now` if the vehicle is running late.
    pub fn diversion_point(&self, now: f64) -> DiversionPoint {
        let idx = self.current_link_idx();
        DiversionPoint {
            link:     self.path.links[idx],
            link_idx: idx,
            time:     now.max(self.path.link_exit_time(idx)),
        }
    }

    /// Replace everything after the diversion point with `new_path`.
    ///
    /// `new_path` must start on the diversion link at the diversion time;
    /// its first link (travel time 0) is merged with the committed prefix,
    /// whose last travel time stretches to reach `new_path.departure`.
    pub fn divert(&mut self, new_path: LinkPath) -> ScheduleResult<()> {
        let idx = self.current_link_idx();
        let expected = self.path.links[idx];
        if new_path.from_link() != expected {
            return Err(ScheduleError::DiversionMismatch { expected, found: new_path.from_link() });
        }

        let enter = self.path.link_enter_time(idx);
        self.path.links.truncate(idx + 1);
        self.path.travel_times.truncate(idx + 1);
        self.path.travel_times[idx] = (new_path.departure - enter).max(0.0);

        self.path.links.extend_from_slice(&new_path.links[1..]);
        self.path.travel_times.extend_from_slice(&new_path.travel_times[1..]);
        Ok(())
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

/// One entry of a vehicle's [`Schedule`](crate::Schedule).
#[derive(Clone, Debug, PartialEq)]
pub enum Task {
    Stay(StayTask),
    Drive(DriveTask),
    Stop(StopTask),
}

impl Task {
    pub fn stay(link: LinkId, begin: f64, end: f64) -> Self {
        Task::Stay(StayTask { link, begin, end })
    }

    pub fn drive(path: LinkPath) -> Self {
        Task::Drive(DriveTask::new(path))
    }

    pub fn stop(link: LinkId, begin: f64, end: f64) -> Self {
        Task::Stop(StopTask {
            link,
            begin,
            end,
            pickups:  BTreeSet::new(),
            dropoffs: BTreeSet::new(),
        })
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Task::Stay(_)  => TaskKind::Stay,
            Task::Drive(_) => TaskKind::Drive,
            Task::Stop(_)  => TaskKind::Stop,
        }
    }

    pub fn begin(&self) -> f64 {
        match self {
            Task::Stay(s)  => s.begin,
            Task::Drive(d) => d.begin(),
            Task::Stop(s)  => s.begin,
        }
    }

    pub fn end(&self) -> f64 {
        match self {
            Task::Stay(s)  => s.end,
            Task::Drive(d) => d.end(),
            Task::Stop(s)  => s.end,
        }
    }

    pub fn start_link(&self) -> LinkId {
        match self {
            Task::Stay(s)  => s.link,
            Task::Drive(d) => d.path.from_link(),
            Task::Stop(s)  => s.link,
        }
    }

    pub fn end_link(&self) -> LinkId {
        match self {
            Task::Stay(s)  => s.link,
            Task::Drive(d) => d.path.to_link(),
            Task::Stop(s)  => s.link,
        }
    }

    pub fn as_stop(&self) -> Option<&StopTask> {
        match self {
            Task::Stop(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_drive(&self) -> Option<&DriveTask> {
        match self {
            Task::Drive(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_drive_mut(&mut self) -> Option<&mut DriveTask> {
        match self {
            Task::Drive(d) => Some(d),
            _ => None,
        }
    }
}
