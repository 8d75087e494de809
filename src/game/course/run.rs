use std::{
    collections::{BTreeMap, HashSet},
    time::Duration,
};

use bevy::prelude::*;

use super::{
    config::{CheckpointPolicy, Course},
    proximity::{ZoneId, ZoneKind, is_inside},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// Transition produced by [`CourseRun`]. Split and final times are measured from start entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CourseEvent {
    Started,
    CheckpointReached {
        index: usize,
        split: Duration,
    },
    Finished {
        final_time: Duration,
        checkpoint_times: BTreeMap<usize, Duration>,
    },
    /// Cooldown after a finish elapsed, the start zone accepts a new run.
    Rearmed,
}

/// The timed run over a [`Course`].
///
/// Owns edge detection of zone entries so a zone fires once per visit, not once per
/// frame the tracked entity stays inside it. All timestamps are the caller's clock.
#[derive(Resource, Debug, Clone, Default)]
pub struct CourseRun {
    state: RunState,
    started_at: Option<Duration>,
    finished_at: Option<Duration>,
    checkpoint_times: BTreeMap<usize, Duration>,
    final_time: Option<Duration>,
    occupied: HashSet<ZoneId>,
}

impl CourseRun {
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn checkpoint_times(&self) -> &BTreeMap<usize, Duration> {
        &self.checkpoint_times
    }

    pub fn final_time(&self) -> Option<Duration> {
        self.final_time
    }

    /// Time shown on the stopwatch: live while running, frozen once finished.
    pub fn elapsed(&self, now: Duration) -> Duration {
        match (self.state, self.started_at) {
            (RunState::Running, Some(start)) => now.saturating_sub(start),
            (RunState::Finished, _) => self.final_time.unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }

    /// Feeds one frame worth of tracked position into the run.
    ///
    /// Expires the finish cooldown first, then fires every zone the position entered this
    /// frame in the course's zone order.
    pub fn observe(&mut self, course: &Course, position: Vec3, now: Duration) -> Vec<CourseEvent> {
        let mut events = Vec::new();
        events.extend(self.tick(course, now));

        for zone in course.zones() {
            if is_inside(position, zone) {
                if self.occupied.insert(zone.id) {
                    events.extend(self.zone_entered(course, zone.kind, now));
                }
            } else {
                self.occupied.remove(&zone.id);
            }
        }
        events
    }

    /// Re-arms the start zone once the finish cooldown elapsed.
    pub fn tick(&mut self, course: &Course, now: Duration) -> Option<CourseEvent> {
        let finished_at = self.finished_at?;
        if self.state != RunState::Finished || now.saturating_sub(finished_at) < course.cooldown {
            return None;
        }
        self.state = RunState::Idle;
        self.finished_at = None;
        Some(CourseEvent::Rearmed)
    }

    /// Applies a single "just entered" edge. Anything the table below doesn't list is a no-op.
    ///
    /// | state    | zone       | result                          |
    /// |----------|------------|---------------------------------|
    /// | Idle     | Start      | Running, timer restarts         |
    /// | Running  | Checkpoint | split recorded on first visit   |
    /// | Running  | End        | Finished, final time frozen     |
    pub fn zone_entered(&mut self, course: &Course, kind: ZoneKind, now: Duration) -> Option<CourseEvent> {
        match (self.state, kind) {
            (RunState::Idle, ZoneKind::Start) => {
                self.state = RunState::Running;
                self.started_at = Some(now);
                self.finished_at = None;
                self.final_time = None;
                self.checkpoint_times.clear();
                Some(CourseEvent::Started)
            }
            (RunState::Running, ZoneKind::Checkpoint(index)) => {
                if self.checkpoint_times.contains_key(&index) {
                    return None;
                }
                if course.policy == CheckpointPolicy::InOrder && index != self.checkpoint_times.len() {
                    debug!(
                        "Checkpoint {} skipped, expected {} first",
                        index + 1,
                        self.checkpoint_times.len() + 1
                    );
                    return None;
                }
                let split = now.saturating_sub(self.started_at?);
                self.checkpoint_times.insert(index, split);
                Some(CourseEvent::CheckpointReached { index, split })
            }
            (RunState::Running, ZoneKind::End) => {
                if course.policy == CheckpointPolicy::InOrder
                    && self.checkpoint_times.len() < course.checkpoint_count()
                {
                    debug!(
                        "Finish ignored, {}/{} checkpoints visited",
                        self.checkpoint_times.len(),
                        course.checkpoint_count()
                    );
                    return None;
                }
                let final_time = now.saturating_sub(self.started_at?);
                self.state = RunState::Finished;
                self.final_time = Some(final_time);
                self.finished_at = Some(now);
                Some(CourseEvent::Finished {
                    final_time,
                    checkpoint_times: self.checkpoint_times.clone(),
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::course::config::{CheckpointConfig, CourseConfig, ZoneConfig};

    fn course(policy: CheckpointPolicy) -> Course {
        let zone = |x: f32| ZoneConfig {
            position: [x, 0.0, 0.0],
            radius: 2.0,
        };
        let checkpoint = |index: usize, x: f32| CheckpointConfig {
            index,
            position: [x, 0.0, 0.0],
            radius: 2.0,
            facing: 0.0,
        };
        CourseConfig {
            start: Some(zone(0.0)),
            end: Some(zone(30.0)),
            checkpoints: vec![checkpoint(0, 10.0), checkpoint(1, 20.0)],
            obstacles: Vec::new(),
            cooldown_ms: 2000,
            checkpoint_policy: policy,
        }
        .build()
        .unwrap()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn at(x: f32) -> Vec3 {
        Vec3::new(x, 0.0, 0.0)
    }

    #[test]
    fn test_full_run_emits_each_event_once() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();
        let mut events = Vec::new();

        // Walk the course in 100ms frames at 1 unit per frame.
        for frame in 0..=35u64 {
            events.extend(run.observe(&course, at(frame as f32), ms(frame * 100)));
        }

        let started = events.iter().filter(|e| **e == CourseEvent::Started).count();
        let checkpoints = events
            .iter()
            .filter(|e| matches!(e, CourseEvent::CheckpointReached { .. }))
            .count();
        let finished: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                CourseEvent::Finished {
                    final_time,
                    checkpoint_times,
                } => Some((*final_time, checkpoint_times.clone())),
                _ => None,
            })
            .collect();

        assert_eq!(started, 1);
        assert_eq!(checkpoints, 2);
        assert_eq!(finished.len(), 1);
        // Entered start at x=0, checkpoint 0 at x=9, checkpoint 1 at x=19, end at x=29.
        assert_eq!(finished[0].0, ms(2900));
        assert_eq!(finished[0].1[&0], ms(900));
        assert_eq!(finished[0].1[&1], ms(1900));
        assert_eq!(run.state(), RunState::Finished);

        // Still finished just before the cooldown ends, idle right after.
        assert!(run.observe(&course, at(40.0), ms(2900 + 1999)).is_empty());
        assert_eq!(run.state(), RunState::Finished);
        let events = run.observe(&course, at(40.0), ms(2900 + 2000));
        assert_eq!(events, vec![CourseEvent::Rearmed]);
        assert_eq!(run.state(), RunState::Idle);
    }

    #[test]
    fn test_start_reentry_does_not_restart() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();

        let events = run.observe(&course, Vec3::new(1.5, 0.0, 0.0), ms(100));
        assert_eq!(events, vec![CourseEvent::Started]);
        assert_eq!(run.state(), RunState::Running);

        run.observe(&course, at(5.0), ms(200));
        let events = run.observe(&course, at(0.5), ms(300));
        assert!(events.is_empty());
        assert_eq!(run.state(), RunState::Running);
        assert_eq!(run.elapsed(ms(1100)), ms(1000));
    }

    #[test]
    fn test_checkpoint_revisit_is_idempotent() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();
        run.zone_entered(&course, ZoneKind::Start, ms(0));
        run.zone_entered(&course, ZoneKind::Checkpoint(0), ms(500));
        let before = run.checkpoint_times().clone();

        assert!(run.zone_entered(&course, ZoneKind::Checkpoint(0), ms(900)).is_none());
        run.observe(&course, at(10.0), ms(1000));
        run.observe(&course, at(15.0), ms(1100));
        run.observe(&course, at(10.0), ms(1200));
        assert_eq!(run.checkpoint_times(), &before);
    }

    #[test]
    fn test_end_while_idle_is_ignored() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();

        assert!(run.observe(&course, at(30.0), ms(100)).is_empty());
        assert_eq!(run.state(), RunState::Idle);
        assert_eq!(run.final_time(), None);
        assert!(run.zone_entered(&course, ZoneKind::Checkpoint(0), ms(200)).is_none());
    }

    #[test]
    fn test_out_of_order_checkpoints_recorded_by_default() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();
        run.zone_entered(&course, ZoneKind::Start, ms(0));

        let event = run.zone_entered(&course, ZoneKind::Checkpoint(1), ms(400));
        assert_eq!(
            event,
            Some(CourseEvent::CheckpointReached {
                index: 1,
                split: ms(400)
            })
        );
        assert!(run.zone_entered(&course, ZoneKind::End, ms(800)).is_some());
        assert_eq!(run.final_time(), Some(ms(800)));
    }

    #[test]
    fn test_in_order_policy_rejects_skips() {
        let course = course(CheckpointPolicy::InOrder);
        let mut run = CourseRun::default();
        run.zone_entered(&course, ZoneKind::Start, ms(0));

        assert!(run.zone_entered(&course, ZoneKind::Checkpoint(1), ms(100)).is_none());
        assert!(run.zone_entered(&course, ZoneKind::End, ms(150)).is_none());
        assert_eq!(run.state(), RunState::Running);

        assert!(run.zone_entered(&course, ZoneKind::Checkpoint(0), ms(200)).is_some());
        assert!(run.zone_entered(&course, ZoneKind::Checkpoint(1), ms(300)).is_some());
        assert!(run.zone_entered(&course, ZoneKind::End, ms(400)).is_some());
        assert_eq!(run.state(), RunState::Finished);
    }

    #[test]
    fn test_new_run_clears_previous_splits() {
        let course = course(CheckpointPolicy::AnyOrder);
        let mut run = CourseRun::default();
        run.zone_entered(&course, ZoneKind::Start, ms(0));
        run.zone_entered(&course, ZoneKind::Checkpoint(0), ms(100));
        run.zone_entered(&course, ZoneKind::End, ms(200));
        assert_eq!(run.elapsed(ms(5000)), ms(200));

        // Entering start during the cooldown does nothing.
        assert!(run.zone_entered(&course, ZoneKind::Start, ms(300)).is_none());

        run.tick(&course, ms(2200));
        assert_eq!(run.zone_entered(&course, ZoneKind::Start, ms(3000)), Some(CourseEvent::Started));
        assert!(run.checkpoint_times().is_empty());
        assert_eq!(run.final_time(), None);
    }
}
