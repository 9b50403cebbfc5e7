//! Per-frame pipeline for one practice session
//!
//! The only component with side effects. Each frame is validated completely
//! before any state changes; a rejected frame leaves the session untouched.
//!
//! Order per accepted frame:
//! 1. trim expired trail points, push the smoothed point
//! 2. classify the raw step in view space, update movement history
//! 3. feed the hold FSM (or the directional gate once the base succeeded)
//! 4. publish a fresh snapshot

use std::sync::Arc;

use tracing::{debug, warn};

use super::events::SessionEvent;
use super::frame::{Frame, FrameSlot};
use crate::catalog::{is_absent_label, labels_match, Letter};
use crate::config::SessionConfig;
use crate::confirm::{HoldConfirmation, HoldSignal, PatternGate};
use crate::error::{ConfigResult, FrameError, FrameResult};
use crate::geometry::{CoordinateMapper, Point2D, Rotation};
use crate::movement::{global_direction, Movement, MovementClassifier, MovementHistory};
use crate::trajectory::{SmoothedTrajectoryBuffer, SnapshotPublisher, TrajectorySnapshot};

/// What the learner is asked to sign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureTarget {
    /// Label the sign model reports for the base letter shape
    pub label: String,
    /// Whether the diacritic stroke must follow the base hold
    pub directional: bool,
    /// Catalog letter credited on completion
    pub letter_id: Option<u8>,
}

impl GestureTarget {
    pub fn base(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            directional: false,
            letter_id: None,
        }
    }

    pub fn with_fathah(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            directional: true,
            letter_id: None,
        }
    }

    pub fn from_letter(letter: &Letter, with_fathah: bool) -> Self {
        Self {
            label: letter.gesture.to_string(),
            directional: with_fathah,
            letter_id: Some(letter.id),
        }
    }
}

pub struct TrajectoryOrchestrator {
    config: SessionConfig,
    target: GestureTarget,

    buffer: SmoothedTrajectoryBuffer,
    classifier: MovementClassifier,
    history: MovementHistory,
    hold: HoldConfirmation,
    gate: PatternGate,

    /// Reused while image/view/rotation/mirror stay the same
    mapper: Option<CoordinateMapper>,
    current_movement: Movement,
    last_timestamp_ms: Option<u64>,
    dropped_frames: u64,

    publisher: SnapshotPublisher,
}

impl TrajectoryOrchestrator {
    pub fn new(target: GestureTarget, config: SessionConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(target, config))
    }

    /// Session with default tuning
    pub fn with_defaults(target: GestureTarget) -> Self {
        Self::build(target, SessionConfig::default())
    }

    fn build(target: GestureTarget, config: SessionConfig) -> Self {
        debug!(label = %target.label, directional = target.directional, "session created");
        Self {
            buffer: SmoothedTrajectoryBuffer::new(config.smoothing.clone()),
            classifier: MovementClassifier::from_config(&config.classifier),
            history: MovementHistory::with_capacity(config.classifier.history_capacity),
            hold: HoldConfirmation::new(config.hold.clone()),
            gate: PatternGate::new(config.directional_pattern.clone()),
            mapper: None,
            current_movement: Movement::Unknown,
            last_timestamp_ms: None,
            dropped_frames: 0,
            publisher: SnapshotPublisher::new(),
            config,
            target,
        }
    }

    // ========================================================================
    // FRAME PATH
    // ========================================================================

    /// Run one frame through the pipeline and return the events it produced
    pub fn process_frame(&mut self, frame: &Frame) -> FrameResult<Vec<SessionEvent>> {
        self.try_process(frame).map_err(|err| {
            self.dropped_frames += 1;
            warn!(%err, timestamp_ms = frame.timestamp_ms, "frame dropped");
            err
        })
    }

    /// Process the pending frame in `slot`, if any
    pub fn drain(&mut self, slot: &mut FrameSlot) -> Option<FrameResult<Vec<SessionEvent>>> {
        slot.take().map(|frame| self.process_frame(&frame))
    }

    fn try_process(&mut self, frame: &Frame) -> FrameResult<Vec<SessionEvent>> {
        let now_ms = frame.timestamp_ms;
        if let Some(last_ms) = self.last_timestamp_ms {
            if now_ms < last_ms {
                return Err(FrameError::OutOfOrder {
                    timestamp_ms: now_ms,
                    last_ms,
                });
            }
        }

        let Some(raw) = frame.landmark else {
            self.last_timestamp_ms = Some(now_ms);
            return Ok(self.hand_lost(now_ms));
        };

        // Validation; nothing below mutates until all of it passes
        let rotation = validate_rotation(frame.rotation_degrees)?;
        let mapper = self.mapper_for(frame, rotation)?;
        let point = self.validate_landmark(raw)?;

        self.last_timestamp_ms = Some(now_ms);
        let mut events = Vec::new();

        // Trail
        self.buffer.trim_expired(now_ms);
        self.buffer.push_point(point, now_ms);

        // Direction
        let movement = self.classifier.update(mapper.map_to_view(point));
        self.current_movement = movement;
        if self.history.push(movement) {
            events.push(SessionEvent::Movement { movement });
        }

        // Confirmation
        let label = self.accepted_label(frame);
        let is_correct = label.is_some_and(|l| labels_match(l, &self.target.label));
        self.confirm(label, is_correct, movement.is_static(), now_ms, &mut events);

        self.mapper = Some(mapper);
        self.publish(now_ms);
        Ok(events)
    }

    fn confirm(
        &mut self,
        label: Option<&str>,
        is_correct: bool,
        is_static: bool,
        now_ms: u64,
        events: &mut Vec<SessionEvent>,
    ) {
        if self.hold.is_succeeded() {
            if let Some(label) = self.gate.evaluate(is_correct, &self.history) {
                events.push(SessionEvent::DirectionalPatternSucceeded { label });
                self.push_completion(events);
            }
            return;
        }

        match self.hold.on_frame(label, is_correct, is_static, now_ms) {
            HoldSignal::Progress(progress_percent) => {
                events.push(SessionEvent::BaseGestureHeld { progress_percent });
            }
            HoldSignal::Succeeded(label) => {
                events.push(SessionEvent::BaseGestureHeld { progress_percent: 100 });
                let directional = self.target.directional;
                if directional && self.gate.arm(&label) {
                    // The diacritic stroke starts from a still hand
                    self.history.seed(Movement::Static);
                    self.classifier.reset();
                }
                events.push(SessionEvent::BaseGestureSucceeded { label });
                if !directional {
                    self.push_completion(events);
                }
            }
            HoldSignal::Reset => events.push(SessionEvent::HoldReset),
            HoldSignal::Idle
            | HoldSignal::Debouncing { .. }
            | HoldSignal::Frozen(_)
            | HoldSignal::Done => {}
        }
    }

    fn push_completion(&self, events: &mut Vec<SessionEvent>) {
        if let Some(letter_id) = self.target.letter_id {
            debug!(letter_id, "letter completed");
            events.push(SessionEvent::LetterCompleted { letter_id });
        }
    }

    /// Label from the frame, unless it is low-confidence or an absent marker
    fn accepted_label<'f>(&self, frame: &'f Frame) -> Option<&'f str> {
        frame
            .gesture
            .as_ref()
            .filter(|g| g.confidence >= self.config.min_gesture_confidence)
            .map(|g| g.label.as_str())
            .filter(|l| !is_absent_label(l))
    }

    fn mapper_for(&self, frame: &Frame, rotation: Rotation) -> FrameResult<CoordinateMapper> {
        if let Some(mapper) = &self.mapper {
            if mapper.image_size() == frame.image_size
                && mapper.view_size() == frame.view_size
                && mapper.rotation() == rotation
                && mapper.is_mirrored() == frame.front_camera
            {
                return Ok(mapper.clone());
            }
        }
        Ok(CoordinateMapper::new(
            frame.image_size,
            frame.view_size,
            rotation,
            frame.front_camera,
        )?)
    }

    /// Finite and inside [-tol, 1 + tol] on both axes; returns the point
    /// clamped to [0, 1]
    fn validate_landmark(&self, raw: Point2D) -> FrameResult<Point2D> {
        let tol = self.config.coordinate_tolerance;
        let in_range = |v: f32| v.is_finite() && v >= -tol && v <= 1.0 + tol;
        if !(in_range(raw.x) && in_range(raw.y)) {
            return Err(FrameError::OutOfToleranceCoordinate {
                x: raw.x,
                y: raw.y,
                tolerance: tol,
            });
        }
        Ok(Point2D::new(raw.x.clamp(0.0, 1.0), raw.y.clamp(0.0, 1.0)))
    }

    fn publish(&self, now_ms: u64) {
        let samples = self.buffer.samples();
        let points = match &self.mapper {
            Some(mapper) => mapper.map_all_to_view(&self.buffer.as_list()),
            None => Vec::new(),
        };
        let snapshot = TrajectorySnapshot {
            ages_ms: if points.is_empty() {
                Vec::new()
            } else {
                samples.iter().map(|s| s.age_ms(now_ms)).collect()
            },
            global_direction: global_direction(&points, self.config.classifier.static_band_px),
            points,
            current_movement: self.current_movement,
            history: self.history.to_vec(),
            segments: self.buffer.detect_segments(),
            average_velocity: self.buffer.recent_velocity(),
            hold_progress: self.hold.progress(),
            timestamp_ms: now_ms,
        };
        self.publisher.publish(snapshot);
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// The hand left the frame: clear the trail and history, drop an
    /// unconfirmed hold. A pending reset delay keeps running and a confirmed
    /// base letter survives; if the diacritic is still pending its history
    /// restarts from the still baseline.
    pub fn hand_lost(&mut self, now_ms: u64) -> Vec<SessionEvent> {
        let was_tracking = self.classifier.last_position().is_some() || !self.buffer.is_empty();
        let mut events = Vec::new();

        self.buffer.clear();
        self.classifier.reset();
        self.history.clear();
        self.current_movement = Movement::Unknown;

        if self.hold.drop_hold() {
            events.push(SessionEvent::HoldReset);
        }
        if self.gate.is_armed() {
            self.history.seed(Movement::Static);
        }

        if was_tracking {
            debug!(now_ms, "hand lost");
            events.insert(0, SessionEvent::HandLost);
        }
        self.publish(now_ms);
        events
    }

    /// Start the session over with the same target and config
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.classifier.reset();
        self.history.clear();
        self.hold.reset();
        self.gate.reset();
        self.mapper = None;
        self.current_movement = Movement::Unknown;
        self.last_timestamp_ms = None;
        self.publisher.clear();
        debug!(label = %self.target.label, "session reset");
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    /// View-space trail, oldest first, as last published
    pub fn trajectory_points(&self) -> Vec<Point2D> {
        self.publisher.latest().points.clone()
    }

    pub fn snapshot(&self) -> Arc<TrajectorySnapshot> {
        self.publisher.latest()
    }

    /// Handle for readers on other threads
    pub fn publisher(&self) -> SnapshotPublisher {
        self.publisher.clone()
    }

    pub fn current_movement(&self) -> Movement {
        self.current_movement
    }

    pub fn history(&self) -> &MovementHistory {
        &self.history
    }

    pub fn hold_progress(&self) -> u8 {
        self.hold.progress()
    }

    pub fn hold(&self) -> &HoldConfirmation {
        &self.hold
    }

    pub fn gate(&self) -> &PatternGate {
        &self.gate
    }

    pub fn buffer(&self) -> &SmoothedTrajectoryBuffer {
        &self.buffer
    }

    pub fn target(&self) -> &GestureTarget {
        &self.target
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn last_timestamp_ms(&self) -> Option<u64> {
        self.last_timestamp_ms
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Base letter confirmed, and the diacritic too when one is required
    pub fn is_complete(&self) -> bool {
        self.hold.is_succeeded() && (!self.target.directional || self.gate.is_latched())
    }
}

/// Quarter turns only. Anything else is a caller bug: it trips a debug
/// assertion and is rejected as a dropped frame in release builds.
fn validate_rotation(degrees: i32) -> FrameResult<Rotation> {
    let rotation = Rotation::from_degrees(degrees);
    debug_assert!(rotation.is_ok(), "invalid rotation {degrees}°");
    Ok(rotation?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size2D;

    const VIEW: Size2D = Size2D::new(1000, 1000);

    fn frame(ts: u64, x: f32, y: f32) -> Frame {
        Frame::with_landmark(ts, Point2D::new(x, y), VIEW, VIEW)
    }

    fn base_session() -> TrajectoryOrchestrator {
        TrajectoryOrchestrator::with_defaults(GestureTarget::base("ba"))
    }

    #[test]
    fn test_first_frame_is_static() {
        let mut session = base_session();
        let events = session.process_frame(&frame(0, 0.5, 0.5)).unwrap();
        assert_eq!(session.current_movement(), Movement::Static);
        assert_eq!(events, vec![SessionEvent::Movement { movement: Movement::Static }]);
        assert_eq!(session.trajectory_points().len(), 1);
    }

    #[test]
    fn test_out_of_tolerance_leaves_state_untouched() {
        let mut session = base_session();
        session.process_frame(&frame(0, 0.5, 0.5)).unwrap();
        let before = session.buffer().as_list();

        let err = session.process_frame(&frame(33, 1.15, 0.5)).unwrap_err();
        assert!(matches!(err, FrameError::OutOfToleranceCoordinate { .. }));
        assert_eq!(session.buffer().as_list(), before);
        assert_eq!(session.last_timestamp_ms(), Some(0));
        assert_eq!(session.dropped_frames(), 1);
    }

    #[test]
    fn test_tolerated_overshoot_is_clamped() {
        let mut session = base_session();
        session.process_frame(&frame(0, 1.05, -0.05)).unwrap();
        assert_eq!(session.buffer().latest(), Some(Point2D::new(1.0, 0.0)));
    }

    #[test]
    fn test_late_frame_dropped() {
        let mut session = base_session();
        session.process_frame(&frame(100, 0.5, 0.5)).unwrap();
        let err = session.process_frame(&frame(50, 0.5, 0.5)).unwrap_err();
        assert_eq!(err, FrameError::OutOfOrder { timestamp_ms: 50, last_ms: 100 });
        assert_eq!(session.buffer().len(), 1);
    }

    #[test]
    fn test_degenerate_view_dropped() {
        let mut session = base_session();
        let bad = Frame::with_landmark(0, Point2D::new(0.5, 0.5), VIEW, Size2D::new(0, 0));
        let err = session.process_frame(&bad).unwrap_err();
        assert!(matches!(err, FrameError::DegenerateViewSize(_)));
        assert!(session.buffer().is_empty());
        assert!(session.history().is_empty());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "rotation"))]
    fn test_invalid_rotation_rejected() {
        let mut session = base_session();
        let err = session.process_frame(&frame(0, 0.5, 0.5).rotated(45)).unwrap_err();
        assert_eq!(err, FrameError::InvalidRotation(45));
    }

    #[test]
    fn test_low_confidence_label_ignored() {
        let mut session = base_session();
        let events = session
            .process_frame(&frame(0, 0.5, 0.5).gesture("ba", 0.3))
            .unwrap();
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::BaseGestureHeld { .. })));
        assert!(session.hold().state().active_label.is_none());
    }

    #[test]
    fn test_hand_lost_keeps_confirmed_base() {
        let mut session = TrajectoryOrchestrator::with_defaults(GestureTarget::with_fathah("ba"));
        for t in (0..=2000).step_by(500) {
            session.process_frame(&frame(t, 0.5, 0.5).gesture("ba", 0.9)).unwrap();
        }
        assert!(session.hold().is_succeeded());
        assert!(session.gate().is_armed());

        let events = session.hand_lost(2100);
        assert_eq!(events, vec![SessionEvent::HandLost]);
        assert!(session.buffer().is_empty());
        assert!(session.hold().is_succeeded());
        assert_eq!(session.history().to_vec(), vec![Movement::Static]);
        assert!(session.hand_lost(2200).is_empty());
    }

    #[test]
    fn test_hand_lost_resets_unconfirmed_hold() {
        let mut session = base_session();
        session.process_frame(&frame(0, 0.5, 0.5).gesture("ba", 0.9)).unwrap();
        session.process_frame(&frame(500, 0.5, 0.5).gesture("ba", 0.9)).unwrap();
        assert_eq!(session.hold_progress(), 25);

        let events = session.hand_lost(600);
        assert_eq!(events, vec![SessionEvent::HandLost, SessionEvent::HoldReset]);
        assert_eq!(session.hold_progress(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_no_hand_frame_counts_as_hand_lost() {
        let mut session = base_session();
        session.process_frame(&frame(0, 0.5, 0.5)).unwrap();
        let mut empty = frame(33, 0.5, 0.5);
        empty.landmark = None;
        assert_eq!(session.process_frame(&empty).unwrap(), vec![SessionEvent::HandLost]);
        assert!(session.trajectory_points().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut session = base_session();
        session.process_frame(&frame(0, 0.5, 0.5).gesture("ba", 0.9)).unwrap();
        session.reset();
        session.reset();
        assert!(session.buffer().is_empty());
        assert_eq!(session.last_timestamp_ms(), None);
        assert!(session.snapshot().is_empty());
        // Earlier timestamps are accepted again after a reset
        assert!(session.process_frame(&frame(0, 0.5, 0.5)).is_ok());
    }

    #[test]
    fn test_drain_processes_latest_only() {
        let mut session = base_session();
        let mut slot = FrameSlot::new();
        slot.offer(frame(0, 0.1, 0.1));
        slot.offer(frame(33, 0.9, 0.9));
        assert!(session.drain(&mut slot).is_some_and(|r| r.is_ok()));
        assert!(session.drain(&mut slot).is_none());
        assert_eq!(session.buffer().latest(), Some(Point2D::new(0.9, 0.9)));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SessionConfig::default();
        config.hold.required_duration_ms = 0;
        assert!(TrajectoryOrchestrator::new(GestureTarget::base("ba"), config).is_err());
    }

    #[test]
    fn test_base_success_restarts_direction_from_still() {
        let mut session = TrajectoryOrchestrator::with_defaults(GestureTarget::with_fathah("ba"));
        for t in (0..=2000).step_by(500) {
            session.process_frame(&frame(t, 0.5, 0.5).gesture("ba", 0.9)).unwrap();
        }
        assert!(session.gate().is_armed());

        // First frame after the hold has nothing to compare against
        session.process_frame(&frame(2033, 0.7, 0.5).gesture("ba", 0.9)).unwrap();
        assert_eq!(session.current_movement(), Movement::Static);
        assert_eq!(session.history().to_vec(), vec![Movement::Static]);
    }

    #[test]
    fn test_completion_only_for_catalog_targets() {
        let mut session = base_session();
        let mut events = Vec::new();
        for t in (0..=2000).step_by(500) {
            events.extend(session.process_frame(&frame(t, 0.5, 0.5).gesture("ba", 0.9)).unwrap());
        }
        assert!(session.is_complete());
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::LetterCompleted { .. })));
    }

    #[test]
    fn test_snapshot_carries_fast_segments() {
        let mut session = base_session();
        for (i, x) in [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8].iter().enumerate() {
            session.process_frame(&frame(i as u64 * 33, *x, 0.5)).unwrap();
        }
        let snapshot = session.snapshot();
        assert_eq!(snapshot.points.len(), 8);
        assert_eq!(snapshot.segments, session.buffer().detect_segments());
        assert!(!snapshot.segments.is_empty());
        assert!(snapshot.average_velocity > 0.0);
    }
}
