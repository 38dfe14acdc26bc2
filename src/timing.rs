//! Frame budgets for template animations.
//!
//! All templates render at [`FPS`]. A requested duration is split into
//! entrance, stagger, hold and exit phases measured in whole frames. The hold
//! phase never drops below [`min_hold_frames`]; when entrance and exit alone
//! need more than the remaining budget, the timeline runs past the requested
//! length and the renderer decides how to clip (see [`PhaseTiming::clipped_to`]).

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const FPS: u32 = 30;
pub const MIN_HOLD_SECONDS: f64 = 0.5;

const BEFORE_AFTER_HOLD_BEFORE_SECONDS: f64 = 1.0;
const BEFORE_AFTER_TRANSITION_SECONDS: f64 = 1.5;
const BEFORE_AFTER_EXIT_SECONDS: f64 = 0.5;
const SPLIT_TRANSITION_SECONDS: f64 = 0.5;
const SPLIT_STAGGER_SECONDS: f64 = 0.2;
const PIP_ENTRANCE_AT_SECONDS: f64 = 0.5;
const PIP_ENTRANCE_SECONDS: f64 = 0.5;

/// Per-template phase lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseConstants {
    pub entrance: f64,
    pub stagger: f64,
    pub exit: f64,
}

pub const STAT_COUNTER_PHASES: PhaseConstants = PhaseConstants {
    entrance: 2.0,
    stagger: 0.3,
    exit: 0.5,
};

pub const PROGRESS_BAR_PHASES: PhaseConstants = PhaseConstants {
    entrance: 1.5,
    stagger: 0.4,
    exit: 0.5,
};

/// Process flow reveals steps one after another; stagger is unused.
pub const PROCESS_FLOW_PHASES: PhaseConstants = PhaseConstants {
    entrance: 1.0,
    stagger: 0.0,
    exit: 0.5,
};

/// How the entrance phase scales with the number of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntranceShape {
    /// One entrance plus a stagger offset per additional item.
    Staggered,
    /// One full entrance per item, back to back.
    Sequential,
    /// All items share a single entrance.
    Simultaneous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTiming {
    pub entrance_frames: u32,
    pub stagger_frames: u32,
    /// Frames from the first entrance start to the last entrance end.
    pub entrance_span_frames: u32,
    pub hold_frames: u32,
    pub exit_frames: u32,
    /// `round(fps * duration)`; the budget the phases were fitted into.
    pub total_frames: u32,
}

impl PhaseTiming {
    /// Length of the phases laid end to end.
    pub fn timeline_frames(&self) -> u32 {
        self.entrance_span_frames
            .saturating_add(self.hold_frames)
            .saturating_add(self.exit_frames)
    }

    /// Frames the timeline runs past `total_frames`.
    pub fn overrun_frames(&self) -> u32 {
        self.timeline_frames().saturating_sub(self.total_frames)
    }

    /// Renderer-side trim to exactly `total_frames`: exit shrinks first, then
    /// hold, then the entrance span. The hold floor does not apply here.
    pub fn clipped_to(&self, total_frames: u32) -> PhaseTiming {
        let mut clipped = *self;
        clipped.total_frames = total_frames;
        let mut excess = self.timeline_frames().saturating_sub(total_frames);

        for phase in [
            &mut clipped.exit_frames,
            &mut clipped.hold_frames,
            &mut clipped.entrance_span_frames,
        ] {
            let cut = excess.min(*phase);
            *phase -= cut;
            excess -= cut;
        }
        clipped
    }
}

pub fn seconds_to_frames(fps: u32, seconds: f64) -> u32 {
    let frames = (f64::from(fps) * seconds).round();
    if frames.is_sign_negative() || !frames.is_finite() {
        0
    } else {
        frames as u32
    }
}

pub fn min_hold_frames(fps: u32) -> u32 {
    seconds_to_frames(fps, MIN_HOLD_SECONDS)
}

/// Fits `item_count` items into `duration_seconds` at `fps`.
pub fn allocate(
    fps: u32,
    duration_seconds: f64,
    item_count: usize,
    constants: PhaseConstants,
    shape: EntranceShape,
) -> PhaseTiming {
    let total_frames = seconds_to_frames(fps, duration_seconds);
    let entrance_frames = seconds_to_frames(fps, constants.entrance);
    let stagger_frames = seconds_to_frames(fps, constants.stagger);
    let exit_frames = seconds_to_frames(fps, constants.exit);
    let items = u32::try_from(item_count).unwrap_or(u32::MAX);

    let entrance_span_frames = match shape {
        EntranceShape::Staggered => entrance_frames
            .saturating_add(items.saturating_sub(1).saturating_mul(stagger_frames)),
        EntranceShape::Sequential => items.saturating_mul(entrance_frames),
        EntranceShape::Simultaneous => entrance_frames,
    };

    let remaining =
        i64::from(total_frames) - i64::from(entrance_span_frames) - i64::from(exit_frames);
    let hold_frames = remaining.max(i64::from(min_hold_frames(fps))) as u32;

    let timing = PhaseTiming {
        entrance_frames,
        stagger_frames,
        entrance_span_frames,
        hold_frames,
        exit_frames,
        total_frames,
    };
    if timing.overrun_frames() > 0 {
        debug!(
            total_frames,
            overrun = timing.overrun_frames(),
            "phase timeline exceeds requested duration"
        );
    }
    timing
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeforeAfterTiming {
    pub hold_before_frames: u32,
    pub transition_duration: u32,
    pub hold_after_frames: u32,
    pub exit_frames: u32,
    pub total_frames: u32,
}

impl BeforeAfterTiming {
    pub fn timeline_frames(&self) -> u32 {
        self.hold_before_frames
            .saturating_add(self.transition_duration)
            .saturating_add(self.hold_after_frames)
            .saturating_add(self.exit_frames)
    }
}

/// Before/after reveal: fixed hold on "before", fixed transition, the rest on
/// "after" (never below the hold floor), then a short exit.
pub fn allocate_before_after(fps: u32, duration_seconds: f64) -> BeforeAfterTiming {
    let total_frames = seconds_to_frames(fps, duration_seconds);
    let hold_before_frames = seconds_to_frames(fps, BEFORE_AFTER_HOLD_BEFORE_SECONDS);
    let transition_duration = seconds_to_frames(fps, BEFORE_AFTER_TRANSITION_SECONDS);
    let exit_frames = seconds_to_frames(fps, BEFORE_AFTER_EXIT_SECONDS);

    let remaining = i64::from(total_frames)
        - i64::from(hold_before_frames)
        - i64::from(transition_duration)
        - i64::from(exit_frames);
    let hold_after_frames = remaining.max(i64::from(min_hold_frames(fps))) as u32;

    BeforeAfterTiming {
        hold_before_frames,
        transition_duration,
        hold_after_frames,
        exit_frames,
        total_frames,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitScreenTiming {
    pub transition_duration: u32,
    pub stagger_delay: u32,
    pub total_frames: u32,
}

pub fn allocate_split_screen(fps: u32, duration_seconds: f64) -> SplitScreenTiming {
    SplitScreenTiming {
        transition_duration: seconds_to_frames(fps, SPLIT_TRANSITION_SECONDS),
        stagger_delay: seconds_to_frames(fps, SPLIT_STAGGER_SECONDS),
        total_frames: seconds_to_frames(fps, duration_seconds),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipTiming {
    pub entrance_frame: u32,
    pub entrance_duration: u32,
    pub total_frames: u32,
}

pub fn allocate_picture_in_picture(fps: u32, duration_seconds: f64) -> PipTiming {
    PipTiming {
        entrance_frame: seconds_to_frames(fps, PIP_ENTRANCE_AT_SECONDS),
        entrance_duration: seconds_to_frames(fps, PIP_ENTRANCE_SECONDS),
        total_frames: seconds_to_frames(fps, duration_seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_counter_budget_fits_long_durations() {
        let timing = allocate(FPS, 8.0, 3, STAT_COUNTER_PHASES, EntranceShape::Staggered);
        assert_eq!(timing.total_frames, 240);
        assert_eq!(timing.entrance_frames, 60);
        assert_eq!(timing.stagger_frames, 9);
        assert_eq!(timing.entrance_span_frames, 78);
        assert_eq!(timing.exit_frames, 15);
        assert_eq!(timing.hold_frames, 147);
        assert_eq!(timing.timeline_frames(), 240);
        assert_eq!(timing.overrun_frames(), 0);
    }

    #[test]
    fn hold_floor_wins_on_short_durations() {
        let timing = allocate(FPS, 2.0, 4, PROGRESS_BAR_PHASES, EntranceShape::Staggered);
        // 45 + 3 * 12 = 81 entrance frames against a 60 frame budget.
        assert_eq!(timing.entrance_span_frames, 81);
        assert_eq!(timing.hold_frames, min_hold_frames(FPS));
        assert_eq!(timing.timeline_frames(), 111);
        assert_eq!(timing.overrun_frames(), 51);
    }

    #[test]
    fn sequential_entrance_ignores_stagger() {
        let timing = allocate(FPS, 9.0, 3, PROCESS_FLOW_PHASES, EntranceShape::Sequential);
        assert_eq!(timing.stagger_frames, 0);
        assert_eq!(timing.entrance_span_frames, 90);
        assert_eq!(timing.hold_frames, 270 - 90 - 15);
    }

    #[test]
    fn simultaneous_entrance_uses_one_entrance() {
        let timing = allocate(FPS, 9.0, 5, PROCESS_FLOW_PHASES, EntranceShape::Simultaneous);
        assert_eq!(timing.entrance_span_frames, 30);
    }

    #[test]
    fn hold_floor_holds_across_inputs() {
        for duration in [0.1, 0.5, 1.0, 3.3, 7.0, 20.0] {
            for items in 0..8 {
                for (constants, shape) in [
                    (STAT_COUNTER_PHASES, EntranceShape::Staggered),
                    (PROGRESS_BAR_PHASES, EntranceShape::Staggered),
                    (PROCESS_FLOW_PHASES, EntranceShape::Sequential),
                ] {
                    let timing = allocate(FPS, duration, items, constants, shape);
                    assert!(timing.hold_frames >= min_hold_frames(FPS));
                }
            }
        }
    }

    #[test]
    fn clipping_shortens_exit_first() {
        let timing = allocate(FPS, 2.0, 4, PROGRESS_BAR_PHASES, EntranceShape::Staggered);
        let clipped = timing.clipped_to(timing.total_frames);
        assert_eq!(clipped.timeline_frames(), 60);
        assert_eq!(clipped.exit_frames, 0);
        assert_eq!(clipped.hold_frames, 0);
        assert_eq!(clipped.entrance_span_frames, 60);

        let mild = allocate(FPS, 4.0, 4, PROGRESS_BAR_PHASES, EntranceShape::Staggered);
        // 81 + 24 + 15 fills the 120 frame budget exactly.
        assert_eq!(mild.clipped_to(mild.total_frames), mild);
    }

    #[test]
    fn before_after_hold_after_has_a_floor() {
        let long = allocate_before_after(FPS, 6.0);
        assert_eq!(long.hold_before_frames, 30);
        assert_eq!(long.transition_duration, 45);
        assert_eq!(long.hold_after_frames, 180 - 30 - 45 - 15);
        assert_eq!(long.timeline_frames(), 180);

        let short = allocate_before_after(FPS, 2.0);
        assert_eq!(short.hold_after_frames, 15);
        assert!(short.timeline_frames() > short.total_frames);
    }

    #[test]
    fn compositor_offsets_are_fixed() {
        let split = allocate_split_screen(FPS, 5.0);
        assert_eq!(split.transition_duration, 15);
        assert_eq!(split.stagger_delay, 6);
        let pip = allocate_picture_in_picture(FPS, 5.0);
        assert_eq!(pip.entrance_frame, 15);
        assert_eq!(pip.entrance_duration, 15);
        assert_eq!(pip.total_frames, 150);
    }
}
