//! Fixed-duration tweens
//!
//! [`Tween`] interpolates one value over a duration with an easing curve.
//! [`SizeTweener`] pairs two of them for the indicator's width and height and
//! only restarts the axis whose destination actually moved.

use crate::easing::Easing;

/// A single eased interpolation from `from` to `to`
#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    playing: bool,
}

impl Tween {
    /// Create a tween that is already playing
    pub fn new(from: f32, to: f32, duration_ms: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
            playing: true,
        }
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        self.from + (self.to - self.from) * self.easing.apply(self.progress())
    }

    /// Advance by `dt_ms`. Returns true while still playing.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if !self.playing {
            return false;
        }

        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.duration_ms {
            self.elapsed_ms = self.duration_ms;
            self.playing = false;
        }
        self.playing
    }

    /// Freeze at the current value
    pub fn stop(&mut self) {
        self.playing = false;
    }
}

/// Per-axis output of one [`SizeTweener::tick`]. `None` means that axis is not
/// animating and should be left alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeStep {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Width/height interpolation over a fixed duration
#[derive(Clone, Debug)]
pub struct SizeTweener {
    width: Option<Tween>,
    height: Option<Tween>,
    duration_ms: f32,
    easing: Easing,
}

impl SizeTweener {
    pub fn new(duration_ms: f32, easing: Easing) -> Self {
        Self {
            width: None,
            height: None,
            duration_ms,
            easing,
        }
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    /// Applies to tweens started after the call
    pub fn set_duration_ms(&mut self, duration_ms: f32) {
        self.duration_ms = duration_ms.max(0.0);
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    /// Start or retarget toward `target`, starting each restarted axis from
    /// `current`. An axis whose destination is unchanged keeps running.
    pub fn animate_to(&mut self, current: (u32, u32), target: (u32, u32)) {
        let (duration_ms, easing) = (self.duration_ms, self.easing);
        retarget_axis(&mut self.width, current.0, target.0, duration_ms, easing);
        retarget_axis(&mut self.height, current.1, target.1, duration_ms, easing);
    }

    /// Advance both axes by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) -> SizeStep {
        SizeStep {
            width: tick_axis(&mut self.width, dt_ms),
            height: tick_axis(&mut self.height, dt_ms),
        }
    }

    pub fn is_animating(&self) -> bool {
        self.width.as_ref().is_some_and(Tween::is_playing)
            || self.height.as_ref().is_some_and(Tween::is_playing)
    }

    /// Stop both axes where they are. The last values handed out by `tick`
    /// remain the current size.
    pub fn cancel(&mut self) {
        self.width = None;
        self.height = None;
    }
}

fn retarget_axis(slot: &mut Option<Tween>, current: u32, target: u32, duration_ms: f32, easing: Easing) {
    let running_target = slot
        .as_ref()
        .filter(|t| t.is_playing())
        .map(|t| t.target() as u32);

    if running_target == Some(target) {
        return;
    }

    *slot = if current == target {
        None
    } else {
        Some(Tween::new(current as f32, target as f32, duration_ms, easing))
    };
}

fn tick_axis(slot: &mut Option<Tween>, dt_ms: f32) -> Option<u32> {
    let tween = slot.as_mut()?;
    let playing = tween.tick(dt_ms);
    let value = tween.value().round().max(0.0) as u32;
    if !playing {
        *slot = None;
    }
    Some(value)
}
