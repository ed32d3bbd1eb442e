use raylib::prelude::*;

/// Whether the environment asked for reduced motion.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct MotionPreference {
    pub reduced: bool,
}

impl MotionPreference {
    /// Transition length in seconds; zero under reduced motion.
    pub fn duration(self, nominal: f32) -> f32 {
        if self.reduced { 0.0 } else { nominal }
    }
}

/// A value easing toward a target. Retargeting mid-flight starts the new
/// tween from wherever the value currently is.
pub struct Transition {
    value: f32,
    target: f32,
    duration: f32,
    timer: f32,
    tween: Option<ease::Tween>,
}

impl Transition {
    pub fn new(value: f32, duration: f32) -> Self {
        Self {
            value,
            target: value,
            duration,
            timer: 0.0,
            tween: None,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        if self.duration <= 0.0 {
            self.jump_to(target);
            return;
        }
        self.timer = 0.0;
        self.tween = Some(ease::Tween::new(ease::cubic_out, self.value, target, self.duration));
    }

    /// Collapsing the duration to zero finishes any running tween.
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
        if duration <= 0.0 && self.tween.is_some() {
            self.jump_to(self.target);
        }
    }

    pub fn jump_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.tween = None;
    }

    pub fn update(&mut self, dt: f32) -> f32 {
        let Some(tween) = self.tween.as_mut() else {
            return self.value;
        };
        self.value = tween.apply(dt);
        self.timer += dt;
        if self.timer >= self.duration {
            self.value = self.target;
            self.tween = None;
        }
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }
}
