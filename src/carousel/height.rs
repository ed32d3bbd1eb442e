//! Height observation for the active slide.
//!
//! The viewer measures content once per frame and reports size changes as
//! [`Measurement`] messages; the carousel feeds them back through
//! [`HeightObserver::accept`]. Each attachment gets a fresh generation so a
//! measurement taken for a slide that has since been deactivated is dropped.

use tracing::{debug, trace};

/// Identifies one attachment of the observer to one slide.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ObserverHandle {
    pub slide: usize,
    generation: u64,
}

/// A raw content height reading for the slide behind `handle`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Measurement {
    pub handle: ObserverHandle,
    pub height: f32,
}

#[derive(Debug)]
struct Attachment {
    handle: ObserverHandle,
    settle_frames: u8,     // Frames left before the first measurement is requested
    requested: bool,
}

#[derive(Debug)]
pub struct HeightObserver {
    supported: bool,
    generation: u64,
    attached: Option<Attachment>,
    published: Option<u32>,
}

impl HeightObserver {
    pub fn new() -> Self {
        Self {
            supported: true,
            generation: 0,
            attached: None,
            published: None,
        }
    }

    /// An observer for environments without size observation. It never
    /// attaches, so the viewport keeps its natural height.
    pub fn unsupported() -> Self {
        debug!("height observation unavailable, viewport uses natural sizing");
        Self {
            supported: false,
            ..Self::new()
        }
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Attach to `slide`, detaching from whatever was observed before.
    pub fn attach(&mut self, slide: usize) -> Option<ObserverHandle> {
        self.detach();
        if !self.supported {
            return None;
        }
        self.generation += 1;
        let handle = ObserverHandle {
            slide,
            generation: self.generation,
        };
        self.attached = Some(Attachment {
            handle,
            settle_frames: 1,
            requested: false,
        });
        trace!(slide, generation = self.generation, "height observer attached");
        Some(handle)
    }

    pub fn detach(&mut self) {
        if let Some(attachment) = self.attached.take() {
            trace!(slide = attachment.handle.slide, "height observer detached");
        }
        self.published = None;
    }

    pub fn current(&self) -> Option<ObserverHandle> {
        self.attached.as_ref().map(|a| a.handle)
    }

    /// Advance one rendered frame. Returns the handle once, on the frame the
    /// deferred initial measurement becomes due.
    pub fn on_frame(&mut self) -> Option<ObserverHandle> {
        let attachment = self.attached.as_mut()?;
        if attachment.settle_frames > 0 {
            attachment.settle_frames -= 1;
            return None;
        }
        if attachment.requested {
            return None;
        }
        attachment.requested = true;
        Some(attachment.handle)
    }

    /// Whether the deferred frame after attaching has elapsed.
    pub fn is_settled(&self) -> bool {
        self.attached.as_ref().is_some_and(|a| a.settle_frames == 0)
    }

    /// Whether the initial measurement has been requested, after which size
    /// changes of the attached slide should be reported.
    pub fn is_measuring(&self) -> bool {
        self.attached.as_ref().is_some_and(|a| a.requested)
    }

    /// Returns the new height when the measurement changes what is published.
    pub fn accept(&mut self, measurement: Measurement) -> Option<u32> {
        let Some(attachment) = self.attached.as_ref() else {
            trace!(slide = measurement.handle.slide, "dropping measurement, observer detached");
            return None;
        };
        if attachment.handle != measurement.handle {
            trace!(slide = measurement.handle.slide, "dropping stale measurement");
            return None;
        }

        let height = measurement.height.max(0.0).ceil() as u32;
        if height == 0 && !self.is_settled() {
            return None;
        }
        if self.published == Some(height) {
            return None;
        }
        self.published = Some(height);
        Some(height)
    }

    pub fn height(&self) -> Option<u32> {
        self.published
    }
}

impl Default for HeightObserver {
    fn default() -> Self {
        Self::new()
    }
}

/// Emulates a resize observer on top of per-frame content measurement: a
/// reading is reported when it differs from the last one for the same handle,
/// or when the observer explicitly requested one.
#[derive(Debug, Default)]
pub struct ResizeWatch {
    last: Option<(ObserverHandle, f32)>,
}

impl ResizeWatch {
    pub fn check(&mut self, handle: ObserverHandle, height: f32, requested: bool) -> Option<Measurement> {
        let changed = match self.last {
            Some((last_handle, last_height)) => last_handle != handle || last_height != height,
            None => true,
        };
        if !changed && !requested {
            return None;
        }
        self.last = Some((handle, height));
        Some(Measurement { handle, height })
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settled(observer: &mut HeightObserver, slide: usize) -> ObserverHandle {
        let handle = observer.attach(slide).unwrap();
        assert_eq!(observer.on_frame(), None);
        assert_eq!(observer.on_frame(), Some(handle));
        handle
    }

    #[test]
    fn equal_heights_publish_once() {
        let mut observer = HeightObserver::new();
        let handle = settled(&mut observer, 0);

        assert_eq!(observer.accept(Measurement { handle, height: 212.0 }), Some(212));
        assert_eq!(observer.accept(Measurement { handle, height: 212.0 }), None);
        assert_eq!(observer.accept(Measurement { handle, height: 340.0 }), Some(340));
        assert_eq!(observer.height(), Some(340));
    }

    #[test]
    fn rounds_up_to_whole_pixels() {
        let mut observer = HeightObserver::new();
        let handle = settled(&mut observer, 0);

        assert_eq!(observer.accept(Measurement { handle, height: 211.2 }), Some(212));
        assert_eq!(observer.accept(Measurement { handle, height: 211.9 }), None);
    }

    #[test]
    fn initial_measurement_is_deferred_one_frame() {
        let mut observer = HeightObserver::new();
        let handle = observer.attach(2).unwrap();
        assert!(!observer.is_settled());
        assert_eq!(observer.on_frame(), None);
        assert!(observer.is_settled());
        assert!(!observer.is_measuring());
        assert_eq!(observer.on_frame(), Some(handle));
        assert!(observer.is_measuring());
        assert_eq!(observer.on_frame(), None);
    }

    #[test]
    fn zero_before_settling_is_not_trusted() {
        let mut observer = HeightObserver::new();
        let handle = observer.attach(0).unwrap();

        assert_eq!(observer.accept(Measurement { handle, height: 0.0 }), None);
        assert_eq!(observer.height(), None);

        observer.on_frame();
        assert_eq!(observer.accept(Measurement { handle, height: 0.0 }), Some(0));
    }

    #[test]
    fn stale_measurements_are_dropped_after_reattach() {
        let mut observer = HeightObserver::new();
        let old = settled(&mut observer, 0);
        let new = settled(&mut observer, 1);

        assert_eq!(observer.accept(Measurement { handle: old, height: 500.0 }), None);
        assert_eq!(observer.accept(Measurement { handle: new, height: 120.0 }), Some(120));
    }

    #[test]
    fn reattaching_the_same_slide_gets_a_new_generation() {
        let mut observer = HeightObserver::new();
        let first = settled(&mut observer, 0);
        let second = settled(&mut observer, 0);
        assert_ne!(first, second);
        assert_eq!(observer.accept(Measurement { handle: first, height: 80.0 }), None);
    }

    #[test]
    fn detached_observer_ignores_in_flight_callbacks() {
        let mut observer = HeightObserver::new();
        let handle = settled(&mut observer, 0);
        observer.detach();

        assert_eq!(observer.accept(Measurement { handle, height: 90.0 }), None);
        assert_eq!(observer.height(), None);
        assert_eq!(observer.on_frame(), None);
    }

    #[test]
    fn unsupported_observer_never_attaches() {
        let mut observer = HeightObserver::unsupported();
        assert!(!observer.is_supported());
        assert_eq!(observer.attach(0), None);
        assert_eq!(observer.on_frame(), None);
        assert_eq!(observer.height(), None);
    }

    #[test]
    fn resize_watch_reports_only_changes_or_requests() {
        let mut observer = HeightObserver::new();
        let handle = observer.attach(0).unwrap();
        let mut watch = ResizeWatch::default();

        assert!(watch.check(handle, 100.0, false).is_some());
        assert!(watch.check(handle, 100.0, false).is_none());
        assert!(watch.check(handle, 100.0, true).is_some());
        assert!(watch.check(handle, 140.0, false).is_some());

        let other = observer.attach(1).unwrap();
        assert!(watch.check(other, 140.0, false).is_some());
    }
}
