use std::collections::VecDeque;
use tracing::debug;

use crate::carousel::height::{HeightObserver, Measurement, ObserverHandle};
use crate::carousel::index::{IndexController, Navigation};
use crate::carousel::keyboard::{CarouselKey, KeyOutcome, KeyboardRouter};
use crate::carousel::motion::MotionPreference;
use crate::carousel::view::{position_label, track_offset, CarouselView, Frame};
use crate::constants::TRANSITION_DURATION;
use crate::slide::Slide;
use crate::state::CarouselState;

/// Inputs to the carousel. All of them are applied on the render thread, in
/// the order they were received.
#[derive(Debug, PartialEq, Clone)]
pub enum CarouselEvent {
    Navigate(Navigation),
    Key(CarouselKey),
    Measured(Measurement),
    Focus(bool),
    ReplaceSlides(Vec<Slide>),
}

/// What an event changed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Update {
    pub index_changed: bool,
    pub height: Option<u32>,            // Newly published viewport height
    pub key: Option<KeyOutcome>,
}

impl Update {
    fn merge(self, other: Update) -> Update {
        Update {
            index_changed: self.index_changed || other.index_changed,
            height: other.height.or(self.height),
            key: other.key.or(self.key),
        }
    }
}

pub struct Carousel {
    slides: Vec<Slide>,
    index: IndexController,
    observer: HeightObserver,
    keys: KeyboardRouter,
    queue: VecDeque<CarouselEvent>,
}

impl Carousel {
    pub fn new(slides: Vec<Slide>, initial_index: i64, observer: HeightObserver) -> Self {
        let index = IndexController::new(initial_index, slides.len());
        let mut carousel = Self {
            slides,
            index,
            observer,
            keys: KeyboardRouter::new(),
            queue: VecDeque::new(),
        };
        carousel.activate();
        carousel
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn state(&self) -> Option<CarouselState> {
        self.index.index().map(|index| CarouselState {
            index,
            measured_height: self.observer.height(),
        })
    }

    pub fn can_go_prev(&self) -> bool {
        self.index.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.index.can_go_next()
    }

    pub fn has_focus(&self) -> bool {
        self.keys.has_focus()
    }

    pub fn height_observation_supported(&self) -> bool {
        self.observer.is_supported()
    }

    /// Queue an event for the next [`Carousel::pump`].
    pub fn enqueue(&mut self, event: CarouselEvent) {
        self.queue.push_back(event);
    }

    /// Apply every queued event in arrival order.
    pub fn pump(&mut self) -> Update {
        let mut update = Update::default();
        while let Some(event) = self.queue.pop_front() {
            update = update.merge(self.dispatch(event));
        }
        update
    }

    pub fn dispatch(&mut self, event: CarouselEvent) -> Update {
        match event {
            CarouselEvent::Navigate(navigation) => {
                let moved = self.index.apply(navigation);
                self.after_navigation(moved)
            }
            CarouselEvent::Key(key) => {
                let before = self.index.index();
                let outcome = self.keys.route(key, &mut self.index);
                let moved = self.index.index() != before;
                Update {
                    key: Some(outcome),
                    ..self.after_navigation(moved)
                }
            }
            CarouselEvent::Measured(measurement) => Update {
                height: self.observer.accept(measurement),
                ..Update::default()
            },
            CarouselEvent::Focus(focused) => {
                self.keys.set_focus(focused);
                Update::default()
            }
            CarouselEvent::ReplaceSlides(slides) => {
                self.slides = slides;
                let moved = self.index.set_len(self.slides.len());
                debug!(len = self.slides.len(), moved, "carousel slides replaced");
                self.activate();
                Update {
                    index_changed: moved,
                    ..Update::default()
                }
            }
        }
    }

    /// Advance one rendered frame; returns the handle to measure when the
    /// deferred initial measurement is due.
    pub fn on_frame(&mut self) -> Option<ObserverHandle> {
        self.observer.on_frame()
    }

    pub fn observed(&self) -> Option<ObserverHandle> {
        self.observer.current()
    }

    pub fn is_measuring(&self) -> bool {
        self.observer.is_measuring()
    }

    pub fn view(&self, motion: MotionPreference) -> Option<CarouselView<'_>> {
        let index = self.index.index()?;
        let active = &self.slides[index];
        Some(CarouselView {
            index,
            title: active.display_title(index),
            description: active.description(),
            position: position_label(index, self.slides.len()),
            frames: self
                .slides
                .iter()
                .enumerate()
                .map(|(position, slide)| Frame::for_slide(slide, position))
                .collect(),
            prev_enabled: self.index.can_go_prev(),
            next_enabled: self.index.can_go_next(),
            track_offset: track_offset(index),
            viewport_height: self.observer.height(),
            transition: motion.duration(TRANSITION_DURATION),
        })
    }

    /// Tear down observation; queued measurements are discarded.
    pub fn unmount(&mut self) {
        self.observer.detach();
        self.queue.clear();
    }

    fn after_navigation(&mut self, moved: bool) -> Update {
        if moved {
            debug!(index = ?self.index.index(), "carousel navigated");
            self.activate();
        }
        Update {
            index_changed: moved,
            ..Update::default()
        }
    }

    fn activate(&mut self) {
        match self.index.index() {
            Some(index) => {
                self.observer.attach(index);
            }
            None => self.observer.detach(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn abc() -> Vec<Slide> {
        vec![
            Slide::code("A", "a"),
            Slide::code("B", "b"),
            Slide::code("C", "c"),
        ]
    }

    fn settle(carousel: &mut Carousel) -> ObserverHandle {
        assert_eq!(carousel.on_frame(), None);
        carousel.on_frame().unwrap()
    }

    #[test]
    fn construction_clamps_initial_index() {
        let carousel = Carousel::new(abc(), 5, HeightObserver::new());
        assert_eq!(carousel.state(), Some(CarouselState { index: 2, measured_height: None }));
    }

    #[test]
    fn prev_at_start_stays_and_is_disabled() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::new());
        let update = carousel.dispatch(CarouselEvent::Navigate(Navigation::Prev));
        assert!(!update.index_changed);
        let view = carousel.view(MotionPreference::default()).unwrap();
        assert_eq!(view.index, 0);
        assert!(!view.prev_enabled);
        assert!(view.next_enabled);
    }

    #[test]
    fn next_to_last_disables_next() {
        let mut carousel = Carousel::new(abc(), 1, HeightObserver::new());
        assert!(carousel.dispatch(CarouselEvent::Navigate(Navigation::Next)).index_changed);
        let view = carousel.view(MotionPreference::default()).unwrap();
        assert_eq!(view.index, 2);
        assert!(!view.next_enabled);
        assert_eq!(view.position, "3 / 3");
        assert_eq!(view.track_offset, -2.0);
    }

    #[test]
    fn shrinking_slides_reclamps() {
        let mut slides = abc();
        slides.push(Slide::code("D", "d"));
        let mut carousel = Carousel::new(slides, 3, HeightObserver::new());

        let update = carousel.dispatch(CarouselEvent::ReplaceSlides(vec![
            Slide::code("A", "a"),
            Slide::code("B", "b"),
        ]));
        assert!(update.index_changed);
        assert_eq!(carousel.state().unwrap().index, 1);
        assert_eq!(carousel.observed().unwrap().slide, 1);
    }

    #[test]
    fn empty_collection_renders_nothing() {
        let mut carousel = Carousel::new(Vec::new(), 3, HeightObserver::new());
        assert_eq!(carousel.state(), None);
        assert!(carousel.view(MotionPreference::default()).is_none());
        assert_eq!(carousel.observed(), None);

        carousel.dispatch(CarouselEvent::Focus(true));
        let update = carousel.dispatch(CarouselEvent::Key(CarouselKey::ArrowRight));
        assert!(!update.index_changed);
        assert_eq!(carousel.state(), None);
    }

    #[test]
    fn replacing_with_empty_detaches_observer() {
        let mut carousel = Carousel::new(abc(), 1, HeightObserver::new());
        assert!(!carousel.is_empty());
        carousel.dispatch(CarouselEvent::ReplaceSlides(Vec::new()));
        assert!(carousel.is_empty());
        assert_eq!(carousel.observed(), None);
        assert!(carousel.view(MotionPreference::default()).is_none());
    }

    #[test]
    fn keyboard_requires_focus() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::new());

        let update = carousel.dispatch(CarouselEvent::Key(CarouselKey::ArrowRight));
        assert_eq!(update.key, Some(KeyOutcome::Ignored));
        assert_eq!(carousel.state().unwrap().index, 0);

        carousel.dispatch(CarouselEvent::Focus(true));
        let update = carousel.dispatch(CarouselEvent::Key(CarouselKey::ArrowRight));
        assert_eq!(update.key, Some(KeyOutcome::Consumed));
        assert!(update.index_changed);
        assert_eq!(carousel.state().unwrap().index, 1);
    }

    #[test]
    fn height_updates_are_deduplicated() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::new());
        let handle = settle(&mut carousel);

        carousel.enqueue(CarouselEvent::Measured(Measurement { handle, height: 212.0 }));
        assert_eq!(carousel.pump().height, Some(212));

        carousel.enqueue(CarouselEvent::Measured(Measurement { handle, height: 212.0 }));
        assert_eq!(carousel.pump().height, None);

        carousel.enqueue(CarouselEvent::Measured(Measurement { handle, height: 340.0 }));
        assert_eq!(carousel.pump().height, Some(340));
        assert_eq!(carousel.state().unwrap().measured_height, Some(340));
    }

    #[test]
    fn measurement_queued_before_navigation_is_dropped() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::new());
        let handle = settle(&mut carousel);

        carousel.enqueue(CarouselEvent::Navigate(Navigation::Next));
        carousel.enqueue(CarouselEvent::Measured(Measurement { handle, height: 300.0 }));
        let update = carousel.pump();

        assert!(update.index_changed);
        assert_eq!(update.height, None);
        assert_eq!(carousel.state(), Some(CarouselState { index: 1, measured_height: None }));
    }

    #[test]
    fn unmount_discards_in_flight_measurements() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::new());
        let handle = settle(&mut carousel);
        carousel.enqueue(CarouselEvent::Measured(Measurement { handle, height: 300.0 }));
        carousel.unmount();

        assert_eq!(carousel.pump(), Update::default());
        assert_eq!(
            carousel.dispatch(CarouselEvent::Measured(Measurement { handle, height: 300.0 })).height,
            None
        );
    }

    #[test]
    fn unsupported_observer_leaves_viewport_unconstrained() {
        let mut carousel = Carousel::new(abc(), 0, HeightObserver::unsupported());
        assert_eq!(carousel.on_frame(), None);
        let view = carousel.view(MotionPreference::default()).unwrap();
        assert_eq!(view.viewport_height, None);
    }

    #[test]
    fn view_uses_fallbacks_and_frames() {
        let slides = vec![
            Slide::image("Docker CLI", "cli.png"),
            Slide { code: Some("FROM alpine".into()), ..Slide::default() },
            Slide { description: Some("nothing here".into()), ..Slide::default() },
        ];
        let mut carousel = Carousel::new(slides, 1, HeightObserver::new());
        let view = carousel.view(MotionPreference { reduced: true }).unwrap();

        assert_eq!(view.title, "Snippet 2");
        assert_eq!(view.description, None);
        assert_eq!(view.transition, 0.0);
        assert_eq!(
            view.frames,
            vec![
                Frame::Image { image_ref: "cli.png", alt: "Docker CLI".into() },
                Frame::Code { code: "FROM alpine" },
                Frame::Empty,
            ]
        );

        carousel.dispatch(CarouselEvent::Navigate(Navigation::End));
        let view = carousel.view(MotionPreference::default()).unwrap();
        assert_eq!(view.description, Some("nothing here"));
        assert_eq!(view.active_frame(), &Frame::Empty);
        assert_eq!(view.transition, TRANSITION_DURATION);
    }
}
