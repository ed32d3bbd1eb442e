use tracing::debug;

use crate::carousel::{
    Carousel, CarouselEvent, HeightObserver, Measurement, MotionPreference, ResizeWatch, SlideMounts,
    Transition,
};
use crate::slide::{Slide, SlideContent};
use crate::texture_loader::ImageLoader;
use crate::viewer::code_block::CodeBlock;
use crate::viewer::layout::{frame_content_height, has_settled_size, Stage};
use crate::viewer::page::{image_state, SlideSurface};

/// One section's carousel together with everything the viewer keeps for it:
/// mounted surfaces, the resize watch, pending measurements and transitions.
pub struct CarouselPanel {
    pub carousel: Carousel,
    pub mounts: SlideMounts<SlideSurface>,
    pub code_block: CodeBlock,
    section: usize,

    watch: ResizeWatch,
    pending: Vec<Measurement>,      // Taken this frame, delivered next frame

    track: Transition,
    viewport: Transition,
    viewport_known: bool,           // Whether any height was published yet
    viewport_height: f32,
    track_offset: f32,
}

impl CarouselPanel {
    pub fn new(section: usize, slides: Vec<Slide>, initial_index: i64, observer: HeightObserver, duration: f32) -> Self {
        let carousel = Carousel::new(slides, initial_index, observer);
        let offset = carousel.state().map_or(0.0, |state| -(state.index as f32));
        Self {
            carousel,
            mounts: SlideMounts::new(),
            code_block: CodeBlock::new(),
            section,
            watch: ResizeWatch::default(),
            pending: Vec::new(),
            track: Transition::new(offset, duration),
            viewport: Transition::new(0.0, duration),
            viewport_known: false,
            viewport_height: 0.0,
            track_offset: offset,
        }
    }

    /// Mount new slides and request their images.
    pub fn mount_slides(&mut self, loader: &ImageLoader) {
        for position in self.mounts.sync(self.carousel.slides()) {
            let slide = &self.carousel.slides()[position];
            if let SlideContent::Image { image_ref } = slide.content() {
                loader.request(self.section, position, slide.key(position), image_ref);
            }
        }
    }

    pub fn replace_slides(&mut self, slides: Vec<Slide>, loader: &ImageLoader) {
        let update = self.carousel.dispatch(CarouselEvent::ReplaceSlides(slides));
        self.watch.reset();
        self.pending.clear();
        self.mount_slides(loader);
        if update.index_changed {
            debug!(section = self.section, state = ?self.carousel.state(), "index re-clamped after reload");
        }
        debug!(section = self.section, mounted = self.mounts.len(), "slide mounts synced");
    }

    /// Feed last frame's measurements into the carousel.
    pub fn deliver_measurements(&mut self) {
        for measurement in self.pending.drain(..) {
            self.carousel.enqueue(CarouselEvent::Measured(measurement));
        }
        if let Some(height) = self.carousel.pump().height {
            if self.viewport_known {
                self.viewport.set_target(height as f32);
            } else {
                self.viewport.jump_to(height as f32);
                self.viewport_known = true;
            }
        }
    }

    /// Measure the active slide at `slot_width` and advance the transitions.
    pub fn step(&mut self, dt: f32, motion: MotionPreference, slot_width: f32) {
        let requested = self.carousel.on_frame();
        let Some(view) = self.carousel.view(motion) else {
            self.viewport_height = 0.0;
            self.track_offset = 0.0;
            return;
        };

        let image = image_state(&self.mounts, view.index);
        let frame = view.active_frame();
        let natural_height = frame_content_height(frame, slot_width, image);

        // A loading image is measured once it arrives, so the viewport moves once
        if let Some(handle) = self.carousel.observed() {
            if self.carousel.is_measuring() && has_settled_size(frame, image) {
                if let Some(measurement) = self.watch.check(handle, natural_height, requested == Some(handle)) {
                    self.pending.push(measurement);
                }
            }
        }

        self.track.set_duration(view.transition);
        self.viewport.set_duration(view.transition);
        self.track.set_target(view.track_offset);
        self.track_offset = self.track.update(dt);
        self.viewport_height = if self.carousel.height_observation_supported() && self.viewport_known {
            self.viewport.update(dt)
        } else {
            natural_height
        };
    }

    /// The carousel as it should be laid out and drawn this frame.
    pub fn stage(&self, motion: MotionPreference) -> Stage<'_> {
        Stage {
            view: self.carousel.view(motion),
            viewport_height: self.viewport_height,
            track_offset: self.track_offset,
        }
    }

    /// Whether the track has come to rest on the active slide.
    pub fn is_settled(&self) -> bool {
        !self.track.is_animating()
    }

    pub fn unmount(&mut self) {
        self.carousel.unmount();
        self.pending.clear();
        self.mounts.clear();
    }
}
