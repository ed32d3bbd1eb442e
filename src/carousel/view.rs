use std::borrow::Cow;
use crate::slide::{Slide, SlideContent};

/// Content frame for one slide on the track.
#[derive(Debug, PartialEq, Clone)]
pub enum Frame<'a> {
    Image { image_ref: &'a str, alt: Cow<'a, str> },
    Code { code: &'a str },
    Empty,
}

impl<'a> Frame<'a> {
    pub fn for_slide(slide: &'a Slide, position: usize) -> Self {
        match slide.content() {
            SlideContent::Image { image_ref } => Frame::Image {
                image_ref,
                alt: slide.alt_text(position),
            },
            SlideContent::Code { code } => Frame::Code { code },
            SlideContent::Empty => Frame::Empty,
        }
    }
}

/// Everything needed to draw the carousel for one frame. Purely derived from
/// the slides, the index and the published height.
#[derive(Debug, PartialEq, Clone)]
pub struct CarouselView<'a> {
    pub index: usize,
    pub title: Cow<'a, str>,
    pub description: Option<&'a str>,
    pub position: String,
    pub frames: Vec<Frame<'a>>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub track_offset: f32,          // In viewport widths, `-index`
    pub viewport_height: Option<u32>,
    pub transition: f32,            // Seconds, zero under reduced motion
}

impl<'a> CarouselView<'a> {
    pub fn active_frame(&self) -> &Frame<'a> {
        &self.frames[self.index]
    }
}

/// `"{index+1} / {len}"`
pub fn position_label(index: usize, len: usize) -> String {
    format!("{} / {}", index + 1, len)
}

/// Horizontal track offset for `index`, in viewport widths.
pub fn track_offset(index: usize) -> f32 {
    -(index as f32)
}
