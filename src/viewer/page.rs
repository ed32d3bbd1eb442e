use raylib::prelude::*;

use crate::carousel::{CarouselView, Frame, SlideMounts};
use crate::deck::{Banner, BannerVariant, Deck};
use crate::state::Focus;
use crate::viewer::layout::{
    frame_content_height, line_height, BannerLayout, CarouselLayout, ImageState, PageLayout, Stage, TextBlock,
};
use crate::viewer::panel::CarouselPanel;

pub const BACKGROUND: Color = Color::new(18, 19, 24, 255);
const TEXT: Color = Color::new(236, 236, 240, 255);
const DIM_TEXT: Color = Color::new(180, 182, 192, 255);
const SECONDARY: Color = Color::new(124, 140, 255, 255);
const SECTION: Color = Color::new(26, 27, 34, 255);
const DISABLED: Color = Color::new(70, 72, 84, 255);
const INFO: Color = Color::new(60, 140, 255, 255);
const INFO_FILL: Color = Color::new(60, 140, 255, 26);
const WARNING: Color = Color::new(255, 180, 0, 255);
const WARNING_FILL: Color = Color::new(255, 180, 0, 31);

/// What the view layer holds for a mounted slide.
pub enum SlideSurface {
    Texture(Texture2D),
    Failed,
}

pub fn image_state(mounts: &SlideMounts<SlideSurface>, position: usize) -> ImageState {
    match mounts.get(position) {
        Some(SlideSurface::Texture(texture)) => ImageState::Ready {
            width: texture.width() as f32,
            height: texture.height() as f32,
        },
        Some(SlideSurface::Failed) => ImageState::Failed,
        None => ImageState::Loading,
    }
}

/// Pixel width of `text` in the default font.
pub fn text_width(text: &str, font_size: i32) -> i32 {
    let c_text = std::ffi::CString::new(text).unwrap();
    unsafe { raylib::ffi::MeasureText(c_text.as_ptr(), font_size) }
}

/// Everything the page needs to draw one frame. `stages` and `panels` run
/// parallel to the deck's sections.
pub struct PageScene<'a> {
    pub deck: &'a Deck,
    pub layout: &'a PageLayout,
    pub stages: &'a [Stage<'a>],
    pub panels: &'a [CarouselPanel],
    pub focus: Focus,
}

pub fn draw_page(d: &mut RaylibDrawHandle, scene: &PageScene) {
    d.clear_background(BACKGROUND);

    draw_block(d, &scene.layout.title, TEXT);
    if let Some(intro) = &scene.layout.intro {
        draw_block(d, intro, DIM_TEXT);
    }
    if let (Some(banner), Some(layout)) = (&scene.deck.banner, &scene.layout.banner) {
        draw_banner(d, banner, layout);
    }

    for (i, (section, layout)) in scene.deck.sections.iter().zip(&scene.layout.sections).enumerate() {
        if let Some(heading) = &layout.heading {
            draw_block(d, heading, TEXT);
        }
        if let Some(text) = &layout.text {
            draw_block(d, text, DIM_TEXT);
        }
        if let (Some(banner), Some(banner_layout)) = (&section.banner, &layout.banner) {
            draw_banner(d, banner, banner_layout);
        }
        if let (Some(carousel), Some(stage), Some(panel)) = (&layout.carousel, scene.stages.get(i), scene.panels.get(i)) {
            if let Some(view) = &stage.view {
                let focused = scene.focus == Focus::Carousel(i);
                draw_carousel(d, view, carousel, stage.track_offset, focused, panel);
            }
        }
    }
}

fn draw_banner(d: &mut RaylibDrawHandle, banner: &Banner, layout: &BannerLayout) {
    let (accent, fill) = match banner.variant {
        BannerVariant::Info => (INFO, INFO_FILL),
        BannerVariant::Warning => (WARNING, WARNING_FILL),
    };
    d.draw_rectangle_rec(layout.rect, fill);
    d.draw_rectangle_lines_ex(layout.rect, 2.0, accent);
    d.draw_rectangle_rec(Rectangle::new(layout.rect.x, layout.rect.y, 4.0, layout.rect.height), accent);
    if let Some(title) = &layout.title {
        draw_block(d, title, accent);
    }
    draw_block(d, &layout.text, TEXT);
}

fn draw_carousel(
    d: &mut RaylibDrawHandle,
    view: &CarouselView,
    layout: &CarouselLayout,
    track_offset: f32,
    focused: bool,
    panel: &CarouselPanel,
) {
    d.draw_rectangle_rec(layout.section, SECTION);
    d.draw_rectangle_lines_ex(layout.section, 2.0, SECONDARY);

    // Header accent bar
    let bar_bottom = layout
        .description
        .as_ref()
        .map(|block| block.y + block.lines.len() as f32 * line_height(block.font_size))
        .unwrap_or(layout.title.y + line_height(layout.title.font_size));
    d.draw_rectangle_rec(
        Rectangle::new(layout.title.x - 20.0, layout.title.y, 4.0, bar_bottom - layout.title.y),
        SECONDARY,
    );
    draw_block(d, &layout.title, TEXT);
    if let Some(description) = &layout.description {
        draw_block(d, description, DIM_TEXT);
    }
    d.draw_rectangle_lines_ex(layout.count, 2.0, SECONDARY);
    d.draw_text(
        &view.position,
        (layout.count.x + 8.0) as i32,
        (layout.count.y + (layout.count.height - 16.0) * 0.5) as i32,
        16,
        DIM_TEXT,
    );

    if focused {
        d.draw_rectangle_lines_ex(layout.stage, 2.0, SECONDARY);
    }

    {
        let viewport = layout.viewport;
        let mut s = d.begin_scissor_mode(
            viewport.x as i32,
            viewport.y as i32,
            viewport.width as i32,
            viewport.height.ceil() as i32,
        );
        for (position, frame) in view.frames.iter().enumerate() {
            let x = viewport.x + (position as f32 + track_offset) * viewport.width;
            if x >= viewport.x + viewport.width || x + viewport.width <= viewport.x {
                continue;
            }
            let image = image_state(&panel.mounts, position);
            let height = frame_content_height(frame, viewport.width, image);
            let rect = Rectangle::new(x, viewport.y, viewport.width, height);
            draw_frame(&mut s, frame, rect, position, panel);
        }
    }

    draw_nav_button(d, layout.prev_button, "<", view.prev_enabled);
    draw_nav_button(d, layout.next_button, ">", view.next_enabled);
}

fn draw_frame<D: RaylibDraw>(d: &mut D, frame: &Frame, rect: Rectangle, position: usize, panel: &CarouselPanel) {
    match frame {
        Frame::Image { alt, .. } => match panel.mounts.get(position) {
            Some(SlideSurface::Texture(texture)) => {
                let source = Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32);
                d.draw_texture_pro(texture, source, rect, Vector2::new(0.0, 0.0), 0.0, Color::WHITE);
            }
            Some(SlideSurface::Failed) => {
                d.draw_rectangle_lines_ex(rect, 2.0, DISABLED);
                d.draw_text(alt, (rect.x + 12.0) as i32, (rect.y + 14.0) as i32, 20, DIM_TEXT);
            }
            None => {
                d.draw_text(&format!("Loading {alt}"), (rect.x + 12.0) as i32, (rect.y + 4.0) as i32, 16, DIM_TEXT);
            }
        },
        Frame::Code { code } => panel.code_block.draw(d, rect, position, code),
        Frame::Empty => d.draw_rectangle_lines_ex(rect, 2.0, DISABLED),
    }
}

fn draw_nav_button<D: RaylibDraw>(d: &mut D, rect: Rectangle, label: &str, enabled: bool) {
    let color = if enabled { SECONDARY } else { DISABLED };
    d.draw_rectangle_rec(rect, SECTION);
    d.draw_rectangle_lines_ex(rect, 2.0, color);
    d.draw_text(
        label,
        (rect.x + rect.width * 0.5 - 6.0) as i32,
        (rect.y + rect.height * 0.5 - 10.0) as i32,
        20,
        if enabled { TEXT } else { DISABLED },
    );
}

fn draw_block<D: RaylibDraw>(d: &mut D, block: &TextBlock, color: Color) {
    for (i, line) in block.lines.iter().enumerate() {
        d.draw_text(
            line,
            block.x as i32,
            (block.y + i as f32 * line_height(block.font_size)) as i32,
            block.font_size,
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slide::{Slide, SlideKey};

    #[test]
    fn text_width_plugs_into_layout() {
        let measure: &dyn Fn(&str, i32) -> i32 = &text_width;
        let _ = measure;
    }

    #[test]
    fn image_state_tracks_the_mount() {
        let mut mounts = SlideMounts::new();
        assert_eq!(image_state(&mounts, 0), ImageState::Loading);
        mounts.sync(&[Slide::image("shot", "shot.png")]);
        assert_eq!(image_state(&mounts, 0), ImageState::Loading);
        assert!(mounts.fill(0, &SlideKey::Position(0), "shot.png", SlideSurface::Failed));
        assert_eq!(image_state(&mounts, 0), ImageState::Failed);
    }
}
