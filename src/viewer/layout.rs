use raylib::prelude::*;

use crate::carousel::{CarouselView, Frame};
use crate::constants::*;
use crate::deck::{Banner, Deck};

/// Load state of an image surface, as far as layout is concerned.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ImageState {
    Loading,
    Ready { width: f32, height: f32 },
    Failed,
}

pub fn line_height(font_size: i32) -> f32 {
    font_size as f32 * LINE_SPACING
}

/// Intrinsic height of a frame's content at the given viewport width.
pub fn frame_content_height(frame: &Frame, viewport_width: f32, image: ImageState) -> f32 {
    match frame {
        Frame::Image { .. } => match image {
            ImageState::Ready { width, height } if width > 0.0 => height * (viewport_width / width),
            ImageState::Ready { .. } => 0.0,
            ImageState::Loading | ImageState::Failed => EMPTY_FRAME_HEIGHT,
        },
        Frame::Code { code } => code_block_height(code),
        Frame::Empty => EMPTY_FRAME_HEIGHT,
    }
}

/// Whether the frame's content has its final size. A loading image only has
/// its placeholder, which should not be reported as the slide's height.
pub fn has_settled_size(frame: &Frame, image: ImageState) -> bool {
    !matches!((frame, image), (Frame::Image { .. }, ImageState::Loading))
}

pub fn code_block_height(code: &str) -> f32 {
    let lines = code.lines().count().max(1);
    CODE_TOOLBAR_HEIGHT + CODE_PADDING * 2.0 + lines as f32 * line_height(CODE_FONT_SIZE)
}

/// Greedy word wrap. `measure` returns the pixel width of a string at a font size.
pub fn wrap_text(text: &str, max_width: f32, font_size: i32, measure: &dyn Fn(&str, i32) -> i32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && measure(&candidate, font_size) as f32 > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// The post column for a given screen width.
pub fn column(screen_width: f32) -> (f32, f32) {
    let width = PAGE_MAX_WIDTH.min(screen_width - PAGE_MARGIN * 2.0).max(0.0);
    let x = ((screen_width - width) * 0.5).max(0.0);
    (x, width)
}

pub fn viewport_width(screen_width: f32) -> f32 {
    (column(screen_width).1 - STAGE_PADDING_X * 2.0).max(1.0)
}

#[derive(Debug, Clone)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub x: f32,
    pub y: f32,
    pub font_size: i32,
}

#[derive(Debug, Clone)]
pub struct BannerLayout {
    pub rect: Rectangle,
    pub title: Option<TextBlock>,
    pub text: TextBlock,
}

#[derive(Debug, Clone)]
pub struct CarouselLayout {
    pub section: Rectangle,
    pub title: TextBlock,
    pub count: Rectangle,
    pub description: Option<TextBlock>,
    pub stage: Rectangle,
    pub viewport: Rectangle,
    pub prev_button: Rectangle,
    pub next_button: Rectangle,
}

/// One section's carousel for the current frame. `view` is `None` when the
/// section has no slides.
pub struct Stage<'a> {
    pub view: Option<CarouselView<'a>>,
    pub viewport_height: f32,
    pub track_offset: f32,
}

#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub heading: Option<TextBlock>,
    pub text: Option<TextBlock>,
    pub banner: Option<BannerLayout>,
    pub carousel: Option<CarouselLayout>,
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    pub title: TextBlock,
    pub intro: Option<TextBlock>,
    pub banner: Option<BannerLayout>,
    pub sections: Vec<SectionLayout>,
    pub content_height: f32,        // Total page height, for scroll bounds
}

fn paragraph(
    text: &str,
    x: f32,
    y: &mut f32,
    width: f32,
    font_size: i32,
    measure: &dyn Fn(&str, i32) -> i32,
) -> TextBlock {
    let block = TextBlock {
        lines: wrap_text(text, width, font_size, measure),
        x,
        y: *y,
        font_size,
    };
    *y += block.lines.len() as f32 * line_height(font_size) + PAGE_MARGIN * 0.5;
    block
}

impl PageLayout {
    /// `stages` holds one entry per deck section.
    pub fn compute(
        screen_width: f32,
        scroll: f32,
        deck: &Deck,
        stages: &[Stage],
        measure: &dyn Fn(&str, i32) -> i32,
    ) -> PageLayout {
        let (x, width) = column(screen_width);
        let top = PAGE_MARGIN - scroll;
        let mut y = top;

        let title = paragraph(&deck.title, x, &mut y, width, TITLE_FONT_SIZE, measure);
        let intro = deck
            .intro
            .as_deref()
            .map(|intro| paragraph(intro, x, &mut y, width, BODY_FONT_SIZE, measure));
        let banner = deck.banner.as_ref().map(|banner| {
            let layout = banner_layout(banner, x, y, width, measure);
            y += layout.rect.height + PAGE_MARGIN;
            layout
        });

        let mut sections = Vec::with_capacity(deck.sections.len());
        for (i, section) in deck.sections.iter().enumerate() {
            let heading = section
                .heading
                .as_deref()
                .map(|heading| paragraph(heading, x, &mut y, width, HEADER_FONT_SIZE, measure));
            let text = section
                .text
                .as_deref()
                .map(|text| paragraph(text, x, &mut y, width, BODY_FONT_SIZE, measure));
            let banner = section.banner.as_ref().map(|banner| {
                let layout = banner_layout(banner, x, y, width, measure);
                y += layout.rect.height + PAGE_MARGIN;
                layout
            });
            let carousel = stages.get(i).and_then(|stage| {
                let view = stage.view.as_ref()?;
                let layout = carousel_layout(view, x, y, width, stage.viewport_height, measure);
                y += layout.section.height + PAGE_MARGIN;
                Some(layout)
            });
            sections.push(SectionLayout { heading, text, banner, carousel });
        }

        PageLayout {
            title,
            intro,
            banner,
            sections,
            content_height: y - top + PAGE_MARGIN,
        }
    }

    /// Largest scroll offset that still keeps the page bottom on screen.
    pub fn max_scroll(&self, screen_height: f32) -> f32 {
        (self.content_height - screen_height).max(0.0)
    }

    pub fn carousel(&self, section: usize) -> Option<&CarouselLayout> {
        self.sections.get(section)?.carousel.as_ref()
    }
}

fn banner_layout(banner: &Banner, x: f32, y: f32, width: f32, measure: &dyn Fn(&str, i32) -> i32) -> BannerLayout {
    let padding = 16.0;
    let inner_x = x + padding + 4.0;
    let inner_width = width - padding * 2.0 - 4.0;
    let mut inner_y = y + padding;

    let title = (!banner.title.is_empty()).then(|| {
        let block = TextBlock {
            lines: vec![banner.title.clone()],
            x: inner_x,
            y: inner_y,
            font_size: HEADER_FONT_SIZE,
        };
        inner_y += line_height(HEADER_FONT_SIZE);
        block
    });
    let text = TextBlock {
        lines: wrap_text(&banner.text, inner_width, BODY_FONT_SIZE, measure),
        x: inner_x,
        y: inner_y,
        font_size: BODY_FONT_SIZE,
    };
    inner_y += text.lines.len() as f32 * line_height(BODY_FONT_SIZE);

    BannerLayout {
        rect: Rectangle::new(x, y, width, inner_y + padding - y),
        title,
        text,
    }
}

fn carousel_layout(
    view: &CarouselView,
    x: f32,
    y: f32,
    width: f32,
    viewport_height: f32,
    measure: &dyn Fn(&str, i32) -> i32,
) -> CarouselLayout {
    let padding = 18.0;
    let header_x = x + padding + 4.0 + 16.0;   // Accent bar plus indent
    let header_width = width - (header_x - x) - padding;
    let mut cursor = y + padding;

    let count_width = measure(&view.position, COUNT_FONT_SIZE) as f32 + 16.0;
    let count = Rectangle::new(
        x + width - padding - count_width,
        cursor + (line_height(HEADER_FONT_SIZE) - line_height(COUNT_FONT_SIZE)) * 0.5,
        count_width,
        line_height(COUNT_FONT_SIZE),
    );
    let title = TextBlock {
        lines: vec![view.title.to_string()],
        x: header_x,
        y: cursor,
        font_size: HEADER_FONT_SIZE,
    };
    cursor += line_height(HEADER_FONT_SIZE);

    let description = view.description.map(|description| {
        let block = TextBlock {
            lines: wrap_text(description, header_width, BODY_FONT_SIZE, measure),
            x: header_x,
            y: cursor,
            font_size: BODY_FONT_SIZE,
        };
        cursor += block.lines.len() as f32 * line_height(BODY_FONT_SIZE);
        block
    });
    cursor += padding * 0.5;

    let viewport = Rectangle::new(
        x + STAGE_PADDING_X,
        cursor + STAGE_PADDING_Y,
        (width - STAGE_PADDING_X * 2.0).max(1.0),
        viewport_height,
    );
    let stage = Rectangle::new(x, cursor, width, viewport_height + STAGE_PADDING_Y * 2.0);
    let button_y = stage.y + stage.height * 0.5 - NAV_BUTTON_SIZE * 0.5;

    CarouselLayout {
        section: Rectangle::new(x, y, width, stage.y + stage.height - y),
        title,
        count,
        description,
        stage,
        viewport,
        prev_button: Rectangle::new(x + NAV_BUTTON_INSET, button_y, NAV_BUTTON_SIZE, NAV_BUTTON_SIZE),
        next_button: Rectangle::new(
            x + width - NAV_BUTTON_INSET - NAV_BUTTON_SIZE,
            button_y,
            NAV_BUTTON_SIZE,
            NAV_BUTTON_SIZE,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Carousel, HeightObserver, MotionPreference};
    use crate::deck::Section;
    use crate::slide::Slide;
    use pretty_assertions::assert_eq;

    fn fixed_width(text: &str, _font_size: i32) -> i32 {
        text.chars().count() as i32 * 10
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("run interact stop disappear", 120.0, 20, &fixed_width);
        assert_eq!(lines, vec!["run interact", "stop", "disappear"]);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap_text("a kubernetes-deployment b", 50.0, 20, &fixed_width);
        assert_eq!(lines, vec!["a", "kubernetes-deployment", "b"]);
    }

    #[test]
    fn keeps_paragraph_breaks() {
        let lines = wrap_text("one\ntwo", 500.0, 20, &fixed_width);
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn image_height_scales_to_viewport_width() {
        let frame = Frame::Image { image_ref: "a.png", alt: "a".into() };
        let ready = ImageState::Ready { width: 1600.0, height: 900.0 };
        assert_eq!(frame_content_height(&frame, 800.0, ready), 450.0);
        assert_eq!(frame_content_height(&frame, 800.0, ImageState::Loading), EMPTY_FRAME_HEIGHT);
        assert_eq!(frame_content_height(&frame, 800.0, ImageState::Failed), EMPTY_FRAME_HEIGHT);
    }

    #[test]
    fn code_height_grows_with_lines() {
        let one = code_block_height("FROM alpine");
        let three = code_block_height("FROM alpine\nRUN apk add curl\nCMD [\"sh\"]");
        assert_eq!(three - one, 2.0 * line_height(CODE_FONT_SIZE));
        assert_eq!(code_block_height(""), one);
    }

    #[test]
    fn column_is_centered_and_capped() {
        let (x, width) = column(1600.0);
        assert_eq!(width, PAGE_MAX_WIDTH);
        assert_eq!(x, (1600.0 - PAGE_MAX_WIDTH) * 0.5);

        let (x, width) = column(600.0);
        assert_eq!(width, 600.0 - PAGE_MARGIN * 2.0);
        assert_eq!(x, PAGE_MARGIN);
    }

    #[test]
    fn page_without_sections_has_no_carousel() {
        let deck = Deck { title: "Terraform".into(), ..Deck::default() };
        let layout = PageLayout::compute(1280.0, 0.0, &deck, &[], &fixed_width);
        assert!(layout.sections.is_empty());
        assert_eq!(layout.max_scroll(800.0), 0.0);
    }

    #[test]
    fn viewport_follows_requested_height() {
        let deck = Deck {
            title: "Docker".into(),
            sections: vec![Section::default()],
            ..Deck::default()
        };
        let carousel = Carousel::new(
            vec![Slide::code("a", "x"), Slide::code("b", "y")],
            0,
            HeightObserver::new(),
        );
        let stages = [Stage {
            view: carousel.view(MotionPreference::default()),
            viewport_height: 340.0,
            track_offset: 0.0,
        }];
        let layout = PageLayout::compute(1280.0, 0.0, &deck, &stages, &fixed_width);
        let carousel = layout.carousel(0).unwrap();

        assert_eq!(carousel.viewport.height, 340.0);
        assert_eq!(carousel.viewport.width, viewport_width(1280.0));
        assert_eq!(carousel.stage.height, 340.0 + STAGE_PADDING_Y * 2.0);
        assert!(carousel.prev_button.x < carousel.viewport.x);
        assert!(carousel.next_button.x > carousel.viewport.x + carousel.viewport.width);
    }

    #[test]
    fn sections_stack_heading_text_then_carousel() {
        let section = Section {
            heading: Some("Meet the container".into()),
            text: Some("Run an interactive container first.".into()),
            ..Section::default()
        };
        let deck = Deck {
            title: "Docker".into(),
            sections: vec![section, Section { heading: Some("Wrap up".into()), ..Section::default() }],
            ..Deck::default()
        };
        let first = Carousel::new(vec![Slide::code("a", "x")], 0, HeightObserver::new());
        let stages = [
            Stage { view: first.view(MotionPreference::default()), viewport_height: 200.0, track_offset: 0.0 },
            Stage { view: None, viewport_height: 0.0, track_offset: 0.0 },
        ];
        let layout = PageLayout::compute(1280.0, 0.0, &deck, &stages, &fixed_width);

        let heading = layout.sections[0].heading.as_ref().unwrap();
        let text = layout.sections[0].text.as_ref().unwrap();
        let carousel = layout.carousel(0).unwrap();
        assert!(heading.y < text.y);
        assert!(text.y < carousel.section.y);

        let next = layout.sections[1].heading.as_ref().unwrap();
        assert!(next.y > carousel.section.y + carousel.section.height);
        assert!(layout.carousel(1).is_none());
    }

    #[test]
    fn scrolling_shifts_everything_up() {
        let deck = Deck { title: "Docker".into(), ..Deck::default() };
        let still = PageLayout::compute(1280.0, 0.0, &deck, &[], &fixed_width);
        let scrolled = PageLayout::compute(1280.0, 40.0, &deck, &[], &fixed_width);
        assert_eq!(still.title.y - scrolled.title.y, 40.0);
        assert_eq!(still.content_height, scrolled.content_height);
    }

    #[test]
    fn default_banner_gets_a_heading() {
        let banner: Banner = serde_json::from_str(r#"{ "text": "Heads up" }"#).unwrap();
        let layout = banner_layout(&banner, 0.0, 0.0, 600.0, &fixed_width);
        assert_eq!(layout.title.map(|t| t.lines), Some(vec!["Note".to_string()]));
    }

    #[test]
    fn loading_image_size_is_not_final() {
        let image = Frame::Image { image_ref: "a.png", alt: "a".into() };
        assert!(!has_settled_size(&image, ImageState::Loading));
        assert!(has_settled_size(&image, ImageState::Failed));
        assert!(has_settled_size(&image, ImageState::Ready { width: 10.0, height: 5.0 }));
        assert!(has_settled_size(&Frame::Code { code: "x" }, ImageState::Loading));
    }
}
