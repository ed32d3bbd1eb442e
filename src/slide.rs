use std::borrow::Cow;
use serde::Deserialize;

/// One navigable unit of carousel content.
///
/// At most one of `image` and `code` is displayed: an image wins when both are
/// present, and a slide with neither renders an empty frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "src", alias = "image_ref")]
    pub image: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// What a slide's frame displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideContent<'a> {
    Image { image_ref: &'a str },
    Code { code: &'a str },
    Empty,
}

/// Identity of a slide for mounting purposes: its `id`, or its position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlideKey {
    Id(String),
    Position(usize),
}

impl Slide {
    pub fn code(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn image(title: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            image: Some(image_ref.into()),
            ..Self::default()
        }
    }

    pub fn content(&self) -> SlideContent<'_> {
        if let Some(image_ref) = self.image.as_deref() {
            SlideContent::Image { image_ref }
        } else if let Some(code) = self.code.as_deref() {
            SlideContent::Code { code }
        } else {
            SlideContent::Empty
        }
    }

    pub fn key(&self, position: usize) -> SlideKey {
        match &self.id {
            Some(id) => SlideKey::Id(id.clone()),
            None => SlideKey::Position(position),
        }
    }

    /// Header title, or an ordinal label for untitled slides.
    pub fn display_title(&self, position: usize) -> Cow<'_, str> {
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => Cow::Borrowed(title),
            None => Cow::Owned(format!("Snippet {}", position + 1)),
        }
    }

    /// Alt text for the image surface: explicit alt, then title, then an ordinal label.
    pub fn alt_text(&self, position: usize) -> Cow<'_, str> {
        self.alt
            .as_deref()
            .filter(|a| !a.is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.is_empty()))
            .map(Cow::Borrowed)
            .unwrap_or_else(|| Cow::Owned(format!("Slide {}", position + 1)))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}
