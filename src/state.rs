/// Observable carousel state; only exists while there is at least one slide.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CarouselState {
    pub index: usize,
    pub measured_height: Option<u32>, // Last published height of the slide at `index`
}

/// Which region of the page receives keyboard input.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Focus {
    #[default]
    Page,
    Carousel(usize),                // Section index
}

impl Focus {
    pub fn carousel(self) -> Option<usize> {
        match self {
            Focus::Page => None,
            Focus::Carousel(section) => Some(section),
        }
    }

    /// Tab order: the page, then each focusable carousel in turn, then back to
    /// the page. `focusable` is sorted.
    pub fn next(self, focusable: &[usize]) -> Self {
        let after = match self {
            Focus::Page => focusable.first(),
            Focus::Carousel(current) => focusable.iter().find(|&&section| section > current),
        };
        after.map_or(Focus::Page, |&section| Focus::Carousel(section))
    }
}
