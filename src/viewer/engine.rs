use std::path::PathBuf;
use raylib::prelude::*;
use tracing::{debug, info, warn};

use crate::carousel::{CarouselEvent, CarouselKey, HeightObserver, MotionPreference, Navigation};
use crate::config::ViewerConfig;
use crate::constants::*;
use crate::deck::Deck;
use crate::engine::Engine;
use crate::state::Focus;
use crate::texture_loader::{create_texture, ImageLoader};
use crate::viewer::code_block::CodeBlock;
use crate::viewer::layout::{viewport_width, PageLayout, Stage};
use crate::viewer::page::{draw_page, text_width, PageScene, SlideSurface};
use crate::viewer::panel::CarouselPanel;

pub struct CarouselEngine {
    deck_path: PathBuf,
    motion: MotionPreference,
    observe_height: bool,

    deck: Deck,                     // Page text; slides live in the panels
    panels: Vec<CarouselPanel>,     // One per deck section
    loader: ImageLoader,

    focus: Focus,
    scroll: f32,
    layout: Option<PageLayout>,     // Last drawn layout, for hit testing
}

/// A page-level key action, run when the carousel did not consume the key.
#[derive(Debug, PartialEq, Clone, Copy)]
enum PageAction {
    ScrollBy(f32),
    ScrollToTop,
    ScrollToBottom,
}

/// Keys that keep acting while held.
const REPEATING_KEYS: [KeyboardKey; 6] = [
    KeyboardKey::KEY_LEFT,
    KeyboardKey::KEY_RIGHT,
    KeyboardKey::KEY_UP,
    KeyboardKey::KEY_DOWN,
    KeyboardKey::KEY_PAGE_UP,
    KeyboardKey::KEY_PAGE_DOWN,
];

fn carousel_key(key: KeyboardKey) -> CarouselKey {
    match key {
        KeyboardKey::KEY_LEFT => CarouselKey::ArrowLeft,
        KeyboardKey::KEY_RIGHT => CarouselKey::ArrowRight,
        KeyboardKey::KEY_HOME => CarouselKey::Home,
        KeyboardKey::KEY_END => CarouselKey::End,
        _ => CarouselKey::Other,
    }
}

fn page_action(key: KeyboardKey, screen_height: f32) -> Option<PageAction> {
    match key {
        KeyboardKey::KEY_UP => Some(PageAction::ScrollBy(-SCROLL_STEP)),
        KeyboardKey::KEY_DOWN => Some(PageAction::ScrollBy(SCROLL_STEP)),
        KeyboardKey::KEY_PAGE_UP => Some(PageAction::ScrollBy(-screen_height * 0.9)),
        KeyboardKey::KEY_PAGE_DOWN => Some(PageAction::ScrollBy(screen_height * 0.9)),
        KeyboardKey::KEY_HOME => Some(PageAction::ScrollToTop),
        KeyboardKey::KEY_END => Some(PageAction::ScrollToBottom),
        _ => None,
    }
}

impl CarouselEngine {
    fn observer(&self) -> HeightObserver {
        if self.observe_height {
            HeightObserver::new()
        } else {
            HeightObserver::unsupported()
        }
    }

    /// Move the slides out of `deck` into fresh panels and keep the page text.
    fn build_panels(&mut self, mut deck: Deck) {
        for panel in self.panels.iter_mut() {
            panel.unmount();
        }
        let duration = self.motion.duration(TRANSITION_DURATION);
        let mut panels = Vec::with_capacity(deck.sections.len());
        for (i, section) in deck.sections.iter_mut().enumerate() {
            let slides = std::mem::take(&mut section.slides);
            let mut panel = CarouselPanel::new(i, slides, section.initial_index, self.observer(), duration);
            panel.mount_slides(&self.loader);
            panels.push(panel);
        }
        self.panels = panels;
        self.deck = deck;
        self.set_focus(Focus::Page);
    }

    /// Sections whose carousel can take focus, in page order.
    fn focusable(&self) -> Vec<usize> {
        self.panels
            .iter()
            .enumerate()
            .filter(|(_, panel)| !panel.carousel.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    fn set_focus(&mut self, focus: Focus) {
        let focus = match focus.carousel() {
            Some(section) if !self.focusable().contains(&section) => Focus::Page,
            _ => focus,
        };
        if self.focus != focus {
            debug!(?focus, "focus changed");
        }
        self.focus = focus;
        for (i, panel) in self.panels.iter_mut().enumerate() {
            let focused = focus == Focus::Carousel(i);
            panel.carousel.dispatch(CarouselEvent::Focus(focused));
        }
    }

    fn reload(&mut self) {
        let mut deck = match Deck::load(&self.deck_path) {
            Ok(deck) => deck,
            Err(e) => {
                warn!(error = %e, "deck reload failed, keeping current slides");
                return;
            }
        };
        info!(path = ?self.deck_path, sections = deck.sections.len(), slides = deck.slide_count(), "deck reloaded");

        if deck.sections.len() != self.panels.len() {
            debug!(before = self.panels.len(), after = deck.sections.len(), "section count changed, rebuilding carousels");
            self.build_panels(deck);
            return;
        }
        for (section, panel) in deck.sections.iter_mut().zip(self.panels.iter_mut()) {
            panel.replace_slides(std::mem::take(&mut section.slides), &self.loader);
        }
        self.deck = deck;
        self.set_focus(self.focus);
    }

    fn receive_images(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        for loaded in self.loader.poll() {
            let Some(panel) = self.panels.get_mut(loaded.section) else {
                debug!(section = loaded.section, "discarding image for a removed section");
                continue;
            };
            if !panel.mounts.is_mounted(loaded.position) {
                debug!(position = loaded.position, "discarding image for unmounted slide");
                continue;
            }
            let surface = match loaded.image.and_then(|raw| create_texture(rl, thread, &raw)) {
                Ok(texture) => SlideSurface::Texture(texture),
                Err(e) => {
                    warn!(section = loaded.section, position = loaded.position, error = %e, "image slide failed to load");
                    SlideSurface::Failed
                }
            };
            if !panel.mounts.fill(loaded.position, &loaded.key, &loaded.image_ref, surface) {
                debug!(position = loaded.position, "discarding image for a replaced slide");
            }
        }
    }

    fn handle_mouse(&mut self, rl: &mut RaylibHandle) {
        if !rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            return;
        }
        let point = rl.get_mouse_position();
        let hit = self.layout.as_ref().and_then(|layout| {
            layout.sections.iter().enumerate().find_map(|(i, section)| {
                section
                    .carousel
                    .as_ref()
                    .filter(|carousel| carousel.stage.check_collision_point_rec(point))
                    .map(|carousel| (i, carousel.clone()))
            })
        });
        let Some((section, layout)) = hit else {
            self.set_focus(Focus::Page);
            return;
        };

        self.set_focus(Focus::Carousel(section));
        let Some(panel) = self.panels.get_mut(section) else {
            return;
        };
        if layout.prev_button.check_collision_point_rec(point) {
            if panel.carousel.can_go_prev() {
                panel.carousel.dispatch(CarouselEvent::Navigate(Navigation::Prev));
            }
        } else if layout.next_button.check_collision_point_rec(point) {
            if panel.carousel.can_go_next() {
                panel.carousel.dispatch(CarouselEvent::Navigate(Navigation::Next));
            }
        } else if layout.viewport.check_collision_point_rec(point) {
            // The active frame sits under the viewport only once the track has settled
            let Some(index) = panel.carousel.state().map(|s| s.index) else {
                return;
            };
            if panel.is_settled() && CodeBlock::copy_button(layout.viewport).check_collision_point_rec(point) {
                let slide = &panel.carousel.slides()[index];
                if let (Some(code), None) = (slide.code.clone(), &slide.image) {
                    panel.code_block.copy(rl, index, &code);
                }
            }
        }
    }

    fn handle_keys(&mut self, rl: &mut RaylibHandle) -> Vec<PageAction> {
        let screen_height = rl.get_screen_height() as f32;
        let mut actions = Vec::new();
        while let Some(key) = rl.get_key_pressed() {
            match key {
                KeyboardKey::KEY_TAB => self.set_focus(self.focus.next(&self.focusable())),
                KeyboardKey::KEY_ESCAPE => self.set_focus(Focus::Page),
                KeyboardKey::KEY_F5 => self.reload(),
                _ => self.route_key(key, screen_height, &mut actions),
            }
        }
        // Auto-repeat never reaches the pressed-key queue
        for key in REPEATING_KEYS {
            if rl.is_key_pressed_repeat(key) {
                self.route_key(key, screen_height, &mut actions);
            }
        }
        actions
    }

    /// Offer `key` to the focused carousel; page actions run when it is not consumed.
    fn route_key(&mut self, key: KeyboardKey, screen_height: f32, actions: &mut Vec<PageAction>) {
        let consumed = match self.focus.carousel().and_then(|i| self.panels.get_mut(i)) {
            Some(panel) => {
                let update = panel.carousel.dispatch(CarouselEvent::Key(carousel_key(key)));
                update.key.is_some_and(|outcome| outcome.suppresses_default())
            }
            None => false,
        };
        if !consumed {
            actions.extend(page_action(key, screen_height));
        }
    }

    fn apply_page_actions(&mut self, actions: &[PageAction], wheel: f32, max_scroll: f32) {
        for action in actions {
            self.scroll = match *action {
                PageAction::ScrollBy(delta) => self.scroll + delta,
                PageAction::ScrollToTop => 0.0,
                PageAction::ScrollToBottom => max_scroll,
            };
        }
        self.scroll = (self.scroll - wheel * SCROLL_STEP).clamp(0.0, max_scroll);
    }
}

impl Engine for CarouselEngine {
    fn new(config: &ViewerConfig) -> Self {
        Self {
            deck_path: config.deck.clone(),
            motion: config.motion(),
            observe_height: !config.no_height_observer,
            deck: Deck::default(),
            panels: Vec::new(),
            loader: ImageLoader::spawn(),
            focus: Focus::Page,
            scroll: 0.0,
            layout: None,
        }
    }

    fn initialize(&mut self, deck: Deck) -> bool {
        self.build_panels(deck);
        !self.focusable().is_empty()
    }

    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread) -> bool {
        // 1. Deliver last frame's measurements and finished image reads
        for panel in self.panels.iter_mut() {
            panel.deliver_measurements();
        }
        self.receive_images(rl, thread);

        // 2. Input
        self.handle_mouse(rl);
        let actions = self.handle_keys(rl);
        let wheel = rl.get_mouse_wheel_move();

        // 3. Height observation and transitions
        let motion = self.motion;
        let screen_width = rl.get_screen_width() as f32;
        let screen_height = rl.get_screen_height() as f32;
        let slot_width = viewport_width(screen_width);
        for panel in self.panels.iter_mut() {
            panel.step(dt, motion, slot_width);
        }

        // 4. Layout and draw
        let stages: Vec<Stage> = self.panels.iter().map(|panel| panel.stage(motion)).collect();
        let layout = PageLayout::compute(screen_width, self.scroll, &self.deck, &stages, &text_width);
        let max_scroll = layout.max_scroll(screen_height);
        {
            let mut d = rl.begin_drawing(thread);
            draw_page(
                &mut d,
                &PageScene {
                    deck: &self.deck,
                    layout: &layout,
                    stages: &stages,
                    panels: &self.panels,
                    focus: self.focus,
                },
            );
        }
        drop(stages);

        self.layout = Some(layout);
        self.apply_page_actions(&actions, wheel, max_scroll);
        for panel in self.panels.iter_mut() {
            panel.code_block.update(dt);
        }

        !rl.window_should_close()
    }
}

impl Drop for CarouselEngine {
    fn drop(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.unmount();
        }
    }
}
