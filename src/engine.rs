use raylib::prelude::*;

use crate::config::ViewerConfig;
use crate::deck::Deck;

pub trait Engine {
    fn new(config: &ViewerConfig) -> Self;
    /// Mount a deck. Returns false when it has no slides (the page still renders).
    fn initialize(&mut self, deck: Deck) -> bool;
    /// Process input and draw one frame. Returns false once the viewer should close.
    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread) -> bool;
}
