use anyhow::{Context, Result};
use clap::Parser;
use raylib::prelude::*;
use tracing::{info, warn};

mod carousel;
mod config;
mod constants;
mod deck;
mod engine;
mod slide;
mod state;
mod texture_loader;
mod viewer;

use crate::config::ViewerConfig;
use crate::constants::*;
use crate::deck::Deck;
use crate::engine::Engine;
use crate::viewer::CarouselEngine;

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("carousel={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    let config = ViewerConfig::parse();
    init_logging(&config.log_level);

    let mut deck = Deck::load(&config.deck)
        .with_context(|| format!("loading deck from {}", config.deck.display()))?;
    if let Some(index) = config.initial_index {
        deck.set_initial_index(index);
    }
    let title = if deck.title.is_empty() { "Snippet Carousel".to_string() } else { deck.title.clone() };

    let (mut rl, thread) = raylib::init()
        .size(config.width, config.height)
        .title(&title)
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    // Escape moves focus back to the page
    rl.set_exit_key(Some(KeyboardKey::KEY_Q));

    let mut engine = CarouselEngine::new(&config);
    if !engine.initialize(deck) {
        warn!(path = %config.deck.display(), "deck has no slides, showing the page only");
    }

    info!(reduced_motion = config.reduced_motion, "viewer started");
    while engine.render_frame(rl.get_frame_time(), &mut rl, &thread) {}
    info!("viewer closed");

    Ok(())
}
