use std::path::PathBuf;
use clap::Parser;

use crate::carousel::MotionPreference;
use crate::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};

/// Browse a deck of code snippets and screenshots as a carousel.
#[derive(Debug, Clone, Parser)]
#[command(name = "carousel", version, about)]
pub struct ViewerConfig {
    /// Deck manifest (JSON) or a directory of images and code files
    pub deck: PathBuf,

    /// Slide to start on, overriding the manifest; out-of-range values are clamped
    #[arg(long, allow_negative_numbers = true)]
    pub initial_index: Option<i64>,

    /// Initial window width
    #[arg(long, default_value_t = WINDOW_WIDTH)]
    pub width: i32,

    /// Initial window height
    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    pub height: i32,

    /// Cut between slides instead of animating
    #[arg(long, env = "CAROUSEL_REDUCED_MOTION")]
    pub reduced_motion: bool,

    /// Run without height observation; the viewport takes each slide's natural height
    #[arg(long)]
    pub no_height_observer: bool,

    /// Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ViewerConfig {
    pub fn motion(&self) -> MotionPreference {
        MotionPreference { reduced: self.reduced_motion }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ViewerConfig::try_parse_from(["carousel", "decks/docker.json"]).unwrap();
        assert_eq!(config.deck, PathBuf::from("decks/docker.json"));
        assert_eq!(config.initial_index, None);
        assert_eq!(config.width, WINDOW_WIDTH);
        assert!(!config.no_height_observer);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn flags() {
        let config = ViewerConfig::try_parse_from([
            "carousel",
            "snippets",
            "--initial-index",
            "-3",
            "--reduced-motion",
            "--no-height-observer",
        ])
        .unwrap();
        assert_eq!(config.initial_index, Some(-3));
        assert!(config.motion().reduced);
        assert!(config.no_height_observer);
    }

    #[test]
    fn deck_is_required() {
        assert!(ViewerConfig::try_parse_from(["carousel"]).is_err());
    }
}
