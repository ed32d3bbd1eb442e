//! Carousel core: bounded index navigation, height observation, keyboard
//! routing and the derived view. Nothing in here talks to raylib except the
//! easing used by [`motion::Transition`].

pub mod height;
pub mod index;
pub mod keyboard;
pub mod motion;
pub mod mounts;
pub mod view;
pub mod widget;

pub use height::{HeightObserver, Measurement, ObserverHandle, ResizeWatch};
pub use index::Navigation;
pub use keyboard::{CarouselKey, KeyOutcome};
pub use motion::{MotionPreference, Transition};
pub use mounts::SlideMounts;
pub use view::{CarouselView, Frame};
pub use widget::{Carousel, CarouselEvent, Update};
