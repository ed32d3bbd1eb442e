pub mod code_block;
pub mod engine;
pub mod layout;
pub mod page;
pub mod panel;

pub use engine::CarouselEngine;
