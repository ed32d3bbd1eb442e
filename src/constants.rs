pub const WINDOW_WIDTH: i32 = 1280;           // Default window width
pub const WINDOW_HEIGHT: i32 = 800;           // Default window height
pub const FPS: u32 = 60;                      // Frames per second

pub const TRANSITION_DURATION: f32 = 0.24;    // Track and viewport transitions (seconds)
pub const COPIED_FEEDBACK_DURATION: f32 = 1.5; // How long "Copied" stays on the copy button (seconds)

pub const PAGE_MAX_WIDTH: f32 = 960.0;        // Post column width
pub const PAGE_MARGIN: f32 = 32.0;            // Space around the post column
pub const SCROLL_STEP: f32 = 48.0;            // Arrow key / wheel notch scroll distance

pub const TITLE_FONT_SIZE: i32 = 36;
pub const BODY_FONT_SIZE: i32 = 20;
pub const HEADER_FONT_SIZE: i32 = 24;
pub const COUNT_FONT_SIZE: i32 = 16;
pub const CODE_FONT_SIZE: i32 = 18;
pub const LINE_SPACING: f32 = 1.5;            // Line height as a multiple of the font size

pub const STAGE_PADDING_X: f32 = 62.0;        // Leaves room for the nav buttons
pub const STAGE_PADDING_Y: f32 = 16.0;
pub const NAV_BUTTON_SIZE: f32 = 42.0;
pub const NAV_BUTTON_INSET: f32 = 10.0;

pub const CODE_PADDING: f32 = 16.0;
pub const CODE_TOOLBAR_HEIGHT: f32 = 32.0;    // Strip holding the copy button
pub const COPY_BUTTON_WIDTH: f32 = 84.0;
pub const EMPTY_FRAME_HEIGHT: f32 = 48.0;
