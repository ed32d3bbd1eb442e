use crate::carousel::index::{IndexController, Navigation};

/// Keys the carousel distinguishes; everything else is `Other`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CarouselKey {
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    Other,
}

/// Whether a key was consumed. A consumed key must not trigger the page's
/// own handling of it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyOutcome {
    Consumed,
    Ignored,
}

impl KeyOutcome {
    pub fn suppresses_default(self) -> bool {
        self == KeyOutcome::Consumed
    }
}

impl CarouselKey {
    pub fn navigation(self) -> Option<Navigation> {
        match self {
            CarouselKey::ArrowLeft => Some(Navigation::Prev),
            CarouselKey::ArrowRight => Some(Navigation::Next),
            CarouselKey::Home => Some(Navigation::Home),
            CarouselKey::End => Some(Navigation::End),
            CarouselKey::Other => None,
        }
    }
}

/// Routes keys to the index controller while the carousel region has focus.
#[derive(Debug, Default)]
pub struct KeyboardRouter {
    focused: bool,
}

impl KeyboardRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn route(&self, key: CarouselKey, index: &mut IndexController) -> KeyOutcome {
        if !self.focused {
            return KeyOutcome::Ignored;
        }
        match key.navigation() {
            Some(navigation) => {
                index.apply(navigation);
                KeyOutcome::Consumed
            }
            None => KeyOutcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused() -> KeyboardRouter {
        let mut router = KeyboardRouter::new();
        router.set_focus(true);
        router
    }

    #[test]
    fn directional_keys_navigate_and_suppress() {
        let router = focused();
        let mut index = IndexController::new(1, 4);

        assert_eq!(router.route(CarouselKey::ArrowRight, &mut index), KeyOutcome::Consumed);
        assert_eq!(index.index(), Some(2));
        assert_eq!(router.route(CarouselKey::ArrowLeft, &mut index), KeyOutcome::Consumed);
        assert_eq!(index.index(), Some(1));
        assert_eq!(router.route(CarouselKey::End, &mut index), KeyOutcome::Consumed);
        assert_eq!(index.index(), Some(3));
        assert_eq!(router.route(CarouselKey::Home, &mut index), KeyOutcome::Consumed);
        assert_eq!(index.index(), Some(0));
    }

    #[test]
    fn keys_are_consumed_even_at_the_bounds() {
        let router = focused();
        let mut index = IndexController::new(0, 2);
        let outcome = router.route(CarouselKey::ArrowLeft, &mut index);
        assert!(outcome.suppresses_default());
        assert_eq!(index.index(), Some(0));
    }

    #[test]
    fn other_keys_pass_through() {
        let router = focused();
        let mut index = IndexController::new(1, 3);
        let outcome = router.route(CarouselKey::Other, &mut index);
        assert!(!outcome.suppresses_default());
        assert_eq!(index.index(), Some(1));
    }

    #[test]
    fn unfocused_router_leaves_index_alone() {
        let router = KeyboardRouter::new();
        let mut index = IndexController::new(0, 3);
        assert_eq!(router.route(CarouselKey::ArrowRight, &mut index), KeyOutcome::Ignored);
        assert_eq!(index.index(), Some(0));
    }

    #[test]
    fn arrow_right_matches_go_next() {
        let router = focused();
        let mut routed = IndexController::new(1, 5);
        let mut direct = routed;
        router.route(CarouselKey::ArrowRight, &mut routed);
        direct.go_next();
        assert_eq!(routed, direct);
    }
}
