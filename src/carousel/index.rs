/// Constrain `index` into `[0, len - 1]`. There is no valid index when `len == 0`.
pub fn clamp(index: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = (len - 1) as i64;
    Some(index.clamp(0, last) as usize)
}

/// A navigation request against an [`IndexController`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Navigation {
    Prev,
    Next,
    Home,
    End,
    To(i64),
}

/// Single authoritative cursor over a bounded collection.
///
/// Every operation saturates at the nearest bound instead of failing. When the
/// collection is empty the controller holds no index at all.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct IndexController {
    index: usize,
    len: usize,
}

impl IndexController {
    pub fn new(initial_index: i64, len: usize) -> Self {
        Self {
            index: clamp(initial_index, len).unwrap_or(0),
            len,
        }
    }

    pub fn index(&self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn can_go_prev(&self) -> bool {
        self.len > 0 && self.index > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.len > 0 && self.index < self.len - 1
    }

    /// Returns whether the index changed.
    pub fn go_to(&mut self, index: i64) -> bool {
        match clamp(index, self.len) {
            Some(next) if next != self.index => {
                self.index = next;
                true
            }
            _ => false,
        }
    }

    pub fn go_prev(&mut self) -> bool {
        self.go_to(self.index as i64 - 1)
    }

    pub fn go_next(&mut self) -> bool {
        self.go_to(self.index as i64 + 1)
    }

    pub fn go_home(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn go_end(&mut self) -> bool {
        self.go_to(self.len as i64 - 1)
    }

    pub fn apply(&mut self, navigation: Navigation) -> bool {
        match navigation {
            Navigation::Prev => self.go_prev(),
            Navigation::Next => self.go_next(),
            Navigation::Home => self.go_home(),
            Navigation::End => self.go_end(),
            Navigation::To(index) => self.go_to(index),
        }
    }

    /// Adopt a new collection length, re-clamping the current index once.
    /// Returns whether the index moved.
    pub fn set_len(&mut self, len: usize) -> bool {
        self.len = len;
        let next = clamp(self.index as i64, len).unwrap_or(0);
        let moved = next != self.index;
        self.index = next;
        moved
    }
}
