/// A touch position in screen pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x:      u16,
    pub y:      u16,
    pub width:  u16,
    pub height: u16,
}

impl Bounds {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open containment test: the right and bottom edges belong to the
    /// neighbouring rectangle, so adjacent buttons never both match.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let right  = u32::from(self.x) + u32::from(self.width);
        let bottom = u32::from(self.y) + u32::from(self.height);
        p.x >= self.x && u32::from(p.x) < right && p.y >= self.y && u32::from(p.y) < bottom
    }
}

/// A labelled touch target.
///
/// `selected` is purely presentational; each owner decides what it means
/// (the tab bar renders the *current* tab as not selected).
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label:    String,
    pub bounds:   Bounds,
    pub selected: bool,
}

impl Button {
    pub fn new(label: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            label: label.into(),
            bounds,
            selected: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }
}

/// Press latch used to debounce a touchscreen that reports a point on every
/// tick while a finger stays down.
///
/// Once latched, every sample is swallowed until a tick with no touch.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchLatch {
    latched: bool,
}

impl TouchLatch {
    pub const fn new() -> Self {
        Self { latched: false }
    }

    /// Feed one touch sample.  Returns the point when it may be acted on.
    pub fn sample(&mut self, point: Option<Point>) -> Option<Point> {
        match point {
            None => {
                self.latched = false;
                None
            }
            Some(_) if self.latched => None,
            Some(p) => Some(p),
        }
    }

    /// Ignore further samples until the touch is released.
    pub fn latch(&mut self) {
        self.latched = true;
    }
}
