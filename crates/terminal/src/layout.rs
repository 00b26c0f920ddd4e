//! Mapping between the panel's pixel space and terminal cells.
//!
//! The app lays everything out in pixels of a fixed logical screen; the
//! terminal stretches that screen over whatever area it has.

use portal_core::{Bounds, Point};
use ratatui::layout::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenMap {
    /// Logical screen size in pixels.
    width:  u16,
    height: u16,
    /// Terminal area the screen is drawn into.
    area:   Rect,
}

impl ScreenMap {
    pub fn new(width: u16, height: u16, area: Rect) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            area,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// The whole logical screen in pixels.
    pub fn screen(&self) -> Bounds {
        Bounds::new(0, 0, self.width, self.height)
    }

    /// Pixel at the centre of a cell, `None` outside the drawn area.
    pub fn cell_to_point(&self, column: u16, row: u16) -> Option<Point> {
        let a = self.area;
        if a.width == 0 || a.height == 0 {
            return None;
        }
        if column < a.x || row < a.y || column >= a.right() || row >= a.bottom() {
            return None;
        }
        let x = scale_centre(column - a.x, a.width, self.width);
        let y = scale_centre(row - a.y, a.height, self.height);
        Some(Point::new(x, y))
    }

    /// Cells covering a pixel rectangle.  Edges round to the nearest cell
    /// boundary so adjacent rectangles stay adjacent.
    pub fn to_rect(&self, b: Bounds) -> Rect {
        let a = self.area;
        let left = scale_edge(b.x, self.width, a.width);
        let top = scale_edge(b.y, self.height, a.height);
        let right = scale_edge(b.x.saturating_add(b.width), self.width, a.width);
        let bottom = scale_edge(b.y.saturating_add(b.height), self.height, a.height);
        Rect::new(
            a.x + left,
            a.y + top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }
}

/// Cell index `i` of `cells` to the pixel at its centre in `0..pixels`.
fn scale_centre(i: u16, cells: u16, pixels: u16) -> u16 {
    let v = (u32::from(i) * 2 + 1) * u32::from(pixels) / (u32::from(cells) * 2);
    v.min(u32::from(pixels) - 1) as u16
}

/// Pixel edge `p` in `0..=pixels` to a cell edge in `0..=cells`.
fn scale_edge(p: u16, pixels: u16, cells: u16) -> u16 {
    let p = u32::from(p.min(pixels));
    ((p * u32::from(cells) + u32::from(pixels) / 2) / u32::from(pixels)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> ScreenMap {
        // 240x320 px on a 60x40 cell terminal: 4 px per column, 8 per row.
        ScreenMap::new(240, 320, Rect::new(0, 0, 60, 40))
    }

    #[test]
    fn cell_centres() {
        let m = map();
        assert_eq!(m.cell_to_point(0, 0), Some(Point::new(2, 4)));
        assert_eq!(m.cell_to_point(59, 39), Some(Point::new(238, 316)));
        assert_eq!(m.cell_to_point(30, 5), Some(Point::new(122, 44)));
    }

    #[test]
    fn outside_area_is_no_touch() {
        let m = ScreenMap::new(240, 320, Rect::new(10, 2, 60, 40));
        assert_eq!(m.cell_to_point(9, 5), None);
        assert_eq!(m.cell_to_point(70, 5), None);
        assert_eq!(m.cell_to_point(10, 42), None);
        assert_eq!(m.cell_to_point(10, 2), Some(Point::new(2, 4)));
    }

    #[test]
    fn empty_area_maps_nothing() {
        let m = ScreenMap::new(240, 320, Rect::new(0, 0, 0, 0));
        assert_eq!(m.cell_to_point(0, 0), None);
    }

    #[test]
    fn tabs_map_to_adjacent_rects() {
        let m = map();
        let a = m.to_rect(Bounds::new(0, 0, 80, 50));
        let b = m.to_rect(Bounds::new(80, 0, 80, 50));
        let c = m.to_rect(Bounds::new(160, 0, 80, 50));
        assert_eq!(a, Rect::new(0, 0, 20, 6));
        assert_eq!(b.x, a.right());
        assert_eq!(c.right(), 60);
    }

    #[test]
    fn touch_lands_in_the_rect_it_maps_from() {
        let m = ScreenMap::new(240, 320, Rect::new(0, 0, 73, 31));
        let tab = Bounds::new(80, 0, 80, 50);
        let rect = m.to_rect(tab);
        for col in rect.x..rect.right() {
            for row in rect.y..rect.bottom() {
                let p = m.cell_to_point(col, row).unwrap();
                assert!(tab.contains(p), "cell ({col},{row}) -> {p:?}");
            }
        }
    }
}
