//! Segment clipping against an axis-aligned box.

use kurbo::{Point, Rect};

const OUT_TOP: u8 = 1 << 1;
const OUT_BOTTOM: u8 = 1 << 2;
const OUT_LEFT: u8 = 1 << 3;
const OUT_RIGHT: u8 = 1 << 4;

fn outcode(pt: Point, rect: &Rect) -> u8 {
    let mut code = 0;
    if pt.y > rect.y1 {
        code |= OUT_TOP;
    } else if pt.y < rect.y0 {
        code |= OUT_BOTTOM;
    }
    if pt.x < rect.x0 {
        code |= OUT_LEFT;
    } else if pt.x > rect.x1 {
        code |= OUT_RIGHT;
    }
    code
}

/// Clip segment `pt1→pt2` to `rect` (Cohen–Sutherland).
///
/// Returns the clipped endpoints, or `None` when the segment lies wholly
/// outside. The box does not need to be normalized.
pub fn clip_line(mut pt1: Point, mut pt2: Point, rect: Rect) -> Option<(Point, Point)> {
    let rect = rect.abs();
    let mut code1 = outcode(pt1, &rect);
    let mut code2 = outcode(pt2, &rect);

    loop {
        if code1 == 0 && code2 == 0 {
            return Some((pt1, pt2));
        }
        if code1 & code2 != 0 {
            return None;
        }

        let code = if code1 != 0 { code1 } else { code2 };
        let moved = if code & OUT_TOP != 0 {
            Point::new(pt1.x + (pt2.x - pt1.x) * (rect.y1 - pt1.y) / (pt2.y - pt1.y), rect.y1)
        } else if code & OUT_BOTTOM != 0 {
            Point::new(pt1.x + (pt2.x - pt1.x) * (rect.y0 - pt1.y) / (pt2.y - pt1.y), rect.y0)
        } else if code & OUT_LEFT != 0 {
            Point::new(rect.x0, pt1.y + (pt2.y - pt1.y) * (rect.x0 - pt1.x) / (pt2.x - pt1.x))
        } else {
            Point::new(rect.x1, pt1.y + (pt2.y - pt1.y) * (rect.x1 - pt1.x) / (pt2.x - pt1.x))
        };

        if code == code1 {
            pt1 = moved;
            code1 = outcode(pt1, &rect);
        } else {
            pt2 = moved;
            code2 = outcode(pt2, &rect);
        }
    }
}
