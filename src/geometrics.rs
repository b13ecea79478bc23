#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<T = f64> {
    pub x: T,
    pub y: T,
}

pub type PhysicalPoint = Point<i32>;

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn snap(self) -> PhysicalPoint {
        PhysicalPoint {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
        }
    }
}

impl PhysicalPoint {
    pub fn unsnap(self) -> Point {
        Point {
            x: self.x as f64,
            y: self.y as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size<T = f64> {
    pub width: T,
    pub height: T,
}

pub type PhysicalSize = Size<u32>;

impl Size {
    pub fn snap(self) -> PhysicalSize {
        PhysicalSize {
            width: self.width.round() as u32,
            height: self.height.round() as u32,
        }
    }
}

impl PhysicalSize {
    pub fn unsnap(self) -> Size {
        Size {
            width: self.width as f64,
            height: self.height as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect<P = f64, S = f64> {
    pub x: P,
    pub y: P,
    pub width: S,
    pub height: S,
}

pub type PhysicalRect = Rect<i32, u32>;

impl<P, S> Rect<P, S> {
    pub fn new(position: Point<P>, size: Size<S>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }
}

impl Rect {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    // Half-open on both axes so adjacent rectangles never claim the
    // same point. A left-to-right scan therefore breaks ties toward
    // the lower index.
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }

    pub fn snap(&self) -> PhysicalRect {
        PhysicalRect {
            x: self.x.round() as i32,
            y: self.y.round() as i32,
            width: self.width.round() as u32,
            height: self.height.round() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        };
        assert!(rect.contains(Point { x: 10.0, y: 20.0 }));
        assert!(rect.contains(Point { x: 39.0, y: 59.0 }));
        assert!(!rect.contains(Point { x: 40.0, y: 30.0 }));
        assert!(!rect.contains(Point { x: 20.0, y: 60.0 }));
        assert!(!rect.contains(Point { x: 9.0, y: 30.0 }));
    }

    #[test]
    fn test_adjacent_rects_share_no_point() {
        let left = Rect {
            x: 0.0,
            y: 0.0,
            width: 32.0,
            height: 32.0,
        };
        let right = Rect {
            x: 32.0,
            y: 0.0,
            width: 32.0,
            height: 32.0,
        };
        let edge = Point { x: 32.0, y: 16.0 };
        assert!(!left.contains(edge));
        assert!(right.contains(edge));
    }

    #[test]
    fn test_snap_rounds() {
        let size = Size {
            width: 100.4,
            height: 99.5,
        };
        assert_eq!(
            size.snap(),
            PhysicalSize {
                width: 100,
                height: 100
            }
        );
        assert_eq!(size.snap().unsnap().snap(), size.snap());
    }
}
