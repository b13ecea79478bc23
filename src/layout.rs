use std::error;
use std::f64::consts::PI;
use std::fmt;

use crate::geometrics::{Point, Rect, Size};

/// Ratio of the inter-icon gap to the base icon size.
const GAP_RATIO: f64 = 0.25;

/// The layout engines a dock can be configured with.
#[derive(Debug)]
pub enum LayoutStrategy {
    Wave(WaveLayout),
    /// Accepted by the configuration parser but rejected before a dock
    /// is built. Kept as a variant so the configuration surface and the
    /// dispatch below stay in sync when it lands.
    Coverflow,
}

impl LayoutStrategy {
    pub fn unfocus(&mut self) {
        match self {
            Self::Wave(wave) => wave.unfocus(),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn focus(&mut self, focus: Point) {
        match self {
            Self::Wave(wave) => wave.focus(focus),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn widget_at(&self, point: Point) -> Option<usize> {
        match self {
            Self::Wave(wave) => wave.widget_at(point),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn at_hover_zone(&self, point: Point) -> bool {
        match self {
            Self::Wave(wave) => wave.at_hover_zone(point),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn frame_size(&self) -> Size {
        match self {
            Self::Wave(wave) => wave.frame_size(),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn num_widgets(&self) -> usize {
        match self {
            Self::Wave(wave) => wave.num_widgets(),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn widget_bounds(&self, index: usize) -> Rect {
        match self {
            Self::Wave(wave) => wave.widget_bounds(index),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }

    pub fn dock_bounds(&self) -> Rect {
        match self {
            Self::Wave(wave) => wave.bar(),
            Self::Coverflow => unimplemented!("coverflow layout is not implemented yet"),
        }
    }
}

/// Lays a row of icons out on a horizontal bar and magnifies the ones
/// near the pointer.
///
/// Icons keep their bottom edge anchored on the bar while they grow, and
/// are additionally lifted off the bar in proportion to their current
/// magnification, so the row forms a wave that follows the pointer.
/// Magnified icons push their neighbours outward by half of their extra
/// width on each side, which keeps the gap between adjacent icons
/// constant and rules out overlaps.
#[derive(Debug)]
pub struct WaveLayout {
    num_widgets: usize,
    widget_size: f64,
    num_anim: usize,
    zoom_factor: f64,
    jump_factor: f64,
    /// Bottom-centre of each widget's slot at rest. Fixed after
    /// construction; one entry per widget, x strictly increasing.
    positions: Vec<Point>,
    /// Current rectangle of each widget, rebuilt by `focus`/`unfocus`.
    bounds: Vec<Rect>,
}

impl WaveLayout {
    pub fn new(
        num_widgets: usize,
        widget_size: f64,
        num_anim: usize,
        zoom_factor: f64,
        jump_factor: f64,
    ) -> Result<Self, LayoutError> {
        if num_widgets == 0 {
            return Err(LayoutError::NoWidgets);
        }
        if !(widget_size > 0.0) {
            return Err(LayoutError::NonPositiveWidgetSize(widget_size));
        }
        if !(zoom_factor >= 1.0) {
            return Err(LayoutError::ShrinkingZoom(zoom_factor));
        }

        let mut layout = Self {
            num_widgets,
            widget_size,
            num_anim,
            zoom_factor,
            jump_factor,
            positions: Vec::with_capacity(num_widgets),
            bounds: Vec::with_capacity(num_widgets),
        };

        let unit = layout.widget_unit();
        let offset = layout.widget_offset();
        let bottom = layout.headroom() + layout.gap() / 2.0 + widget_size;
        for i in 0..num_widgets {
            layout.positions.push(Point {
                x: offset + (i as f64 + 0.5) * unit,
                y: bottom,
            });
        }
        layout.unfocus();

        Ok(layout)
    }

    /// Restores every widget to its resting rectangle.
    pub fn unfocus(&mut self) {
        let size = self.widget_size;
        self.bounds.clear();
        for anchor in &self.positions {
            self.bounds.push(Rect {
                x: anchor.x - size / 2.0,
                y: anchor.y - size,
                width: size,
                height: size,
            });
        }
    }

    /// Rebuilds every widget rectangle as if the pointer were at `focus`.
    pub fn focus(&mut self, focus: Point) {
        let bar = self.bar();
        let focus_x = focus.x.clamp(bar.x, bar.x + bar.width);
        let unit = self.widget_unit();

        let extras: Vec<f64> = self
            .positions
            .iter()
            .map(|anchor| {
                let distance = (anchor.x - focus_x).abs() / unit;
                (self.magnification(distance) - 1.0) * self.widget_size
            })
            .collect();
        let total_extra: f64 = extras.iter().sum();

        self.bounds.clear();
        let mut left_extra = 0.0;
        for (anchor, &extra) in self.positions.iter().zip(&extras) {
            let right_extra = total_extra - left_extra - extra;
            let edge = self.widget_size + extra;
            let center_x = anchor.x + (left_extra - right_extra) / 2.0;
            let bottom = anchor.y - extra * self.jump_factor;
            self.bounds.push(Rect {
                x: center_x - edge / 2.0,
                y: bottom - edge,
                width: edge,
                height: edge,
            });
            left_extra += extra;
        }
    }

    /// Index of the widget whose current rectangle contains `point`.
    /// Scans left to right, so a point on a shared edge resolves to the
    /// lower index.
    pub fn widget_at(&self, point: Point) -> Option<usize> {
        self.bounds.iter().position(|bounds| bounds.contains(point))
    }

    /// Whether `point` is inside the dock bar, hover margins included.
    pub fn at_hover_zone(&self, point: Point) -> bool {
        self.bar().contains(point)
    }

    /// The size the dock renders into. Constant for the lifetime of the
    /// layout: bar width by bar height plus enough headroom for a fully
    /// magnified and lifted icon.
    pub fn frame_size(&self) -> Size {
        let bar = self.bar();
        Size {
            width: bar.width,
            height: bar.y + bar.height,
        }
    }

    pub fn num_widgets(&self) -> usize {
        self.num_widgets
    }

    /// Current rectangle of the widget at `index`.
    ///
    /// Panics when `index` is out of range; valid indices are
    /// `0..num_widgets()`.
    pub fn widget_bounds(&self, index: usize) -> Rect {
        self.bounds[index]
    }

    /// The dock bar rectangle. Wider than the row of resting icons so
    /// that displaced icons and the hover margin both fit.
    pub fn bar(&self) -> Rect {
        Rect {
            x: 0.0,
            y: self.headroom(),
            width: self.num_widgets as f64 * self.widget_unit() + 2.0 * self.widget_offset(),
            height: self.widget_unit(),
        }
    }

    fn widget_unit(&self) -> f64 {
        self.widget_size * (1.0 + GAP_RATIO)
    }

    fn gap(&self) -> f64 {
        self.widget_size * GAP_RATIO
    }

    fn scaled_unit(&self) -> f64 {
        self.widget_unit() * self.zoom_factor
    }

    fn side_num_anim(&self) -> usize {
        self.num_anim.min(self.num_widgets - 1)
    }

    /// Horizontal offset of the first widget's slot, chosen so that even
    /// a fully displaced row stays inside the bar.
    fn widget_offset(&self) -> f64 {
        self.scaled_unit().max(self.max_expansion() / 2.0)
    }

    /// Vertical space above the bar consumed by a widget at peak
    /// magnification: its growth plus its lift.
    fn headroom(&self) -> f64 {
        (self.zoom_factor - 1.0) * self.widget_size * (1.0 + self.jump_factor)
    }

    /// Magnification for a widget `distance` slot units away from the
    /// focus point. Peaks at `zoom_factor` at distance zero, eases down
    /// along a half cosine, and reaches exactly 1.0 one step beyond
    /// `num_anim`, so `num_anim` widgets per side take part in the wave.
    fn magnification(&self, distance: f64) -> f64 {
        let reach = (self.num_anim + 1) as f64;
        if distance >= reach {
            1.0
        } else {
            1.0 + (self.zoom_factor - 1.0) * (1.0 + (PI * distance / reach).cos()) / 2.0
        }
    }

    /// Upper bound on the total extra width of the row, reached when the
    /// pointer sits on a widget centre.
    fn max_expansion(&self) -> f64 {
        let per_side: f64 = (1..=self.side_num_anim())
            .map(|step| self.magnification(step as f64) - 1.0)
            .sum();
        (self.zoom_factor - 1.0) * self.widget_size + 2.0 * per_side * self.widget_size
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutError {
    NoWidgets,
    NonPositiveWidgetSize(f64),
    ShrinkingZoom(f64),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoWidgets => f.write_str("a dock needs at least one widget"),
            Self::NonPositiveWidgetSize(size) => {
                write!(f, "widget size must be positive, got {}", size)
            }
            Self::ShrinkingZoom(factor) => {
                write!(f, "zoom factor must not shrink widgets, got {}", factor)
            }
        }
    }
}

impl error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn scale_of(layout: &WaveLayout, index: usize) -> f64 {
        layout.widget_bounds(index).width / 32.0
    }

    fn center_of(layout: &WaveLayout, index: usize) -> Point {
        layout.positions[index]
    }

    #[test]
    fn test_resting_layout_has_no_lift() {
        let layout = WaveLayout::new(7, 32.0, 3, 1.8, 1.0).unwrap();
        let bar = layout.bar();
        for index in 0..layout.num_widgets() {
            let bounds = layout.widget_bounds(index);
            assert!((bounds.width - 32.0).abs() < EPSILON);
            assert!((bounds.height - 32.0).abs() < EPSILON);
            assert!(bounds.y >= bar.y);
            assert!(bounds.y + bounds.height <= bar.y + bar.height + EPSILON);
        }
    }

    #[test]
    fn test_unfocus_is_idempotent() {
        let mut layout = WaveLayout::new(5, 32.0, 3, 1.8, 1.0).unwrap();
        let resting: Vec<_> = (0..5).map(|i| layout.widget_bounds(i)).collect();
        layout.focus(center_of(&layout, 2));
        layout.unfocus();
        layout.unfocus();
        for (index, bounds) in resting.iter().enumerate() {
            assert_eq!(layout.widget_bounds(index), *bounds);
        }
    }

    #[test]
    fn test_peak_magnification_at_widget_center() {
        let mut layout = WaveLayout::new(7, 32.0, 3, 1.8, 1.0).unwrap();
        let focus = center_of(&layout, 3);
        layout.focus(Point {
            x: focus.x,
            y: focus.y - 16.0,
        });
        assert!((scale_of(&layout, 3) - 1.8).abs() < EPSILON);
        // Widgets beyond the animation reach keep their resting size.
        // With 3 animated neighbours per side there are none here, so
        // use a wider dock.
        let mut layout = WaveLayout::new(9, 32.0, 3, 1.8, 1.0).unwrap();
        let focus = center_of(&layout, 4);
        layout.focus(focus);
        assert!((scale_of(&layout, 4) - 1.8).abs() < EPSILON);
        assert!((scale_of(&layout, 0) - 1.0).abs() < EPSILON);
        assert!((scale_of(&layout, 8) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_wave_scenario() {
        let mut layout = WaveLayout::new(5, 32.0, 1, 2.0, 1.0).unwrap();
        layout.focus(center_of(&layout, 2));

        assert!((scale_of(&layout, 2) - 2.0).abs() < EPSILON);
        for index in [1, 3] {
            let scale = scale_of(&layout, index);
            assert!(scale > 1.0, "widget {} should be magnified", index);
            assert!(scale < 2.0, "widget {} should not reach the peak", index);
        }
        for index in [0, 4] {
            assert!((scale_of(&layout, index) - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_falloff_is_monotonic() {
        let layout = WaveLayout::new(7, 32.0, 3, 1.8, 1.0).unwrap();
        let mut previous = layout.magnification(0.0);
        let mut distance = 0.0;
        while distance < 6.0 {
            let current = layout.magnification(distance);
            assert!(
                current <= previous + EPSILON,
                "magnification grew from {} to {} at distance {}",
                previous,
                current,
                distance
            );
            previous = current;
            distance += 0.05;
        }
        assert!((layout.magnification(6.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_widgets_keep_their_order() {
        let mut layout = WaveLayout::new(9, 32.0, 3, 1.8, 1.0).unwrap();
        for step in 0..50 {
            let bar = layout.bar();
            layout.focus(Point {
                x: bar.width * step as f64 / 49.0,
                y: bar.y + 1.0,
            });
            for index in 1..layout.num_widgets() {
                let left = layout.widget_bounds(index - 1);
                let right = layout.widget_bounds(index);
                assert!(
                    left.x + left.width <= right.x + EPSILON,
                    "widgets {} and {} overlap at step {}",
                    index - 1,
                    index,
                    step
                );
            }
        }
    }

    #[test]
    fn test_gap_is_preserved_under_focus() {
        let mut layout = WaveLayout::new(5, 32.0, 2, 1.8, 1.0).unwrap();
        layout.focus(center_of(&layout, 2));
        let gap = 32.0 * 0.25;
        for index in 1..5 {
            let left = layout.widget_bounds(index - 1);
            let right = layout.widget_bounds(index);
            let actual = right.x - (left.x + left.width);
            assert!(
                (actual - gap).abs() < EPSILON,
                "gap between {} and {} drifted to {}",
                index - 1,
                index,
                actual
            );
        }
    }

    #[test]
    fn test_displaced_row_stays_inside_the_bar() {
        let mut layout = WaveLayout::new(9, 32.0, 3, 1.8, 1.0).unwrap();
        let bar = layout.bar();
        for step in 0..50 {
            layout.focus(Point {
                x: bar.width * step as f64 / 49.0,
                y: bar.y + 1.0,
            });
            let first = layout.widget_bounds(0);
            let last = layout.widget_bounds(8);
            assert!(first.x >= bar.x - EPSILON);
            assert!(last.x + last.width <= bar.x + bar.width + EPSILON);
        }
    }

    #[test]
    fn test_lift_follows_magnification() {
        let mut layout = WaveLayout::new(5, 32.0, 2, 2.0, 1.5).unwrap();
        let resting_bottom = layout.widget_bounds(2).y + layout.widget_bounds(2).height;
        layout.focus(center_of(&layout, 2));
        let bounds = layout.widget_bounds(2);
        let lift = resting_bottom - (bounds.y + bounds.height);
        let expected = (2.0 - 1.0) * 32.0 * 1.5;
        assert!((lift - expected).abs() < EPSILON);
        // At peak magnification the top edge sits exactly half a gap
        // below the top of the frame.
        assert!((bounds.y - 32.0 * 0.25 / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_jump_factor_keeps_widgets_on_the_bar() {
        let mut layout = WaveLayout::new(5, 32.0, 2, 1.8, 0.0).unwrap();
        let resting_bottom = layout.widget_bounds(2).y + layout.widget_bounds(2).height;
        layout.focus(center_of(&layout, 2));
        let bounds = layout.widget_bounds(2);
        assert!((bounds.y + bounds.height - resting_bottom).abs() < EPSILON);
    }

    #[test]
    fn test_every_widget_animates_when_num_anim_is_large() {
        let mut layout = WaveLayout::new(3, 32.0, 5, 1.8, 1.0).unwrap();
        layout.focus(center_of(&layout, 1));
        for index in 0..3 {
            assert!(scale_of(&layout, index) > 1.0);
        }
    }

    #[test]
    fn test_widget_at_matches_current_bounds() {
        let mut layout = WaveLayout::new(5, 32.0, 3, 1.8, 1.0).unwrap();
        let target = layout.widget_bounds(1).center();
        assert_eq!(layout.widget_at(target), Some(1));

        layout.focus(center_of(&layout, 4));
        for index in 0..5 {
            let center = layout.widget_bounds(index).center();
            assert_eq!(layout.widget_at(center), Some(index));
        }
    }

    #[test]
    fn test_widget_at_is_pure() {
        let mut layout = WaveLayout::new(5, 32.0, 3, 1.8, 1.0).unwrap();
        layout.focus(center_of(&layout, 2));
        let probe = layout.widget_bounds(2).center();
        assert_eq!(layout.widget_at(probe), layout.widget_at(probe));
        assert_eq!(layout.at_hover_zone(probe), layout.at_hover_zone(probe));
    }

    #[test]
    fn test_points_outside_the_bar_hit_nothing() {
        let layout = WaveLayout::new(5, 32.0, 3, 1.8, 1.0).unwrap();
        let bar = layout.bar();
        let outside = [
            Point {
                x: bar.x - 1.0,
                y: bar.y + 1.0,
            },
            Point {
                x: bar.x + bar.width + 1.0,
                y: bar.y + 1.0,
            },
            Point {
                x: bar.x + bar.width / 2.0,
                y: bar.y - 1.0,
            },
            Point {
                x: bar.x + bar.width / 2.0,
                y: bar.y + bar.height + 1.0,
            },
        ];
        for point in outside {
            assert!(!layout.at_hover_zone(point));
            assert_eq!(layout.widget_at(point), None);
        }
    }

    #[test]
    fn test_gaps_between_widgets_hit_nothing() {
        let layout = WaveLayout::new(2, 32.0, 3, 1.8, 1.0).unwrap();
        let left = layout.widget_bounds(0);
        let right = layout.widget_bounds(1);
        let between = Point {
            x: (left.x + left.width + right.x) / 2.0,
            y: left.y + 16.0,
        };
        assert!(layout.at_hover_zone(between));
        assert_eq!(layout.widget_at(between), None);
    }

    #[test]
    fn test_frame_size_is_stable_across_focus() {
        let mut layout = WaveLayout::new(7, 32.0, 3, 1.8, 1.0).unwrap();
        let resting = layout.frame_size();
        layout.focus(center_of(&layout, 3));
        assert_eq!(layout.frame_size(), resting);
        layout.unfocus();
        assert_eq!(layout.frame_size(), resting);
        assert!((resting.height - (layout.bar().y + layout.bar().height)).abs() < EPSILON);
    }

    #[test]
    fn test_single_widget_dock() {
        let mut layout = WaveLayout::new(1, 32.0, 3, 1.8, 1.0).unwrap();
        layout.focus(center_of(&layout, 0));
        assert!((scale_of(&layout, 0) - 1.8).abs() < EPSILON);
        assert_eq!(layout.widget_at(layout.widget_bounds(0).center()), Some(0));
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert_eq!(
            WaveLayout::new(0, 32.0, 3, 1.8, 1.0).err(),
            Some(LayoutError::NoWidgets)
        );
        assert_eq!(
            WaveLayout::new(5, 0.0, 3, 1.8, 1.0).err(),
            Some(LayoutError::NonPositiveWidgetSize(0.0))
        );
        assert_eq!(
            WaveLayout::new(5, 32.0, 3, 0.5, 1.0).err(),
            Some(LayoutError::ShrinkingZoom(0.5))
        );
    }

    #[test]
    #[should_panic]
    fn test_widget_bounds_rejects_out_of_range_indices() {
        let layout = WaveLayout::new(3, 32.0, 3, 1.8, 1.0).unwrap();
        let _ = layout.widget_bounds(3);
    }
}
