use glam::Vec2;

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.origin.x && p.y >= self.origin.y && p.x < max.x && p.y < max.y
    }

    /// Splits the rect into `n` equal-width columns, left to right.
    pub fn columns(self, n: usize) -> impl Iterator<Item = Rect> {
        let w = if n == 0 { 0.0 } else { self.size.x / n as f32 };
        (0..n).map(move |i| Rect::new(self.origin.x + w * i as f32, self.origin.y, w, self.size.y))
    }

    /// Shrinks the rect by `amount` on every side; never produces negative sizes.
    pub fn inset(self, amount: f32) -> Rect {
        Rect::new(
            self.origin.x + amount,
            self.origin.y + amount,
            (self.size.x - 2.0 * amount).max(0.0),
            (self.size.y - 2.0 * amount).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn columns_tile_the_rect() {
        let cols: Vec<Rect> = r(10.0, 5.0, 40.0, 8.0).columns(4).collect();
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[0], r(10.0, 5.0, 10.0, 8.0));
        assert_eq!(cols[3].max(), Vec2::new(50.0, 13.0));
    }

    #[test]
    fn columns_of_zero_is_empty() {
        assert_eq!(r(0.0, 0.0, 10.0, 10.0).columns(0).count(), 0);
    }

    #[test]
    fn inset_clamps_at_zero() {
        let i = r(0.0, 0.0, 4.0, 10.0).inset(3.0);
        assert_eq!(i.size, Vec2::new(0.0, 4.0));
        assert!(i.is_empty());
    }
}
