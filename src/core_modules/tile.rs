// THEORY:
// The `Tile` module owns the geometry of parallel work. A `Rectangle` is a
// contiguous block of pixel coordinates with *inclusive* corners, and the tiler
// bisects it into independent tiles that can be scanned by separate workers.
//
// Key architectural principles:
// 1.  **Exact Partition**: Bisection puts the midpoint column in the right half
//     and stops the left half one column short of it. The halves never overlap
//     and never leave a gap, so scanning every tile visits every coordinate of
//     the input rectangle exactly once. This is what lets the concurrent and
//     sequential histograms agree bit for bit.
// 2.  **Bounded Fan-Out**: Recursion halves the requested tile budget at every
//     level and stops early once both dimensions drop under `min_tile_size`, so
//     small images are not shredded into slivers and the tile count never
//     exceeds `max(2, amount)`.
// 3.  **Dumb Data**: Like the pixel sample, a `Rectangle` only knows its own
//     extent. It has no idea what image it will be laid over.

pub mod tile {
    use serde::{Deserialize, Serialize};

    pub type Coordinate = i64;

    /// Below this size in both dimensions a rectangle is not worth splitting further.
    pub const DEFAULT_MIN_TILE_SIZE: Coordinate = 400;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Point {
        pub x: Coordinate,
        pub y: Coordinate,
    }

    /// An axis-aligned block of pixel coordinates. Both corners are included.
    ///
    /// A rectangle with `max.x < min.x` (or `max.y < min.y`) covers nothing. The
    /// tiler produces one when asked to bisect a single-column strip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Rectangle {
        pub min: Point,
        pub max: Point,
    }

    impl Point {
        pub const fn new(x: Coordinate, y: Coordinate) -> Self {
            Self { x, y }
        }
    }

    impl Rectangle {
        pub const fn new(
            min_x: Coordinate,
            min_y: Coordinate,
            max_x: Coordinate,
            max_y: Coordinate,
        ) -> Self {
            Self {
                min: Point::new(min_x, min_y),
                max: Point::new(max_x, max_y),
            }
        }

        /// The rectangle covering every pixel of a `width` x `height` image.
        pub fn covering(width: u32, height: u32) -> Self {
            Self::new(0, 0, width as Coordinate - 1, height as Coordinate - 1)
        }

        /// Horizontal extent measured corner to corner.
        pub fn dx(&self) -> Coordinate {
            self.max.x - self.min.x
        }

        /// Vertical extent measured corner to corner.
        pub fn dy(&self) -> Coordinate {
            self.max.y - self.min.y
        }

        pub fn is_empty(&self) -> bool {
            self.max.x < self.min.x || self.max.y < self.min.y
        }

        /// Number of pixel coordinates covered.
        pub fn area(&self) -> u64 {
            if self.is_empty() {
                return 0;
            }
            (self.dx() + 1) as u64 * (self.dy() + 1) as u64
        }

        /// Every covered coordinate, column by column.
        pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
            (self.min.x..=self.max.x)
                .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| Point::new(x, y)))
        }

        /// The coordinates covered by both rectangles. May be empty.
        pub fn intersection(&self, other: &Rectangle) -> Rectangle {
            Rectangle::new(
                self.min.x.max(other.min.x),
                self.min.y.max(other.min.y),
                self.max.x.min(other.max.x),
                self.max.y.min(other.max.y),
            )
        }

        pub fn intersects(&self, other: &Rectangle) -> bool {
            !self.is_empty()
                && !other.is_empty()
                && self.min.x <= other.max.x
                && other.min.x <= self.max.x
                && self.min.y <= other.max.y
                && other.min.y <= self.max.y
        }
    }

    impl std::fmt::Display for Rectangle {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(
                f,
                "({},{})-({},{})",
                self.min.x, self.min.y, self.max.x, self.max.y
            )
        }
    }

    /// Bisects `rectangle` along the x axis.
    ///
    /// The midpoint column `(max.x + min.x) / 2` opens the right half; the left
    /// half ends one column before it. `rectangle` must not be empty.
    pub fn split(rectangle: Rectangle) -> [Rectangle; 2] {
        let mid = (rectangle.max.x + rectangle.min.x) / 2;
        [
            Rectangle::new(rectangle.min.x, rectangle.min.y, mid - 1, rectangle.max.y),
            Rectangle::new(mid, rectangle.min.y, rectangle.max.x, rectangle.max.y),
        ]
    }

    /// Splits `rectangle` into at most `max(2, amount)` tiles using the default threshold.
    pub fn split_into(amount: usize, rectangle: Rectangle) -> Vec<Rectangle> {
        split_into_with_threshold(amount, DEFAULT_MIN_TILE_SIZE, rectangle)
    }

    /// Recursive bisection with a configurable minimum tile size.
    ///
    /// Tiles come back in left-to-right order.
    pub fn split_into_with_threshold(
        amount: usize,
        min_tile_size: Coordinate,
        rectangle: Rectangle,
    ) -> Vec<Rectangle> {
        // Bisecting an empty strip can invent a column outside of it.
        if rectangle.is_empty() {
            return vec![rectangle];
        }

        let [left, right] = split(rectangle);

        // An odd budget would never reach zero, so anything under 4 stops here.
        if amount < 4 {
            return vec![left, right];
        }

        if rectangle.dx() < min_tile_size && rectangle.dy() < min_tile_size {
            return vec![left, right];
        }

        let mut tiles = split_into_with_threshold(amount / 2, min_tile_size, left);
        tiles.extend(split_into_with_threshold(amount / 2, min_tile_size, right));
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::tile::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn split_bisects_at_integer_midpoint() {
        let cases = [
            (
                Rectangle::new(0, 0, 1000, 1000),
                [Rectangle::new(0, 0, 499, 1000), Rectangle::new(500, 0, 1000, 1000)],
            ),
            (
                Rectangle::new(0, 0, 333, 333),
                [Rectangle::new(0, 0, 165, 333), Rectangle::new(166, 0, 333, 333)],
            ),
            (
                Rectangle::new(1, 1, 500, 500),
                [Rectangle::new(1, 1, 249, 500), Rectangle::new(250, 1, 500, 500)],
            ),
            (
                Rectangle::new(1, 1, 747, 915),
                [Rectangle::new(1, 1, 373, 915), Rectangle::new(374, 1, 747, 915)],
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(split(input), expected, "splitting {input}");
        }
    }

    #[test]
    fn split_into_four() {
        let tiles = split_into(4, Rectangle::new(0, 0, 1000, 1000));
        assert_eq!(
            tiles,
            vec![
                Rectangle::new(0, 0, 248, 1000),
                Rectangle::new(249, 0, 499, 1000),
                Rectangle::new(500, 0, 749, 1000),
                Rectangle::new(750, 0, 1000, 1000),
            ]
        );
    }

    #[test]
    fn split_into_eight() {
        let tiles = split_into(8, Rectangle::new(0, 0, 1000, 1000));
        assert_eq!(
            tiles,
            vec![
                Rectangle::new(0, 0, 123, 1000),
                Rectangle::new(124, 0, 248, 1000),
                Rectangle::new(249, 0, 373, 1000),
                Rectangle::new(374, 0, 499, 1000),
                Rectangle::new(500, 0, 623, 1000),
                Rectangle::new(624, 0, 749, 1000),
                Rectangle::new(750, 0, 874, 1000),
                Rectangle::new(875, 0, 1000, 1000),
            ]
        );
    }

    #[test]
    fn small_rectangles_stop_after_one_split() {
        let tiles = split_into(16, Rectangle::new(0, 0, 199, 299));
        assert_eq!(tiles.len(), 2);
    }

    #[test]
    fn single_column_yields_an_empty_left_half() {
        let [left, right] = split(Rectangle::new(7, 0, 7, 9));
        assert!(left.is_empty());
        assert_eq!(left.area(), 0);
        assert_eq!(right, Rectangle::new(7, 0, 7, 9));
    }

    #[test]
    fn covering_rectangle_matches_image_area() {
        let rect = Rectangle::covering(640, 480);
        assert_eq!(rect, Rectangle::new(0, 0, 639, 479));
        assert_eq!(rect.area(), 640 * 480);
    }

    fn rectangle() -> impl Strategy<Value = Rectangle> {
        (-50i64..50, -50i64..50, 0i64..120, 0i64..40)
            .prop_map(|(x, y, w, h)| Rectangle::new(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn tiles_partition_the_rectangle(
            amount in 1usize..40,
            min_tile_size in 1i64..64,
            rect in rectangle(),
        ) {
            let tiles = split_into_with_threshold(amount, min_tile_size, rect);

            for (i, a) in tiles.iter().enumerate() {
                for b in &tiles[i + 1..] {
                    prop_assert!(!a.intersects(b), "{} overlaps {}", a, b);
                }
            }

            let covered: HashSet<Point> = tiles.iter().flat_map(|t| t.points()).collect();
            let expected: HashSet<Point> = rect.points().collect();
            prop_assert_eq!(covered, expected);

            let total: u64 = tiles.iter().map(Rectangle::area).sum();
            prop_assert_eq!(total, rect.area());
        }

        #[test]
        fn tile_count_is_bounded(amount in 1usize..200, rect in rectangle()) {
            let tiles = split_into_with_threshold(amount, 1, rect);
            prop_assert!(tiles.len() >= 2);
            prop_assert!(tiles.len() <= amount.max(2));
        }
    }
}
