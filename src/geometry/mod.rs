//! Geometric primitives for layout analysis.
//!
//! This module provides the basic geometric types and the small numeric
//! algorithms (1-D value clustering, disjoint sets) used throughout the
//! structure-detection code.

use serde::{Deserialize, Serialize};

/// A 2D point in page space (origin top-left, y increasing downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use docx_oxide::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use docx_oxide::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Normalize a rectangle whose width or height may be negative.
    ///
    /// Scene extractors report primitives drawn with an inverted coordinate
    /// delta as negative width/height; geometric comparisons require the
    /// top-left-anchored, non-negative form.
    ///
    /// # Examples
    ///
    /// ```
    /// use docx_oxide::geometry::Rect;
    ///
    /// let r = Rect::new(100.0, 50.0, -80.0, -30.0).normalized();
    /// assert_eq!(r.x, 20.0);
    /// assert_eq!(r.y, 20.0);
    /// assert_eq!(r.width, 80.0);
    /// assert_eq!(r.height, 30.0);
    /// ```
    pub fn normalized(&self) -> Rect {
        let x = if self.width < 0.0 {
            self.x + self.width
        } else {
            self.x
        };
        let y = if self.height < 0.0 {
            self.y + self.height
        } else {
            self.y
        };
        Rect::new(x, y, self.width.abs(), self.height.abs())
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Get the center point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Check if this rectangle intersects with another.
    ///
    /// # Examples
    ///
    /// ```
    /// use docx_oxide::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// let r2 = Rect::new(50.0, 50.0, 100.0, 100.0);
    /// let r3 = Rect::new(200.0, 200.0, 100.0, 100.0);
    ///
    /// assert!(r1.intersects(&r2));
    /// assert!(!r1.intersects(&r3));
    /// ```
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Check if this rectangle contains a point (edges inclusive).
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Grow the rectangle by `margin` on every side.
    ///
    /// Used for tolerance-expanded overlap tests during grid verification.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Compute the union of this rectangle with another.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.left().min(other.left());
        let y0 = self.top().min(other.top());
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Rect::from_points(x0, y0, x1, y1)
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Cluster 1-D values within `tolerance` of each other, returning the sorted
/// cluster centers.
///
/// Values are sorted, then walked left to right: a value joins the current
/// cluster while it lies within `tolerance` of the cluster's running mean,
/// otherwise it starts a new cluster. Using the running mean (not the
/// first-seen value) keeps the centers stable against roundoff drift across
/// many adjacent rectangles.
///
/// # Examples
///
/// ```
/// use docx_oxide::geometry::cluster_values;
///
/// let centers = cluster_values(&[0.0, 0.5, 100.0, 100.4, 99.8], 2.0);
/// assert_eq!(centers.len(), 2);
/// assert!((centers[0] - 0.25).abs() < 0.01);
/// ```
pub fn cluster_values(values: &[f32], tolerance: f32) -> Vec<f32> {
    if values.is_empty() {
        return vec![];
    }

    let mut sorted: Vec<f32> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut centers = Vec::new();
    let mut sum = sorted[0];
    let mut count = 1usize;

    for &v in &sorted[1..] {
        let mean = sum / count as f32;
        if (v - mean).abs() <= tolerance {
            sum += v;
            count += 1;
        } else {
            centers.push(mean);
            sum = v;
            count = 1;
        }
    }
    centers.push(sum / count as f32);

    centers
}

/// Array-backed disjoint-set (union-find) with path compression and
/// union by rank.
///
/// Used to group border rectangles into connected table components.
#[derive(Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    /// Create a disjoint set with `n` singleton elements.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    /// Find the representative of `x`, compressing the path.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`.
    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            },
        }
    }

    /// Group element indices by their set representative.
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let mut by_root: std::collections::HashMap<usize, Vec<usize>> =
            std::collections::HashMap::new();
        for i in 0..n {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        let mut groups: Vec<Vec<usize>> = by_root.into_values().collect();
        // Deterministic order: by smallest member index
        groups.sort_by_key(|g| g[0]);
        groups
    }
}
