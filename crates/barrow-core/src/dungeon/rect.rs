//! Free-rectangle pool for room placement.
//!
//! The level starts as one free rectangle. Each placed room consumes
//! space: every free rectangle it overlaps is removed and up to four
//! remainder strips are returned to the pool, provided they are still
//! big enough to hold a room plus its surrounding gap.

use serde::{Deserialize, Serialize};

use barrow_rng::GameRng;

use crate::consts::{COLNO, ROWNO};

/// Pool capacity. Splits that would overflow it are dropped.
pub const MAXRECT: usize = 50;
/// Minimum horizontal gap kept between rooms.
pub const XLIM: i32 = 4;
/// Minimum vertical gap kept between rooms.
pub const YLIM: i32 = 3;

/// Inclusive rectangle in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub lx: i32,
    pub ly: i32,
    pub hx: i32,
    pub hy: i32,
}

impl Rect {
    pub fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Rect {
        Rect { lx, ly, hx, hy }
    }

    pub fn width(&self) -> i32 {
        self.hx - self.lx + 1
    }

    pub fn height(&self) -> i32 {
        self.hy - self.ly + 1
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.lx >= self.lx && other.hx <= self.hx && other.ly >= self.ly && other.hy <= self.hy
    }

    /// Overlapping region, if any.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let r = Rect {
            lx: self.lx.max(other.lx),
            ly: self.ly.max(other.ly),
            hx: self.hx.min(other.hx),
            hy: self.hy.min(other.hy),
        };
        if r.lx > r.hx || r.ly > r.hy {
            None
        } else {
            Some(r)
        }
    }
}

/// The free-space pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectPool {
    rects: Vec<Rect>,
    /// Remainders lost to the capacity cap.
    pub dropped: u32,
}

impl Default for RectPool {
    fn default() -> RectPool {
        RectPool::new()
    }
}

impl RectPool {
    /// One free rectangle covering the whole map.
    pub fn new() -> RectPool {
        RectPool {
            rects: vec![Rect::new(0, 0, COLNO - 1, ROWNO - 1)],
            dropped: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// A free rectangle fully containing `r`.
    pub fn find_containing(&self, r: &Rect) -> Option<Rect> {
        self.rects.iter().find(|free| free.contains(r)).copied()
    }

    /// Uniformly random free rectangle.
    pub fn random(&self, rng: &mut GameRng) -> Option<Rect> {
        if self.rects.is_empty() {
            return None;
        }
        let i = rng.rn2(self.rects.len() as u32) as usize;
        Some(self.rects[i])
    }

    fn add(&mut self, r: Rect) {
        if self.rects.len() >= MAXRECT {
            self.dropped += 1;
            return;
        }
        if self.find_containing(&r).is_some() {
            return;
        }
        self.rects.push(r);
    }

    /// Consume the space `used` occupies. Every overlapping free
    /// rectangle is replaced by the remainder strips around `used`
    /// that are still wide enough for another room and its gap.
    pub fn split_around(&mut self, used: &Rect) {
        loop {
            let Some(i) = self
                .rects
                .iter()
                .position(|free| free.intersect(used).is_some())
            else {
                break;
            };
            let old = self.rects.remove(i);
            // clip to this rectangle before carving remainders
            if let Some(overlap) = old.intersect(used) {
                self.carve(old, overlap);
            }
        }
    }

    fn carve(&mut self, old: Rect, used: Rect) {
        if used.ly - old.ly - 1 > (if old.hy < ROWNO - 1 { 2 * YLIM } else { YLIM + 1 }) + 4 {
            self.add(Rect { hy: used.ly - 2, ..old });
        }
        if used.lx - old.lx - 1 > (if old.hx < COLNO - 1 { 2 * XLIM } else { XLIM + 1 }) + 4 {
            self.add(Rect { hx: used.lx - 2, ..old });
        }
        if old.hy - used.hy - 1 > (if old.ly > 0 { 2 * YLIM } else { YLIM + 1 }) + 4 {
            self.add(Rect { ly: used.hy + 2, ..old });
        }
        if old.hx - used.hx - 1 > (if old.lx > 0 { 2 * XLIM } else { XLIM + 1 }) + 4 {
            self.add(Rect { lx: used.hx + 2, ..old });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_pool_covers_map() {
        let pool = RectPool::new();
        assert_eq!(pool.len(), 1);
        let whole = Rect::new(0, 0, COLNO - 1, ROWNO - 1);
        assert_eq!(pool.find_containing(&whole), Some(whole));
    }

    #[test]
    fn test_split_leaves_disjoint_free_space() {
        let mut pool = RectPool::new();
        let used = Rect::new(30, 8, 40, 12);
        pool.split_around(&used);
        assert!(pool.len() >= 2);
        let mut rng = GameRng::new(1);
        for _ in 0..32 {
            let free = pool.random(&mut rng).unwrap();
            assert!(free.intersect(&used).is_none(), "{free:?} overlaps {used:?}");
        }
    }

    #[test]
    fn test_split_drops_slivers() {
        let mut pool = RectPool::new();
        // uses nearly the whole map; remainders are too thin to keep
        let used = Rect::new(2, 2, COLNO - 3, ROWNO - 3);
        pool.split_around(&used);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_no_duplicate_rects() {
        let mut pool = RectPool::new();
        let r = Rect::new(0, 0, 10, 10);
        pool.add(r);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_capacity_counts_drops() {
        let mut pool = RectPool { rects: Vec::new(), dropped: 0 };
        for i in 0..MAXRECT as i32 {
            pool.add(Rect::new(i * 2, 0, i * 2, 0));
        }
        assert_eq!(pool.len(), MAXRECT);
        pool.add(Rect::new(200, 5, 201, 5));
        assert_eq!(pool.len(), MAXRECT);
        assert_eq!(pool.dropped, 1);
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 10, 10)));
        let c = Rect::new(11, 11, 12, 12);
        assert_eq!(a.intersect(&c), None);
    }
}
