//! Planar coordinate type and bearing helpers.
//!
//! The world is a flat map measured in abstract map units, `+y` pointing
//! north.  `Vec2` uses `f32`, which is plenty for maps a few tens of
//! thousands of units across.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Below this length a vector is treated as zero and has no direction.
const EPSILON: f32 = 1e-6;

/// A point or displacement on the map plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector at `radians` measured counter-clockwise from `+x`.
    #[inline]
    pub fn from_angle(radians: f32) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn distance_sq(self, other: Vec2) -> f32 {
        (other - self).length_sq()
    }

    /// Unit vector in the same direction, or `Vec2::ZERO` for a
    /// (near-)zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.y / len)
        }
    }

    /// Counter-clockwise perpendicular (same length).
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Unit direction from `self` towards `target` (zero if coincident).
    #[inline]
    pub fn direction_to(self, target: Vec2) -> Vec2 {
        (target - self).normalized()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

// ── Compass ───────────────────────────────────────────────────────────────────

/// Eight-way compass bearing, clockwise from north.
///
/// Narrative notifications carry a bearing so the text layer can say
/// "shots to the north-east" without doing geometry itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compass {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Compass {
    const ALL: [Compass; 8] = [
        Compass::North,
        Compass::NorthEast,
        Compass::East,
        Compass::SouthEast,
        Compass::South,
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
    ];

    /// Bearing of `to` as seen from `from`.  Coincident points read as north.
    pub fn between(from: Vec2, to: Vec2) -> Compass {
        let d = to - from;
        if d.length_sq() < EPSILON {
            return Compass::North;
        }
        // atan2(x, y) measures clockwise from +y (north).
        let mut deg = d.x.atan2(d.y).to_degrees();
        if deg < 0.0 {
            deg += 360.0;
        }
        let sector = (deg / 45.0).round() as usize & 7;
        Self::ALL[sector]
    }

    /// Index 0..8, north = 0, clockwise.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Compass::North => "N",
            Compass::NorthEast => "NE",
            Compass::East => "E",
            Compass::SouthEast => "SE",
            Compass::South => "S",
            Compass::SouthWest => "SW",
            Compass::West => "W",
            Compass::NorthWest => "NW",
        };
        f.write_str(s)
    }
}
