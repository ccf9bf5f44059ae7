//! Placement and extent geometry
//!
//! Nodes that represent physical things carry a [`Placement`]: an origin,
//! a yaw/pitch/roll rotation, and a local axis-aligned [`Extent`]. The
//! materializer always sets a default zero placement and then overrides
//! the origin from coordinate fields when the row carries them.
//!
//! The project extent is the running union of every placed node's
//! world-space box. It only ever grows: an alignment run may extend it but
//! never shrinks it, so downstream viewers keep a stable frame across
//! incremental syncs.

use serde::{Deserialize, Serialize};

/// A point in 3-space
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// Create a point
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Yaw/pitch/roll rotation in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct YawPitchRoll {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl YawPitchRoll {
    /// No rotation
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Axis-aligned bounding box, possibly null (containing nothing)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    bounds: Option<(Point3, Point3)>,
}

impl Extent {
    /// The null extent, containing nothing
    pub fn null() -> Self {
        Self { bounds: None }
    }

    /// An extent from low/high corners (corners are normalized per axis)
    pub fn from_corners(low: Point3, high: Point3) -> Self {
        let lo = Point3::new(low.x.min(high.x), low.y.min(high.y), low.z.min(high.z));
        let hi = Point3::new(low.x.max(high.x), low.y.max(high.y), low.z.max(high.z));
        Self {
            bounds: Some((lo, hi)),
        }
    }

    /// An extent containing a single point
    pub fn from_point(p: Point3) -> Self {
        Self {
            bounds: Some((p, p)),
        }
    }

    /// Whether this extent contains nothing
    pub fn is_null(&self) -> bool {
        self.bounds.is_none()
    }

    /// Low corner, if non-null
    pub fn low(&self) -> Option<Point3> {
        self.bounds.map(|(lo, _)| lo)
    }

    /// High corner, if non-null
    pub fn high(&self) -> Option<Point3> {
        self.bounds.map(|(_, hi)| hi)
    }

    /// Whether this extent fully contains `other`
    ///
    /// The null extent contains nothing; every extent contains the null
    /// extent.
    pub fn contains(&self, other: &Extent) -> bool {
        match (self.bounds, other.bounds) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some((lo, hi)), Some((olo, ohi))) => {
                lo.x <= olo.x
                    && lo.y <= olo.y
                    && lo.z <= olo.z
                    && hi.x >= ohi.x
                    && hi.y >= ohi.y
                    && hi.z >= ohi.z
            }
        }
    }

    /// The union of two extents (monotonic: never smaller than either)
    pub fn union(&self, other: &Extent) -> Extent {
        match (self.bounds, other.bounds) {
            (None, None) => Extent::null(),
            (Some(_), None) => *self,
            (None, Some(_)) => *other,
            (Some((lo, hi)), Some((olo, ohi))) => Extent {
                bounds: Some((
                    Point3::new(lo.x.min(olo.x), lo.y.min(olo.y), lo.z.min(olo.z)),
                    Point3::new(hi.x.max(ohi.x), hi.y.max(ohi.y), hi.z.max(ohi.z)),
                )),
            },
        }
    }

    /// Translate this extent by an offset
    pub fn translated(&self, offset: Point3) -> Extent {
        match self.bounds {
            None => Extent::null(),
            Some((lo, hi)) => Extent {
                bounds: Some((
                    Point3::new(lo.x + offset.x, lo.y + offset.y, lo.z + offset.z),
                    Point3::new(hi.x + offset.x, hi.y + offset.y, hi.z + offset.z),
                )),
            },
        }
    }
}

/// Node placement: origin, rotation, local extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// World-space origin
    pub origin: Point3,
    /// Rotation about the origin
    pub rotation: YawPitchRoll,
    /// Local axis-aligned box around the origin
    pub extent: Extent,
}

impl Placement {
    /// The default placement: zero origin, zero rotation, null extent
    pub fn zero() -> Self {
        Self::default()
    }

    /// A placement at an origin with no rotation or local extent
    pub fn at(origin: Point3) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// The world-space bounding box of this placement
    ///
    /// When the local extent is null, the origin point itself is the box,
    /// so even extent-less placed nodes participate in project-extent
    /// growth.
    pub fn world_extent(&self) -> Extent {
        if self.extent.is_null() {
            Extent::from_point(self.origin)
        } else {
            self.extent.translated(self.origin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_extent_containment() {
        let null = Extent::null();
        let unit = Extent::from_corners(Point3::zero(), Point3::new(1.0, 1.0, 1.0));
        assert!(unit.contains(&null));
        assert!(!null.contains(&unit));
        assert!(null.contains(&null));
    }

    #[test]
    fn test_union_grows_monotonically() {
        let a = Extent::from_corners(Point3::zero(), Point3::new(1.0, 1.0, 1.0));
        let b = Extent::from_corners(Point3::new(2.0, -1.0, 0.0), Point3::new(3.0, 0.5, 2.0));
        let u = a.union(&b);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert_eq!(u.low().unwrap(), Point3::new(0.0, -1.0, 0.0));
        assert_eq!(u.high().unwrap(), Point3::new(3.0, 1.0, 2.0));
    }

    #[test]
    fn test_union_with_null_is_identity() {
        let a = Extent::from_corners(Point3::zero(), Point3::new(1.0, 1.0, 1.0));
        assert_eq!(a.union(&Extent::null()), a);
        assert_eq!(Extent::null().union(&a), a);
    }

    #[test]
    fn test_world_extent_of_bare_origin() {
        let p = Placement::at(Point3::new(5.0, 6.0, 7.0));
        let world = p.world_extent();
        assert_eq!(world, Extent::from_point(p.origin));
    }

    #[test]
    fn test_world_extent_translates_local_box() {
        let mut p = Placement::at(Point3::new(10.0, 0.0, 0.0));
        p.extent = Extent::from_corners(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let world = p.world_extent();
        assert_eq!(world.low().unwrap(), Point3::new(9.0, -1.0, -1.0));
        assert_eq!(world.high().unwrap(), Point3::new(11.0, 1.0, 1.0));
    }
}
