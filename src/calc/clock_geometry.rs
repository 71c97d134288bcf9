use kurbo::{Point, Vec2};

/// Logical size of the hour/minute dial surface the pointer is mapped onto.
pub const DIAL_DIAMETER: f64 = 260.0;
/// Drag distances from the dial center below this select the 13–24 ring.
pub const RING_THRESHOLD: f64 = 90.0;
/// Degrees between two hour ticks.
pub const HOUR_INTERVAL: f64 = 360.0 / 12.0;
/// Degrees between two minute values.
pub const MINUTE_INTERVAL: f64 = 360.0 / 60.0;
/// Diameter used to lay out the 1–12 hour labels and the minute labels.
pub const OUTER_TICK_DIAMETER: f64 = 274.0;
/// Diameter used to lay out the 13–24 hour labels in 24-hour mode.
pub const INNER_TICK_DIAMETER: f64 = 194.0;

pub fn dial_center() -> Point {
    Point::new(DIAL_DIAMETER / 2.0, DIAL_DIAMETER / 2.0)
}

/// Which hour ring a 24-hour dial is currently pointing into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HourRing {
    /// Hours 1–12 (long pointer).
    #[default]
    Standard,
    /// Hours 13–24 (short pointer, angle offset by a full turn).
    Extended,
}

impl HourRing {
    pub fn for_distance(distance: f64) -> Self {
        if distance < RING_THRESHOLD {
            HourRing::Extended
        } else {
            HourRing::Standard
        }
    }

    /// A representative distance that selects this ring, used when the ring
    /// is derived from a value rather than a live drag.
    pub fn nominal_distance(self) -> f64 {
        match self {
            HourRing::Standard => 100.0,
            HourRing::Extended => 70.0,
        }
    }

    pub fn pointer(self) -> PointerShape {
        match self {
            HourRing::Standard => PointerShape {
                length_pct: 42.0,
                top_pct: 8.0,
            },
            HourRing::Extended => PointerShape {
                length_pct: 28.0,
                top_pct: 22.0,
            },
        }
    }

    fn angle_offset(self) -> f64 {
        match self {
            HourRing::Standard => 0.0,
            HourRing::Extended => 360.0,
        }
    }
}

/// Rendered pointer length and radial origin, as percentages of the dial.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerShape {
    pub length_pct: f64,
    pub top_pct: f64,
}

/// Distance from `point` to `center`.
pub fn distance(point: Point, center: Point) -> f64 {
    (point - center).hypot()
}

/// Maps a pointer position to a clockwise angle from 12 o'clock, quantized to
/// the nearest multiple of `step`. Returns `None` when the angle is undefined
/// (pointer exactly on the center).
pub fn xy_to_angle(point: Point, center: Point, step: f64) -> Option<f64> {
    let offset: Vec2 = point - center;
    let length = offset.hypot();
    let sign = if offset.x > 0.0 { 1.0 } else { -1.0 };
    let mut angle = sign * (180.0 / std::f64::consts::PI) * ((center.y - point.y) / length).acos();
    if angle.is_nan() {
        return None;
    }
    if angle <= 0.0 {
        angle += 360.0;
    }
    let quantized = (angle / step).round() * step;
    Some(if quantized == 360.0 { 0.0 } else { quantized })
}

/// Converts a dial angle into a dial value. The hour dial reads 12 at zero and
/// 24 at a full turn (the 24-hour ring); everything else is `angle / interval`.
pub fn angle_to_time(angle: f64, interval: f64, is_hour_dial: bool) -> u32 {
    if is_hour_dial {
        if angle == 0.0 {
            return 12;
        }
        if angle == 360.0 {
            return 24;
        }
    }
    (angle / interval).round() as u32
}

/// Angle of the pointer for an hour value, including the ring offset.
pub fn hour_angle(hour: u32, ring: HourRing) -> f64 {
    HOUR_INTERVAL * (hour % 12) as f64 + ring.angle_offset()
}

pub fn minute_angle(minute: u32) -> f64 {
    MINUTE_INTERVAL * minute as f64
}

/// Resolves a quantized hour-dial angle to `(rotation, hour)` for the given
/// ring: the Extended ring adds a full turn so 0° reads 24 and 30° reads 13.
pub fn resolve_hour(angle: f64, ring: HourRing) -> (f64, u32) {
    let rotation = angle + ring.angle_offset();
    let hour = if rotation > 360.0 {
        (rotation / HOUR_INTERVAL).round() as u32
    } else {
        angle_to_time(rotation, HOUR_INTERVAL, true)
    };
    (rotation, hour)
}

/// Label position of tick `index` (1..=12, clockwise from one o'clock) on a
/// dial of `diameter`, relative to the dial center.
pub fn tick_offset(index: u32, diameter: f64) -> Vec2 {
    let radius = diameter / 2.0 - 20.0;
    let theta = 2.0 * std::f64::consts::PI / 12.0 * index as f64;
    Vec2::new(
        (radius * theta.sin()).floor(),
        (-radius * theta.cos()).floor(),
    )
}

/// Converts a page position into dial-local coordinates.
pub fn to_dial_space(page: Point, dial_origin: Point) -> Point {
    Point::new((page.x - dial_origin.x).floor(), (page.y - dial_origin.y).floor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c() -> Point {
        dial_center()
    }

    #[test]
    fn test_twelve_oclock_reads_twelve_and_zero() {
        let top = Point::new(130.0, 10.0);
        let angle = xy_to_angle(top, c(), HOUR_INTERVAL).unwrap();
        assert_eq!(angle, 0.0);
        assert_eq!(angle_to_time(angle, HOUR_INTERVAL, true), 12);
        let angle = xy_to_angle(top, c(), MINUTE_INTERVAL).unwrap();
        assert_eq!(angle_to_time(angle, MINUTE_INTERVAL, false), 0);
    }

    #[test]
    fn test_three_oclock_is_quarter_turn() {
        let right = Point::new(250.0, 130.0);
        let angle = xy_to_angle(right, c(), MINUTE_INTERVAL).unwrap();
        assert_eq!(angle, 90.0);
        assert_eq!(angle_to_time(angle, MINUTE_INTERVAL, false), 15);
        assert_eq!(angle_to_time(angle, HOUR_INTERVAL, true), 3);
    }

    #[test]
    fn test_left_half_is_normalized_positive() {
        let left = Point::new(10.0, 130.0);
        assert_eq!(xy_to_angle(left, c(), MINUTE_INTERVAL), Some(270.0));
        let bottom = Point::new(130.0, 250.0);
        assert_eq!(xy_to_angle(bottom, c(), HOUR_INTERVAL), Some(180.0));
    }

    #[test]
    fn test_near_full_turn_rounds_to_zero() {
        // Slightly left of twelve o'clock: ~359 degrees, quantized to 360 -> 0.
        let p = Point::new(128.0, 10.0);
        assert_eq!(xy_to_angle(p, c(), HOUR_INTERVAL), Some(0.0));
    }

    #[test]
    fn test_quantizes_to_step() {
        // Roughly 50 degrees: nearest hour tick is 60, nearest minute value 48.
        let p = Point::new(206.6, 65.7);
        assert_eq!(xy_to_angle(p, c(), HOUR_INTERVAL), Some(60.0));
        assert_eq!(xy_to_angle(p, c(), MINUTE_INTERVAL), Some(48.0));
    }

    #[test]
    fn test_center_is_undefined() {
        assert_eq!(xy_to_angle(c(), c(), HOUR_INTERVAL), None);
    }

    #[test]
    fn test_angle_to_time_full_turn_is_24() {
        assert_eq!(angle_to_time(360.0, HOUR_INTERVAL, true), 24);
        assert_eq!(angle_to_time(330.0, HOUR_INTERVAL, true), 11);
    }

    #[test]
    fn test_ring_threshold() {
        assert_eq!(HourRing::for_distance(89.9), HourRing::Extended);
        assert_eq!(HourRing::for_distance(90.0), HourRing::Standard);
        assert_eq!(HourRing::for_distance(120.0), HourRing::Standard);
        assert_eq!(HourRing::Extended.pointer().length_pct, 28.0);
        assert_eq!(HourRing::Standard.pointer().top_pct, 8.0);
    }

    #[test]
    fn test_resolve_hour_extended_ring() {
        assert_eq!(resolve_hour(0.0, HourRing::Extended), (360.0, 24));
        assert_eq!(resolve_hour(30.0, HourRing::Extended), (390.0, 13));
        assert_eq!(resolve_hour(330.0, HourRing::Extended), (690.0, 23));
        assert_eq!(resolve_hour(0.0, HourRing::Standard), (0.0, 12));
        assert_eq!(resolve_hour(90.0, HourRing::Standard), (90.0, 3));
    }

    #[test]
    fn test_hour_angle_roundtrip() {
        assert_eq!(hour_angle(15, HourRing::Extended), 450.0);
        assert_eq!(hour_angle(12, HourRing::Standard), 0.0);
        assert_eq!(minute_angle(45), 270.0);
    }

    #[test]
    fn test_tick_offset_twelve_is_straight_up() {
        let v = tick_offset(12, OUTER_TICK_DIAMETER);
        assert!(v.x.abs() <= 1.0);
        assert_eq!(v.y, -117.0);
        let three = tick_offset(3, OUTER_TICK_DIAMETER);
        assert_eq!(three.x, 117.0);
    }

    #[test]
    fn test_to_dial_space_floors() {
        let p = to_dial_space(Point::new(110.7, 52.2), Point::new(10.0, 2.0));
        assert_eq!(p, Point::new(100.0, 50.0));
    }
}
