use bevy::prelude::*;

/// Identifier of a zone inside a loaded course. Stable for the lifetime of the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(pub usize);

/// What entering a zone means for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneKind {
    Start,
    Checkpoint(usize),
    End,
}

/// A labeled cylinder of infinite height the tracked entity can enter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerZone {
    pub id: ZoneId,
    pub position: Vec3,
    pub radius: f32,
    pub kind: ZoneKind,
}

/// Distance on the ground plane, the vertical axis is ignored.
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// True when `position` is strictly inside `zone`.
///
/// Stateless: callers that need "just entered" must remember the previous answer.
pub fn is_inside(position: Vec3, zone: &TriggerZone) -> bool {
    horizontal_distance(position, zone.position) < zone.radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(position: Vec3, radius: f32) -> TriggerZone {
        TriggerZone {
            id: ZoneId(0),
            position,
            radius,
            kind: ZoneKind::Start,
        }
    }

    #[test]
    fn test_inside_ignores_height() {
        let start = zone(Vec3::ZERO, 2.0);
        assert!(is_inside(Vec3::new(1.5, 0.0, 0.0), &start));
        assert!(is_inside(Vec3::new(1.5, 40.0, 0.0), &start));
    }

    #[test]
    fn test_boundary_is_outside() {
        let start = zone(Vec3::new(10.0, 0.0, 0.0), 2.0);
        assert!(!is_inside(Vec3::new(12.0, 0.0, 0.0), &start));
        assert!(!is_inside(Vec3::new(10.0, 0.0, 3.0), &start));
    }

    #[test]
    fn test_horizontal_distance() {
        let d = horizontal_distance(Vec3::new(3.0, 5.0, 4.0), Vec3::ZERO);
        assert!((d - 5.0).abs() < 1e-6);
    }
}
