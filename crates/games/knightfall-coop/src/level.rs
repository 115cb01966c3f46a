use serde::{Deserialize, Serialize};

use knightfall_core::geometry::Aabb;
use knightfall_core::player::PlayerSlot;

/// Category of a static obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Floor slab: supports landing from above.
    Ground,
    /// Blocks horizontal motion and upward vertical motion.
    Wall,
    /// Floating platform: supports landing from above; pickups spawn here.
    Platform,
}

/// Immutable axis-aligned level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub bounds: Aabb,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub const fn new(x: f32, y: f32, width: f32, height: f32, kind: ObstacleKind) -> Self {
        Self {
            bounds: Aabb::new(x, y, width, height),
            kind,
        }
    }

    pub fn is_wall(&self) -> bool {
        self.kind == ObstacleKind::Wall
    }
}

/// A level: static obstacles plus spawn points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
    /// Spawn top-left corner per player slot.
    pub spawns: [(f32, f32); 2],
    /// Top-left corner of each hostile actor.
    pub hostile_spawns: Vec<(f32, f32)>,
}

/// Width of the castle level.
pub const CASTLE_WIDTH: f32 = 1200.0;
/// Height of the castle level.
pub const CASTLE_HEIGHT: f32 = 800.0;

const P: ObstacleKind = ObstacleKind::Platform;

/// Floating platforms of the castle level, bottom tier first.
const CASTLE_PLATFORMS: [(f32, f32, f32); 27] = [
    // Lower
    (100.0, 680.0, 150.0),
    (350.0, 650.0, 120.0),
    (550.0, 680.0, 150.0),
    (800.0, 650.0, 120.0),
    (1000.0, 680.0, 150.0),
    // Mid
    (50.0, 560.0, 100.0),
    (200.0, 520.0, 180.0),
    (450.0, 500.0, 140.0),
    (650.0, 540.0, 160.0),
    (870.0, 500.0, 140.0),
    (1050.0, 560.0, 120.0),
    // Upper-mid
    (100.0, 420.0, 120.0),
    (280.0, 380.0, 100.0),
    (450.0, 350.0, 200.0),
    (720.0, 380.0, 100.0),
    (900.0, 420.0, 120.0),
    (1050.0, 380.0, 130.0),
    // Upper
    (50.0, 280.0, 140.0),
    (250.0, 240.0, 120.0),
    (450.0, 200.0, 150.0),
    (670.0, 240.0, 120.0),
    (850.0, 200.0, 150.0),
    (1030.0, 260.0, 140.0),
    // Top
    (150.0, 120.0, 180.0),
    (400.0, 80.0, 200.0),
    (670.0, 100.0, 160.0),
    (900.0, 80.0, 180.0),
];

const PLATFORM_THICKNESS: f32 = 20.0;
const WALL_THICKNESS: f32 = 20.0;

impl Level {
    /// The castle level: a ground slab, tiers of floating platforms and four
    /// boundary walls.
    pub fn castle() -> Self {
        let mut obstacles = Vec::with_capacity(CASTLE_PLATFORMS.len() + 5);
        obstacles.push(Obstacle::new(
            0.0,
            760.0,
            CASTLE_WIDTH,
            40.0,
            ObstacleKind::Ground,
        ));
        obstacles.extend(
            CASTLE_PLATFORMS
                .iter()
                .map(|&(x, y, w)| Obstacle::new(x, y, w, PLATFORM_THICKNESS, P)),
        );

        let wall = ObstacleKind::Wall;
        obstacles.push(Obstacle::new(0.0, 0.0, WALL_THICKNESS, CASTLE_HEIGHT, wall));
        obstacles.push(Obstacle::new(
            CASTLE_WIDTH - WALL_THICKNESS,
            0.0,
            WALL_THICKNESS,
            CASTLE_HEIGHT,
            wall,
        ));
        obstacles.push(Obstacle::new(0.0, 0.0, CASTLE_WIDTH, WALL_THICKNESS, wall));
        obstacles.push(Obstacle::new(
            0.0,
            CASTLE_HEIGHT - WALL_THICKNESS,
            CASTLE_WIDTH,
            WALL_THICKNESS,
            wall,
        ));

        Self {
            width: CASTLE_WIDTH,
            height: CASTLE_HEIGHT,
            obstacles,
            spawns: [(150.0, 650.0), (1000.0, 650.0)],
            hostile_spawns: vec![(575.0, 100.0)],
        }
    }

    /// A level with no geometry at all. Useful for isolated physics checks.
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            obstacles: Vec::new(),
            spawns: [(0.0, 0.0), (0.0, 0.0)],
            hostile_spawns: Vec::new(),
        }
    }

    pub fn spawn(&self, slot: PlayerSlot) -> (f32, f32) {
        self.spawns[slot.index()]
    }

    pub fn walls(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| o.is_wall())
    }

    /// Surfaces a character can land on (ground and platforms).
    pub fn surfaces(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter().filter(|o| !o.is_wall())
    }

    /// Floating platforms only: the candidate pickup locations.
    pub fn platforms(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::Platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn castle_has_expected_geometry() {
        let level = Level::castle();
        assert_eq!(level.platforms().count(), 27);
        assert_eq!(level.walls().count(), 4);
        assert_eq!(
            level
                .obstacles
                .iter()
                .filter(|o| o.kind == ObstacleKind::Ground)
                .count(),
            1
        );
        assert_eq!(level.surfaces().count(), 28);
        assert_eq!(level.hostile_spawns.len(), 1);
    }

    #[test]
    fn spawns_are_inside_the_walls() {
        let level = Level::castle();
        for slot in PlayerSlot::ALL {
            let (x, y) = level.spawn(slot);
            for wall in level.walls() {
                let body = Aabb::new(x, y, 40.0, 60.0);
                assert!(
                    !body.overlaps(&wall.bounds),
                    "{slot:?} spawn overlaps a wall"
                );
            }
            assert!(x > 0.0 && x < level.width);
            assert!(y > 0.0 && y < level.height);
        }
    }

    #[test]
    fn empty_level_has_no_platforms() {
        let level = Level::empty(100.0, 100.0);
        assert_eq!(level.platforms().count(), 0);
    }
}
