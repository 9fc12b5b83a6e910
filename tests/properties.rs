//! Property tests for the geometric and leveling rules

use proptest::prelude::*;

use tileblade::combat::{AttackDirection, AttackPattern, TileOffset, Weapon, WeaponKind};
use tileblade::core::types::{EntityId, Vec2};
use tileblade::entity::{level_for_distance, Entity, EntityKind, EntityRegistry};

proptest! {
    #[test]
    fn test_enemy_level_in_band_range(distance in 0.0f32..5_000.0, max in 1.0f32..3_000.0) {
        let level = level_for_distance(distance, max, 6);
        prop_assert!((1..=6).contains(&level));
    }

    #[test]
    fn test_enemy_level_non_decreasing(a in 0.0f32..2_000.0, b in 0.0f32..2_000.0) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(level_for_distance(near, 2_000.0, 6) <= level_for_distance(far, 2_000.0, 6));
    }

    #[test]
    fn test_spawned_enemy_levels_follow_distance(xs in proptest::collection::vec(0.0f32..1_000.0, 1..20)) {
        let mut reg = EntityRegistry::new(6);
        reg.spawn_player(Vec2::ZERO, 20, 100).unwrap();
        let mut spawned: Vec<(f32, u32)> = xs
            .iter()
            .map(|&x| {
                let id = reg.create(EntityKind::Enemy, Vec2::new(x, 0.0), 20, 100, 1_000.0).unwrap();
                (x, reg.get(id).unwrap().level)
            })
            .collect();
        spawned.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in spawned.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_dispose_twice_equals_once(x in -500.0f32..500.0, y in -500.0f32..500.0, health in -50i32..500) {
        let mut once = Entity::new(EntityId(3), EntityKind::Enemy, Vec2::new(x, y), 20, health, 2);
        once.dispose();
        let mut twice = once.clone();
        prop_assert!(!twice.dispose());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_rotated_patterns_keep_cell_count(cells in proptest::collection::vec((-4i32..4, -4i32..4), 1..12)) {
        let pattern = AttackPattern::from_cells(&cells);
        let weapon = Weapon::new(WeaponKind::Sword, 1, pattern, 30, 5).unwrap();
        for direction in AttackDirection::CARDINALS {
            let mut rotated: Vec<TileOffset> = weapon
                .attack_pattern
                .cells()
                .iter()
                .map(|c| direction.rotate(*c))
                .collect();
            let mut original: Vec<TileOffset> = weapon.attack_pattern.cells().to_vec();
            rotated.sort_by_key(|o| (o.dx, o.dy));
            rotated.dedup();
            original.sort_by_key(|o| (o.dx, o.dy));
            original.dedup();
            // Rotations are bijections on the integer grid
            prop_assert_eq!(rotated.len(), original.len());
        }
    }
}

#[test]
fn test_two_cell_pattern_rotations() {
    let cells = [TileOffset::new(0, 0), TileOffset::new(0, 1)];
    let rotate = |d: AttackDirection| cells.iter().map(|c| d.rotate(*c)).collect::<Vec<_>>();

    assert_eq!(rotate(AttackDirection::Right), vec![TileOffset::new(0, 0), TileOffset::new(1, 0)]);
    assert_eq!(rotate(AttackDirection::Left), vec![TileOffset::new(0, 0), TileOffset::new(-1, 0)]);
    assert_eq!(rotate(AttackDirection::Up), vec![TileOffset::new(0, 0), TileOffset::new(0, -1)]);
    assert_eq!(rotate(AttackDirection::Down), vec![TileOffset::new(0, 0), TileOffset::new(0, 1)]);
}
