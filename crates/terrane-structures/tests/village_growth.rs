use proptest::prelude::*;

use terrane_structures::village::{EXCLUSION, MAX_ARM};
use terrane_structures::{StructureKind, grow_village};
use terrane_world::WorldGenParams;

fn params(seed: i32, max_segments: usize) -> WorldGenParams {
    let mut p = WorldGenParams::default().with_seed(seed);
    p.village_max_segments = max_segments;
    p
}

fn same_axis_clash(list: &[(i32, i32)], along_x: bool) -> Option<((i32, i32), (i32, i32))> {
    for (i, &a) in list.iter().enumerate() {
        for &b in &list[..i] {
            let near = (a.0 - b.0).abs() < EXCLUSION && (a.1 - b.1).abs() < EXCLUSION;
            let other_line = if along_x { a.1 != b.1 } else { a.0 != b.0 };
            if near && other_line {
                return Some((a, b));
            }
        }
    }
    None
}

#[test]
fn growth_is_deterministic() {
    let p = params(1337, 20_000);
    let a = grow_village(&p, (150, 150));
    let b = grow_village(&p, (150, 150));
    assert_eq!(a.structures, b.structures);
    assert_eq!(a.pops, b.pops);
}

#[test]
fn cap_bounds_the_pops() {
    let p = params(7, 50);
    let plan = grow_village(&p, (0, 0));
    assert!(plan.pops <= 50);
    assert_eq!(plan.roads().count(), plan.pops);
    // the seed segments alone keep the queue busy for well over 50 pops
    assert!(plan.capped);
}

#[test]
fn center_comes_first_with_its_hitbox() {
    let plan = grow_village(&params(99, 20_000), (-300, 40));
    assert_eq!(plan.structures[0].kind, StructureKind::VillageCenter);
    assert_eq!((plan.structures[0].x, plan.structures[0].z), (-300, 40));
    assert_eq!(plan.hitboxes[0].hx, 7);
    assert_eq!(plan.hitboxes.len(), 1 + plan.buildings().count());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn growth_terminates_and_respects_exclusion(
        seed in any::<i32>(),
        cx in -2000i32..2000,
        cz in -2000i32..2000,
    ) {
        let p = params(seed, 20_000);
        let plan = grow_village(&p, (cx, cz));
        prop_assert!(plan.pops <= p.village_max_segments);
        prop_assert_eq!(same_axis_clash(&plan.xdir, true), None);
        prop_assert_eq!(same_axis_clash(&plan.zdir, false), None);

        // no road wanders further than the longest possible arm
        let reach = MAX_ARM as i32 + 6;
        for r in plan.roads() {
            prop_assert!((r.x - cx).abs() <= reach && (r.z - cz).abs() <= reach);
        }
        for b in plan.buildings() {
            let d = (b.x - cx).abs().max((b.z - cz).abs());
            let is_library = b.kind == StructureKind::Library;
            prop_assert_eq!(is_library, d < p.library_radius);
        }
    }
}
