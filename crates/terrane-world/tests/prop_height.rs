use proptest::prelude::*;
use terrane_world::height::{BEACH_SCALE, OCEAN_THRESHOLD};
use terrane_world::{SEA_LEVEL, column_height};

fn ground() -> impl Strategy<Value = f32> {
    0.0f32..80.0
}

fn beach_field() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

proptest! {
    #[test]
    fn height_is_monotonic_in_bedrock(a in 0.0f32..=1.0, b in 0.0f32..=1.0, beach in beach_field(), g in ground()) {
        let w = BEACH_SCALE * beach;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(column_height(lo, w, g) <= column_height(hi, w, g));
    }

    #[test]
    fn no_jump_at_ocean_edge(beach in 0.05f32..=1.0, g in ground()) {
        let w = BEACH_SCALE * beach;
        let below = column_height(OCEAN_THRESHOLD - 1e-4, w, g);
        let above = column_height(OCEAN_THRESHOLD, w, g);
        prop_assert_eq!(below, SEA_LEVEL);
        prop_assert!((above - below).abs() <= 1);
    }

    #[test]
    fn no_jump_at_land_edge(beach in 0.05f32..=1.0, g in ground()) {
        let w = BEACH_SCALE * beach;
        let edge = OCEAN_THRESHOLD + w;
        let inside = column_height(edge - 1e-5, w, g);
        let land = column_height(edge, w, g);
        prop_assert!(inside <= land);
        prop_assert!(land - inside <= 1, "beach {inside} vs land {land}");
    }
}
