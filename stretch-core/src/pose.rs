use glam::DVec3;
use rand::Rng;

/// Samples a point uniformly inside the cube `[-half_range, half_range]^3`.
pub fn random_in_cube(half_range: f64, rng: &mut impl Rng) -> DVec3 {
    let x = rng.random_range(-half_range..=half_range);
    let y = rng.random_range(-half_range..=half_range);
    let z = rng.random_range(-half_range..=half_range);
    DVec3::new(x, y, z)
}

/// Samples a `(root, end)` joint pair, both uniform in the same cube.
pub fn random_pose(rng: &mut impl Rng, half_range: f64) -> (DVec3, DVec3) {
    let root = random_in_cube(half_range, rng);
    let end = random_in_cube(half_range, rng);
    (root, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn samples_stay_inside_the_cube() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let (root, end) = random_pose(&mut rng, 2.5);
            for p in [root, end] {
                assert!(p.abs().max_element() <= 2.5, "{p:?}");
            }
        }
    }

    #[test]
    fn same_seed_gives_same_pose() {
        let a = random_pose(&mut StdRng::seed_from_u64(42), 10.0);
        let b = random_pose(&mut StdRng::seed_from_u64(42), 10.0);
        assert_eq!(a, b);
    }
}
