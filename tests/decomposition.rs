use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use wspd3::{is_well_separated, random_points, BoundingBox, Octree, Wspd};

#[test]
fn test_pairs_well_separated() {
    let mut rng = StdRng::seed_from_u64(11);
    let bounds = BoundingBox::new([0.0; 3], [10.0; 3]);
    for _ in 0..10 {
        let count = rng.gen_range(2..=200);
        let points = random_points(count, &bounds, &mut rng);
        let tree = Octree::build(&points).unwrap();

        for s in [1.0, 2.0, 40.0] {
            let wspd = Wspd::new(&tree, s);
            assert_eq!(wspd.separation(), s);
            for pair in &wspd {
                let u = tree.node(pair.first);
                let v = tree.node(pair.second);
                let gap = u.center().distance(&v.center()) - (u.bounding_radius() + v.bounding_radius());
                assert!(is_well_separated(u, v, s));
                assert!(gap >= s * u.bounding_radius().max(v.bounding_radius()));
            }
        }
    }
}

#[test]
fn test_no_reverse_duplicates() {
    let mut rng = StdRng::seed_from_u64(12);
    let bounds = BoundingBox::new([-1.0; 3], [1.0; 3]);
    let points = random_points(150, &bounds, &mut rng);
    let tree = Octree::build(&points).unwrap();
    let wspd = Wspd::new(&tree, 2.0);

    let oriented: HashSet<_> = wspd.iter().map(|p| (p.first, p.second)).collect();
    assert_eq!(oriented.len(), wspd.len());
    for pair in &wspd {
        assert!(pair.first != pair.second || !tree.node(pair.first).is_leaf());
        if pair.first != pair.second {
            assert!(!oriented.contains(&(pair.second, pair.first)), "Both orientations of {:?} present", pair);
        }
    }
}

#[test]
fn test_covers_every_point_pair() {
    let mut rng = StdRng::seed_from_u64(13);
    let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
    let points = random_points(40, &bounds, &mut rng);
    let tree = Octree::build(&points).unwrap();

    for s in [2.0, 10.0] {
        let wspd = Wspd::new(&tree, s);
        let mut covered = HashSet::new();
        for pair in &wspd {
            for &a in tree.node(pair.first).current_points() {
                for &b in tree.node(pair.second).current_points() {
                    if a != b {
                        covered.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        assert_eq!(covered.len(), points.len() * (points.len() - 1) / 2, "s = {}", s);
    }
}

#[test]
fn test_explicit_root_pair_matches_default() {
    let mut rng = StdRng::seed_from_u64(14);
    let bounds = BoundingBox::new([0.0; 3], [1.0; 3]);
    let points = random_points(200, &bounds, &mut rng);
    let tree = Octree::build(&points).unwrap();

    for s in [1.0, 8.0] {
        let wspd = Wspd::new(&tree, s);
        let explicit = Wspd::from_pair(&tree, tree.root(), tree.root(), s);
        println!("s = {}: {} pairs", s, wspd.len());
        assert!(!wspd.is_empty());
        assert_eq!(wspd.pairs(), explicit.pairs());
    }
}
