use rand::rngs::StdRng;
use rand::SeedableRng;
use wspd3::{find_closest_pair, find_farthest_pair, random_points, BoundingBox};

fn main() {
    // Define bounds for the point cloud
    let bounds = BoundingBox::new([0.0; 3], [100.0; 3]);

    // Generate a large number of random points to stress the algorithm
    let mut rng = StdRng::seed_from_u64(123456789);
    let points = random_points(100000, &bounds, &mut rng);

    // Run both queries (this is the hot path)
    let (a, b) = find_closest_pair(&points).expect("Closest pair failed");
    println!("closest:  {} {} ({})", a, b, a.distance(&b));

    let (a, b) = find_farthest_pair(&points, 0.1).expect("Farthest pair failed");
    println!("farthest: {} {} ({})", a, b, a.distance(&b));
}
