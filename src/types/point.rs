//! 3D point helpers.

/// A position in 3D space.
pub type Point = [f64; 3];

/// Component-wise sum.
pub fn add(left: &Point, right: &Point) -> Point {
    [left[0] + right[0], left[1] + right[1], left[2] + right[2]]
}

/// Component-wise difference.
pub fn sub(left: &Point, right: &Point) -> Point {
    [left[0] - right[0], left[1] - right[1], left[2] - right[2]]
}

/// Multiply every component by `factor`.
pub fn scale(point: &Point, factor: f64) -> Point {
    [point[0] * factor, point[1] * factor, point[2] * factor]
}

/// Euclidean distance between two points.
pub fn distance(left: &Point, right: &Point) -> f64 {
    let d = sub(left, right);
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Mean position of a set of points, `None` when the set is empty.
pub fn center_of_gravity(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold([0.0; 3], |acc, p| add(&acc, p));
    Some(scale(&sum, 1.0 / points.len() as f64))
}

/// Largest distance from the center of gravity to any point (0 when empty).
pub fn max_distance_to_center_of_gravity(points: &[Point]) -> f64 {
    let Some(center) = center_of_gravity(points) else {
        return 0.0;
    };
    points
        .iter()
        .map(|p| distance(&center, p))
        .fold(0.0, f64::max)
}

/// Format a point as space separated coordinates.
pub fn dump_point(point: &Point) -> String {
    format!("{} {} {}", point[0], point[1], point[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 0.0]), 5.0);
        assert_eq!(distance(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_center_of_gravity() {
        let points = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [1.0, 3.0, 0.0]];
        assert_eq!(center_of_gravity(&points), Some([1.0, 1.0, 0.0]));
        assert_eq!(center_of_gravity(&[]), None);
    }

    #[test]
    fn test_max_distance() {
        let points = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(max_distance_to_center_of_gravity(&points), 1.0);
        assert_eq!(max_distance_to_center_of_gravity(&[]), 0.0);
    }

    #[test]
    fn test_dump() {
        assert_eq!(dump_point(&[0.0, 1.5, -2.0]), "0 1.5 -2");
    }
}
