#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

static ORIGIN: Point = Point { x: 0.0, y: 0.0 };

pub fn make_point(x: f64, y: f64) -> Point {
    Point { x, y }
}

pub fn translate(p: Point, dx: f64, dy: f64) -> Point {
    Point {
        x: p.x + dx,
        y: p.y + dy,
    }
}

/// Distance from the origin; `0.0` for a null pointer.
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub fn length(p: *const Point) -> f64 {
    match unsafe { p.as_ref() } {
        Some(p) => p.x.hypot(p.y),
        None => 0.0,
    }
}

/// Address of the shared origin point.
pub fn origin() -> *const Point {
    &ORIGIN
}

#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub fn nudge(p: *mut Point, dx: f64) {
    if let Some(p) = unsafe { p.as_mut() } {
        p.x += dx;
    }
}

pub fn centroid(points: Vec<Point>) -> Point {
    if points.is_empty() {
        return ORIGIN;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point { x: sx / n, y: sy / n }
}

pub fn xs(points: Vec<Point>) -> Vec<f64> {
    points.iter().map(|p| p.x).collect()
}

/// Smallest and largest x coordinate, `(0.0, 0.0)` when empty.
pub fn x_range(points: Vec<Point>) -> (f64, f64) {
    let mut xs = points.iter().map(|p| p.x);
    match xs.next() {
        Some(first) => xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))),
        None => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let points = vec![make_point(0.0, 0.0), make_point(2.0, 4.0)];
        assert_eq!(centroid(points), make_point(1.0, 2.0));
        assert_eq!(centroid(Vec::new()), ORIGIN);
    }

    #[test]
    fn test_x_range() {
        let points = vec![make_point(3.0, 0.0), make_point(-1.0, 0.0), make_point(2.0, 9.0)];
        assert_eq!(x_range(points), (-1.0, 3.0));
    }

    #[test]
    fn test_pointer_helpers() {
        let mut p = make_point(3.0, 4.0);
        assert_eq!(length(&p), 5.0);
        nudge(&mut p, 1.0);
        assert_eq!(p.x, 4.0);
        assert_eq!(length(std::ptr::null()), 0.0);
    }
}
