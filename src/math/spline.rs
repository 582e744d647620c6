use super::Vec3;

/// A control point with its own tangent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HermitePoint {
    pub position: Vec3,
    pub tangent: Vec3,
}

impl HermitePoint {
    pub fn new(position: Vec3, tangent: Vec3) -> Self {
        Self { position, tangent }
    }
}

/// Piecewise cubic Hermite curve through N control points, parameterized over [0, 1]
#[derive(Debug, Clone)]
pub struct HermiteSpline {
    pub points: Vec<HermitePoint>,
}

impl HermiteSpline {
    pub fn new(points: Vec<HermitePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evaluate at global parameter t (clamped to [0, 1])
    ///
    /// Segment pair is (floor(t*(N-1)), ceil(t*(N-1))); tangents are scaled by 1/(N-1)
    /// so the whole curve shares one parameter range.
    pub fn evaluate(&self, t: f32) -> Vec3 {
        match self.points.len() {
            0 => return Vec3::ZERO,
            1 => return self.points[0].position,
            _ => {}
        }

        let segments = (self.points.len() - 1) as f32;
        let global = t.clamp(0.0, 1.0) * segments;
        let a = global.floor() as usize;
        let b = global.ceil() as usize;
        let local = global % 1.0;

        let pa = &self.points[a];
        let pb = &self.points[b];
        let tangent_scale = 1.0 / segments;

        hermite_curve(
            pa.position,
            pb.position,
            pa.tangent.scale(tangent_scale),
            pb.tangent.scale(tangent_scale),
            local,
        )
    }

    /// Sample N evenly spaced points, endpoints included
    pub fn sample(&self, n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1).max(1) as f32;
                self.evaluate(t)
            })
            .collect()
    }
}

/// Cubic Hermite blend between p0 and p1 with tangents m0, m1
pub fn hermite_curve(p0: Vec3, p1: Vec3, m0: Vec3, m1: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    p0.scale(h00) + m0.scale(h10) + p1.scale(h01) + m1.scale(h11)
}
