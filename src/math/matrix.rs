use super::Vec3;

/// 4x4 affine transform (column-major, ready for WebGL upload)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub data: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[12] = x;
        m.data[13] = y;
        m.data[14] = z;
        m
    }

    pub fn translation_vec(v: Vec3) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[0] = x;
        m.data[5] = y;
        m.data[10] = z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0,
                0.0, c, s, 0.0,
                0.0, -s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                c, 0.0, -s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            data: [
                c, s, 0.0, 0.0,
                -s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Rotation by `angle` about an arbitrary axis (Rodrigues)
    pub fn rotation(angle: f32, axis: Vec3) -> Self {
        let k = axis.normalize();
        let c = angle.cos();
        let s = angle.sin();
        let t = 1.0 - c;

        Self {
            data: [
                c + t * k.x * k.x, t * k.x * k.y + s * k.z, t * k.x * k.z - s * k.y, 0.0,
                t * k.x * k.y - s * k.z, c + t * k.y * k.y, t * k.y * k.z + s * k.x, 0.0,
                t * k.x * k.z + s * k.y, t * k.y * k.z - s * k.x, c + t * k.z * k.z, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Rotation carrying +Z onto `direction`
    pub fn align_z(direction: Vec3) -> Self {
        let n = direction.normalize();
        let cos_theta = Vec3::FORWARD.dot(&n).clamp(-1.0, 1.0);

        if cos_theta > 0.9999 {
            return Self::identity();
        }
        if cos_theta < -0.9999 {
            return Self::rotation_x(std::f32::consts::PI);
        }

        let axis = Vec3::FORWARD.cross(&n);
        Self::rotation(cos_theta.acos(), axis)
    }

    /// Element at (row, col)
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[row + col * 4]
    }

    /// Matrix multiplication (`self * other`)
    pub fn mul(&self, other: &Mat4) -> Self {
        let mut result = [0.0f32; 16];

        for row in 0..4 {
            for col in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.data[row + k * 4] * other.data[k + col * 4];
                }
                result[row + col * 4] = sum;
            }
        }

        Self { data: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * p.x + self.data[4] * p.y + self.data[8] * p.z + self.data[12],
            self.data[1] * p.x + self.data[5] * p.y + self.data[9] * p.z + self.data[13],
            self.data[2] * p.x + self.data[6] * p.y + self.data[10] * p.z + self.data[14],
        )
    }

    /// Transform a direction (ignores translation)
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        Vec3::new(
            self.data[0] * d.x + self.data[4] * d.y + self.data[8] * d.z,
            self.data[1] * d.x + self.data[5] * d.y + self.data[9] * d.z,
            self.data[2] * d.x + self.data[6] * d.y + self.data[10] * d.z,
        )
    }

    /// Translation column
    pub fn translation_part(&self) -> Vec3 {
        Vec3::new(self.data[12], self.data[13], self.data[14])
    }

    /// Same linear part, translation replaced
    pub fn with_translation(&self, t: Vec3) -> Self {
        let mut m = *self;
        m.data[12] = t.x;
        m.data[13] = t.y;
        m.data[14] = t.z;
        m
    }

    pub fn approx_eq(&self, other: &Mat4, eps: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a - b).abs() <= eps)
    }

    pub fn as_slice(&self) -> &[f32; 16] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!(a.distance(&b) < 0.0001, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_translation_part() {
        let m = Mat4::translation(1.0, 2.0, 3.0);
        assert_vec_close(m.translation_part(), Vec3::new(1.0, 2.0, 3.0));
        assert_vec_close(m.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let m = Mat4::rotation_z(std::f32::consts::FRAC_PI_2);
        assert_vec_close(m.transform_point(Vec3::RIGHT), Vec3::UP);
    }

    #[test]
    fn test_axis_rotation_matches_principal() {
        let angle = 0.7;
        assert!(Mat4::rotation(angle, Vec3::RIGHT).approx_eq(&Mat4::rotation_x(angle), 1e-5));
        assert!(Mat4::rotation(angle, Vec3::UP).approx_eq(&Mat4::rotation_y(angle), 1e-5));
        assert!(Mat4::rotation(angle, Vec3::FORWARD).approx_eq(&Mat4::rotation_z(angle), 1e-5));
    }

    #[test]
    fn test_align_z() {
        let dir = Vec3::new(1.0, 1.0, 0.0).normalize();
        let m = Mat4::align_z(dir);
        assert_vec_close(m.transform_direction(Vec3::FORWARD), dir);

        let flipped = Mat4::align_z(-Vec3::FORWARD);
        assert_vec_close(flipped.transform_direction(Vec3::FORWARD), -Vec3::FORWARD);
    }

    #[test]
    fn test_mul_order() {
        // translate * scale scales first
        let combined = Mat4::translation(1.0, 0.0, 0.0).mul(&Mat4::scale(2.0, 2.0, 2.0));
        assert_vec_close(combined.transform_point(Vec3::RIGHT), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_element_access() {
        let m = Mat4::rotation_x(0.3);
        assert!((m.at(2, 1) - 0.3f32.sin()).abs() < 1e-6);
        assert!((m.at(1, 2) + 0.3f32.sin()).abs() < 1e-6);
    }
}
