use glam::Vec2;
use std::f32::consts::TAU;
use std::ops::{Add, AddAssign, Sub};

/// An angle in radians, always wrapped to `0..TAU`
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Angle(f32);

impl Angle {
    #[inline]
    pub fn new(radians: f32) -> Self {
        Angle(wrap(radians))
    }

    #[inline]
    pub fn from_degrees(degrees: f32) -> Self {
        Angle::new(degrees.to_radians())
    }

    /// Direction of the vector, east being zero
    pub fn from_vector(input: Vec2) -> Self {
        Angle::new(input.y.atan2(input.x))
    }

    #[inline]
    pub const fn rad(&self) -> f32 {
        self.0
    }

    /// Degrees in `0.0..360.0`
    #[inline]
    pub fn degrees(&self) -> f32 {
        self.0.to_degrees()
    }

    #[inline]
    pub fn unit(&self) -> Vec2 {
        let (y, x) = self.0.sin_cos();
        Vec2::new(x, y)
    }

    /// Rotate `v` counter clockwise by this angle
    #[inline]
    pub fn rotate(&self, v: Vec2) -> Vec2 {
        let (s, c) = self.0.sin_cos();
        Vec2::new(v.x * c - v.y * s, v.y * c + v.x * s)
    }
}

#[inline]
fn wrap(mut radians: f32) -> f32 {
    radians %= TAU;
    if radians < 0.0 {
        radians += TAU;
    }
    radians
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, other: Angle) -> Angle {
        Angle::new(self.0 + other.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, other: Angle) {
        self.0 = wrap(self.0 + other.0);
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, other: Angle) -> Angle {
        Angle::new(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Angle;
    use glam::Vec2;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn wraps_negative() {
        let a = Angle::new(-FRAC_PI_2);
        assert!((a.rad() - 3.0 * FRAC_PI_2).abs() < 0.0001);
        let b = Angle::new(PI * 5.0);
        assert!((b.rad() - PI).abs() < 0.0001);
        let mut c = Angle::from_degrees(270.0);
        c += Angle::from_degrees(180.0);
        assert!((c.degrees() - 90.0).abs() < 0.001);
    }

    #[test]
    fn from_vector_degrees() {
        assert!((Angle::from_vector(Vec2::new(0.0, 1.0)).degrees() - 90.0).abs() < 0.001);
        assert!((Angle::from_vector(Vec2::new(-1.0, 0.0)).degrees() - 180.0).abs() < 0.001);
        assert!((Angle::from_vector(Vec2::new(0.0, -1.0)).degrees() - 270.0).abs() < 0.001);
    }

    #[test]
    fn rotate_quarter() {
        let v = Angle::new(FRAC_PI_2).rotate(Vec2::new(2.0, 0.0));
        assert!(v.x.abs() < 0.0001);
        assert!((v.y - 2.0).abs() < 0.0001);
    }
}
