//! 点形状

use std::sync::Arc;

use super::{Bounds, XYZ};
use crate::reference::CoordinateReference;

/// 绑定参考系的点
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    /// 坐标
    pub coords: XYZ,
}

impl Point {
    /// 创建二维点
    #[must_use]
    pub fn new_2d(reference: Arc<CoordinateReference>, x: f64, y: f64) -> Self {
        Self {
            reference,
            coords: XYZ::new_2d(x, y),
        }
    }

    /// 创建三维点
    #[must_use]
    pub fn new_3d(reference: Arc<CoordinateReference>, x: f64, y: f64, z: f64) -> Self {
        Self {
            reference,
            coords: XYZ::new_3d(x, y, z),
        }
    }

    /// X 坐标
    #[inline]
    #[must_use]
    pub fn x(&self) -> f64 {
        self.coords.x
    }

    /// Y 坐标
    #[inline]
    #[must_use]
    pub fn y(&self) -> f64 {
        self.coords.y
    }

    /// Z 坐标
    #[inline]
    #[must_use]
    pub fn z(&self) -> f64 {
        self.coords.z
    }

    /// 移动到新的二维位置（z 保留）
    pub fn move_2d(&mut self, x: f64, y: f64) {
        self.coords.x = x;
        self.coords.y = y;
    }

    /// 移动到新的三维位置
    pub fn move_3d(&mut self, x: f64, y: f64, z: f64) {
        self.coords = XYZ::new_3d(x, y, z);
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.coords.x += dx;
        self.coords.y += dy;
    }

    /// 三维平移
    pub fn translate_3d(&mut self, dx: f64, dy: f64, dz: f64) {
        self.coords.x += dx;
        self.coords.y += dy;
        self.coords.z += dz;
    }

    /// 零尺寸范围盒
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new_3d(
            self.reference.clone(),
            self.coords.x,
            0.0,
            self.coords.y,
            0.0,
            self.coords.z,
            0.0,
        )
    }

    /// 值相等性
    #[must_use]
    pub fn equals(&self, other: &Point) -> bool {
        self.reference.equals(&other.reference) && self.coords == other.coords
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn wgs84() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::wgs84())
    }

    #[test]
    fn test_point_mutation() {
        let mut p = Point::new_2d(wgs84(), 10.0, 20.0);
        p.translate_2d(1.0, -2.0);
        assert_eq!(p.x(), 11.0);
        assert_eq!(p.y(), 18.0);

        p.move_3d(0.0, 0.0, 100.0);
        assert_eq!(p.z(), 100.0);
    }

    #[test]
    fn test_point_equals() {
        let a = Point::new_2d(wgs84(), 1.0, 2.0);
        let b = Point::new_2d(wgs84(), 1.0, 2.0);
        let c = Point::new_2d(wgs84(), 1.0, 2.5);
        assert!(a.equals(&b));
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_point_bounds_zero_extent() {
        let p = Point::new_3d(wgs84(), 5.0, 6.0, 7.0);
        let b = p.bounds();
        assert_eq!((b.x, b.y, b.z), (5.0, 6.0, 7.0));
        assert_eq!((b.width, b.height, b.depth), (0.0, 0.0, 0.0));
        assert!(b.contains_2d_coordinates(5.0, 6.0));
    }
}
