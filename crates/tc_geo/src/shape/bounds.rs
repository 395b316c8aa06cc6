//! 轴对齐范围盒
//!
//! 始终以 原点 + 非负尺寸 存储；所有构造路径都先归一化，
//! 负尺寸输入被翻转为等价的正尺寸表示。

use std::sync::Arc;

use super::{Point, XYZ};
use crate::reference::CoordinateReference;

/// 轴对齐范围盒（二维或三维）
///
/// 二维范围盒的 z/depth 恒为 0。
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    /// 原点 X
    pub x: f64,
    /// 原点 Y
    pub y: f64,
    /// 原点 Z
    pub z: f64,
    /// X 方向尺寸，>= 0
    pub width: f64,
    /// Y 方向尺寸，>= 0
    pub height: f64,
    /// Z 方向尺寸，>= 0
    pub depth: f64,
}

/// 负尺寸翻转为正尺寸加原点平移
#[inline]
fn normalize_extent(origin: f64, extent: f64) -> (f64, f64) {
    if extent < 0.0 {
        (origin + extent, -extent)
    } else {
        (origin, extent)
    }
}

impl Bounds {
    /// 创建二维范围盒
    #[must_use]
    pub fn new_2d(
        reference: Arc<CoordinateReference>,
        x: f64,
        width: f64,
        y: f64,
        height: f64,
    ) -> Self {
        Self::new_3d(reference, x, width, y, height, 0.0, 0.0)
    }

    /// 创建三维范围盒
    #[must_use]
    pub fn new_3d(
        reference: Arc<CoordinateReference>,
        x: f64,
        width: f64,
        y: f64,
        height: f64,
        z: f64,
        depth: f64,
    ) -> Self {
        let (x, width) = normalize_extent(x, width);
        let (y, height) = normalize_extent(y, height);
        let (z, depth) = normalize_extent(z, depth);
        Self {
            reference,
            x,
            y,
            z,
            width,
            height,
            depth,
        }
    }

    /// 从两个裸坐标构造包络盒
    #[must_use]
    pub fn from_corners(reference: Arc<CoordinateReference>, a: XYZ, b: XYZ) -> Self {
        Self::new_3d(
            reference,
            a.x.min(b.x),
            (a.x - b.x).abs(),
            a.y.min(b.y),
            (a.y - b.y).abs(),
            a.z.min(b.z),
            (a.z - b.z).abs(),
        )
    }

    // ========================================================================
    // 查询
    // ========================================================================

    /// X 方向上界
    #[inline]
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Y 方向上界
    #[inline]
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Z 方向上界
    #[inline]
    #[must_use]
    pub fn max_z(&self) -> f64 {
        self.z + self.depth
    }

    /// 中心点
    #[must_use]
    pub fn focus_point(&self) -> Point {
        Point::new_3d(
            self.reference.clone(),
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
            self.z + self.depth / 2.0,
        )
    }

    /// 裸坐标二维包含测试（边界闭合）
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// 范围盒二维包含测试
    #[must_use]
    pub fn contains_2d_bounds(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.max_x() <= self.max_x()
            && other.y >= self.y
            && other.max_y() <= self.max_y()
    }

    /// 二维相交测试（共享边界也算相交）
    #[must_use]
    pub fn interacts_2d(&self, other: &Bounds) -> bool {
        self.x <= other.max_x()
            && other.x <= self.max_x()
            && self.y <= other.max_y()
            && other.y <= self.max_y()
    }

    // ========================================================================
    // 修改
    // ========================================================================

    /// 重设为给定的二维范围
    pub fn set_to_2d(&mut self, x: f64, width: f64, y: f64, height: f64) {
        let (x, width) = normalize_extent(x, width);
        let (y, height) = normalize_extent(y, height);
        self.x = x;
        self.width = width;
        self.y = y;
        self.height = height;
        self.z = 0.0;
        self.depth = 0.0;
    }

    /// 扩展为与另一范围盒的二维并集
    pub fn set_to_2d_union(&mut self, other: &Bounds) {
        let min_x = self.x.min(other.x);
        let max_x = self.max_x().max(other.max_x());
        let min_y = self.y.min(other.y);
        let max_y = self.max_y().max(other.max_y());
        self.x = min_x;
        self.width = max_x - min_x;
        self.y = min_y;
        self.height = max_y - min_y;
    }

    /// 扩展为与另一范围盒的三维并集
    pub fn set_to_3d_union(&mut self, other: &Bounds) {
        self.set_to_2d_union(other);
        let min_z = self.z.min(other.z);
        let max_z = self.max_z().max(other.max_z());
        self.z = min_z;
        self.depth = max_z - min_z;
    }

    /// 收缩为与另一范围盒的二维交集
    ///
    /// 不相交时退化为最近边界处的零尺寸范围。
    pub fn set_to_2d_intersection(&mut self, other: &Bounds) {
        let min_x = self.x.max(other.x);
        let max_x = self.max_x().min(other.max_x());
        let min_y = self.y.max(other.y);
        let max_y = self.max_y().min(other.max_y());
        self.x = min_x;
        self.width = (max_x - min_x).max(0.0);
        self.y = min_y;
        self.height = (max_y - min_y).max(0.0);
    }

    /// 扩展范围以覆盖一个二维坐标
    pub fn set_to_include_point_2d(&mut self, x: f64, y: f64) {
        let min_x = self.x.min(x);
        let max_x = self.max_x().max(x);
        let min_y = self.y.min(y);
        let max_y = self.max_y().max(y);
        self.x = min_x;
        self.width = max_x - min_x;
        self.y = min_y;
        self.height = max_y - min_y;
    }

    /// 扩展范围以覆盖一个三维坐标
    pub fn set_to_include_point_3d(&mut self, x: f64, y: f64, z: f64) {
        self.set_to_include_point_2d(x, y);
        let min_z = self.z.min(z);
        let max_z = self.max_z().max(z);
        self.z = min_z;
        self.depth = max_z - min_z;
    }

    /// 移动原点到新的二维位置（尺寸不变）
    pub fn move_2d(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// 三维平移
    pub fn translate_3d(&mut self, dx: f64, dy: f64, dz: f64) {
        self.translate_2d(dx, dy);
        self.z += dz;
    }

    /// 值相等性
    #[must_use]
    pub fn equals(&self, other: &Bounds) -> bool {
        self.reference.equals(&other.reference)
            && self.x == other.x
            && self.y == other.y
            && self.z == other.z
            && self.width == other.width
            && self.height == other.height
            && self.depth == other.depth
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::web_mercator())
    }

    #[test]
    fn test_negative_extent_normalized() {
        let b = Bounds::new_2d(cart(), 10.0, -4.0, 5.0, -2.0);
        assert_eq!((b.x, b.width), (6.0, 4.0));
        assert_eq!((b.y, b.height), (3.0, 2.0));
    }

    #[test]
    fn test_union() {
        // 设计场景: [0,10,0,5] 并 [5,10,0,10] -> x=0,w=15,y=0,h=10
        let mut a = Bounds::new_2d(cart(), 0.0, 10.0, 0.0, 5.0);
        let b = Bounds::new_2d(cart(), 5.0, 10.0, 0.0, 10.0);
        a.set_to_2d_union(&b);
        assert_eq!((a.x, a.width), (0.0, 15.0));
        assert_eq!((a.y, a.height), (0.0, 10.0));
    }

    #[test]
    fn test_intersection() {
        let mut a = Bounds::new_2d(cart(), 0.0, 4.0, 0.0, 4.0);
        let b = Bounds::new_2d(cart(), 2.0, 4.0, 2.0, 4.0);
        a.set_to_2d_intersection(&b);
        assert_eq!((a.x, a.width), (2.0, 2.0));
        assert_eq!((a.y, a.height), (2.0, 2.0));

        // 不相交退化为零尺寸
        let mut c = Bounds::new_2d(cart(), 0.0, 1.0, 0.0, 1.0);
        let d = Bounds::new_2d(cart(), 5.0, 1.0, 5.0, 1.0);
        c.set_to_2d_intersection(&d);
        assert_eq!(c.width, 0.0);
        assert_eq!(c.height, 0.0);
    }

    #[test]
    fn test_include_point() {
        let mut b = Bounds::new_2d(cart(), 0.0, 1.0, 0.0, 1.0);
        b.set_to_include_point_2d(5.0, -2.0);
        assert_eq!((b.x, b.max_x()), (0.0, 5.0));
        assert_eq!((b.y, b.max_y()), (-2.0, 1.0));
    }

    #[test]
    fn test_contains_and_interacts() {
        let a = Bounds::new_2d(cart(), 0.0, 10.0, 0.0, 10.0);
        let inner = Bounds::new_2d(cart(), 2.0, 3.0, 2.0, 3.0);
        let overlapping = Bounds::new_2d(cart(), 8.0, 5.0, 8.0, 5.0);
        let outside = Bounds::new_2d(cart(), 20.0, 1.0, 20.0, 1.0);

        assert!(a.contains_2d_bounds(&inner));
        assert!(!a.contains_2d_bounds(&overlapping));
        assert!(a.interacts_2d(&overlapping));
        assert!(!a.interacts_2d(&outside));
        assert!(a.contains_2d_coordinates(0.0, 10.0)); // 边界闭合
    }

    #[test]
    fn test_union_3d() {
        let mut a = Bounds::new_3d(cart(), 0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
        let b = Bounds::new_3d(cart(), 0.0, 1.0, 0.0, 1.0, 5.0, 2.0);
        a.set_to_3d_union(&b);
        assert_eq!((a.z, a.depth), (0.0, 7.0));
    }

    #[test]
    fn test_focus_point() {
        let b = Bounds::new_2d(cart(), 0.0, 4.0, 0.0, 2.0);
        let f = b.focus_point();
        assert_eq!((f.x(), f.y()), (2.0, 1.0));
    }
}
