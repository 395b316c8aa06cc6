//! 圆锥曲线形状：圆、椭圆、弧、扇形、环带
//!
//! 半径与轴长一律以米计；方位角以度计，从正北顺时针。
//! 大地参考系下的解析几何（包含测试、三点定圆）在圆心附近的
//! 等距圆柱局部平面内进行，适用于局部尺度的形状。

use super::{local_scales, Bounds, Point, XYZ};
use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;

// ============================================================================
// 局部平面辅助
// ============================================================================

/// 坐标 -> 以 origin 为原点的局部平面 (米)
fn to_local(reference: &CoordinateReference, origin: &XYZ, p: &XYZ) -> (f64, f64) {
    let (kx, ky) = local_scales(reference, origin.y);
    ((p.x - origin.x) * kx, (p.y - origin.y) * ky)
}

/// 局部平面 (米) -> 坐标
fn from_local(reference: &CoordinateReference, origin: &XYZ, lx: f64, ly: f64) -> XYZ {
    let (kx, ky) = local_scales(reference, origin.y);
    XYZ::new_2d(origin.x + lx / kx, origin.y + ly / ky)
}

/// 局部偏移的方位角 (度，正北顺时针，[0, 360))
fn azimuth_of(lx: f64, ly: f64) -> f64 {
    let az = lx.atan2(ly).to_degrees();
    (az + 360.0) % 360.0
}

/// 方位角是否落在扫掠范围内
///
/// `sweep` 为正表示顺时针扫掠，为负表示逆时针。
fn azimuth_in_sweep(azimuth: f64, start: f64, sweep: f64) -> bool {
    if sweep >= 0.0 {
        (azimuth - start).rem_euclid(360.0) <= sweep
    } else {
        (start - azimuth).rem_euclid(360.0) <= -sweep
    }
}

/// 三点的外心（局部平面），共线返回 None
fn circumcenter_local(
    (ax, ay): (f64, f64),
    (bx, by): (f64, f64),
    (cx, cy): (f64, f64),
) -> Option<(f64, f64)> {
    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < 1e-9 {
        return None;
    }
    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
    let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
    Some((ux, uy))
}

/// 以圆心为原点、半径集合构造包络盒
fn radial_bounds(
    reference: &std::sync::Arc<CoordinateReference>,
    center: &XYZ,
    extent_x: f64,
    extent_y: f64,
) -> Bounds {
    let (kx, ky) = local_scales(reference, center.y);
    Bounds::new_2d(
        reference.clone(),
        center.x - extent_x / kx,
        2.0 * extent_x / kx,
        center.y - extent_y / ky,
        2.0 * extent_y / ky,
    )
}

/// 弧线的包络盒：端点加扫掠经过的基准方位角
fn arc_bounds(
    reference: &std::sync::Arc<CoordinateReference>,
    center: &XYZ,
    radius: f64,
    start_azimuth: f64,
    sweep_angle: f64,
    include_center: bool,
) -> Bounds {
    let point_at = |az: f64| {
        let az_rad = az.to_radians();
        from_local(
            reference,
            center,
            radius * az_rad.sin(),
            radius * az_rad.cos(),
        )
    };

    let start = point_at(start_azimuth);
    let mut bounds = Bounds::from_corners(reference.clone(), start, start);
    let end = point_at(start_azimuth + sweep_angle);
    bounds.set_to_include_point_2d(end.x, end.y);

    // 扫掠经过的四个基准方位角处是极值点
    for cardinal in [0.0, 90.0, 180.0, 270.0] {
        if azimuth_in_sweep(cardinal, start_azimuth, sweep_angle) {
            let p = point_at(cardinal);
            bounds.set_to_include_point_2d(p.x, p.y);
        }
    }
    if include_center {
        bounds.set_to_include_point_2d(center.x, center.y);
    }
    bounds
}

// ============================================================================
// 圆
// ============================================================================

/// 圆（圆心加半径）
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 圆心
    pub center: XYZ,
    /// 半径 (米)
    pub radius: f64,
}

impl Circle {
    /// 创建圆
    #[must_use]
    pub fn new(reference: std::sync::Arc<CoordinateReference>, center: XYZ, radius: f64) -> Self {
        Self {
            reference,
            center,
            radius: radius.abs(),
        }
    }

    /// 圆心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 包络盒
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        radial_bounds(&self.reference, &self.center, self.radius, self.radius)
    }

    /// 圆盘包含测试（边界闭合）
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        let (lx, ly) = to_local(&self.reference, &self.center, &XYZ::new_2d(x, y));
        lx * lx + ly * ly <= self.radius * self.radius
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 三点定圆
// ============================================================================

/// 由圆周上三点定义的圆
///
/// 保留三个定义点，圆心与半径在构造时派生。
#[derive(Debug, Clone, PartialEq)]
pub struct CircleBy3Points {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 第一定义点
    pub p1: XYZ,
    /// 第二定义点
    pub p2: XYZ,
    /// 第三定义点
    pub p3: XYZ,
    /// 派生圆心
    pub center: XYZ,
    /// 派生半径 (米)
    pub radius: f64,
}

impl CircleBy3Points {
    /// 由三个圆周点创建圆
    ///
    /// 三点共线为契约违规。
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        p1: XYZ,
        p2: XYZ,
        p3: XYZ,
    ) -> GeoResult<Self> {
        let (center, radius) = derive_circle(&reference, &p1, &p2, &p3)?;
        Ok(Self {
            reference,
            p1,
            p2,
            p3,
            center,
            radius,
        })
    }

    /// 圆心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 包络盒
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        radial_bounds(&self.reference, &self.center, self.radius, self.radius)
    }

    /// 圆盘包含测试
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        let (lx, ly) = to_local(&self.reference, &self.center, &XYZ::new_2d(x, y));
        lx * lx + ly * ly <= self.radius * self.radius
    }

    /// 二维平移（定义点与派生圆心一起移动）
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        for p in [&mut self.p1, &mut self.p2, &mut self.p3, &mut self.center] {
            p.x += dx;
            p.y += dy;
        }
    }
}

/// 三点外接圆的圆心与半径
fn derive_circle(
    reference: &CoordinateReference,
    p1: &XYZ,
    p2: &XYZ,
    p3: &XYZ,
) -> GeoResult<(XYZ, f64)> {
    // 以三点形心为局部原点，避免大坐标下的精度损失
    let origin = XYZ::new_2d(
        (p1.x + p2.x + p3.x) / 3.0,
        (p1.y + p2.y + p3.y) / 3.0,
    );
    let a = to_local(reference, &origin, p1);
    let b = to_local(reference, &origin, p2);
    let c = to_local(reference, &origin, p3);

    let (ux, uy) = circumcenter_local(a, b, c)
        .ok_or_else(|| GeoError::programming("三点共线，无法确定圆"))?;
    let radius = ((a.0 - ux).powi(2) + (a.1 - uy).powi(2)).sqrt();
    Ok((from_local(reference, &origin, ux, uy), radius))
}

// ============================================================================
// 椭圆
// ============================================================================

/// 椭圆
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 中心
    pub center: XYZ,
    /// 长半轴 (米)
    pub a: f64,
    /// 短半轴 (米)
    pub b: f64,
    /// 长半轴方位角 (度，正北顺时针)
    pub rotation_azimuth: f64,
}

impl Ellipse {
    /// 创建椭圆
    #[must_use]
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        center: XYZ,
        a: f64,
        b: f64,
        rotation_azimuth: f64,
    ) -> Self {
        Self {
            reference,
            center,
            a: a.abs(),
            b: b.abs(),
            rotation_azimuth,
        }
    }

    /// 中心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 旋转椭圆的精确轴向范围
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let rot = self.rotation_azimuth.to_radians();
        let (sin_r, cos_r) = rot.sin_cos();
        // 长半轴沿方位角 rot：东分量 sin，北分量 cos
        let extent_x = ((self.a * sin_r).powi(2) + (self.b * cos_r).powi(2)).sqrt();
        let extent_y = ((self.a * cos_r).powi(2) + (self.b * sin_r).powi(2)).sqrt();
        radial_bounds(&self.reference, &self.center, extent_x, extent_y)
    }

    /// 椭圆盘包含测试
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        if self.a == 0.0 || self.b == 0.0 {
            return false;
        }
        let (lx, ly) = to_local(&self.reference, &self.center, &XYZ::new_2d(x, y));
        let rot = self.rotation_azimuth.to_radians();
        let (sin_r, cos_r) = rot.sin_cos();
        // 长半轴方向分量与垂直分量
        let u = lx * sin_r + ly * cos_r;
        let v = lx * cos_r - ly * sin_r;
        (u / self.a).powi(2) + (v / self.b).powi(2) <= 1.0
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 椭圆弧
// ============================================================================

/// 椭圆弧（开放曲线）
///
/// `start_azimuth` 与扫掠角按圆弧参数角计，从正北顺时针，
/// 再叠加椭圆自身的旋转方位角。
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 中心
    pub center: XYZ,
    /// 长半轴 (米)
    pub a: f64,
    /// 短半轴 (米)
    pub b: f64,
    /// 长半轴方位角 (度)
    pub rotation_azimuth: f64,
    /// 起始参数角 (度)
    pub start_azimuth: f64,
    /// 扫掠角 (度，正为顺时针)
    pub sweep_angle: f64,
}

impl Arc {
    /// 创建椭圆弧
    #[must_use]
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        center: XYZ,
        a: f64,
        b: f64,
        rotation_azimuth: f64,
        start_azimuth: f64,
        sweep_angle: f64,
    ) -> Self {
        Self {
            reference,
            center,
            a: a.abs(),
            b: b.abs(),
            rotation_azimuth,
            start_azimuth,
            sweep_angle,
        }
    }

    /// 中心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 包络盒（取整椭圆范围，保守覆盖弧段）
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Ellipse::new(
            self.reference.clone(),
            self.center,
            self.a,
            self.b,
            self.rotation_azimuth,
        )
        .bounds()
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 圆弧
// ============================================================================

/// 圆弧（开放曲线）
#[derive(Debug, Clone, PartialEq)]
pub struct CircularArc {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 圆心
    pub center: XYZ,
    /// 半径 (米)
    pub radius: f64,
    /// 起始方位角 (度)
    pub start_azimuth: f64,
    /// 扫掠角 (度，正为顺时针)
    pub sweep_angle: f64,
}

impl CircularArc {
    /// 以圆心形式创建圆弧
    #[must_use]
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        center: XYZ,
        radius: f64,
        start_azimuth: f64,
        sweep_angle: f64,
    ) -> Self {
        Self {
            reference,
            center,
            radius: radius.abs(),
            start_azimuth,
            sweep_angle,
        }
    }

    /// 由弧上三点（起点、弧中点、终点）创建圆弧
    ///
    /// 三点共线为契约违规。
    pub fn by_3_points(
        reference: std::sync::Arc<CoordinateReference>,
        start: XYZ,
        intermediate: XYZ,
        end: XYZ,
    ) -> GeoResult<Self> {
        let (center, radius) = derive_circle(&reference, &start, &intermediate, &end)?;

        let az = |p: &XYZ| {
            let (lx, ly) = to_local(&reference, &center, p);
            azimuth_of(lx, ly)
        };
        let az_start = az(&start);
        let az_mid = az(&intermediate);
        let az_end = az(&end);

        // 扫掠方向取经过中间点的一侧
        let cw_mid = (az_mid - az_start).rem_euclid(360.0);
        let cw_end = (az_end - az_start).rem_euclid(360.0);
        let sweep = if cw_mid <= cw_end {
            cw_end
        } else {
            cw_end - 360.0
        };

        Ok(Self {
            reference,
            center,
            radius,
            start_azimuth: az_start,
            sweep_angle: sweep,
        })
    }

    /// 由弦与凸度创建圆弧
    ///
    /// `bulge` 为弧中点到弦中点的距离除以半弦长；
    /// 正值凸向弦前进方向的左侧。零凸度退化为直线，为契约违规。
    pub fn by_bulge(
        reference: std::sync::Arc<CoordinateReference>,
        start: XYZ,
        end: XYZ,
        bulge: f64,
    ) -> GeoResult<Self> {
        if bulge == 0.0 {
            return Err(GeoError::programming("凸度为零的圆弧退化为直线"));
        }
        let mid = XYZ::new_2d((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        let (ex, ey) = to_local(&reference, &mid, &end);
        let half_chord = (ex * ex + ey * ey).sqrt();
        if half_chord < 1e-12 {
            return Err(GeoError::programming("弦长为零的圆弧无定义"));
        }
        // 弦方向的左法向
        let (nx, ny) = (-ey / half_chord, ex / half_chord);
        let sagitta = bulge * half_chord;
        let arc_mid = from_local(&reference, &mid, nx * sagitta, ny * sagitta);
        Self::by_3_points(reference, start, arc_mid, end)
    }

    /// 圆心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 弧段包络盒
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        arc_bounds(
            &self.reference,
            &self.center,
            self.radius,
            self.start_azimuth,
            self.sweep_angle,
            false,
        )
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 环形扇带
// ============================================================================

/// 环形扇带（内外半径之间的扫掠区域）
#[derive(Debug, Clone, PartialEq)]
pub struct ArcBand {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 圆心
    pub center: XYZ,
    /// 内半径 (米)
    pub min_radius: f64,
    /// 外半径 (米)
    pub max_radius: f64,
    /// 起始方位角 (度)
    pub start_azimuth: f64,
    /// 扫掠角 (度，正为顺时针)
    pub sweep_angle: f64,
}

impl ArcBand {
    /// 创建环形扇带（内外半径自动排序）
    #[must_use]
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        center: XYZ,
        min_radius: f64,
        max_radius: f64,
        start_azimuth: f64,
        sweep_angle: f64,
    ) -> Self {
        let (lo, hi) = (min_radius.abs(), max_radius.abs());
        Self {
            reference,
            center,
            min_radius: lo.min(hi),
            max_radius: lo.max(hi),
            start_azimuth,
            sweep_angle,
        }
    }

    /// 圆心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 包络盒（外弧加内弧端点）
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let mut bounds = arc_bounds(
            &self.reference,
            &self.center,
            self.max_radius,
            self.start_azimuth,
            self.sweep_angle,
            false,
        );
        let inner = arc_bounds(
            &self.reference,
            &self.center,
            self.min_radius,
            self.start_azimuth,
            self.sweep_angle,
            false,
        );
        bounds.set_to_2d_union(&inner);
        bounds
    }

    /// 区域包含测试
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        let (lx, ly) = to_local(&self.reference, &self.center, &XYZ::new_2d(x, y));
        let dist = (lx * lx + ly * ly).sqrt();
        if dist < self.min_radius || dist > self.max_radius {
            return false;
        }
        azimuth_in_sweep(azimuth_of(lx, ly), self.start_azimuth, self.sweep_angle)
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 扇形
// ============================================================================

/// 扇形（圆心到弧段的扫掠区域）
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    /// 坐标参考系
    pub reference: std::sync::Arc<CoordinateReference>,
    /// 圆心
    pub center: XYZ,
    /// 半径 (米)
    pub radius: f64,
    /// 起始方位角 (度)
    pub start_azimuth: f64,
    /// 扫掠角 (度，正为顺时针)
    pub sweep_angle: f64,
}

impl Sector {
    /// 创建扇形
    #[must_use]
    pub fn new(
        reference: std::sync::Arc<CoordinateReference>,
        center: XYZ,
        radius: f64,
        start_azimuth: f64,
        sweep_angle: f64,
    ) -> Self {
        Self {
            reference,
            center,
            radius: radius.abs(),
            start_azimuth,
            sweep_angle,
        }
    }

    /// 圆心点
    #[must_use]
    pub fn center_point(&self) -> Point {
        Point::new_2d(self.reference.clone(), self.center.x, self.center.y)
    }

    /// 包络盒（含圆心）
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        arc_bounds(
            &self.reference,
            &self.center,
            self.radius,
            self.start_azimuth,
            self.sweep_angle,
            true,
        )
    }

    /// 区域包含测试
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        let (lx, ly) = to_local(&self.reference, &self.center, &XYZ::new_2d(x, y));
        let dist2 = lx * lx + ly * ly;
        if dist2 > self.radius * self.radius {
            return false;
        }
        if dist2 == 0.0 {
            return true;
        }
        azimuth_in_sweep(azimuth_of(lx, ly), self.start_azimuth, self.sweep_angle)
    }

    /// 二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        self.center.x += dx;
        self.center.y += dy;
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cart() -> std::sync::Arc<CoordinateReference> {
        std::sync::Arc::new(CoordinateReference::web_mercator())
    }

    fn wgs84() -> std::sync::Arc<CoordinateReference> {
        std::sync::Arc::new(CoordinateReference::wgs84())
    }

    #[test]
    fn test_circle_cartesian() {
        let c = Circle::new(cart(), XYZ::new_2d(0.0, 0.0), 100.0);
        assert!(c.contains_2d_coordinates(60.0, 80.0)); // 恰在圆周
        assert!(!c.contains_2d_coordinates(80.0, 80.0));

        let b = c.bounds();
        assert_eq!((b.x, b.width), (-100.0, 200.0));
    }

    #[test]
    fn test_circle_geodetic_scales() {
        // 赤道上 111 km 半径的圆应覆盖约 1 度经度
        let c = Circle::new(wgs84(), XYZ::new_2d(0.0, 0.0), 111_195.0);
        assert!(c.contains_2d_coordinates(0.9, 0.0));
        assert!(!c.contains_2d_coordinates(1.2, 0.0));

        let b = c.bounds();
        assert!((b.width - 2.0).abs() < 0.05, "width = {}", b.width);
    }

    #[test]
    fn test_circle_by_3_points() {
        let c = CircleBy3Points::new(
            cart(),
            XYZ::new_2d(100.0, 0.0),
            XYZ::new_2d(0.0, 100.0),
            XYZ::new_2d(-100.0, 0.0),
        )
        .unwrap();
        assert!((c.center.x).abs() < 1e-6);
        assert!((c.center.y).abs() < 1e-6);
        assert!((c.radius - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_circle_by_3_points_collinear() {
        let result = CircleBy3Points::new(
            cart(),
            XYZ::new_2d(0.0, 0.0),
            XYZ::new_2d(1.0, 1.0),
            XYZ::new_2d(2.0, 2.0),
        );
        assert!(matches!(result, Err(GeoError::Programming { .. })));
    }

    #[test]
    fn test_ellipse_rotation() {
        // 长轴朝东（方位角 90 度）
        let e = Ellipse::new(cart(), XYZ::new_2d(0.0, 0.0), 200.0, 100.0, 90.0);
        assert!(e.contains_2d_coordinates(190.0, 0.0));
        assert!(!e.contains_2d_coordinates(0.0, 190.0));
        assert!(e.contains_2d_coordinates(0.0, 90.0));

        let b = e.bounds();
        assert!((b.width - 400.0).abs() < 1e-6);
        assert!((b.height - 200.0).abs() < 1e-6);
    }

    #[test]
    fn test_circular_arc_by_3_points() {
        // 上半圆：东 -> 北 -> 西
        let arc = CircularArc::by_3_points(
            cart(),
            XYZ::new_2d(100.0, 0.0),
            XYZ::new_2d(0.0, 100.0),
            XYZ::new_2d(-100.0, 0.0),
        )
        .unwrap();
        assert!((arc.radius - 100.0).abs() < 1e-6);
        assert!((arc.start_azimuth - 90.0).abs() < 1e-6);
        // 从东经北到西为逆时针扫掠 180 度
        assert!((arc.sweep_angle + 180.0).abs() < 1e-6);

        let b = arc.bounds();
        // 包含北极点，不越过南侧
        assert!((b.max_y() - 100.0).abs() < 1e-6);
        assert!(b.y >= -1e-6);
    }

    #[test]
    fn test_circular_arc_by_bulge() {
        // 半圆凸度 1：起点东，终点西，弧顶在北
        let arc = CircularArc::by_bulge(
            cart(),
            XYZ::new_2d(100.0, 0.0),
            XYZ::new_2d(-100.0, 0.0),
            1.0,
        )
        .unwrap();
        assert!((arc.radius - 100.0).abs() < 1e-6);
        assert!((arc.center.x).abs() < 1e-6);
        assert!((arc.center.y).abs() < 1e-6);

        assert!(CircularArc::by_bulge(
            cart(),
            XYZ::new_2d(0.0, 0.0),
            XYZ::new_2d(1.0, 0.0),
            0.0
        )
        .is_err());
    }

    #[test]
    fn test_sector() {
        // 东北象限扇形
        let s = Sector::new(cart(), XYZ::new_2d(0.0, 0.0), 100.0, 0.0, 90.0);
        assert!(s.contains_2d_coordinates(50.0, 50.0));
        assert!(!s.contains_2d_coordinates(-50.0, 50.0));
        assert!(s.contains_2d_coordinates(0.0, 0.0)); // 圆心
        assert!(!s.contains_2d_coordinates(80.0, 80.0)); // 超半径

        let b = s.bounds();
        assert!(b.contains_2d_coordinates(0.0, 0.0));
        assert!((b.max_x() - 100.0).abs() < 1e-6);
        assert!((b.max_y() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_arc_band() {
        let band = ArcBand::new(cart(), XYZ::new_2d(0.0, 0.0), 50.0, 100.0, 0.0, 360.0);
        assert!(band.contains_2d_coordinates(75.0, 0.0));
        assert!(!band.contains_2d_coordinates(25.0, 0.0));
        assert!(!band.contains_2d_coordinates(150.0, 0.0));

        // 内外半径自动排序
        let swapped = ArcBand::new(cart(), XYZ::new_2d(0.0, 0.0), 100.0, 50.0, 0.0, 360.0);
        assert_eq!(swapped.min_radius, 50.0);
        assert_eq!(swapped.max_radius, 100.0);
    }

    #[test]
    fn test_negative_sweep() {
        // 从正北逆时针 90 度：覆盖西北象限
        let s = Sector::new(cart(), XYZ::new_2d(0.0, 0.0), 100.0, 0.0, -90.0);
        assert!(s.contains_2d_coordinates(-50.0, 50.0));
        assert!(!s.contains_2d_coordinates(50.0, 50.0));
    }
}
