//! 测地引擎
//!
//! 三种地球模型（平面笛卡尔、球面、椭球面）共享同一套运算契约：
//! 距离、初始方位角、插值（反算与正算）、面积与点线最近距离。
//! 路径类型区分恒向线与最短路径。引擎构造后无内部状态，可并发调用。
//!
//! 角度约定：大地坐标以度存取，方位角以弧度收发并归一化到 [0, 2π)。

pub mod ellipsoidal;
pub mod spherical;

use std::f64::consts::{PI, TAU};
use std::sync::Arc;

use tc_foundation::{ensure, Tolerance};

use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;
use crate::shape::{Point, Shape, XYZ};

/// 地球平均半径 (m)，IUGG 推荐值
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// 弧度制角差，归一化到 [-π, π]
#[inline]
pub(crate) fn ang_diff_rad(x: f64, y: f64) -> f64 {
    (y - x + PI).rem_euclid(TAU) - PI
}

// ============================================================================
// 路径类型与地球模型
// ============================================================================

/// 两点间路径类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// 恒向线（罗盘方位不变）
    ConstantBearing,
    /// 最短路径（大圆 / 测地线 / 平面直线）
    ShortestDistance,
}

/// 地球模型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeodesyModel {
    /// 平面欧几里得
    Cartesian,
    /// 给定半径的球面
    Spherical {
        /// 球半径 (m)
        radius: f64,
    },
    /// 参考椭球面
    Ellipsoidal {
        /// 参考椭球
        ellipsoid: Ellipsoid,
    },
}

// ============================================================================
// 引擎
// ============================================================================

/// 测地引擎：绑定一个参考系与一个地球模型
///
/// 所有接收点的运算都要求点与引擎共享参考系，不一致为契约违规。
#[derive(Debug, Clone)]
pub struct Geodesy {
    reference: Arc<CoordinateReference>,
    model: GeodesyModel,
    tolerance: Tolerance,
}

/// 按参考系选择地球模型的工厂
pub struct GeodesyFactory;

impl GeodesyFactory {
    /// 按参考系自动选择模型
    ///
    /// 笛卡尔参考系用平面模型；带椭球基准的大地参考系用椭球模型
    /// （球形基准退化为球面模型）；无基准时退回平均半径球面。
    #[must_use]
    pub fn create_geodesy(reference: &Arc<CoordinateReference>) -> Geodesy {
        let model = if !reference.is_geodetic() {
            GeodesyModel::Cartesian
        } else {
            match reference.datum {
                Some(ell) if ell.is_sphere() => GeodesyModel::Spherical { radius: ell.a },
                Some(ell) => GeodesyModel::Ellipsoidal { ellipsoid: ell },
                None => GeodesyModel::Spherical {
                    radius: EARTH_MEAN_RADIUS,
                },
            }
        };
        Geodesy {
            reference: reference.clone(),
            model,
            tolerance: Tolerance::default(),
        }
    }

    /// 平面模型，要求笛卡尔参考系
    pub fn create_cartesian_geodesy(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<Geodesy> {
        if reference.is_geodetic() {
            return Err(GeoError::programming("平面测地模型要求笛卡尔参考系"));
        }
        Ok(Geodesy {
            reference: reference.clone(),
            model: GeodesyModel::Cartesian,
            tolerance: Tolerance::default(),
        })
    }

    /// 球面模型，半径取基准椭球的平均半径或地球平均半径
    pub fn create_spherical_geodesy(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<Geodesy> {
        let radius = reference
            .datum
            .map_or(EARTH_MEAN_RADIUS, |e| e.global_mean_radius());
        Self::create_spherical_geodesy_with_radius(reference, radius)
    }

    /// 指定半径的球面模型，要求大地参考系
    pub fn create_spherical_geodesy_with_radius(
        reference: &Arc<CoordinateReference>,
        radius: f64,
    ) -> GeoResult<Geodesy> {
        if !reference.is_geodetic() {
            return Err(GeoError::programming("球面测地模型要求大地参考系"));
        }
        Ok(Geodesy {
            reference: reference.clone(),
            model: GeodesyModel::Spherical { radius },
            tolerance: Tolerance::default(),
        })
    }

    /// 椭球模型，要求带基准椭球的大地参考系
    pub fn create_ellipsoidal_geodesy(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<Geodesy> {
        if !reference.is_geodetic() {
            return Err(GeoError::programming("椭球测地模型要求大地参考系"));
        }
        let ellipsoid = reference
            .datum
            .ok_or_else(|| GeoError::programming("参考系未定义基准椭球"))?;
        Ok(Geodesy {
            reference: reference.clone(),
            model: GeodesyModel::Ellipsoidal { ellipsoid },
            tolerance: Tolerance::default(),
        })
    }
}

impl Geodesy {
    /// 绑定的参考系
    #[must_use]
    pub fn reference(&self) -> &Arc<CoordinateReference> {
        &self.reference
    }

    /// 地球模型
    #[must_use]
    pub fn model(&self) -> &GeodesyModel {
        &self.model
    }

    /// 替换迭代求解的容差配置
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn check_point(&self, point: &Point) -> GeoResult<()> {
        ensure!(
            point.reference.equals(&self.reference),
            GeoError::programming("测地运算的点参考系与引擎不一致")
        );
        Ok(())
    }

    /// 椭球反算，不收敛时退回平均半径球面近似并记录警告
    fn ellipsoidal_inverse(
        &self,
        ellipsoid: &Ellipsoid,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    ) -> (f64, f64) {
        match ellipsoidal::vincenty_inverse(ellipsoid, &self.tolerance, lon1, lat1, lon2, lat2) {
            Some((d, az1, _)) => (d, az1),
            None => {
                log::warn!(
                    "Vincenty 反算在 {} 次内未收敛，退回平均半径球面近似",
                    self.tolerance.max_iterations
                );
                let radius = ellipsoid.global_mean_radius();
                (
                    spherical::haversine(lon1, lat1, lon2, lat2, radius),
                    spherical::initial_bearing(lon1, lat1, lon2, lat2),
                )
            }
        }
    }

    // ========================================================================
    // 距离与方位角
    // ========================================================================

    /// 两点间距离 (m)
    pub fn distance(&self, p1: &Point, p2: &Point, line: LineType) -> GeoResult<f64> {
        self.check_point(p1)?;
        self.check_point(p2)?;
        Ok(match &self.model {
            GeodesyModel::Cartesian => p1.coords.distance_2d(&p2.coords),
            GeodesyModel::Spherical { radius } => {
                let (a, b, c, d) = rad4(p1, p2);
                match line {
                    LineType::ShortestDistance => spherical::haversine(a, b, c, d, *radius),
                    LineType::ConstantBearing => spherical::rhumb_distance(a, b, c, d, *radius),
                }
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let (a, b, c, d) = rad4(p1, p2);
                match line {
                    LineType::ShortestDistance => {
                        self.ellipsoidal_inverse(ellipsoid, a, b, c, d).0
                    }
                    LineType::ConstantBearing => {
                        ellipsoidal::rhumb_inverse(ellipsoid, a, b, c, d).0
                    }
                }
            }
        })
    }

    /// 三维距离：水平最短距离与高程差的勾股合成
    ///
    /// 参考系无 Z 轴时为契约违规。
    pub fn distance_3d(&self, p1: &Point, p2: &Point) -> GeoResult<f64> {
        if !self.reference.has_z_axis() {
            return Err(GeoError::programming("三维距离要求带 Z 轴的参考系"));
        }
        let horizontal = self.distance(p1, p2, LineType::ShortestDistance)?;
        let dz = p2.z() - p1.z();
        Ok((horizontal * horizontal + dz * dz).sqrt())
    }

    /// 初始方位角 (弧度，[0, 2π))
    pub fn forward_azimuth(&self, p1: &Point, p2: &Point, line: LineType) -> GeoResult<f64> {
        self.check_point(p1)?;
        self.check_point(p2)?;
        Ok(match &self.model {
            GeodesyModel::Cartesian => {
                (p2.x() - p1.x()).atan2(p2.y() - p1.y()).rem_euclid(TAU)
            }
            GeodesyModel::Spherical { .. } => {
                let (a, b, c, d) = rad4(p1, p2);
                match line {
                    LineType::ShortestDistance => spherical::initial_bearing(a, b, c, d),
                    LineType::ConstantBearing => spherical::rhumb_bearing(a, b, c, d),
                }
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let (a, b, c, d) = rad4(p1, p2);
                match line {
                    LineType::ShortestDistance => {
                        self.ellipsoidal_inverse(ellipsoid, a, b, c, d).1
                    }
                    LineType::ConstantBearing => {
                        ellipsoidal::rhumb_inverse(ellipsoid, a, b, c, d).1
                    }
                }
            }
        })
    }

    // ========================================================================
    // 插值
    // ========================================================================

    /// 沿路径按比例插值
    ///
    /// fraction 为 0 / 1 时返回端点的等值拷贝；
    /// 超出 [0, 1] 时沿同一路径模型外推，不截断。
    pub fn interpolate(
        &self,
        start: &Point,
        end: &Point,
        fraction: f64,
        line: LineType,
    ) -> GeoResult<Point> {
        self.check_point(start)?;
        self.check_point(end)?;
        if fraction == 0.0 {
            return Ok(start.clone());
        }
        if fraction == 1.0 {
            return Ok(end.clone());
        }
        let z = start.z() + fraction * (end.z() - start.z());
        let (x, y) = match &self.model {
            GeodesyModel::Cartesian => (
                start.x() + fraction * (end.x() - start.x()),
                start.y() + fraction * (end.y() - start.y()),
            ),
            GeodesyModel::Spherical { radius } => {
                let (a, b, c, d) = rad4(start, end);
                let (lon, lat) = match line {
                    LineType::ShortestDistance => {
                        spherical::interpolate_great_circle(a, b, c, d, fraction)
                    }
                    LineType::ConstantBearing => {
                        let total = spherical::rhumb_distance(a, b, c, d, *radius);
                        let az = spherical::rhumb_bearing(a, b, c, d);
                        spherical::rhumb_destination(a, b, total * fraction, az, *radius)
                    }
                };
                (lon.to_degrees(), lat.to_degrees())
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let (a, b, c, d) = rad4(start, end);
                let (lon, lat) = match line {
                    LineType::ShortestDistance => {
                        let (total, az) = self.ellipsoidal_inverse(ellipsoid, a, b, c, d);
                        ellipsoidal::vincenty_direct(
                            ellipsoid,
                            &self.tolerance,
                            a,
                            b,
                            total * fraction,
                            az,
                        )
                    }
                    LineType::ConstantBearing => {
                        let (total, az) = ellipsoidal::rhumb_inverse(ellipsoid, a, b, c, d);
                        ellipsoidal::rhumb_direct(ellipsoid, a, b, total * fraction, az)
                    }
                };
                (lon.to_degrees(), lat.to_degrees())
            }
        };
        Ok(Point::new_3d(self.reference.clone(), x, y, z))
    }

    /// 正算：从起点沿方位角 (弧度) 走给定距离 (m)
    pub fn interpolate_at(
        &self,
        point: &Point,
        distance: f64,
        azimuth: f64,
        line: LineType,
    ) -> GeoResult<Point> {
        self.check_point(point)?;
        let (x, y) = match &self.model {
            GeodesyModel::Cartesian => (
                point.x() + distance * azimuth.sin(),
                point.y() + distance * azimuth.cos(),
            ),
            GeodesyModel::Spherical { radius } => {
                let (lon, lat) = (point.x().to_radians(), point.y().to_radians());
                let (lon2, lat2) = match line {
                    LineType::ShortestDistance => {
                        spherical::destination(lon, lat, distance, azimuth, *radius)
                    }
                    LineType::ConstantBearing => {
                        spherical::rhumb_destination(lon, lat, distance, azimuth, *radius)
                    }
                };
                (lon2.to_degrees(), lat2.to_degrees())
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let (lon, lat) = (point.x().to_radians(), point.y().to_radians());
                let (lon2, lat2) = match line {
                    LineType::ShortestDistance => ellipsoidal::vincenty_direct(
                        ellipsoid,
                        &self.tolerance,
                        lon,
                        lat,
                        distance,
                        azimuth,
                    ),
                    LineType::ConstantBearing => {
                        ellipsoidal::rhumb_direct(ellipsoid, lon, lat, distance, azimuth)
                    }
                };
                (lon2.to_degrees(), lat2.to_degrees())
            }
        };
        Ok(Point::new_3d(self.reference.clone(), x, y, point.z()))
    }

    // ========================================================================
    // 面积
    // ========================================================================

    /// 形状面积 (m²，无符号)
    ///
    /// 面域形状按地球模型计算；开放曲线、点与异构列表无面积语义，
    /// 返回 `NotImplemented`。
    pub fn area(&self, shape: &Shape) -> GeoResult<f64> {
        if !shape.reference().equals(&self.reference) {
            return Err(GeoError::programming("面积运算的形状参考系与引擎不一致"));
        }
        match shape {
            Shape::Polygon(p) => Ok(self.ring_area(p.points())),
            Shape::ComplexPolygon(cp) => {
                let mut polygons = cp.polygons().iter();
                let outer = polygons
                    .next()
                    .map_or(0.0, |p| self.ring_area(p.points()));
                let holes: f64 = polygons.map(|p| self.ring_area(p.points())).sum();
                Ok((outer - holes).max(0.0))
            }
            Shape::Bounds(b) => {
                let ring = [
                    XYZ::new_2d(b.x, b.y),
                    XYZ::new_2d(b.max_x(), b.y),
                    XYZ::new_2d(b.max_x(), b.max_y()),
                    XYZ::new_2d(b.x, b.max_y()),
                ];
                Ok(self.ring_area(&ring))
            }
            Shape::Circle(c) => Ok(self.cap_area(c.radius)),
            Shape::CircleBy3Points(c) => Ok(self.cap_area(c.radius)),
            Shape::Ellipse(e) => Ok(PI * e.a * e.b),
            Shape::Sector(s) => {
                Ok(self.cap_area(s.radius) * s.sweep_angle.abs().min(360.0) / 360.0)
            }
            Shape::ArcBand(b) => {
                let band = self.cap_area(b.max_radius) - self.cap_area(b.min_radius);
                Ok(band * b.sweep_angle.abs().min(360.0) / 360.0)
            }
            other => Err(GeoError::not_implemented(format!(
                "面积: {:?}",
                other.shape_type()
            ))),
        }
    }

    /// 环面积：平面鞋带公式或球面 / 等积球梯形公式
    fn ring_area(&self, ring: &[XYZ]) -> f64 {
        if ring.len() < 3 {
            return 0.0;
        }
        match &self.model {
            GeodesyModel::Cartesian => {
                let mut sum = 0.0;
                for i in 0..ring.len() {
                    let p = &ring[i];
                    let q = &ring[(i + 1) % ring.len()];
                    sum += p.x * q.y - q.x * p.y;
                }
                (sum / 2.0).abs()
            }
            GeodesyModel::Spherical { radius } => {
                let mapped: Vec<(f64, f64)> = ring
                    .iter()
                    .map(|p| (p.x.to_radians(), p.y.to_radians()))
                    .collect();
                spherical::ring_area(&mapped, *radius)
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let mapped: Vec<(f64, f64)> = ring
                    .iter()
                    .map(|p| (p.x.to_radians(), p.y.to_radians()))
                    .collect();
                ellipsoidal::ring_area(ellipsoid, &mapped)
            }
        }
    }

    /// 半径 r (m) 的圆盘面积：平面为 πr²，球面为球冠面积
    fn cap_area(&self, radius: f64) -> f64 {
        match &self.model {
            GeodesyModel::Cartesian => PI * radius * radius,
            GeodesyModel::Spherical { radius: sphere } => {
                TAU * sphere * sphere * (1.0 - (radius / sphere).cos())
            }
            GeodesyModel::Ellipsoidal { ellipsoid } => {
                let sphere = ellipsoid.authalic_radius();
                TAU * sphere * sphere * (1.0 - (radius / sphere).cos())
            }
        }
    }

    // ========================================================================
    // 点线距离
    // ========================================================================

    /// 点到线段的最短距离 (m)，最近点写入 `result`
    ///
    /// `clip_to_segment` 为真时最近点限制在线段内，垂足越界取较近端点；
    /// 为假时允许落在延长线上。椭球模型的垂足在平均半径球面上求解，
    /// 距离再按椭球模型量取。
    pub fn shortest_distance_to_line(
        &self,
        point: &Point,
        line_p1: &Point,
        line_p2: &Point,
        clip_to_segment: bool,
        result: &mut Point,
    ) -> GeoResult<f64> {
        self.check_point(point)?;
        self.check_point(line_p1)?;
        self.check_point(line_p2)?;
        self.check_point(result)?;

        match &self.model {
            GeodesyModel::Cartesian => {
                let (ax, ay) = (line_p1.x(), line_p1.y());
                let (bx, by) = (line_p2.x(), line_p2.y());
                let (dx, dy) = (bx - ax, by - ay);
                let len2 = dx * dx + dy * dy;
                let mut t = if len2 > 0.0 {
                    ((point.x() - ax) * dx + (point.y() - ay) * dy) / len2
                } else {
                    0.0
                };
                if clip_to_segment {
                    t = t.clamp(0.0, 1.0);
                }
                let (fx, fy) = (ax + t * dx, ay + t * dy);
                result.move_2d(fx, fy);
                let (ex, ey) = (point.x() - fx, point.y() - fy);
                Ok((ex * ex + ey * ey).sqrt())
            }
            GeodesyModel::Spherical { .. } | GeodesyModel::Ellipsoidal { .. } => {
                let (lon_p, lat_p) = (point.x().to_radians(), point.y().to_radians());
                let (lon_a, lat_a) = (line_p1.x().to_radians(), line_p1.y().to_radians());
                let (lon_b, lat_b) = (line_p2.x().to_radians(), line_p2.y().to_radians());
                let (lon_f, lat_f) = spherical::closest_point_on_arc(
                    lon_p,
                    lat_p,
                    lon_a,
                    lat_a,
                    lon_b,
                    lat_b,
                    clip_to_segment,
                );
                result.move_2d(lon_f.to_degrees(), lat_f.to_degrees());
                self.distance(point, result, LineType::ShortestDistance)
            }
        }
    }
}

/// 两点的经纬度，弧度
#[inline]
fn rad4(p1: &Point, p2: &Point) -> (f64, f64, f64, f64) {
    (
        p1.x().to_radians(),
        p1.y().to_radians(),
        p2.x().to_radians(),
        p2.y().to_radians(),
    )
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{create_polygon, create_polyline, Shape};

    fn wgs84() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::wgs84())
    }

    fn cart() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::web_mercator())
    }

    #[test]
    fn test_factory_model_selection() {
        assert!(matches!(
            GeodesyFactory::create_geodesy(&wgs84()).model(),
            GeodesyModel::Ellipsoidal { .. }
        ));
        assert!(matches!(
            GeodesyFactory::create_geodesy(&cart()).model(),
            GeodesyModel::Cartesian
        ));
        assert!(GeodesyFactory::create_cartesian_geodesy(&wgs84()).is_err());
        assert!(GeodesyFactory::create_spherical_geodesy(&cart()).is_err());
    }

    #[test]
    fn test_ellipsoidal_quarter_equator() {
        // 赤道上 (0,0) -> (90E,0)：约 10 018 754 m，方位角 90 度
        let r = wgs84();
        let g = GeodesyFactory::create_ellipsoidal_geodesy(&r).unwrap();
        let p1 = Point::new_2d(r.clone(), 0.0, 0.0);
        let p2 = Point::new_2d(r.clone(), 90.0, 0.0);
        let d = g.distance(&p1, &p2, LineType::ShortestDistance).unwrap();
        assert!((d - 10_018_754.17).abs() < 10.0, "d = {d}");

        let az = g
            .forward_azimuth(&p1, &p2, LineType::ShortestDistance)
            .unwrap();
        assert!((az - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_distance_symmetry_and_identity() {
        let r = wgs84();
        let g = GeodesyFactory::create_geodesy(&r);
        let p1 = Point::new_2d(r.clone(), 116.4, 39.9);
        let p2 = Point::new_2d(r.clone(), 121.5, 31.2);
        for line in [LineType::ShortestDistance, LineType::ConstantBearing] {
            let ab = g.distance(&p1, &p2, line).unwrap();
            let ba = g.distance(&p2, &p1, line).unwrap();
            assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
            assert_eq!(g.distance(&p1, &p1, line).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_interpolate_endpoints_exact() {
        let r = wgs84();
        let g = GeodesyFactory::create_geodesy(&r);
        let p1 = Point::new_2d(r.clone(), 10.0, 20.0);
        let p2 = Point::new_2d(r.clone(), 30.0, 40.0);
        for line in [LineType::ShortestDistance, LineType::ConstantBearing] {
            assert!(g.interpolate(&p1, &p2, 0.0, line).unwrap().equals(&p1));
            assert!(g.interpolate(&p1, &p2, 1.0, line).unwrap().equals(&p2));
        }
    }

    #[test]
    fn test_interpolate_midpoint_on_path() {
        let r = wgs84();
        let g = GeodesyFactory::create_geodesy(&r);
        let p1 = Point::new_2d(r.clone(), 0.0, 0.0);
        let p2 = Point::new_2d(r.clone(), 90.0, 0.0);
        let mid = g
            .interpolate(&p1, &p2, 0.5, LineType::ShortestDistance)
            .unwrap();
        assert!((mid.x() - 45.0).abs() < 1e-9);
        assert!(mid.y().abs() < 1e-9);

        let d1 = g.distance(&p1, &mid, LineType::ShortestDistance).unwrap();
        let d2 = g.distance(&mid, &p2, LineType::ShortestDistance).unwrap();
        assert!((d1 - d2).abs() < 1e-3);
    }

    #[test]
    fn test_interpolate_at_direct_inverse_consistency() {
        let r = wgs84();
        let g = GeodesyFactory::create_geodesy(&r);
        let p = Point::new_2d(r.clone(), 121.5, 31.2);
        let q = g
            .interpolate_at(&p, 250_000.0, 0.7, LineType::ShortestDistance)
            .unwrap();
        let d = g.distance(&p, &q, LineType::ShortestDistance).unwrap();
        let az = g.forward_azimuth(&p, &q, LineType::ShortestDistance).unwrap();
        assert!((d - 250_000.0).abs() < 1e-3);
        assert!((az - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_cartesian_operations() {
        let r = cart();
        let g = GeodesyFactory::create_geodesy(&r);
        let p1 = Point::new_2d(r.clone(), 0.0, 0.0);
        let p2 = Point::new_2d(r.clone(), 3.0, 4.0);
        assert_eq!(
            g.distance(&p1, &p2, LineType::ShortestDistance).unwrap(),
            5.0
        );
        // 正东
        let east = Point::new_2d(r.clone(), 10.0, 0.0);
        let az = g
            .forward_azimuth(&p1, &east, LineType::ShortestDistance)
            .unwrap();
        assert!((az - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_cartesian_area_square() {
        let r = cart();
        let g = GeodesyFactory::create_geodesy(&r);
        let square = Shape::Polygon(create_polygon(
            &r,
            vec![
                XYZ::new_2d(0.0, 0.0),
                XYZ::new_2d(4.0, 0.0),
                XYZ::new_2d(4.0, 4.0),
                XYZ::new_2d(0.0, 4.0),
            ],
        ));
        assert_eq!(g.area(&square).unwrap(), 16.0);
    }

    #[test]
    fn test_area_not_implemented_for_open_curves() {
        let r = cart();
        let g = GeodesyFactory::create_geodesy(&r);
        let line = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(1.0, 1.0)],
        ));
        assert!(matches!(
            g.area(&line),
            Err(GeoError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_shortest_distance_to_line_cartesian() {
        let r = cart();
        let g = GeodesyFactory::create_geodesy(&r);
        let a = Point::new_2d(r.clone(), 0.0, 0.0);
        let b = Point::new_2d(r.clone(), 10.0, 0.0);
        let p = Point::new_2d(r.clone(), 5.0, 3.0);
        let mut foot = Point::new_2d(r.clone(), 0.0, 0.0);

        let d = g
            .shortest_distance_to_line(&p, &a, &b, true, &mut foot)
            .unwrap();
        assert_eq!(d, 3.0);
        assert_eq!((foot.x(), foot.y()), (5.0, 0.0));

        // 垂足越界，夹到端点
        let q = Point::new_2d(r.clone(), 14.0, 3.0);
        let d = g
            .shortest_distance_to_line(&q, &a, &b, true, &mut foot)
            .unwrap();
        assert_eq!((foot.x(), foot.y()), (10.0, 0.0));
        assert_eq!(d, 5.0);

        // 不夹取时垂足落在延长线上
        let d = g
            .shortest_distance_to_line(&q, &a, &b, false, &mut foot)
            .unwrap();
        assert_eq!((foot.x(), foot.y()), (14.0, 0.0));
        assert_eq!(d, 3.0);
    }

    #[test]
    fn test_reference_mismatch_rejected() {
        let r = wgs84();
        let g = GeodesyFactory::create_geodesy(&r);
        let alien = Point::new_2d(cart(), 0.0, 0.0);
        let p = Point::new_2d(r.clone(), 0.0, 0.0);
        assert!(matches!(
            g.distance(&p, &alien, LineType::ShortestDistance),
            Err(GeoError::Programming { .. })
        ));
    }

    #[test]
    fn test_distance_3d_requires_z_axis() {
        let r2 = wgs84();
        let g2 = GeodesyFactory::create_geodesy(&r2);
        let p = Point::new_2d(r2.clone(), 0.0, 0.0);
        assert!(g2.distance_3d(&p, &p).is_err());

        let r3 = Arc::new(CoordinateReference::wgs84_3d());
        let g3 = GeodesyFactory::create_geodesy(&r3);
        let a = Point::new_3d(r3.clone(), 0.0, 0.0, 0.0);
        let b = Point::new_3d(r3.clone(), 0.0, 0.0, 1000.0);
        assert!((g3.distance_3d(&a, &b).unwrap() - 1000.0).abs() < 1e-9);
    }
}
