//! 坐标变换引擎
//!
//! 变换绑定一对有序参考系，经由大地坐标 (经度, 纬度, 椭球高)
//! 中间表示串联两侧：投影面经逆投影抵达中间表示，地心直角坐标经
//! 闭式换算抵达，基准椭球不同则再经地心坐标中转。
//! 目的参考系带环绕轴时，输出分量被归一化进该轴声明的范围。
//!
//! 工程（无基准）参考系只支持单位换算式的互转，与大地世界之间
//! 没有定义的变换路径。

use std::sync::Arc;

use crate::axis::AxisDirection;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use crate::projection::{geocentric, GridProjection};
use crate::reference::CoordinateReference;
use crate::shape::{Bounds, Point};

// ============================================================================
// 单侧描述
// ============================================================================

/// 参考系在变换管线中的一侧
#[derive(Debug, Clone)]
enum Side {
    /// 大地经纬度（度），可带椭球高
    Geodetic(Ellipsoid),
    /// 投影平面（米）；datum 为参考系的基准椭球，
    /// 可与投影公式内部使用的椭球不同（如 Web Mercator 的工作球体）
    Projected {
        projection: GridProjection,
        datum: Ellipsoid,
    },
    /// 地心直角坐标（米）
    Geocentric(Ellipsoid),
    /// 工程平面：仅记录到米的换算系数
    Engineering { x_to_m: f64, y_to_m: f64 },
}

impl Side {
    fn of(reference: &CoordinateReference) -> Side {
        if reference.is_geodetic() {
            return Side::Geodetic(reference.datum.unwrap_or(Ellipsoid::WGS84));
        }
        if let Some(projection) = &reference.projection {
            return Side::Projected {
                projection: projection.clone(),
                datum: reference.datum.unwrap_or(Ellipsoid::WGS84),
            };
        }
        let is_geocentric = reference
            .axes
            .first()
            .is_some_and(|a| a.direction == AxisDirection::GeocentricX);
        if is_geocentric {
            return Side::Geocentric(reference.datum.unwrap_or(Ellipsoid::WGS84));
        }
        let scale = |index: usize| {
            reference
                .axes
                .get(index)
                .map_or(1.0, |a| a.unit.conversion_multiplier)
        };
        Side::Engineering {
            x_to_m: scale(0),
            y_to_m: scale(1),
        }
    }

    /// 一侧的基准椭球（工程侧无椭球）
    fn datum(&self) -> Option<Ellipsoid> {
        match self {
            Side::Geodetic(e) | Side::Geocentric(e) => Some(*e),
            Side::Projected { datum, .. } => Some(*datum),
            Side::Engineering { .. } => None,
        }
    }

    /// 原生坐标 -> 本侧椭球上的大地坐标 (度, 度, 米)
    fn to_geodetic(&self, x: f64, y: f64, z: f64) -> GeoResult<(f64, f64, f64)> {
        match self {
            Side::Geodetic(_) => Ok((x, y, z)),
            Side::Projected { projection, .. } => {
                let (lon, lat) = projection.inverse(x, y)?;
                Ok((lon, lat, z))
            }
            Side::Geocentric(ellipsoid) => {
                Ok(geocentric::geocentric_to_geodetic(ellipsoid, x, y, z))
            }
            Side::Engineering { .. } => Err(GeoError::not_implemented(
                "工程参考系到大地坐标的变换",
            )),
        }
    }

    /// 本侧椭球上的大地坐标 -> 原生坐标
    fn from_geodetic(&self, lon: f64, lat: f64, height: f64) -> GeoResult<(f64, f64, f64)> {
        match self {
            Side::Geodetic(_) => Ok((lon, lat, height)),
            Side::Projected { projection, .. } => {
                let (x, y) = projection.forward(lon, lat)?;
                Ok((x, y, height))
            }
            Side::Geocentric(ellipsoid) => {
                Ok(geocentric::geodetic_to_geocentric(ellipsoid, lon, lat, height))
            }
            Side::Engineering { .. } => Err(GeoError::not_implemented(
                "大地坐标到工程参考系的变换",
            )),
        }
    }
}

// ============================================================================
// 变换
// ============================================================================

/// 有序参考系对上的坐标变换
///
/// 构造后无内部状态，可并发应用于多个点。
#[derive(Debug, Clone)]
pub struct Transformation {
    source: Arc<CoordinateReference>,
    destination: Arc<CoordinateReference>,
    identity: bool,
    source_side: Side,
    destination_side: Side,
}

/// 变换工厂
pub struct TransformationFactory;

impl TransformationFactory {
    /// 是否需要变换：源与目的参考系相等时返回 false
    #[must_use]
    pub fn is_transformation_required(
        source: &CoordinateReference,
        destination: &CoordinateReference,
    ) -> bool {
        !source.equals(destination)
    }

    /// 创建绑定有序参考系对的变换
    ///
    /// 工程参考系与大地世界之间没有定义的路径，创建即失败。
    pub fn create_transformation(
        source: &Arc<CoordinateReference>,
        destination: &Arc<CoordinateReference>,
    ) -> GeoResult<Transformation> {
        let source_side = Side::of(source);
        let destination_side = Side::of(destination);
        let identity = source.equals(destination);

        if !identity {
            let src_eng = matches!(source_side, Side::Engineering { .. });
            let dst_eng = matches!(destination_side, Side::Engineering { .. });
            if src_eng != dst_eng {
                return Err(GeoError::not_implemented(
                    "工程参考系与大地参考系之间的变换",
                ));
            }
        }

        Ok(Transformation {
            source: source.clone(),
            destination: destination.clone(),
            identity,
            source_side,
            destination_side,
        })
    }
}

impl Transformation {
    /// 源参考系
    #[must_use]
    pub fn source(&self) -> &Arc<CoordinateReference> {
        &self.source
    }

    /// 目的参考系
    #[must_use]
    pub fn destination(&self) -> &Arc<CoordinateReference> {
        &self.destination
    }

    /// 源与目的参考系相等
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// 裸坐标变换
    pub fn transform_coordinates(&self, x: f64, y: f64, z: f64) -> GeoResult<(f64, f64, f64)> {
        if self.identity {
            return Ok((x, y, z));
        }
        let (mut ox, mut oy, mut oz) = match (&self.source_side, &self.destination_side) {
            (
                Side::Engineering {
                    x_to_m: sx,
                    y_to_m: sy,
                },
                Side::Engineering {
                    x_to_m: dx,
                    y_to_m: dy,
                },
            ) => (x * sx / dx, y * sy / dy, z),
            _ => {
                let (lon, lat, height) = self.source_side.to_geodetic(x, y, z)?;
                // 基准椭球不同则经地心坐标中转
                let (lon, lat, height) = match (
                    self.source_side.datum(),
                    self.destination_side.datum(),
                ) {
                    (Some(src), Some(dst)) if src != dst => {
                        let (gx, gy, gz) =
                            geocentric::geodetic_to_geocentric(&src, lon, lat, height);
                        geocentric::geocentric_to_geodetic(&dst, gx, gy, gz)
                    }
                    _ => (lon, lat, height),
                };
                self.destination_side.from_geodetic(lon, lat, height)?
            }
        };

        // 目的侧环绕轴归一化
        let axes = &self.destination.axes;
        if let Some(axis) = axes.first() {
            ox = axis.normalize(ox);
        }
        if let Some(axis) = axes.get(1) {
            oy = axis.normalize(oy);
        }
        if let Some(axis) = axes.get(2) {
            oz = axis.normalize(oz);
        }
        if !self.destination.has_z_axis() {
            oz = 0.0;
        }
        Ok((ox, oy, oz))
    }

    /// 点变换，返回目的参考系下的新点
    ///
    /// 点的参考系必须等于源参考系，否则为契约违规。
    pub fn transform(&self, point: &Point) -> GeoResult<Point> {
        let mut result = Point::new_2d(self.destination.clone(), 0.0, 0.0);
        self.transform_sfct(point, &mut result)?;
        Ok(result)
    }

    /// 点变换，写入调用方提供的结果点
    pub fn transform_sfct(&self, point: &Point, result: &mut Point) -> GeoResult<()> {
        if !point.reference.equals(&self.source) {
            return Err(GeoError::programming("变换输入点的参考系与源参考系不一致"));
        }
        let (x, y, z) = self.transform_coordinates(point.x(), point.y(), point.z())?;
        result.reference = self.destination.clone();
        result.move_3d(x, y, z);
        Ok(())
    }

    /// 范围盒变换：逐角点变换后取包络
    ///
    /// 投影非仿射，轴序可能翻转、边缘可能弯曲，
    /// 因此变换全部角点（二维 4 个，三维 8 个）再取并，
    /// 保证结果覆盖每个角点的真实像。
    pub fn transform_bounds(&self, bounds: &Bounds) -> GeoResult<Bounds> {
        if !bounds.reference.equals(&self.source) {
            return Err(GeoError::programming(
                "变换输入范围盒的参考系与源参考系不一致",
            ));
        }
        let xs = [bounds.x, bounds.max_x()];
        let ys = [bounds.y, bounds.max_y()];
        let zs = if bounds.depth > 0.0 {
            vec![bounds.z, bounds.max_z()]
        } else {
            vec![bounds.z]
        };

        let mut result: Option<Bounds> = None;
        for &z in &zs {
            for &x in &xs {
                for &y in &ys {
                    let (tx, ty, tz) = self.transform_coordinates(x, y, z)?;
                    match &mut result {
                        Some(acc) => acc.set_to_include_point_3d(tx, ty, tz),
                        None => {
                            result = Some(Bounds::new_3d(
                                self.destination.clone(),
                                tx,
                                0.0,
                                ty,
                                0.0,
                                tz,
                                0.0,
                            ));
                        }
                    }
                }
            }
        }
        // xs/ys 恒有两个元素，至少变换了四个角点
        result.ok_or_else(|| GeoError::programming("范围盒没有可变换的角点"))
    }

    /// 范围盒变换，写入调用方提供的结果
    pub fn transform_bounds_sfct(&self, bounds: &Bounds, result: &mut Bounds) -> GeoResult<()> {
        *result = self.transform_bounds(bounds)?;
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================
