//! 几何形状模型
//!
//! 形状为封闭的变体集合（[`Shape`] 枚举），避免继承链与动态分发。
//! 每个形状在构造时绑定一个坐标参考系，此后不再改变；
//! 跨参考系需要经由变换引擎生成新形状。
//!
//! # 可变性约定
//!
//! 可变形状的所有修改操作原地生效并立即重算缓存的范围；
//! 修改要么完整生效要么完整失败，不留下半修改状态。
//! 形状不做内部加锁，单一所有者负责互斥修改。

mod bounds;
mod conics;
mod factory;
mod list;
mod point;
mod poly;

pub use bounds::Bounds;
pub use conics::{Arc, ArcBand, Circle, CircleBy3Points, CircularArc, Ellipse, Sector};
pub use factory::*;
pub use list::ShapeList;
pub use point::Point;
pub use poly::{ComplexPolygon, Polygon, Polyline};

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;

// ============================================================================
// 裸坐标
// ============================================================================

/// 裸坐标三元组（无参考系）
///
/// 二维形状的 z 分量恒为 0。
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XYZ {
    /// X 坐标（或经度）
    pub x: f64,
    /// Y 坐标（或纬度）
    pub y: f64,
    /// Z 坐标（或高程）
    pub z: f64,
}

impl XYZ {
    /// 创建二维坐标
    #[inline]
    #[must_use]
    pub const fn new_2d(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// 创建三维坐标
    #[inline]
    #[must_use]
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 平面欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// 二维叉积的标量值
    #[inline]
    #[must_use]
    pub fn cross_2d(a: &Self, b: &Self, c: &Self) -> f64 {
        (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
    }
}

impl From<(f64, f64)> for XYZ {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new_2d(x, y)
    }
}

impl From<(f64, f64, f64)> for XYZ {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new_3d(x, y, z)
    }
}

// ============================================================================
// 局部度量辅助
// ============================================================================

/// 每坐标单位对应的米数 (x 方向, y 方向)
///
/// 大地参考系按等距圆柱近似在 `origin_y`（纬度，度）处展开，
/// 圆锥形状的解析包含测试与三点定圆都用它。
/// 笛卡尔参考系返回 (1, 1)。
#[must_use]
pub(crate) fn local_scales(reference: &CoordinateReference, origin_y: f64) -> (f64, f64) {
    if reference.is_geodetic() {
        let radius = reference
            .datum
            .map_or(crate::geodesy::EARTH_MEAN_RADIUS, |e| {
                e.global_mean_radius()
            });
        let k_lat = radius * std::f64::consts::PI / 180.0;
        let k_lon = k_lat * origin_y.to_radians().cos();
        (k_lon, k_lat)
    } else {
        (1.0, 1.0)
    }
}

// ============================================================================
// 形状枚举
// ============================================================================

/// 形状类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ShapeType {
    Point,
    Bounds,
    Polyline,
    Polygon,
    ComplexPolygon,
    ShapeList,
    Circle,
    CircleBy3Points,
    Ellipse,
    Arc,
    CircularArc,
    ArcBand,
    Sector,
}

/// 几何形状
///
/// 封闭的变体集合，统一能力见各访问方法。
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// 点
    Point(Point),
    /// 轴对齐范围盒
    Bounds(Bounds),
    /// 折线
    Polyline(Polyline),
    /// 多边形
    Polygon(Polygon),
    /// 复合多边形（外环加内环）
    ComplexPolygon(ComplexPolygon),
    /// 异构形状列表
    ShapeList(ShapeList),
    /// 圆（圆心加半径）
    Circle(Circle),
    /// 三点定圆
    CircleBy3Points(CircleBy3Points),
    /// 椭圆
    Ellipse(Ellipse),
    /// 椭圆弧
    Arc(Arc),
    /// 圆弧
    CircularArc(CircularArc),
    /// 环形扇带
    ArcBand(ArcBand),
    /// 扇形
    Sector(Sector),
}

impl Shape {
    /// 形状类别
    #[must_use]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Point(_) => ShapeType::Point,
            Self::Bounds(_) => ShapeType::Bounds,
            Self::Polyline(_) => ShapeType::Polyline,
            Self::Polygon(_) => ShapeType::Polygon,
            Self::ComplexPolygon(_) => ShapeType::ComplexPolygon,
            Self::ShapeList(_) => ShapeType::ShapeList,
            Self::Circle(_) => ShapeType::Circle,
            Self::CircleBy3Points(_) => ShapeType::CircleBy3Points,
            Self::Ellipse(_) => ShapeType::Ellipse,
            Self::Arc(_) => ShapeType::Arc,
            Self::CircularArc(_) => ShapeType::CircularArc,
            Self::ArcBand(_) => ShapeType::ArcBand,
            Self::Sector(_) => ShapeType::Sector,
        }
    }

    /// 绑定的坐标参考系
    #[must_use]
    pub fn reference(&self) -> &std::sync::Arc<CoordinateReference> {
        match self {
            Self::Point(s) => &s.reference,
            Self::Bounds(s) => &s.reference,
            Self::Polyline(s) => &s.reference,
            Self::Polygon(s) => &s.reference,
            Self::ComplexPolygon(s) => &s.reference,
            Self::ShapeList(s) => &s.reference,
            Self::Circle(s) => &s.reference,
            Self::CircleBy3Points(s) => &s.reference,
            Self::Ellipse(s) => &s.reference,
            Self::Arc(s) => &s.reference,
            Self::CircularArc(s) => &s.reference,
            Self::ArcBand(s) => &s.reference,
            Self::Sector(s) => &s.reference,
        }
    }

    /// 形状的轴对齐范围
    ///
    /// 无可计算范围的形状（空列表、空折线）返回 `NoBounds`。
    pub fn bounds(&self) -> GeoResult<Bounds> {
        match self {
            Self::Point(s) => Ok(s.bounds()),
            Self::Bounds(s) => Ok(s.clone()),
            Self::Polyline(s) => s.bounds(),
            Self::Polygon(s) => s.bounds(),
            Self::ComplexPolygon(s) => s.bounds(),
            Self::ShapeList(s) => s.bounds(),
            Self::Circle(s) => Ok(s.bounds()),
            Self::CircleBy3Points(s) => Ok(s.bounds()),
            Self::Ellipse(s) => Ok(s.bounds()),
            Self::Arc(s) => Ok(s.bounds()),
            Self::CircularArc(s) => Ok(s.bounds()),
            Self::ArcBand(s) => Ok(s.bounds()),
            Self::Sector(s) => Ok(s.bounds()),
        }
    }

    /// 焦点（中心类位置，用于标注锚点）
    pub fn focus_point(&self) -> GeoResult<Point> {
        match self {
            Self::Point(s) => Ok(s.clone()),
            Self::Circle(s) => Ok(s.center_point()),
            Self::CircleBy3Points(s) => Ok(s.center_point()),
            Self::Ellipse(s) => Ok(s.center_point()),
            Self::Arc(s) => Ok(s.center_point()),
            Self::CircularArc(s) => Ok(s.center_point()),
            Self::ArcBand(s) => Ok(s.center_point()),
            Self::Sector(s) => Ok(s.center_point()),
            other => {
                let bounds = other.bounds()?;
                Ok(bounds.focus_point())
            }
        }
    }

    /// 裸坐标二维包含测试
    ///
    /// 开放曲线（折线、弧）不包含任何点；
    /// 复合多边形与形状列表为"任一子形状包含"。
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Point(_) | Self::Polyline(_) | Self::Arc(_) | Self::CircularArc(_) => false,
            Self::Bounds(s) => s.contains_2d_coordinates(x, y),
            Self::Polygon(s) => s.contains_2d_coordinates(x, y),
            Self::ComplexPolygon(s) => s.contains_2d_coordinates(x, y),
            Self::ShapeList(s) => s.contains_2d_coordinates(x, y),
            Self::Circle(s) => s.contains_2d_coordinates(x, y),
            Self::CircleBy3Points(s) => s.contains_2d_coordinates(x, y),
            Self::Ellipse(s) => s.contains_2d_coordinates(x, y),
            Self::ArcBand(s) => s.contains_2d_coordinates(x, y),
            Self::Sector(s) => s.contains_2d_coordinates(x, y),
        }
    }

    /// 点形状的二维包含测试
    ///
    /// 点的参考系必须与本形状一致，否则为契约违规。
    pub fn contains_2d_point(&self, point: &Point) -> GeoResult<bool> {
        if !self.reference().equals(&point.reference) {
            return Err(GeoError::programming(
                "包含测试的点与形状参考系不一致",
            ));
        }
        Ok(self.contains_2d_coordinates(point.x(), point.y()))
    }

    /// 整体二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) -> GeoResult<()> {
        match self {
            Self::Point(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Bounds(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Polyline(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Polygon(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::ComplexPolygon(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::ShapeList(s) => s.translate_2d(dx, dy),
            Self::Circle(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::CircleBy3Points(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Ellipse(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Arc(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::CircularArc(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::ArcBand(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
            Self::Sector(s) => {
                s.translate_2d(dx, dy);
                Ok(())
            }
        }
    }

    /// 值相等性（参考系相等且几何载荷相等）
    #[must_use]
    pub fn equals(&self, other: &Shape) -> bool {
        self == other
    }

    /// 深拷贝
    #[must_use]
    pub fn copy(&self) -> Shape {
        self.clone()
    }
}

// ============================================================================
// 测试
// ============================================================================
