//! 形状工厂
//!
//! 统一的创建入口：校验坐标维数与参考系的一致性，
//! 再委托给各形状的构造函数。

use std::sync::Arc;

use super::conics;
use super::{
    ArcBand, Bounds, Circle, CircleBy3Points, CircularArc, ComplexPolygon, Ellipse, Point,
    Polygon, Polyline, Sector, Shape, ShapeList, XYZ,
};
use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;

/// 坐标分量数与参考系轴数的一致性检查
fn check_dimension(reference: &CoordinateReference, len: usize) -> GeoResult<()> {
    match len {
        2 => Ok(()),
        3 if reference.has_z_axis() => Ok(()),
        3 => Err(GeoError::programming(
            "二维参考系不接受三维坐标",
        )),
        n => Err(GeoError::programming(format!(
            "坐标分量数应为 2 或 3，得到 {n}"
        ))),
    }
}

/// 由坐标分量创建点
///
/// `coords` 为 `[x, y]` 或 `[x, y, z]`；维数与参考系轴数不符为契约违规。
pub fn create_point(
    reference: &Arc<CoordinateReference>,
    coords: &[f64],
) -> GeoResult<Point> {
    check_dimension(reference, coords.len())?;
    Ok(match coords {
        [x, y] => Point::new_2d(reference.clone(), *x, *y),
        [x, y, z] => Point::new_3d(reference.clone(), *x, *y, *z),
        _ => unreachable!(),
    })
}

/// 由坐标分量创建范围盒
///
/// `coords` 为 `[x, width, y, height]` 或
/// `[x, width, y, height, z, depth]`；负尺寸被翻转为正尺寸表示。
pub fn create_bounds(
    reference: &Arc<CoordinateReference>,
    coords: &[f64],
) -> GeoResult<Bounds> {
    match coords {
        [x, width, y, height] => Ok(Bounds::new_2d(
            reference.clone(),
            *x,
            *width,
            *y,
            *height,
        )),
        [x, width, y, height, z, depth] if reference.has_z_axis() => Ok(Bounds::new_3d(
            reference.clone(),
            *x,
            *width,
            *y,
            *height,
            *z,
            *depth,
        )),
        [_, _, _, _, _, _] => Err(GeoError::programming(
            "二维参考系不接受三维范围盒",
        )),
        c => Err(GeoError::programming(format!(
            "范围盒坐标分量数应为 4 或 6，得到 {}",
            c.len()
        ))),
    }
}

/// 创建折线
#[must_use]
pub fn create_polyline(
    reference: &Arc<CoordinateReference>,
    points: Vec<XYZ>,
) -> Polyline {
    Polyline::new(reference.clone(), points)
}

/// 创建多边形（顶点序列隐式闭合）
#[must_use]
pub fn create_polygon(reference: &Arc<CoordinateReference>, points: Vec<XYZ>) -> Polygon {
    Polygon::new(reference.clone(), points)
}

/// 创建复合多边形（首环为外环，其余为内环）
///
/// 子环参考系与复合多边形不一致为契约违规。
pub fn create_complex_polygon(
    reference: &Arc<CoordinateReference>,
    polygons: Vec<Polygon>,
) -> GeoResult<ComplexPolygon> {
    for polygon in &polygons {
        if !polygon.reference.equals(reference) {
            return Err(GeoError::programming(
                "复合多边形的子环参考系与整体不一致",
            ));
        }
    }
    Ok(ComplexPolygon::new(reference.clone(), polygons))
}

/// 创建形状列表
pub fn create_shape_list(
    reference: &Arc<CoordinateReference>,
    shapes: Vec<Shape>,
) -> GeoResult<ShapeList> {
    ShapeList::new(reference.clone(), shapes)
}

/// 创建圆（半径以米计）
#[must_use]
pub fn create_circle(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    radius: f64,
) -> Circle {
    Circle::new(reference.clone(), center, radius)
}

/// 由圆周上三点创建圆
pub fn create_circle_by_3_points(
    reference: &Arc<CoordinateReference>,
    p1: XYZ,
    p2: XYZ,
    p3: XYZ,
) -> GeoResult<CircleBy3Points> {
    CircleBy3Points::new(reference.clone(), p1, p2, p3)
}

/// 创建椭圆（半轴以米计，方位角以度计）
#[must_use]
pub fn create_ellipse(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    a: f64,
    b: f64,
    rotation_azimuth: f64,
) -> Ellipse {
    Ellipse::new(reference.clone(), center, a, b, rotation_azimuth)
}

/// 创建椭圆弧
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn create_arc(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    a: f64,
    b: f64,
    rotation_azimuth: f64,
    start_azimuth: f64,
    sweep_angle: f64,
) -> conics::Arc {
    conics::Arc::new(
        reference.clone(),
        center,
        a,
        b,
        rotation_azimuth,
        start_azimuth,
        sweep_angle,
    )
}

/// 以圆心形式创建圆弧
#[must_use]
pub fn create_circular_arc(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    radius: f64,
    start_azimuth: f64,
    sweep_angle: f64,
) -> CircularArc {
    CircularArc::new(reference.clone(), center, radius, start_azimuth, sweep_angle)
}

/// 由弧上三点创建圆弧
pub fn create_circular_arc_by_3_points(
    reference: &Arc<CoordinateReference>,
    start: XYZ,
    intermediate: XYZ,
    end: XYZ,
) -> GeoResult<CircularArc> {
    CircularArc::by_3_points(reference.clone(), start, intermediate, end)
}

/// 由弦与凸度创建圆弧
pub fn create_circular_arc_by_bulge(
    reference: &Arc<CoordinateReference>,
    start: XYZ,
    end: XYZ,
    bulge: f64,
) -> GeoResult<CircularArc> {
    CircularArc::by_bulge(reference.clone(), start, end, bulge)
}

/// 创建环形扇带
#[must_use]
pub fn create_arc_band(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    min_radius: f64,
    max_radius: f64,
    start_azimuth: f64,
    sweep_angle: f64,
) -> ArcBand {
    ArcBand::new(
        reference.clone(),
        center,
        min_radius,
        max_radius,
        start_azimuth,
        sweep_angle,
    )
}

/// 创建扇形
#[must_use]
pub fn create_sector(
    reference: &Arc<CoordinateReference>,
    center: XYZ,
    radius: f64,
    start_azimuth: f64,
    sweep_angle: f64,
) -> Sector {
    Sector::new(reference.clone(), center, radius, start_azimuth, sweep_angle)
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

    fn wgs84_3d() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::wgs84_3d())
    }

    #[test]
    fn test_create_point_dimension_check() {
        let r = wgs84();
        assert!(create_point(&r, &[120.0, 30.0]).is_ok());
        assert!(create_point(&r, &[120.0, 30.0, 50.0]).is_err());
        assert!(create_point(&r, &[120.0]).is_err());

        let r3 = wgs84_3d();
        let p = create_point(&r3, &[120.0, 30.0, 50.0]).unwrap();
        assert_eq!(p.z(), 50.0);
    }

    #[test]
    fn test_create_bounds_layout() {
        // 设计场景: [0,10,0,5] -> x=0, width=10, y=0, height=5
        let b = create_bounds(&wgs84(), &[0.0, 10.0, 0.0, 5.0]).unwrap();
        assert_eq!((b.x, b.width), (0.0, 10.0));
        assert_eq!((b.y, b.height), (0.0, 5.0));

        assert!(create_bounds(&wgs84(), &[0.0, 1.0, 0.0]).is_err());
        assert!(create_bounds(&wgs84(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).is_err());
        assert!(create_bounds(&wgs84_3d(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).is_ok());
    }

    #[test]
    fn test_create_complex_polygon_reference_check() {
        let r = wgs84();
        let other = Arc::new(CoordinateReference::web_mercator());
        let ring = create_polygon(
            &other,
            vec![
                XYZ::new_2d(0.0, 0.0),
                XYZ::new_2d(1.0, 0.0),
                XYZ::new_2d(1.0, 1.0),
            ],
        );
        assert!(create_complex_polygon(&r, vec![ring]).is_err());
    }
}
