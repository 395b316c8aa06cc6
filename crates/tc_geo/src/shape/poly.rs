//! 折线、多边形与复合多边形
//!
//! 顶点序列形状在每次修改后立即重算范围缓存，
//! 读取 `bounds()` 时无需加锁或可变借用。

use std::sync::Arc;

use super::{Bounds, Point, XYZ};
use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;

/// 顶点索引的错误类别文本
const VERTEX_INDEX: &str = "顶点";

/// 计算顶点序列的最小/最大角点
fn corners_of(points: &[XYZ]) -> Option<(XYZ, XYZ)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    Some((min, max))
}

// ============================================================================
// 折线
// ============================================================================

/// 折线（开放顶点序列）
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    points: Vec<XYZ>,
    corners: Option<(XYZ, XYZ)>,
}

impl Polyline {
    /// 从顶点序列创建折线
    #[must_use]
    pub fn new(reference: Arc<CoordinateReference>, points: Vec<XYZ>) -> Self {
        let corners = corners_of(&points);
        Self {
            reference,
            points,
            corners,
        }
    }

    /// 顶点数量
    #[inline]
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// 顶点序列
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[XYZ] {
        &self.points
    }

    /// 按索引取顶点
    pub fn get_point(&self, index: usize) -> GeoResult<Point> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        let c = self.points[index];
        Ok(Point::new_3d(self.reference.clone(), c.x, c.y, c.z))
    }

    /// 在索引处插入顶点
    pub fn insert_point(&mut self, index: usize, coords: XYZ) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len() + 1)?;
        self.points.insert(index, coords);
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 移除索引处的顶点
    pub fn remove_point(&mut self, index: usize) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        self.points.remove(index);
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 移动索引处的顶点到新的二维位置
    pub fn move_point_2d(&mut self, index: usize, x: f64, y: f64) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        self.points[index].x = x;
        self.points[index].y = y;
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 平移索引处的顶点
    pub fn translate_point_2d(&mut self, index: usize, dx: f64, dy: f64) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        self.points[index].x += dx;
        self.points[index].y += dy;
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 整体二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
        if let Some((min, max)) = &mut self.corners {
            min.x += dx;
            min.y += dy;
            max.x += dx;
            max.y += dy;
        }
    }

    /// 折线范围，空折线返回 `NoBounds`
    pub fn bounds(&self) -> GeoResult<Bounds> {
        let (min, max) = self.corners.ok_or_else(|| GeoError::no_bounds("空折线"))?;
        Ok(Bounds::from_corners(self.reference.clone(), min, max))
    }
}

// ============================================================================
// 多边形
// ============================================================================

/// 多边形（闭合顶点序列，末点隐式连回首点）
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    points: Vec<XYZ>,
    corners: Option<(XYZ, XYZ)>,
}

impl Polygon {
    /// 从顶点序列创建多边形
    ///
    /// 顶点数不足三仍可构造，由 [`Polygon::is_valid`] 标记无效。
    #[must_use]
    pub fn new(reference: Arc<CoordinateReference>, points: Vec<XYZ>) -> Self {
        let corners = corners_of(&points);
        Self {
            reference,
            points,
            corners,
        }
    }

    /// 顶点数量
    #[inline]
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// 顶点序列
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[XYZ] {
        &self.points
    }

    /// 按索引取顶点
    pub fn get_point(&self, index: usize) -> GeoResult<Point> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        let c = self.points[index];
        Ok(Point::new_3d(self.reference.clone(), c.x, c.y, c.z))
    }

    /// 在索引处插入顶点
    pub fn insert_point(&mut self, index: usize, coords: XYZ) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len() + 1)?;
        self.points.insert(index, coords);
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 移除索引处的顶点
    pub fn remove_point(&mut self, index: usize) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        self.points.remove(index);
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 移动索引处的顶点到新的二维位置
    pub fn move_point_2d(&mut self, index: usize, x: f64, y: f64) -> GeoResult<()> {
        GeoError::check_index(VERTEX_INDEX, index, self.points.len())?;
        self.points[index].x = x;
        self.points[index].y = y;
        self.corners = corners_of(&self.points);
        Ok(())
    }

    /// 整体二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        for p in &mut self.points {
            p.x += dx;
            p.y += dy;
        }
        if let Some((min, max)) = &mut self.corners {
            min.x += dx;
            min.y += dy;
            max.x += dx;
            max.y += dy;
        }
    }

    /// 多边形范围，空多边形返回 `NoBounds`
    pub fn bounds(&self) -> GeoResult<Bounds> {
        let (min, max) = self
            .corners
            .ok_or_else(|| GeoError::no_bounds("空多边形"))?;
        Ok(Bounds::from_corners(self.reference.clone(), min, max))
    }

    /// 有效性：至少三个顶点且边不自相交
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        // 非相邻边两两相交测试
        for i in 0..n {
            let a1 = self.points[i];
            let a2 = self.points[(i + 1) % n];
            for j in (i + 1)..n {
                // 相邻边（共享端点）不参与
                if j == i || (j + 1) % n == i || (i + 1) % n == j {
                    continue;
                }
                let b1 = self.points[j];
                let b2 = self.points[(j + 1) % n];
                if segments_properly_intersect(&a1, &a2, &b1, &b2) {
                    return false;
                }
            }
        }
        true
    }

    /// 射线法点包含测试（边界上的点视为包含在内）
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            // 边界命中
            if on_segment_2d(&pj, &pi, x, y) {
                return true;
            }
            if (pi.y > y) != (pj.y > y) {
                let x_cross = pj.x + (y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
                if x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// 平面符号面积（鞋带公式，逆时针为正）
    #[must_use]
    pub fn signed_area_2d(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }
}

/// 严格相交测试（共线重叠与端点接触不算）
fn segments_properly_intersect(a1: &XYZ, a2: &XYZ, b1: &XYZ, b2: &XYZ) -> bool {
    let d1 = XYZ::cross_2d(b1, b2, a1);
    let d2 = XYZ::cross_2d(b1, b2, a2);
    let d3 = XYZ::cross_2d(a1, a2, b1);
    let d4 = XYZ::cross_2d(a1, a2, b2);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// 点是否落在线段上（含端点）
fn on_segment_2d(a: &XYZ, b: &XYZ, x: f64, y: f64) -> bool {
    let p = XYZ::new_2d(x, y);
    let cross = XYZ::cross_2d(a, b, &p);
    if cross.abs() > 1e-9 * a.distance_2d(b).max(1.0) {
        return false;
    }
    x >= a.x.min(b.x) - 1e-12
        && x <= a.x.max(b.x) + 1e-12
        && y >= a.y.min(b.y) - 1e-12
        && y <= a.y.max(b.y) + 1e-12
}

// ============================================================================
// 复合多边形
// ============================================================================

/// 复合多边形（有序多边形序列，首个为外环语义由调用方约定）
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexPolygon {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    polygons: Vec<Polygon>,
}

impl ComplexPolygon {
    /// 从多边形序列创建
    #[must_use]
    pub fn new(reference: Arc<CoordinateReference>, polygons: Vec<Polygon>) -> Self {
        Self {
            reference,
            polygons,
        }
    }

    /// 子多边形数量
    #[inline]
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// 子多边形序列
    #[inline]
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// 按索引取子多边形
    pub fn get_polygon(&self, index: usize) -> GeoResult<&Polygon> {
        GeoError::check_index("子多边形", index, self.polygons.len())?;
        Ok(&self.polygons[index])
    }

    /// 追加子多边形
    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// 移除索引处的子多边形
    pub fn remove_polygon(&mut self, index: usize) -> GeoResult<Polygon> {
        GeoError::check_index("子多边形", index, self.polygons.len())?;
        Ok(self.polygons.remove(index))
    }

    /// 所有子多边形范围的并集，无有效子形状返回 `NoBounds`
    pub fn bounds(&self) -> GeoResult<Bounds> {
        let mut result: Option<Bounds> = None;
        for polygon in &self.polygons {
            if let Ok(b) = polygon.bounds() {
                match &mut result {
                    Some(acc) => acc.set_to_3d_union(&b),
                    None => result = Some(b),
                }
            }
        }
        result.ok_or_else(|| GeoError::no_bounds("空复合多边形"))
    }

    /// 任一子多边形包含即包含
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        self.polygons
            .iter()
            .any(|p| p.contains_2d_coordinates(x, y))
    }

    /// 整体二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) {
        for polygon in &mut self.polygons {
            polygon.translate_2d(dx, dy);
        }
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

    fn square() -> Polygon {
        Polygon::new(
            cart(),
            vec![
                XYZ::new_2d(0.0, 0.0),
                XYZ::new_2d(4.0, 0.0),
                XYZ::new_2d(4.0, 4.0),
                XYZ::new_2d(0.0, 4.0),
            ],
        )
    }

    #[test]
    fn test_polygon_scenario() {
        // 设计场景: 正方形 (0,0)-(4,4)
        let p = square();
        assert!(p.is_valid());

        let b = p.bounds().unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (0.0, 0.0, 4.0, 4.0));

        assert!(p.contains_2d_coordinates(2.0, 2.0));
        assert!(!p.contains_2d_coordinates(5.0, 5.0));
        // 边界点
        assert!(p.contains_2d_coordinates(0.0, 2.0));
        assert!(p.contains_2d_coordinates(4.0, 4.0));
    }

    #[test]
    fn test_polygon_validity() {
        // 自相交的蝴蝶结
        let bowtie = Polygon::new(
            cart(),
            vec![
                XYZ::new_2d(0.0, 0.0),
                XYZ::new_2d(4.0, 4.0),
                XYZ::new_2d(4.0, 0.0),
                XYZ::new_2d(0.0, 4.0),
            ],
        );
        assert!(!bowtie.is_valid());

        // 顶点不足
        let degenerate = Polygon::new(cart(), vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(1.0, 1.0)]);
        assert!(!degenerate.is_valid());
        assert!(degenerate.bounds().is_ok());
    }

    #[test]
    fn test_polygon_signed_area() {
        let p = square(); // 逆时针
        assert!((p.signed_area_2d() - 16.0).abs() < 1e-12);

        let cw = Polygon::new(
            cart(),
            vec![
                XYZ::new_2d(0.0, 0.0),
                XYZ::new_2d(0.0, 4.0),
                XYZ::new_2d(4.0, 4.0),
                XYZ::new_2d(4.0, 0.0),
            ],
        );
        assert!((cw.signed_area_2d() + 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_polyline_mutation_and_bounds() {
        let mut line = Polyline::new(
            cart(),
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(10.0, 0.0)],
        );
        assert_eq!(line.point_count(), 2);

        line.insert_point(2, XYZ::new_2d(10.0, 5.0)).unwrap();
        let b = line.bounds().unwrap();
        assert_eq!((b.width, b.height), (10.0, 5.0));

        line.move_point_2d(2, 20.0, 5.0).unwrap();
        assert_eq!(line.bounds().unwrap().width, 20.0);

        line.remove_point(2).unwrap();
        assert_eq!(line.bounds().unwrap().height, 0.0);

        // 越界索引
        assert!(line.get_point(2).is_err());
        assert!(line.remove_point(9).is_err());
        // 失败的修改不改变状态
        assert_eq!(line.point_count(), 2);
    }

    #[test]
    fn test_empty_polyline_no_bounds() {
        let line = Polyline::new(cart(), vec![]);
        match line.bounds() {
            Err(GeoError::NoBounds { .. }) => {}
            other => panic!("期望 NoBounds，得到 {other:?}"),
        }
    }

    #[test]
    fn test_translate_updates_cache() {
        let mut p = square();
        p.translate_2d(10.0, 0.0);
        let b = p.bounds().unwrap();
        assert_eq!((b.x, b.max_x()), (10.0, 14.0));
        assert!(p.contains_2d_coordinates(12.0, 2.0));
        assert!(!p.contains_2d_coordinates(2.0, 2.0));
    }

    #[test]
    fn test_complex_polygon() {
        let outer = square();
        let mut inner = square();
        inner.translate_2d(10.0, 0.0);
        let complex = ComplexPolygon::new(cart(), vec![outer, inner]);

        assert_eq!(complex.polygon_count(), 2);
        let b = complex.bounds().unwrap();
        assert_eq!((b.x, b.max_x()), (0.0, 14.0));
        assert!(complex.contains_2d_coordinates(2.0, 2.0));
        assert!(complex.contains_2d_coordinates(12.0, 2.0));
        assert!(!complex.contains_2d_coordinates(7.0, 2.0));
    }

    #[test]
    fn test_empty_complex_polygon_no_bounds() {
        let complex = ComplexPolygon::new(cart(), vec![]);
        assert!(matches!(
            complex.bounds(),
            Err(GeoError::NoBounds { .. })
        ));
    }
}
