//! 拓扑引擎
//!
//! 交点计算按地球模型取线段语义：平面模型求直线段交点，
//! 球面与椭球模型把线段当作大圆弧、经单位球叉积求交。
//! 布尔运算（并、交、差）采用 Greiner-Hormann 裁剪，在坐标平面内
//! 进行，边界语义与形状模型的射线包含测试一致。
//!
//! 退化输入（端点相触、零面积环）不触发穿越；平面共线重叠在
//! 交点计算中解析为重叠区间的端点，在布尔裁剪中不计为穿越。
//! 结果按字典序去重后确定。

use std::sync::Arc;

use crate::error::{GeoError, GeoResult};
use crate::geodesy::{GeodesyFactory, GeodesyModel};
use crate::reference::CoordinateReference;
use crate::shape::{Bounds, ComplexPolygon, Point, Polygon, Shape, XYZ};

/// 交点重合判定的默认容差（坐标单位）
pub const DEFAULT_TOPOLOGY_EPSILON: f64 = 1e-9;

// ============================================================================
// 交点计算
// ============================================================================

/// 一条交点记录：交点与两侧形状贡献的线段
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// 交点
    pub point: Point,
    /// 第一形状贡献线段的两个端点
    pub first_segment: (XYZ, XYZ),
    /// 第二形状贡献线段的两个端点
    pub second_segment: (XYZ, XYZ),
    /// 第一形状的线段序号（边界链展开后的全局序号）
    pub first_index: usize,
    /// 第二形状的线段序号
    pub second_index: usize,
}

/// 拓扑引擎：绑定参考系与地球模型
#[derive(Debug, Clone)]
pub struct Topology {
    reference: Arc<CoordinateReference>,
    model: GeodesyModel,
    epsilon: f64,
}

/// 按参考系与显式模型选择创建拓扑引擎的工厂
pub struct TopologyFactory;

impl TopologyFactory {
    /// 平面模型拓扑引擎，要求笛卡尔参考系
    pub fn create_cartesian_topology(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<Topology> {
        let geodesy = GeodesyFactory::create_cartesian_geodesy(reference)?;
        Ok(Topology {
            reference: reference.clone(),
            model: *geodesy.model(),
            epsilon: DEFAULT_TOPOLOGY_EPSILON,
        })
    }

    /// 椭球模型拓扑引擎，要求带基准椭球的大地参考系
    pub fn create_ellipsoidal_topology(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<Topology> {
        let geodesy = GeodesyFactory::create_ellipsoidal_geodesy(reference)?;
        Ok(Topology {
            reference: reference.clone(),
            model: *geodesy.model(),
            epsilon: DEFAULT_TOPOLOGY_EPSILON,
        })
    }
}

impl Topology {
    /// 按参考系自动选择地球模型
    #[must_use]
    pub fn new(reference: &Arc<CoordinateReference>) -> Self {
        let model = *GeodesyFactory::create_geodesy(reference).model();
        Self {
            reference: reference.clone(),
            model,
            epsilon: DEFAULT_TOPOLOGY_EPSILON,
        }
    }

    /// 指定重合容差
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// 地球模型
    #[must_use]
    pub fn model(&self) -> &GeodesyModel {
        &self.model
    }

    /// 两形状边界的全部交点
    ///
    /// 每条记录给出交点、两侧贡献线段的端点及其在边界链中的
    /// 全局序号；容差内重合的交点只保留字典序最小的一条。
    /// 平面模型下共线重叠的线段对解析为重叠区间的两个端点。
    /// 无边界链的形状（点、圆锥曲线）返回 `NotImplemented`。
    pub fn calculate_intersections(
        &self,
        first: &Shape,
        second: &Shape,
    ) -> GeoResult<Vec<Intersection>> {
        if !first.reference().equals(&self.reference) || !second.reference().equals(&self.reference)
        {
            return Err(GeoError::programming("交点计算的形状参考系与引擎不一致"));
        }
        let segments_a = boundary_segments(first)?;
        let segments_b = boundary_segments(second)?;

        let planar = matches!(self.model, GeodesyModel::Cartesian);
        let mut records = Vec::new();
        for (i, (a1, a2)) in segments_a.iter().enumerate() {
            for (j, (b1, b2)) in segments_b.iter().enumerate() {
                let mut hits: [Option<XYZ>; 2] = [None, None];
                if planar {
                    if let Some((_, _, p)) = planar_intersection(a1, a2, b1, b2, self.epsilon) {
                        hits[0] = Some(p);
                    } else if let Some((p, q)) = collinear_overlap(a1, a2, b1, b2, self.epsilon) {
                        hits = [Some(p), Some(q)];
                    }
                } else {
                    hits[0] = great_circle_intersection(a1, a2, b1, b2);
                }
                for p in hits.into_iter().flatten() {
                    records.push(Intersection {
                        point: Point::new_2d(self.reference.clone(), p.x, p.y),
                        first_segment: (*a1, *a2),
                        second_segment: (*b1, *b2),
                        first_index: i,
                        second_index: j,
                    });
                }
            }
        }

        // 字典序排序后按容差去重，保留首条
        records.sort_by(|a, b| {
            a.point
                .x()
                .total_cmp(&b.point.x())
                .then(a.point.y().total_cmp(&b.point.y()))
                .then(a.first_index.cmp(&b.first_index))
                .then(a.second_index.cmp(&b.second_index))
        });
        let mut deduped: Vec<Intersection> = Vec::with_capacity(records.len());
        for record in records {
            let coincident = deduped.last().is_some_and(|kept| {
                (kept.point.x() - record.point.x()).abs() <= self.epsilon
                    && (kept.point.y() - record.point.y()).abs() <= self.epsilon
            });
            if !coincident {
                deduped.push(record);
            }
        }
        Ok(deduped)
    }
}

/// 形状的边界链：线段序列
fn boundary_segments(shape: &Shape) -> GeoResult<Vec<(XYZ, XYZ)>> {
    fn ring_segments(points: &[XYZ], closed: bool, out: &mut Vec<(XYZ, XYZ)>) {
        for window in points.windows(2) {
            out.push((window[0], window[1]));
        }
        if closed && points.len() >= 3 {
            out.push((points[points.len() - 1], points[0]));
        }
    }

    let mut segments = Vec::new();
    match shape {
        Shape::Polyline(p) => ring_segments(p.points(), false, &mut segments),
        Shape::Polygon(p) => ring_segments(p.points(), true, &mut segments),
        Shape::ComplexPolygon(cp) => {
            for polygon in cp.polygons() {
                ring_segments(polygon.points(), true, &mut segments);
            }
        }
        Shape::Bounds(b) => {
            let ring = bounds_ring(b);
            ring_segments(&ring, true, &mut segments);
        }
        Shape::ShapeList(list) => {
            for child in list.shapes() {
                segments.extend(boundary_segments(child)?);
            }
        }
        other => {
            return Err(GeoError::not_implemented(format!(
                "边界链提取: {:?}",
                other.shape_type()
            )));
        }
    }
    Ok(segments)
}

fn bounds_ring(bounds: &Bounds) -> [XYZ; 4] {
    [
        XYZ::new_2d(bounds.x, bounds.y),
        XYZ::new_2d(bounds.max_x(), bounds.y),
        XYZ::new_2d(bounds.max_x(), bounds.max_y()),
        XYZ::new_2d(bounds.x, bounds.max_y()),
    ]
}

/// 平面线段的真交点：参数 (t, u) 均落在开区间 (ε, 1-ε)
///
/// 平行与共线重叠不产生穿越，端点相触视为退化、不记为交点。
fn planar_intersection(
    a1: &XYZ,
    a2: &XYZ,
    b1: &XYZ,
    b2: &XYZ,
    epsilon: f64,
) -> Option<(f64, f64, XYZ)> {
    let rx = a2.x - a1.x;
    let ry = a2.y - a1.y;
    let sx = b2.x - b1.x;
    let sy = b2.y - b1.y;
    let denom = rx * sy - ry * sx;
    if denom.abs() < epsilon {
        return None;
    }
    let qpx = b1.x - a1.x;
    let qpy = b1.y - a1.y;
    let t = (qpx * sy - qpy * sx) / denom;
    let u = (qpx * ry - qpy * rx) / denom;
    if t <= epsilon || t >= 1.0 - epsilon || u <= epsilon || u >= 1.0 - epsilon {
        return None;
    }
    Some((t, u, XYZ::new_2d(a1.x + t * rx, a1.y + t * ry)))
}

/// 共线线段对的重叠区间，给出区间的两个端点
///
/// 仅当两线段共线且参数区间相交时给出结果；单点相触退化为两个
/// 相同的端点。第一线段为零长度时视为退化、无结果。
fn collinear_overlap(a1: &XYZ, a2: &XYZ, b1: &XYZ, b2: &XYZ, epsilon: f64) -> Option<(XYZ, XYZ)> {
    let rx = a2.x - a1.x;
    let ry = a2.y - a1.y;
    let sx = b2.x - b1.x;
    let sy = b2.y - b1.y;
    let qpx = b1.x - a1.x;
    let qpy = b1.y - a1.y;
    if (rx * sy - ry * sx).abs() >= epsilon || (qpx * ry - qpy * rx).abs() >= epsilon {
        return None;
    }
    let len2 = rx * rx + ry * ry;
    if len2 < epsilon * epsilon {
        return None;
    }
    // 把第二线段的端点投到第一线段的参数轴上
    let t1 = (qpx * rx + qpy * ry) / len2;
    let t2 = ((b2.x - a1.x) * rx + (b2.y - a1.y) * ry) / len2;
    let lo = t1.min(t2).max(0.0);
    let hi = t1.max(t2).min(1.0);
    if lo > hi {
        return None;
    }
    Some((
        XYZ::new_2d(a1.x + lo * rx, a1.y + lo * ry),
        XYZ::new_2d(a1.x + hi * rx, a1.y + hi * ry),
    ))
}

/// 大圆弧交点：两弧所在大圆法向的叉积给出候选点，再做弧内判定
///
/// 坐标为度。同一大圆上的弧（法向平行）视为退化、无交点。
fn great_circle_intersection(a1: &XYZ, a2: &XYZ, b1: &XYZ, b2: &XYZ) -> Option<XYZ> {
    let va1 = unit_vector(a1);
    let va2 = unit_vector(a2);
    let vb1 = unit_vector(b1);
    let vb2 = unit_vector(b2);

    let n1 = cross3(va1, va2);
    let n2 = cross3(vb1, vb2);
    let candidate = cross3(n1, n2);
    let norm = (candidate[0] * candidate[0]
        + candidate[1] * candidate[1]
        + candidate[2] * candidate[2])
        .sqrt();
    if norm < 1e-15 {
        return None;
    }
    let c = [candidate[0] / norm, candidate[1] / norm, candidate[2] / norm];
    let anti = [-c[0], -c[1], -c[2]];

    for p in [c, anti] {
        if on_arc(va1, va2, p) && on_arc(vb1, vb2, p) {
            let lat = p[2].asin().to_degrees();
            let lon = p[1].atan2(p[0]).to_degrees();
            return Some(XYZ::new_2d(lon, lat));
        }
    }
    None
}

fn unit_vector(p: &XYZ) -> [f64; 3] {
    let (lon, lat) = (p.x.to_radians(), p.y.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn angular(a: [f64; 3], b: [f64; 3]) -> f64 {
    (a[0] * b[0] + a[1] * b[1] + a[2] * b[2])
        .clamp(-1.0, 1.0)
        .acos()
}

/// 点是否落在弧段上（角距离可加性判定）
fn on_arc(a: [f64; 3], b: [f64; 3], p: [f64; 3]) -> bool {
    angular(a, p) + angular(p, b) <= angular(a, b) + 1e-9
}

// ============================================================================
// 构造几何：布尔运算
// ============================================================================

/// 布尔运算种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoolOp {
    Union,
    Intersection,
    Difference,
}

/// 形状列表上的布尔运算
///
/// 运算在坐标平面内进行，边界语义与多边形的射线包含测试一致。
/// 结果为单环时给出多边形，多环时给出复合多边形：首环为主外环，
/// 其余环为洞或不相连的分量。
#[derive(Debug, Clone)]
pub struct ConstructiveGeometry {
    reference: Arc<CoordinateReference>,
    model: GeodesyModel,
    epsilon: f64,
}

/// 按参考系与显式模型选择创建布尔运算引擎的工厂
pub struct ConstructiveGeometryFactory;

impl ConstructiveGeometryFactory {
    /// 平面模型，要求笛卡尔参考系
    pub fn create_cartesian(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<ConstructiveGeometry> {
        let geodesy = GeodesyFactory::create_cartesian_geodesy(reference)?;
        Ok(ConstructiveGeometry::with_model(reference, *geodesy.model()))
    }

    /// 球面模型，要求大地参考系
    pub fn create_spherical(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<ConstructiveGeometry> {
        let geodesy = GeodesyFactory::create_spherical_geodesy(reference)?;
        Ok(ConstructiveGeometry::with_model(reference, *geodesy.model()))
    }

    /// 椭球模型，要求带基准椭球的大地参考系
    pub fn create_ellipsoidal(
        reference: &Arc<CoordinateReference>,
    ) -> GeoResult<ConstructiveGeometry> {
        let geodesy = GeodesyFactory::create_ellipsoidal_geodesy(reference)?;
        Ok(ConstructiveGeometry::with_model(reference, *geodesy.model()))
    }
}

impl ConstructiveGeometry {
    /// 创建布尔运算引擎，按参考系自动选择地球模型
    #[must_use]
    pub fn new(reference: &Arc<CoordinateReference>) -> Self {
        Self::with_model(reference, *GeodesyFactory::create_geodesy(reference).model())
    }

    fn with_model(reference: &Arc<CoordinateReference>, model: GeodesyModel) -> Self {
        Self {
            reference: reference.clone(),
            model,
            epsilon: DEFAULT_TOPOLOGY_EPSILON,
        }
    }

    /// 指定重合容差
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// 地球模型
    ///
    /// 裁剪在参考系自身坐标内进行，模型供调用方判断坐标语义。
    #[must_use]
    pub fn model(&self) -> &GeodesyModel {
        &self.model
    }

    /// 形状列表的并
    pub fn union(&self, shapes: &[Shape]) -> GeoResult<Shape> {
        self.fold(shapes, BoolOp::Union)
    }

    /// 形状列表的交
    pub fn intersection(&self, shapes: &[Shape]) -> GeoResult<Shape> {
        self.fold(shapes, BoolOp::Intersection)
    }

    /// 差：首形状依次减去其余形状
    pub fn difference(&self, shapes: &[Shape]) -> GeoResult<Shape> {
        self.fold(shapes, BoolOp::Difference)
    }

    fn fold(&self, shapes: &[Shape], op: BoolOp) -> GeoResult<Shape> {
        let first = shapes
            .first()
            .ok_or_else(|| GeoError::programming("布尔运算要求至少一个形状"))?;
        for shape in shapes {
            if !shape.reference().equals(&self.reference) {
                return Err(GeoError::programming("布尔运算的形状参考系与引擎不一致"));
            }
        }

        let mut rings = vec![ensure_ccw(ring_of(first)?)];
        for shape in &shapes[1..] {
            let next = ensure_ccw(ring_of(shape)?);
            rings = self.combine(rings, next, op);
        }
        Ok(self.to_shape(rings))
    }

    /// 把下一个环并入累积环组：主环做裁剪，其余环原样保留
    fn combine(&self, mut rings: Vec<Vec<XYZ>>, next: Vec<XYZ>, op: BoolOp) -> Vec<Vec<XYZ>> {
        if rings.is_empty() {
            return match op {
                BoolOp::Union => vec![next],
                BoolOp::Intersection | BoolOp::Difference => rings,
            };
        }
        let primary = rings.remove(0);
        let mut result = clip_rings(&primary, &next, op, self.epsilon);
        // 主环按面积降序排到首位
        result.sort_by(|a, b| ring_area_abs(b).total_cmp(&ring_area_abs(a)));
        result.extend(rings);
        result
    }

    fn to_shape(&self, rings: Vec<Vec<XYZ>>) -> Shape {
        let mut polygons: Vec<Polygon> = rings
            .into_iter()
            .map(|ring| Polygon::new(self.reference.clone(), ring))
            .collect();
        if polygons.len() == 1 {
            if let Some(polygon) = polygons.pop() {
                return Shape::Polygon(polygon);
            }
        }
        if polygons.is_empty() {
            return Shape::Polygon(Polygon::new(self.reference.clone(), Vec::new()));
        }
        Shape::ComplexPolygon(ComplexPolygon::new(self.reference.clone(), polygons))
    }
}

/// 形状降解为单个简单环
fn ring_of(shape: &Shape) -> GeoResult<Vec<XYZ>> {
    match shape {
        Shape::Polygon(p) => {
            if p.point_count() < 3 {
                return Err(GeoError::programming("布尔运算的多边形至少需要三个顶点"));
            }
            Ok(p.points().to_vec())
        }
        Shape::Bounds(b) => Ok(bounds_ring(b).to_vec()),
        other => Err(GeoError::not_implemented(format!(
            "布尔运算: {:?}",
            other.shape_type()
        ))),
    }
}

fn ring_area_signed(ring: &[XYZ]) -> f64 {
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let p = &ring[i];
        let q = &ring[(i + 1) % ring.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

fn ring_area_abs(ring: &[XYZ]) -> f64 {
    ring_area_signed(ring).abs()
}

fn ensure_ccw(mut ring: Vec<XYZ>) -> Vec<XYZ> {
    if ring_area_signed(&ring) < 0.0 {
        ring.reverse();
    }
    ring
}

/// 偶奇规则的点在环内测试
fn point_in_ring(ring: &[XYZ], x: f64, y: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    for i in 0..n {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        if (a.y > y) != (b.y > y) {
            let cross_x = a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x < cross_x {
                inside = !inside;
            }
        }
    }
    inside
}

// ============================================================================
// Greiner-Hormann 裁剪
// ============================================================================

#[derive(Debug, Clone)]
struct GhVertex {
    point: XYZ,
    next: usize,
    prev: usize,
    neighbor: usize,
    intersect: bool,
    entry: bool,
    visited: bool,
}

/// 两个简单环的布尔裁剪
///
/// 无真穿越时按包含关系给出结果：差运算产出的洞环保持顺时针。
fn clip_rings(subject: &[XYZ], clip: &[XYZ], op: BoolOp, epsilon: f64) -> Vec<Vec<XYZ>> {
    // 收集真穿越
    struct Crossing {
        point: XYZ,
        edge_a: usize,
        alpha_a: f64,
        edge_b: usize,
        alpha_b: f64,
    }
    let mut crossings = Vec::new();
    for i in 0..subject.len() {
        let a1 = &subject[i];
        let a2 = &subject[(i + 1) % subject.len()];
        for j in 0..clip.len() {
            let b1 = &clip[j];
            let b2 = &clip[(j + 1) % clip.len()];
            if let Some((t, u, point)) = planar_intersection(a1, a2, b1, b2, epsilon) {
                crossings.push(Crossing {
                    point,
                    edge_a: i,
                    alpha_a: t,
                    edge_b: j,
                    alpha_b: u,
                });
            }
        }
    }

    if crossings.is_empty() {
        let a_in_b = point_in_ring(clip, subject[0].x, subject[0].y);
        let b_in_a = point_in_ring(subject, clip[0].x, clip[0].y);
        return match op {
            BoolOp::Union => {
                if a_in_b {
                    vec![clip.to_vec()]
                } else if b_in_a {
                    vec![subject.to_vec()]
                } else {
                    vec![subject.to_vec(), clip.to_vec()]
                }
            }
            BoolOp::Intersection => {
                if a_in_b {
                    vec![subject.to_vec()]
                } else if b_in_a {
                    vec![clip.to_vec()]
                } else {
                    Vec::new()
                }
            }
            BoolOp::Difference => {
                if a_in_b {
                    Vec::new()
                } else if b_in_a {
                    // 洞环取顺时针方向
                    let mut hole = clip.to_vec();
                    hole.reverse();
                    vec![subject.to_vec(), hole]
                } else {
                    vec![subject.to_vec()]
                }
            }
        };
    }

    // 按边序与边内参数展开两侧顶点序列
    let mut arena: Vec<GhVertex> = Vec::new();
    let mut order: Vec<usize> = (0..crossings.len()).collect();

    let mut subject_ids = vec![usize::MAX; crossings.len()];
    let subject_list = {
        order.sort_by(|&x, &y| {
            crossings[x]
                .edge_a
                .cmp(&crossings[y].edge_a)
                .then(crossings[x].alpha_a.total_cmp(&crossings[y].alpha_a))
        });
        let mut list = Vec::new();
        let mut cursor = 0;
        for (i, point) in subject.iter().enumerate() {
            list.push((*point, None));
            while cursor < order.len() && crossings[order[cursor]].edge_a == i {
                list.push((crossings[order[cursor]].point, Some(order[cursor])));
                cursor += 1;
            }
        }
        list
    };
    let subject_head = build_list(&mut arena, &subject_list, &mut subject_ids);

    let mut clip_ids = vec![usize::MAX; crossings.len()];
    let clip_list = {
        order.sort_by(|&x, &y| {
            crossings[x]
                .edge_b
                .cmp(&crossings[y].edge_b)
                .then(crossings[x].alpha_b.total_cmp(&crossings[y].alpha_b))
        });
        let mut list = Vec::new();
        let mut cursor = 0;
        for (j, point) in clip.iter().enumerate() {
            list.push((*point, None));
            while cursor < order.len() && crossings[order[cursor]].edge_b == j {
                list.push((crossings[order[cursor]].point, Some(order[cursor])));
                cursor += 1;
            }
        }
        list
    };
    let clip_head = build_list(&mut arena, &clip_list, &mut clip_ids);

    for k in 0..crossings.len() {
        let s = subject_ids[k];
        let c = clip_ids[k];
        arena[s].neighbor = c;
        arena[c].neighbor = s;
    }

    // 进出标记：从各自首顶点的内外状态出发交替
    let (invert_subject, invert_clip) = match op {
        BoolOp::Intersection => (false, false),
        BoolOp::Union => (true, true),
        BoolOp::Difference => (true, false),
    };
    mark_entries(
        &mut arena,
        subject_head,
        point_in_ring(clip, subject[0].x, subject[0].y),
        invert_subject,
    );
    mark_entries(
        &mut arena,
        clip_head,
        point_in_ring(subject, clip[0].x, clip[0].y),
        invert_clip,
    );

    // 遍历生成结果环
    let mut rings = Vec::new();
    for start in subject_ids.iter().copied() {
        if arena[start].visited || !arena[start].intersect {
            continue;
        }
        let mut ring = vec![arena[start].point];
        let mut current = start;
        loop {
            arena[current].visited = true;
            let neighbor = arena[current].neighbor;
            if neighbor != usize::MAX {
                arena[neighbor].visited = true;
            }
            let forward = arena[current].entry;
            loop {
                current = if forward {
                    arena[current].next
                } else {
                    arena[current].prev
                };
                ring.push(arena[current].point);
                if arena[current].intersect {
                    break;
                }
            }
            if current == start || arena[current].neighbor == start {
                ring.pop();
                break;
            }
            arena[current].visited = true;
            current = arena[current].neighbor;
        }
        // 容差内重合的相邻顶点只留一个
        ring.dedup_by(|a, b| (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon);
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }
    rings
}

/// 把 (点, 穿越编号) 序列装入环形双向链表
fn build_list(
    arena: &mut Vec<GhVertex>,
    items: &[(XYZ, Option<usize>)],
    ids: &mut [usize],
) -> usize {
    let base = arena.len();
    let n = items.len();
    for (offset, (point, crossing)) in items.iter().enumerate() {
        let index = base + offset;
        arena.push(GhVertex {
            point: *point,
            next: base + (offset + 1) % n,
            prev: base + (offset + n - 1) % n,
            neighbor: usize::MAX,
            intersect: crossing.is_some(),
            entry: false,
            visited: false,
        });
        if let Some(k) = crossing {
            ids[*k] = index;
        }
    }
    base
}

/// 沿链表为穿越点交替标记进 / 出
fn mark_entries(arena: &mut [GhVertex], head: usize, first_inside: bool, invert: bool) {
    let mut status = !first_inside;
    let mut current = head;
    loop {
        if arena[current].intersect {
            arena[current].entry = status ^ invert;
            status = !status;
        }
        current = arena[current].next;
        if current == head {
            break;
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::GeodesyFactory;
    use crate::shape::{create_polygon, create_polyline};

    fn cart() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::web_mercator())
    }

    fn wgs84() -> Arc<CoordinateReference> {
        Arc::new(CoordinateReference::wgs84())
    }

    fn square(r: &Arc<CoordinateReference>, x0: f64, y0: f64, size: f64) -> Shape {
        Shape::Polygon(create_polygon(
            r,
            vec![
                XYZ::new_2d(x0, y0),
                XYZ::new_2d(x0 + size, y0),
                XYZ::new_2d(x0 + size, y0 + size),
                XYZ::new_2d(x0, y0 + size),
            ],
        ))
    }

    fn shape_area(r: &Arc<CoordinateReference>, shape: &Shape) -> f64 {
        let g = GeodesyFactory::create_geodesy(r);
        match shape {
            Shape::ComplexPolygon(cp) => {
                // 各环带符号面积的和：顺时针洞环为负
                cp.polygons()
                    .iter()
                    .map(|p| p.signed_area_2d())
                    .sum::<f64>()
                    .abs()
            }
            other => g.area(other).unwrap(),
        }
    }

    #[test]
    fn test_factory_model_guards() {
        assert!(TopologyFactory::create_cartesian_topology(&cart()).is_ok());
        assert!(TopologyFactory::create_cartesian_topology(&wgs84()).is_err());
        assert!(matches!(
            TopologyFactory::create_ellipsoidal_topology(&wgs84())
                .unwrap()
                .model(),
            GeodesyModel::Ellipsoidal { .. }
        ));

        assert!(ConstructiveGeometryFactory::create_cartesian(&cart()).is_ok());
        assert!(ConstructiveGeometryFactory::create_spherical(&cart()).is_err());
        assert!(matches!(
            ConstructiveGeometryFactory::create_ellipsoidal(&wgs84())
                .unwrap()
                .model(),
            GeodesyModel::Ellipsoidal { .. }
        ));
    }

    #[test]
    fn test_crossing_polylines_single_intersection() {
        // 设计场景: 两条恰有一个交点的折线
        let r = cart();
        let topology = Topology::new(&r);
        let a = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(10.0, 10.0)],
        ));
        let b = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 10.0), XYZ::new_2d(10.0, 0.0)],
        ));
        let records = topology.calculate_intersections(&a, &b).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].point.x() - 5.0).abs() < 1e-12);
        assert!((records[0].point.y() - 5.0).abs() < 1e-12);
        assert_eq!(records[0].first_index, 0);
        assert_eq!(records[0].second_index, 0);
        assert_eq!(
            records[0].first_segment,
            (XYZ::new_2d(0.0, 0.0), XYZ::new_2d(10.0, 10.0))
        );
        assert_eq!(
            records[0].second_segment,
            (XYZ::new_2d(0.0, 10.0), XYZ::new_2d(10.0, 0.0))
        );
    }

    #[test]
    fn test_bounds_operand_reports_segment_endpoints() {
        // 范围盒参与交点计算时，记录给出其边界边的实际端点
        let r = cart();
        let topology = Topology::new(&r);
        let a = Shape::Bounds(Bounds::new_2d(r.clone(), 0.0, 4.0, 0.0, 4.0));
        let b = square(&r, 2.0, 2.0, 4.0);
        let records = topology.calculate_intersections(&a, &b).unwrap();
        assert_eq!(records.len(), 2);

        // (2,4): 范围盒上边与正方形左边
        assert_eq!((records[0].point.x(), records[0].point.y()), (2.0, 4.0));
        assert_eq!(
            records[0].first_segment,
            (XYZ::new_2d(4.0, 4.0), XYZ::new_2d(0.0, 4.0))
        );
        assert_eq!(
            records[0].second_segment,
            (XYZ::new_2d(2.0, 6.0), XYZ::new_2d(2.0, 2.0))
        );

        // (4,2): 范围盒右边与正方形下边
        assert_eq!((records[1].point.x(), records[1].point.y()), (4.0, 2.0));
        assert_eq!(
            records[1].first_segment,
            (XYZ::new_2d(4.0, 0.0), XYZ::new_2d(4.0, 4.0))
        );
        assert_eq!(
            records[1].second_segment,
            (XYZ::new_2d(2.0, 2.0), XYZ::new_2d(6.0, 2.0))
        );
    }

    #[test]
    fn test_polygon_intersections_with_segment_indices() {
        let r = cart();
        let topology = Topology::new(&r);
        let a = square(&r, 0.0, 0.0, 4.0);
        let b = square(&r, 2.0, 2.0, 4.0);
        let records = topology.calculate_intersections(&a, &b).unwrap();
        assert_eq!(records.len(), 2);
        // 字典序：(2,4) 在 (4,2) 之前
        assert_eq!(
            (records[0].point.x(), records[0].point.y()),
            (2.0, 4.0)
        );
        assert_eq!(
            (records[1].point.x(), records[1].point.y()),
            (4.0, 2.0)
        );
    }

    #[test]
    fn test_disjoint_no_intersections() {
        let r = cart();
        let topology = Topology::new(&r);
        let a = square(&r, 0.0, 0.0, 1.0);
        let b = square(&r, 5.0, 5.0, 1.0);
        assert!(topology.calculate_intersections(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn test_collinear_overlap_resolves_to_shared_endpoints() {
        // 共线重叠区间解析为区间的两个端点
        let r = cart();
        let topology = Topology::new(&r);
        let a = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(10.0, 0.0)],
        ));
        let b = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(5.0, 0.0), XYZ::new_2d(15.0, 0.0)],
        ));
        let records = topology.calculate_intersections(&a, &b).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].point.x(), records[0].point.y()), (5.0, 0.0));
        assert_eq!((records[1].point.x(), records[1].point.y()), (10.0, 0.0));
    }

    #[test]
    fn test_collinear_endpoint_touch_single_record() {
        // 共线且仅端点相触：重叠区间退化为一个点
        let r = cart();
        let topology = Topology::new(&r);
        let a = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(1.0, 0.0)],
        ));
        let b = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(1.0, 0.0), XYZ::new_2d(2.0, 0.0)],
        ));
        let records = topology.calculate_intersections(&a, &b).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!((records[0].point.x(), records[0].point.y()), (1.0, 0.0));
    }

    #[test]
    fn test_collinear_disjoint_no_records() {
        // 共线但区间不相交
        let r = cart();
        let topology = Topology::new(&r);
        let a = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(1.0, 0.0)],
        ));
        let b = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(3.0, 0.0), XYZ::new_2d(5.0, 0.0)],
        ));
        assert!(topology.calculate_intersections(&a, &b).unwrap().is_empty());
    }

    #[test]
    fn test_great_circle_intersection() {
        // 赤道与 45E 经线在 (45, 0) 相交
        let r = wgs84();
        let topology = Topology::new(&r);
        let equator = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(90.0, 0.0)],
        ));
        let meridian = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(45.0, -10.0), XYZ::new_2d(45.0, 10.0)],
        ));
        let records = topology.calculate_intersections(&equator, &meridian).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].point.x() - 45.0).abs() < 1e-9);
        assert!(records[0].point.y().abs() < 1e-9);
    }

    #[test]
    fn test_conic_boundary_not_implemented() {
        let r = cart();
        let topology = Topology::new(&r);
        let circle = Shape::Circle(crate::shape::Circle::new(
            r.clone(),
            XYZ::new_2d(0.0, 0.0),
            1.0,
        ));
        let line = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(-2.0, 0.0), XYZ::new_2d(2.0, 0.0)],
        ));
        assert!(matches!(
            topology.calculate_intersections(&circle, &line),
            Err(GeoError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_boolean_overlapping_squares() {
        // [0,4]² 与 [2,6]²：并 28，交 4，差 12
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let a = square(&r, 0.0, 0.0, 4.0);
        let b = square(&r, 2.0, 2.0, 4.0);

        let union = cg.union(&[a.clone(), b.clone()]).unwrap();
        assert!((shape_area(&r, &union) - 28.0).abs() < 1e-9);

        let intersection = cg.intersection(&[a.clone(), b.clone()]).unwrap();
        assert!((shape_area(&r, &intersection) - 4.0).abs() < 1e-9);

        let difference = cg.difference(&[a, b]).unwrap();
        assert!((shape_area(&r, &difference) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_containment() {
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let outer = square(&r, 0.0, 0.0, 10.0);
        let inner = square(&r, 4.0, 4.0, 2.0);

        // 包含：并为外环，交为内环
        let union = cg.union(&[outer.clone(), inner.clone()]).unwrap();
        assert!((shape_area(&r, &union) - 100.0).abs() < 1e-9);
        let intersection = cg.intersection(&[outer.clone(), inner.clone()]).unwrap();
        assert!((shape_area(&r, &intersection) - 4.0).abs() < 1e-9);

        // 差得到带洞的复合多边形
        let difference = cg.difference(&[outer, inner]).unwrap();
        assert!(matches!(difference, Shape::ComplexPolygon(_)));
        assert!((shape_area(&r, &difference) - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_disjoint() {
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let a = square(&r, 0.0, 0.0, 2.0);
        let b = square(&r, 10.0, 10.0, 2.0);

        let union = cg.union(&[a.clone(), b.clone()]).unwrap();
        assert!(matches!(union, Shape::ComplexPolygon(_)));
        assert!((shape_area(&r, &union) - 8.0).abs() < 1e-9);

        let intersection = cg.intersection(&[a.clone(), b.clone()]).unwrap();
        assert!((shape_area(&r, &intersection)).abs() < 1e-12);

        let difference = cg.difference(&[a.clone(), b]).unwrap();
        assert!((shape_area(&r, &difference) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_chain_union() {
        // 三个依次搭接的正方形：16x3 - 4x2 = 40
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let shapes = [
            square(&r, 0.0, 0.0, 4.0),
            square(&r, 2.0, 2.0, 4.0),
            square(&r, 4.0, 4.0, 4.0),
        ];
        let union = cg.union(&shapes).unwrap();
        assert!((shape_area(&r, &union) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_bounds_operand() {
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let a = Shape::Bounds(Bounds::new_2d(r.clone(), 0.0, 4.0, 0.0, 4.0));
        let b = square(&r, 2.0, 2.0, 4.0);
        let intersection = cg.intersection(&[a, b]).unwrap();
        assert!((shape_area(&r, &intersection) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_rejects_unsupported_shapes() {
        let r = cart();
        let cg = ConstructiveGeometry::new(&r);
        let line = Shape::Polyline(create_polyline(
            &r,
            vec![XYZ::new_2d(0.0, 0.0), XYZ::new_2d(1.0, 0.0)],
        ));
        assert!(matches!(
            cg.union(&[line]),
            Err(GeoError::NotImplemented { .. })
        ));
        assert!(cg.union(&[]).is_err());
    }
}
