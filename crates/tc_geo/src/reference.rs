//! 坐标参考系统与注册表
//!
//! [`CoordinateReference`] 注册后不可变；相等性由标识符加轴定义决定。
//! 注册表为进程级单例，注册走写锁（低频），查询走读锁（高频）。
//!
//! 常见 EPSG 代码（4326/4979/4978/3857/UTM 各带）在首次查询时按需合成
//! 并缓存，无需预注册。

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use regex::Regex;

use crate::axis::{Axis, AxisName};
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use crate::projection::GridProjection;
use crate::uom::UnitOfMeasure;
use crate::wkt;

// ============================================================================
// 坐标参考系统
// ============================================================================

/// 坐标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateType {
    /// 笛卡尔（平面、投影或地心）
    Cartesian,
    /// 大地（经纬度）
    Geodetic,
}

/// 坐标参考系统
///
/// 轴序固定为 (x, y[, z])；大地参考系中 x 为经度、y 为纬度。
#[derive(Debug, Clone)]
pub struct CoordinateReference {
    /// 唯一标识符 (如 "EPSG:4326")
    pub identifier: String,
    /// 显示名称
    pub name: String,
    /// 坐标类型
    pub coordinate_type: CoordinateType,
    /// 有序轴列表
    pub axes: Vec<Axis>,
    /// 大地基准椭球体（大地/投影/地心参考系携带）
    pub datum: Option<Ellipsoid>,
    /// 网格投影（投影参考系携带）
    pub projection: Option<GridProjection>,
}

impl CoordinateReference {
    // ========================================================================
    // 常用参考系构造
    // ========================================================================

    /// WGS84 大地参考系 (EPSG:4326)，二维
    #[must_use]
    pub fn wgs84() -> Self {
        Self {
            identifier: "EPSG:4326".to_string(),
            name: "WGS 84".to_string(),
            coordinate_type: CoordinateType::Geodetic,
            axes: vec![Axis::longitude(), Axis::latitude()],
            datum: Some(Ellipsoid::WGS84),
            projection: None,
        }
    }

    /// WGS84 大地参考系 (EPSG:4979)，带椭球高
    #[must_use]
    pub fn wgs84_3d() -> Self {
        Self {
            identifier: "EPSG:4979".to_string(),
            name: "WGS 84 (3D)".to_string(),
            coordinate_type: CoordinateType::Geodetic,
            axes: vec![
                Axis::longitude(),
                Axis::latitude(),
                Axis::ellipsoidal_height(),
            ],
            datum: Some(Ellipsoid::WGS84),
            projection: None,
        }
    }

    /// WGS84 地心直角参考系 (EPSG:4978)
    #[must_use]
    pub fn geocentric() -> Self {
        Self {
            identifier: "EPSG:4978".to_string(),
            name: "WGS 84 (geocentric)".to_string(),
            coordinate_type: CoordinateType::Cartesian,
            axes: vec![
                Axis::geocentric_x(),
                Axis::geocentric_y(),
                Axis::geocentric_z(),
            ],
            datum: Some(Ellipsoid::WGS84),
            projection: None,
        }
    }

    /// Web Mercator 投影参考系 (EPSG:3857)
    #[must_use]
    pub fn web_mercator() -> Self {
        Self {
            identifier: "EPSG:3857".to_string(),
            name: "WGS 84 / Pseudo-Mercator".to_string(),
            coordinate_type: CoordinateType::Cartesian,
            axes: vec![Axis::easting(), Axis::northing()],
            datum: Some(Ellipsoid::WGS84),
            projection: Some(GridProjection::WebMercator),
        }
    }

    /// UTM 投影参考系 (EPSG:326xx / 327xx)
    #[must_use]
    pub fn utm(zone: u8, north: bool) -> Self {
        let code = if north {
            32600 + u32::from(zone)
        } else {
            32700 + u32::from(zone)
        };
        let hemi = if north { "N" } else { "S" };
        Self {
            identifier: format!("EPSG:{code}"),
            name: format!("WGS 84 / UTM zone {zone}{hemi}"),
            coordinate_type: CoordinateType::Cartesian,
            axes: vec![Axis::easting(), Axis::northing()],
            datum: Some(Ellipsoid::WGS84),
            projection: Some(GridProjection::utm(zone, north)),
        }
    }

    // ========================================================================
    // 查询
    // ========================================================================

    /// 相等性：标识符与轴定义完全一致
    #[must_use]
    pub fn equals(&self, other: &CoordinateReference) -> bool {
        self.identifier == other.identifier && self.axes == other.axes
    }

    /// 轴数量
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.axes.len()
    }

    /// 是否携带 Z 轴
    #[inline]
    #[must_use]
    pub fn has_z_axis(&self) -> bool {
        self.axes.len() >= 3
    }

    /// 按角色取轴
    #[must_use]
    pub fn axis(&self, name: AxisName) -> Option<&Axis> {
        let index = match name {
            AxisName::X => 0,
            AxisName::Y => 1,
            AxisName::Z => 2,
        };
        self.axes.get(index)
    }

    /// 是否为大地参考系
    #[inline]
    #[must_use]
    pub fn is_geodetic(&self) -> bool {
        self.coordinate_type == CoordinateType::Geodetic
    }
}

impl PartialEq for CoordinateReference {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

// ============================================================================
// 注册表
// ============================================================================

struct Registry {
    references: HashMap<String, Arc<CoordinateReference>>,
    local_counter: u64,
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        RwLock::new(Registry {
            references: HashMap::new(),
            local_counter: 0,
        })
    })
}

fn identifier_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // authority:code 形式，如 EPSG:4326、LOCAL:7、WKT:My CRS
            Regex::new(r"^[A-Za-z][A-Za-z0-9_]*:[A-Za-z0-9_. \-]+$").unwrap(),
            // OGC URN 形式，如 urn:ogc:def:crs:EPSG::4326
            Regex::new(r"^urn:ogc:def:crs:[A-Za-z0-9_]+::?[A-Za-z0-9_.]+$").unwrap(),
        ]
    })
}

/// 支持的参考系标识符模式（正则文本）
#[must_use]
pub fn supported_reference_identifier_patterns() -> Vec<String> {
    identifier_patterns()
        .iter()
        .map(|r| r.as_str().to_string())
        .collect()
}

/// 标识符模式检查，无副作用
#[must_use]
pub fn is_valid_reference_identifier(identifier: &str) -> bool {
    identifier_patterns().iter().any(|r| r.is_match(identifier))
}

/// URN 形式归一化为 authority:code 形式
fn canonical_identifier(identifier: &str) -> String {
    if let Some(rest) = identifier.strip_prefix("urn:ogc:def:crs:") {
        let mut parts = rest.split(':').filter(|p| !p.is_empty());
        if let (Some(authority), Some(code)) = (parts.next(), parts.next()) {
            return format!("{}:{}", authority.to_ascii_uppercase(), code);
        }
    }
    identifier.to_string()
}

/// 按需合成常见 EPSG 参考系
fn synthesize_epsg(code: u32) -> Option<CoordinateReference> {
    match code {
        4326 => Some(CoordinateReference::wgs84()),
        4979 => Some(CoordinateReference::wgs84_3d()),
        4978 => Some(CoordinateReference::geocentric()),
        3857 | 900_913 => Some(CoordinateReference::web_mercator()),
        32601..=32660 => Some(CoordinateReference::utm((code - 32600) as u8, true)),
        32701..=32760 => Some(CoordinateReference::utm((code - 32700) as u8, false)),
        _ => None,
    }
}

/// 按标识符查询参考系
///
/// 未注册且无法合成时返回 `InvalidReference`。
pub fn get_reference(identifier: &str) -> GeoResult<Arc<CoordinateReference>> {
    if !is_valid_reference_identifier(identifier) {
        return Err(GeoError::invalid_reference(identifier, "标识符格式非法"));
    }
    let canonical = canonical_identifier(identifier);

    if let Some(existing) = registry().read().references.get(&canonical) {
        return Ok(existing.clone());
    }

    // EPSG 代码按需合成
    if let Some(code_str) = canonical.strip_prefix("EPSG:") {
        if let Some(reference) = code_str.parse::<u32>().ok().and_then(synthesize_epsg) {
            let arc = Arc::new(reference);
            registry()
                .write()
                .references
                .entry(canonical)
                .or_insert_with(|| arc.clone());
            return Ok(arc);
        }
    }

    Err(GeoError::invalid_reference(identifier, "参考系未注册"))
}

/// 注册参考系
///
/// 相同标识符下已有完全一致的定义时为幂等空操作；
/// 定义冲突时为契约违规。
pub fn add_reference(reference: CoordinateReference) -> GeoResult<Arc<CoordinateReference>> {
    if !is_valid_reference_identifier(&reference.identifier) {
        return Err(GeoError::invalid_reference(
            &reference.identifier,
            "标识符格式非法",
        ));
    }
    let mut reg = registry().write();
    if let Some(existing) = reg.references.get(&reference.identifier) {
        if existing.equals(&reference) {
            return Ok(existing.clone());
        }
        return Err(GeoError::programming(format!(
            "参考系 {} 已注册且定义冲突",
            reference.identifier
        )));
    }
    let arc = Arc::new(reference);
    reg.references.insert(arc.identifier.clone(), arc.clone());
    Ok(arc)
}

/// 创建并注册平面笛卡尔参考系
///
/// 标识符缺省时派生为 `LOCAL:<n>`。
pub fn create_cartesian_reference(
    x_unit: UnitOfMeasure,
    y_unit: UnitOfMeasure,
    name: Option<&str>,
    identifier: Option<&str>,
) -> GeoResult<Arc<CoordinateReference>> {
    use crate::axis::AxisDirection;

    let identifier = match identifier {
        Some(id) => id.to_string(),
        None => {
            let mut reg = registry().write();
            reg.local_counter += 1;
            format!("LOCAL:{}", reg.local_counter)
        }
    };
    let reference = CoordinateReference {
        name: name.unwrap_or("Cartesian reference").to_string(),
        identifier,
        coordinate_type: CoordinateType::Cartesian,
        axes: vec![
            Axis::cartesian("X", AxisDirection::DisplayRight, Arc::new(x_unit)),
            Axis::cartesian("Y", AxisDirection::DisplayUp, Arc::new(y_unit)),
        ],
        datum: None,
        projection: None,
    };
    add_reference(reference)
}

/// 解析 WKT 文本并注册得到的参考系
///
/// `authority`/`code` 给定时覆盖 WKT 内的 AUTHORITY 节点。
pub fn parse_well_known_text(
    text: &str,
    authority: Option<&str>,
    code: Option<&str>,
) -> GeoResult<Arc<CoordinateReference>> {
    let mut reference = wkt::parse(text)?;
    if let (Some(authority), Some(code)) = (authority, code) {
        reference.identifier = format!("{authority}:{code}");
    }
    add_reference(reference)
}

// ============================================================================
// 测试
// ============================================================================
