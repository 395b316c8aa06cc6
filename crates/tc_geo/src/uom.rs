//! 量纲与计量单位
//!
//! 每个 [`UnitOfMeasure`] 隶属一个 [`QuantityKind`]（长度、角度等），
//! 并携带到该量纲标准单位的线性换算：`standard = value * multiplier + offset`。
//!
//! 单位注册表为进程级单例，显式调用 [`init_default_units`] 注入标准单位，
//! 之后只读查询。常用单位另有直接构造方法，不依赖注册表初始化顺序。

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

// ============================================================================
// 量纲
// ============================================================================

/// 量纲（物理量种类）
///
/// 量纲之间构成泛化链，例如 `GeodeticAngle -> Angle`。
/// 换算只允许在标准单位相同的量纲链内进行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityKind {
    /// 量纲名（链内唯一）
    pub name: String,
    /// 泛化父量纲
    pub generalization: Option<Arc<QuantityKind>>,
}

impl QuantityKind {
    /// 根量纲：长度
    #[must_use]
    pub fn length() -> Arc<Self> {
        static LENGTH: OnceLock<Arc<QuantityKind>> = OnceLock::new();
        LENGTH
            .get_or_init(|| {
                Arc::new(Self {
                    name: "Length".to_owned(),
                    generalization: None,
                })
            })
            .clone()
    }

    /// 根量纲：角度
    #[must_use]
    pub fn angle() -> Arc<Self> {
        static ANGLE: OnceLock<Arc<QuantityKind>> = OnceLock::new();
        ANGLE
            .get_or_init(|| {
                Arc::new(Self {
                    name: "Angle".to_owned(),
                    generalization: None,
                })
            })
            .clone()
    }

    /// 大地角度（经纬度专用，泛化自角度）
    #[must_use]
    pub fn geodetic_angle() -> Arc<Self> {
        static GEODETIC: OnceLock<Arc<QuantityKind>> = OnceLock::new();
        GEODETIC
            .get_or_init(|| {
                Arc::new(Self {
                    name: "GeodeticAngle".to_owned(),
                    generalization: Some(Self::angle()),
                })
            })
            .clone()
    }

    /// 判断本量纲是否为 `other` 的子类型（含自身）
    #[must_use]
    pub fn is_sub_type_of(&self, other: &QuantityKind) -> bool {
        if self.name == other.name {
            return true;
        }
        let mut cur = self.generalization.as_deref();
        while let Some(kind) = cur {
            if kind.name == other.name {
                return true;
            }
            cur = kind.generalization.as_deref();
        }
        false
    }

    /// 泛化链的根量纲名
    #[must_use]
    pub fn base_name(&self) -> &str {
        let mut cur = self;
        while let Some(kind) = cur.generalization.as_deref() {
            cur = kind;
        }
        &cur.name
    }
}

impl PartialEq for QuantityKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// ============================================================================
// 计量单位
// ============================================================================

/// 计量单位
///
/// 到标准单位的换算为线性：`standard = value * multiplier + offset`。
/// 标准单位本身 `multiplier == 1, offset == 0`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    /// 单位名
    pub name: String,
    /// 符号
    pub symbol: String,
    /// 所属量纲
    pub quantity_kind: Arc<QuantityKind>,
    /// 到标准单位的乘数
    pub conversion_multiplier: f64,
    /// 到标准单位的偏移
    pub conversion_offset: f64,
}

impl UnitOfMeasure {
    /// 创建单位
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        quantity_kind: Arc<QuantityKind>,
        conversion_multiplier: f64,
        conversion_offset: f64,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            quantity_kind,
            conversion_multiplier,
            conversion_offset,
        }
    }

    /// 米（长度标准单位）
    #[must_use]
    pub fn meter() -> Self {
        Self::new("Meter", "m", QuantityKind::length(), 1.0, 0.0)
    }

    /// 千米
    #[must_use]
    pub fn kilometer() -> Self {
        Self::new("Kilometer", "km", QuantityKind::length(), 1000.0, 0.0)
    }

    /// 英尺（国际英尺）
    #[must_use]
    pub fn foot() -> Self {
        Self::new("Foot", "ft", QuantityKind::length(), 0.3048, 0.0)
    }

    /// 弧度（角度标准单位）
    #[must_use]
    pub fn radian() -> Self {
        Self::new("Radian", "rad", QuantityKind::angle(), 1.0, 0.0)
    }

    /// 度（大地角度，标准单位仍为弧度）
    #[must_use]
    pub fn degree() -> Self {
        Self::new(
            "Degree",
            "deg",
            QuantityKind::geodetic_angle(),
            std::f64::consts::PI / 180.0,
            0.0,
        )
    }

    /// 换算到本量纲的标准单位
    #[inline]
    #[must_use]
    pub fn convert_to_standard(&self, value: f64) -> f64 {
        value * self.conversion_multiplier + self.conversion_offset
    }

    /// 从本量纲的标准单位换算回来
    #[inline]
    #[must_use]
    pub fn convert_from_standard(&self, value: f64) -> f64 {
        (value - self.conversion_offset) / self.conversion_multiplier
    }

    /// 换算到同量纲的另一单位
    ///
    /// 量纲不在同一泛化链内时返回契约违规错误。
    pub fn convert_to_unit(&self, value: f64, target: &UnitOfMeasure) -> GeoResult<f64> {
        if !self.quantity_kind.is_sub_type_of(&target.quantity_kind)
            && !target.quantity_kind.is_sub_type_of(&self.quantity_kind)
        {
            return Err(GeoError::programming(format!(
                "单位量纲不兼容: {} ({}) 无法换算到 {} ({})",
                self.name, self.quantity_kind.name, target.name, target.quantity_kind.name
            )));
        }
        Ok(target.convert_from_standard(self.convert_to_standard(value)))
    }

    /// 是否为角度类单位
    #[inline]
    #[must_use]
    pub fn is_angular(&self) -> bool {
        self.quantity_kind.is_sub_type_of(&QuantityKind::angle())
    }
}

impl PartialEq for UnitOfMeasure {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.quantity_kind == other.quantity_kind
            && self.conversion_multiplier == other.conversion_multiplier
            && self.conversion_offset == other.conversion_offset
    }
}

// ============================================================================
// 单位注册表
// ============================================================================

fn unit_registry() -> &'static RwLock<HashMap<String, Arc<UnitOfMeasure>>> {
    static REGISTRY: OnceLock<RwLock<HashMap<String, Arc<UnitOfMeasure>>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// 注入标准单位集（米、千米、英尺、弧度、度）
///
/// 幂等，可在进程启动时显式调用一次。
pub fn init_default_units() {
    let defaults = [
        UnitOfMeasure::meter(),
        UnitOfMeasure::kilometer(),
        UnitOfMeasure::foot(),
        UnitOfMeasure::radian(),
        UnitOfMeasure::degree(),
    ];
    let mut registry = unit_registry().write();
    for unit in defaults {
        registry
            .entry(unit.name.clone())
            .or_insert_with(|| Arc::new(unit));
    }
}

/// 按名称查询单位
pub fn get_unit_of_measure(name: &str) -> GeoResult<Arc<UnitOfMeasure>> {
    unit_registry()
        .read()
        .get(name)
        .cloned()
        .ok_or_else(|| GeoError::invalid_reference(name, "单位未注册"))
}

/// 注册单位
///
/// 同名且定义相同为幂等空操作，同名但定义冲突为契约违规。
pub fn add_unit_of_measure(unit: UnitOfMeasure) -> GeoResult<Arc<UnitOfMeasure>> {
    let mut registry = unit_registry().write();
    if let Some(existing) = registry.get(&unit.name) {
        if **existing == unit {
            return Ok(existing.clone());
        }
        return Err(GeoError::programming(format!(
            "单位 {} 已注册且定义不同",
            unit.name
        )));
    }
    let arc = Arc::new(unit);
    registry.insert(arc.name.clone(), arc.clone());
    Ok(arc)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_kind_chain() {
        let angle = QuantityKind::angle();
        let geodetic = QuantityKind::geodetic_angle();

        assert!(geodetic.is_sub_type_of(&angle));
        assert!(!angle.is_sub_type_of(&geodetic));
        assert_eq!(geodetic.base_name(), "Angle");
    }

    #[test]
    fn test_degree_to_radian() {
        let deg = UnitOfMeasure::degree();
        let rad = UnitOfMeasure::radian();

        let v = deg.convert_to_unit(180.0, &rad).unwrap();
        assert!((v - std::f64::consts::PI).abs() < 1e-12);

        let back = rad.convert_to_unit(v, &deg).unwrap();
        assert!((back - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_conversion() {
        let km = UnitOfMeasure::kilometer();
        let ft = UnitOfMeasure::foot();

        let v = km.convert_to_unit(1.0, &ft).unwrap();
        assert!((v - 3280.839_895).abs() < 1e-3);
    }

    #[test]
    fn test_incompatible_kinds() {
        let m = UnitOfMeasure::meter();
        let rad = UnitOfMeasure::radian();
        assert!(m.convert_to_unit(1.0, &rad).is_err());
    }

    #[test]
    fn test_registry_lifecycle() {
        init_default_units();
        init_default_units(); // 幂等

        let m = get_unit_of_measure("Meter").unwrap();
        assert_eq!(m.symbol, "m");
        assert!(get_unit_of_measure("Furlong").is_err());

        // 同定义重复注册为空操作
        assert!(add_unit_of_measure(UnitOfMeasure::meter()).is_ok());

        // 冲突定义被拒绝
        let fake = UnitOfMeasure::new("Meter", "m", QuantityKind::length(), 2.0, 0.0);
        assert!(add_unit_of_measure(fake).is_err());
    }

    #[test]
    fn test_unit_serialization() {
        let deg = UnitOfMeasure::degree();
        let json = serde_json::to_string(&deg).unwrap();
        let deserialized: UnitOfMeasure = serde_json::from_str(&json).unwrap();
        assert_eq!(deg, deserialized);
        assert_eq!(deserialized.quantity_kind.base_name(), "Angle");
    }
}
