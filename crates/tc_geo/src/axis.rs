//! 坐标轴定义
//!
//! 每个坐标参考系由有序的坐标轴列表组成。轴携带方向、取值范围、
//! 范围语义（精确边界或环绕）与计量单位。
//!
//! 环绕轴（经度）的归一化运算集中在 [`Axis::normalize`]，
//! 变换引擎依赖它把输出经度收敛到轴声明的 [min, max) 区间。

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::uom::UnitOfMeasure;

/// 轴方向枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AxisDirection {
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
    South,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
    Up,
    Down,
    GeocentricX,
    GeocentricY,
    GeocentricZ,
    ColumnPositive,
    ColumnNegative,
    RowPositive,
    RowNegative,
    DisplayRight,
    DisplayLeft,
    DisplayUp,
    DisplayDown,
}

/// 轴名称（在参考系内的角色）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisName {
    /// 第一水平轴（经度 / 东向 / X）
    X,
    /// 第二水平轴（纬度 / 北向 / Y）
    Y,
    /// 垂直轴（高程 / Z）
    Z,
}

/// 轴取值范围的语义
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMeaning {
    /// 精确边界，越界即越界
    Exact,
    /// 环绕轴，坐标按模运算回绕（经度）
    Wraparound,
}

/// 坐标轴
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    /// 缩写 (如 "Lon", "E", "X")
    pub abbreviation: String,
    /// 方向
    pub direction: AxisDirection,
    /// 范围语义
    pub range_meaning: RangeMeaning,
    /// 最小值（轴单位）
    pub minimum_value: f64,
    /// 最大值（轴单位）
    pub maximum_value: f64,
    /// 计量单位
    pub unit: Arc<UnitOfMeasure>,
}

impl Axis {
    // ========================================================================
    // 常用轴构造
    // ========================================================================

    /// 经度轴 [-180, 180)，单位：度
    #[must_use]
    pub fn longitude() -> Self {
        Self {
            abbreviation: "Lon".to_owned(),
            direction: AxisDirection::East,
            range_meaning: RangeMeaning::Wraparound,
            minimum_value: -180.0,
            maximum_value: 180.0,
            unit: Arc::new(UnitOfMeasure::degree()),
        }
    }

    /// 纬度轴 [-90, 90]，单位：度
    #[must_use]
    pub fn latitude() -> Self {
        Self {
            abbreviation: "Lat".to_owned(),
            direction: AxisDirection::North,
            range_meaning: RangeMeaning::Exact,
            minimum_value: -90.0,
            maximum_value: 90.0,
            unit: Arc::new(UnitOfMeasure::degree()),
        }
    }

    /// 东向轴，单位：米
    #[must_use]
    pub fn easting() -> Self {
        Self {
            abbreviation: "E".to_owned(),
            direction: AxisDirection::East,
            range_meaning: RangeMeaning::Exact,
            minimum_value: f64::NEG_INFINITY,
            maximum_value: f64::INFINITY,
            unit: Arc::new(UnitOfMeasure::meter()),
        }
    }

    /// 北向轴，单位：米
    #[must_use]
    pub fn northing() -> Self {
        Self {
            abbreviation: "N".to_owned(),
            direction: AxisDirection::North,
            range_meaning: RangeMeaning::Exact,
            minimum_value: f64::NEG_INFINITY,
            maximum_value: f64::INFINITY,
            unit: Arc::new(UnitOfMeasure::meter()),
        }
    }

    /// 椭球高轴，单位：米
    #[must_use]
    pub fn ellipsoidal_height() -> Self {
        Self {
            abbreviation: "h".to_owned(),
            direction: AxisDirection::Up,
            range_meaning: RangeMeaning::Exact,
            minimum_value: f64::NEG_INFINITY,
            maximum_value: f64::INFINITY,
            unit: Arc::new(UnitOfMeasure::meter()),
        }
    }

    /// 地心 X 轴，单位：米
    #[must_use]
    pub fn geocentric_x() -> Self {
        Self::geocentric(AxisDirection::GeocentricX, "X")
    }

    /// 地心 Y 轴，单位：米
    #[must_use]
    pub fn geocentric_y() -> Self {
        Self::geocentric(AxisDirection::GeocentricY, "Y")
    }

    /// 地心 Z 轴，单位：米
    #[must_use]
    pub fn geocentric_z() -> Self {
        Self::geocentric(AxisDirection::GeocentricZ, "Z")
    }

    fn geocentric(direction: AxisDirection, abbreviation: &str) -> Self {
        Self {
            abbreviation: abbreviation.to_owned(),
            direction,
            range_meaning: RangeMeaning::Exact,
            minimum_value: f64::NEG_INFINITY,
            maximum_value: f64::INFINITY,
            unit: Arc::new(UnitOfMeasure::meter()),
        }
    }

    /// 任意笛卡尔轴
    #[must_use]
    pub fn cartesian(
        abbreviation: &str,
        direction: AxisDirection,
        unit: Arc<UnitOfMeasure>,
    ) -> Self {
        Self {
            abbreviation: abbreviation.to_owned(),
            direction,
            range_meaning: RangeMeaning::Exact,
            minimum_value: f64::NEG_INFINITY,
            maximum_value: f64::INFINITY,
            unit,
        }
    }

    // ========================================================================
    // 运算
    // ========================================================================

    /// 是否为环绕轴
    #[inline]
    #[must_use]
    pub fn is_wraparound(&self) -> bool {
        self.range_meaning == RangeMeaning::Wraparound
    }

    /// 把坐标值归一化到轴范围
    ///
    /// 环绕轴按模回绕到 [min, max)，精确轴原样返回。
    #[inline]
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        if !self.is_wraparound() {
            return value;
        }
        let span = self.maximum_value - self.minimum_value;
        if span <= 0.0 || !value.is_finite() {
            return value;
        }
        self.minimum_value + (value - self.minimum_value).rem_euclid(span)
    }
}

impl PartialEq for Axis {
    fn eq(&self, other: &Self) -> bool {
        self.abbreviation == other.abbreviation
            && self.direction == other.direction
            && self.range_meaning == other.range_meaning
            && self.minimum_value == other.minimum_value
            && self.maximum_value == other.maximum_value
            && *self.unit == *other.unit
    }
}

// ============================================================================
// 测试
// ============================================================================
