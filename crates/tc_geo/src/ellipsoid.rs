//! 参考椭球体定义
//!
//! 提供大地测量与投影所需的椭球体参数，内置 WGS84、GRS80、
//! 克拉克 1866、国际 1924 等常用椭球体。
//!
//! # 示例
//!
//! ```
//! use tc_geo::ellipsoid::Ellipsoid;
//!
//! let wgs84 = Ellipsoid::WGS84;
//! assert!((wgs84.b() - 6_356_752.314_245).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};

/// 地球参考椭球体
///
/// 以长半轴和扁率定义，其余参数按需派生。
/// `f == 0` 退化为球体，派生公式对此保持数值稳定。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// 长半轴 (m)
    pub a: f64,
    /// 扁率 (flattening)
    pub f: f64,
}

impl Ellipsoid {
    // ========================================================================
    // 预定义椭球体
    // ========================================================================

    /// WGS84 椭球体 (GPS 标准)
    ///
    /// - EPSG: 7030
    /// - 长半轴: 6378137.0 m
    /// - 扁率: 1/298.257223563
    pub const WGS84: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    /// GRS80 椭球体
    ///
    /// - EPSG: 7019
    /// - 长半轴: 6378137.0 m
    /// - 扁率: 1/298.257222101
    ///
    /// 注意：与 WGS84 极为相似，扁率微有差异
    pub const GRS80: Self = Self {
        a: 6_378_137.0,
        f: 1.0 / 298.257_222_101,
    };

    /// 克拉克 1866 椭球体 (NAD27 采用)
    ///
    /// - EPSG: 7008
    pub const CLARKE_1866: Self = Self {
        a: 6_378_206.4,
        f: 1.0 / 294.978_698_213_898,
    };

    /// 国际椭球体 1924 (Hayford)
    ///
    /// - EPSG: 7022
    pub const INTERNATIONAL_1924: Self = Self {
        a: 6_378_388.0,
        f: 1.0 / 297.0,
    };

    /// 以 WGS84 长半轴为半径的球体
    ///
    /// 用于 Web 墨卡托等球面投影
    pub const SPHERE_WGS84: Self = Self {
        a: 6_378_137.0,
        f: 0.0,
    };

    // ========================================================================
    // 构造方法
    // ========================================================================

    /// 从长半轴和扁率创建椭球体
    #[must_use]
    pub const fn new(a: f64, f: f64) -> Self {
        Self { a, f }
    }

    /// 从长半轴和短半轴创建椭球体
    #[must_use]
    pub fn from_semi_axes(a: f64, b: f64) -> Self {
        let f = (a - b) / a;
        Self { a, f }
    }

    /// 从长半轴和扁率倒数创建椭球体
    ///
    /// `inverse_flattening == 0` 约定为球体（WKT SPHEROID 惯例）。
    #[must_use]
    pub fn from_inverse_flattening(a: f64, inverse_flattening: f64) -> Self {
        if inverse_flattening == 0.0 {
            Self { a, f: 0.0 }
        } else {
            Self {
                a,
                f: 1.0 / inverse_flattening,
            }
        }
    }

    /// 从 EPSG 椭球体代码获取
    #[must_use]
    pub fn from_epsg(code: u32) -> Option<Self> {
        match code {
            7030 => Some(Self::WGS84),
            7019 => Some(Self::GRS80),
            7008 => Some(Self::CLARKE_1866),
            7022 => Some(Self::INTERNATIONAL_1924),
            _ => None,
        }
    }

    // ========================================================================
    // 派生参数（几何常量）
    // ========================================================================

    /// 短半轴 b = a(1-f)
    #[inline]
    #[must_use]
    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// 第一偏心率的平方 e² = 2f - f²
    #[inline]
    #[must_use]
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// 第一偏心率 e = √e²
    #[inline]
    #[must_use]
    pub fn e(&self) -> f64 {
        self.e2().sqrt()
    }

    /// 第二偏心率的平方 e'² = e²/(1-e²)
    #[inline]
    #[must_use]
    pub fn ep2(&self) -> f64 {
        let e2 = self.e2();
        e2 / (1.0 - e2)
    }

    /// 第三扁率 n = (a-b)/(a+b) = f/(2-f)
    ///
    /// Karney 级数展开的关键小量
    #[inline]
    #[must_use]
    pub fn n(&self) -> f64 {
        self.f / (2.0 - self.f)
    }

    /// 是否为球体
    #[inline]
    #[must_use]
    pub fn is_sphere(&self) -> bool {
        self.f == 0.0
    }

    /// 子午圈曲率半径（在纬度 φ 处）
    ///
    /// M = a(1-e²) / (1-e²sin²φ)^(3/2)
    #[inline]
    #[must_use]
    pub fn meridional_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        let e2 = self.e2();
        self.a * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5)
    }

    /// 卯酉圈曲率半径（在纬度 φ 处）
    ///
    /// N = a / √(1-e²sin²φ)
    #[inline]
    #[must_use]
    pub fn prime_vertical_radius(&self, lat_rad: f64) -> f64 {
        let sin_lat = lat_rad.sin();
        let e2 = self.e2();
        self.a / (1.0 - e2 * sin_lat * sin_lat).sqrt()
    }

    /// 全球平均半径 R = (2a+b)/3
    ///
    /// 球面近似计算（大圆距离、球面方位角）使用此半径。
    #[inline]
    #[must_use]
    pub fn global_mean_radius(&self) -> f64 {
        (2.0 * self.a + self.b()) / 3.0
    }

    /// 等积球半径 R_A = √(S/4π)
    ///
    /// 半径为 R_A 的球体与椭球体表面积相同，
    /// 椭球面多边形面积在此球上按球面盈余计算。
    #[must_use]
    pub fn authalic_radius(&self) -> f64 {
        (self.surface_area() / (4.0 * std::f64::consts::PI)).sqrt()
    }

    /// 椭球体表面积
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        let a = self.a;
        let e = self.e();

        if e < 1e-10 {
            4.0 * std::f64::consts::PI * a * a
        } else {
            2.0 * std::f64::consts::PI
                * a
                * a
                * (1.0 + ((1.0 - e * e) / e) * ((1.0 + e) / (1.0 - e)).ln() / 2.0)
        }
    }

    // ========================================================================
    // Karney 级数的预计算系数
    // ========================================================================

    /// 计算 Krüger α 系数（正向投影用）
    ///
    /// 返回 6 阶系数数组
    #[must_use]
    pub fn krueger_alpha(&self) -> [f64; 6] {
        let n = self.n();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        [
            // α₁
            n / 2.0 - (2.0 / 3.0) * n2 + (5.0 / 16.0) * n3 + (41.0 / 180.0) * n4
                - (127.0 / 288.0) * n5
                + (7891.0 / 37800.0) * n6,
            // α₂
            (13.0 / 48.0) * n2 - (3.0 / 5.0) * n3 + (557.0 / 1440.0) * n4 + (281.0 / 630.0) * n5
                - (1983433.0 / 1935360.0) * n6,
            // α₃
            (61.0 / 240.0) * n3 - (103.0 / 140.0) * n4
                + (15061.0 / 26880.0) * n5
                + (167603.0 / 181440.0) * n6,
            // α₄
            (49561.0 / 161280.0) * n4 - (179.0 / 168.0) * n5 + (6601661.0 / 7257600.0) * n6,
            // α₅
            (34729.0 / 80640.0) * n5 - (3418889.0 / 1995840.0) * n6,
            // α₆
            (212378941.0 / 319334400.0) * n6,
        ]
    }

    /// 计算 Krüger β 系数（逆向投影用）
    ///
    /// 返回 6 阶系数数组
    #[must_use]
    pub fn krueger_beta(&self) -> [f64; 6] {
        let n = self.n();
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;
        let n6 = n5 * n;

        [
            // β₁
            n / 2.0 - (2.0 / 3.0) * n2 + (37.0 / 96.0) * n3 - (1.0 / 360.0) * n4
                - (81.0 / 512.0) * n5
                + (96199.0 / 604800.0) * n6,
            // β₂
            (1.0 / 48.0) * n2 + (1.0 / 15.0) * n3 - (437.0 / 1440.0) * n4 + (46.0 / 105.0) * n5
                - (1118711.0 / 3870720.0) * n6,
            // β₃
            (17.0 / 480.0) * n3 - (37.0 / 840.0) * n4 - (209.0 / 4480.0) * n5
                + (5569.0 / 90720.0) * n6,
            // β₄
            (4397.0 / 161280.0) * n4 - (11.0 / 504.0) * n5 - (830251.0 / 7257600.0) * n6,
            // β₅
            (4583.0 / 161280.0) * n5 - (108847.0 / 3991680.0) * n6,
            // β₆
            (20648693.0 / 638668800.0) * n6,
        ]
    }

    /// 计算缩放常数 A
    ///
    /// A = a/(1+n) * (1 + n²/4 + n⁴/64 + n⁶/256 + ...)
    #[must_use]
    pub fn krueger_a(&self) -> f64 {
        let n = self.n();
        let n2 = n * n;
        let n4 = n2 * n2;
        let n6 = n4 * n2;
        let n8 = n4 * n4;

        (self.a / (1.0 + n)) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0 + (25.0 / 16384.0) * n8)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

impl std::fmt::Display for Ellipsoid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sphere() {
            write!(f, "Sphere(r={})", self.a)
        } else {
            write!(f, "Ellipsoid(a={}, f=1/{:.6})", self.a, 1.0 / self.f)
        }
    }
}

// ============================================================================
// 测试
// ============================================================================
