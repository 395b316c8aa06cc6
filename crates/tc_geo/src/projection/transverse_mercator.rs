//! 高精度横轴墨卡托投影（Krüger 级数）
//!
//! # 参考文献
//!
//! Karney, C. F. F. (2011). "Transverse Mercator with an accuracy of a few nanometers".
//! Journal of Geodesy, 85(8), 475-485.
//!
//! # 算法特点
//!
//! - 6 阶 Krüger 级数展开，中央子午线 ±40° 内精度亚毫米级
//! - 支持任意椭球体参数（UTM、任意中央子午线的自定义带）

use std::f64::consts::PI;

use super::math::{ang_diff, ang_normalize, sincosd, tauf, taupf};
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};

/// 横轴墨卡托投影参数
#[derive(Debug, Clone, PartialEq)]
pub struct TransverseMercatorParams {
    /// 椭球体
    pub ellipsoid: Ellipsoid,
    /// 中央子午线 (度)
    pub central_meridian: f64,
    /// 比例因子
    pub scale_factor: f64,
    /// 假东 (米)
    pub false_easting: f64,
    /// 假北 (米)
    pub false_northing: f64,
}

impl TransverseMercatorParams {
    /// 创建 UTM 带参数（WGS84 椭球）
    #[must_use]
    pub fn utm(zone: u8, north: bool) -> Self {
        Self::utm_with_ellipsoid(zone, north, Ellipsoid::WGS84)
    }

    /// 使用指定椭球体创建 UTM 带参数
    #[must_use]
    pub fn utm_with_ellipsoid(zone: u8, north: bool, ellipsoid: Ellipsoid) -> Self {
        let central_meridian = f64::from(zone) * 6.0 - 183.0;
        Self {
            ellipsoid,
            central_meridian,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if north { 0.0 } else { 10_000_000.0 },
        }
    }

    /// 自定义横轴墨卡托参数
    #[must_use]
    pub fn custom(
        ellipsoid: Ellipsoid,
        central_meridian: f64,
        scale_factor: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self {
            ellipsoid,
            central_meridian,
            scale_factor,
            false_easting,
            false_northing,
        }
    }
}

// ============================================================================
// 核心算法
// ============================================================================

/// 正向投影：地理坐标 -> 平面坐标
///
/// # Arguments
/// - `lon`: 经度 (度)
/// - `lat`: 纬度 (度)
///
/// # Errors
/// 纬度超出 [-90, 90] 时返回契约违规错误。
pub fn forward(params: &TransverseMercatorParams, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoError::programming(format!(
            "纬度 {lat} 超出范围 [-90, 90]"
        )));
    }

    let ell = &params.ellipsoid;
    let es = ell.e();
    let alpha = ell.krueger_alpha();
    let a1 = ell.krueger_a();

    let lon_diff = ang_diff(params.central_meridian, lon);
    let (sphi, cphi) = sincosd(lat);
    let (slam, clam) = sincosd(lon_diff);

    // 高斯-施赖伯坐标 (ξ', η')
    let (xip, etap) = if cphi == 0.0 {
        // 极点
        (if sphi > 0.0 { PI / 2.0 } else { -PI / 2.0 }, 0.0)
    } else {
        let tau = sphi / cphi;
        let taup = taupf(tau, es);
        let h = (taup * taup + clam * clam).sqrt();
        (taup.atan2(clam), (slam / h).asinh())
    };

    // Krüger 级数求和：ξ = ξ' + Σ αⱼ sin(2jξ') cosh(2jη')
    let mut xi = xip;
    let mut eta = etap;
    for (j, &a) in alpha.iter().enumerate() {
        let m = 2.0 * (j + 1) as f64;
        xi += a * (m * xip).sin() * (m * etap).cosh();
        eta += a * (m * xip).cos() * (m * etap).sinh();
    }

    let k0a = params.scale_factor * a1;
    Ok((
        k0a * eta + params.false_easting,
        k0a * xi + params.false_northing,
    ))
}

/// 逆向投影：平面坐标 -> 地理坐标
///
/// # Arguments
/// - `x`: 东向坐标 (米)
/// - `y`: 北向坐标 (米)
pub fn inverse(params: &TransverseMercatorParams, x: f64, y: f64) -> GeoResult<(f64, f64)> {
    let ell = &params.ellipsoid;
    let es = ell.e();
    let beta = ell.krueger_beta();
    let a1 = ell.krueger_a();

    let k0a = params.scale_factor * a1;
    if k0a == 0.0 {
        return Err(GeoError::programming("横轴墨卡托缩放常数为零"));
    }
    let xi = (y - params.false_northing) / k0a;
    let eta = (x - params.false_easting) / k0a;

    // 逆级数：ξ' = ξ - Σ βⱼ sin(2jξ) cosh(2jη)
    let mut xip = xi;
    let mut etap = eta;
    for (j, &b) in beta.iter().enumerate() {
        let m = 2.0 * (j + 1) as f64;
        xip -= b * (m * xi).sin() * (m * eta).cosh();
        etap -= b * (m * xi).cos() * (m * eta).sinh();
    }

    // 从高斯-施赖伯坐标恢复经纬度
    let s = etap.sinh();
    let c = xip.cos();
    let r = (s * s + c * c).sqrt();

    let (lon_diff, lat) = if r == 0.0 {
        (0.0, if xip > 0.0 { 90.0 } else { -90.0 })
    } else {
        let taup = xip.sin() / r;
        let tau = tauf(taup, es);
        (s.atan2(c).to_degrees(), tau.atan().to_degrees())
    };

    Ok((ang_normalize(lon_diff + params.central_meridian), lat))
}

// ============================================================================
// 测试
// ============================================================================
