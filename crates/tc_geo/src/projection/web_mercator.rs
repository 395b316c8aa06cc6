//! Web Mercator 投影 (EPSG:3857)
//!
//! 也称为 Pseudo Mercator 或 Spherical Mercator。
//!
//! # 注意
//!
//! Web Mercator 将地球视为正球体（半径取 WGS84 长半轴），
//! 高纬度形变显著，仅用于显示与底图对齐，不用于测量。

use std::f64::consts::PI;

use crate::ellipsoid::Ellipsoid;

/// Web Mercator 使用的地球半径（等于 WGS84 长半轴）
pub const WEB_MERCATOR_RADIUS: f64 = Ellipsoid::WGS84.a;

/// Web Mercator 最大纬度 (度)
///
/// 对应 y = ±20037508.34... 米
pub const WEB_MERCATOR_MAX_LAT: f64 = 85.051_128_779;

/// Web Mercator 世界范围 (米)
pub const WEB_MERCATOR_MAX_EXTENT: f64 = PI * WEB_MERCATOR_RADIUS;

/// 地理坐标 -> Web Mercator
///
/// 纬度自动裁剪到投影有效范围。
///
/// # Arguments
/// - `lon`: 经度 (度)
/// - `lat`: 纬度 (度)
#[must_use]
pub fn geographic_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_MAX_LAT);

    let x = WEB_MERCATOR_RADIUS * lon.to_radians();
    let lat_rad = lat.to_radians();
    let y = WEB_MERCATOR_RADIUS * ((PI / 4.0 + lat_rad / 2.0).tan()).ln();

    (x, y)
}

/// Web Mercator -> 地理坐标
///
/// # Arguments
/// - `x`: 东向坐标 (米)
/// - `y`: 北向坐标 (米)
#[must_use]
pub fn web_mercator_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WEB_MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (y / WEB_MERCATOR_RADIUS).exp().atan() - PI / 2.0).to_degrees();

    (lon, lat)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_mercator_roundtrip() {
        let (x, y) = geographic_to_web_mercator(116.0, 40.0);
        let (lon, lat) = web_mercator_to_geographic(x, y);

        assert!((lon - 116.0).abs() < 1e-9);
        assert!((lat - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_origin() {
        let (x, y) = geographic_to_web_mercator(0.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
    }

    #[test]
    fn test_web_mercator_clamp_latitude() {
        // 超出范围的纬度被裁剪
        let (_, y1) = geographic_to_web_mercator(0.0, 90.0);
        let (_, y2) = geographic_to_web_mercator(0.0, WEB_MERCATOR_MAX_LAT);
        assert!((y1 - y2).abs() < 1e-6);
    }

    #[test]
    fn test_web_mercator_extent() {
        let (x_max, _) = geographic_to_web_mercator(180.0, 0.0);
        assert!((x_max - WEB_MERCATOR_MAX_EXTENT).abs() < 1.0);

        let (_, y_max) = geographic_to_web_mercator(0.0, WEB_MERCATOR_MAX_LAT);
        assert!((y_max - WEB_MERCATOR_MAX_EXTENT).abs() < 1.0);
    }
}
