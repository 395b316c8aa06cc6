//! 纯 Rust 实现的网格投影
//!
//! 支持的投影类型：
//! - Web Mercator (EPSG:3857)
//! - 横轴墨卡托 / UTM (EPSG:326xx/327xx)，Krüger 级数，亚毫米精度
//!
//! 另提供大地坐标与地心直角坐标 (ECEF) 的互转，
//! 作为变换引擎的中间表示。

pub mod geocentric;
mod math;
pub mod transverse_mercator;
pub mod web_mercator;

pub use transverse_mercator::TransverseMercatorParams;
pub use web_mercator::{WEB_MERCATOR_MAX_EXTENT, WEB_MERCATOR_MAX_LAT, WEB_MERCATOR_RADIUS};

use crate::ellipsoid::Ellipsoid;
use crate::error::GeoResult;

/// 网格投影枚举（静态分发）
///
/// 使用 enum 而非 trait object，避免动态分发开销。
#[derive(Debug, Clone, PartialEq)]
pub enum GridProjection {
    /// Web Mercator（球面伪墨卡托）
    WebMercator,
    /// 横轴墨卡托（UTM 或自定义带）
    TransverseMercator(TransverseMercatorParams),
}

impl GridProjection {
    /// 创建 UTM 带投影
    #[must_use]
    pub fn utm(zone: u8, north: bool) -> Self {
        Self::TransverseMercator(TransverseMercatorParams::utm(zone, north))
    }

    /// 正向投影：地理坐标 (度) -> 平面坐标 (米)
    pub fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)> {
        match self {
            Self::WebMercator => Ok(web_mercator::geographic_to_web_mercator(lon, lat)),
            Self::TransverseMercator(params) => transverse_mercator::forward(params, lon, lat),
        }
    }

    /// 逆向投影：平面坐标 (米) -> 地理坐标 (度)
    pub fn inverse(&self, x: f64, y: f64) -> GeoResult<(f64, f64)> {
        match self {
            Self::WebMercator => Ok(web_mercator::web_mercator_to_geographic(x, y)),
            Self::TransverseMercator(params) => transverse_mercator::inverse(params, x, y),
        }
    }

    /// 投影基于的椭球体
    #[must_use]
    pub fn ellipsoid(&self) -> Ellipsoid {
        match self {
            // Web Mercator 按 WGS84 长半轴的球体处理
            Self::WebMercator => Ellipsoid::SPHERE_WGS84,
            Self::TransverseMercator(params) => params.ellipsoid,
        }
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_params() {
        let params = TransverseMercatorParams::utm(50, true);
        assert!((params.central_meridian - 117.0).abs() < 1e-10);
        assert!((params.scale_factor - 0.9996).abs() < 1e-10);
        assert!((params.false_easting - 500_000.0).abs() < 1e-10);
        assert!((params.false_northing - 0.0).abs() < 1e-10);

        let south = TransverseMercatorParams::utm(50, false);
        assert!((south.false_northing - 10_000_000.0).abs() < 1e-10);
    }

    #[test]
    fn test_grid_projection_roundtrip() {
        let proj = GridProjection::utm(50, true);
        let (x, y) = proj.forward(116.0, 40.0).unwrap();
        assert!(x > 400_000.0 && x < 600_000.0);
        assert!(y > 4_000_000.0 && y < 5_000_000.0);

        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon - 116.0).abs() < 1e-9);
        assert!((lat - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_web_mercator_variant() {
        let proj = GridProjection::WebMercator;
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-6 && y.abs() < 1e-6);
        assert!(proj.ellipsoid().is_sphere());
    }
}
