//! 大地坐标与地心直角坐标 (ECEF) 互转
//!
//! 正向为闭式公式，逆向使用 Bowring 初值加定点迭代，
//! 地表附近精度远高于毫米级。

use crate::ellipsoid::Ellipsoid;

/// 大地坐标 -> 地心直角坐标
///
/// # Arguments
/// - `lon`: 经度 (度)
/// - `lat`: 纬度 (度)
/// - `height`: 椭球高 (米)
///
/// # Returns
/// (x, y, z) 地心坐标 (米)
#[must_use]
pub fn geodetic_to_geocentric(ell: &Ellipsoid, lon: f64, lat: f64, height: f64) -> (f64, f64, f64) {
    let lon_rad = lon.to_radians();
    let lat_rad = lat.to_radians();
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let n = ell.prime_vertical_radius(lat_rad);
    let e2 = ell.e2();

    let x = (n + height) * cos_lat * cos_lon;
    let y = (n + height) * cos_lat * sin_lon;
    let z = (n * (1.0 - e2) + height) * sin_lat;

    (x, y, z)
}

/// 地心直角坐标 -> 大地坐标
///
/// # Returns
/// (lon, lat, height) 经度/纬度 (度)，椭球高 (米)
#[must_use]
pub fn geocentric_to_geodetic(ell: &Ellipsoid, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let e2 = ell.e2();
    let p = (x * x + y * y).sqrt();

    // 旋转轴上的点：经度取零，纬度按 z 符号取极点
    if p < 1e-9 {
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        return (0.0, lat, z.abs() - ell.b());
    }

    let lon = y.atan2(x);

    // Bowring 初值
    let theta = (z * ell.a).atan2(p * ell.b());
    let (sin_t, cos_t) = theta.sin_cos();
    let ep2 = ell.ep2();
    let mut lat = (z + ep2 * ell.b() * sin_t.powi(3)).atan2(p - e2 * ell.a * cos_t.powi(3));

    // 定点迭代收敛到机器精度
    let mut height = 0.0;
    for _ in 0..5 {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = ell.prime_vertical_radius(lat);
        height = if cos_lat.abs() > 1e-10 {
            p / cos_lat - n
        } else {
            z.abs() / sin_lat.abs() - n * (1.0 - e2)
        };
        let new_lat = z.atan2(p * (1.0 - e2 * n / (n + height)));
        if (new_lat - lat).abs() < 1e-14 {
            lat = new_lat;
            break;
        }
        lat = new_lat;
    }

    (lon.to_degrees(), lat.to_degrees(), height)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator_prime_meridian() {
        let ell = Ellipsoid::WGS84;
        let (x, y, z) = geodetic_to_geocentric(&ell, 0.0, 0.0, 0.0);
        assert!((x - ell.a).abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!(z.abs() < 1e-6);
    }

    #[test]
    fn test_north_pole() {
        let ell = Ellipsoid::WGS84;
        let (x, y, z) = geodetic_to_geocentric(&ell, 0.0, 90.0, 0.0);
        assert!(x.abs() < 1e-6);
        assert!(y.abs() < 1e-6);
        assert!((z - ell.b()).abs() < 1e-6);

        let (_, lat, h) = geocentric_to_geodetic(&ell, x, y, z);
        assert!((lat - 90.0).abs() < 1e-9);
        assert!(h.abs() < 1e-3);
    }

    #[test]
    fn test_roundtrip() {
        let ell = Ellipsoid::WGS84;
        let cases = [
            (116.0, 40.0, 50.0),
            (-122.0, 37.0, 0.0),
            (151.2, -33.8, 120.0),
            (0.0, -89.9, 1000.0),
        ];
        for (lon, lat, h) in cases {
            let (x, y, z) = geodetic_to_geocentric(&ell, lon, lat, h);
            let (lon2, lat2, h2) = geocentric_to_geodetic(&ell, x, y, z);
            assert!((lon - lon2).abs() < 1e-9, "lon: {lon} vs {lon2}");
            assert!((lat - lat2).abs() < 1e-9, "lat: {lat} vs {lat2}");
            assert!((h - h2).abs() < 1e-4, "h: {h} vs {h2}");
        }
    }
}
