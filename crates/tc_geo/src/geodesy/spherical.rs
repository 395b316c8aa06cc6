//! 球面大圆与恒向线公式
//!
//! 本模块的自由函数一律以弧度收发经纬度，距离以米计，
//! 方位角归一化到 [0, 2π)。

use std::f64::consts::{FRAC_PI_4, TAU};

/// 方位角归一化到 [0, 2π)
#[inline]
pub(crate) fn normalize_azimuth(azimuth: f64) -> f64 {
    azimuth.rem_euclid(TAU)
}

/// 经度差归一化到 [-π, π]
#[inline]
fn normalize_lon_delta(delta: f64) -> f64 {
    (delta + std::f64::consts::PI).rem_euclid(TAU) - std::f64::consts::PI
}

/// 球面等角纬度（墨卡托纵坐标）
#[inline]
fn mercator_psi(lat: f64) -> f64 {
    (FRAC_PI_4 + lat / 2.0).tan().ln()
}

// ============================================================================
// 大圆
// ============================================================================

/// 半正矢大圆距离
#[must_use]
pub fn haversine(lon1: f64, lat1: f64, lon2: f64, lat2: f64, radius: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * radius * a.sqrt().asin()
}

/// 大圆初始方位角
#[must_use]
pub fn initial_bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlon = lon2 - lon1;
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_azimuth(y.atan2(x))
}

/// 大圆正算：从起点沿方位角走给定距离
///
/// 返回 (经度, 纬度)。
#[must_use]
pub fn destination(lon1: f64, lat1: f64, distance: f64, bearing: f64, radius: f64) -> (f64, f64) {
    let delta = distance / radius;
    let lat2 =
        (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos())
            .atan2(delta.cos() - lat1.sin() * lat2.sin());
    (normalize_lon_delta(lon2), lat2)
}

/// 大圆球面线性插值
///
/// fraction 超出 [0, 1] 时沿同一大圆外推。两端点重合时返回起点。
#[must_use]
pub fn interpolate_great_circle(
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
    fraction: f64,
) -> (f64, f64) {
    let delta = haversine(lon1, lat1, lon2, lat2, 1.0);
    if delta.sin().abs() < 1e-15 {
        return (lon1, lat1);
    }
    let a = ((1.0 - fraction) * delta).sin() / delta.sin();
    let b = (fraction * delta).sin() / delta.sin();

    let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
    let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);
    (lon, lat)
}

// ============================================================================
// 恒向线
// ============================================================================

/// 恒向线方位角
#[must_use]
pub fn rhumb_bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dpsi = mercator_psi(lat2) - mercator_psi(lat1);
    let dlon = normalize_lon_delta(lon2 - lon1);
    normalize_azimuth(dlon.atan2(dpsi))
}

/// 恒向线距离
#[must_use]
pub fn rhumb_distance(lon1: f64, lat1: f64, lon2: f64, lat2: f64, radius: f64) -> f64 {
    let dlat = lat2 - lat1;
    let dpsi = mercator_psi(lat2) - mercator_psi(lat1);
    let dlon = normalize_lon_delta(lon2 - lon1);
    // 东西向时 Δψ 退化，用起点纬圈尺度
    let q = if dpsi.abs() > 1e-12 {
        dlat / dpsi
    } else {
        lat1.cos()
    };
    (dlat * dlat + q * q * dlon * dlon).sqrt() * radius
}

/// 恒向线正算
#[must_use]
pub fn rhumb_destination(
    lon1: f64,
    lat1: f64,
    distance: f64,
    bearing: f64,
    radius: f64,
) -> (f64, f64) {
    let delta = distance / radius;
    let lat2 = lat1 + delta * bearing.cos();
    let dpsi = mercator_psi(lat2) - mercator_psi(lat1);
    let q = if dpsi.abs() > 1e-12 {
        (lat2 - lat1) / dpsi
    } else {
        lat1.cos()
    };
    let lon2 = lon1 + delta * bearing.sin() / q;
    (normalize_lon_delta(lon2), lat2)
}

// ============================================================================
// 面积与点线距离
// ============================================================================

/// 球面多边形环面积（梯形公式，无符号，平方米）
///
/// `ring` 为 (经度, 纬度) 弧度序列，首尾不必重复。
#[must_use]
pub fn ring_area(ring: &[(f64, f64)], radius: f64) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let mut total = 0.0;
    for i in 0..n {
        let prev = ring[(i + n - 1) % n];
        let next = ring[(i + 1) % n];
        total += normalize_lon_delta(next.0 - prev.0) * ring[i].1.sin();
    }
    (total * radius * radius / 2.0).abs()
}

/// 点到大圆弧的最近点
///
/// `clip` 为真时最近点限制在弧段内，否则允许落在大圆延长线上。
/// 返回 (经度, 纬度)。
#[must_use]
pub fn closest_point_on_arc(
    lon_p: f64,
    lat_p: f64,
    lon_a: f64,
    lat_a: f64,
    lon_b: f64,
    lat_b: f64,
    clip: bool,
) -> (f64, f64) {
    let delta_ap = haversine(lon_a, lat_a, lon_p, lat_p, 1.0);
    if delta_ap < 1e-15 {
        return (lon_p, lat_p);
    }
    let delta_ab = haversine(lon_a, lat_a, lon_b, lat_b, 1.0);
    if delta_ab < 1e-15 {
        return (lon_a, lat_a);
    }
    let theta_ap = initial_bearing(lon_a, lat_a, lon_p, lat_p);
    let theta_ab = initial_bearing(lon_a, lat_a, lon_b, lat_b);

    // 横向角距与沿线角距
    let cross = (delta_ap.sin() * (theta_ap - theta_ab).sin()).asin();
    let mut along = (delta_ap.cos() / cross.cos().max(1e-15)).clamp(-1.0, 1.0).acos();
    if (theta_ap - theta_ab).cos() < 0.0 {
        along = -along;
    }
    if clip {
        along = along.clamp(0.0, delta_ab);
    }
    destination(lon_a, lat_a, along, theta_ab, 1.0)
}

// ============================================================================
// 测试
// ============================================================================
