//! 椭球面测地公式
//!
//! 反算与正算采用 Vincenty 迭代，迭代上限与收敛容差由注入的
//! [`Tolerance`] 给出；近对径点反算可能不收敛，调用方退回到
//! 平均半径上的球面公式。
//! 恒向线基于等量纬度与子午线弧长级数，面积换算到等积球。

use tc_foundation::Tolerance;

use crate::ellipsoid::Ellipsoid;

use super::spherical;

// ============================================================================
// Vincenty 反算 / 正算
// ============================================================================

/// Vincenty 反算：距离与两端初始方位角
///
/// 近对径点可能不收敛，此时返回 `None`。
#[must_use]
pub fn vincenty_inverse(
    ellipsoid: &Ellipsoid,
    tolerance: &Tolerance,
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
) -> Option<(f64, f64, f64)> {
    let b = ellipsoid.b();
    let f = ellipsoid.f;

    let l = lon2 - lon1;
    let u1 = ((1.0 - f) * lat1.tan()).atan();
    let u2 = ((1.0 - f) * lat2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut iterations = 0;
    let (mut sin_sigma, mut cos_sigma, mut sigma);
    let (mut sin_alpha, mut cos2_alpha, mut cos_2sigma_m);

    loop {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            // 重合点
            return Some((0.0, 0.0, 0.0));
        }
        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        cos_2sigma_m = if cos2_alpha.abs() < 1e-15 {
            // 赤道线
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        };
        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if tolerance.is_converged(lambda - lambda_prev) {
            break;
        }
        iterations += 1;
        if iterations >= tolerance.max_iterations {
            return None;
        }
    }

    let u_sq = cos2_alpha * ellipsoid.ep2();
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                        * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

    let distance = b * big_a * (sigma - delta_sigma);

    let (sin_lambda, cos_lambda) = lambda.sin_cos();
    let az1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
    let az2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);
    Some((
        distance,
        spherical::normalize_azimuth(az1),
        spherical::normalize_azimuth(az2),
    ))
}

/// Vincenty 正算：从起点沿初始方位角走给定距离
///
/// 返回 (经度, 纬度)。σ 迭代在距离有限时必然收敛，仍设上限防御。
#[must_use]
pub fn vincenty_direct(
    ellipsoid: &Ellipsoid,
    tolerance: &Tolerance,
    lon1: f64,
    lat1: f64,
    distance: f64,
    azimuth: f64,
) -> (f64, f64) {
    let b = ellipsoid.b();
    let f = ellipsoid.f;

    let (sin_az, cos_az) = azimuth.sin_cos();
    let u1 = ((1.0 - f) * lat1.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let sigma1 = u1.tan().atan2(cos_az);
    let sin_alpha = cos_u1 * sin_az;
    let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

    let u_sq = cos2_alpha * ellipsoid.ep2();
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance / (b * big_a);
    let mut cos_2sigma_m;
    let mut iterations = 0;
    loop {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        let sigma_prev = sigma;
        sigma = distance / (b * big_a) + delta_sigma;
        iterations += 1;
        if tolerance.is_converged(sigma - sigma_prev) || iterations >= tolerance.max_iterations {
            break;
        }
    }

    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    cos_2sigma_m = (2.0 * sigma1 + sigma).cos();

    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_az).atan2(
        (1.0 - f) * (sin_alpha * sin_alpha
            + (sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_az).powi(2))
        .sqrt(),
    );
    let lambda =
        (sin_sigma * sin_az).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_az);
    let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
    (lon1 + l, lat2)
}

// ============================================================================
// 恒向线
// ============================================================================

/// 椭球等量纬度 ψ
#[inline]
fn isometric_latitude(e: f64, lat: f64) -> f64 {
    lat.sin().atanh() - e * (e * lat.sin()).atanh()
}

/// 子午线弧长（从赤道到给定纬度，米）
#[must_use]
pub fn meridian_arc(ellipsoid: &Ellipsoid, lat: f64) -> f64 {
    let a = ellipsoid.a;
    let e2 = ellipsoid.e2();
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    a * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - 35.0 * e6 / 3072.0 * (6.0 * lat).sin())
}

/// 子午线弧长反解：给定弧长求纬度 (Newton 迭代)
fn meridian_arc_inverse(ellipsoid: &Ellipsoid, arc: f64) -> f64 {
    let mut lat = arc / ellipsoid.a;
    for _ in 0..5 {
        let m = meridian_arc(ellipsoid, lat);
        lat += (arc - m) / ellipsoid.meridional_radius(lat);
    }
    lat
}

/// 椭球恒向线反算：(距离, 方位角)
#[must_use]
pub fn rhumb_inverse(
    ellipsoid: &Ellipsoid,
    lon1: f64,
    lat1: f64,
    lon2: f64,
    lat2: f64,
) -> (f64, f64) {
    let e = ellipsoid.e();
    let dpsi = isometric_latitude(e, lat2) - isometric_latitude(e, lat1);
    let dlon = super::ang_diff_rad(lon1, lon2);
    let azimuth = spherical::normalize_azimuth(dlon.atan2(dpsi));

    let dm = meridian_arc(ellipsoid, lat2) - meridian_arc(ellipsoid, lat1);
    let distance = if dm.abs() > 1e-9 {
        // cos(az) 与 Δm 同号，商为正
        dm / azimuth.cos()
    } else {
        // 沿纬圈
        (ellipsoid.prime_vertical_radius(lat1) * lat1.cos() * dlon).abs()
    };
    (distance.abs(), azimuth)
}

/// 椭球恒向线正算：(经度, 纬度)
#[must_use]
pub fn rhumb_direct(
    ellipsoid: &Ellipsoid,
    lon1: f64,
    lat1: f64,
    distance: f64,
    azimuth: f64,
) -> (f64, f64) {
    let (sin_az, cos_az) = azimuth.sin_cos();
    if cos_az.abs() < 1e-12 {
        // 沿纬圈
        let lon2 = lon1
            + distance * sin_az.signum()
                / (ellipsoid.prime_vertical_radius(lat1) * lat1.cos());
        return (lon2, lat1);
    }
    let m2 = meridian_arc(ellipsoid, lat1) + distance * cos_az;
    let lat2 = meridian_arc_inverse(ellipsoid, m2);
    let e = ellipsoid.e();
    let dpsi = isometric_latitude(e, lat2) - isometric_latitude(e, lat1);
    let lon2 = lon1 + azimuth.tan() * dpsi;
    (lon2, lat2)
}

// ============================================================================
// 面积
// ============================================================================

/// 等积纬度：保持面积不变地映射到等积球
#[must_use]
pub fn authalic_latitude(ellipsoid: &Ellipsoid, lat: f64) -> f64 {
    let e = ellipsoid.e();
    if e == 0.0 {
        return lat;
    }
    let q = authalic_q(e, lat);
    let qp = authalic_q(e, std::f64::consts::FRAC_PI_2);
    (q / qp).clamp(-1.0, 1.0).asin()
}

fn authalic_q(e: f64, lat: f64) -> f64 {
    let s = lat.sin();
    (1.0 - e * e) * (s / (1.0 - e * e * s * s) - (1.0 / (2.0 * e)) * ((1.0 - e * s) / (1.0 + e * s)).ln())
}

/// 椭球多边形环面积：换算到等积球后套用球面梯形公式
#[must_use]
pub fn ring_area(ellipsoid: &Ellipsoid, ring: &[(f64, f64)]) -> f64 {
    if ellipsoid.is_sphere() {
        return spherical::ring_area(ring, ellipsoid.a);
    }
    let mapped: Vec<(f64, f64)> = ring
        .iter()
        .map(|&(lon, lat)| (lon, authalic_latitude(ellipsoid, lat)))
        .collect();
    spherical::ring_area(&mapped, ellipsoid.authalic_radius())
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DEG: f64 = std::f64::consts::PI / 180.0;

    fn tol() -> Tolerance {
        Tolerance::default()
    }

    #[test]
    fn test_vincenty_quarter_equator() {
        // 设计场景: (0,0) -> (90E,0) 约为赤道周长的四分之一
        let (d, az1, _) =
            vincenty_inverse(&Ellipsoid::WGS84, &tol(), 0.0, 0.0, 90.0 * DEG, 0.0).unwrap();
        let quarter = std::f64::consts::FRAC_PI_2 * Ellipsoid::WGS84.a;
        assert!((d - quarter).abs() < 1.0, "d = {d}");
        assert!((d - 10_018_754.17).abs() < 10.0);
        assert!((az1 - 90.0 * DEG).abs() < 1e-9);
    }

    #[test]
    fn test_vincenty_known_baseline() {
        // Flinders Peak -> Buninyong (Vincenty 原文测试基线, GDA 上的经典算例)
        // 这里用 WGS84 参数，结果与公开计算一致到厘米级
        let lat1 = -(37.0 + 57.0 / 60.0 + 3.72030 / 3600.0) * DEG;
        let lon1 = (144.0 + 25.0 / 60.0 + 29.52440 / 3600.0) * DEG;
        let lat2 = -(37.0 + 39.0 / 60.0 + 10.15610 / 3600.0) * DEG;
        let lon2 = (143.0 + 55.0 / 60.0 + 35.38390 / 3600.0) * DEG;
        let (d, _, _) =
            vincenty_inverse(&Ellipsoid::WGS84, &tol(), lon1, lat1, lon2, lat2).unwrap();
        assert!((d - 54_972.271).abs() < 0.05, "d = {d}");
    }

    #[test]
    fn test_vincenty_direct_roundtrip() {
        let (lon1, lat1) = (121.5 * DEG, 31.2 * DEG);
        let (lon2, lat2) =
            vincenty_direct(&Ellipsoid::WGS84, &tol(), lon1, lat1, 300_000.0, 60.0 * DEG);
        let (d, az1, _) =
            vincenty_inverse(&Ellipsoid::WGS84, &tol(), lon1, lat1, lon2, lat2).unwrap();
        assert!((d - 300_000.0).abs() < 1e-3);
        assert!((az1 - 60.0 * DEG).abs() < 1e-9);
    }

    #[test]
    fn test_vincenty_coincident() {
        let r = vincenty_inverse(
            &Ellipsoid::WGS84,
            &tol(),
            10.0 * DEG,
            20.0 * DEG,
            10.0 * DEG,
            20.0 * DEG,
        );
        assert_eq!(r, Some((0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_vincenty_near_antipodal_no_convergence() {
        // 近对径点是经典的不收敛区
        let r = vincenty_inverse(&Ellipsoid::WGS84, &tol(), 0.0, 0.0, 179.5 * DEG, 0.5 * DEG);
        assert!(r.is_none());
    }

    #[test]
    fn test_meridian_arc() {
        // WGS84 从赤道到极点的子午线象限约 10 001 965.7 m
        let quadrant = meridian_arc(&Ellipsoid::WGS84, std::f64::consts::FRAC_PI_2);
        assert!((quadrant - 10_001_965.73).abs() < 1.0, "quadrant = {quadrant}");

        let lat = meridian_arc_inverse(&Ellipsoid::WGS84, quadrant / 2.0);
        let back = meridian_arc(&Ellipsoid::WGS84, lat);
        assert!((back - quadrant / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rhumb_roundtrip() {
        let (lon1, lat1) = (5.0 * DEG, 50.0 * DEG);
        let (lon2, lat2) = rhumb_direct(&Ellipsoid::WGS84, lon1, lat1, 100_000.0, 30.0 * DEG);
        let (d, az) = rhumb_inverse(&Ellipsoid::WGS84, lon1, lat1, lon2, lat2);
        assert!((d - 100_000.0).abs() < 0.01, "d = {d}");
        assert!((az - 30.0 * DEG).abs() < 1e-9);
    }

    #[test]
    fn test_authalic_latitude_bounds() {
        // 等积纬度在赤道与极点处与大地纬度一致，中纬度略小
        assert_eq!(authalic_latitude(&Ellipsoid::WGS84, 0.0), 0.0);
        let pole = authalic_latitude(&Ellipsoid::WGS84, std::f64::consts::FRAC_PI_2);
        assert!((pole - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        let mid = authalic_latitude(&Ellipsoid::WGS84, 45.0 * DEG);
        assert!(mid < 45.0 * DEG);
        assert!(45.0 * DEG - mid < 0.2 * DEG);
    }

    #[test]
    fn test_ellipsoidal_area_small_quad() {
        // 赤道 1°x1° 四边形：约 12 364 km²
        let ring = [
            (0.0, 0.0),
            (1.0 * DEG, 0.0),
            (1.0 * DEG, 1.0 * DEG),
            (0.0, 1.0 * DEG),
        ];
        let area = ring_area(&Ellipsoid::WGS84, &ring);
        assert!(area > 1.2e10 && area < 1.25e10, "area = {area}");
    }
}
