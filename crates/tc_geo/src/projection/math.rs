//! 投影计算的高精度数学辅助函数
//!
//! 共形纬度正逆转换取自 Karney (2011) 的公式编号。

/// e * atanh(e * x) 的稳定计算
#[inline]
pub fn eatanhe(x: f64, es: f64) -> f64 {
    if es > 0.0 {
        es * (es * x).atanh()
    } else if es < 0.0 {
        -es * (-es * x).atan()
    } else {
        0.0
    }
}

/// tan(φ) → tan(χ) 共形纬度正向转换 (Karney Eq. 7-9)
#[inline]
pub fn taupf(tau: f64, es: f64) -> f64 {
    let tau1 = (1.0 + tau * tau).sqrt();
    let sig = eatanhe(tau / tau1, es).sinh();
    (1.0 + sig * sig).sqrt() * tau - sig * tau1
}

/// tan(χ) → tan(φ) 共形纬度逆向转换 (Karney Eq. 19-21)
///
/// Newton 迭代求解，8 次以内收敛到机器精度。
pub fn tauf(taup: f64, es: f64) -> f64 {
    const MAX_ITER: usize = 8;
    // sqrt(f64::EPSILON) 的预计算值
    const TOL: f64 = 1.490_116_119_384_765_6e-8;

    let e2m = 1.0 - es * es;
    let mut tau = taup / e2m.sqrt();
    let stol = TOL * taup.abs().max(1.0);

    for _ in 0..MAX_ITER {
        let taupa = taupf(tau, es);
        let dtau = (taup - taupa) * (1.0 + e2m * tau * tau)
            / (e2m * (1.0 + tau * tau).sqrt() * (1.0 + taupa * taupa).sqrt());
        tau += dtau;
        if dtau.abs() < stol {
            break;
        }
    }
    tau
}

/// 角度归一化到 [-180, 180)
#[inline]
pub fn ang_normalize(x: f64) -> f64 {
    let mut x = x % 360.0;
    if x < -180.0 {
        x += 360.0;
    }
    if x >= 180.0 {
        x -= 360.0;
    }
    x
}

/// 经度差，归一化到 [-180, 180)
#[inline]
pub fn ang_diff(x: f64, y: f64) -> f64 {
    ang_normalize(y - x)
}

/// sin 和 cos 的度数版本（精确处理 90° 的整数倍）
pub fn sincosd(x: f64) -> (f64, f64) {
    let mut r = x % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    let q = (r / 90.0 + 0.5).floor() as i32;
    r -= 90.0 * f64::from(q);
    let r = r.to_radians();
    let (s, c) = r.sin_cos();

    match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    }
}
