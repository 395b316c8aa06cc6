//! 数值容差配置
//!
//! 几何判定与迭代求解使用的容差阈值集中于此，
//! 通过参数注入传递，不使用全局可变状态。

use serde::{Deserialize, Serialize};

/// 数值容差配置
///
/// 包含几何计算与迭代求解中使用的容差阈值。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerance {
    /// 空间坐标容差（同单位下两坐标视为重合的阈值）
    pub spatial: f64,
    /// 角度容差 (弧度)
    pub angular: f64,
    /// 迭代收敛容差
    pub convergence: f64,
    /// 迭代次数上限
    pub max_iterations: usize,
    /// 面积最小值（低于此值视为零面积）
    pub min_area: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            spatial: 1e-9,
            angular: 1e-12,
            convergence: 1e-12,
            max_iterations: 100,
            min_area: 1e-12,
        }
    }
}

impl Tolerance {
    /// 创建保守配置（更严格的容差）
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            spatial: 1e-12,
            convergence: 1e-14,
            ..Default::default()
        }
    }

    /// 创建快速配置（更宽松的容差）
    #[must_use]
    pub fn fast() -> Self {
        Self {
            spatial: 1e-6,
            convergence: 1e-9,
            max_iterations: 30,
            ..Default::default()
        }
    }

    /// 判断空间值是否接近零
    #[inline]
    #[must_use]
    pub fn is_spatial_zero(&self, x: f64) -> bool {
        x.abs() < self.spatial
    }

    /// 判断两个坐标分量是否重合
    #[inline]
    #[must_use]
    pub fn coords_coincide(&self, ax: f64, ay: f64, bx: f64, by: f64) -> bool {
        (ax - bx).abs() < self.spatial && (ay - by).abs() < self.spatial
    }

    /// 判断迭代增量是否已收敛
    #[inline]
    #[must_use]
    pub fn is_converged(&self, delta: f64) -> bool {
        delta.abs() < self.convergence
    }

    /// 判断面积是否可视为零
    #[inline]
    #[must_use]
    pub fn is_zero_area(&self, area: f64) -> bool {
        area.abs() < self.min_area
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance() {
        let tol = Tolerance::default();
        assert_eq!(tol.max_iterations, 100);
        assert!((tol.convergence - 1e-12).abs() < 1e-20);
    }

    #[test]
    fn test_coords_coincide() {
        let tol = Tolerance::default();
        assert!(tol.coords_coincide(1.0, 2.0, 1.0 + 1e-12, 2.0));
        assert!(!tol.coords_coincide(1.0, 2.0, 1.1, 2.0));
    }

    #[test]
    fn test_profiles() {
        assert!(Tolerance::conservative().convergence < Tolerance::default().convergence);
        assert!(Tolerance::fast().convergence > Tolerance::default().convergence);
    }
}
