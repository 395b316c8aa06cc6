//! TerraCarta Foundation Layer
//!
//! 轻量基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 (`TcError` / `TcResult`)
//! - [`tolerance`]: 数值容差配置
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **同步失败**: 所有错误在检测点抛出，不静默降级
//! 3. **零开销抽象**: release 模式下最小化运行时开销
//!
//! # 示例
//!
//! ```
//! use tc_foundation::{TcError, TcResult, ensure};
//!
//! fn check_fraction(f: f64) -> TcResult<()> {
//!     ensure!(f.is_finite(), TcError::invalid_input("插值系数必须是有限数"));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tolerance;

pub use error::{TcError, TcResult};
pub use tolerance::Tolerance;

/// 校验条件，不满足时提前返回错误
///
/// 错误值通过 `into()` 转换，可直接用于上层错误类型。
///
/// # 示例
///
/// ```
/// use tc_foundation::{TcError, TcResult, ensure};
///
/// fn validate_radius(r: f64) -> TcResult<()> {
///     ensure!(r > 0.0, TcError::out_of_range("radius", r, 0.0, f64::INFINITY));
///     Ok(())
/// }
/// assert!(validate_radius(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{TcError, TcResult};
    pub use crate::tolerance::Tolerance;
}
