//! 地理空间核心错误类型
//!
//! 所有错误为同步失败，在检测点抛出，绝不静默降级。
//! 基础层错误 (`tc_foundation::TcError`) 通过 `#[from]` 向下聚合。
//!
//! # 错误分类
//!
//! - **InvalidReference**: 未注册或格式非法的参考系标识符
//! - **WktParse**: WKT 文本解析失败（硬失败，不做尽力解析）
//! - **NoBounds**: 对无可计算范围的形状请求 bounds
//! - **OutOfBounds**: 索引访问器越界（多边形顶点、坐标轴）
//! - **NotImplemented**: 请求的 地球模型 × 操作 组合没有定义算法
//! - **Programming**: 调用方违反契约（参考系不匹配、维度不符、注册冲突）

use tc_foundation::TcError;
use thiserror::Error;

/// Geo 模块结果类型
pub type GeoResult<T> = Result<T, GeoError>;

/// 地理空间核心错误
#[derive(Error, Debug)]
pub enum GeoError {
    /// 无效的参考系标识符
    #[error("无效的坐标参考系: {identifier} ({reason})")]
    InvalidReference {
        /// 请求的标识符
        identifier: String,
        /// 失败原因
        reason: String,
    },

    /// WKT 解析失败
    #[error("WKT 解析失败 (位置 {position}): {message}")]
    WktParse {
        /// 出错位置（字符偏移）
        position: usize,
        /// 失败原因
        message: String,
    },

    /// 形状没有可计算的范围
    #[error("形状没有可计算的范围: {shape}")]
    NoBounds {
        /// 形状类别描述
        shape: &'static str,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    OutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 功能未实现
    #[error("功能未实现: {operation}")]
    NotImplemented {
        /// 缺失的 模型 × 操作 组合描述
        operation: String,
    },

    /// 调用方契约违规
    #[error("调用契约违规: {message}")]
    Programming {
        /// 违规说明
        message: String,
    },

    /// 基础层错误（向下聚合）
    #[error("基础层错误: {0}")]
    Foundation(#[from] TcError),
}

// ============================================================================
// 便捷构造函数
// ============================================================================

impl GeoError {
    /// 创建无效参考系错误
    #[inline]
    pub fn invalid_reference(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// 创建 WKT 解析错误
    #[inline]
    pub fn wkt_parse(position: usize, message: impl Into<String>) -> Self {
        Self::WktParse {
            position,
            message: message.into(),
        }
    }

    /// 创建无范围错误
    #[inline]
    pub fn no_bounds(shape: &'static str) -> Self {
        Self::NoBounds { shape }
    }

    /// 创建索引越界错误
    #[inline]
    pub fn out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 创建功能未实现错误
    #[inline]
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// 创建调用契约违规错误
    #[inline]
    pub fn programming(message: impl Into<String>) -> Self {
        Self::Programming {
            message: message.into(),
        }
    }

    /// 验证索引，越界时返回错误
    #[inline]
    pub fn check_index(index_type: &'static str, index: usize, len: usize) -> GeoResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::out_of_bounds(index_type, index, len))
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
    fn test_invalid_reference_message() {
        let err = GeoError::invalid_reference("EPSG:999999", "未注册");
        let msg = format!("{err}");
        assert!(msg.contains("EPSG:999999"));
        assert!(msg.contains("未注册"));
    }

    #[test]
    fn test_out_of_bounds() {
        let err = GeoError::out_of_bounds("多边形顶点", 5, 4);
        match &err {
            GeoError::OutOfBounds { index, len, .. } => {
                assert_eq!(*index, 5);
                assert_eq!(*len, 4);
            }
            _ => panic!("错误的错误类型"),
        }
    }

    #[test]
    fn test_check_index() {
        assert!(GeoError::check_index("顶点", 0, 1).is_ok());
        assert!(GeoError::check_index("顶点", 1, 1).is_err());
    }

    #[test]
    fn test_foundation_aggregation() {
        fn inner() -> GeoResult<()> {
            Err(TcError::invalid_input("测试"))?;
            Ok(())
        }
        match inner().unwrap_err() {
            GeoError::Foundation(TcError::InvalidInput { .. }) => {}
            _ => panic!("应聚合为 Foundation 变体"),
        }
    }

    #[test]
    fn test_programming_error() {
        let err = GeoError::programming("两点的参考系不一致");
        assert!(format!("{err}").contains("参考系"));
    }
}
