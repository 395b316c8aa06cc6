//! 异构形状列表

use std::sync::Arc;

use super::{Bounds, Shape};
use crate::error::{GeoError, GeoResult};
use crate::reference::CoordinateReference;

/// 异构形状的有序列表
///
/// 所有子形状必须与列表共享同一参考系。
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeList {
    /// 坐标参考系
    pub reference: Arc<CoordinateReference>,
    shapes: Vec<Shape>,
}

impl ShapeList {
    /// 创建形状列表
    ///
    /// 子形状参考系与列表不一致时为契约违规。
    pub fn new(reference: Arc<CoordinateReference>, shapes: Vec<Shape>) -> GeoResult<Self> {
        for shape in &shapes {
            if !shape.reference().equals(&reference) {
                return Err(GeoError::programming(
                    "形状列表的子形状参考系与列表不一致",
                ));
            }
        }
        Ok(Self { reference, shapes })
    }

    /// 子形状数量
    #[inline]
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// 子形状序列
    #[inline]
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// 按索引取子形状
    pub fn get_shape(&self, index: usize) -> GeoResult<&Shape> {
        GeoError::check_index("子形状", index, self.shapes.len())?;
        Ok(&self.shapes[index])
    }

    /// 追加子形状
    pub fn add_shape(&mut self, shape: Shape) -> GeoResult<()> {
        if !shape.reference().equals(&self.reference) {
            return Err(GeoError::programming(
                "形状列表的子形状参考系与列表不一致",
            ));
        }
        self.shapes.push(shape);
        Ok(())
    }

    /// 移除索引处的子形状
    pub fn remove_shape(&mut self, index: usize) -> GeoResult<Shape> {
        GeoError::check_index("子形状", index, self.shapes.len())?;
        Ok(self.shapes.remove(index))
    }

    /// 所有子形状范围的并集，空列表返回 `NoBounds`
    pub fn bounds(&self) -> GeoResult<Bounds> {
        let mut result: Option<Bounds> = None;
        for shape in &self.shapes {
            if let Ok(b) = shape.bounds() {
                match &mut result {
                    Some(acc) => acc.set_to_3d_union(&b),
                    None => result = Some(b),
                }
            }
        }
        result.ok_or_else(|| GeoError::no_bounds("空形状列表"))
    }

    /// 任一子形状包含即包含
    #[must_use]
    pub fn contains_2d_coordinates(&self, x: f64, y: f64) -> bool {
        self.shapes
            .iter()
            .any(|s| s.contains_2d_coordinates(x, y))
    }

    /// 整体二维平移
    pub fn translate_2d(&mut self, dx: f64, dy: f64) -> GeoResult<()> {
        for shape in &mut self.shapes {
            shape.translate_2d(dx, dy)?;
        }
        Ok(())
    }
}

// ============================================================================
// 测试
// ============================================================================
