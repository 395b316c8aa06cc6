//! TerraCarta 地理空间核心
//!
//! 提供坐标参考系统 (CRS)、大地测量、坐标变换、几何形状与拓扑运算。
//!
//! # 模块
//!
//! - `reference`: 坐标参考系与进程级注册表（含 WKT 解析入口）
//! - `axis` / `uom`: 坐标轴与计量单位模型
//! - `ellipsoid`: 参考椭球参数与派生量
//! - `geodesy`: 三种地球模型上的距离、方位角、插值与面积
//! - `projection`: 投影公式（横轴墨卡托、Web 墨卡托、地心换算）
//! - `transform`: 参考系对上的点与范围盒变换
//! - `shape`: 封闭的几何形状集合与工厂
//! - `topology`: 交点计算与布尔运算
//!
//! # 示例
//!
//! ```
//! use tc_geo::prelude::*;
//! use std::sync::Arc;
//!
//! // 椭球测地：赤道上四分之一周长
//! let wgs84 = Arc::new(CoordinateReference::wgs84());
//! let geodesy = GeodesyFactory::create_geodesy(&wgs84);
//! let p1 = Point::new_2d(wgs84.clone(), 0.0, 0.0);
//! let p2 = Point::new_2d(wgs84.clone(), 90.0, 0.0);
//! let d = geodesy.distance(&p1, &p2, LineType::ShortestDistance).unwrap();
//! assert!((d - 10_018_754.17).abs() < 10.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::doc_markdown)]

pub mod axis;
pub mod ellipsoid;
pub mod error;
pub mod geodesy;
pub mod projection;
pub mod reference;
pub mod shape;
pub mod topology;
pub mod transform;
pub mod uom;
pub mod wkt;

/// 预导入模块
pub mod prelude {
    pub use crate::axis::{Axis, AxisDirection, AxisName, RangeMeaning};
    pub use crate::ellipsoid::Ellipsoid;
    pub use crate::error::{GeoError, GeoResult};
    pub use crate::geodesy::{Geodesy, GeodesyFactory, GeodesyModel, LineType};
    pub use crate::reference::{
        add_reference, create_cartesian_reference, get_reference, is_valid_reference_identifier,
        parse_well_known_text, CoordinateReference, CoordinateType,
    };
    pub use crate::shape::{
        Bounds, ComplexPolygon, Point, Polygon, Polyline, Shape, ShapeList, ShapeType, XYZ,
    };
    pub use crate::topology::{
        ConstructiveGeometry, ConstructiveGeometryFactory, Intersection, Topology,
        TopologyFactory,
    };
    pub use crate::transform::{Transformation, TransformationFactory};
    pub use crate::uom::{QuantityKind, UnitOfMeasure};
}

pub use error::{GeoError, GeoResult};
pub use reference::{CoordinateReference, CoordinateType};
pub use shape::{Bounds, Point, Polygon, Polyline, Shape, XYZ};
