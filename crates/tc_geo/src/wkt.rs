//! WKT (Well-Known Text) 坐标参考系描述解析
//!
//! 支持 WKT1 的 GEOGCS / PROJCS / GEOCCS 三类根节点。
//! 解析为硬失败：任何格式错误都返回带字符偏移的
//! [`GeoError::WktParse`]，不做尽力解析或静默缺省。
//!
//! 支持的投影方法：`Transverse_Mercator` 与伪墨卡托
//! (`Popular Visualisation Pseudo Mercator` / `Mercator_1SP`)。

use crate::axis::Axis;
use crate::ellipsoid::Ellipsoid;
use crate::error::{GeoError, GeoResult};
use crate::projection::{GridProjection, TransverseMercatorParams};
use crate::reference::{CoordinateReference, CoordinateType};

// ============================================================================
// 词法
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Keyword(String),
    Str(String),
    Num(f64),
    Open,
    Close,
    Comma,
}

fn tokenize(text: &str) -> GeoResult<Vec<(usize, Token)>> {
    let bytes: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '[' | '(' => {
                tokens.push((i, Token::Open));
                i += 1;
            }
            ']' | ')' => {
                tokens.push((i, Token::Close));
                i += 1;
            }
            ',' => {
                tokens.push((i, Token::Comma));
                i += 1;
            }
            '"' => {
                let start = i;
                i += 1;
                let mut s = String::new();
                while i < bytes.len() && bytes[i] != '"' {
                    s.push(bytes[i]);
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(GeoError::wkt_parse(start, "字符串未闭合"));
                }
                i += 1;
                tokens.push((start, Token::Str(s)));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                let mut s = String::new();
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == '_') {
                    s.push(bytes[i]);
                    i += 1;
                }
                tokens.push((start, Token::Keyword(s.to_ascii_uppercase())));
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                let start = i;
                let mut s = String::new();
                while i < bytes.len()
                    && (bytes[i].is_ascii_digit()
                        || matches!(bytes[i], '-' | '+' | '.' | 'e' | 'E'))
                {
                    s.push(bytes[i]);
                    i += 1;
                }
                let value: f64 = s
                    .parse()
                    .map_err(|_| GeoError::wkt_parse(start, format!("无法解析数字 {s:?}")))?;
                tokens.push((start, Token::Num(value)));
            }
            _ => {
                return Err(GeoError::wkt_parse(i, format!("意外字符 {c:?}")));
            }
        }
    }
    Ok(tokens)
}

// ============================================================================
// 语法
// ============================================================================

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Num(f64),
    Node(Node),
}

#[derive(Debug, Clone)]
struct Node {
    position: usize,
    keyword: String,
    values: Vec<Value>,
}

impl Node {
    fn first_str(&self) -> Option<&str> {
        self.values.iter().find_map(|v| match v {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    fn numbers(&self) -> Vec<f64> {
        self.values
            .iter()
            .filter_map(|v| match v {
                Value::Num(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn child(&self, keyword: &str) -> Option<&Node> {
        self.values.iter().find_map(|v| match v {
            Value::Node(n) if n.keyword == keyword => Some(n),
            _ => None,
        })
    }

    fn children(&self, keyword: &str) -> impl Iterator<Item = &Node> {
        let keyword = keyword.to_string();
        self.values.iter().filter_map(move |v| match v {
            Value::Node(n) if n.keyword == keyword => Some(n),
            _ => None,
        })
    }
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.cursor)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let t = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        t
    }

    fn end_position(&self) -> usize {
        self.tokens.last().map_or(0, |(p, _)| *p)
    }

    /// 解析 KEYWORD[value, value, ...] 节点
    fn parse_node(&mut self) -> GeoResult<Node> {
        let (position, keyword) = match self.advance() {
            Some((p, Token::Keyword(k))) => (p, k),
            Some((p, t)) => {
                return Err(GeoError::wkt_parse(p, format!("期望关键字，得到 {t:?}")));
            }
            None => return Err(GeoError::wkt_parse(self.end_position(), "文本意外结束")),
        };

        match self.advance() {
            Some((_, Token::Open)) => {}
            Some((p, _)) => return Err(GeoError::wkt_parse(p, "关键字后期望 '['")),
            None => return Err(GeoError::wkt_parse(self.end_position(), "文本意外结束")),
        }

        let mut values = Vec::new();
        loop {
            match self.peek() {
                Some((_, Token::Close)) => {
                    self.cursor += 1;
                    break;
                }
                Some((_, Token::Comma)) => {
                    self.cursor += 1;
                }
                Some((_, Token::Str(_) | Token::Num(_))) => {
                    match self.advance() {
                        Some((_, Token::Str(s))) => values.push(Value::Str(s)),
                        Some((_, Token::Num(n))) => values.push(Value::Num(n)),
                        _ => unreachable!(),
                    }
                }
                Some((_, Token::Keyword(_))) => {
                    values.push(Value::Node(self.parse_node()?));
                }
                Some((p, t)) => {
                    return Err(GeoError::wkt_parse(*p, format!("意外标记 {t:?}")));
                }
                None => {
                    return Err(GeoError::wkt_parse(self.end_position(), "节点未闭合"));
                }
            }
        }

        Ok(Node {
            position,
            keyword,
            values,
        })
    }
}

// ============================================================================
// 解释
// ============================================================================

fn ellipsoid_from_datum(datum: &Node) -> GeoResult<Ellipsoid> {
    let spheroid = datum
        .child("SPHEROID")
        .or_else(|| datum.child("ELLIPSOID"))
        .ok_or_else(|| GeoError::wkt_parse(datum.position, "DATUM 缺少 SPHEROID"))?;
    let nums = spheroid.numbers();
    if nums.len() < 2 {
        return Err(GeoError::wkt_parse(
            spheroid.position,
            "SPHEROID 需要长半轴与扁率倒数",
        ));
    }
    Ok(Ellipsoid::from_inverse_flattening(nums[0], nums[1]))
}

fn identifier_from_node(node: &Node, name: &str) -> String {
    if let Some(auth) = node.child("AUTHORITY") {
        let strs: Vec<&str> = auth
            .values
            .iter()
            .filter_map(|v| match v {
                Value::Str(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        if strs.len() >= 2 {
            return format!("{}:{}", strs[0], strs[1]);
        }
    }
    format!("WKT:{name}")
}

fn interpret_geogcs(node: &Node) -> GeoResult<CoordinateReference> {
    let name = node
        .first_str()
        .ok_or_else(|| GeoError::wkt_parse(node.position, "GEOGCS 缺少名称"))?
        .to_string();
    let datum = node
        .child("DATUM")
        .ok_or_else(|| GeoError::wkt_parse(node.position, "GEOGCS 缺少 DATUM"))?;
    let ellipsoid = ellipsoid_from_datum(datum)?;

    Ok(CoordinateReference {
        identifier: identifier_from_node(node, &name),
        name,
        coordinate_type: CoordinateType::Geodetic,
        axes: vec![Axis::longitude(), Axis::latitude()],
        datum: Some(ellipsoid),
        projection: None,
    })
}

fn parameter_value(node: &Node, name: &str, default: f64) -> f64 {
    node.children("PARAMETER")
        .find(|p| {
            p.first_str()
                .is_some_and(|s| s.eq_ignore_ascii_case(name))
        })
        .and_then(|p| p.numbers().first().copied())
        .unwrap_or(default)
}

fn interpret_projcs(node: &Node) -> GeoResult<CoordinateReference> {
    let name = node
        .first_str()
        .ok_or_else(|| GeoError::wkt_parse(node.position, "PROJCS 缺少名称"))?
        .to_string();
    let geogcs = node
        .child("GEOGCS")
        .ok_or_else(|| GeoError::wkt_parse(node.position, "PROJCS 缺少 GEOGCS"))?;
    let base = interpret_geogcs(geogcs)?;
    let ellipsoid = base
        .datum
        .ok_or_else(|| GeoError::wkt_parse(geogcs.position, "GEOGCS 缺少椭球体"))?;

    let projection_node = node
        .child("PROJECTION")
        .ok_or_else(|| GeoError::wkt_parse(node.position, "PROJCS 缺少 PROJECTION"))?;
    let method = projection_node
        .first_str()
        .ok_or_else(|| GeoError::wkt_parse(projection_node.position, "PROJECTION 缺少方法名"))?;

    let projection = match method.to_ascii_lowercase().as_str() {
        "transverse_mercator" => {
            GridProjection::TransverseMercator(TransverseMercatorParams::custom(
                ellipsoid,
                parameter_value(node, "central_meridian", 0.0),
                parameter_value(node, "scale_factor", 1.0),
                parameter_value(node, "false_easting", 0.0),
                parameter_value(node, "false_northing", 0.0),
            ))
        }
        "mercator_1sp" | "popular visualisation pseudo mercator" | "pseudo-mercator" => {
            GridProjection::WebMercator
        }
        other => {
            return Err(GeoError::wkt_parse(
                projection_node.position,
                format!("不支持的投影方法 {other:?}"),
            ));
        }
    };

    Ok(CoordinateReference {
        identifier: identifier_from_node(node, &name),
        name,
        coordinate_type: CoordinateType::Cartesian,
        axes: vec![Axis::easting(), Axis::northing()],
        datum: Some(ellipsoid),
        projection: Some(projection),
    })
}

fn interpret_geoccs(node: &Node) -> GeoResult<CoordinateReference> {
    let name = node
        .first_str()
        .ok_or_else(|| GeoError::wkt_parse(node.position, "GEOCCS 缺少名称"))?
        .to_string();
    let datum = node
        .child("DATUM")
        .ok_or_else(|| GeoError::wkt_parse(node.position, "GEOCCS 缺少 DATUM"))?;
    let ellipsoid = ellipsoid_from_datum(datum)?;

    Ok(CoordinateReference {
        identifier: identifier_from_node(node, &name),
        name,
        coordinate_type: CoordinateType::Cartesian,
        axes: vec![
            Axis::geocentric_x(),
            Axis::geocentric_y(),
            Axis::geocentric_z(),
        ],
        datum: Some(ellipsoid),
        projection: None,
    })
}

/// 解析 WKT 文本为坐标参考系（不注册）
pub fn parse(text: &str) -> GeoResult<CoordinateReference> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(GeoError::wkt_parse(0, "空文本"));
    }
    let mut parser = Parser { tokens, cursor: 0 };
    let root = parser.parse_node()?;
    if let Some((p, t)) = parser.peek() {
        return Err(GeoError::wkt_parse(*p, format!("根节点后有多余内容 {t:?}")));
    }

    match root.keyword.as_str() {
        "GEOGCS" | "GEOGCRS" => interpret_geogcs(&root),
        "PROJCS" | "PROJCRS" => interpret_projcs(&root),
        "GEOCCS" => interpret_geoccs(&root),
        other => Err(GeoError::wkt_parse(
            root.position,
            format!("不支持的根节点 {other}"),
        )),
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84_WKT: &str = r#"GEOGCS["WGS 84",
        DATUM["WGS_1984",
            SPHEROID["WGS 84",6378137,298.257223563]],
        PRIMEM["Greenwich",0],
        UNIT["degree",0.0174532925199433],
        AUTHORITY["EPSG","4326"]]"#;

    const UTM_WKT: &str = r#"PROJCS["WGS 84 / UTM zone 50N",
        GEOGCS["WGS 84",
            DATUM["WGS_1984",
                SPHEROID["WGS 84",6378137,298.257223563]],
            PRIMEM["Greenwich",0],
            UNIT["degree",0.0174532925199433]],
        PROJECTION["Transverse_Mercator"],
        PARAMETER["latitude_of_origin",0],
        PARAMETER["central_meridian",117],
        PARAMETER["scale_factor",0.9996],
        PARAMETER["false_easting",500000],
        PARAMETER["false_northing",0],
        UNIT["metre",1],
        AUTHORITY["EPSG","32650"]]"#;

    #[test]
    fn test_parse_geogcs() {
        let r = parse(WGS84_WKT).unwrap();
        assert_eq!(r.identifier, "EPSG:4326");
        assert_eq!(r.coordinate_type, CoordinateType::Geodetic);
        let ell = r.datum.unwrap();
        assert!((ell.a - 6_378_137.0).abs() < 1e-6);
        assert!((ell.f - Ellipsoid::WGS84.f).abs() < 1e-12);
    }

    #[test]
    fn test_parse_projcs() {
        let r = parse(UTM_WKT).unwrap();
        assert_eq!(r.identifier, "EPSG:32650");
        assert_eq!(r.coordinate_type, CoordinateType::Cartesian);
        match r.projection.unwrap() {
            GridProjection::TransverseMercator(p) => {
                assert!((p.central_meridian - 117.0).abs() < 1e-12);
                assert!((p.scale_factor - 0.9996).abs() < 1e-12);
                assert!((p.false_easting - 500_000.0).abs() < 1e-12);
            }
            other => panic!("意外的投影 {other:?}"),
        }
    }

    #[test]
    fn test_parse_sphere_spheroid() {
        let wkt = r#"GEOGCS["Sphere",
            DATUM["Sphere",SPHEROID["Sphere",6371000,0]],
            PRIMEM["Greenwich",0],
            UNIT["degree",0.0174532925199433]]"#;
        let r = parse(wkt).unwrap();
        assert!(r.datum.unwrap().is_sphere());
        assert_eq!(r.identifier, "WKT:Sphere");
    }

    #[test]
    fn test_parse_round_brackets() {
        let wkt = r#"GEOGCS("WGS 84",
            DATUM("WGS_1984", SPHEROID("WGS 84", 6378137, 298.257223563)),
            PRIMEM("Greenwich", 0),
            UNIT("degree", 0.0174532925199433))"#;
        assert!(parse(wkt).is_ok());
    }

    #[test]
    fn test_malformed_wkt_is_hard_failure() {
        assert!(parse("").is_err());
        assert!(parse("GEOGCS[\"未闭合").is_err());
        assert!(parse("FOO[\"bar\"]").is_err());
        assert!(parse("GEOGCS[\"无 DATUM\", UNIT[\"degree\",0.017]]").is_err());
        // 根节点后有垃圾
        assert!(parse("GEOGCS[\"x\", DATUM[\"d\", SPHEROID[\"s\",6378137,298.0]]] extra").is_err());
    }

    #[test]
    fn test_error_carries_position() {
        match parse("GEOGCS[\"x\" @]") {
            Err(GeoError::WktParse { position, .. }) => assert!(position > 0),
            other => panic!("期望 WktParse，得到 {other:?}"),
        }
    }
}
