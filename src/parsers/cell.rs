//! # CASTEP .cell 格式解析器
//!
//! 读取上传的 .cell 文件中的晶格和原子位置块。
//!
//! ## 支持的块
//! - `LATTICE_CART` / `LATTICE_ABC`
//! - `POSITIONS_FRAC` / `POSITIONS_ABS`
//!
//! 块名不区分大小写，`ang` 之外的单位行会被拒绝。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`, `regex`

use crate::error::{ParbenchError, Result};
use crate::models::{Atom, Crystal, Lattice};

use regex::Regex;

fn parse_error(name: &str, reason: impl Into<String>) -> ParbenchError {
    ParbenchError::ParseError {
        format: "cell".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 提取 `%BLOCK name ... %ENDBLOCK name` 之间的有效行（去掉注释和空行）
fn block_lines<'a>(content: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let pattern = format!(r"(?is)%BLOCK\s+{name}\b(.*?)%ENDBLOCK\s+{name}\b");
    let re = Regex::new(&pattern).ok()?;
    let body = re.captures(content)?.get(1)?.as_str();

    Some(
        body.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('!'))
            .collect(),
    )
}

/// 去掉可选的单位行；只接受埃
fn strip_unit<'s, 'a>(lines: &'s [&'a str], name: &str) -> Result<&'s [&'a str]> {
    match lines.first() {
        Some(first) if first.eq_ignore_ascii_case("ang") => Ok(&lines[1..]),
        Some(first) if first.chars().all(|c| c.is_ascii_alphabetic()) => {
            Err(parse_error(name, format!("Unsupported length unit '{}'", first)))
        }
        _ => Ok(lines),
    }
}

fn floats(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .map_while(|s| s.parse().ok())
        .collect()
}

/// 从字符串内容解析 .cell 格式
pub fn parse_cell_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lattice = if let Some(lines) = block_lines(content, "LATTICE_CART") {
        let rows: Vec<Vec<f64>> = strip_unit(&lines, default_name)?
            .iter()
            .map(|l| floats(l))
            .collect();
        if rows.len() < 3 || rows.iter().take(3).any(|r| r.len() < 3) {
            return Err(parse_error(default_name, "Incomplete LATTICE_CART block"));
        }
        Lattice::from_vectors([0, 1, 2].map(|i| [rows[i][0], rows[i][1], rows[i][2]]))
    } else if let Some(lines) = block_lines(content, "LATTICE_ABC") {
        let p: Vec<f64> = strip_unit(&lines, default_name)?
            .iter()
            .flat_map(|l| floats(l))
            .collect();
        if p.len() < 6 {
            return Err(parse_error(
                default_name,
                "Incomplete LATTICE_ABC block (need a b c alpha beta gamma)",
            ));
        }
        Lattice::from_parameters(p[0], p[1], p[2], p[3], p[4], p[5])
    } else {
        return Err(parse_error(
            default_name,
            "Missing LATTICE_CART or LATTICE_ABC block",
        ));
    };

    let (lines, absolute) = match block_lines(content, "POSITIONS_FRAC") {
        Some(lines) => (lines, false),
        None => match block_lines(content, "POSITIONS_ABS") {
            Some(lines) => (lines, true),
            None => {
                return Err(parse_error(
                    default_name,
                    "Missing POSITIONS_FRAC or POSITIONS_ABS block",
                ))
            }
        },
    };
    let lines = if absolute {
        strip_unit(&lines, default_name)?.to_vec()
    } else {
        lines
    };

    let mut atoms = Vec::with_capacity(lines.len());
    for line in &lines {
        let mut parts = line.split_whitespace();
        let element = parts.next().unwrap_or_default();
        let xyz: Vec<f64> = parts.take(3).filter_map(|s| s.parse().ok()).collect();
        if xyz.len() < 3 {
            return Err(parse_error(default_name, format!("Invalid position line '{}'", line)));
        }
        let position = [xyz[0], xyz[1], xyz[2]];
        let position = if absolute {
            lattice.cart_to_frac(position)
        } else {
            position
        };
        atoms.push(Atom::new(element, position));
    }

    if atoms.is_empty() {
        return Err(parse_error(default_name, "No atoms in positions block"));
    }

    let mut crystal = Crystal::new(default_name, lattice, atoms);
    crystal.source_format = Some("cell".to_string());
    Ok(crystal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_lattice_cart() {
        let content = r#"
%BLOCK LATTICE_CART
ang
5.0 0.0 0.0
0.0 5.0 0.0
0.0 0.0 5.0
%ENDBLOCK LATTICE_CART

%BLOCK POSITIONS_FRAC
Na 0.0 0.0 0.0
Cl 0.5 0.5 0.5
%ENDBLOCK POSITIONS_FRAC
"#;
        let crystal = parse_cell_content(content, "NaCl").unwrap();
        assert_eq!(crystal.num_sites(), 2);
        assert!((crystal.lattice.volume() - 125.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_cell_lattice_abc_lowercase() {
        let content = r#"
%block lattice_abc
5.64 5.64 5.64
90.0 90.0 90.0
%endblock lattice_abc

%block positions_frac
Na 0.0 0.0 0.0
Cl 0.5 0.5 0.5
%endblock positions_frac
"#;
        let crystal = parse_cell_content(content, "NaCl").unwrap();
        let (a, _, _, alpha, _, gamma) = crystal.lattice.parameters();
        assert!((a - 5.64).abs() < 0.01);
        assert!((alpha - 90.0).abs() < 0.01);
        assert!((gamma - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_positions_abs_converted() {
        let content = r#"
%BLOCK LATTICE_CART
4.0 0.0 0.0
0.0 4.0 0.0
0.0 0.0 4.0
%ENDBLOCK LATTICE_CART
%BLOCK POSITIONS_ABS
ang
Fe 2.0 2.0 2.0
%ENDBLOCK POSITIONS_ABS
"#;
        let crystal = parse_cell_content(content, "Fe").unwrap();
        assert!((crystal.atoms[0].position[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_bohr_unit_rejected() {
        let content = "%BLOCK LATTICE_CART\nbohr\n1 0 0\n0 1 0\n0 0 1\n%ENDBLOCK LATTICE_CART\n";
        assert!(parse_cell_content(content, "x").is_err());
    }

    #[test]
    fn test_missing_lattice() {
        let content = "%BLOCK POSITIONS_FRAC\nFe 0 0 0\n%ENDBLOCK POSITIONS_FRAC\n";
        let err = parse_cell_content(content, "x").unwrap_err();
        assert!(err.to_string().contains("LATTICE"));
    }
}
