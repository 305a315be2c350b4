//! # VASP POSCAR 格式读写
//!
//! 解析上传的 POSCAR/CONTCAR 文本，并为每个并行测试作业写出 POSCAR。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (negative: target cell volume)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ```
//!
//! 不带元素行的 VASP 4 格式无法确定元素，因此无法计算电子数，直接报错。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 和 `workflow/queue.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{ParbenchError, Result};
use crate::models::{Atom, Crystal, Lattice};

fn parse_error(name: &str, reason: impl Into<String>) -> ParbenchError {
    ParbenchError::ParseError {
        format: "poscar".to_string(),
        path: name.to_string(),
        reason: reason.into(),
    }
}

/// 从字符串内容解析 POSCAR
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 8 {
        return Err(parse_error(default_name, "File too short"));
    }

    let name = match lines[0].trim() {
        "" => default_name.to_string(),
        comment => comment.to_string(),
    };

    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(&name, "Invalid scaling factor on line 2"))?;

    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .take(3)
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| parse_error(&name, format!("Invalid lattice vector at line {}", 3 + i)))?;
        if parts.len() < 3 {
            return Err(parse_error(&name, format!("Invalid lattice vector at line {}", 3 + i)));
        }
        *row = [parts[0], parts[1], parts[2]];
    }

    // 负的缩放因子表示目标晶胞体积
    let volume = Lattice::from_vectors(matrix).volume().abs();
    let scale = if scale < 0.0 {
        if volume == 0.0 {
            return Err(parse_error(&name, "Degenerate lattice vectors"));
        }
        (-scale / volume).cbrt()
    } else if scale > 0.0 {
        scale
    } else {
        return Err(parse_error(&name, "Scaling factor must be non-zero"));
    };
    let lattice = Lattice::from_vectors(matrix.map(|row| row.map(|x| x * scale)));

    let elements: Vec<String> = lines[5].split_whitespace().map(str::to_string).collect();
    if elements.is_empty() || elements[0].parse::<u32>().is_ok() {
        return Err(parse_error(&name, "Missing element symbols line (VASP 4 format)"));
    }
    let counts: Vec<usize> = lines[6]
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| parse_error(&name, "Invalid atom counts on line 7"))?;
    if counts.len() != elements.len() {
        return Err(parse_error(&name, "Element and count lines differ in length"));
    }

    let mut coord_line = 7;
    if lines
        .get(coord_line)
        .is_some_and(|l| l.trim().to_lowercase().starts_with('s'))
    {
        coord_line += 1;
    }
    let coord_type = lines
        .get(coord_line)
        .map(|l| l.trim().to_lowercase())
        .ok_or_else(|| parse_error(&name, "Missing coordinate type line"))?;
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    let mut atoms = Vec::with_capacity(counts.iter().sum());
    let mut position_lines = lines.iter().skip(coord_line + 1);

    for (element, &count) in elements.iter().zip(counts.iter()) {
        for _ in 0..count {
            let line = position_lines
                .next()
                .ok_or_else(|| parse_error(&name, "Fewer positions than atom counts"))?;
            let xyz: Vec<f64> = line
                .split_whitespace()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();
            if xyz.len() < 3 {
                return Err(parse_error(&name, format!("Invalid position line '{}'", line.trim())));
            }

            let mut position = [xyz[0], xyz[1], xyz[2]];
            if is_cartesian {
                position = lattice.cart_to_frac(position.map(|x| x * scale));
            }
            atoms.push(Atom::new(element.clone(), position));
        }
    }

    let mut crystal = Crystal::new(name, lattice, atoms);
    crystal.source_format = Some("poscar".to_string());
    Ok(crystal)
}

/// 将 Crystal 写成 POSCAR 字符串（元素按组分顺序分组，分数坐标）
pub fn to_poscar_string(crystal: &Crystal) -> String {
    let composition = crystal.composition();

    let mut result = String::new();
    result.push_str(&format!("{}\n1.0\n", crystal.name));

    for row in &crystal.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    let symbols: Vec<&str> = composition.iter().map(|(el, _)| el.as_str()).collect();
    let counts: Vec<String> = composition.iter().map(|(_, n)| n.to_string()).collect();
    result.push_str(&format!("   {}\n", symbols.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));
    result.push_str("Direct\n");

    for (element, _) in &composition {
        for atom in crystal.atoms.iter().filter(|a| &a.element == element) {
            let p = atom.position;
            result.push_str(&format!(
                "  {:16.10}  {:16.10}  {:16.10} {}\n",
                p[0], p[1], p[2], element
            ));
        }
    }

    result
}
