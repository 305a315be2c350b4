//! # 结构解析器模块
//!
//! 根据上传文件名选择解析格式，并把 UTF-8 文本解析为 `Crystal`。
//!
//! ## 格式选择
//! - 文件名不含 `.`：默认 POSCAR
//! - `.poscar` / `.vasp` / `.contcar`：POSCAR
//! - `.cell`：CASTEP cell
//! - `.json`：序列化的 `Crystal`
//! - 其他扩展名：不支持
//!
//! ## 依赖关系
//! - 被 `workflow/submit.rs` 和 `commands/bands.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, cell

pub mod cell;
pub mod poscar;

use crate::error::{ParbenchError, Result};
use crate::models::Crystal;

/// 结构文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Poscar,
    Cell,
    Json,
}

impl StructureFormat {
    /// 从文件名推断格式
    pub fn from_filename(filename: &str) -> Result<Self> {
        let parts: Vec<&str> = filename.split('.').collect();
        if parts.len() == 1 {
            return Ok(StructureFormat::Poscar);
        }

        let ext = parts[parts.len() - 1].to_lowercase();
        match ext.as_str() {
            "poscar" | "vasp" | "contcar" => Ok(StructureFormat::Poscar),
            "cell" => Ok(StructureFormat::Cell),
            "json" => Ok(StructureFormat::Json),
            _ => Err(ParbenchError::UnsupportedFormat(format!(
                "unrecognized structure format '.{}' ({})",
                ext, filename
            ))),
        }
    }
}

impl std::fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureFormat::Poscar => write!(f, "poscar"),
            StructureFormat::Cell => write!(f, "cell"),
            StructureFormat::Json => write!(f, "json"),
        }
    }
}

/// 按指定格式解析结构文本
pub fn parse_structure_str(content: &str, format: StructureFormat, name: &str) -> Result<Crystal> {
    match format {
        StructureFormat::Poscar => poscar::parse_poscar_content(content, name),
        StructureFormat::Cell => cell::parse_cell_content(content, name),
        StructureFormat::Json => {
            serde_json::from_str::<Crystal>(content).map_err(|e| ParbenchError::ParseError {
                format: "json".to_string(),
                path: name.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            StructureFormat::from_filename("POSCAR").unwrap(),
            StructureFormat::Poscar
        );
        assert_eq!(
            StructureFormat::from_filename("Si.vasp").unwrap(),
            StructureFormat::Poscar
        );
        assert_eq!(
            StructureFormat::from_filename("run.1.CELL").unwrap(),
            StructureFormat::Cell
        );
        assert_eq!(
            StructureFormat::from_filename("Si.json").unwrap(),
            StructureFormat::Json
        );
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = StructureFormat::from_filename("Si.cif").unwrap_err();
        assert!(matches!(err, ParbenchError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_parse_json_structure() {
        let crystal = Crystal::new(
            "Fe",
            Lattice::from_parameters(2.87, 2.87, 2.87, 90.0, 90.0, 90.0),
            vec![Atom::new("Fe", [0.0, 0.0, 0.0]), Atom::new("Fe", [0.5, 0.5, 0.5])],
        );
        let text = serde_json::to_string(&crystal).unwrap();
        let parsed = parse_structure_str(&text, StructureFormat::Json, "Fe.json").unwrap();
        assert_eq!(parsed, crystal);
    }
}
