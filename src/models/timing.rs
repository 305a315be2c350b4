//! # 并行计时数据模型
//!
//! 基准测试的计时记录：每条记录包含节点数、KPAR/NPAR/NCORE 并行参数
//! 以及每个电子步的平均耗时。
//!
//! ## 输入格式
//! ```text
//! [
//!   {"nodes": 1, "kpar": 2, "npar": 7, "ncore": 2, "timing": 12.3},
//!   ...
//! ]
//! ```
//!
//! ## 依赖关系
//! - 被 `analysis/`, `plot/`, `commands/analyze/` 使用
//! - 使用 `serde_json` 读取

use crate::error::{ParbenchError, Result};

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 单条计时记录
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    pub nodes: u32,
    pub kpar: u32,
    pub npar: u32,
    pub ncore: u32,
    /// 每个电子步的平均耗时 (s)
    pub timing: f64,
}

impl TimingRecord {
    pub fn new(nodes: u32, kpar: u32, npar: u32, ncore: u32, timing: f64) -> Self {
        TimingRecord {
            nodes,
            kpar,
            npar,
            ncore,
            timing,
        }
    }
}

/// 计时记录中的整数坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Nodes,
    Kpar,
    Npar,
    Ncore,
}

impl Axis {
    /// 读取记录在该轴上的取值
    pub fn value(self, record: &TimingRecord) -> u32 {
        match self {
            Axis::Nodes => record.nodes,
            Axis::Kpar => record.kpar,
            Axis::Npar => record.npar,
            Axis::Ncore => record.ncore,
        }
    }

    /// 图表坐标轴标签
    pub fn label(self) -> &'static str {
        match self {
            Axis::Nodes => "# nodes",
            Axis::Kpar => "KPAR",
            Axis::Npar => "NPAR",
            Axis::Ncore => "NCORE",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Nodes => write!(f, "nodes"),
            Axis::Kpar => write!(f, "kpar"),
            Axis::Npar => write!(f, "npar"),
            Axis::Ncore => write!(f, "ncore"),
        }
    }
}

/// 有序的计时记录集合，加载后只读
#[derive(Debug, Clone, Default)]
pub struct TimingSet {
    records: Vec<TimingRecord>,
}

impl TimingSet {
    pub fn new(records: Vec<TimingRecord>) -> Self {
        TimingSet { records }
    }

    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ParbenchError::TimingFileNotFound {
                path: path.display().to_string(),
            },
            _ => ParbenchError::FileReadError {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        Self::from_json_str(&content, &path.display().to_string())
    }

    /// 从 JSON 字符串解析；顶层必须是列表
    pub fn from_json_str(content: &str, source: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ParbenchError::ParseError {
                format: "timing json".to_string(),
                path: source.to_string(),
                reason: e.to_string(),
            })?;

        let items = match value {
            serde_json::Value::Array(items) => items,
            _ => {
                return Err(ParbenchError::TimingNotAList {
                    path: source.to_string(),
                })
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value::<TimingRecord>(item).map_err(|e| {
                    ParbenchError::ParseError {
                        format: "timing json".to_string(),
                        path: source.to_string(),
                        reason: format!("record {}: {}", i, e),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TimingSet { records })
    }

    pub fn records(&self) -> &[TimingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 某轴上出现过的取值，升序去重
    pub fn unique(&self, axis: Axis) -> Vec<u32> {
        unique_values(&self.records, axis)
    }

    /// 指定节点数的全部记录（保持原始顺序）
    pub fn for_nodes(&self, nodes: u32) -> Vec<TimingRecord> {
        self.records
            .iter()
            .filter(|r| r.nodes == nodes)
            .copied()
            .collect()
    }
}

/// 记录集合在某轴上的升序去重取值
pub fn unique_values(records: &[TimingRecord], axis: Axis) -> Vec<u32> {
    let mut values: Vec<u32> = records.iter().map(|r| axis.value(r)).collect();
    values.sort_unstable();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_timing_list() {
        let content = r#"[
            {"nodes": 2, "kpar": 4, "npar": 7, "ncore": 2, "timing": 5.5},
            {"nodes": 1, "kpar": 1, "npar": 28, "ncore": 1, "timing": 20, "extra": "ignored"}
        ]"#;
        let set = TimingSet::from_json_str(content, "inline").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0], TimingRecord::new(2, 4, 7, 2, 5.5));
        assert_eq!(set.records()[1].timing, 20.0);
    }

    #[test]
    fn test_single_object_is_not_a_list() {
        let content = r#"{"nodes": 1, "kpar": 1, "npar": 1, "ncore": 1, "timing": 1.0}"#;
        let err = TimingSet::from_json_str(content, "single.json").unwrap_err();
        assert!(matches!(err, ParbenchError::TimingNotAList { .. }));
        assert!(err.to_string().contains("timing_list is not a List"));
    }

    #[test]
    fn test_missing_key_names_record() {
        let content = r#"[{"nodes": 1, "kpar": 1, "npar": 1, "ncore": 1, "timing": 1.0},
                          {"nodes": 1, "kpar": 2, "timing": 1.0}]"#;
        let err = TimingSet::from_json_str(content, "partial.json").unwrap_err();
        match err {
            ParbenchError::ParseError { reason, .. } => assert!(reason.starts_with("record 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_reports_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = TimingSet::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ParbenchError::TimingFileNotFound { .. }));
        assert!(err.to_string().starts_with("Please select an existing file"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"nodes": 4, "kpar": 2, "npar": 14, "ncore": 4, "timing": 3.2}}]"#
        )
        .unwrap();
        let set = TimingSet::load(file.path()).unwrap();
        assert_eq!(set.for_nodes(4).len(), 1);
        assert!(set.for_nodes(1).is_empty());
    }

    #[test]
    fn test_unique_values_sorted() {
        let set = TimingSet::new(vec![
            TimingRecord::new(4, 2, 1, 1, 1.0),
            TimingRecord::new(1, 8, 1, 1, 1.0),
            TimingRecord::new(2, 2, 1, 1, 1.0),
            TimingRecord::new(1, 1, 1, 1, 1.0),
        ]);
        assert_eq!(set.unique(Axis::Nodes), vec![1, 2, 4]);
        assert_eq!(set.unique(Axis::Kpar), vec![1, 2, 8]);
    }
}
