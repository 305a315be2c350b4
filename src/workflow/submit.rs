//! # 提交流程
//!
//! 上传的几何文件 → 结构 → 每个节点数一个工作流 → 入队。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `parsers/`, `workflow/queue.rs`

use super::{parallelization_dir, JobQueue, Selection, Workflow};
use crate::error::{ParbenchError, Result};
use crate::models::Crystal;
use crate::parsers::{parse_structure_str, StructureFormat};

use std::fs;
use std::path::{Path, PathBuf};

/// 上传的几何文件：文件名 + 原始字节
#[derive(Debug, Clone)]
pub struct GeometryUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl GeometryUpload {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ParbenchError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let data = fs::read(path).map_err(|e| ParbenchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(GeometryUpload { filename, data })
    }
}

/// 解码上传的几何文件
///
/// 格式由文件名推断；内容须为 UTF-8 文本，且至少包含一个原子。
pub fn decode_geometry(upload: Option<&GeometryUpload>) -> Result<Crystal> {
    let upload = upload.ok_or(ParbenchError::NoGeometry)?;

    let content =
        std::str::from_utf8(&upload.data).map_err(|_| ParbenchError::GeometryDecode {
            filename: upload.filename.clone(),
        })?;
    let format = StructureFormat::from_filename(&upload.filename)?;

    let stem = Path::new(&upload.filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| upload.filename.clone());

    let crystal = parse_structure_str(content, format, &stem).map_err(|e| match e {
        ParbenchError::ParseError { format, reason, .. } => ParbenchError::UnsupportedFormat(
            format!("{} is not a valid {} file: {}", upload.filename, format, reason),
        ),
        other => other,
    })?;

    if crystal.num_sites() == 0 {
        return Err(ParbenchError::UnsupportedFormat(format!(
            "{} contains no atoms",
            upload.filename
        )));
    }
    Ok(crystal)
}

/// 一次提交的结果
#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub directory: PathBuf,
    /// (节点数, 队列标识)
    pub submitted: Vec<(u32, String)>,
}

/// 为每个节点数构造工作流并入队
///
/// 节点列表无法解析时不提交任何内容；任一工作流失败时中止剩余的提交。
pub fn submit_workflows<Q, F>(
    queue: &mut Q,
    selection: &Selection,
    structure: &Crystal,
    mut on_submitted: F,
) -> Result<SubmitReport>
where
    Q: JobQueue + ?Sized,
    F: FnMut(u32, &str),
{
    let nodes_list = selection
        .nodes_list
        .as_ref()
        .ok_or_else(|| ParbenchError::InvalidNodeList(selection.nodes_input.clone()))?;

    let directory = parallelization_dir(
        &selection.scratch_dir,
        selection.functional,
        structure,
        selection.nbands,
        selection.kpt_density,
    );

    let mut submitted = Vec::with_capacity(nodes_list.len());
    for &nodes in nodes_list {
        let workflow = Workflow::build(selection, structure, &directory, nodes)?;
        let id = queue.add_workflow(&workflow)?;
        on_submitted(nodes, &id);
        submitted.push((nodes, id));
    }

    Ok(SubmitReport {
        directory,
        submitted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::tests::{nacl, selection};
    use crate::workflow::DirectoryQueue;
    use tempfile::tempdir;

    const POSCAR: &str = "NaCl
1.0
5.64 0.0 0.0
0.0 5.64 0.0
0.0 0.0 5.64
Na Cl
1 1
Direct
0.0 0.0 0.0
0.5 0.5 0.5
";

    /// 记录调用次数，第 n 次起失败
    struct FailingQueue {
        calls: usize,
        fail_at: usize,
    }

    impl JobQueue for FailingQueue {
        fn name(&self) -> String {
            "failing".to_string()
        }

        fn add_workflow(&mut self, _workflow: &Workflow) -> Result<String> {
            self.calls += 1;
            if self.calls >= self.fail_at {
                Err(ParbenchError::CommandFailed {
                    command: "sbatch".to_string(),
                    stderr: "queue unavailable".to_string(),
                })
            } else {
                Ok(format!("id{}", self.calls))
            }
        }
    }

    #[test]
    fn test_decode_geometry() {
        let upload = GeometryUpload {
            filename: "NaCl.vasp".to_string(),
            data: POSCAR.as_bytes().to_vec(),
        };
        let crystal = decode_geometry(Some(&upload)).unwrap();
        assert_eq!(crystal.num_sites(), 2);
        assert_eq!(crystal.composition_string(), "Na1 Cl1");
    }

    #[test]
    fn test_decode_geometry_errors() {
        assert!(matches!(
            decode_geometry(None),
            Err(ParbenchError::NoGeometry)
        ));

        let binary = GeometryUpload {
            filename: "POSCAR".to_string(),
            data: vec![0xff, 0xfe, 0x00],
        };
        assert!(matches!(
            decode_geometry(Some(&binary)),
            Err(ParbenchError::GeometryDecode { .. })
        ));

        let unknown = GeometryUpload {
            filename: "structure.xyz".to_string(),
            data: b"2\n".to_vec(),
        };
        assert!(matches!(
            decode_geometry(Some(&unknown)),
            Err(ParbenchError::UnsupportedFormat(_))
        ));

        let broken = GeometryUpload {
            filename: "POSCAR".to_string(),
            data: b"NaCl\n1.0\n".to_vec(),
        };
        let err = decode_geometry(Some(&broken)).unwrap_err();
        assert!(err.to_string().starts_with("Incorrect format for input file"));
    }

    #[test]
    fn test_decode_geometry_rejects_empty_structure() {
        let poscar = GeometryUpload {
            filename: "POSCAR".to_string(),
            data: POSCAR.replace("1 1\n", "0 0\n").into_bytes(),
        };
        let err = decode_geometry(Some(&poscar)).unwrap_err();
        assert!(matches!(err, ParbenchError::UnsupportedFormat(_)));
        assert!(err.to_string().starts_with("Incorrect format for input file"));

        let mut empty = nacl();
        empty.atoms.clear();
        let json = GeometryUpload {
            filename: "empty.json".to_string(),
            data: serde_json::to_vec(&empty).unwrap(),
        };
        assert!(matches!(
            decode_geometry(Some(&json)),
            Err(ParbenchError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_submit_one_workflow_per_node_count() {
        let tmp = tempdir().unwrap();
        let mut sel = selection("1, 2, 4");
        sel.scratch_dir = tmp.path().to_path_buf();
        let mut queue = DirectoryQueue::new(tmp.path().join("launchpad"));

        let mut seen = Vec::new();
        let report = submit_workflows(&mut queue, &sel, &nacl(), |nodes, _| seen.push(nodes)).unwrap();

        assert_eq!(seen, vec![1, 2, 4]);
        assert_eq!(report.submitted.len(), 3);
        assert_eq!(
            report.directory,
            tmp.path().join("parallel_pbe/Na1Cl1/40bands_300kpoints")
        );
        assert_eq!(queue.entries().unwrap().len(), 3);
    }

    #[test]
    fn test_submit_skipped_on_bad_nodes() {
        let sel = selection("1, two");
        let mut queue = FailingQueue { calls: 0, fail_at: 1 };

        let err = submit_workflows(&mut queue, &sel, &nacl(), |_, _| {}).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidNodeList(_)));
        assert_eq!(queue.calls, 0);
    }

    #[test]
    fn test_submit_aborts_on_first_failure() {
        let sel = selection("1, 2, 4");
        let mut queue = FailingQueue { calls: 0, fail_at: 2 };

        let mut seen = Vec::new();
        let result = submit_workflows(&mut queue, &sel, &nacl(), |nodes, _| seen.push(nodes));

        assert!(result.is_err());
        assert_eq!(queue.calls, 2);
        assert_eq!(seen, vec![1]);
    }
}
