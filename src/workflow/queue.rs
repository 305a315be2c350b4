//! # 作业队列
//!
//! `JobQueue` 是提交工作流的唯一出口。
//!
//! - `DirectoryQueue`: 把工作流序列化成 JSON 文档，按编号写入队列目录，
//!   由外部的工作流管理器拉取执行
//! - `SlurmQueue`: 为每个并行设置直接写出 POSCAR/INCAR/KPOINTS/job.sbatch，
//!   可选地调用 `sbatch` 提交
//!
//! ## 依赖关系
//! - 被 `workflow/submit.rs` 和 `commands/submit.rs` 使用
//! - 使用 `utils/slurm.rs`, `parsers/poscar.rs`

use super::Workflow;
use crate::config::SlurmSettings;
use crate::error::{ParbenchError, Result};
use crate::parsers::poscar::to_poscar_string;
use crate::utils::slurm::{generate_sbatch_script, SlurmConfig};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 工作流队列
pub trait JobQueue {
    /// 队列的显示名称
    fn name(&self) -> String;

    /// 加入一个工作流，返回队列分配的标识
    fn add_workflow(&mut self, workflow: &Workflow) -> Result<String>;
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| ParbenchError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| ParbenchError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 目录队列：`<root>/wf-00001.json`, `wf-00002.json`, ...
#[derive(Debug, Clone)]
pub struct DirectoryQueue {
    root: PathBuf,
}

impl DirectoryQueue {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryQueue { root: root.into() }
    }

    /// 已入队的工作流文档，按编号排序
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let read = fs::read_dir(&self.root).map_err(|e| ParbenchError::FileReadError {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let mut entries: Vec<(u32, PathBuf)> = read
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter_map(|path| entry_id(&path).map(|id| (id, path)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);

        Ok(entries.into_iter().map(|(_, path)| path).collect())
    }

    fn next_id(&self) -> Result<u32> {
        let last = self
            .entries()?
            .iter()
            .filter_map(|path| entry_id(path))
            .max()
            .unwrap_or(0);
        Ok(last + 1)
    }
}

/// 从 `wf-00042.json` 中取出 42
fn entry_id(path: &Path) -> Option<u32> {
    if path.extension()? != "json" {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix("wf-")?
        .parse()
        .ok()
}

impl JobQueue for DirectoryQueue {
    fn name(&self) -> String {
        format!("directory queue at {}", self.root.display())
    }

    fn add_workflow(&mut self, workflow: &Workflow) -> Result<String> {
        create_dir(&self.root)?;

        let id = format!("wf-{:05}", self.next_id()?);
        let path = self.root.join(format!("{}.json", id));
        let content = serde_json::to_string_pretty(workflow)?;
        write_file(&path, &content)?;

        Ok(id)
    }
}

/// Slurm 队列：直接准备作业目录
#[derive(Debug, Clone)]
pub struct SlurmQueue {
    settings: SlurmSettings,
    submit: bool,
}

impl SlurmQueue {
    /// `submit = false` 时只写出文件，不调用 sbatch
    pub fn new(settings: SlurmSettings, submit: bool) -> Self {
        SlurmQueue { settings, submit }
    }

    fn sbatch(&self, job_dir: &Path) -> Result<String> {
        let out = Command::new("sbatch")
            .arg("job.sbatch")
            .current_dir(job_dir)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => ParbenchError::CommandNotFound {
                    command: "sbatch".to_string(),
                },
                _ => ParbenchError::CommandFailed {
                    command: "sbatch".to_string(),
                    stderr: e.to_string(),
                },
            })?;

        if !out.status.success() {
            return Err(ParbenchError::CommandFailed {
                command: format!("sbatch in {}", job_dir.display()),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        // "Submitted batch job 123456"
        let stdout = String::from_utf8_lossy(&out.stdout);
        Ok(stdout
            .split_whitespace()
            .last()
            .unwrap_or_default()
            .to_string())
    }
}

impl JobQueue for SlurmQueue {
    fn name(&self) -> String {
        if self.submit {
            "slurm (sbatch)".to_string()
        } else {
            "slurm (prepare only)".to_string()
        }
    }

    fn add_workflow(&mut self, workflow: &Workflow) -> Result<String> {
        let poscar = to_poscar_string(&workflow.structure);
        let kpoints = workflow
            .kpoints
            .grid
            .to_kpoints_string(workflow.kpoints.reciprocal_density);
        let ntasks = workflow.total_cores()?;
        let exec_cmd = format!(
            "{} -np {} {}",
            self.settings.mpi_launcher, ntasks, self.settings.vasp_exec
        );

        let mut job_ids = Vec::new();
        for run in &workflow.runs {
            let job_dir = workflow.run_dir(run);
            create_dir(&job_dir)?;

            write_file(&job_dir.join("POSCAR"), &poscar)?;
            write_file(&job_dir.join("KPOINTS"), &kpoints)?;
            write_file(&job_dir.join("INCAR"), &workflow.incar_for(run))?;

            let job_name = format!("{}_{}", workflow.name, run.dir_name());
            let config =
                SlurmConfig::from_settings(&self.settings, job_name, workflow.nodes, workflow.cores_per_node);
            let script = generate_sbatch_script(&config, &job_dir, &exec_cmd);
            write_file(&job_dir.join("job.sbatch"), &script)?;

            if self.submit {
                job_ids.push(self.sbatch(&job_dir)?);
            }
        }

        if self.submit {
            Ok(job_ids.join(","))
        } else {
            Ok(format!("{} jobs prepared", workflow.runs.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::tests::{nacl, selection};
    use crate::workflow::{parallelization_dir, Workflow};
    use tempfile::tempdir;

    fn workflow_in(root: &Path, nodes: u32) -> Workflow {
        let sel = selection(&nodes.to_string());
        let dir = parallelization_dir(root, sel.functional, &nacl(), sel.nbands, sel.kpt_density);
        Workflow::build(&sel, &nacl(), &dir, nodes).unwrap()
    }

    #[test]
    fn test_directory_queue_numbers_entries() {
        let tmp = tempdir().unwrap();
        let mut queue = DirectoryQueue::new(tmp.path().join("launchpad"));

        assert_eq!(queue.add_workflow(&workflow_in(tmp.path(), 1)).unwrap(), "wf-00001");
        assert_eq!(queue.add_workflow(&workflow_in(tmp.path(), 2)).unwrap(), "wf-00002");

        let entries = queue.entries().unwrap();
        assert_eq!(entries.len(), 2);

        let content = fs::read_to_string(&entries[1]).unwrap();
        let restored: Workflow = serde_json::from_str(&content).unwrap();
        assert_eq!(restored.nodes, 2);
        assert_eq!(restored, workflow_in(tmp.path(), 2));
    }

    #[test]
    fn test_directory_queue_ignores_foreign_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::write(tmp.path().join("wf-00007.json"), "{}").unwrap();

        let mut queue = DirectoryQueue::new(tmp.path());
        assert_eq!(queue.add_workflow(&workflow_in(tmp.path(), 1)).unwrap(), "wf-00008");
    }

    #[test]
    fn test_slurm_queue_prepares_job_dirs() {
        let tmp = tempdir().unwrap();
        let wf = workflow_in(tmp.path(), 1);
        let mut queue = SlurmQueue::new(SlurmSettings::default(), false);

        let id = queue.add_workflow(&wf).unwrap();
        assert_eq!(id, format!("{} jobs prepared", wf.runs.len()));

        for run in &wf.runs {
            let dir = wf.run_dir(run);
            for file in ["POSCAR", "INCAR", "KPOINTS", "job.sbatch"] {
                assert!(dir.join(file).is_file(), "missing {}", file);
            }
        }

        let run = wf.runs.last().unwrap();
        let incar = fs::read_to_string(wf.run_dir(run).join("INCAR")).unwrap();
        assert!(incar.contains(&format!("KPAR = {}", run.kpar)));
        let script = fs::read_to_string(wf.run_dir(run).join("job.sbatch")).unwrap();
        assert!(script.contains("mpirun -np 20 vasp_std"));
    }

    #[test]
    fn test_slurm_queue_rejects_oversized_workflow() {
        let tmp = tempdir().unwrap();
        let mut wf = workflow_in(tmp.path(), 1);
        wf.nodes = u32::MAX;
        let mut queue = SlurmQueue::new(SlurmSettings::default(), false);

        let err = queue.add_workflow(&wf).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));
        assert!(!wf.run_dir(&wf.runs[0]).exists());
    }
}
