//! # 并行测试工作流
//!
//! 由选择参数和结构构造"并行测试工作流"：同一结构在给定节点数下，
//! 遍历所有可行的 (KPAR, NCORE) 组合各跑一次，用于比较每个电子步的耗时。
//!
//! ## 目录布局
//! ```text
//! {scratch}/parallel_{functional}/{composition}/{nbands}bands_{kpt}kpoints/
//!   └── {nodes}nodes/
//!         └── kpar{k}_ncore{c}/
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `models/`, `params/`, `config/`
//! - 子模块: queue, submit

pub mod queue;
pub mod submit;

pub use queue::{DirectoryQueue, JobQueue, SlurmQueue};
pub use submit::{decode_geometry, submit_workflows, GeometryUpload, SubmitReport};

use crate::config::ClusterConfig;
use crate::error::{ParbenchError, Result};
use crate::models::Crystal;
use crate::params::{parse_nodes_list, KpointGrid};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 交换关联泛函
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Functional {
    Pbe,
    Hse06,
}

impl Functional {
    /// 泛函相关的 INCAR 标签
    pub fn incar_tags(self) -> Vec<(&'static str, &'static str)> {
        match self {
            Functional::Pbe => vec![("GGA", "PE")],
            Functional::Hse06 => vec![
                ("GGA", "PE"),
                ("LHFCALC", ".TRUE."),
                ("HFSCREEN", "0.2"),
                ("ALGO", "All"),
            ],
        }
    }
}

impl std::fmt::Display for Functional {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Functional::Pbe => write!(f, "pbe"),
            Functional::Hse06 => write!(f, "hse06"),
        }
    }
}

/// 用户的一次提交选择，只被消费一次
#[derive(Debug, Clone)]
pub struct Selection {
    pub cluster: String,
    pub scratch_dir: PathBuf,
    pub cores_per_node: u32,
    pub functional: Functional,
    pub kpt_density: u32,
    pub nbands: u32,
    pub ispin: u8,
    /// 原始节点列表输入
    pub nodes_input: String,
    /// 解析后的节点列表；无法解析时为 `None`
    pub nodes_list: Option<Vec<u32>>,
    /// 允许的 KPAR 取值；`None` 表示总核数的全部因子
    pub kpar_range: Option<Vec<u32>>,
    pub handlers: Vec<String>,
}

impl Selection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cluster_name: &str,
        cluster: &ClusterConfig,
        functional: Functional,
        kpt_density: u32,
        nbands: u32,
        ispin: u8,
        nodes_input: &str,
        kpar_range: Option<Vec<u32>>,
        handlers: Vec<String>,
    ) -> Self {
        Selection {
            cluster: cluster_name.to_string(),
            scratch_dir: cluster.scratch_dir.clone(),
            cores_per_node: cluster.cores_per_node,
            functional,
            kpt_density,
            nbands,
            ispin,
            nodes_input: nodes_input.to_string(),
            nodes_list: parse_nodes_list(nodes_input),
            kpar_range,
            handlers,
        }
    }
}

/// 并行测试的输出目录
pub fn parallelization_dir(
    scratch_dir: &Path,
    functional: Functional,
    structure: &Crystal,
    nbands: u32,
    kpt_density: u32,
) -> PathBuf {
    scratch_dir
        .join(format!("parallel_{}", functional))
        .join(structure.composition_string().replace(' ', ""))
        .join(format!("{}bands_{}kpoints", nbands, kpt_density))
}

/// 单次并行设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelRun {
    pub kpar: u32,
    pub ncore: u32,
    pub npar: u32,
}

impl ParallelRun {
    pub fn dir_name(&self) -> String {
        format!("kpar{}_ncore{}", self.kpar, self.ncore)
    }
}

/// 单个工作流允许的最大总核数
pub const MAX_TOTAL_CORES: u32 = 1_000_000;

/// 总核数 = 节点数 × 每节点核数，溢出或超过 [`MAX_TOTAL_CORES`] 时报错
pub fn total_cores(nodes: u32, cores_per_node: u32) -> Result<u32> {
    nodes
        .checked_mul(cores_per_node)
        .filter(|&total| total <= MAX_TOTAL_CORES)
        .ok_or_else(|| {
            ParbenchError::InvalidConfiguration(format!(
                "{} nodes x {} cores exceeds the limit of {} cores",
                nodes, cores_per_node, MAX_TOTAL_CORES
            ))
        })
}

/// 升序因子列表
fn divisors(n: u32) -> Vec<u32> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d <= n / d {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// 枚举所有可行的 (KPAR, NCORE) 组合
///
/// KPAR 须整除总核数（且位于允许范围内）；NCORE 须同时整除每节点核数和每个 k 点组的核数。
pub fn parallel_runs(
    nodes: u32,
    cores_per_node: u32,
    kpar_range: Option<&[u32]>,
) -> Result<Vec<ParallelRun>> {
    let total = total_cores(nodes, cores_per_node)?;
    let mut runs = Vec::new();

    for kpar in divisors(total) {
        if kpar_range.is_some_and(|allowed| !allowed.contains(&kpar)) {
            continue;
        }
        let group = total / kpar;
        for ncore in divisors(cores_per_node) {
            if group % ncore == 0 {
                runs.push(ParallelRun {
                    kpar,
                    ncore,
                    npar: group / ncore,
                });
            }
        }
    }

    Ok(runs)
}

/// k 点设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpointSettings {
    pub reciprocal_density: u32,
    pub grid: KpointGrid,
}

/// 单个节点数的并行测试工作流
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub directory: PathBuf,
    pub structure: Crystal,
    pub nodes: u32,
    pub cores_per_node: u32,
    pub nbands: u32,
    pub functional: Functional,
    pub kpoints: KpointSettings,
    /// 所有作业共享的 INCAR 标签
    pub incar: BTreeMap<String, String>,
    pub handlers: Vec<String>,
    pub runs: Vec<ParallelRun>,
}

impl Workflow {
    /// 构造工作流；没有任何可行并行设置时报错
    pub fn build(selection: &Selection, structure: &Crystal, directory: &Path, nodes: u32) -> Result<Self> {
        let total = total_cores(nodes, selection.cores_per_node)?;
        let runs = parallel_runs(nodes, selection.cores_per_node, selection.kpar_range.as_deref())?;
        if runs.is_empty() {
            return Err(ParbenchError::InvalidConfiguration(format!(
                "no KPAR in the requested range divides {} cores ({} nodes)",
                total, nodes
            )));
        }

        let mut incar: BTreeMap<String, String> = [
            ("ISTART", "0"),
            ("ICHARG", "2"),
            ("NSW", "0"),
            ("NELM", "10"),
            ("LWAVE", ".FALSE."),
            ("LCHARG", ".FALSE."),
        ]
        .iter()
        .chain(selection.functional.incar_tags().iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        incar.insert("NBANDS".to_string(), selection.nbands.to_string());
        incar.insert("ISPIN".to_string(), selection.ispin.to_string());

        Ok(Workflow {
            name: format!(
                "parallel_{}_{}_{}nodes",
                selection.functional,
                structure.composition_string().replace(' ', ""),
                nodes
            ),
            directory: directory.to_path_buf(),
            structure: structure.clone(),
            nodes,
            cores_per_node: selection.cores_per_node,
            nbands: selection.nbands,
            functional: selection.functional,
            kpoints: KpointSettings {
                reciprocal_density: selection.kpt_density,
                grid: KpointGrid::from_reciprocal_density(structure, selection.kpt_density),
            },
            incar,
            handlers: selection.handlers.clone(),
            runs,
        })
    }

    /// MPI 进程总数
    pub fn total_cores(&self) -> Result<u32> {
        total_cores(self.nodes, self.cores_per_node)
    }

    /// 某个并行设置的作业目录
    pub fn run_dir(&self, run: &ParallelRun) -> PathBuf {
        self.directory
            .join(format!("{}nodes", self.nodes))
            .join(run.dir_name())
    }

    /// 某个并行设置的 INCAR 内容
    pub fn incar_for(&self, run: &ParallelRun) -> String {
        let mut tags = self.incar.clone();
        tags.insert("KPAR".to_string(), run.kpar.to_string());
        tags.insert("NCORE".to_string(), run.ncore.to_string());

        tags.iter()
            .map(|(k, v)| format!("{} = {}\n", k, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{Atom, Lattice};

    pub(crate) fn nacl() -> Crystal {
        Crystal::new(
            "NaCl",
            Lattice::from_parameters(5.64, 5.64, 5.64, 90.0, 90.0, 90.0),
            vec![Atom::new("Na", [0.0, 0.0, 0.0]), Atom::new("Cl", [0.5, 0.5, 0.5])],
        )
    }

    pub(crate) fn selection(nodes: &str) -> Selection {
        let config = Config::default();
        let cluster = config.cluster("hopper").unwrap();
        Selection::new(
            "hopper",
            cluster,
            Functional::Pbe,
            300,
            40,
            1,
            nodes,
            None,
            config.handlers.clone(),
        )
    }

    #[test]
    fn test_parallelization_dir() {
        let dir = parallelization_dir(Path::new("/scratch/u"), Functional::Hse06, &nacl(), 28, 300);
        assert_eq!(
            dir,
            PathBuf::from("/scratch/u/parallel_hse06/Na1Cl1/28bands_300kpoints")
        );
    }

    #[test]
    fn test_selection_parses_nodes() {
        assert_eq!(selection("1, 2, 4").nodes_list, Some(vec![1, 2, 4]));
        assert_eq!(selection("").nodes_list, None);
    }

    #[test]
    fn test_parallel_runs_single_node() {
        // 4 核：KPAR ∈ {1,2,4}，NCORE | 4 且 NCORE | 4/KPAR
        let runs = parallel_runs(1, 4, None).unwrap();
        let pairs: Vec<(u32, u32, u32)> = runs.iter().map(|r| (r.kpar, r.ncore, r.npar)).collect();
        assert_eq!(
            pairs,
            vec![
                (1, 1, 4),
                (1, 2, 2),
                (1, 4, 1),
                (2, 1, 2),
                (2, 2, 1),
                (4, 1, 1)
            ]
        );
    }

    #[test]
    fn test_parallel_runs_respect_kpar_range() {
        let runs = parallel_runs(2, 4, Some(&[2, 3])).unwrap();
        assert!(runs.iter().all(|r| r.kpar == 2));
        assert!(runs.iter().all(|r| r.kpar * r.ncore * r.npar == 8));
        assert!(parallel_runs(1, 4, Some(&[3])).unwrap().is_empty());
    }

    #[test]
    fn test_divisors_sorted() {
        assert_eq!(divisors(1), vec![1]);
        assert_eq!(divisors(28), vec![1, 2, 4, 7, 14, 28]);
        assert_eq!(divisors(36), vec![1, 2, 3, 4, 6, 9, 12, 18, 36]);
    }

    #[test]
    fn test_huge_node_count_rejected() {
        let nodes = parse_nodes_list("200000000").unwrap()[0];
        let err = parallel_runs(nodes, 28, Some(&[1])).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));

        // 不溢出但超出上限
        assert!(total_cores(50_000, 28).is_err());
        assert_eq!(total_cores(10, 28).unwrap(), 280);

        let sel = selection("200000000");
        let err = Workflow::build(&sel, &nacl(), Path::new("/x"), nodes).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_workflow_build() {
        let sel = selection("2");
        let dir = parallelization_dir(&sel.scratch_dir, sel.functional, &nacl(), sel.nbands, sel.kpt_density);
        let wf = Workflow::build(&sel, &nacl(), &dir, 2).unwrap();

        assert_eq!(wf.nodes, 2);
        assert_eq!(wf.cores_per_node, 20);
        assert_eq!(wf.incar.get("NBANDS").map(String::as_str), Some("40"));
        assert_eq!(wf.incar.get("GGA").map(String::as_str), Some("PE"));
        assert!(wf.runs.iter().all(|r| r.kpar * r.ncore * r.npar == 40));

        let run = wf.runs[0];
        assert_eq!(wf.run_dir(&run), dir.join("2nodes").join("kpar1_ncore1"));
        let incar = wf.incar_for(&run);
        assert!(incar.contains("KPAR = 1\n"));
        assert!(incar.contains("NCORE = 1\n"));
    }

    #[test]
    fn test_workflow_without_runs_fails() {
        let mut sel = selection("1");
        sel.kpar_range = Some(vec![3]);
        let err = Workflow::build(&sel, &nacl(), Path::new("/x"), 1).unwrap_err();
        assert!(matches!(err, ParbenchError::InvalidConfiguration(_)));
    }
}
