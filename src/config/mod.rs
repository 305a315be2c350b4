//! # 集群配置
//!
//! 集群定义（scratch 目录、每节点核数、作业队列位置、Slurm 设置）、
//! 价电子数覆盖表以及默认的错误处理器列表。
//!
//! ## 查找顺序
//! 1. `--config <path>` 或环境变量 `PARBENCH_CONFIG`
//! 2. `<用户配置目录>/parbench/clusters.json`
//! 3. 内置默认值 (`leibniz`, `hopper`)
//!
//! ## 配置文件示例
//! ```text
//! {
//!   "clusters": {
//!     "leibniz": {
//!       "scratch_dir": "/scratch/antwerpen/202/vsc20248",
//!       "cores_per_node": 28,
//!       "queue_dir": "/scratch/antwerpen/202/vsc20248/launchpad",
//!       "slurm": { "partition": "broadwell", "time_limit": "01:00:00" }
//!     }
//!   },
//!   "valence": { "Ti": 4.0 },
//!   "handlers": ["VaspErrorHandler"]
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `serde_json` 读取, `directories` 定位默认配置

use crate::error::{ParbenchError, Result};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 集群的 Slurm 作业设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlurmSettings {
    pub partition: Option<String>,
    pub constraint: Option<String>,
    pub mem_per_cpu: Option<String>,
    pub time_limit: String,
    pub modules: Vec<String>,
    pub mpi_launcher: String,
    pub vasp_exec: String,
}

impl Default for SlurmSettings {
    fn default() -> Self {
        SlurmSettings {
            partition: None,
            constraint: None,
            mem_per_cpu: None,
            time_limit: "01:00:00".to_string(),
            modules: vec!["vasp".to_string()],
            mpi_launcher: "mpirun".to_string(),
            vasp_exec: "vasp_std".to_string(),
        }
    }
}

/// 单个集群的配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub scratch_dir: PathBuf,
    pub cores_per_node: u32,
    /// 目录队列的位置；缺省为 `<scratch_dir>/launchpad`
    #[serde(default)]
    pub queue_dir: Option<PathBuf>,
    #[serde(default)]
    pub slurm: SlurmSettings,
}

impl ClusterConfig {
    pub fn queue_dir(&self) -> PathBuf {
        self.queue_dir
            .clone()
            .unwrap_or_else(|| self.scratch_dir.join("launchpad"))
    }
}

fn default_handlers() -> Vec<String> {
    ["VaspErrorHandler", "UnconvergedErrorHandler"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 顶层配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub clusters: BTreeMap<String, ClusterConfig>,
    /// 元素价电子数覆盖
    #[serde(default)]
    pub valence: BTreeMap<String, f64>,
    #[serde(default = "default_handlers")]
    pub handlers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let scratch = PathBuf::from("/scratch/antwerpen/202/vsc20248");
        let cluster = |cores_per_node| ClusterConfig {
            scratch_dir: scratch.clone(),
            cores_per_node,
            queue_dir: None,
            slurm: SlurmSettings::default(),
        };

        Config {
            clusters: BTreeMap::from([
                ("leibniz".to_string(), cluster(28)),
                ("hopper".to_string(), cluster(20)),
            ]),
            valence: BTreeMap::new(),
            handlers: default_handlers(),
        }
    }
}

impl Config {
    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ParbenchError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    pub fn from_json_str(content: &str, source: &str) -> Result<Self> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| ParbenchError::ParseError {
                format: "config json".to_string(),
                path: source.to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 按查找顺序加载：显式路径 > 用户配置目录 > 内置默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Config::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.clusters.is_empty() {
            return Err(ParbenchError::InvalidConfiguration(
                "no clusters defined".to_string(),
            ));
        }
        for (name, cluster) in &self.clusters {
            if cluster.cores_per_node == 0 {
                return Err(ParbenchError::InvalidConfiguration(format!(
                    "cluster '{}' has cores_per_node = 0",
                    name
                )));
            }
        }
        Ok(())
    }

    /// 查找集群
    pub fn cluster(&self, name: &str) -> Result<&ClusterConfig> {
        self.clusters
            .get(name)
            .ok_or_else(|| ParbenchError::UnknownCluster {
                name: name.to_string(),
                available: self.clusters.keys().cloned().collect::<Vec<_>>().join(", "),
            })
    }
}

/// 用户配置目录下的默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "parbench").map(|dirs| dirs.config_dir().join("clusters.json"))
}
