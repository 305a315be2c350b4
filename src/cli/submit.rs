//! # submit 子命令 CLI 定义
//!
//! 为一组节点数构造并提交并行测试工作流
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use crate::workflow::Functional;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 工作流队列后端
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum QueueKind {
    /// Numbered JSON documents in the cluster's queue directory
    Directory,
    /// Job directories with sbatch scripts, one per parallel run
    Slurm,
}

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Geometry input file (POSCAR, .vasp, .cell or .json)
    pub structure: Option<PathBuf>,

    /// Cluster to run on
    #[arg(long, default_value = "leibniz")]
    pub cluster: String,

    /// Exchange-correlation functional
    #[arg(long, value_enum, default_value = "pbe")]
    pub functional: Functional,

    /// K-point reciprocal density
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u32).range(100..=10000))]
    pub kpoints: u32,

    /// Number of bands (default: estimated from the structure)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10000))]
    pub nbands: Option<u32>,

    /// Spin polarization (1 = non-polarized, 2 = polarized)
    #[arg(long, default_value_t = 1)]
    pub ispin: u8,

    /// Comma-separated list of node counts (e.g., '1, 2, 4')
    #[arg(long)]
    pub nodes: String,

    /// Allowed KPAR values (e.g., '1-8,12'; default: every divisor of the core count)
    #[arg(long)]
    pub kpar: Option<String>,

    // ─────────────────────────────────────────────────────────────
    // Queue options
    // ─────────────────────────────────────────────────────────────
    /// Queue backend
    #[arg(long, value_enum, default_value = "directory")]
    pub queue: QueueKind,

    /// Override the cluster's queue directory (directory queue only)
    #[arg(long)]
    pub queue_dir: Option<PathBuf>,

    /// Call sbatch for every prepared job (slurm queue only)
    #[arg(long, default_value_t = false)]
    pub sbatch: bool,
}
