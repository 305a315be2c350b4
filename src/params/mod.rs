//! # 作业参数推导模块
//!
//! 从结构和用户输入推导 VASP 并行测试所需的参数。
//!
//! ## 依赖关系
//! - 被 `workflow/` 和 `commands/` 使用
//! - 使用 `models/`
//! - 子模块: bands, kpoints, nodes, valence

pub mod bands;
pub mod kpoints;
pub mod nodes;
pub mod valence;

pub use bands::{estimate_nbands, MAX_NBANDS};
pub use kpoints::KpointGrid;
pub use nodes::{parse_nodes_list, parse_range};
pub use valence::electron_count;
