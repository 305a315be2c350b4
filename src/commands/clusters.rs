//! # clusters 命令实现
//!
//! 以表格列出当前配置中的集群。
//!
//! ## 依赖关系
//! - 使用 `config/`

use crate::config::{default_config_path, Config};
use crate::error::Result;
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ClusterRow {
    #[tabled(rename = "Cluster")]
    name: String,
    #[tabled(rename = "Cores/node")]
    cores_per_node: u32,
    #[tabled(rename = "Scratch")]
    scratch_dir: String,
    #[tabled(rename = "Queue")]
    queue_dir: String,
    #[tabled(rename = "Partition")]
    partition: String,
}

/// 执行 clusters 命令
pub fn execute(config: &Config) -> Result<()> {
    output::print_header("Configured Clusters");

    let rows: Vec<ClusterRow> = config
        .clusters
        .iter()
        .map(|(name, cluster)| ClusterRow {
            name: name.clone(),
            cores_per_node: cluster.cores_per_node,
            scratch_dir: cluster.scratch_dir.display().to_string(),
            queue_dir: cluster.queue_dir().display().to_string(),
            partition: cluster.slurm.partition.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Some(path) = default_config_path() {
        output::print_info(&format!("User configuration file: {}", path.display()));
    }

    Ok(())
}
