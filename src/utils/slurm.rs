//! # Slurm 脚本生成工具
//!
//! 为每个并行测试作业生成 sbatch 提交脚本。
//!
//! ## 依赖关系
//! - 被 `workflow/queue.rs` 使用
//! - 使用 `config/` 中的 `SlurmSettings`

use crate::config::SlurmSettings;

use std::path::Path;

/// Slurm 作业配置
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub job_name: String,
    pub partition: Option<String>,
    pub constraint: Option<String>,
    pub nodes: u32,
    pub ntasks_per_node: u32,
    pub mem_per_cpu: Option<String>,
    pub time_limit: String,
    pub modules: Vec<String>,
}

impl SlurmConfig {
    /// 由集群设置和作业规模构造
    pub fn from_settings(
        settings: &SlurmSettings,
        job_name: impl Into<String>,
        nodes: u32,
        cores_per_node: u32,
    ) -> Self {
        SlurmConfig {
            job_name: job_name.into(),
            partition: settings.partition.clone(),
            constraint: settings.constraint.clone(),
            nodes,
            ntasks_per_node: cores_per_node,
            mem_per_cpu: settings.mem_per_cpu.clone(),
            time_limit: settings.time_limit.clone(),
            modules: settings.modules.clone(),
        }
    }
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &SlurmConfig, workdir: &Path, exec_cmd: &str) -> String {
    let mut directives = vec![
        format!("#SBATCH -J {}", config.job_name),
        format!("#SBATCH --nodes={}", config.nodes),
        format!("#SBATCH --ntasks-per-node={}", config.ntasks_per_node),
        format!("#SBATCH --time {}", config.time_limit),
    ];
    if let Some(ref partition) = config.partition {
        directives.push(format!("#SBATCH --partition {}", partition));
    }
    if let Some(ref constraint) = config.constraint {
        directives.push(format!("#SBATCH --constraint \"{}\"", constraint));
    }
    if let Some(ref mem) = config.mem_per_cpu {
        directives.push(format!("#SBATCH --mem-per-cpu {}", mem));
    }
    directives.push("#SBATCH -o %x.out".to_string());
    directives.push("#SBATCH -e %x.err".to_string());

    let module_loads = config
        .modules
        .iter()
        .map(|m| format!("module load {}", m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"#!/bin/bash
{}

set -euo pipefail

module purge 2>&1
{}

cd "{}"
echo "Running: {}"
{}

echo "Timings:"
sacct -o JobID,Submit,Start,End,CPUTime,State -j $SLURM_JOBID
"#,
        directives.join("\n"),
        module_loads,
        workdir.display(),
        exec_cmd,
        exec_cmd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sbatch_script_contents() {
        let settings = SlurmSettings {
            partition: Some("broadwell".to_string()),
            ..SlurmSettings::default()
        };
        let config = SlurmConfig::from_settings(&settings, "k2_n4", 2, 28);
        let script = generate_sbatch_script(&config, Path::new("/scratch/run"), "mpirun vasp_std");

        assert!(script.starts_with("#!/bin/bash\n#SBATCH -J k2_n4\n"));
        assert!(script.contains("#SBATCH --nodes=2"));
        assert!(script.contains("#SBATCH --ntasks-per-node=28"));
        assert!(script.contains("#SBATCH --partition broadwell"));
        assert!(!script.contains("--constraint"));
        assert!(script.contains("module load vasp"));
        assert!(script.contains("cd \"/scratch/run\""));
    }
}
