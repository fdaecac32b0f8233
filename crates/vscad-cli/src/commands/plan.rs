use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde_json::Value;
use vscad_assembly::BuildPlan;
use vscad_core::{json, ProductNode};

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input JSON model
    pub input: PathBuf,
}

pub fn plan(args: PlanArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.input.display()))?;
    // Accept either a full model or a bare product tree.
    let root = value.get(json::PRODUCTS).unwrap_or(&value);

    let plan = BuildPlan::from_root(root)?;
    if plan.is_empty() {
        println!(
            "⚠️  {} The product tree has no children; nothing to build.",
            "Note:".yellow().bold()
        );
        return Ok(());
    }

    println!("🧭 {} {}", "Build plan for".green().bold(), args.input.display());
    let mut step = 1;
    for (depth, bucket) in plan.levels() {
        println!();
        println!("   {} {}", "Depth".bold(), depth);
        for raw in bucket {
            if let Some(node) = ProductNode::parse_assembly(raw)? {
                println!(
                    "   {:>3}. {} ({} children)",
                    step,
                    node.unique_name(),
                    node.children.len()
                );
                step += 1;
            }
        }
    }
    println!();
    println!("   Assemblies: {}", plan.assembly_count());
    Ok(())
}
