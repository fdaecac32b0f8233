//! Build-order resolution for product trees.
//!
//! Assembly documents embed the documents of their sub-assemblies, so the
//! deepest assemblies have to be built first. The traverser walks the raw
//! product tree once and buckets every node that has children by its depth.
//! Replaying the buckets from the deepest level up guarantees that every
//! sub-assembly exists before its parent is built.

use serde_json::Value;
use tracing::trace;
use vscad_core::json;

use crate::error::Result;

/// Assembly nodes bucketed by depth, root at depth 0.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan<'a> {
    buckets: Vec<Vec<&'a Value>>,
}

impl<'a> BuildPlan<'a> {
    /// Plan the build of the tree rooted at `root`.
    ///
    /// The plan is empty when the root has no children.
    pub fn from_root(root: &'a Value) -> Result<Self> {
        let mut plan = Self::default();
        plan.traverse(root, 0)?;
        Ok(plan)
    }

    fn traverse(&mut self, node: &'a Value, depth: usize) -> Result<()> {
        let obj = json::object(node, "product")?;
        let children = json::children(obj)?;
        if children.is_empty() {
            return Ok(());
        }

        if self.buckets.len() <= depth {
            self.buckets.resize_with(depth + 1, Vec::new);
        }
        self.buckets[depth].push(node);
        trace!(depth, children = children.len(), "found assembly");

        for child in children {
            self.traverse(child, depth + 1)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of levels holding assemblies.
    pub fn depth(&self) -> usize {
        self.buckets.len()
    }

    /// Assemblies at `depth`, in tree order.
    pub fn bucket(&self, depth: usize) -> &[&'a Value] {
        self.buckets.get(depth).map(Vec::as_slice).unwrap_or_default()
    }

    /// Levels in build order, deepest first, paired with their depth.
    pub fn levels(&self) -> impl Iterator<Item = (usize, &[&'a Value])> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .rev()
            .map(|(depth, bucket)| (depth, bucket.as_slice()))
    }

    /// Total number of assemblies to build.
    pub fn assembly_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}
