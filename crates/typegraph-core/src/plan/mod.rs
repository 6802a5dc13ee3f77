//! The logical plan: a pre-SQL operator tree produced by lowering a query
//! AST. Operators are access-independent; the driver walks the tree and
//! renders SQL with the dialect's expression constructors.

pub mod lowering;
#[cfg(test)]
mod tests;
pub mod validate;

pub use lowering::{lower_query, lower_recursive, lower_standard};

use crate::ast::{
    FieldRef, OrderKey, Predicate, PredicateTarget, Projection, SetOperator, Traversal,
    VectorPredicate,
};
use std::fmt;

///
/// PlanOp
///
/// Operator kind tags, used for shape assertions and rendering.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanOp {
    Scan,
    Filter,
    Join,
    RecursiveExpand,
    VectorKnn,
    Aggregate,
    Sort,
    LimitOffset,
    Project,
    SetOp,
}

impl fmt::Display for PlanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scan => "scan",
            Self::Filter => "filter",
            Self::Join => "join",
            Self::RecursiveExpand => "recursive_expand",
            Self::VectorKnn => "vector_knn",
            Self::Aggregate => "aggregate",
            Self::Sort => "sort",
            Self::LimitOffset => "limit_offset",
            Self::Project => "project",
            Self::SetOp => "set_op",
        };
        write!(f, "{label}")
    }
}

///
/// PlanNode
///
/// Each non-leaf operator has exactly the arity of its kind: one input
/// for the linear stages, two for set operations, none for scans.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PlanNode {
    Scan {
        alias: String,
        kinds: Vec<String>,
        include_sub_classes: bool,
        graph_id: Option<String>,
    },
    Filter {
        predicates: Vec<PredicateTarget>,
        input: Box<PlanNode>,
    },
    Join {
        traversal: Traversal,
        input: Box<PlanNode>,
    },
    RecursiveExpand {
        traversal: Traversal,
        input: Box<PlanNode>,
    },
    VectorKnn {
        predicate: VectorPredicate,
        input: Box<PlanNode>,
    },
    Aggregate {
        group_by: Vec<FieldRef>,
        having: Option<Predicate>,
        input: Box<PlanNode>,
    },
    Sort {
        keys: Vec<OrderKey>,
        input: Box<PlanNode>,
    },
    LimitOffset {
        limit: Option<u64>,
        offset: Option<u64>,
        input: Box<PlanNode>,
    },
    Project {
        projection: Projection,
        selective_fields: Option<Vec<String>>,
        input: Box<PlanNode>,
    },
    SetOp {
        operator: SetOperator,
        left: Box<PlanNode>,
        right: Box<PlanNode>,
    },
}

impl PlanNode {
    #[must_use]
    pub const fn op(&self) -> PlanOp {
        match self {
            Self::Scan { .. } => PlanOp::Scan,
            Self::Filter { .. } => PlanOp::Filter,
            Self::Join { .. } => PlanOp::Join,
            Self::RecursiveExpand { .. } => PlanOp::RecursiveExpand,
            Self::VectorKnn { .. } => PlanOp::VectorKnn,
            Self::Aggregate { .. } => PlanOp::Aggregate,
            Self::Sort { .. } => PlanOp::Sort,
            Self::LimitOffset { .. } => PlanOp::LimitOffset,
            Self::Project { .. } => PlanOp::Project,
            Self::SetOp { .. } => PlanOp::SetOp,
        }
    }

    /// Child operators, left before right for set operations.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Scan { .. } => Vec::new(),
            Self::Filter { input, .. }
            | Self::Join { input, .. }
            | Self::RecursiveExpand { input, .. }
            | Self::VectorKnn { input, .. }
            | Self::Aggregate { input, .. }
            | Self::Sort { input, .. }
            | Self::LimitOffset { input, .. }
            | Self::Project { input, .. } => vec![input],
            Self::SetOp { left, right, .. } => vec![left, right],
        }
    }

    /// Operator kinds in pre-order (root first, set-op left subtree
    /// before right).
    #[must_use]
    pub fn op_chain(&self) -> Vec<PlanOp> {
        let mut chain = Vec::new();
        self.collect_ops(&mut chain);
        chain
    }

    fn collect_ops(&self, chain: &mut Vec<PlanOp>) {
        chain.push(self.op());
        for child in self.children() {
            child.collect_ops(chain);
        }
    }

    fn render(&self, depth: usize, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Self::Scan { alias, kinds, .. } => {
                writeln!(out, "{indent}scan {alias} [{}]", kinds.join(", "))?;
            }
            Self::Filter { predicates, .. } => {
                let targets: Vec<&str> = predicates
                    .iter()
                    .map(|target| target.target_alias.as_str())
                    .collect();
                writeln!(out, "{indent}filter ({})", targets.join(", "))?;
            }
            Self::Join { traversal, .. } => {
                writeln!(
                    out,
                    "{indent}join {} -[{}]-> {}",
                    traversal.join_from_alias,
                    traversal.edge_alias,
                    traversal.node_alias
                )?;
            }
            Self::RecursiveExpand { traversal, .. } => {
                let spec = traversal
                    .variable_length
                    .as_ref()
                    .map_or_else(String::new, |vl| {
                        format!(" {}..{}", vl.min_depth, vl.max_depth)
                    });
                writeln!(out, "{indent}recursive_expand {}{spec}", traversal.edge_alias)?;
            }
            Self::VectorKnn { predicate, .. } => {
                writeln!(
                    out,
                    "{indent}vector_knn {} k={}",
                    predicate.metric, predicate.limit
                )?;
            }
            Self::Aggregate { group_by, .. } => {
                writeln!(out, "{indent}aggregate group_by={}", group_by.len())?;
            }
            Self::Sort { keys, .. } => {
                writeln!(out, "{indent}sort keys={}", keys.len())?;
            }
            Self::LimitOffset { limit, offset, .. } => {
                writeln!(out, "{indent}limit_offset limit={limit:?} offset={offset:?}")?;
            }
            Self::Project { .. } => {
                writeln!(out, "{indent}project")?;
            }
            Self::SetOp { operator, .. } => {
                writeln!(out, "{indent}set_op {operator}")?;
            }
        }
        for child in self.children() {
            child.render(depth + 1, out)?;
        }

        Ok(())
    }
}

impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(0, f)
    }
}
