use crate::{
    error::{CompileError, CompilerInvariantError},
    plan::{PlanNode, PlanOp},
};

///
/// Plan validation
///
/// Checks the operator-tree invariants after lowering: the staged
/// operators appear at most once per linear segment and in their fixed
/// relative order (project over limit over sort over aggregate over
/// knn); no staged operator appears below the access region; recursive
/// expansion and joins never share a segment; every leaf is a scan.
///
/// Segments are cut at set operations; each lowered side restarts its
/// own stage sequence.
///

pub fn validate_plan(plan: &PlanNode) -> Result<(), CompileError> {
    validate_segment(plan, StageRank::Top)
}

/// Position within one linear segment, ordered from root to leaf.
#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
enum StageRank {
    Top,
    Project,
    LimitOffset,
    Sort,
    Aggregate,
    VectorKnn,
    Access,
}

const fn stage_rank(op: PlanOp) -> Option<StageRank> {
    match op {
        PlanOp::Project => Some(StageRank::Project),
        PlanOp::LimitOffset => Some(StageRank::LimitOffset),
        PlanOp::Sort => Some(StageRank::Sort),
        PlanOp::Aggregate => Some(StageRank::Aggregate),
        PlanOp::VectorKnn => Some(StageRank::VectorKnn),
        _ => None,
    }
}

fn validate_segment(node: &PlanNode, position: StageRank) -> Result<(), CompileError> {
    let op = node.op();
    let next = match op {
        PlanOp::SetOp => {
            // Sides restart their own segments.
            for child in node.children() {
                validate_segment(child, StageRank::Top)?;
            }
            return Ok(());
        }
        PlanOp::Scan => {
            return Ok(());
        }
        PlanOp::Filter | PlanOp::Join | PlanOp::RecursiveExpand => StageRank::Access,
        staged => {
            let rank = stage_rank(staged).expect("staged operators have ranks");
            if position >= StageRank::Access {
                return Err(shape(format!("{op} may not appear below the access region")));
            }
            if rank <= position {
                return Err(shape(format!("{op} is out of stage order")));
            }
            rank
        }
    };

    if op == PlanOp::RecursiveExpand && segment_contains(node, PlanOp::Join) {
        return Err(shape(
            "recursive expansion and joins may not share a segment".to_string(),
        ));
    }

    match node.children().as_slice() {
        [child] => validate_segment(child, next),
        [] => Err(shape(format!("{op} is missing its input"))),
        _ => Err(shape(format!("{op} has more inputs than its arity"))),
    }
}

/// Whether the linear segment below `node` (stopping at set operations)
/// contains the given operator.
fn segment_contains(node: &PlanNode, op: PlanOp) -> bool {
    let mut current = node;
    loop {
        match current.children().as_slice() {
            [child] if current.op() != PlanOp::SetOp => {
                if child.op() == op {
                    return true;
                }
                current = child;
            }
            _ => return false,
        }
    }
}

fn shape(detail: String) -> CompileError {
    CompilerInvariantError::PlanShape { detail }.into()
}

#[cfg(test)]
mod tests {
    use super::validate_plan;
    use crate::{
        ast::Projection,
        plan::PlanNode,
    };

    fn scan() -> PlanNode {
        PlanNode::Scan {
            alias: "p".to_string(),
            kinds: vec!["Person".to_string()],
            include_sub_classes: false,
            graph_id: None,
        }
    }

    fn project(input: PlanNode) -> PlanNode {
        PlanNode::Project {
            projection: Projection::default(),
            selective_fields: None,
            input: Box::new(input),
        }
    }

    #[test]
    fn minimal_chain_is_valid() {
        assert!(validate_plan(&project(scan())).is_ok());
    }

    #[test]
    fn sort_above_limit_is_rejected() {
        let plan = project(PlanNode::Sort {
            keys: Vec::new(),
            input: Box::new(PlanNode::LimitOffset {
                limit: Some(1),
                offset: None,
                input: Box::new(scan()),
            }),
        });

        // Bottom-up, sort must precede limit.
        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn staged_operator_below_a_filter_is_rejected() {
        let plan = project(PlanNode::Filter {
            predicates: Vec::new(),
            input: Box::new(PlanNode::Sort {
                keys: Vec::new(),
                input: Box::new(scan()),
            }),
        });

        assert!(validate_plan(&plan).is_err());
    }

    #[test]
    fn duplicate_project_in_one_segment_is_rejected() {
        let plan = project(project(scan()));

        assert!(validate_plan(&plan).is_err());
    }
}
