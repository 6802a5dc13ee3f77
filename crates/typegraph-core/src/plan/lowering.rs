use crate::{
    ast::{Predicate, PredicateTarget, QueryAst, QueryExpr, SetOperation, VectorPredicate},
    compile::recursive::{ensure_no_variable_length, select_recursive_traversal},
    error::{CompileError, CompilerInvariantError},
    plan::PlanNode,
};
use std::collections::BTreeSet;

///
/// Logical-plan lowering
///
/// Converts a query AST into the ordered operator tree. Three entry
/// modes: standard (joins), recursive (one variable-length traversal),
/// and set operations (recursively lowered sides). Filters are emitted
/// per target scope and never collapsed across scopes.
///

/// Lower a composable query. `lower_member` lowers one member AST (the
/// caller runs its semantic passes there).
pub fn lower_query<F>(expr: &QueryExpr, lower_member: &F) -> Result<PlanNode, CompileError>
where
    F: Fn(&QueryAst) -> Result<PlanNode, CompileError>,
{
    match expr {
        QueryExpr::Query(ast) => lower_member(ast),
        QueryExpr::SetOp(set_op) => lower_set_operation(set_op, lower_member),
    }
}

fn lower_set_operation<F>(
    set_op: &SetOperation,
    lower_member: &F,
) -> Result<PlanNode, CompileError>
where
    F: Fn(&QueryAst) -> Result<PlanNode, CompileError>,
{
    let left = lower_query(&set_op.left, lower_member)?;
    let right = lower_query(&set_op.right, lower_member)?;
    let mut node = PlanNode::SetOp {
        operator: set_op.operator,
        left: Box::new(left),
        right: Box::new(right),
    };
    if !set_op.order_by.is_empty() {
        node = PlanNode::Sort {
            keys: set_op.order_by.clone(),
            input: Box::new(node),
        };
    }
    if set_op.limit.is_some() || set_op.offset.is_some() {
        node = PlanNode::LimitOffset {
            limit: set_op.limit,
            offset: set_op.offset,
            input: Box::new(node),
        };
    }

    Ok(node)
}

/// Standard-mode lowering: scan, start filter, joins, traversal filter,
/// vector knn, aggregate, sort, limit/offset, project.
pub fn lower_standard(
    ast: &QueryAst,
    vector: Option<&VectorPredicate>,
    effective_limit: Option<u64>,
) -> Result<PlanNode, CompileError> {
    ensure_no_variable_length(&ast.traversals)?;

    let (start_targets, traversal_targets) = split_targets(ast)?;
    let mut node = scan(ast);
    if !start_targets.is_empty() {
        node = filter(strip_vector_targets(&start_targets), node);
    }
    for traversal in &ast.traversals {
        node = PlanNode::Join {
            traversal: traversal.clone(),
            input: Box::new(node),
        };
    }
    if !traversal_targets.is_empty() {
        node = filter(strip_vector_targets(&traversal_targets), node);
    }
    if let Some(vector) = vector {
        node = PlanNode::VectorKnn {
            predicate: vector.clone(),
            input: Box::new(node),
        };
    }
    if !ast.group_by.is_empty() || ast.having.is_some() {
        node = PlanNode::Aggregate {
            group_by: ast.group_by.clone(),
            having: ast.having.clone(),
            input: Box::new(node),
        };
    }
    node = finish(ast, node, effective_limit);

    Ok(node)
}

/// Recursive-mode lowering: scan, anchor filter, recursive expansion,
/// edge filter, node filter, sort, limit/offset, project.
pub fn lower_recursive(ast: &QueryAst) -> Result<PlanNode, CompileError> {
    let traversal = select_recursive_traversal(ast)?.clone();
    let anchor: Vec<PredicateTarget> = targets_for(ast, &ast.start.alias);
    let edge: Vec<PredicateTarget> = targets_for(ast, &traversal.edge_alias);
    let node_targets: Vec<PredicateTarget> = targets_for(ast, &traversal.node_alias);
    ensure_known_aliases(
        ast,
        [
            ast.start.alias.as_str(),
            traversal.edge_alias.as_str(),
            traversal.node_alias.as_str(),
        ],
    )?;

    let mut node = scan(ast);
    if !anchor.is_empty() {
        node = filter(anchor, node);
    }
    node = PlanNode::RecursiveExpand {
        traversal,
        input: Box::new(node),
    };
    if !edge.is_empty() {
        node = filter(edge, node);
    }
    if !node_targets.is_empty() {
        node = filter(node_targets, node);
    }
    node = finish(ast, node, ast.limit);

    Ok(node)
}

fn scan(ast: &QueryAst) -> PlanNode {
    PlanNode::Scan {
        alias: ast.start.alias.clone(),
        kinds: ast.start.kinds.clone(),
        include_sub_classes: ast.start.include_sub_classes,
        graph_id: ast.graph_id.clone(),
    }
}

fn filter(predicates: Vec<PredicateTarget>, input: PlanNode) -> PlanNode {
    PlanNode::Filter {
        predicates,
        input: Box::new(input),
    }
}

/// Shared tail: sort, limit/offset, project.
fn finish(ast: &QueryAst, mut node: PlanNode, limit: Option<u64>) -> PlanNode {
    if !ast.order_by.is_empty() {
        node = PlanNode::Sort {
            keys: ast.order_by.clone(),
            input: Box::new(node),
        };
    }
    if limit.is_some() || ast.offset.is_some() {
        node = PlanNode::LimitOffset {
            limit,
            offset: ast.offset,
            input: Box::new(node),
        };
    }

    PlanNode::Project {
        projection: ast.projection.clone(),
        selective_fields: ast.selective_fields.clone(),
        input: Box::new(node),
    }
}

fn targets_for(ast: &QueryAst, alias: &str) -> Vec<PredicateTarget> {
    ast.predicates
        .iter()
        .filter(|target| target.target_alias == alias)
        .cloned()
        .collect()
}

fn split_targets(
    ast: &QueryAst,
) -> Result<(Vec<PredicateTarget>, Vec<PredicateTarget>), CompileError> {
    let mut traversal_aliases: BTreeSet<&str> = BTreeSet::new();
    for traversal in &ast.traversals {
        traversal_aliases.insert(traversal.edge_alias.as_str());
        traversal_aliases.insert(traversal.node_alias.as_str());
    }

    let mut start = Vec::new();
    let mut traversal = Vec::new();
    for target in &ast.predicates {
        if target.target_alias == ast.start.alias {
            start.push(target.clone());
        } else if traversal_aliases.contains(target.target_alias.as_str()) {
            traversal.push(target.clone());
        } else {
            return Err(CompilerInvariantError::PlanShape {
                detail: format!("predicate targets unknown alias {:?}", target.target_alias),
            }
            .into());
        }
    }

    Ok((start, traversal))
}

fn ensure_known_aliases<'a>(
    ast: &QueryAst,
    known: impl IntoIterator<Item = &'a str>,
) -> Result<(), CompileError> {
    let known: BTreeSet<&str> = known.into_iter().collect();
    for target in &ast.predicates {
        if !known.contains(target.target_alias.as_str()) {
            return Err(CompilerInvariantError::PlanShape {
                detail: format!("predicate targets unknown alias {:?}", target.target_alias),
            }
            .into());
        }
    }

    Ok(())
}

/// Drop vector predicates from conjunctive positions; the knn stage
/// consumes them. Targets whose whole expression was the vector predicate
/// are dropped, but the filter node itself is still emitted for the
/// scope.
fn strip_vector_targets(targets: &[PredicateTarget]) -> Vec<PredicateTarget> {
    targets
        .iter()
        .filter_map(|target| {
            strip_vector(&target.expression).map(|expression| PredicateTarget {
                target_alias: target.target_alias.clone(),
                target_type: target.target_type,
                expression,
            })
        })
        .collect()
}

fn strip_vector(predicate: &Predicate) -> Option<Predicate> {
    match predicate {
        Predicate::VectorSimilarity(_) => None,
        Predicate::And(children) => {
            let kept: Vec<Predicate> = children.iter().filter_map(strip_vector).collect();
            if kept.is_empty() {
                None
            } else {
                Some(Predicate::And(kept))
            }
        }
        other => Some(other.clone()),
    }
}
