//! The multi-pass compiler: validation passes over the AST, state
//! threading, and the entry point that lowers a composable query into a
//! validated logical plan.

pub mod expr;
pub mod framework;
pub mod limit;
pub mod recursive;
pub mod temporal;
#[cfg(test)]
mod tests;
pub mod vector;

pub use expr::{ExpressionCompiler, NoSubqueries, SubqueryRenderer};
pub use framework::{Pass, run};
pub use limit::{LimitPass, resolve_effective_limit};
pub use recursive::RecursivePass;
pub use temporal::{TemporalFilter, TemporalPass};
pub use vector::VectorPass;

use crate::{
    ast::{QueryAst, QueryExpr, Traversal, VectorPredicate},
    dialect::Dialect,
    error::CompileError,
    plan::{PlanNode, lowering, validate::validate_plan},
};

///
/// CompileState
///
/// State threaded through the semantic passes. The AST is read-only by
/// convention; passes communicate exclusively through the accumulated
/// outputs.
///

#[derive(Clone, Debug)]
pub struct CompileState {
    pub ast: QueryAst,
    pub vector: Option<VectorPredicate>,
    pub recursive: Option<Traversal>,
    pub temporal: Option<TemporalFilter>,
    pub effective_limit: Option<u64>,
}

impl CompileState {
    #[must_use]
    pub const fn new(ast: QueryAst) -> Self {
        Self {
            ast,
            vector: None,
            recursive: None,
            temporal: None,
            effective_limit: None,
        }
    }
}

///
/// CompiledQuery
///
/// The compiler's output for one composable query: the validated logical
/// plan plus the temporal filter factory shared by every alias.
///

#[derive(Clone, Debug)]
pub struct CompiledQuery {
    pub plan: PlanNode,
    pub temporal: TemporalFilter,
}

/// Compile a composable query into a validated logical plan.
///
/// Each member query runs the semantic passes (vector, recursive
/// selection where applicable, limit resolution) before lowering; the
/// temporal filter is captured once for the whole compilation so every
/// alias shares one reference timestamp.
pub fn compile_query(
    expr: &QueryExpr,
    dialect: &dyn Dialect,
) -> Result<CompiledQuery, CompileError> {
    let lower_member = |ast: &QueryAst| -> Result<PlanNode, CompileError> {
        let state = CompileState::new(ast.clone());
        let recursive_mode = ast.traversals.iter().any(Traversal::is_variable_length);

        let plan = if recursive_mode {
            let state = run(&RecursivePass, state)?;
            lowering::lower_recursive(&state.ast)?
        } else {
            let state = run(&VectorPass { dialect }, state)?;
            let state = run(&LimitPass, state)?;
            lowering::lower_standard(&state.ast, state.vector.as_ref(), state.effective_limit)?
        };
        validate_plan(&plan)?;

        Ok(plan)
    };
    let plan = lowering::lower_query(expr, &lower_member)?;

    let temporal_state = run(
        &TemporalPass { dialect },
        CompileState::new(expr.shape_query().clone()),
    )?;
    let temporal = temporal_state
        .temporal
        .expect("temporal pass always produces a filter");

    Ok(CompiledQuery { plan, temporal })
}
