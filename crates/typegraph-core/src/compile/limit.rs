use crate::{
    ast::VectorPredicate,
    compile::{CompileState, framework::Pass},
    error::CompileError,
};

///
/// Limit resolution pass
///
/// A vector predicate caps the effective query limit at its own top-k.
///

pub struct LimitPass;

impl Pass for LimitPass {
    type State = CompileState;
    type Output = Option<u64>;

    fn name(&self) -> &'static str {
        "limit-resolution"
    }

    fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError> {
        Ok(resolve_effective_limit(
            state.ast.limit,
            state.vector.as_ref(),
        ))
    }

    fn update(&self, mut state: Self::State, output: Self::Output) -> Self::State {
        state.effective_limit = output;
        state
    }
}

/// `min(ast_limit ?? vector.limit, vector.limit)`; `None` when neither is
/// present.
#[must_use]
pub fn resolve_effective_limit(
    ast_limit: Option<u64>,
    vector: Option<&VectorPredicate>,
) -> Option<u64> {
    match (ast_limit, vector) {
        (None, None) => None,
        (Some(limit), None) => Some(limit),
        (None, Some(vector)) => Some(vector.limit),
        (Some(limit), Some(vector)) => Some(limit.min(vector.limit)),
    }
}
