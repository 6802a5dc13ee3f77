use crate::{
    ast::{QueryAst, Traversal},
    compile::{CompileState, framework::Pass},
    error::{CompileError, CompilerInvariantError},
};

///
/// Recursive-traversal selection pass
///
/// A recursive query carries exactly one traversal, and that traversal
/// carries the variable-length spec. Anything else is caller misuse.
///

pub struct RecursivePass;

impl Pass for RecursivePass {
    type State = CompileState;
    type Output = Traversal;

    fn name(&self) -> &'static str {
        "recursive-selection"
    }

    fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError> {
        select_recursive_traversal(&state.ast).cloned()
    }

    fn update(&self, mut state: Self::State, output: Self::Output) -> Self::State {
        state.recursive = Some(output);
        state
    }
}

/// The single variable-length traversal of a recursive query.
pub fn select_recursive_traversal(ast: &QueryAst) -> Result<&Traversal, CompileError> {
    let traversals = &ast.traversals;
    if traversals.len() != 1 {
        return Err(CompilerInvariantError::RecursiveTraversalCount {
            count: traversals.len(),
        }
        .into());
    }
    let traversal = &traversals[0];
    if traversal.variable_length.is_none() {
        return Err(CompilerInvariantError::MissingVariableLength.into());
    }

    Ok(traversal)
}

/// Reject variable-length traversals outside recursive mode.
pub fn ensure_no_variable_length(traversals: &[Traversal]) -> Result<(), CompileError> {
    if traversals.iter().any(Traversal::is_variable_length) {
        return Err(CompilerInvariantError::MixedVariableLength.into());
    }

    Ok(())
}
