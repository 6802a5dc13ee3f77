use crate::error::CompileError;

///
/// Compiler pass framework
///
/// A pass is a named `execute`/`update` pair. `execute` reads the full
/// state and produces an output without mutating anything; `update` folds
/// that output into a new state. The runner threads state through passes
/// sequentially; there is no backtracking, and passes communicate only
/// through their returned outputs.
///

pub trait Pass {
    type State;
    type Output;

    fn name(&self) -> &'static str;

    fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError>;

    fn update(&self, state: Self::State, output: Self::Output) -> Self::State;
}

/// Run one pass: execute against the state, then fold the output in.
pub fn run<P: Pass>(pass: &P, state: P::State) -> Result<P::State, CompileError> {
    let output = pass.execute(&state)?;

    Ok(pass.update(state, output))
}

#[cfg(test)]
mod tests {
    use super::{Pass, run};
    use crate::error::CompileError;

    ///
    /// CountingPass
    ///
    /// Test fixture: output is a pure function of state, update appends.
    ///

    struct CountingPass {
        label: &'static str,
    }

    impl Pass for CountingPass {
        type State = Vec<String>;
        type Output = String;

        fn name(&self) -> &'static str {
            self.label
        }

        fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError> {
            Ok(format!("{}:{}", self.label, state.len()))
        }

        fn update(&self, mut state: Self::State, output: Self::Output) -> Self::State {
            state.push(output);
            state
        }
    }

    #[test]
    fn run_threads_execute_into_update() {
        let pass = CountingPass { label: "first" };
        let state = run(&pass, Vec::new()).unwrap();

        assert_eq!(state, ["first:0"]);
    }

    #[test]
    fn sequential_runs_compose_like_manual_threading() {
        let p1 = CountingPass { label: "p1" };
        let p2 = CountingPass { label: "p2" };

        let composed = run(&p2, run(&p1, Vec::new()).unwrap()).unwrap();

        let manual = {
            let s0: Vec<String> = Vec::new();
            let o1 = p1.execute(&s0).unwrap();
            let s1 = p1.update(s0, o1);
            let o2 = p2.execute(&s1).unwrap();
            p2.update(s1, o2)
        };

        assert_eq!(composed, manual);
    }

    #[test]
    fn execute_failure_leaves_no_partial_update() {
        struct FailingPass;

        impl Pass for FailingPass {
            type State = Vec<String>;
            type Output = String;

            fn name(&self) -> &'static str {
                "failing"
            }

            fn execute(&self, _state: &Self::State) -> Result<Self::Output, CompileError> {
                Err(crate::error::CompilerInvariantError::PlanShape {
                    detail: "boom".to_string(),
                }
                .into())
            }

            fn update(&self, state: Self::State, _output: Self::Output) -> Self::State {
                unreachable!("update must not run after a failed execute")
            }
        }

        assert!(run(&FailingPass, vec!["seed".to_string()]).is_err());
    }
}
