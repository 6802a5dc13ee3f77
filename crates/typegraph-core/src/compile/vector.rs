use crate::{
    ast::{Predicate, VectorMetric, VectorPredicate},
    compile::{CompileState, framework::Pass},
    dialect::{Dialect, VectorPredicateStrategy},
    error::{
        CompileError, CompilerInvariantError, DialectCapabilityError, UnsupportedPredicateError,
    },
};

///
/// Vector-predicate pass
///
/// Collects the query's `vector_similarity` predicates. Occurrences under
/// `or`/`not` are rejected outright, as is more than one predicate
/// overall. The surviving predicate is checked against the dialect's
/// vector capabilities and its own numeric bounds.
///

pub struct VectorPass<'a> {
    pub dialect: &'a dyn Dialect,
}

impl Pass for VectorPass<'_> {
    type State = CompileState;
    type Output = Option<VectorPredicate>;

    fn name(&self) -> &'static str {
        "vector-predicate"
    }

    fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError> {
        let mut found: Vec<&VectorPredicate> = Vec::new();
        let mut guarded = false;
        for target in &state.ast.predicates {
            collect(&target.expression, false, &mut found, &mut guarded);
        }
        if guarded {
            return Err(CompilerInvariantError::VectorUnderOrNot.into());
        }
        if found.len() > 1 {
            return Err(CompilerInvariantError::MultipleVectorPredicates { count: found.len() }.into());
        }
        let Some(predicate) = found.pop() else {
            return Ok(None);
        };

        let capabilities = self.dialect.capabilities();
        if capabilities.vector_predicate_strategy == VectorPredicateStrategy::Unsupported
            || !self.dialect.supports_vectors()
        {
            return Err(UnsupportedPredicateError::VectorsUnsupported {
                dialect: self.dialect.name().to_string(),
            }
            .into());
        }
        if !capabilities.vector_metrics.contains(&predicate.metric) {
            return Err(DialectCapabilityError::MetricUnsupported {
                dialect: self.dialect.name().to_string(),
                metric: predicate.metric,
            }
            .into());
        }
        if predicate.limit == 0 {
            return Err(CompilerInvariantError::InvalidVectorLimit.into());
        }
        if let Some(min_score) = predicate.min_score {
            let in_range = min_score.is_finite()
                && (predicate.metric != VectorMetric::Cosine
                    || (-1.0..=1.0).contains(&min_score));
            if !in_range {
                return Err(CompilerInvariantError::InvalidMinScore {
                    metric: predicate.metric,
                    min_score,
                }
                .into());
            }
        }

        Ok(Some(predicate.clone()))
    }

    fn update(&self, mut state: Self::State, output: Self::Output) -> Self::State {
        state.vector = output;
        state
    }
}

fn collect<'p>(
    predicate: &'p Predicate,
    under_or_not: bool,
    found: &mut Vec<&'p VectorPredicate>,
    guarded: &mut bool,
) {
    match predicate {
        Predicate::VectorSimilarity(vector) => {
            if under_or_not {
                *guarded = true;
            } else {
                found.push(vector);
            }
        }
        Predicate::And(children) => {
            for child in children {
                collect(child, under_or_not, found, guarded);
            }
        }
        Predicate::Or(children) => {
            for child in children {
                collect(child, true, found, guarded);
            }
        }
        Predicate::Not(inner) => collect(inner, true, found, guarded),
        _ => {}
    }
}
