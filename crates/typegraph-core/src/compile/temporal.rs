use crate::{
    ast::{Literal, TemporalMode},
    compile::{CompileState, framework::Pass},
    dialect::{Dialect, SqlExpr},
    error::{CompileError, CompilerInvariantError},
};

///
/// Temporal pass
///
/// Captures one reference timestamp for the whole query (the dialect's
/// current-time expression, or the explicit as-of instant) and exposes a
/// per-alias filter factory. Every temporal check in a single query shares
/// that timestamp.
///

pub struct TemporalPass<'a> {
    pub dialect: &'a dyn Dialect,
}

impl Pass for TemporalPass<'_> {
    type State = CompileState;
    type Output = TemporalFilter;

    fn name(&self) -> &'static str {
        "temporal-filter"
    }

    fn execute(&self, state: &Self::State) -> Result<Self::Output, CompileError> {
        let spec = &state.ast.temporal;
        let timestamp = match spec.mode {
            TemporalMode::All => None,
            TemporalMode::Current => Some(self.dialect.current_timestamp()),
            TemporalMode::AsOf => {
                let as_of = spec
                    .as_of
                    .as_ref()
                    .ok_or(CompilerInvariantError::MissingAsOf)?;
                Some(self.dialect.bind_value(Literal::date_iso(as_of.clone())))
            }
        };

        Ok(TemporalFilter {
            mode: spec.mode,
            timestamp,
        })
    }

    fn update(&self, mut state: Self::State, output: Self::Output) -> Self::State {
        state.temporal = Some(output);
        state
    }
}

///
/// TemporalFilter
///
/// The pass output: a factory producing the validity-interval fragment
/// for any table alias, always against the same captured timestamp.
///

#[derive(Clone, Debug)]
pub struct TemporalFilter {
    mode: TemporalMode,
    timestamp: Option<SqlExpr>,
}

impl TemporalFilter {
    #[must_use]
    pub const fn mode(&self) -> TemporalMode {
        self.mode
    }

    /// The validity filter for one alias, or `None` in `All` mode.
    #[must_use]
    pub fn for_alias(&self, dialect: &dyn Dialect, alias: Option<&str>) -> Option<SqlExpr> {
        let timestamp = self.timestamp.as_ref()?;
        let prefix = alias.map_or_else(String::new, |a| format!("{}.", dialect.quote_identifier(a)));
        let valid_from = format!("{prefix}{}", dialect.quote_identifier("valid_from"));
        let valid_to = format!("{prefix}{}", dialect.quote_identifier("valid_to"));
        let deleted_at = format!("{prefix}{}", dialect.quote_identifier("deleted_at"));

        Some(SqlExpr::seq([
            SqlExpr::raw(format!("({valid_from} <= ")),
            timestamp.clone(),
            SqlExpr::raw(format!(" AND ({valid_to} IS NULL OR {valid_to} > ")),
            timestamp.clone(),
            SqlExpr::raw(format!(") AND {deleted_at} IS NULL)")),
        ]))
    }
}
