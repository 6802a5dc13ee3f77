use crate::{
    ast::{
        AggregateExpr, AggregateFunction, ArrayMatchOp, CompareOp, ComparisonRhs, FieldRef,
        Literal, NullCheckOp, ObjectMatchOp, OrderKey, Predicate, QueryExpr, SortDirection,
        StringMatchOp, VectorMetric, VectorPredicate,
    },
    dialect::{Dialect, SqlExpr},
    error::{CompileError, CompilerInvariantError, UnsupportedPredicateError},
    subquery,
};
use typegraph_schema::{JsonPointer, ValueType};

///
/// Expression compilation
///
/// Lowers predicate trees, field references, aggregates, and order keys
/// into the dialect's expression algebra. Field extraction uses the typed
/// JSON extractor matching the field's classification; literal values
/// always bind.
///

///
/// SubqueryRenderer
///
/// Seam for the driver: predicates embedding a composable subquery
/// (`EXISTS`, `IN`) delegate the inner SELECT here.
///

pub trait SubqueryRenderer {
    fn render_subquery(&self, query: &QueryExpr) -> Result<SqlExpr, CompileError>;
}

///
/// NoSubqueries
///
/// Default renderer for contexts where subquery predicates cannot occur
/// (index WHERE clauses, tests).
///

pub struct NoSubqueries;

impl SubqueryRenderer for NoSubqueries {
    fn render_subquery(&self, _query: &QueryExpr) -> Result<SqlExpr, CompileError> {
        Err(UnsupportedPredicateError::SubqueryRendererMissing {
            dialect: "unspecified".to_string(),
        }
        .into())
    }
}

///
/// ExpressionCompiler
///

pub struct ExpressionCompiler<'a> {
    dialect: &'a dyn Dialect,
    subqueries: &'a dyn SubqueryRenderer,
}

impl<'a> ExpressionCompiler<'a> {
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            subqueries: &NoSubqueries,
        }
    }

    #[must_use]
    pub fn with_subqueries(
        dialect: &'a dyn Dialect,
        subqueries: &'a dyn SubqueryRenderer,
    ) -> Self {
        Self {
            dialect,
            subqueries,
        }
    }

    /// The quoted, optionally alias-qualified column a field reads.
    #[must_use]
    pub fn qualified_column(&self, field: &FieldRef) -> String {
        let column = self.dialect.quote_identifier(field.column_name());
        if field.alias.is_empty() {
            column
        } else {
            format!("{}.{column}", self.dialect.quote_identifier(&field.alias))
        }
    }

    /// Compile a field reference to its value expression.
    ///
    /// Document fields go through the typed extractor for their
    /// classification; `array`/`object`/`embedding` fall through to raw
    /// JSON extraction as a conservative fallback in query expressions.
    #[must_use]
    pub fn compile_field(&self, field: &FieldRef) -> SqlExpr {
        let column = self.qualified_column(field);
        let Some(pointer) = &field.json_pointer else {
            return SqlExpr::raw(column);
        };

        self.typed_extract(&column, pointer, field.effective_type())
    }

    fn typed_extract(&self, column: &str, pointer: &JsonPointer, value_type: ValueType) -> SqlExpr {
        match value_type {
            ValueType::Number => self.dialect.json_extract_number(column, pointer),
            ValueType::Boolean => self.dialect.json_extract_boolean(column, pointer),
            ValueType::Date => self.dialect.json_extract_date(column, pointer),
            ValueType::String | ValueType::Unknown => {
                self.dialect.json_extract_text(column, pointer)
            }
            ValueType::Array | ValueType::Object | ValueType::Embedding => {
                self.dialect.json_extract(column, pointer)
            }
        }
    }

    /// Compile one predicate tree.
    pub fn compile_predicate(&self, predicate: &Predicate) -> Result<SqlExpr, CompileError> {
        match predicate {
            Predicate::Comparison { field, op, rhs } => self.compile_comparison(field, *op, rhs),
            Predicate::StringMatch { field, op, pattern } => {
                Ok(self.compile_string_match(field, *op, pattern))
            }
            Predicate::NullCheck { field, op } => {
                let suffix = match op {
                    NullCheckOp::IsNull => " IS NULL",
                    NullCheckOp::IsNotNull => " IS NOT NULL",
                };
                Ok(SqlExpr::seq([self.compile_field(field), SqlExpr::raw(suffix)]))
            }
            Predicate::Between {
                field,
                lower,
                upper,
            } => Ok(SqlExpr::seq([
                self.compile_field(field),
                SqlExpr::raw(" BETWEEN "),
                self.dialect.bind_value(lower.clone()),
                SqlExpr::raw(" AND "),
                self.dialect.bind_value(upper.clone()),
            ])),
            Predicate::ArrayMatch {
                field,
                op,
                values,
                length,
            } => self.compile_array_match(field, *op, values, *length),
            Predicate::ObjectMatch {
                field,
                op,
                pointer,
                value,
                value_type,
                ..
            } => self.compile_object_match(field, *op, pointer, value.as_ref(), *value_type),
            Predicate::And(children) => self.compile_connective(children, " AND ", true),
            Predicate::Or(children) => self.compile_connective(children, " OR ", false),
            Predicate::Not(inner) => Ok(SqlExpr::seq([
                SqlExpr::raw("NOT "),
                self.compile_predicate(inner)?.grouped(),
            ])),
            Predicate::AggregateCompare {
                aggregate,
                op,
                value,
            } => Ok(SqlExpr::seq([
                self.compile_aggregate(aggregate),
                SqlExpr::raw(format!(" {} ", compare_sql(*op))),
                self.dialect.bind_value(value.clone()),
            ])),
            Predicate::Exists { subquery, negated } => {
                let rendered = self.subqueries.render_subquery(subquery)?;
                let keyword = if *negated { "NOT EXISTS " } else { "EXISTS " };
                Ok(SqlExpr::seq([SqlExpr::raw(keyword), rendered.grouped()]))
            }
            Predicate::InSubquery {
                field,
                subquery,
                negated,
            } => self.compile_in_subquery(field, subquery, *negated),
            Predicate::VectorSimilarity(_) => Err(CompilerInvariantError::PlanShape {
                detail: "vector predicates compile through the knn stage".to_string(),
            }
            .into()),
        }
    }

    /// Compile a conjunction of predicate trees into one fragment, or
    /// `None` when the list is empty.
    pub fn compile_filter<'p>(
        &self,
        predicates: impl IntoIterator<Item = &'p Predicate>,
    ) -> Result<Option<SqlExpr>, CompileError> {
        let compiled = predicates
            .into_iter()
            .map(|predicate| Ok(self.compile_predicate(predicate)?.grouped()))
            .collect::<Result<Vec<_>, CompileError>>()?;
        if compiled.is_empty() {
            return Ok(None);
        }

        Ok(Some(SqlExpr::join(compiled, " AND ")))
    }

    #[must_use]
    pub fn compile_aggregate(&self, aggregate: &AggregateExpr) -> SqlExpr {
        let function = match aggregate.function {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        };

        SqlExpr::seq([
            SqlExpr::raw(format!("{function}(")),
            self.compile_field(&aggregate.field),
            SqlExpr::raw(")"),
        ])
    }

    #[must_use]
    pub fn compile_order_key(&self, key: &OrderKey) -> SqlExpr {
        let direction = match key.direction {
            SortDirection::Asc => " ASC",
            SortDirection::Desc => " DESC",
        };

        SqlExpr::seq([self.compile_field(&key.field), SqlExpr::raw(direction)])
    }

    /// The orderable distance expression for a vector predicate.
    pub fn compile_vector_distance(
        &self,
        vector: &VectorPredicate,
    ) -> Result<SqlExpr, CompileError> {
        let column = self.qualified_column(&vector.field);

        self.dialect
            .vector_distance(&column, &vector.query_embedding, vector.metric)
    }

    /// The similarity-floor condition, when a minimum score is declared.
    ///
    /// The floor translates to a distance bound per metric: cosine
    /// `1 - s`, inner product `-s` (distance is negative inner product),
    /// l2 taken directly as a distance bound.
    pub fn compile_vector_floor(
        &self,
        vector: &VectorPredicate,
    ) -> Result<Option<SqlExpr>, CompileError> {
        let Some(min_score) = vector.min_score else {
            return Ok(None);
        };
        let threshold = match vector.metric {
            VectorMetric::Cosine => 1.0 - min_score,
            VectorMetric::InnerProduct => -min_score,
            VectorMetric::L2 => min_score,
        };
        let distance = self.compile_vector_distance(vector)?;
        let bound = Literal::number(threshold).map_err(CompileError::from)?;

        Ok(Some(SqlExpr::seq([
            distance,
            SqlExpr::raw(" <= "),
            self.dialect.bind_value(bound),
        ])))
    }

    fn compile_comparison(
        &self,
        field: &FieldRef,
        op: CompareOp,
        rhs: &ComparisonRhs,
    ) -> Result<SqlExpr, CompileError> {
        let lhs = self.compile_field(field);
        match rhs {
            ComparisonRhs::Scalar(literal) => Ok(SqlExpr::seq([
                lhs,
                SqlExpr::raw(format!(" {} ", compare_sql(op))),
                self.dialect.bind_value(literal.clone()),
            ])),
            ComparisonRhs::Param(parameter) => Ok(SqlExpr::seq([
                lhs,
                SqlExpr::raw(format!(" {} ", compare_sql(op))),
                SqlExpr::param(parameter.clone()),
            ])),
            ComparisonRhs::List(values) => {
                if values.is_empty() {
                    // Empty membership has a constant truth value.
                    return Ok(self.dialect.boolean_literal(op == CompareOp::NotIn));
                }
                let keyword = match op {
                    CompareOp::In => " IN (",
                    CompareOp::NotIn => " NOT IN (",
                    _ => {
                        return Err(CompilerInvariantError::PlanShape {
                            detail: format!("list operand on scalar operator {}", compare_sql(op)),
                        }
                        .into());
                    }
                };
                let binds = SqlExpr::join(
                    values
                        .iter()
                        .map(|value| self.dialect.bind_value(value.clone())),
                    ", ",
                );
                Ok(SqlExpr::seq([
                    lhs,
                    SqlExpr::raw(keyword),
                    binds,
                    SqlExpr::raw(")"),
                ]))
            }
        }
    }

    fn compile_string_match(
        &self,
        field: &FieldRef,
        op: StringMatchOp,
        pattern: &Literal,
    ) -> SqlExpr {
        let column = self.compile_field(field);
        let column_text = column.render(self.dialect.placeholder_style()).sql;
        match op {
            StringMatchOp::Like => SqlExpr::seq([
                column,
                SqlExpr::raw(" LIKE "),
                self.dialect.bind_value(pattern.clone()),
            ]),
            StringMatchOp::Ilike => self.dialect.ilike(&column_text, pattern.clone()),
            StringMatchOp::Contains => self.escaped_like(column, pattern, true, true),
            StringMatchOp::StartsWith => self.escaped_like(column, pattern, false, true),
            StringMatchOp::EndsWith => self.escaped_like(column, pattern, true, false),
        }
    }

    fn escaped_like(
        &self,
        column: SqlExpr,
        pattern: &Literal,
        leading: bool,
        trailing: bool,
    ) -> SqlExpr {
        let escaped = escape_like_pattern(&pattern.as_text());
        let wildcarded = format!(
            "{}{}{}",
            if leading { "%" } else { "" },
            escaped,
            if trailing { "%" } else { "" }
        );

        SqlExpr::seq([
            column,
            SqlExpr::raw(" LIKE "),
            self.dialect.bind_value(Literal::string(wildcarded)),
            SqlExpr::raw(" ESCAPE '\\'"),
        ])
    }

    fn compile_array_match(
        &self,
        field: &FieldRef,
        op: ArrayMatchOp,
        values: &[Literal],
        length: Option<u64>,
    ) -> Result<SqlExpr, CompileError> {
        let column = self.qualified_column(field);
        let pointer = field.json_pointer.clone().unwrap_or_default();

        if op.takes_length() {
            let bound = length.ok_or_else(|| CompilerInvariantError::PlanShape {
                detail: "length operator without a length operand".to_string(),
            })?;
            let operator = match op {
                ArrayMatchOp::LengthEq => "=",
                ArrayMatchOp::LengthGt => ">",
                ArrayMatchOp::LengthGte => ">=",
                ArrayMatchOp::LengthLt => "<",
                ArrayMatchOp::LengthLte => "<=",
                _ => unreachable!("takes_length covers exactly the length operators"),
            };
            #[expect(clippy::cast_precision_loss)]
            let literal = Literal::number(bound as f64).map_err(CompileError::from)?;
            return Ok(SqlExpr::seq([
                self.dialect.json_array_length(&column, &pointer),
                SqlExpr::raw(format!(" {operator} ")),
                self.dialect.bind_value(literal),
            ]));
        }

        Ok(match op {
            ArrayMatchOp::Contains => {
                let value = values.first().ok_or_else(|| {
                    CompileError::from(CompilerInvariantError::PlanShape {
                        detail: "array contains without an operand".to_string(),
                    })
                })?;
                self.dialect.json_array_contains(&column, &pointer, value)
            }
            ArrayMatchOp::ContainsAll => {
                self.dialect.json_array_contains_all(&column, &pointer, values)
            }
            ArrayMatchOp::ContainsAny => {
                self.dialect.json_array_contains_any(&column, &pointer, values)
            }
            ArrayMatchOp::IsEmpty => SqlExpr::seq([
                self.dialect.json_array_length(&column, &pointer),
                SqlExpr::raw(" = 0"),
            ]),
            ArrayMatchOp::IsNotEmpty => SqlExpr::seq([
                self.dialect.json_array_length(&column, &pointer),
                SqlExpr::raw(" > 0"),
            ]),
            _ => unreachable!("length operators handled above"),
        })
    }

    fn compile_object_match(
        &self,
        field: &FieldRef,
        op: ObjectMatchOp,
        pointer: &JsonPointer,
        value: Option<&Literal>,
        value_type: Option<ValueType>,
    ) -> Result<SqlExpr, CompileError> {
        let column = self.qualified_column(field);
        let base = field.json_pointer.clone().unwrap_or_default();
        let full = base
            .join(pointer)
            .map_err(|err| CompilerInvariantError::PlanShape {
                detail: format!("object path does not compose: {err}"),
            })?;

        Ok(match op {
            ObjectMatchOp::HasKey => self.dialect.json_has_key(&column, &full),
            ObjectMatchOp::HasPath => self.dialect.json_has_path(&column, &full),
            ObjectMatchOp::PathIsNull => self.dialect.json_path_is_null(&column, &full),
            ObjectMatchOp::PathIsNotNull => self.dialect.json_path_is_not_null(&column, &full),
            ObjectMatchOp::PathEquals => {
                let literal = value.ok_or_else(|| {
                    CompileError::from(CompilerInvariantError::PlanShape {
                        detail: "path equality without an operand".to_string(),
                    })
                })?;
                let effective = value_type.unwrap_or(literal.value_type);
                if effective.is_scalar() {
                    SqlExpr::seq([
                        self.typed_extract(&column, &full, effective),
                        SqlExpr::raw(" = "),
                        self.dialect.bind_value(literal.clone()),
                    ])
                } else {
                    self.dialect.json_path_equals(&column, &full, literal)
                }
            }
            ObjectMatchOp::PathContains => {
                let literal = value.ok_or_else(|| {
                    CompileError::from(CompilerInvariantError::PlanShape {
                        detail: "path containment without an operand".to_string(),
                    })
                })?;
                self.dialect.json_array_contains(&column, &full, literal)
            }
        })
    }

    fn compile_connective(
        &self,
        children: &[Predicate],
        separator: &str,
        empty_truth: bool,
    ) -> Result<SqlExpr, CompileError> {
        if children.is_empty() {
            return Ok(self.dialect.boolean_literal(empty_truth));
        }
        let compiled = children
            .iter()
            .map(|child| Ok(self.compile_predicate(child)?.grouped()))
            .collect::<Result<Vec<_>, CompileError>>()?;

        Ok(SqlExpr::join(compiled, separator).grouped())
    }

    fn compile_in_subquery(
        &self,
        field: &FieldRef,
        subquery: &QueryExpr,
        negated: bool,
    ) -> Result<SqlExpr, CompileError> {
        let columns = subquery::column_count(subquery);
        if columns != 1 {
            return Err(CompilerInvariantError::SubqueryColumnCount { count: columns }.into());
        }
        let inner = subquery::single_column_value_type(subquery);
        let outer = field.value_type;
        for side in [inner, outer].into_iter().flatten() {
            if subquery::is_unsupported_in_subquery_type(side) {
                return Err(
                    CompilerInvariantError::SubqueryUnsupportedType { value_type: side }.into(),
                );
            }
        }
        if !subquery::in_subquery_compatible(outer, inner) {
            return Err(CompilerInvariantError::SubqueryTypeMismatch {
                inner: inner.unwrap_or(ValueType::Unknown),
                outer: outer.unwrap_or(ValueType::Unknown),
            }
            .into());
        }

        let rendered = self.subqueries.render_subquery(subquery)?;
        let keyword = if negated { " NOT IN " } else { " IN " };

        Ok(SqlExpr::seq([
            self.compile_field(field),
            SqlExpr::raw(keyword),
            rendered.grouped(),
        ]))
    }
}

const fn compare_sql(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Eq => "=",
        CompareOp::Neq => "<>",
        CompareOp::Gt => ">",
        CompareOp::Gte => ">=",
        CompareOp::Lt => "<",
        CompareOp::Lte => "<=",
        CompareOp::In => "IN",
        CompareOp::NotIn => "NOT IN",
    }
}

fn escape_like_pattern(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
