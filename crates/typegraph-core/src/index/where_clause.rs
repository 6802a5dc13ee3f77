use crate::{
    ast::{CompareOp, ComparisonRhs, FieldRef, LiteralInput, NullCheckOp, Predicate, coerce},
    builder::Expr,
    error::{IndexDefinitionError, UnsupportedLiteralError},
    index::{
        columns::{edge_system_column, node_system_column},
        definition::IndexTarget,
    },
};
use typegraph_schema::{JsonPointer, SchemaIntrospector, ValueType};

///
/// Index WHERE builder
///
/// Exposes each top-level schema field of the indexed kind plus the
/// recognized system columns, by logical name. Unknown keys are an
/// error; nested props access must be expressed through multiple
/// composed predicates, never property chains.
///

pub struct IndexWhereBuilder<'a> {
    introspector: &'a SchemaIntrospector,
    target: IndexTarget,
    kind_name: String,
}

impl<'a> IndexWhereBuilder<'a> {
    #[must_use]
    pub fn new(
        introspector: &'a SchemaIntrospector,
        target: IndexTarget,
        kind_name: impl Into<String>,
    ) -> Self {
        Self {
            introspector,
            target,
            kind_name: kind_name.into(),
        }
    }

    /// Look up a system column or top-level props field by name.
    pub fn field(&self, name: &str) -> Result<WhereField, IndexDefinitionError> {
        let system = match self.target {
            IndexTarget::Node => node_system_column(name),
            IndexTarget::Edge => edge_system_column(name),
        };
        if let Some(column) = system {
            return Ok(WhereField {
                field: FieldRef::typed_column("", column.physical, column.value_type),
            });
        }

        let pointer = JsonPointer::from_segments([name]).map_err(|_| {
            IndexDefinitionError::UnknownWhereKey {
                kind: self.kind_name.clone(),
                key: name.to_string(),
            }
        })?;
        let info = self
            .introspector
            .resolve_pointer(self.target.kind_space(), &self.kind_name, &pointer)
            .map_err(|_| IndexDefinitionError::UnknownWhereKey {
                kind: self.kind_name.clone(),
                key: name.to_string(),
            })?;

        Ok(WhereField {
            field: FieldRef::typed_props("", pointer, info),
        })
    }
}

///
/// WhereField
///
/// One addressable column in an index WHERE clause. Operator methods
/// coerce their inputs against the column's declared type.
///

#[derive(Clone, Debug)]
pub struct WhereField {
    field: FieldRef,
}

impl WhereField {
    fn preferred(&self) -> ValueType {
        self.field.effective_type()
    }

    fn compare(
        &self,
        op: CompareOp,
        value: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        let literal = coerce(value, Some(self.preferred()))?;

        Ok(Expr::new(Predicate::Comparison {
            field: self.field.clone(),
            op,
            rhs: ComparisonRhs::Scalar(literal),
        }))
    }

    pub fn eq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Eq, value)
    }

    pub fn neq(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Neq, value)
    }

    pub fn gt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Gte, value)
    }

    pub fn lt(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(&self, value: impl Into<LiteralInput>) -> Result<Expr, UnsupportedLiteralError> {
        self.compare(CompareOp::Lte, value)
    }

    pub fn in_list<I, V>(&self, values: I) -> Result<Expr, UnsupportedLiteralError>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralInput>,
    {
        let preferred = self.preferred();
        let literals = values
            .into_iter()
            .map(|value| coerce(value, Some(preferred)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expr::new(Predicate::Comparison {
            field: self.field.clone(),
            op: CompareOp::In,
            rhs: ComparisonRhs::List(literals),
        }))
    }

    pub fn between(
        &self,
        lower: impl Into<LiteralInput>,
        upper: impl Into<LiteralInput>,
    ) -> Result<Expr, UnsupportedLiteralError> {
        let preferred = self.preferred();

        Ok(Expr::new(Predicate::Between {
            field: self.field.clone(),
            lower: coerce(lower, Some(preferred))?,
            upper: coerce(upper, Some(preferred))?,
        }))
    }

    #[must_use]
    pub fn is_null(&self) -> Expr {
        Expr::new(Predicate::NullCheck {
            field: self.field.clone(),
            op: NullCheckOp::IsNull,
        })
    }

    #[must_use]
    pub fn is_not_null(&self) -> Expr {
        Expr::new(Predicate::NullCheck {
            field: self.field.clone(),
            op: NullCheckOp::IsNotNull,
        })
    }
}
