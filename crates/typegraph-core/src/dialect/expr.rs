use crate::ast::{Literal, Parameter};
use serde::{Deserialize, Serialize};

///
/// SQL expression algebra
///
/// Compiled expressions are trees of raw SQL text and deferred bind
/// values. Literal values always travel as binds; raw nodes carry only
/// text derived from schema identifiers (paths, quoted columns), which is
/// what keeps path compilation byte-stable for expression-index matching.
///

///
/// BindArg
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum BindArg {
    Literal(Literal),
    Param(Parameter),
}

///
/// PlaceholderStyle
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlaceholderStyle {
    /// `$1`, `$2`, … (PostgreSQL)
    Numbered,
    /// `?` (SQLite)
    Positional,
}

///
/// SqlExpr
///

#[derive(Clone, Debug, PartialEq)]
pub enum SqlExpr {
    Raw(String),
    Bind(BindArg),
    Seq(Vec<SqlExpr>),
}

impl SqlExpr {
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    #[must_use]
    pub const fn bind(literal: Literal) -> Self {
        Self::Bind(BindArg::Literal(literal))
    }

    #[must_use]
    pub const fn param(parameter: Parameter) -> Self {
        Self::Bind(BindArg::Param(parameter))
    }

    #[must_use]
    pub fn seq(parts: impl IntoIterator<Item = Self>) -> Self {
        Self::Seq(parts.into_iter().collect())
    }

    /// Join parts with a raw separator.
    #[must_use]
    pub fn join(parts: impl IntoIterator<Item = Self>, separator: &str) -> Self {
        let mut out = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out.push(Self::raw(separator));
            }
            out.push(part);
        }
        Self::Seq(out)
    }

    /// Wrap in parentheses.
    #[must_use]
    pub fn grouped(self) -> Self {
        Self::Seq(vec![Self::raw("("), self, Self::raw(")")])
    }

    /// Flatten into final SQL text plus the ordered bind list.
    #[must_use]
    pub fn render(&self, style: PlaceholderStyle) -> SqlFragment {
        let mut fragment = SqlFragment {
            sql: String::new(),
            binds: Vec::new(),
        };
        self.render_into(style, &mut fragment);
        fragment
    }

    fn render_into(&self, style: PlaceholderStyle, fragment: &mut SqlFragment) {
        match self {
            Self::Raw(text) => fragment.sql.push_str(text),
            Self::Bind(arg) => {
                fragment.binds.push(arg.clone());
                match style {
                    PlaceholderStyle::Numbered => {
                        fragment.sql.push('$');
                        fragment.sql.push_str(&fragment.binds.len().to_string());
                    }
                    PlaceholderStyle::Positional => fragment.sql.push('?'),
                }
            }
            Self::Seq(parts) => {
                for part in parts {
                    part.render_into(style, fragment);
                }
            }
        }
    }
}

///
/// SqlFragment
///
/// The only external artifact of the core: dialect-appropriate SQL text
/// plus its ordered bind values, ready for the driver's SQL builder.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub binds: Vec<BindArg>,
}
