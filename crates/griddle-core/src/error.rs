use crate::stmt;

use std::fmt;

/// An error that can occur anywhere in Griddle.
///
/// The error is a single boxed kind so that `Result<T>` stays one word
/// wide on the happy path. Driver failures keep their source error and
/// expose it through [`std::error::Error::source`].
pub struct Error {
    kind: Box<ErrorKind>,
}

enum ErrorKind {
    Schema(SchemaError),
    Query(QueryError),
    SqlGen(SqlGenError),
    SqlExec {
        sql: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    Decode(DecodeError),
    Encode(EncodeError),
}

/// A record type could not be reflected into a table schema.
///
/// The derive macro catches these at compile time; the variants surface at
/// runtime only for hand-written `Record` implementations.
#[derive(Debug, PartialEq)]
pub enum SchemaError {
    UnsupportedFieldType {
        field: String,
        type_name: String,
    },
    /// Conflicting or out-of-range primary key declarations.
    AmbiguousPrimaryKey {
        table: String,
    },
}

/// A query chain was assembled in a way the algebra does not allow.
#[derive(Debug, PartialEq)]
pub enum QueryError {
    /// An operation was applied to a chain state that does not permit it.
    IllegalChain { op: &'static str },

    /// The same child-collection field was joined twice.
    DuplicateJoin { field: &'static str },

    /// A join targeted a field of a form that is neither the root form nor
    /// the current focus form.
    UnknownJoinParent { form: &'static str },

    /// The operation requires a primary key and the record type has none.
    MissingPrimaryKey { table: String },
}

/// An expression could not be lowered to SQL.
#[derive(Debug, PartialEq)]
pub enum SqlGenError {
    /// A column reference names a form that is not part of the chain.
    UnknownForm { form: String },

    /// A column reference names a column the form's schema does not have.
    UnknownColumn { form: String, column: String },

    /// A single predicate conjunct references more than one form.
    CrossFormPredicate,
}

/// A row value could not be decoded into a record field.
#[derive(Debug, PartialEq)]
pub enum DecodeError {
    MissingColumn {
        index: usize,
    },
    TypeMismatch {
        expected: stmt::Type,
        actual: &'static str,
    },
    /// The column held SQL NULL but the field is not `Option`.
    UnexpectedNull {
        expected: stmt::Type,
    },
}

/// A value could not be bound as a statement parameter.
#[derive(Debug, PartialEq)]
pub enum EncodeError {
    /// The value does not fit the driver's representation, e.g. a `u64`
    /// beyond the dialect's signed integer range.
    OutOfRange { value: String },
}

impl Error {
    pub fn schema(err: SchemaError) -> Self {
        ErrorKind::Schema(err).into()
    }

    pub fn query(err: QueryError) -> Self {
        ErrorKind::Query(err).into()
    }

    pub fn sql_gen(err: SqlGenError) -> Self {
        ErrorKind::SqlGen(err).into()
    }

    /// Wrap a driver failure together with the SQL text that provoked it.
    pub fn sql_exec(
        sql: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ErrorKind::SqlExec {
            sql: sql.into(),
            source: source.into(),
        }
        .into()
    }

    pub fn decode(err: DecodeError) -> Self {
        ErrorKind::Decode(err).into()
    }

    pub fn encode(err: EncodeError) -> Self {
        ErrorKind::Encode(err).into()
    }

    /// True when the error originated at the driver boundary.
    pub fn is_sql_exec(&self) -> bool {
        matches!(*self.kind, ErrorKind::SqlExec { .. })
    }

    pub fn as_query(&self) -> Option<&QueryError> {
        match &*self.kind {
            ErrorKind::Query(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_sql_gen(&self) -> Option<&SqlGenError> {
        match &*self.kind {
            ErrorKind::SqlGen(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_decode(&self) -> Option<&DecodeError> {
        match &*self.kind {
            ErrorKind::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            ErrorKind::SqlExec { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.kind {
            ErrorKind::Schema(err) => err.fmt(f),
            ErrorKind::Query(err) => err.fmt(f),
            ErrorKind::SqlGen(err) => err.fmt(f),
            ErrorKind::SqlExec { sql, source } => {
                write!(f, "sql execution failed: {source}; sql={sql}")
            }
            ErrorKind::Decode(err) => err.fmt(f),
            ErrorKind::Encode(err) => err.fmt(f),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error({self})")
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }
}

impl From<SchemaError> for Error {
    fn from(err: SchemaError) -> Self {
        Self::schema(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::query(err)
    }
}

impl From<SqlGenError> for Error {
    fn from(err: SqlGenError) -> Self {
        Self::sql_gen(err)
    }
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::decode(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Self {
        Self::encode(err)
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFieldType { field, type_name } => {
                write!(f, "unsupported field type: field `{field}` has type `{type_name}`")
            }
            Self::AmbiguousPrimaryKey { table } => {
                write!(f, "ambiguous primary key declaration for table `{table}`")
            }
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalChain { op } => write!(f, "illegal operation chain: `{op}` not allowed here"),
            Self::DuplicateJoin { field } => write!(f, "field `{field}` joined more than once"),
            Self::UnknownJoinParent { form } => {
                write!(f, "join targets form `{form}` which is not part of the chain")
            }
            Self::MissingPrimaryKey { table } => {
                write!(f, "table `{table}` has no primary key")
            }
        }
    }
}

impl fmt::Display for SqlGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownForm { form } => {
                write!(f, "expression references form `{form}` which is not in the chain")
            }
            Self::UnknownColumn { form, column } => {
                write!(f, "form `{form}` has no column `{column}`")
            }
            Self::CrossFormPredicate => {
                write!(f, "predicate conjunct references more than one form")
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { index } => write!(f, "row has no column at index {index}"),
            Self::TypeMismatch { expected, actual } => {
                write!(f, "cannot decode {actual} column as {expected:?}")
            }
            Self::UnexpectedNull { expected } => {
                write!(f, "unexpected NULL for non-nullable {expected:?} column")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { value } => {
                write!(f, "value {value} cannot be represented by the driver")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_stays_one_word() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn schema_error_display() {
        let err = Error::schema(SchemaError::UnsupportedFieldType {
            field: "payload".into(),
            type_name: "HashMap<String, String>".into(),
        });
        assert_eq!(
            err.to_string(),
            "unsupported field type: field `payload` has type `HashMap<String, String>`"
        );
    }

    #[test]
    fn query_error_display() {
        let err = Error::query(QueryError::DuplicateJoin { field: "children" });
        assert_eq!(err.to_string(), "field `children` joined more than once");
    }

    #[test]
    fn sql_exec_keeps_source_and_sql() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = Error::sql_exec("INSERT INTO t VALUES (?)", source);
        assert!(err.is_sql_exec());
        assert!(err.to_string().contains("INSERT INTO t VALUES (?)"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn decode_error_display() {
        let err = Error::decode(DecodeError::UnexpectedNull {
            expected: stmt::Type::I64,
        });
        assert_eq!(err.to_string(), "unexpected NULL for non-nullable I64 column");
    }
}
