use super::{Comma, Formatter, Ident, Params, ToSql};

use crate::stmt::{ColumnRef, Expr, OrderByItem};

impl ToSql for &Expr {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            Expr::Value(value) => {
                let placeholder = f.params.push(value);
                fmt!(f, placeholder);
            }
            Expr::Column(column) => fmt!(f, column),
            Expr::And(operands) => Delimited(operands, " AND ").to_sql(f),
            Expr::Or(operands) => Delimited(operands, " OR ").to_sql(f),
            Expr::Not(operand) => {
                fmt!(f, "NOT (" {&**operand} ")");
            }
            Expr::BinaryOp { lhs, op, rhs } => {
                fmt!(f, {&**lhs} " " op.as_sql() " " {&**rhs});
            }
            Expr::InList { column, values } => {
                let mut list = String::new();
                let mut sep = "";
                for value in values {
                    let placeholder = f.params.push(value);
                    list.push_str(sep);
                    list.push_str(&f.serializer.capability.placeholder(placeholder.0));
                    sep = ", ";
                }
                fmt!(f, column " IN (" list ")");
            }
            Expr::IsNull { column, negate } => {
                let suffix = if *negate { " IS NOT NULL" } else { " IS NULL" };
                fmt!(f, column suffix);
            }
        }
    }
}

impl ToSql for &ColumnRef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if let Some(qualifier) = self.qualifier {
            fmt!(f, qualifier ".");
        }
        fmt!(f, Ident(self.name));
    }
}

impl ToSql for &OrderByItem {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, &self.column " " self.direction.as_sql());
    }
}

impl ToSql for &[OrderByItem] {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, "ORDER BY " Comma(self.iter()));
    }
}

/// Operands joined by a logical connective, each parenthesized when it is
/// itself composite.
struct Delimited<'a>(&'a [Expr], &'static str);

impl ToSql for Delimited<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut sep = "";
        for operand in self.0 {
            fmt!(f, sep);
            if composite(operand) {
                fmt!(f, "(" operand ")");
            } else {
                fmt!(f, operand);
            }
            sep = self.1;
        }
    }
}

fn composite(expr: &Expr) -> bool {
    matches!(expr, Expr::And(_) | Expr::Or(_))
}
