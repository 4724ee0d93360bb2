use super::{Comma, Formatter, Ident, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::Statement::AlterTable(stmt) => stmt.to_sql(f),
            stmt::Statement::CreateTable(stmt) => stmt.to_sql(f),
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
            stmt::Statement::DropTable(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Select(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.table);
        let alias = self.alias.map(|alias| (" AS ", alias));
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));
        let order_by = if self.order_by.is_empty() {
            None
        } else {
            Some((" ", &self.order_by[..]))
        };

        fmt!(f, "SELECT " {&self.returning} " FROM " table alias filter order_by);

        if let Some(limit) = &self.limit {
            fmt!(f, " LIMIT " limit.limit);
            if let Some(offset) = limit.offset {
                fmt!(f, " OFFSET " offset);
            }
        }
    }
}

impl ToSql for &stmt::Returning {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        match self {
            stmt::Returning::Columns(columns) => fmt!(f, Comma(columns.iter())),
            stmt::Returning::Count => fmt!(f, "COUNT(*)"),
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.table);
        let columns = Comma(self.columns.iter().map(|column| Ident(*column)));

        fmt!(f, "INSERT INTO " table " (" columns ") VALUES ");

        let mut row_sep = "";
        for row in &self.rows {
            fmt!(f, row_sep "(");
            let mut sep = "";
            for value in row {
                let placeholder = f.params.push(value);
                fmt!(f, sep placeholder);
                sep = ", ";
            }
            fmt!(f, ")");
            row_sep = ", ";
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.table);
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));

        fmt!(f, "UPDATE " table " SET ");

        let mut sep = "";
        for assignment in &self.assignments {
            let placeholder = f.params.push(&assignment.value);
            fmt!(f, sep Ident(assignment.column) " = " placeholder);
            sep = ", ";
        }

        fmt!(f, filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.table);
        let filter = self.filter.as_ref().map(|filter| (" WHERE ", filter));

        fmt!(f, "DELETE FROM " table filter);
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.name);
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };
        let columns = Comma(self.columns.iter());
        let primary_key = self
            .primary_key
            .map(|pk| (", PRIMARY KEY (", Ident(pk), ")"));

        fmt!(f, "CREATE TABLE " if_not_exists table " (" columns primary_key ")");
    }
}

impl ToSql for &stmt::ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let keyword = f
            .serializer
            .capability
            .sql_type_keyword(self.ty, self.nullable);
        fmt!(f, Ident(self.name) " " keyword);
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE " if_exists Ident(self.name));
    }
}

impl ToSql for &stmt::AlterTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let table = Ident(self.name);

        match &self.op {
            stmt::AlterTableOp::AddColumn(def) => {
                fmt!(f, "ALTER TABLE " table " ADD COLUMN " def);
            }
            stmt::AlterTableOp::DropColumn(column) => {
                fmt!(f, "ALTER TABLE " table " DROP COLUMN " Ident(column));
            }
        }
    }
}
