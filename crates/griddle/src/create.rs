use crate::db::Database;
use crate::engine::observe;
use crate::record::Record;
use crate::Result;

use griddle_sql::stmt as sql;

use std::collections::HashSet;

/// How [`Database::create_table`] treats the live table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreatePolicy {
    drop_table: bool,
    reconcile: bool,
    shallow: bool,
}

impl CreatePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue `DROP TABLE IF EXISTS` before creating.
    pub fn drop_table(mut self) -> Self {
        self.drop_table = true;
        self
    }

    /// Align an existing table's columns with the schema: drop surplus
    /// live columns, then add missing schema columns, touching no row data
    /// in retained columns.
    pub fn reconcile(mut self) -> Self {
        self.reconcile = true;
        self
    }

    /// Do not recurse into child-collection element types.
    pub fn shallow(mut self) -> Self {
        self.shallow = true;
        self
    }
}

impl Database {
    /// Create `M`'s table under `policy`, recursing into child element
    /// types unless the policy is shallow. Cycles between record types are
    /// broken by tracking visited forms.
    pub fn create_table<M: Record>(&mut self, policy: CreatePolicy) -> Result<()> {
        let mut visited = HashSet::new();
        observe(create_entry::<M>(self, policy, &mut visited))
    }
}

/// Table creation for one record type; referenced as a fn pointer by the
/// derive-generated child descriptors.
pub fn create_entry<M: Record>(
    db: &mut Database,
    policy: CreatePolicy,
    visited: &mut HashSet<&'static str>,
) -> Result<()> {
    if !visited.insert(M::NAME) {
        return Ok(());
    }

    let schema = M::schema()?;

    {
        let mut cx = db.exec_cx();

        if policy.drop_table {
            cx.execute(
                &sql::DropTable {
                    name: schema.name,
                    if_exists: true,
                }
                .into(),
            )?;
        }

        let create = sql::CreateTable {
            name: schema.name,
            columns: schema
                .columns
                .iter()
                .map(|column| sql::ColumnDef {
                    name: column.name,
                    ty: column.ty,
                    nullable: column.nullable,
                })
                .collect(),
            primary_key: schema.primary_key_column().map(|column| column.name),
            if_not_exists: true,
        };
        cx.execute(&create.into())?;

        if policy.reconcile {
            let live = cx.conn.list_columns(schema.name)?;
            if !live.is_empty() {
                // Drops before adds, so a re-added name never collides.
                for live_column in &live {
                    if schema.column(&live_column.name).is_none() {
                        cx.execute(
                            &sql::AlterTable {
                                name: schema.name,
                                op: sql::AlterTableOp::DropColumn(live_column.name.clone()),
                            }
                            .into(),
                        )?;
                    }
                }

                for column in &schema.columns {
                    if !live.iter().any(|l| l.name == column.name) {
                        cx.execute(
                            &sql::AlterTable {
                                name: schema.name,
                                op: sql::AlterTableOp::AddColumn(sql::ColumnDef {
                                    name: column.name,
                                    ty: column.ty,
                                    nullable: column.nullable,
                                }),
                            }
                            .into(),
                        )?;
                    }
                }
            }
        }
    }

    if !policy.shallow {
        for child in M::children() {
            (child.create)(db, policy, visited)?;
        }
    }

    Ok(())
}
