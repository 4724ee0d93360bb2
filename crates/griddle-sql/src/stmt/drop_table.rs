/// A `DROP TABLE` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    pub name: &'static str,

    pub if_exists: bool,
}
