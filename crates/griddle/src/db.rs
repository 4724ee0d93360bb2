use crate::engine::ExecCx;
use crate::Result;

use griddle_core::driver::{Capability, Connection, Driver};

/// A handle to one database connection.
///
/// All operations are synchronous and run on the caller's thread; the
/// handle is used through `&mut`, so callers serialize access or open one
/// handle per thread.
pub struct Database {
    connection: Box<dyn Connection>,
    capability: &'static Capability,
    log_queries: bool,
    tx_depth: usize,
    tx_poisoned: bool,
}

/// Configures and opens a [`Database`].
pub struct Builder {
    log_queries: bool,
}

impl Database {
    /// Connect with default options.
    pub fn connect<D: Driver>(driver: &D) -> Result<Self> {
        Self::builder().connect(driver)
    }

    pub fn builder() -> Builder {
        Builder { log_queries: false }
    }

    pub fn capability(&self) -> &'static Capability {
        self.capability
    }

    pub(crate) fn exec_cx(&mut self) -> ExecCx<'_> {
        ExecCx {
            conn: self.connection.as_mut(),
            capability: self.capability,
            log_queries: self.log_queries,
        }
    }

    /// Run `f` inside a transaction.
    ///
    /// BEGIN is issued before the body, COMMIT on normal completion, and
    /// ROLLBACK when an error propagates out. Nesting is flattened: an
    /// inner `transaction` call issues no BEGIN, and an inner failure
    /// marks the outermost transaction so its close rolls back even when
    /// the caller swallowed the error.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        if self.tx_depth == 0 {
            self.connection.begin_transaction()?;
            trace_tx!("begin");
        }

        self.tx_depth += 1;
        let result = f(self);
        self.tx_depth -= 1;

        if self.tx_depth > 0 {
            if result.is_err() {
                self.tx_poisoned = true;
            }
            return result;
        }

        let poisoned = std::mem::take(&mut self.tx_poisoned);
        match result {
            Ok(value) if !poisoned => {
                self.connection.commit()?;
                trace_tx!("commit");
                Ok(value)
            }
            Ok(value) => {
                self.connection.rollback()?;
                trace_tx!("rollback");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.connection.rollback() {
                    trace_error!(rollback_err);
                }
                trace_tx!("rollback");
                Err(err)
            }
        }
    }
}

impl Builder {
    /// Emit a `query` event with the SQL text before every execution.
    pub fn log_queries(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    pub fn connect<D: Driver>(self, driver: &D) -> Result<Database> {
        let connection = driver.connect()?;
        Ok(Database {
            connection,
            capability: driver.capability(),
            log_queries: self.log_queries,
            tx_depth: 0,
            tx_poisoned: false,
        })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connection", &self.connection)
            .field("tx_depth", &self.tx_depth)
            .finish()
    }
}
