//! Join composition

use crate::errors::EntityError;
use crate::registry;
use crate::resolver::resolve_join_column;
use crate::statement::JoinSpec;
use crate::traits::{Entity, StatementExecutor};

use super::builder::EntityQuery;

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    /// Join entity `J` onto the chain with an inner equality join.
    ///
    /// The left property resolves against the most recently joined entity
    /// (the main entity before any join), the right property against `J`.
    /// Each join advances that cursor, so chained calls build a linear
    /// path: main -> A -> B.
    ///
    /// # Errors
    ///
    /// `Mapping` if either property is not a mapped field of its side.
    /// On error the builder is left unchanged and the cursor does not
    /// advance.
    pub fn join<J: Entity>(
        &mut self,
        left_property: &str,
        right_property: &str,
    ) -> Result<&mut Self, EntityError> {
        let target = registry::resolve::<J>()?;
        let left = resolve_join_column(self.last_joined, left_property)?;
        let right = resolve_join_column(target, right_property)?;
        self.joins.push(JoinSpec {
            table: target.table_name,
            left,
            right,
        });
        self.register(target);
        self.last_joined = target;
        Ok(self)
    }
}
