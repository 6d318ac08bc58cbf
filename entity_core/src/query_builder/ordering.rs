//! Ordering composition

use crate::errors::EntityError;
use crate::registry;
use crate::resolver::resolve_order_terms;
use crate::statement::SortOrder;
use crate::traits::{Entity, StatementExecutor};

use super::builder::EntityQuery;

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    /// Order ascending by properties of the main entity.
    ///
    /// Properties without a field marker are skipped; unknown properties
    /// fail with `Mapping` and leave the builder unchanged.
    pub fn order_by(&mut self, properties: &[&str]) -> Result<&mut Self, EntityError> {
        let terms = resolve_order_terms(self.main, properties, SortOrder::Asc)?;
        self.order.extend(terms);
        Ok(self)
    }

    /// Order descending by properties of the main entity.
    pub fn order_by_desc(&mut self, properties: &[&str]) -> Result<&mut Self, EntityError> {
        let terms = resolve_order_terms(self.main, properties, SortOrder::Desc)?;
        self.order.extend(terms);
        Ok(self)
    }

    /// Order by properties of a joined entity in the given direction.
    pub fn order_by_on<F: Entity>(
        &mut self,
        properties: &[&str],
        direction: SortOrder,
    ) -> Result<&mut Self, EntityError> {
        let target = registry::resolve::<F>()?;
        let terms = resolve_order_terms(target, properties, direction)?;
        self.order.extend(terms);
        Ok(self)
    }
}
