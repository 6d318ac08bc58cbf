//! Filter composition

use crate::errors::EntityError;
use crate::registry;
use crate::resolver::{resolve_filter_terms, FilterValue};
use crate::traits::{Entity, StatementExecutor};

use super::builder::EntityQuery;

impl<T: Entity, E: StatementExecutor> EntityQuery<T, E> {
    /// Add conjunctive filter terms against the main entity.
    ///
    /// Properties are matched case-insensitively. A plain
    /// `FilterValue::scalar` compares with equality; the comparison
    /// wrappers (`gt`, `gte`, `lt`, `lte`, `eq`) pick the operator.
    ///
    /// # Errors
    ///
    /// `Mapping` for an unknown property, `NotAField` for a property
    /// without a field marker, `ComparisonType` for a non-scalar value
    /// outside a wrapper. On error the builder is left unchanged.
    pub fn filter(
        &mut self,
        fields: Vec<(&str, FilterValue)>,
    ) -> Result<&mut Self, EntityError> {
        let terms = resolve_filter_terms(self.main, fields)?;
        self.filters.extend(terms);
        Ok(self)
    }

    /// Add filter terms against another entity's columns, registering it
    /// into the select projection. The caller is responsible for joining
    /// `F` in; filtering on an unjoined entity produces a statement the
    /// executor will reject.
    pub fn filter_on<F: Entity>(
        &mut self,
        fields: Vec<(&str, FilterValue)>,
    ) -> Result<&mut Self, EntityError> {
        let target = registry::resolve::<F>()?;
        let terms = resolve_filter_terms(target, fields)?;
        self.register(target);
        self.filters.extend(terms);
        Ok(self)
    }
}
