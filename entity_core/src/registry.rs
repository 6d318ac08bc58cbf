//! Metadata registry
//!
//! Process-wide descriptor cache: one immutable `EntityDescriptor` per
//! entity type, built on first reference and shared by every builder.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::descriptor::EntityDescriptor;
use crate::errors::EntityError;
use crate::traits::Entity;

type DescriptorMap = HashMap<TypeId, &'static EntityDescriptor>;

fn cache() -> &'static RwLock<DescriptorMap> {
    static CACHE: OnceLock<RwLock<DescriptorMap>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

// The map is write-once per type; entries stay valid even if a writer
// panicked, so a poisoned lock can be used as-is.
fn read_cache() -> RwLockReadGuard<'static, DescriptorMap> {
    match cache().read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_cache() -> RwLockWriteGuard<'static, DescriptorMap> {
    match cache().write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Resolve the descriptor for `T`, building and caching it on first use.
///
/// Resolution is idempotent and keyed by type identity, never by name.
/// Concurrent first-use resolution of the same type is a benign race:
/// the first writer wins and losers discard their computed descriptor.
/// First-wins also means that if two logically distinct shapes map to
/// the same runtime type, only the first registration is honored — a
/// documented limitation, not silently overwritten.
///
/// # Errors
///
/// `Configuration` if the type has no mapped fields, an empty table
/// name, or duplicate column names.
pub fn resolve<T: Entity>() -> Result<&'static EntityDescriptor, EntityError> {
    let type_id = TypeId::of::<T>();

    if let Some(descriptor) = read_cache().get(&type_id) {
        return Ok(descriptor);
    }

    let descriptor = EntityDescriptor {
        entity_name: T::entity_name(),
        table_name: T::table_name(),
        fields: T::bindings(),
        unmapped: T::unmapped_properties(),
    };
    descriptor.validate()?;

    let mut guard = write_cache();
    if let Some(existing) = guard.get(&type_id) {
        return Ok(existing);
    }
    let leaked: &'static EntityDescriptor = Box::leak(Box::new(descriptor));
    guard.insert(type_id, leaked);
    Ok(leaked)
}
