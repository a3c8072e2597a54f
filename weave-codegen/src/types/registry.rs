use std::collections::HashMap;

use super::{LibrarySymbol, ModelType, ObjectKey, TsType, TypeId, TypeKey, TypeRef};
use crate::{Error, Result};

/// Cache state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Unresolved,
    /// Generators are currently being asked about this key.
    InProgress,
    Resolved(TypeRef),
}

/// Key to type cache and generation work-queue.
///
/// Types are appended to the queue when they are created and the queue is
/// drained by index: types discovered while bodies are being written are
/// appended and visited in the same drain.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TsType>,
    cache: HashMap<TypeKey, CacheState>,
    resolving: Vec<TypeKey>,
    placement_chain: Vec<ModelType>,
    object_stack: Vec<ObjectKey>,
    basic_by_name: HashMap<String, TypeId>,
    queue: Vec<TypeId>,
    cursor: usize,
    closed: bool,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &TypeKey) -> CacheState {
        self.cache
            .get(key)
            .copied()
            .unwrap_or(CacheState::Unresolved)
    }

    /// Cached type of `key`, without resolving it.
    pub fn find(&self, key: &TypeKey) -> Option<TypeRef> {
        match self.state(key) {
            CacheState::Resolved(tref) => Some(tref),
            CacheState::Unresolved | CacheState::InProgress => None,
        }
    }

    pub fn get(&self, id: TypeId) -> &TsType {
        &self.types[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut TsType {
        &mut self.types[id.0]
    }

    /// Name of the type, `|undefined` suffixed for the nullable wrapper.
    pub fn type_name(&self, tref: TypeRef) -> String {
        let name = &self.get(tref.id()).name;
        if tref.is_nullable() {
            format!("{name}|undefined")
        } else {
            name.clone()
        }
    }

    /// Default value source, `undefined` for the nullable wrapper.
    pub fn default_value(&self, tref: TypeRef) -> Option<String> {
        if tref.is_nullable() {
            Some("undefined".to_string())
        } else {
            self.get(tref.id()).default_value.clone()
        }
    }

    /// Basic type registered under `name`.
    pub fn find_by_type_name(&self, name: &str) -> Option<TypeRef> {
        self.basic_by_name.get(name).copied().map(TypeRef::new)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeRef, &TsType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(idx, ty)| (TypeRef::new(TypeId(idx)), ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types queued for generation and not yet visited.
    pub fn pending_count(&self) -> usize {
        self.queue.len() - self.cursor
    }

    /// Whether the drain is over and no new type can be created.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn begin(&mut self, key: TypeKey) {
        self.cache.insert(key.clone(), CacheState::InProgress);
        self.resolving.push(key);
    }

    pub(crate) fn finish(&mut self, key: &TypeKey, tref: TypeRef) {
        self.cache.insert(key.clone(), CacheState::Resolved(tref));
        self.forget_resolving(key);
    }

    /// Drop an in-progress marker after a failed resolution.
    pub(crate) fn abandon(&mut self, key: &TypeKey) {
        if self.state(key) == CacheState::InProgress {
            self.cache.remove(key);
        }
        self.forget_resolving(key);
    }

    fn forget_resolving(&mut self, key: &TypeKey) {
        if let Some(pos) = self.resolving.iter().rposition(|k| k == key) {
            self.resolving.remove(pos);
        }
    }

    pub(crate) fn reentrant_error(&self, key: &TypeKey) -> Error {
        let start = self
            .resolving
            .iter()
            .position(|k| k == key)
            .unwrap_or_default();
        let mut chain: Vec<String> = self.resolving[start..]
            .iter()
            .map(ToString::to_string)
            .collect();
        chain.push(key.to_string());
        Error::ReentrantResolution {
            name: key.to_string(),
            chain: chain.join(" => "),
        }
    }

    /// Record that `model` is placed relative to `target`.
    ///
    /// Fails when `target` is itself waiting for its placement, which would
    /// never terminate.
    pub(crate) fn enter_placement(&mut self, model: &ModelType, target: &ModelType) -> Result<()> {
        self.placement_chain.push(model.clone());
        if let Some(start) = self.placement_chain.iter().position(|m| m == target) {
            let mut chain: Vec<&str> = self.placement_chain[start..]
                .iter()
                .map(ModelType::full_name)
                .collect();
            chain.push(target.full_name());
            let chain = chain.join(" => ");
            self.placement_chain.pop();
            return Err(Error::SameLocationCycle { chain });
        }
        Ok(())
    }

    pub(crate) fn leave_placement(&mut self) {
        self.placement_chain.pop();
    }

    pub(crate) fn object_depth(&self, key: &ObjectKey) -> usize {
        self.object_stack.iter().filter(|k| *k == key).count()
    }

    pub(crate) fn push_object(&mut self, key: ObjectKey) {
        self.object_stack.push(key);
    }

    pub(crate) fn pop_object(&mut self) {
        self.object_stack.pop();
    }

    /// Cache an object key, replacing a registration made by a reentrant call.
    pub(crate) fn insert_object(&mut self, key: ObjectKey, tref: TypeRef) {
        self.cache
            .insert(TypeKey::Object(key), CacheState::Resolved(tref));
    }

    pub(crate) fn add(&mut self, ty: TsType) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(ty);
        id
    }

    pub(crate) fn enqueue(&mut self, id: TypeId) {
        self.queue.push(id);
    }

    /// Next queued type. The queue may grow between calls.
    pub(crate) fn next_pending(&mut self) -> Option<TypeId> {
        let next = self.queue.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(next)
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Register a type without file, shared by name.
    ///
    /// A key that is already resolved is rejected.
    pub(crate) fn register_basic(
        &mut self,
        key: Option<TypeKey>,
        name: &str,
        default_value: Option<&str>,
        import: Option<LibrarySymbol>,
    ) -> Result<TypeRef> {
        if let Some(key) = key.as_ref().filter(|key| self.find(key).is_some()) {
            return Err(Error::DuplicateTypeKey {
                key: key.to_string(),
            });
        }
        let id = match self.basic_by_name.get(name) {
            Some(id) => *id,
            None => {
                let mut ty = TsType::basic(name, default_value);
                ty.imports.extend(import);
                let id = self.add(ty);
                self.basic_by_name.insert(name.to_string(), id);
                id
            }
        };
        let tref = TypeRef::new(id);
        if let Some(key) = key {
            self.finish(&key, tref);
        }
        Ok(tref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_states() {
        let mut registry = TypeRegistry::new();
        let key = TypeKey::Model(ModelType::class("S", "User"));
        assert_eq!(registry.state(&key), CacheState::Unresolved);

        registry.begin(key.clone());
        assert_eq!(registry.state(&key), CacheState::InProgress);
        assert_eq!(registry.find(&key), None);

        let tref = registry
            .register_basic(None, "User", None, None)
            .unwrap();
        registry.finish(&key, tref);
        assert_eq!(registry.state(&key), CacheState::Resolved(tref));
    }

    #[test]
    fn test_abandon_keeps_resolved_entries() {
        let mut registry = TypeRegistry::new();
        let key = TypeKey::Model(ModelType::class("S", "User"));
        registry.begin(key.clone());
        registry.abandon(&key);
        assert_eq!(registry.state(&key), CacheState::Unresolved);

        let tref = registry
            .register_basic(Some(key.clone()), "User", None, None)
            .unwrap();
        registry.abandon(&key);
        assert_eq!(registry.find(&key), Some(tref));
    }

    #[test]
    fn test_queue_grows_while_draining() {
        let mut registry = TypeRegistry::new();
        let a = registry.add(TsType::basic("A", None));
        registry.enqueue(a);

        assert_eq!(registry.next_pending(), Some(a));
        let b = registry.add(TsType::basic("B", None));
        registry.enqueue(b);
        assert_eq!(registry.pending_count(), 1);
        assert_eq!(registry.next_pending(), Some(b));
        assert_eq!(registry.next_pending(), None);
    }

    #[test]
    fn test_basic_types_are_shared_by_name() {
        let mut registry = TypeRegistry::new();
        let int = TypeKey::Model(ModelType::primitive(crate::types::Primitive::Number));
        let number = registry.register_basic(None, "number", Some("0"), None).unwrap();
        let again = registry
            .register_basic(Some(int.clone()), "number", Some("1"), None)
            .unwrap();

        assert_eq!(number, again);
        assert_eq!(registry.default_value(number).as_deref(), Some("0"));
        assert_eq!(registry.find_by_type_name("number"), Some(number));
        assert!(matches!(
            registry.register_basic(Some(int), "number", None, None),
            Err(Error::DuplicateTypeKey { .. })
        ));
    }

    #[test]
    fn test_nullable_wrapper() {
        let mut registry = TypeRegistry::new();
        let user = registry.register_basic(None, "User", Some("new User()"), None).unwrap();

        assert_eq!(registry.type_name(user.nullable()), "User|undefined");
        assert_eq!(registry.default_value(user.nullable()).as_deref(), Some("undefined"));
        assert_eq!(user.nullable().non_nullable(), user);
        assert_eq!(registry.type_name(user), "User");
    }

    #[test]
    fn test_placement_cycle_chain() {
        let mut registry = TypeRegistry::new();
        let a = ModelType::class("S", "A");
        let b = ModelType::class("S", "B");
        let c = ModelType::class("S", "C");
        registry.enter_placement(&a, &b).unwrap();
        registry.enter_placement(&b, &c).unwrap();
        let err = registry.enter_placement(&c, &a).unwrap_err();
        assert_eq!(
            err.to_string(),
            "same file/folder placement cycle detected: S.A => S.B => S.C => S.A"
        );
    }

    #[test]
    fn test_reentrant_error_chain() {
        let mut registry = TypeRegistry::new();
        let a = TypeKey::Model(ModelType::class("S", "A"));
        let b = TypeKey::Model(ModelType::class("S", "B"));
        registry.begin(a.clone());
        registry.begin(b);
        let err = registry.reentrant_error(&a);
        assert!(err.to_string().ends_with("S.A => S.B => S.A"));
    }
}
