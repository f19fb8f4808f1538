use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};

use super::components::{
    Actor, Blocks, Brain, ComponentKind, ComponentSet, Faction, Health, Inventory, Item, Light,
    Melee, Name, RenderGlyph, Tile, Transparent,
};
use super::entity::{EntityId, Position};
use super::storage::SparseSet;

/// Errors raised when addressing the store with a bad reference.
///
/// "Dead" and "missing" are kept apart so callers can tell a stale id from an
/// entity that simply lacks the component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("entity {0} does not exist")]
    DeadEntity(EntityId),

    #[error("entity {entity} has no {kind:?} component")]
    MissingComponent {
        entity: EntityId,
        kind: ComponentKind,
    },
}

impl GameError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DeadEntity(_) => "STORE_DEAD_ENTITY",
            Self::MissingComponent { .. } => "STORE_MISSING_COMPONENT",
        }
    }
}

/// Typed columns, one per component kind.
#[derive(Clone, Debug, Default)]
pub struct ComponentStorage {
    positions: SparseSet<Position>,
    glyphs: SparseSet<RenderGlyph>,
    blocks: SparseSet<Blocks>,
    transparent: SparseSet<Transparent>,
    lights: SparseSet<Light>,
    factions: SparseSet<Faction>,
    actors: SparseSet<Actor>,
    health: SparseSet<Health>,
    inventories: SparseSet<Inventory>,
    melee: SparseSet<Melee>,
    brains: SparseSet<Brain>,
    names: SparseSet<Name>,
    items: SparseSet<Item>,
    tiles: SparseSet<Tile>,
}

impl ComponentStorage {
    fn ids_of(&self, kind: ComponentKind) -> &[EntityId] {
        match kind {
            ComponentKind::Position => self.positions.ids(),
            ComponentKind::RenderGlyph => self.glyphs.ids(),
            ComponentKind::Blocks => self.blocks.ids(),
            ComponentKind::Transparent => self.transparent.ids(),
            ComponentKind::Light => self.lights.ids(),
            ComponentKind::Faction => self.factions.ids(),
            ComponentKind::Actor => self.actors.ids(),
            ComponentKind::Health => self.health.ids(),
            ComponentKind::Inventory => self.inventories.ids(),
            ComponentKind::Melee => self.melee.ids(),
            ComponentKind::Brain => self.brains.ids(),
            ComponentKind::Name => self.names.ids(),
            ComponentKind::Item => self.items.ids(),
            ComponentKind::Tile => self.tiles.ids(),
        }
    }

    fn remove_kind(&mut self, id: EntityId, kind: ComponentKind) {
        match kind {
            ComponentKind::Position => drop(self.positions.remove(id)),
            ComponentKind::RenderGlyph => drop(self.glyphs.remove(id)),
            ComponentKind::Blocks => drop(self.blocks.remove(id)),
            ComponentKind::Transparent => drop(self.transparent.remove(id)),
            ComponentKind::Light => drop(self.lights.remove(id)),
            ComponentKind::Faction => drop(self.factions.remove(id)),
            ComponentKind::Actor => drop(self.actors.remove(id)),
            ComponentKind::Health => drop(self.health.remove(id)),
            ComponentKind::Inventory => drop(self.inventories.remove(id)),
            ComponentKind::Melee => drop(self.melee.remove(id)),
            ComponentKind::Brain => drop(self.brains.remove(id)),
            ComponentKind::Name => drop(self.names.remove(id)),
            ComponentKind::Item => drop(self.items.remove(id)),
            ComponentKind::Tile => drop(self.tiles.remove(id)),
        }
    }
}

/// A component family stored in the [`World`].
pub trait Component: Sized + 'static {
    const KIND: ComponentKind;

    fn column(storage: &ComponentStorage) -> &SparseSet<Self>;
    fn column_mut(storage: &mut ComponentStorage) -> &mut SparseSet<Self>;

    /// Cell this component places its entity on, if any.
    fn occupies(&self) -> Option<Position> {
        None
    }
}

/// Components that may be edited in place.
///
/// [`Position`] is excluded: it feeds the occupancy index and changes only
/// through [`World::relocate`].
pub trait MutableComponent: Component {}

macro_rules! impl_component {
    ($($ty:ident => $field:ident),* $(,)?) => {
        $(
            impl Component for $ty {
                const KIND: ComponentKind = ComponentKind::$ty;

                fn column(storage: &ComponentStorage) -> &SparseSet<Self> {
                    &storage.$field
                }

                fn column_mut(storage: &mut ComponentStorage) -> &mut SparseSet<Self> {
                    &mut storage.$field
                }
            }

            impl MutableComponent for $ty {}
        )*
    };
}

impl_component! {
    RenderGlyph => glyphs,
    Blocks => blocks,
    Transparent => transparent,
    Light => lights,
    Faction => factions,
    Actor => actors,
    Health => health,
    Inventory => inventories,
    Melee => melee,
    Brain => brains,
    Name => names,
    Item => items,
    Tile => tiles,
}

impl Component for Position {
    const KIND: ComponentKind = ComponentKind::Position;

    fn column(storage: &ComponentStorage) -> &SparseSet<Self> {
        &storage.positions
    }

    fn column_mut(storage: &mut ComponentStorage) -> &mut SparseSet<Self> {
        &mut storage.positions
    }

    fn occupies(&self) -> Option<Position> {
        Some(*self)
    }
}

/// Occupancy index: which entities stand on which cell.
///
/// Stacking is allowed at the data level; gameplay rules keep at most one
/// blocking occupant per cell. Occupants are kept in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    cells: BTreeMap<Position, Vec<EntityId>>,
}

impl Occupancy {
    pub fn occupants(&self, position: Position) -> &[EntityId] {
        self.cells.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    fn add(&mut self, position: Position, entity: EntityId) {
        let slot = self.cells.entry(position).or_default();
        if !slot.contains(&entity) {
            slot.push(entity);
        }
    }

    fn remove(&mut self, position: Position, entity: EntityId) -> bool {
        let Some(slot) = self.cells.get_mut(&position) else {
            return false;
        };
        let Some(index) = slot.iter().position(|occupant| *occupant == entity) else {
            return false;
        };
        slot.remove(index);
        if slot.is_empty() {
            self.cells.remove(&position);
        }
        true
    }
}

/// Snapshot of the ids matching a query, in ascending id order.
///
/// The result set is captured up front, so mutating the world while iterating
/// never changes which ids are yielded.
#[derive(Clone, Debug)]
pub struct Query {
    ids: std::vec::IntoIter<EntityId>,
}

impl Iterator for Query {
    type Item = EntityId;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl ExactSizeIterator for Query {}

/// Sparse entity-component store. Owns every piece of game-object state.
#[derive(Clone, Debug)]
pub struct World {
    next_id: u32,
    signatures: BTreeMap<EntityId, ComponentSet>,
    storage: ComponentStorage,
    occupancy: Occupancy,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: EntityId::FIRST.0,
            signatures: BTreeMap::new(),
            storage: ComponentStorage::default(),
            occupancy: Occupancy::default(),
        }
    }

    /// Allocates a fresh entity with no components.
    pub fn create(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.signatures.insert(id, ComponentSet::empty());
        id
    }

    /// Removes every component of `id` and invalidates it.
    ///
    /// Returns `false` when the id was already dead.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(signature) = self.signatures.remove(&id) else {
            return false;
        };

        if let Some(position) = self.storage.positions.get(id).copied() {
            self.occupancy.remove(position, id);
        }
        for kind in signature.kinds() {
            self.storage.remove_kind(id, kind);
        }
        true
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.signatures.contains_key(&id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Live entity ids in ascending order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.signatures.keys().copied()
    }

    /// The component set an entity currently carries.
    pub fn signature(&self, id: EntityId) -> Option<ComponentSet> {
        self.signatures.get(&id).copied()
    }

    /// Attaches (or replaces) a component.
    pub fn add<T: Component>(&mut self, id: EntityId, component: T) -> Result<(), StoreError> {
        let signature = self
            .signatures
            .get_mut(&id)
            .ok_or(StoreError::DeadEntity(id))?;
        signature.insert(T::KIND.flag());

        let cell = component.occupies();
        let previous = T::column_mut(&mut self.storage).insert(id, component);
        if let Some(old_cell) = previous.as_ref().and_then(Component::occupies) {
            self.occupancy.remove(old_cell, id);
        }
        if let Some(cell) = cell {
            self.occupancy.add(cell, id);
        }
        Ok(())
    }

    /// Detaches a component, returning it. `None` for dead ids or absent components.
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let signature = self.signatures.get_mut(&id)?;
        signature.remove(T::KIND.flag());

        let removed = T::column_mut(&mut self.storage).remove(id)?;
        if let Some(cell) = removed.occupies() {
            self.occupancy.remove(cell, id);
        }
        Some(removed)
    }

    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        T::column(&self.storage).get(id)
    }

    pub fn get_mut<T: MutableComponent>(&mut self, id: EntityId) -> Option<&mut T> {
        T::column_mut(&mut self.storage).get_mut(id)
    }

    /// Like [`World::get`] but reports why the lookup failed.
    pub fn try_get<T: Component>(&self, id: EntityId) -> Result<&T, StoreError> {
        if !self.is_alive(id) {
            return Err(StoreError::DeadEntity(id));
        }
        self.get(id).ok_or(StoreError::MissingComponent {
            entity: id,
            kind: T::KIND,
        })
    }

    pub fn try_get_mut<T: MutableComponent>(&mut self, id: EntityId) -> Result<&mut T, StoreError> {
        if !self.is_alive(id) {
            return Err(StoreError::DeadEntity(id));
        }
        self.get_mut(id).ok_or(StoreError::MissingComponent {
            entity: id,
            kind: T::KIND,
        })
    }

    pub fn has<T: Component>(&self, id: EntityId) -> bool {
        T::column(&self.storage).contains(id)
    }

    /// Iterates every `(id, component)` pair of one kind in storage order.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        T::column(&self.storage).iter()
    }

    /// Ids whose component set is a superset of `required`.
    ///
    /// An empty `required` set matches every live entity.
    pub fn query(&self, required: ComponentSet) -> Query {
        let mut ids: Vec<EntityId> = match required
            .kinds()
            .min_by_key(|kind| self.storage.ids_of(*kind).len())
        {
            None => self.entities().collect(),
            Some(driver) => self
                .storage
                .ids_of(driver)
                .iter()
                .copied()
                .filter(|id| {
                    self.signatures
                        .get(id)
                        .is_some_and(|signature| signature.contains(required))
                })
                .collect(),
        };
        ids.sort_unstable();
        Query {
            ids: ids.into_iter(),
        }
    }

    /// Moves an entity to `to`, keeping the occupancy index in sync.
    ///
    /// Returns the previous position.
    pub fn relocate(&mut self, id: EntityId, to: Position) -> Result<Position, StoreError> {
        if !self.is_alive(id) {
            return Err(StoreError::DeadEntity(id));
        }
        let slot = self
            .storage
            .positions
            .get_mut(id)
            .ok_or(StoreError::MissingComponent {
                entity: id,
                kind: ComponentKind::Position,
            })?;
        let from = std::mem::replace(slot, to);
        self.occupancy.remove(from, id);
        self.occupancy.add(to, id);
        Ok(from)
    }

    /// Entities standing on `position`, in arrival order.
    pub fn entities_at(&self, position: Position) -> impl Iterator<Item = EntityId> + '_ {
        self.occupancy.occupants(position).iter().copied()
    }

    /// First occupant of `position` carrying component `T`.
    pub fn find_at<T: Component>(&self, position: Position) -> Option<EntityId> {
        self.entities_at(position).find(|id| self.has::<T>(*id))
    }

    /// Convenience accessor for the component most systems start from.
    pub fn position(&self, id: EntityId) -> Option<Position> {
        self.get::<Position>(id).copied()
    }

    /// The entity carrying [`Faction::Player`], if one is alive.
    pub fn player(&self) -> Option<EntityId> {
        self.iter::<Faction>()
            .filter(|(_, faction)| **faction == Faction::Player)
            .map(|(id, _)| id)
            .min()
    }

    /// Display name, falling back to `default` for unnamed entities.
    pub fn name_or<'a>(&'a self, id: EntityId, default: &'a str) -> &'a str {
        self.get::<Name>(id).map(Name::as_str).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destroy_removes_components_and_invalidates_id() {
        let mut world = World::new();
        let id = world.create();
        world.add(id, Position::new(2, 3)).unwrap();
        world.add(id, Health::new(5, 0)).unwrap();

        assert!(world.destroy(id));
        assert!(!world.is_alive(id));
        assert!(world.get::<Health>(id).is_none());
        assert_eq!(world.entities_at(Position::new(2, 3)).count(), 0);
        assert!(!world.destroy(id));
    }

    #[test]
    fn add_on_dead_entity_is_rejected() {
        let mut world = World::new();
        let id = world.create();
        world.destroy(id);

        assert_eq!(world.add(id, Blocks), Err(StoreError::DeadEntity(id)));
    }

    #[test]
    fn try_get_distinguishes_dead_from_missing() {
        let mut world = World::new();
        let alive = world.create();
        let dead = world.create();
        world.destroy(dead);

        assert_eq!(
            world.try_get::<Health>(alive),
            Err(StoreError::MissingComponent {
                entity: alive,
                kind: ComponentKind::Health
            })
        );
        assert_eq!(world.try_get::<Health>(dead), Err(StoreError::DeadEntity(dead)));
    }

    #[test]
    fn query_returns_supersets_in_id_order() {
        let mut world = World::new();
        let a = world.create();
        let b = world.create();
        let c = world.create();
        for id in [c, a] {
            world.add(id, Position::new(0, 0)).unwrap();
            world.add(id, Health::new(1, 0)).unwrap();
        }
        world.add(b, Position::new(1, 1)).unwrap();

        let matched: Vec<_> = world
            .query(ComponentSet::POSITION | ComponentSet::HEALTH)
            .collect();
        assert_eq!(matched, vec![a, c]);

        let everything: Vec<_> = world.query(ComponentSet::empty()).collect();
        assert_eq!(everything, vec![a, b, c]);
    }

    #[test]
    fn query_snapshot_survives_mutation() {
        let mut world = World::new();
        let ids: Vec<_> = (0..4)
            .map(|_| {
                let id = world.create();
                world.add(id, Actor::new(100)).unwrap();
                id
            })
            .collect();

        let mut visited = Vec::new();
        for id in world.query(ComponentSet::ACTOR) {
            visited.push(id);
            world.destroy(ids[3]);
        }
        assert_eq!(visited, ids);
    }

    #[test]
    fn relocate_updates_occupancy() {
        let mut world = World::new();
        let id = world.create();
        world.add(id, Position::new(1, 1)).unwrap();

        let from = world.relocate(id, Position::new(1, 2)).unwrap();
        assert_eq!(from, Position::new(1, 1));
        assert_eq!(world.entities_at(Position::new(1, 1)).count(), 0);
        assert_eq!(world.entities_at(Position::new(1, 2)).collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn removing_position_clears_occupancy() {
        let mut world = World::new();
        let id = world.create();
        world.add(id, Position::new(4, 4)).unwrap();

        assert_eq!(world.remove::<Position>(id), Some(Position::new(4, 4)));
        assert!(world.find_at::<Position>(Position::new(4, 4)).is_none());
        assert!(!world.signature(id).unwrap().contains(ComponentSet::POSITION));
    }
}
