use crate::ecs::{Blocks, EntityId, StoreError, Transparent, World};

use super::digger::Dungeon;

/// Creates one terrain entity per cell: Position, RenderGlyph, Tile,
/// Transparent, and Blocks for cells that cannot be walked on.
pub fn populate(world: &mut World, dungeon: &Dungeon) -> Result<Vec<EntityId>, StoreError> {
    let mut created = Vec::with_capacity(dungeon.dimensions.area());
    for (position, kind) in dungeon.cells() {
        let id = world.create();
        world.add(id, position)?;
        world.add(id, kind.glyph())?;
        world.add(id, kind.tile())?;
        world.add(id, Transparent(kind.transparent()))?;
        if !kind.walkable() {
            world.add(id, Blocks)?;
        }
        created.push(id);
    }
    Ok(created)
}
