//! Category-filtered dispatch from a cell's container to a caller's visitor.
//!
//! The engine only ever hands a [`ContainerVisitor`] to the map. The adapters
//! here pick which half of the container reaches the caller's
//! [`ObjectVisitor`].

use crate::map::CellContainer;

/// Caller-side visitor over the objects of a map.
///
/// Both methods default to no-ops, so a visitor only interested in one
/// category implements one method.
pub trait ObjectVisitor<G, W> {
    fn visit_grid_object(&mut self, _object: &G) {}
    fn visit_world_object(&mut self, _object: &W) {}
}

/// Applied by a [`Map`](crate::Map) to the container of each visited cell.
pub trait ContainerVisitor<G, W> {
    fn visit_container(&mut self, container: &CellContainer<G, W>);
}

/// Forwards grid-resident objects only.
pub struct GridObjects<'a, V: ?Sized>(pub &'a mut V);

/// Forwards world-resident objects only.
pub struct WorldObjects<'a, V: ?Sized>(pub &'a mut V);

/// Forwards both categories, world-resident objects first.
pub struct AllObjects<'a, V: ?Sized>(pub &'a mut V);

impl<G, W, V> ContainerVisitor<G, W> for GridObjects<'_, V>
where
    V: ObjectVisitor<G, W> + ?Sized,
{
    fn visit_container(&mut self, container: &CellContainer<G, W>) {
        for object in container.grid_objects() {
            self.0.visit_grid_object(object);
        }
    }
}

impl<G, W, V> ContainerVisitor<G, W> for WorldObjects<'_, V>
where
    V: ObjectVisitor<G, W> + ?Sized,
{
    fn visit_container(&mut self, container: &CellContainer<G, W>) {
        for object in container.world_objects() {
            self.0.visit_world_object(object);
        }
    }
}

impl<G, W, V> ContainerVisitor<G, W> for AllObjects<'_, V>
where
    V: ObjectVisitor<G, W> + ?Sized,
{
    fn visit_container(&mut self, container: &CellContainer<G, W>) {
        for object in container.world_objects() {
            self.0.visit_world_object(object);
        }
        for object in container.grid_objects() {
            self.0.visit_grid_object(object);
        }
    }
}

/// Closure visitor for grid-resident objects.
pub struct GridFn<F>(pub F);

/// Closure visitor for world-resident objects.
pub struct WorldFn<F>(pub F);

impl<G, W, F> ObjectVisitor<G, W> for GridFn<F>
where
    F: FnMut(&G),
{
    fn visit_grid_object(&mut self, object: &G) {
        (self.0)(object);
    }
}

impl<G, W, F> ObjectVisitor<G, W> for WorldFn<F>
where
    F: FnMut(&W),
{
    fn visit_world_object(&mut self, object: &W) {
        (self.0)(object);
    }
}
