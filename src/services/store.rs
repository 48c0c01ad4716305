//! Estado local de los tableros
//!
//! `Collection` guarda la última lista conocida de una entidad en el orden en
//! que llegó del backend. `Optimistic` es el ejecutor de mutaciones
//! optimistas: toma un snapshot, deja modificar el estado y, si no se confirma
//! con [`Optimistic::commit`], restaura el snapshot al soltarse. Eso cubre
//! tanto el camino de error como un future cancelado a mitad de request.

use std::ops::{Deref, DerefMut};
use tracing::warn;

use crate::models::driver::{Driver, DriverId};
use crate::models::maintenance::{MaintenanceId, MaintenanceRecord};
use crate::models::trip::{Trip, TripId};
use crate::models::truck::{Truck, TruckId};

/// Entidad con identificador propio
pub trait Entity: Clone {
    type Id: Copy + PartialEq + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}

impl Entity for Truck {
    type Id = TruckId;

    fn id(&self) -> TruckId {
        self.truck_id
    }
}

impl Entity for Driver {
    type Id = DriverId;

    fn id(&self) -> DriverId {
        self.id
    }
}

impl Entity for Trip {
    type Id = TripId;

    fn id(&self) -> TripId {
        self.trip_id
    }
}

impl Entity for MaintenanceRecord {
    type Id = MaintenanceId;

    fn id(&self) -> MaintenanceId {
        self.maintenance_id
    }
}

/// Lista ordenada de entidades
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.get(id).is_some()
    }

    /// Aplicar un cambio a la entidad; devuelve false si no existe
    pub fn update<F>(&mut self, id: T::Id, change: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                change(item);
                true
            }
            None => false,
        }
    }

    /// Reemplazar la entidad con la versión confirmada por el servidor
    pub fn replace(&mut self, item: T) -> bool {
        let id = item.id();
        self.update(id, |current| *current = item)
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Agregar al final sin duplicar ids
    pub fn push(&mut self, item: T) {
        if !self.contains(item.id()) {
            self.items.push(item);
        }
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Mutación optimista en curso sobre un estado `S`
///
/// Se accede al estado por `Deref`/`DerefMut`. Soltar el guard sin llamar a
/// `commit` restaura el snapshot.
pub struct Optimistic<'a, S: Clone> {
    state: &'a mut S,
    snapshot: Option<S>,
    operation: &'static str,
}

impl<'a, S: Clone> Optimistic<'a, S> {
    pub fn begin(state: &'a mut S, operation: &'static str) -> Self {
        let snapshot = Some(state.clone());
        Self {
            state,
            snapshot,
            operation,
        }
    }

    /// Confirmar el estado actual; el snapshot se descarta
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    /// Restaurar el snapshot de inmediato
    pub fn rollback(self) {
        drop(self);
    }
}

impl<S: Clone> Deref for Optimistic<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.state
    }
}

impl<S: Clone> DerefMut for Optimistic<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.state
    }
}

impl<S: Clone> Drop for Optimistic<'_, S> {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            warn!("↩️ Revirtiendo cambio optimista: {}", self.operation);
            *self.state = snapshot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::truck::TruckStatus;

    fn truck(id: TruckId) -> Truck {
        Truck {
            truck_id: id,
            plate: format!("PLT{}", id),
            brand: "Volvo".to_string(),
            model: "FH".to_string(),
            year: "2020".to_string(),
            mileage: 0.0,
            color: "Rojo".to_string(),
            status: TruckStatus::Active,
            updated_at: None,
            driver: None,
        }
    }

    #[test]
    fn test_collection_operations() {
        let mut trucks = Collection::new(vec![truck(1), truck(2)]);
        assert!(trucks.update(2, |t| t.status = TruckStatus::Inactive));
        assert!(!trucks.update(9, |t| t.status = TruckStatus::Inactive));
        assert_eq!(trucks.get(2).map(|t| &t.status), Some(&TruckStatus::Inactive));

        trucks.push(truck(1));
        assert_eq!(trucks.len(), 2);

        assert_eq!(trucks.remove(1).map(|t| t.truck_id), Some(1));
        assert!(trucks.remove(1).is_none());
    }

    #[test]
    fn test_uncommitted_change_is_restored() {
        let mut trucks = Collection::new(vec![truck(1)]);
        let before = trucks.clone();
        {
            let mut guard = Optimistic::begin(&mut trucks, "estado");
            guard.update(1, |t| t.status = TruckStatus::Maintenance);
            assert_eq!(guard.get(1).map(|t| &t.status), Some(&TruckStatus::Maintenance));
        }
        assert_eq!(trucks, before);
    }

    #[test]
    fn test_committed_change_is_kept() {
        let mut trucks = Collection::new(vec![truck(1)]);
        let mut guard = Optimistic::begin(&mut trucks, "estado");
        guard.update(1, |t| t.status = TruckStatus::Maintenance);
        guard.commit();
        assert_eq!(trucks.get(1).map(|t| &t.status), Some(&TruckStatus::Maintenance));
    }
}
