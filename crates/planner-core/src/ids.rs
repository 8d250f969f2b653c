//! Generational arena used for both element-graph vertices and edges.
//!
//! Flow-element identity is reference equality in the source model (spec.md
//! §3): two distinct elements of the same kind are distinct vertices. A
//! generational index gives the same guarantee in Rust without reference
//! cycles — an `Id` never aliases a removed-and-reused slot's previous
//! occupant, so two `Id`s compare equal iff they name the same insertion.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) RawId);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }
    };
}

id_newtype!(ElementId);
id_newtype!(ScopeId);

enum Slot<T> {
    Occupied { value: T, generation: u32 },
    Vacant { generation: u32 },
}

/// A `Vec`-backed arena with tombstone reuse and generation stamping.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Clone> Clone for Arena<T> {
    fn clone(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .map(|s| match s {
                Slot::Occupied { value, generation } => Slot::Occupied {
                    value: value.clone(),
                    generation: *generation,
                },
                Slot::Vacant { generation } => Slot::Vacant {
                    generation: *generation,
                },
            })
            .collect();
        Arena {
            slots,
            free: self.free.clone(),
        }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: T) -> RawId {
        if let Some(index) = self.free.pop() {
            let generation = match &self.slots[index as usize] {
                Slot::Vacant { generation } => *generation,
                Slot::Occupied { .. } => unreachable!("free list pointed at an occupied slot"),
            };
            self.slots[index as usize] = Slot::Occupied { value, generation };
            RawId { index, generation }
        } else {
            let index = self.slots.len() as u32;
            let generation = 0;
            self.slots.push(Slot::Occupied { value, generation });
            RawId { index, generation }
        }
    }

    pub fn remove(&mut self, id: RawId) -> Option<T> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied { generation, .. }) if *generation == id.generation => {
                let next_generation = generation.wrapping_add(1);
                let old = std::mem::replace(
                    &mut self.slots[id.index as usize],
                    Slot::Vacant {
                        generation: next_generation,
                    },
                );
                self.free.push(id.index);
                match old {
                    Slot::Occupied { value, .. } => Some(value),
                    Slot::Vacant { .. } => None,
                }
            }
            _ => None,
        }
    }

    pub fn get(&self, id: RawId) -> Option<&T> {
        match self.slots.get(id.index as usize) {
            Some(Slot::Occupied { value, generation }) if *generation == id.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: RawId) -> Option<&mut T> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot::Occupied { value, generation }) if *generation == id.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    pub fn contains(&self, id: RawId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RawId, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| match slot {
            Slot::Occupied { value, generation } => Some((
                RawId {
                    index: index as u32,
                    generation: *generation,
                },
                value,
            )),
            Slot::Vacant { .. } => None,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
