//! Active platform set with generational handles
//!
//! Slots are reused after culling; a handle only resolves while the slot still
//! holds the generation it was issued for, so stale handles read as "gone".

use serde::{Deserialize, Serialize};

use super::state::Platform;

/// Non-owning reference to a live platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformHandle {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    platform: Option<Platform>,
}

/// Owner of every live platform
#[derive(Debug, Clone, Default)]
pub struct PlatformSet {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl PlatformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, platform: Platform) -> PlatformHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.platform = Some(platform);
            return PlatformHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            platform: Some(platform),
        });
        PlatformHandle {
            index,
            generation: 0,
        }
    }

    pub fn get(&self, handle: PlatformHandle) -> Option<&Platform> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.platform.as_ref())
    }

    pub fn get_mut(&mut self, handle: PlatformHandle) -> Option<&mut Platform> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.platform.as_mut())
    }

    #[inline]
    pub fn contains(&self, handle: PlatformHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn remove(&mut self, handle: PlatformHandle) -> Option<Platform> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let platform = slot.platform.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(platform)
    }

    /// Remove every platform failing `keep`, returning the removed handles
    pub fn retain(&mut self, mut keep: impl FnMut(&Platform) -> bool) -> Vec<PlatformHandle> {
        let doomed: Vec<PlatformHandle> = self
            .iter()
            .filter(|(_, p)| !keep(p))
            .map(|(h, _)| h)
            .collect();
        for &handle in &doomed {
            self.remove(handle);
        }
        doomed
    }

    pub fn clear(&mut self) {
        let live: Vec<PlatformHandle> = self.iter().map(|(h, _)| h).collect();
        for handle in live {
            self.remove(handle);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlatformHandle, &Platform)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.platform.as_ref().map(|p| {
                (
                    PlatformHandle {
                        index: i as u32,
                        generation: s.generation,
                    },
                    p,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlatformHandle, &mut Platform)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.platform.as_mut().map(|p| {
                (
                    PlatformHandle {
                        index: i as u32,
                        generation,
                    },
                    p,
                )
            })
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Highest current platform Y, if any
    pub fn highest_y(&self) -> Option<f32> {
        self.iter().map(|(_, p)| p.pos.y).reduce(f32::max)
    }
}
