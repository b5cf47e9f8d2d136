//! Lineage id assignment
//!
//! Threads stable identifiers through records emitted by successive
//! commit pairs so one logical debt item keeps one id across its whole
//! recorded life. State is scoped to a single mining session over a
//! single repository and must not be shared across repositories.

use std::collections::{HashMap, VecDeque};

use crate::features::lineage::domain::{Resolution, SatdInstance};

type LiveKey = (String, String);
type DupKey = (String, String, String, String, Resolution);
type AncestorKey = (String, String, u32);

/// Stable-id allocator for lineage records
#[derive(Debug, Default)]
pub struct LineageTracker {
    next_id: u64,
    /// Ids of live debt comments keyed by (file, raw text). Duplicates
    /// queue up in first-seen order and pair off FIFO.
    live: HashMap<LiveKey, VecDeque<u64>>,
}

impl LineageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign id, parent and duplication fields to one batch, in order
    ///
    /// Records carrying a new side re-register under their new location
    /// so the next batch can pick the lineage up again. A record whose
    /// old side was never registered (debt predating the mining window)
    /// gets a fresh id.
    pub fn assign(&mut self, instances: Vec<SatdInstance>) -> Vec<SatdInstance> {
        let mut dup_seen: HashMap<DupKey, u32> = HashMap::new();
        let mut moved_parents: HashMap<AncestorKey, u64> = HashMap::new();

        instances
            .into_iter()
            .map(|instance| {
                let dup_key = (
                    instance.old_file.clone(),
                    instance.old_comment.text.clone(),
                    instance.new_file.clone(),
                    instance.new_comment.text.clone(),
                    instance.resolution,
                );
                let counter = dup_seen.entry(dup_key).or_insert(0);
                let duplication = *counter;
                *counter += 1;

                let (id, parent) = self.thread_id(&instance, &mut moved_parents);
                instance.with_lineage(id, parent, duplication)
            })
            .collect()
    }

    fn thread_id(
        &mut self,
        instance: &SatdInstance,
        moved_parents: &mut HashMap<AncestorKey, u64>,
    ) -> (u64, Option<u64>) {
        match instance.resolution {
            Resolution::SatdAdded => {
                let id = self.alloc();
                self.put(&instance.new_file, &instance.new_comment.text, id);
                (id, None)
            }
            Resolution::FileRemoved
            | Resolution::SatdRemoved
            | Resolution::SatdPossiblyRemoved
            | Resolution::ErrorUnknown => {
                let id = self
                    .take(&instance.old_file, &instance.old_comment.text)
                    .unwrap_or_else(|| self.alloc());
                (id, None)
            }
            Resolution::FilePathChanged
            | Resolution::SatdChanged
            | Resolution::ClassOrMethodChanged
            | Resolution::SatdUnaddressed => {
                let id = self
                    .take(&instance.old_file, &instance.old_comment.text)
                    .unwrap_or_else(|| self.alloc());
                self.put(&instance.new_file, &instance.new_comment.text, id);
                (id, None)
            }
            Resolution::SatdMovedFile => {
                let ancestor = (
                    instance.old_file.clone(),
                    instance.old_comment.text.clone(),
                    instance.old_comment.range.start_line,
                );
                match moved_parents.get(&ancestor) {
                    // Additional landing site of an ancestor already
                    // threaded in this batch: derived record, own id
                    Some(&parent) => {
                        let id = self.alloc();
                        self.put(&instance.new_file, &instance.new_comment.text, id);
                        (id, Some(parent))
                    }
                    None => {
                        let id = self
                            .take(&instance.old_file, &instance.old_comment.text)
                            .unwrap_or_else(|| self.alloc());
                        self.put(&instance.new_file, &instance.new_comment.text, id);
                        moved_parents.insert(ancestor, id);
                        (id, None)
                    }
                }
            }
        }
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn take(&mut self, file: &str, text: &str) -> Option<u64> {
        let key = (file.to_string(), text.to_string());
        let queue = self.live.get_mut(&key)?;
        let id = queue.pop_front();
        if queue.is_empty() {
            self.live.remove(&key);
        }
        id
    }

    fn put(&mut self, file: &str, text: &str, id: u64) {
        self.live
            .entry((file.to_string(), text.to_string()))
            .or_default()
            .push_back(id);
    }
}
