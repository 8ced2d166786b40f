// src/state.rs
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RelayError;

pub const DEFAULT_SEEN_CAP: usize = 500;

/// Bounded ordered record of identifiers already delivered for one feed.
/// Insertion order is delivery order; the oldest identifiers are evicted
/// once the cap is exceeded. Membership checks go through the auxiliary
/// index, so feeds with hundreds of entries stay cheap.
#[derive(Debug)]
pub struct SeenSet {
    order: VecDeque<String>,
    index: HashSet<String>,
    cap: usize,
}

impl SeenSet {
    pub fn new(cap: usize) -> Self {
        Self {
            order: VecDeque::new(),
            index: HashSet::new(),
            cap: cap.max(1),
        }
    }

    /// Rebuild from a persisted identifier list. Duplicates are dropped
    /// (first occurrence wins) and the cap is re-applied, so a hand-edited
    /// or older state file loads into a valid set.
    fn from_ids(ids: Vec<String>, cap: usize) -> Self {
        let mut set = Self::new(cap);
        for id in ids {
            set.record(&id);
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Append `id` if absent, evicting from the front past the cap.
    /// Re-recording an existing id is a no-op and does not disturb
    /// eviction order. Returns whether the id was newly inserted.
    pub fn record(&mut self, id: &str) -> bool {
        if !self.index.insert(id.to_string()) {
            return false;
        }
        self.order.push_back(id.to_string());
        while self.order.len() > self.cap {
            if let Some(evicted) = self.order.pop_front() {
                self.index.remove(&evicted);
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identifiers in insertion order, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Serialized shape: `{"seen": {<feed url>: ["<id>", ...]}}`, the same
/// layout the relay has always written, so existing state files carry over.
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    seen: BTreeMap<String, Vec<String>>,
}

/// Whole-run de-duplication state: feed URL -> seen-set. Loaded once at run
/// start, mutated in memory while feeds are processed, written atomically
/// exactly once at run end.
#[derive(Debug)]
pub struct State {
    seen: BTreeMap<String, SeenSet>,
    cap: usize,
}

impl State {
    pub fn empty(cap: usize) -> Self {
        Self {
            seen: BTreeMap::new(),
            cap,
        }
    }

    /// Read persisted state. A missing file is a fresh start, not an
    /// error; anything unreadable or unparsable is
    /// `PersistedStateCorrupt` — proceeding with ambiguous history would
    /// re-announce everything.
    pub fn load(path: &Path, cap: usize) -> Result<Self, RelayError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::empty(cap));
            }
            Err(e) => {
                return Err(RelayError::PersistedStateCorrupt {
                    path: path.to_path_buf(),
                    source: anyhow::Error::new(e).context("reading state file"),
                });
            }
        };
        let file: StateFile =
            serde_json::from_str(&raw).map_err(|e| RelayError::PersistedStateCorrupt {
                path: path.to_path_buf(),
                source: anyhow::Error::new(e).context("parsing state file"),
            })?;
        let seen = file
            .seen
            .into_iter()
            .map(|(url, ids)| (url, SeenSet::from_ids(ids, cap)))
            .collect();
        Ok(Self { seen, cap })
    }

    /// Write persisted state via temp-file-then-rename, so a crash during
    /// the write never leaves a half-written file behind. Keys are sorted
    /// and the JSON is indented to keep state diffs reviewable. Feeds with
    /// an empty seen-set are omitted; a feed that never delivered anything
    /// leaves no trace in the file.
    pub fn save(&self, path: &Path) -> Result<(), RelayError> {
        let persist_err = |source: anyhow::Error| RelayError::StatePersist {
            path: path.to_path_buf(),
            source,
        };

        let file = StateFile {
            seen: self
                .seen
                .iter()
                .filter(|(_, set)| !set.is_empty())
                .map(|(url, set)| (url.clone(), set.ids().map(str::to_string).collect()))
                .collect(),
        };
        let mut body = serde_json::to_string_pretty(&file)
            .map_err(|e| persist_err(anyhow::Error::new(e).context("serializing state")))?;
        body.push('\n');

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(|e| {
            persist_err(
                anyhow::Error::new(e).context(format!("writing {}", tmp.display())),
            )
        })?;
        fs::rename(&tmp, path)
            .map_err(|e| persist_err(anyhow::Error::new(e).context("renaming temp state file")))?;
        Ok(())
    }

    /// The seen-set for `url`, created empty on first touch.
    pub fn feed_mut(&mut self, url: &str) -> &mut SeenSet {
        let cap = self.cap;
        self.seen
            .entry(url.to_string())
            .or_insert_with(|| SeenSet::new(cap))
    }

    pub fn feed(&self, url: &str) -> Option<&SeenSet> {
        self.seen.get(url)
    }
}
