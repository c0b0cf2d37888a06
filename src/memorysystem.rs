use crate::error::EngineError;
use crate::serialize::*;
use itertools::*;
use log::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const AGENT_CATEGORY: &str = "agents";
pub const FACILITY_CATEGORY: &str = "facilities";
pub const BATTALION_CATEGORY: &str = "battalions";
pub const SITE_CATEGORY: &str = "sites";
pub const CONFIG_CATEGORY: &str = "config";

/// Size of one persisted chunk. Segments hold up to 100 KiB; chunks stay well
/// below that.
const SEGMENT_CHUNK_SIZE: usize = 1024 * 50;

/// Address of one record: category → site → name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordPath {
    category: String,
    site: String,
    name: String,
}

impl RecordPath {
    pub fn new<C: Into<String>, S: Into<String>, N: Into<String>>(category: C, site: S, name: N) -> RecordPath {
        RecordPath {
            category: category.into(),
            site: site.into(),
            name: name.into(),
        }
    }

    pub fn parse(key: &str) -> Option<RecordPath> {
        let mut parts = key.splitn(3, '/');

        let category = parts.next()?;
        let site = parts.next()?;
        let name = parts.next()?;

        Some(RecordPath::new(category, site, name))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.site, self.name)
    }
}

/// Persisted key-value tree that outlives the tick.
pub trait RecordStore {
    fn get(&self, path: &RecordPath) -> Option<Value>;

    fn put(&mut self, path: &RecordPath, record: Value);

    fn remove(&mut self, path: &RecordPath);

    fn paths(&self) -> Vec<RecordPath>;

    /// Record names stored under one category and site, in key order.
    fn names(&self, category: &str, site: &str) -> Vec<String> {
        self.paths()
            .into_iter()
            .filter(|path| path.category() == category && path.site() == site)
            .map(|path| path.name)
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<RecordPath, Value>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, path: &RecordPath) -> Option<Value> {
        self.records.get(path).cloned()
    }

    fn put(&mut self, path: &RecordPath, record: Value) {
        self.records.insert(path.clone(), record);
    }

    fn remove(&mut self, path: &RecordPath) {
        self.records.remove(path);
    }

    fn paths(&self) -> Vec<RecordPath> {
        self.records.keys().cloned().collect()
    }
}

/// Buffers every write over an underlying store until `commit`. Reads see the
/// buffered state. Dropping an uncommitted stage discards the tick's writes.
pub struct StagedStore<'a> {
    inner: &'a mut dyn RecordStore,
    writes: BTreeMap<RecordPath, Option<Value>>,
}

impl<'a> StagedStore<'a> {
    pub fn new(inner: &'a mut dyn RecordStore) -> StagedStore<'a> {
        StagedStore {
            inner,
            writes: BTreeMap::new(),
        }
    }

    pub fn commit(self) -> usize {
        let count = self.writes.len();

        for (path, write) in self.writes {
            match write {
                Some(record) => self.inner.put(&path, record),
                None => self.inner.remove(&path),
            }
        }

        count
    }
}

impl<'a> RecordStore for StagedStore<'a> {
    fn get(&self, path: &RecordPath) -> Option<Value> {
        match self.writes.get(path) {
            Some(write) => write.clone(),
            None => self.inner.get(path),
        }
    }

    fn put(&mut self, path: &RecordPath, record: Value) {
        self.writes.insert(path.clone(), Some(record));
    }

    fn remove(&mut self, path: &RecordPath) {
        self.writes.insert(path.clone(), None);
    }

    fn paths(&self) -> Vec<RecordPath> {
        self.inner
            .paths()
            .into_iter()
            .filter(|path| !self.writes.contains_key(path))
            .chain(self.writes.iter().filter(|(_, write)| write.is_some()).map(|(path, _)| path.clone()))
            .sorted()
            .collect()
    }
}

/// Raw numbered memory segments provided by the host.
pub trait SegmentAccess {
    fn get(&self, segment: u8) -> Option<String>;

    fn set(&mut self, segment: u8, data: String);
}

/// A record tree persisted across a fixed list of raw segments.
pub struct SegmentStore {
    records: MemoryStore,
    segments: Vec<u8>,
}

impl SegmentStore {
    pub fn load(access: &dyn SegmentAccess, segments: &[u8]) -> SegmentStore {
        let mut records = MemoryStore::new();

        let encoded_data = segments.iter().filter_map(|segment| access.get(*segment)).join("");

        if !encoded_data.is_empty() {
            match unpack::<BTreeMap<String, String>>(&encoded_data) {
                Ok(tree) => {
                    for (key, raw) in tree {
                        let path = match RecordPath::parse(&key) {
                            Some(path) => path,
                            None => {
                                error!("Skipping record with malformed path. Key: {}", key);
                                continue;
                            }
                        };

                        match serde_json::from_str(&raw) {
                            Ok(record) => records.put(&path, record),
                            Err(err) => error!("Skipping undecodable record. Path: {} - Error: {}", path, err),
                        }
                    }
                }
                Err(err) => error!("Failed to decode persisted segments, starting empty. Error: {}", err),
            }
        }

        SegmentStore {
            records,
            segments: segments.to_vec(),
        }
    }

    pub fn flush(&self, access: &mut dyn SegmentAccess) -> Result<(), EngineError> {
        let mut tree = BTreeMap::new();

        for path in self.records.paths() {
            if let Some(record) = self.records.get(&path) {
                tree.insert(path.to_string(), serde_json::to_string(&record)?);
            }
        }

        let encoded_data = pack(&tree)?;

        let needed_segments = encoded_data.len().div_ceil(SEGMENT_CHUNK_SIZE);

        if needed_segments > self.segments.len() {
            return Err(EngineError::Store(format!(
                "state needs {} segments but only {} are available",
                needed_segments,
                self.segments.len()
            )));
        }

        let mut segments = self.segments.iter();

        for (chunk, segment) in encoded_data.as_bytes().chunks(SEGMENT_CHUNK_SIZE).zip(segments.by_ref()) {
            let chunk_str = std::str::from_utf8(chunk).map_err(|e| EngineError::Store(e.to_string()))?;

            access.set(*segment, chunk_str.to_owned());
        }

        for segment in segments {
            access.set(*segment, String::new());
        }

        Ok(())
    }
}

impl RecordStore for SegmentStore {
    fn get(&self, path: &RecordPath) -> Option<Value> {
        self.records.get(path)
    }

    fn put(&mut self, path: &RecordPath, record: Value) {
        self.records.put(path, record)
    }

    fn remove(&mut self, path: &RecordPath) {
        self.records.remove(path)
    }

    fn paths(&self) -> Vec<RecordPath> {
        self.records.paths()
    }
}
