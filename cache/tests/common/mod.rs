#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use fibre_datacache::{BackingStore, Cacheable};
use tracing_subscriber::EnvFilter;

/// Routes cache logs to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// A test payload with a fixed id and byte size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyData {
  pub id: u64,
  pub size: u64,
}

impl Cacheable for DummyData {
  fn id(&self) -> u64 {
    self.id
  }

  fn byte_size(&self) -> u64 {
    self.size
  }
}

pub fn data(id: u64, size: u64) -> Arc<DummyData> {
  Arc::new(DummyData { id, size })
}

/// The four standard fixtures: ids 0..=3 with sizes 1000, 2000, 3000, 4000.
pub struct Fixtures {
  pub c0: Arc<DummyData>,
  pub c1: Arc<DummyData>,
  pub c2: Arc<DummyData>,
  pub c3: Arc<DummyData>,
}

pub fn fixtures() -> Fixtures {
  Fixtures {
    c0: data(0, 1000),
    c1: data(1, 2000),
    c2: data(2, 3000),
    c3: data(3, 4000),
  }
}

/// A backing store with scripted answers:
/// - ids 0..=3 exist and load as the standard fixtures,
/// - every save succeeds except for id 3,
/// - every delete of ids 0..=3 succeeds once and then reports `false`,
/// - everything is storable.
#[derive(Default)]
pub struct ScriptedStore {
  deleted: Mutex<HashSet<u64>>,
  pub loads: AtomicUsize,
  pub saves: AtomicUsize,
  pub deletes: AtomicUsize,
}

impl ScriptedStore {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn loads(&self) -> usize {
    self.loads.load(Ordering::SeqCst)
  }

  pub fn saves(&self) -> usize {
    self.saves.load(Ordering::SeqCst)
  }

  pub fn deletes(&self) -> usize {
    self.deletes.load(Ordering::SeqCst)
  }
}

impl BackingStore<DummyData> for ScriptedStore {
  fn exists(&self, id: u64) -> bool {
    id <= 3
  }

  fn load(&self, id: u64) -> Option<Arc<DummyData>> {
    self.loads.fetch_add(1, Ordering::SeqCst);
    let f = fixtures();
    match id {
      0 => Some(f.c0),
      1 => Some(f.c1),
      2 => Some(f.c2),
      3 => Some(f.c3),
      _ => None,
    }
  }

  fn save(&self, data: &Arc<DummyData>) -> bool {
    self.saves.fetch_add(1, Ordering::SeqCst);
    data.id != 3
  }

  fn delete(&self, data: &DummyData) -> bool {
    self.deletes.fetch_add(1, Ordering::SeqCst);
    data.id <= 3 && self.deleted.lock().unwrap().insert(data.id)
  }

  fn is_storable(&self, _data: &DummyData) -> bool {
    true
  }
}

/// Ids of the fixtures that are resident, in ascending order.
pub fn resident<P>(cache: &fibre_datacache::DataCache<DummyData, P>, f: &Fixtures) -> Vec<u64>
where
  P: fibre_datacache::EvictionPolicy,
{
  [&f.c0, &f.c1, &f.c2, &f.c3]
    .into_iter()
    .map(|d| d.id)
    .filter(|&id| cache.data_is_in_cache(id))
    .collect()
}
