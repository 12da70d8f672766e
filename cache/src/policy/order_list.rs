use ahash::{HashMap, HashMapExt};
use generational_arena::{Arena, Index};

#[derive(Debug)]
struct Node {
  id: u64,
  next: Option<Index>,
  prev: Option<Index>,
}

// An ordered set of ids with O(1) append, reorder and removal.
// Head is the oldest position, tail the newest.
#[derive(Debug)]
pub(super) struct OrderList {
  // Arena stores all nodes contiguously.
  nodes: Arena<Node>,
  // O(1) lookup of an id to its node index in the arena.
  lookup: HashMap<u64, Index>,
  head: Option<Index>,
  tail: Option<Index>,
}

impl OrderList {
  pub fn new() -> Self {
    Self {
      nodes: Arena::new(),
      lookup: HashMap::new(),
      head: None,
      tail: None,
    }
  }

  // Detaches a node from its neighbours without freeing it.
  fn unlink(&mut self, index: Index) {
    let node = &self.nodes[index];
    let prev_node_idx = node.prev;
    let next_node_idx = node.next;

    if let Some(prev_idx) = prev_node_idx {
      self.nodes[prev_idx].next = next_node_idx;
    } else {
      self.head = next_node_idx;
    }

    if let Some(next_idx) = next_node_idx {
      self.nodes[next_idx].prev = prev_node_idx;
    } else {
      self.tail = prev_node_idx;
    }
  }

  // Attaches an already allocated node as the new tail.
  fn link_back(&mut self, index: Index) {
    let old_tail_idx = self.tail;
    self.nodes[index].prev = old_tail_idx;
    self.nodes[index].next = None;
    self.tail = Some(index);

    if let Some(old_tail) = old_tail_idx {
      self.nodes[old_tail].next = Some(index);
    }

    if self.head.is_none() {
      self.head = Some(index);
    }
  }

  pub fn contains(&self, id: u64) -> bool {
    self.lookup.contains_key(&id)
  }

  pub fn len(&self) -> usize {
    self.lookup.len()
  }

  /// Appends `id` at the tail. An id that is already tracked keeps its position.
  pub fn push_back(&mut self, id: u64) {
    if self.contains(id) {
      return;
    }
    let index = self.nodes.insert(Node {
      id,
      next: None,
      prev: None,
    });
    self.lookup.insert(id, index);
    self.link_back(index);
  }

  pub fn move_to_back(&mut self, id: u64) {
    if let Some(&index) = self.lookup.get(&id) {
      if self.tail != Some(index) {
        self.unlink(index);
        self.link_back(index);
      }
    }
  }

  pub fn pop_front(&mut self) -> Option<u64> {
    let id = self.nodes.get(self.head?)?.id;
    self.remove(id);
    Some(id)
  }

  pub fn pop_back(&mut self) -> Option<u64> {
    let id = self.nodes.get(self.tail?)?.id;
    self.remove(id);
    Some(id)
  }

  pub fn remove(&mut self, id: u64) -> bool {
    match self.lookup.remove(&id) {
      Some(index) => {
        self.unlink(index);
        self.nodes.remove(index);
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.nodes.clear();
    self.lookup.clear();
    self.head = None;
    self.tail = None;
  }

  /// Ids from head (oldest) to tail (newest).
  pub fn ids(&self) -> Vec<u64> {
    let mut ids = Vec::with_capacity(self.len());
    let mut current = self.head;
    while let Some(index) = current {
      ids.push(self.nodes[index].id);
      current = self.nodes[index].next;
    }
    ids
  }
}
