use std::collections::HashMap;

use log::warn;

/// Current local position of every node, keyed by node name.
#[derive(Clone, Debug, Default)]
pub struct NodeStore {
	positions: HashMap<String, (f64, f64)>,
}

impl NodeStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, id: &str) -> Option<(f64, f64)> {
		self.positions.get(id).copied()
	}

	/// Record a node position. Non-finite coordinates are dropped.
	pub fn set(&mut self, id: &str, x: f64, y: f64) {
		if !x.is_finite() || !y.is_finite() {
			warn!("ignoring non-finite position ({x}, {y}) for node {id:?}");
			return;
		}
		match self.positions.get_mut(id) {
			Some(pos) => *pos = (x, y),
			None => {
				self.positions.insert(id.to_string(), (x, y));
			}
		}
	}

	pub fn contains(&self, id: &str) -> bool {
		self.positions.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.positions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.positions.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, (f64, f64))> + '_ {
		self.positions.iter().map(|(id, &pos)| (id.as_str(), pos))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_store_is_empty() {
		let store = NodeStore::new();
		assert!(store.is_empty());
		assert_eq!(store.get("node1"), None);
	}

	#[test]
	fn test_set_then_get() {
		let mut store = NodeStore::new();
		store.set("node1", 0.0, 100.0);
		assert_eq!(store.get("node1"), Some((0.0, 100.0)));
		assert!(store.contains("node1"));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_set_overwrites() {
		let mut store = NodeStore::new();
		store.set("node1", 0.0, 0.0);
		store.set("node1", -250.0, 1e6);
		assert_eq!(store.get("node1"), Some((-250.0, 1e6)));
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn test_non_finite_positions_are_ignored() {
		let mut store = NodeStore::new();
		store.set("node1", 5.0, 5.0);
		store.set("node1", f64::NAN, 0.0);
		store.set("node1", 0.0, f64::INFINITY);
		store.set("node2", f64::NEG_INFINITY, 0.0);
		assert_eq!(store.get("node1"), Some((5.0, 5.0)));
		assert!(!store.contains("node2"));
	}

	#[test]
	fn test_iter_visits_every_node() {
		let mut store = NodeStore::new();
		store.set("a", 1.0, 2.0);
		store.set("b", 3.0, 4.0);
		let mut all: Vec<_> = store.iter().collect();
		all.sort_by(|l, r| l.0.cmp(r.0));
		assert_eq!(all, vec![("a", (1.0, 2.0)), ("b", (3.0, 4.0))]);
	}
}
