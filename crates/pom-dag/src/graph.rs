//! Task declaration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DagError, DagResult};

/// Bounds a task identifier has to satisfy.
pub trait TaskKey: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

impl<T> TaskKey for T where T: Clone + Eq + Hash + fmt::Display + Send + Sync + 'static {}

/// A task body. Receives its dependencies' results and produces its own.
pub type TaskFn<K, V, E> = Arc<dyn Fn(Inputs<K, V>) -> Result<V, E> + Send + Sync>;

/// The results of a task's declared dependencies.
///
/// Only declared dependencies are visible; asking for anything else
/// returns `None`.
pub struct Inputs<K, V> {
    values: HashMap<K, Arc<V>>,
}

impl<K: TaskKey, V> Inputs<K, V> {
    pub(crate) fn new(values: HashMap<K, Arc<V>>) -> Self {
        Self { values }
    }

    /// The result of dependency `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key).map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub(crate) struct Task<K, V, E> {
    pub(crate) key: K,
    pub(crate) deps: Vec<K>,
    pub(crate) run: TaskFn<K, V, E>,
}

/// A set of tasks with declared dependencies.
///
/// Tasks are kept in declaration order. That order also breaks ties when
/// several tasks of one wave fail.
pub struct TaskGraph<K, V, E> {
    tasks: Vec<Task<K, V, E>>,
    index: HashMap<K, usize>,
}

impl<K: TaskKey, V, E> Default for TaskGraph<K, V, E> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: TaskKey, V, E> TaskGraph<K, V, E> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of declared tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Declared dependencies of `key`.
    pub fn dependencies(&self, key: &K) -> Option<&[K]> {
        self.index.get(key).map(|&i| self.tasks[i].deps.as_slice())
    }

    /// Declare a task.
    ///
    /// Every dependency must already be declared, which keeps the graph
    /// acyclic. Returns an error for a duplicate name or an unknown
    /// dependency.
    pub fn add_task<F>(
        &mut self,
        key: K,
        deps: impl IntoIterator<Item = K>,
        run: F,
    ) -> DagResult<()>
    where
        F: Fn(Inputs<K, V>) -> Result<V, E> + Send + Sync + 'static,
    {
        if self.index.contains_key(&key) {
            return Err(DagError::DuplicateTask(key.to_string()));
        }

        let deps: Vec<K> = deps.into_iter().collect();
        for dep in &deps {
            if !self.index.contains_key(dep) {
                return Err(DagError::UnknownDependency {
                    task: key.to_string(),
                    dependency: dep.to_string(),
                });
            }
        }

        debug!(task = %key, deps = deps.len(), "declared task");
        self.index.insert(key.clone(), self.tasks.len());
        self.tasks.push(Task {
            key,
            deps,
            run: Arc::new(run),
        });
        Ok(())
    }

    /// Group tasks into waves.
    ///
    /// A task's wave is one past the latest wave among its dependencies;
    /// tasks without dependencies form wave 0. Within a wave, tasks keep
    /// declaration order.
    pub fn waves(&self) -> Vec<Vec<K>> {
        self.wave_indices()
            .into_iter()
            .map(|wave| wave.into_iter().map(|i| self.tasks[i].key.clone()).collect())
            .collect()
    }

    pub(crate) fn wave_indices(&self) -> Vec<Vec<usize>> {
        let mut level: Vec<usize> = Vec::with_capacity(self.tasks.len());
        let mut waves: Vec<Vec<usize>> = Vec::new();

        // Dependencies always precede their dependents, so one pass suffices.
        for (i, task) in self.tasks.iter().enumerate() {
            let wave = task
                .deps
                .iter()
                .filter_map(|dep| self.index.get(dep))
                .map(|&d| level[d] + 1)
                .max()
                .unwrap_or(0);
            level.push(wave);
            if waves.len() <= wave {
                waves.resize_with(wave + 1, Vec::new);
            }
            waves[wave].push(i);
        }

        waves
    }

    pub(crate) fn task(&self, index: usize) -> &Task<K, V, E> {
        &self.tasks[index]
    }
}
