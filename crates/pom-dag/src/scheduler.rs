//! Wave-by-wave execution of a [`TaskGraph`] on a bounded worker pool.
//!
//! Each wave is a barrier: it starts only after every task of the previous
//! wave finished. Within a wave, tasks run on tokio's blocking pool, at most
//! `parallelism` at a time. Task results are stored per task name, so the
//! order in which workers finish never affects what a dependent sees.
//!
//! There is no cancellation. When a task fails, the rest of its wave still
//! runs to completion, their results are discarded, and no further wave
//! starts.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::graph::{Inputs, TaskGraph, TaskKey};

/// Results of a completed run, by task name.
pub struct Outputs<K, V> {
    values: HashMap<K, Arc<V>>,
}

impl<K: TaskKey, V> Outputs<K, V> {
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

/// Runs task graphs with bounded parallelism.
#[derive(Clone, Debug)]
pub struct Scheduler {
    parallelism: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(default_parallelism())
    }
}

/// What happened to one task of a wave.
enum Outcome<V, E> {
    Done(V),
    Failed(E),
    Panicked,
}

impl Scheduler {
    /// Create a scheduler with at most `parallelism` concurrent tasks
    /// (minimum 1).
    pub fn new(parallelism: usize) -> Self {
        Self {
            parallelism: parallelism.max(1),
        }
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Run every task of `graph` and return their results.
    pub async fn run<K, V, E>(
        &self,
        graph: &TaskGraph<K, V, E>,
    ) -> Result<Outputs<K, V>, ScheduleError<E>>
    where
        K: TaskKey,
        V: Send + Sync + 'static,
        E: Send + 'static,
    {
        self.run_observed(graph, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_wave` with the wave number and
    /// its task names (in declaration order) before each wave starts.
    pub async fn run_observed<K, V, E, F>(
        &self,
        graph: &TaskGraph<K, V, E>,
        mut on_wave: F,
    ) -> Result<Outputs<K, V>, ScheduleError<E>>
    where
        K: TaskKey,
        V: Send + Sync + 'static,
        E: Send + 'static,
        F: FnMut(usize, &[K]) + Send,
    {
        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut results: HashMap<K, Arc<V>> = HashMap::with_capacity(graph.len());

        for (wave_no, wave) in graph.wave_indices().into_iter().enumerate() {
            let started = Instant::now();
            let keys: Vec<K> = wave.iter().map(|&i| graph.task(i).key.clone()).collect();
            on_wave(wave_no, &keys);
            debug!(wave = wave_no, tasks = wave.len(), "starting wave");

            let mut join_set = JoinSet::new();
            for &index in &wave {
                let task = graph.task(index);
                let inputs = Inputs::new(
                    task.deps
                        .iter()
                        .filter_map(|dep| results.get(dep).map(|v| (dep.clone(), Arc::clone(v))))
                        .collect(),
                );
                let run = Arc::clone(&task.run);
                let permit = match Arc::clone(&semaphore).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        // Let dispatched siblings finish before giving up.
                        while join_set.join_next().await.is_some() {}
                        return Err(ScheduleError::PoolClosed);
                    }
                };

                join_set.spawn_blocking(move || {
                    let _permit = permit;
                    let outcome = match panic::catch_unwind(AssertUnwindSafe(|| run(inputs))) {
                        Ok(Ok(value)) => Outcome::Done(value),
                        Ok(Err(error)) => Outcome::Failed(error),
                        Err(_) => Outcome::Panicked,
                    };
                    (index, outcome)
                });
            }

            let mut finished: Vec<(usize, Outcome<V, E>)> = Vec::with_capacity(wave.len());
            let mut lost = false;
            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(done) => finished.push(done),
                    Err(e) => {
                        warn!(error = %e, "worker did not report back");
                        lost = true;
                    }
                }
            }
            if lost {
                return Err(ScheduleError::PoolClosed);
            }

            // Declaration order decides which failure is reported.
            finished.sort_by_key(|(index, _)| *index);
            let mut completed = Vec::with_capacity(finished.len());
            for (index, outcome) in finished {
                let key = graph.task(index).key.clone();
                match outcome {
                    Outcome::Done(value) => completed.push((key, value)),
                    Outcome::Failed(error) => {
                        warn!(task = %key, wave = wave_no, "task failed");
                        return Err(ScheduleError::Task {
                            task: key.to_string(),
                            error,
                        });
                    }
                    Outcome::Panicked => {
                        warn!(task = %key, wave = wave_no, "task panicked");
                        return Err(ScheduleError::Panicked {
                            task: key.to_string(),
                        });
                    }
                }
            }

            for (key, value) in completed {
                results.insert(key, Arc::new(value));
            }
            debug!(
                wave = wave_no,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "wave complete"
            );
        }

        Ok(Outputs { values: results })
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
