//! Completed task log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: u64,
    pub task: String,
    pub completed_at: DateTime<Utc>,
}

/// Tasks completed during this run, newest first
#[derive(Debug, Clone, Default)]
pub struct TaskHistory {
    next_id: u64,
    tasks: Vec<CompletedTask>,
}

impl TaskHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, task: &str) -> CompletedTask {
        self.next_id += 1;
        let completed = CompletedTask {
            id: self.next_id,
            task: task.to_string(),
            completed_at: Utc::now(),
        };
        self.tasks.insert(0, completed.clone());
        completed
    }

    pub fn tasks(&self) -> &[CompletedTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
