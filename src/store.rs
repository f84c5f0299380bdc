//! The task state container.
//!
//! Every mutation builds a fresh [`TaskState`] from the current one and swaps
//! it in whole. A snapshot obtained from [`TaskStore::snapshot`] never changes
//! underneath its holder.

use std::rc::Rc;

use tracing::debug;

use crate::category::{Category, CategoryDraft, CategoryId};
use crate::clock::Clock;
use crate::ids::IdGenerator;
use crate::seed;
use crate::task::{Task, TaskDraft, TaskId, TaskPatch};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    /// Newest first.
    pub tasks: Vec<Task>,
    /// Insertion order.
    pub categories: Vec<Category>,
}

impl TaskState {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

pub struct TaskStore {
    state: Rc<TaskState>,
    ids: Box<dyn IdGenerator>,
    clock: Rc<dyn Clock>,
}

impl TaskStore {
    pub fn new(state: TaskState, ids: Box<dyn IdGenerator>, clock: Rc<dyn Clock>) -> Self {
        Self {
            state: Rc::new(state),
            ids,
            clock,
        }
    }

    /// A store holding the demo tasks and categories.
    pub fn seeded(ids: Box<dyn IdGenerator>, clock: Rc<dyn Clock>) -> Self {
        let state = seed::demo_state(clock.as_ref());
        Self::new(state, ids, clock)
    }

    pub fn snapshot(&self) -> Rc<TaskState> {
        Rc::clone(&self.state)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> TaskId {
        let id = self.fresh_id(|state, id| state.task(id).is_some());
        let task = Task::from_draft(id.clone(), draft, self.clock.now());
        debug!(task_id = %id, title = %task.title, "adding task");

        let mut tasks = Vec::with_capacity(self.state.tasks.len() + 1);
        tasks.push(task);
        tasks.extend(self.state.tasks.iter().cloned());
        self.replace(TaskState {
            tasks,
            categories: self.state.categories.clone(),
        });
        id
    }

    pub fn update_task(&mut self, id: &str, patch: &TaskPatch) {
        self.map_task(id, |task, now| task.patched(patch, now));
    }

    pub fn delete_task(&mut self, id: &str) {
        if self.state.task(id).is_none() {
            debug!(task_id = id, "delete ignored, no such task");
            return;
        }
        debug!(task_id = id, "deleting task");
        let tasks = self
            .state
            .tasks
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        self.replace(TaskState {
            tasks,
            categories: self.state.categories.clone(),
        });
    }

    pub fn toggle_complete(&mut self, id: &str) {
        self.map_task(id, |task, now| {
            let patch = TaskPatch {
                is_completed: Some(!task.is_completed),
                ..TaskPatch::default()
            };
            task.patched(&patch, now)
        });
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> CategoryId {
        let id = self.fresh_id(|state, id| state.category(id).is_some());
        debug!(category_id = %id, name = %draft.name, "adding category");

        let mut categories = self.state.categories.clone();
        categories.push(Category::from_draft(id.clone(), draft));
        self.replace(TaskState {
            tasks: self.state.tasks.clone(),
            categories,
        });
        id
    }

    fn map_task(&mut self, id: &str, f: impl Fn(&Task, chrono::DateTime<chrono::Utc>) -> Task) {
        if self.state.task(id).is_none() {
            debug!(task_id = id, "update ignored, no such task");
            return;
        }
        let now = self.clock.now();
        let tasks = self
            .state
            .tasks
            .iter()
            .map(|t| if t.id == id { f(t, now) } else { t.clone() })
            .collect();
        debug!(task_id = id, "updating task");
        self.replace(TaskState {
            tasks,
            categories: self.state.categories.clone(),
        });
    }

    /// Draws ids until one is not held by a live entity of the same kind.
    fn fresh_id(&mut self, taken: impl Fn(&TaskState, &str) -> bool) -> String {
        loop {
            let id = self.ids.next_id();
            if !taken(&self.state, &id) {
                return id;
            }
        }
    }

    fn replace(&mut self, next: TaskState) {
        self.state = Rc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::StepClock;
    use crate::ids::SequentialIds;
    use crate::task::Priority;
    use chrono::{Duration, TimeZone, Utc};
    use std::collections::HashSet;

    fn store() -> TaskStore {
        let clock = StepClock::new(
            Utc.with_ymd_and_hms(2024, 7, 10, 9, 0, 0).unwrap(),
            Duration::seconds(1),
        );
        TaskStore::seeded(Box::new(SequentialIds::new("")), Rc::new(clock))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn add_task_prepends_with_unique_id() {
        let mut store = store();
        for i in 0..5 {
            let before = store.tasks().len();
            let existing: HashSet<String> = store.tasks().iter().map(|t| t.id.clone()).collect();
            let id = store.add_task(draft(&format!("task {i}")));
            assert_eq!(store.tasks().len(), before + 1);
            assert_eq!(store.tasks()[0].id, id);
            assert!(!existing.contains(&id));
        }
    }

    #[test]
    fn generated_ids_skip_live_ones() {
        // The seed uses "1".."3" and SequentialIds("") would hand those out first.
        let mut store = store();
        let id = store.add_task(draft("fresh"));
        assert_eq!(id, "4");
        let cat = store.add_category(CategoryDraft {
            name: "Finance".to_string(),
            color: "#EF4444".to_string(),
        });
        assert_eq!(cat, "5");
    }

    #[test]
    fn add_task_stamps_timestamps() {
        let mut store = store();
        store.add_task(draft("new"));
        let task = &store.tasks()[0];
        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.is_completed);
    }

    #[test]
    fn delete_is_idempotent() {
        let mut store = store();
        store.delete_task("2");
        let after_first = store.snapshot();
        store.delete_task("2");
        assert_eq!(*store.snapshot(), *after_first);
        assert_eq!(store.tasks().len(), 2);
    }

    #[test]
    fn double_toggle_restores_flag() {
        let mut store = store();
        let original = store.snapshot().task("1").cloned().unwrap();
        store.toggle_complete("1");
        let once = store.snapshot().task("1").cloned().unwrap();
        store.toggle_complete("1");
        let twice = store.snapshot().task("1").cloned().unwrap();
        assert_eq!(once.is_completed, !original.is_completed);
        assert_eq!(twice.is_completed, original.is_completed);
        assert!(once.updated_at > original.updated_at);
        assert!(twice.updated_at > once.updated_at);
    }

    #[test]
    fn empty_update_only_touches_updated_at() {
        let mut store = store();
        let before = store.snapshot().task("2").cloned().unwrap();
        store.update_task("2", &TaskPatch::default());
        let after = store.snapshot().task("2").cloned().unwrap();
        assert!(after.updated_at > before.updated_at);
        assert_eq!(
            Task {
                updated_at: before.updated_at,
                ..after
            },
            before
        );
    }

    #[test]
    fn update_merges_fields() {
        let mut store = store();
        store.update_task(
            "2",
            &TaskPatch {
                title: Some("Buy more groceries".to_string()),
                priority: Some(Priority::High),
                ..TaskPatch::default()
            },
        );
        let task = store.snapshot().task("2").cloned().unwrap();
        assert_eq!(task.title, "Buy more groceries");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category_id.as_deref(), Some("3"));
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut store = store();
        let before = store.snapshot();
        store.update_task("nope", &TaskPatch::default());
        store.toggle_complete("nope");
        store.delete_task("nope");
        assert!(Rc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn snapshots_are_not_mutated() {
        let mut store = store();
        let before = store.snapshot();
        store.toggle_complete("1");
        store.add_task(draft("later"));
        assert_eq!(before.tasks.len(), 3);
        assert!(!before.task("1").unwrap().is_completed);
    }

    #[test]
    fn categories_append_in_order() {
        let mut store = store();
        store.add_category(CategoryDraft {
            name: "Finance".to_string(),
            color: "#EF4444".to_string(),
        });
        let names: Vec<_> = store.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Work", "Personal", "Shopping", "Finance"]);
    }
}
