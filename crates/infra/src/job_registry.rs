use medimate_domain::{JobId, ReminderJob};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Inner {
    jobs: HashMap<JobId, ReminderJob>,
    /// Min-heap over (next_run_at, job id). Entries are never removed
    /// eagerly on upsert or remove, stale ones are skipped in `pop_due`.
    queue: BinaryHeap<Reverse<(i64, JobId)>>,
}

/// In-process registry of all scheduled reminder jobs. The single source of
/// truth for what will fire and when, shared between the sync scheduler, the
/// dispatch loop and status queries.
#[derive(Debug, Default)]
pub struct JobRegistry {
    inner: Mutex<Inner>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts the job, replacing any previous job with the same id. Only
    /// running jobs are queued for dispatch.
    pub fn upsert(&self, job: ReminderJob) {
        let mut inner = self.inner.lock().unwrap();
        if job.running {
            inner.queue.push(Reverse((job.next_run_at, job.id.clone())));
        }
        inner.jobs.insert(job.id.clone(), job);
    }

    pub fn remove(&self, job_id: &JobId) -> Option<ReminderJob> {
        let mut inner = self.inner.lock().unwrap();
        inner.jobs.remove(job_id)
    }

    pub fn find(&self, job_id: &JobId) -> Option<ReminderJob> {
        let inner = self.inner.lock().unwrap();
        inner.jobs.get(job_id).cloned()
    }

    /// Snapshot of all jobs matching the predicate.
    pub fn list_by<F>(&self, pred: F) -> Vec<ReminderJob>
    where
        F: Fn(&ReminderJob) -> bool,
    {
        let inner = self.inner.lock().unwrap();
        inner.jobs.values().filter(|job| pred(job)).cloned().collect()
    }

    /// Removes all jobs matching the predicate and reports how many went.
    pub fn remove_by<F>(&self, pred: F) -> usize
    where
        F: Fn(&ReminderJob) -> bool,
    {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.jobs.len();
        inner.jobs.retain(|_, job| !pred(job));
        before - inner.jobs.len()
    }

    /// Pops every job due at or before `now` (millisecond timestamp). Heap
    /// entries that no longer match the registered job are discarded, so a
    /// job rescheduled or removed after being queued never fires from its
    /// old entry.
    pub fn pop_due(&self, now: i64) -> Vec<ReminderJob> {
        let mut inner = self.inner.lock().unwrap();
        let mut due = Vec::new();
        let mut seen = HashSet::new();

        while let Some(Reverse((ts, job_id))) = inner.queue.pop() {
            if ts > now {
                inner.queue.push(Reverse((ts, job_id)));
                break;
            }
            if !seen.insert(job_id.clone()) {
                continue;
            }
            match inner.jobs.get(&job_id) {
                Some(job) if job.running && job.next_run_at == ts => due.push(job.clone()),
                _ => {}
            }
        }

        due
    }

    /// Marks every job as stopped and drops the dispatch queue. Jobs stay
    /// visible in status queries until the next resync.
    pub fn stop_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        for job in inner.jobs.values_mut() {
            job.running = false;
        }
        inner.queue.clear();
    }

    pub fn job_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.jobs.len()
    }
}
