use crate::frame::Frame;
use crate::job::Job;

/// Runs registered jobs once per frame against a shared context.
pub struct Scheduler<C> {
    next_order: u64,
    jobs: Vec<(u64, Job<C>)>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self {
            next_order: 0,
            jobs: Vec::new(),
        }
    }

    pub fn add_job(&mut self, job: Job<C>) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        self.jobs.push((order, job));
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Run all jobs for the given frame.
    ///
    /// Total ordering: `(priority, id, insertion_order)`. This stays
    /// deterministic even if callers accidentally register duplicate ids.
    pub fn run_frame(&mut self, frame: Frame, ctx: &mut C) {
        self.jobs.sort_by(|(oa, a), (ob, b)| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.id.cmp(b.id))
                .then_with(|| oa.cmp(ob))
        });

        for (_order, job) in &self.jobs {
            (job.run)(frame, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Scheduler;
    use crate::frame::Frame;
    use crate::job::Job;

    fn push_a(_frame: Frame, log: &mut Vec<&'static str>) {
        log.push("a");
    }

    fn push_b(_frame: Frame, log: &mut Vec<&'static str>) {
        log.push("b");
    }

    #[test]
    fn runs_jobs_in_stable_id_order() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::new("b", push_b));
        sched.add_job(Job::new("a", push_a));

        let mut log = Vec::new();
        sched.run_frame(Frame::new(0, 1.0), &mut log);
        assert_eq!(log, vec!["a", "b"]);
    }

    #[test]
    fn runs_duplicate_ids_in_insertion_order() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::new("spin", push_a));
        sched.add_job(Job::new("spin", push_b));

        let mut log = Vec::new();
        sched.run_frame(Frame::new(0, 1.0), &mut log);
        assert_eq!(log, vec!["a", "b"]);
    }

    #[test]
    fn runs_lower_priority_first() {
        let mut sched = Scheduler::new();
        sched.add_job(Job::with_priority("a", 10, push_a));
        sched.add_job(Job::with_priority("b", -1, push_b));

        let mut log = Vec::new();
        sched.run_frame(Frame::new(0, 1.0), &mut log);
        assert_eq!(log, vec!["b", "a"]);
    }
}
