//! Binary program construction and solution extraction.

#![expect(
    clippy::float_arithmetic,
    reason = "model coefficients and capacities are real-valued"
)]

use crate::scheduling::{
    domain::{Assignment, CostModel, SchedulingSnapshot, TaskId, WorkerId},
    ports::{OptimizerError, OptimizerResult},
};
use good_lp::{
    Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, microlp, variable,
};
use std::collections::BTreeMap;

/// Decision values above this are read as 1.
const DECISION_THRESHOLD: f64 = 0.5;

/// Slack when deciding whether a task can fit in a worker's free hours.
const FIT_TOLERANCE: f64 = 1e-9;

/// Variables and coefficients of one assignment program.
///
/// `x[w,t]` exists only for pairs where the specializations match and the
/// task fits in the worker's free capacity; every other pair is fixed at
/// zero by omission.
pub(super) struct AssignmentModel<'a> {
    snapshot: &'a SchedulingSnapshot,
    vars: ProblemVariables,
    pairs: BTreeMap<(TaskId, WorkerId), Variable>,
    queue: BTreeMap<TaskId, Variable>,
    objective: Expression,
}

impl<'a> AssignmentModel<'a> {
    pub(super) fn build(snapshot: &'a SchedulingSnapshot, cost_model: &CostModel) -> Self {
        let mut vars = ProblemVariables::new();
        let mut pairs = BTreeMap::new();
        let mut queue = BTreeMap::new();
        let mut objective = Expression::from(0.0);
        let as_of = snapshot.taken_at();

        for (task_id, task) in snapshot.tasks() {
            for (worker_id, worker) in snapshot.workers() {
                let fits = task.duration.value() <= worker.free_capacity().value() + FIT_TOLERANCE;
                if !worker.is_eligible_for(task) || !fits {
                    continue;
                }
                let x = vars.add(variable().binary());
                objective += cost_model.assignment_cost(task, worker, as_of) * x;
                pairs.insert((*task_id, *worker_id), x);
            }

            let parked = vars.add(variable().binary());
            objective += cost_model.queue_penalty() * parked;
            queue.insert(*task_id, parked);
        }

        Self {
            snapshot,
            vars,
            pairs,
            queue,
            objective,
        }
    }

    pub(super) fn has_candidate_pairs(&self) -> bool {
        !self.pairs.is_empty()
    }

    pub(super) fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Solves the program and splits tasks into assignments and queue.
    pub(super) fn solve(self) -> OptimizerResult<(Vec<Assignment>, Vec<TaskId>)> {
        let Self {
            snapshot,
            vars,
            pairs,
            queue,
            objective,
        } = self;

        let mut problem = vars.minimise(objective).using(microlp);

        for (task_id, parked) in &queue {
            let mut placed = Expression::from(0.0);
            for x in pairs_for_task(&pairs, *task_id) {
                placed += x;
            }
            problem.add_constraint(constraint!(placed + *parked == 1.0));
        }

        for (worker_id, worker) in snapshot.workers() {
            let mut load = Expression::from(0.0);
            let mut used = false;
            for ((task_id, candidate), x) in &pairs {
                if candidate != worker_id {
                    continue;
                }
                if let Some(task) = snapshot.tasks().get(task_id) {
                    load += task.duration.value() * *x;
                    used = true;
                }
            }
            if used {
                let free = worker.free_capacity().value();
                problem.add_constraint(constraint!(load <= free));
            }
        }

        let solution = problem
            .solve()
            .map_err(|err| OptimizerError::Solver(err.to_string()))?;

        let mut assignments = Vec::new();
        let mut queued = Vec::new();
        for (task_id, parked) in &queue {
            let chosen = pairs
                .iter()
                .filter(|((candidate, _), _)| candidate == task_id)
                .find(|(_, x)| solution.value(**x) > DECISION_THRESHOLD)
                .map(|((_, worker_id), _)| *worker_id);
            match chosen {
                Some(worker_id) if solution.value(*parked) <= DECISION_THRESHOLD => {
                    assignments.push(Assignment::new(worker_id, *task_id));
                }
                _ => queued.push(*task_id),
            }
        }

        Ok((assignments, queued))
    }
}

fn pairs_for_task(
    pairs: &BTreeMap<(TaskId, WorkerId), Variable>,
    task_id: TaskId,
) -> impl Iterator<Item = Variable> + '_ {
    pairs
        .iter()
        .filter(move |((candidate, _), _)| *candidate == task_id)
        .map(|(_, x)| *x)
}
