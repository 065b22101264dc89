//! Lock tests: the per-step sample budget of the low-level search.
//!
//! A counting sampler behind a never-initiable option must be invoked
//! exactly `max_samples_per_step` times per step before the search
//! backtracks, and `max²` times for the second step of a two-step
//! skeleton (the first step is resampled after each second-step exhaust).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tamp_kernel::atoms::{Classifier, GroundAtom, LiftedAtom, Predicate, Variable};
use tamp_kernel::operators::Operator;
use tamp_kernel::options::{OptionValue, ParameterizedOption, Sampler};
use tamp_kernel::state::State;
use tamp_kernel::task::Task;
use tamp_kernel::types::{Object, Type};
use tamp_search::config::PlannerConfig;
use tamp_search::contract::{EnvFailure, OptionModel};
use tamp_search::error::PlanningError;
use tamp_search::heuristic::GoalCountFactory;
use tamp_search::planner::plan;

/// Applies option `set-<idx>` by raising feature `idx` of its object.
struct SetterModel;

impl OptionModel for SetterModel {
    fn next_state(&self, state: &State, option: &OptionValue) -> Result<State, EnvFailure> {
        let mut next = state.clone();
        let idx: usize = option
            .name()
            .strip_prefix("set-")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        if let Some(features) = next.features_mut(&option.objects()[0]) {
            features[idx] = 1.0;
        }
        Ok(next)
    }
}

fn flag_predicate(name: &str, idx: usize, ty: &Arc<Type>) -> Predicate {
    let classifier: Classifier = Arc::new(move |state: &State, objs: &[Object]| {
        state.features(&objs[0]).is_some_and(|f| f[idx] > 0.5)
    });
    Predicate::new(name, vec![ty.clone()], classifier)
}

/// `set-<idx>` operator: `pre` → `post`, counting sampler, configurable
/// initiability.
#[allow(clippy::needless_pass_by_value)]
fn setter_operator(
    idx: usize,
    pre: Option<Predicate>,
    post: Predicate,
    ty: &Arc<Type>,
    initiable: bool,
    counter: Arc<AtomicUsize>,
) -> Arc<Operator> {
    let x = Variable::new("?x", ty);
    let option = ParameterizedOption::new(
        &format!("set-{idx}"),
        vec![ty.clone()],
        Arc::new(move |_, _, _| initiable),
    );
    let sampler: Sampler = Arc::new(move |_, _, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        vec![0.0]
    });
    let preconditions = pre
        .map(|p| BTreeSet::from([LiftedAtom::new(p, vec![x.clone()])]))
        .unwrap_or_default();
    Operator::new(
        &format!("achieve-{idx}"),
        vec![x.clone()],
        preconditions,
        BTreeSet::from([LiftedAtom::new(post, vec![x.clone()])]),
        BTreeSet::new(),
        option,
        &[x],
        sampler,
    )
}

#[test]
fn never_initiable_step_is_sampled_exactly_max_times() {
    lock_tests::init_test_logging();
    let ty = Type::new("item");
    let obj = Object::new("i0", &ty);
    let flag = flag_predicate("Set", 0, &ty);
    let counter = Arc::new(AtomicUsize::new(0));
    let operators = vec![setter_operator(
        0,
        None,
        flag.clone(),
        &ty,
        false,
        counter.clone(),
    )];

    let mut data = BTreeMap::new();
    data.insert(obj.clone(), vec![0.0]);
    let task = Task::new(
        State::new(data),
        BTreeSet::from([GroundAtom::new(flag, vec![obj])]),
    );

    let config = PlannerConfig {
        max_samples_per_step: 5,
        ..PlannerConfig::default()
    };
    let err = plan(
        &task,
        &SetterModel,
        &operators,
        &BTreeSet::new(),
        &GoalCountFactory,
        &config,
        0,
    )
    .unwrap_err();

    // The only goal-reaching skeleton fails, then the frontier is empty.
    assert_eq!(err, PlanningError::SkeletonsExhausted);
    assert_eq!(counter.load(Ordering::SeqCst), 5);
}

#[test]
fn backtracking_resamples_earlier_steps_up_to_their_own_budget() {
    lock_tests::init_test_logging();
    let ty = Type::new("item");
    let obj = Object::new("i0", &ty);
    let step_flag = flag_predicate("Ready", 0, &ty);
    let goal_flag = flag_predicate("Done", 1, &ty);
    let first_counter = Arc::new(AtomicUsize::new(0));
    let second_counter = Arc::new(AtomicUsize::new(0));

    let operators = vec![
        setter_operator(0, None, step_flag.clone(), &ty, true, first_counter.clone()),
        setter_operator(
            1,
            Some(step_flag),
            goal_flag.clone(),
            &ty,
            false,
            second_counter.clone(),
        ),
    ];

    let mut data = BTreeMap::new();
    data.insert(obj.clone(), vec![0.0, 0.0]);
    let task = Task::new(
        State::new(data),
        BTreeSet::from([GroundAtom::new(goal_flag, vec![obj])]),
    );

    // Cap the generator at one candidate so the counters reflect a single
    // two-step refinement attempt.
    let config = PlannerConfig {
        max_samples_per_step: 2,
        max_skeletons_optimized: 1,
        ..PlannerConfig::default()
    };
    let err = plan(
        &task,
        &SetterModel,
        &operators,
        &BTreeSet::new(),
        &GoalCountFactory,
        &config,
        0,
    )
    .unwrap_err();

    assert_eq!(err, PlanningError::SkeletonLimitReached { limit: 1 });
    assert_eq!(
        first_counter.load(Ordering::SeqCst),
        2,
        "first step resampled once per second-step exhaust"
    );
    assert_eq!(
        second_counter.load(Ordering::SeqCst),
        4,
        "second step retried max times per first-step sample"
    );
}
