//! Cluttered table: a blocks variant whose simulator reports structural
//! failures.
//!
//! Picking a block while the obstacle is still on the table sweeps the
//! gripper through it — the simulator refuses and names the obstacle. A
//! `clear-path` operator exists that mentions the obstacle, so a recovery
//! pass can route plans through it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tamp_kernel::atoms::{Classifier, GroundAtom, LiftedAtom, Predicate, Variable};
use tamp_kernel::operators::Operator;
use tamp_kernel::options::{OptionValue, ParameterizedOption, Sampler};
use tamp_kernel::state::State;
use tamp_kernel::task::Task;
use tamp_kernel::types::{Object, Type};
use tamp_search::contract::{EnvFailure, OptionModel};

use crate::contract::PlanningWorld;
use crate::worlds::blocks::{FEAT_FINGERS, FEAT_HELD};

/// Obstacle feature: 1.0 while it blocks the path.
pub const FEAT_PRESENT: usize = 0;

/// Simulator that fails picks while the obstacle is present.
pub struct ClutteredModel {
    obstacle_ty: Arc<Type>,
    blocked_pick_attempts: AtomicU64,
}

impl ClutteredModel {
    fn new(obstacle_ty: Arc<Type>) -> Self {
        Self {
            obstacle_ty,
            blocked_pick_attempts: AtomicU64::new(0),
        }
    }

    fn present_obstacles(&self, state: &State) -> BTreeSet<Object> {
        state
            .objects()
            .filter(|obj| {
                obj.ty().is_subtype_of(&self.obstacle_ty)
                    && state
                        .features(obj)
                        .is_some_and(|f| f[FEAT_PRESENT] > 0.5)
            })
            .cloned()
            .collect()
    }

    /// How many pick transitions were refused because of the obstacle.
    #[must_use]
    pub fn blocked_pick_attempts(&self) -> u64 {
        self.blocked_pick_attempts.load(Ordering::SeqCst)
    }
}

impl OptionModel for ClutteredModel {
    fn next_state(&self, state: &State, option: &OptionValue) -> Result<State, EnvFailure> {
        let mut next = state.clone();
        match option.name() {
            "pick" => {
                let obstacles = self.present_obstacles(state);
                if !obstacles.is_empty() {
                    self.blocked_pick_attempts.fetch_add(1, Ordering::SeqCst);
                    return Err(EnvFailure::new(obstacles));
                }
                let robot = &option.objects()[0];
                let block = &option.objects()[1];
                if let Some(features) = next.features_mut(block) {
                    features[FEAT_HELD] = 1.0;
                }
                if let Some(features) = next.features_mut(robot) {
                    features[FEAT_FINGERS] = 0.0;
                }
            }
            "sweep" => {
                let obstacle = &option.objects()[1];
                if let Some(features) = next.features_mut(obstacle) {
                    features[FEAT_PRESENT] = 0.0;
                }
            }
            _ => {}
        }
        Ok(next)
    }
}

/// One block, one obstacle, one robot; the goal is to hold the block.
pub struct ClutteredWorld {
    block_ty: Arc<Type>,
    robot_ty: Arc<Type>,
    obstacle_ty: Arc<Type>,
    model: ClutteredModel,
}

impl Default for ClutteredWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ClutteredWorld {
    #[must_use]
    pub fn new() -> Self {
        let obstacle_ty = Type::new("obstacle");
        Self {
            block_ty: Type::new("block"),
            robot_ty: Type::new("robot"),
            model: ClutteredModel::new(obstacle_ty.clone()),
            obstacle_ty,
        }
    }

    #[must_use]
    pub fn block(&self) -> Object {
        Object::new("b0", &self.block_ty)
    }

    #[must_use]
    pub fn robot(&self) -> Object {
        Object::new("robby", &self.robot_ty)
    }

    #[must_use]
    pub fn obstacle(&self) -> Object {
        Object::new("ob", &self.obstacle_ty)
    }

    #[must_use]
    pub fn holding(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            state
                .features(&objs[0])
                .is_some_and(|f| f[FEAT_HELD] > 0.5)
        });
        Predicate::new("Holding", vec![self.block_ty.clone()], classifier)
    }

    #[must_use]
    pub fn on_table(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            state
                .features(&objs[0])
                .is_some_and(|f| f[FEAT_HELD] < 0.5)
        });
        Predicate::new("OnTable", vec![self.block_ty.clone()], classifier)
    }

    #[must_use]
    pub fn hand_empty(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            state
                .features(&objs[0])
                .is_some_and(|f| f[FEAT_FINGERS] > 0.5)
        });
        Predicate::new("HandEmpty", vec![self.robot_ty.clone()], classifier)
    }

    #[must_use]
    pub fn removed(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            state
                .features(&objs[0])
                .is_some_and(|f| f[FEAT_PRESENT] < 0.5)
        });
        Predicate::new("Removed", vec![self.obstacle_ty.clone()], classifier)
    }

    fn pick_up_operator(&self) -> Arc<Operator> {
        let r = Variable::new("?r", &self.robot_ty);
        let b = Variable::new("?b", &self.block_ty);
        let option = ParameterizedOption::new(
            "pick",
            vec![self.robot_ty.clone(), self.block_ty.clone()],
            Arc::new(|_, _, _| true),
        );
        let sampler: Sampler = Arc::new(|_, _, _, _| vec![0.0]);
        Operator::new(
            "pick-up",
            vec![r.clone(), b.clone()],
            BTreeSet::from([
                LiftedAtom::new(self.hand_empty(), vec![r.clone()]),
                LiftedAtom::new(self.on_table(), vec![b.clone()]),
            ]),
            BTreeSet::from([LiftedAtom::new(self.holding(), vec![b.clone()])]),
            BTreeSet::from([
                LiftedAtom::new(self.hand_empty(), vec![r.clone()]),
                LiftedAtom::new(self.on_table(), vec![b.clone()]),
            ]),
            option,
            &[r, b],
            sampler,
        )
    }

    fn clear_path_operator(&self) -> Arc<Operator> {
        let r = Variable::new("?r", &self.robot_ty);
        let o = Variable::new("?o", &self.obstacle_ty);
        let option = ParameterizedOption::new(
            "sweep",
            vec![self.robot_ty.clone(), self.obstacle_ty.clone()],
            Arc::new(|_, _, _| true),
        );
        let sampler: Sampler = Arc::new(|_, _, _, _| vec![0.0]);
        Operator::new(
            "clear-path",
            vec![r.clone(), o.clone()],
            BTreeSet::new(),
            BTreeSet::from([LiftedAtom::new(self.removed(), vec![o.clone()])]),
            BTreeSet::new(),
            option,
            &[r, o],
            sampler,
        )
    }

    /// Blocked pick attempts observed by the simulator.
    #[must_use]
    pub fn blocked_pick_attempts(&self) -> u64 {
        self.model.blocked_pick_attempts()
    }
}

impl PlanningWorld for ClutteredWorld {
    fn world_id(&self) -> &str {
        "cluttered"
    }

    fn operators(&self) -> Vec<Arc<Operator>> {
        vec![self.pick_up_operator(), self.clear_path_operator()]
    }

    fn predicates(&self) -> BTreeSet<Predicate> {
        BTreeSet::from([
            self.holding(),
            self.on_table(),
            self.hand_empty(),
            self.removed(),
        ])
    }

    fn task(&self) -> Task {
        let mut data = BTreeMap::new();
        // Block features reuse the blocks layout [x, y, held].
        data.insert(self.block(), vec![0.0, 0.0, 0.0]);
        data.insert(self.robot(), vec![1.0]);
        data.insert(self.obstacle(), vec![1.0]);
        let init = State::new(data);
        let goal = BTreeSet::from([GroundAtom::new(self.holding(), vec![self.block()])]);
        Task::new(init, goal)
    }

    fn model(&self) -> &dyn OptionModel {
        &self.model
    }
}
