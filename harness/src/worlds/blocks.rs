//! Blocks world: pick-up and stack over a table of blocks.
//!
//! Block features are `[x, y, held]`; a block is on the table at `y == 0`
//! and sits on another block at the same `x` one level up. The robot has a
//! single `fingers` feature (1 = open hand).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rand::Rng;

use tamp_kernel::atoms::{Classifier, GroundAtom, LiftedAtom, Predicate, Variable};
use tamp_kernel::operators::Operator;
use tamp_kernel::options::{OptionValue, ParameterizedOption, Sampler};
use tamp_kernel::state::State;
use tamp_kernel::task::Task;
use tamp_kernel::types::{Object, Type};
use tamp_search::contract::{EnvFailure, OptionModel};

use crate::contract::PlanningWorld;

pub const FEAT_X: usize = 0;
pub const FEAT_Y: usize = 1;
pub const FEAT_HELD: usize = 2;
pub const FEAT_FINGERS: usize = 0;

const EPS: f64 = 1e-6;

fn feat(state: &State, obj: &Object, idx: usize) -> f64 {
    state.features(obj).map_or(f64::NAN, |f| f[idx])
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

/// Whether some block in `state` sits directly on top of `obj`.
fn covered(state: &State, obj: &Object, block_ty: &Arc<Type>) -> bool {
    state.objects().any(|other| {
        other != obj
            && other.ty().is_subtype_of(block_ty)
            && approx(feat(state, other, FEAT_X), feat(state, obj, FEAT_X))
            && approx(feat(state, other, FEAT_Y), feat(state, obj, FEAT_Y) + 1.0)
            && feat(state, other, FEAT_HELD) < 0.5
    })
}

/// Simulator for pick and stack options. Deterministic; ignores the
/// sampled grasp parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksModel;

impl OptionModel for BlocksModel {
    fn next_state(&self, state: &State, option: &OptionValue) -> Result<State, EnvFailure> {
        let mut next = state.clone();
        match option.name() {
            "pick" => {
                let robot = &option.objects()[0];
                let block = &option.objects()[1];
                if let Some(features) = next.features_mut(block) {
                    features[FEAT_HELD] = 1.0;
                }
                if let Some(features) = next.features_mut(robot) {
                    features[FEAT_FINGERS] = 0.0;
                }
            }
            "stack" => {
                let robot = &option.objects()[0];
                let block = &option.objects()[1];
                let target = &option.objects()[2];
                let target_x = feat(state, target, FEAT_X);
                let target_y = feat(state, target, FEAT_Y);
                if let Some(features) = next.features_mut(block) {
                    features[FEAT_X] = target_x;
                    features[FEAT_Y] = target_y + 1.0;
                    features[FEAT_HELD] = 0.0;
                }
                if let Some(features) = next.features_mut(robot) {
                    features[FEAT_FINGERS] = 1.0;
                }
            }
            _ => {}
        }
        Ok(next)
    }
}

/// The blocks world fixture: `num_blocks` blocks in a row, one robot.
pub struct BlocksWorld {
    num_blocks: usize,
    negate_pick_effect: bool,
    block_ty: Arc<Type>,
    robot_ty: Arc<Type>,
    model: BlocksModel,
}

impl BlocksWorld {
    #[must_use]
    pub fn new(num_blocks: usize) -> Self {
        Self {
            num_blocks,
            negate_pick_effect: false,
            block_ty: Type::new("block"),
            robot_ty: Type::new("robot"),
            model: BlocksModel,
        }
    }

    /// A broken variant: pick-up loses its `Holding` add-effect, so no
    /// stacking goal can ever be reached.
    #[must_use]
    pub fn with_negated_pick_effect(num_blocks: usize) -> Self {
        Self {
            negate_pick_effect: true,
            ..Self::new(num_blocks)
        }
    }

    #[must_use]
    pub fn block(&self, idx: usize) -> Object {
        Object::new(&format!("b{idx}"), &self.block_ty)
    }

    #[must_use]
    pub fn robot(&self) -> Object {
        Object::new("robby", &self.robot_ty)
    }

    #[must_use]
    pub fn on_table(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            approx(feat(state, &objs[0], FEAT_Y), 0.0)
                && feat(state, &objs[0], FEAT_HELD) < 0.5
        });
        Predicate::new("OnTable", vec![self.block_ty.clone()], classifier)
    }

    #[must_use]
    pub fn on(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            feat(state, &objs[0], FEAT_HELD) < 0.5
                && approx(feat(state, &objs[0], FEAT_X), feat(state, &objs[1], FEAT_X))
                && approx(
                    feat(state, &objs[0], FEAT_Y),
                    feat(state, &objs[1], FEAT_Y) + 1.0,
                )
        });
        Predicate::new(
            "On",
            vec![self.block_ty.clone(), self.block_ty.clone()],
            classifier,
        )
    }

    #[must_use]
    pub fn clear(&self) -> Predicate {
        let block_ty = self.block_ty.clone();
        let classifier: Classifier = Arc::new(move |state: &State, objs: &[Object]| {
            feat(state, &objs[0], FEAT_HELD) < 0.5 && !covered(state, &objs[0], &block_ty)
        });
        Predicate::new("Clear", vec![self.block_ty.clone()], classifier)
    }

    #[must_use]
    pub fn holding(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            feat(state, &objs[0], FEAT_HELD) > 0.5
        });
        Predicate::new("Holding", vec![self.block_ty.clone()], classifier)
    }

    #[must_use]
    pub fn hand_empty(&self) -> Predicate {
        let classifier: Classifier = Arc::new(|state: &State, objs: &[Object]| {
            feat(state, &objs[0], FEAT_FINGERS) > 0.5
        });
        Predicate::new("HandEmpty", vec![self.robot_ty.clone()], classifier)
    }

    fn pick_up_operator(&self) -> Arc<Operator> {
        let r = Variable::new("?r", &self.robot_ty);
        let b = Variable::new("?b", &self.block_ty);
        let option = ParameterizedOption::new(
            "pick",
            vec![self.robot_ty.clone(), self.block_ty.clone()],
            // Pick needs an open hand.
            Arc::new(|state: &State, objs: &[Object], _params: &[f64]| {
                feat(state, &objs[0], FEAT_FINGERS) > 0.5
            }),
        );
        let sampler: Sampler = Arc::new(|_, _, rng, _| vec![rng.gen::<f64>()]);
        let add_effects = if self.negate_pick_effect {
            BTreeSet::new()
        } else {
            BTreeSet::from([LiftedAtom::new(self.holding(), vec![b.clone()])])
        };
        Operator::new(
            "pick-up",
            vec![r.clone(), b.clone()],
            BTreeSet::from([
                LiftedAtom::new(self.hand_empty(), vec![r.clone()]),
                LiftedAtom::new(self.clear(), vec![b.clone()]),
                LiftedAtom::new(self.on_table(), vec![b.clone()]),
            ]),
            add_effects,
            BTreeSet::from([
                LiftedAtom::new(self.hand_empty(), vec![r.clone()]),
                LiftedAtom::new(self.clear(), vec![b.clone()]),
                LiftedAtom::new(self.on_table(), vec![b.clone()]),
            ]),
            option,
            &[r, b],
            sampler,
        )
    }

    fn stack_operator(&self) -> Arc<Operator> {
        let r = Variable::new("?r", &self.robot_ty);
        let b = Variable::new("?b", &self.block_ty);
        let t = Variable::new("?t", &self.block_ty);
        let option = ParameterizedOption::new(
            "stack",
            vec![
                self.robot_ty.clone(),
                self.block_ty.clone(),
                self.block_ty.clone(),
            ],
            // Stack needs the block in hand.
            Arc::new(|state: &State, objs: &[Object], _params: &[f64]| {
                feat(state, &objs[1], FEAT_HELD) > 0.5
            }),
        );
        let sampler: Sampler = Arc::new(|_, _, rng, _| vec![rng.gen::<f64>()]);
        Operator::new(
            "stack",
            vec![r.clone(), b.clone(), t.clone()],
            BTreeSet::from([
                LiftedAtom::new(self.holding(), vec![b.clone()]),
                LiftedAtom::new(self.clear(), vec![t.clone()]),
            ]),
            BTreeSet::from([
                LiftedAtom::new(self.on(), vec![b.clone(), t.clone()]),
                LiftedAtom::new(self.clear(), vec![b.clone()]),
                LiftedAtom::new(self.hand_empty(), vec![r.clone()]),
            ]),
            BTreeSet::from([
                LiftedAtom::new(self.holding(), vec![b.clone()]),
                LiftedAtom::new(self.clear(), vec![t.clone()]),
            ]),
            option,
            &[r, b, t],
            sampler,
        )
    }

    /// The task of stacking `b0` onto `b1`, all blocks starting on the
    /// table with the hand empty. Solvable in exactly two steps.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stacking_task(&self) -> Task {
        let mut data = BTreeMap::new();
        for idx in 0..self.num_blocks {
            data.insert(self.block(idx), vec![idx as f64, 0.0, 0.0]);
        }
        data.insert(self.robot(), vec![1.0]);
        let init = State::new(data);
        let goal = BTreeSet::from([GroundAtom::new(
            self.on(),
            vec![self.block(0), self.block(1)],
        )]);
        Task::new(init, goal)
    }
}

impl PlanningWorld for BlocksWorld {
    fn world_id(&self) -> &str {
        "blocks"
    }

    fn operators(&self) -> Vec<Arc<Operator>> {
        vec![self.pick_up_operator(), self.stack_operator()]
    }

    fn predicates(&self) -> BTreeSet<Predicate> {
        BTreeSet::from([
            self.on_table(),
            self.on(),
            self.clear(),
            self.holding(),
            self.hand_empty(),
        ])
    }

    fn task(&self) -> Task {
        self.stacking_task()
    }

    fn model(&self) -> &dyn OptionModel {
        &self.model
    }
}
