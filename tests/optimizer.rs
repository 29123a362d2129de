use perishable_inventory::model::demand::InterArrival;
use perishable_inventory::model::purchase_order::{recurring_orders, OrderField, PurchaseOrder};
use perishable_inventory::simulation::config::{OptimizerConfig, RewardUpdate, SimulationConfig};
use perishable_inventory::strategy::implementations::{ConstantReward, StockoutPenalty};
use perishable_inventory::strategy::optimization::{build_action_pool, Direction, Optimizer};
use perishable_inventory::strategy::traits::RewardContext;
use perishable_inventory::{OptimizerError, SimError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn short_shelf() -> SimulationConfig {
    SimulationConfig {
        run_length: 20.0,
        ..SimulationConfig::default()
    }
}

#[test]
fn pool_size_is_four_per_order() {
    for count in [1usize, 2, 5, 13] {
        let orders = recurring_orders(0, 30 * count as u32, 30, 20);
        assert_eq!(orders.len(), count);

        let optimizer = Optimizer::new(OptimizerConfig::default(), orders).unwrap();
        assert_eq!(optimizer.actions().len(), 4 * count);
    }
}

#[test]
fn random_action_sequences_clamp_at_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..50 {
        let mut orders: Vec<PurchaseOrder> = (0..3)
            .map(|_| PurchaseOrder::new(rng.gen_range(0..4), rng.gen_range(0..4)))
            .collect();
        let mut model: Vec<[i64; 2]> = orders
            .iter()
            .map(|o| [i64::from(o.scheduled_day), i64::from(o.quantity)])
            .collect();
        let pool = build_action_pool(orders.len());

        for _ in 0..200 {
            let action = pool[rng.gen_range(0..pool.len())];
            action.apply(&mut orders).unwrap();

            let slot = match action.field {
                OrderField::ScheduledDay => 0,
                OrderField::Quantity => 1,
            };
            let value = &mut model[action.order][slot];
            *value = (*value + action.direction.step()).max(0);
        }

        for (order, expected) in orders.iter().zip(&model) {
            assert_eq!(i64::from(order.scheduled_day), expected[0]);
            assert_eq!(i64::from(order.quantity), expected[1]);
        }
    }
}

/// With no exploration and a flat reward the first choice is locked in.
#[test]
fn pure_exploit_with_constant_reward_repeats_one_action() {
    for update in [RewardUpdate::Absolute, RewardUpdate::Delta] {
        let config = OptimizerConfig {
            epsilon: 0.0,
            reward_update: update,
            shuffle_ties: false,
            ..OptimizerConfig::default()
        };
        let mut optimizer = Optimizer::new(config, recurring_orders(0, 90, 30, 10)).unwrap();
        let reward = ConstantReward(5.0);

        let first = optimizer.step(&short_shelf(), &reward).unwrap().action.target();
        for _ in 0..15 {
            let next = optimizer.step(&short_shelf(), &reward).unwrap();
            assert_eq!(next.action.target(), first, "{update:?}");
        }
        for _ in 0..5 {
            assert_eq!(optimizer.choose_action().unwrap().target(), first, "{update:?}");
        }
    }
}

#[test]
fn poor_rewards_do_not_roll_back_orders() {
    let config = OptimizerConfig {
        epsilon: 0.0,
        reward_update: RewardUpdate::Absolute,
        ..OptimizerConfig::default()
    };
    let mut optimizer = Optimizer::new(config, vec![PurchaseOrder::new(5, 5)]).unwrap();

    // Every run scores below the untried actions, so each step moves on to
    // the next action in the pool while every earlier nudge sticks.
    let expected = [
        ((0, OrderField::ScheduledDay, Direction::Decrease), PurchaseOrder::new(4, 5)),
        ((0, OrderField::ScheduledDay, Direction::Increase), PurchaseOrder::new(5, 5)),
        ((0, OrderField::Quantity, Direction::Decrease), PurchaseOrder::new(5, 4)),
        ((0, OrderField::Quantity, Direction::Increase), PurchaseOrder::new(5, 5)),
    ];
    for (target, order) in expected {
        let outcome = optimizer.step(&short_shelf(), &ConstantReward(-1.0)).unwrap();
        assert_eq!(outcome.action.target(), target);
        assert_eq!(outcome.action.estimated_reward, -1.0);
        assert_eq!(optimizer.orders(), &[order]);
    }
    assert_eq!(optimizer.rewards(), &[-1.0; 4]);
}

#[test]
fn custom_reward_sees_the_mutated_orders() {
    fn total_quantity(ctx: &RewardContext<'_>) -> Result<f64, SimError> {
        Ok(ctx.total_ordered() as f64)
    }

    let config = OptimizerConfig {
        epsilon: 0.0,
        ..OptimizerConfig::default()
    };
    let mut optimizer = Optimizer::new(config, vec![PurchaseOrder::new(0, 3)]).unwrap();

    // Pool position 0 only moves the day, so quantity stays 3.
    let outcome = optimizer.step(&short_shelf(), &total_quantity).unwrap();
    assert_eq!(outcome.reward, 3.0);
}

#[test]
fn stockout_penalty_finds_something_better_than_an_empty_shelf() {
    let config = OptimizerConfig {
        epsilon: 0.2,
        seed: 3,
        ..OptimizerConfig::default()
    };
    let sim = SimulationConfig {
        run_length: 60.0,
        initial_ages: vec![],
        ..SimulationConfig::default()
    };
    let mut optimizer = Optimizer::new(config, vec![PurchaseOrder::new(0, 0)]).unwrap();

    let last = optimizer
        .run(&sim, &StockoutPenalty::default(), 300)
        .unwrap()
        .unwrap();

    // Ordering nothing leaves all 60 days empty: 1000 - 4 * 60 = 760.
    let best = optimizer.rewards().iter().copied().fold(f64::MIN, f64::max);
    assert!(best > 760.0, "best reward {best}");
    assert_eq!(optimizer.rewards().len(), 300);
    assert_eq!(last.iteration, 299);
}

#[test]
fn zero_iterations_returns_nothing() {
    let mut optimizer =
        Optimizer::new(OptimizerConfig::default(), vec![PurchaseOrder::new(1, 1)]).unwrap();
    let result = optimizer.run(&short_shelf(), &ConstantReward(0.0), 0).unwrap();

    assert!(result.is_none());
    assert!(optimizer.rewards().is_empty());
}

#[test]
fn simulation_errors_abort_the_iteration() {
    let sim = SimulationConfig {
        sales: Some(InterArrival::Uniform {
            low: -2.0,
            high: -1.0,
        }),
        ..short_shelf()
    };
    let orders = vec![PurchaseOrder::new(3, 3)];
    let mut optimizer = Optimizer::new(OptimizerConfig::default(), orders.clone()).unwrap();

    for _ in 0..3 {
        let err = optimizer.step(&sim, &ConstantReward(0.0)).unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::Simulation(SimError::NegativeDelay { .. })
        ));
    }
    assert_eq!(optimizer.orders(), orders.as_slice());
    assert!(optimizer.rewards().is_empty());
    assert_eq!(optimizer.iteration(), 0);
}

#[test]
fn failed_reward_leaves_orders_untouched() {
    fn always_fails(_ctx: &RewardContext<'_>) -> Result<f64, SimError> {
        Err(SimError::EmptyHistory)
    }

    let orders = vec![PurchaseOrder::new(3, 3), PurchaseOrder::new(9, 1)];
    let mut optimizer = Optimizer::new(OptimizerConfig::default(), orders.clone()).unwrap();

    let err = optimizer.step(&short_shelf(), &always_fails).unwrap_err();
    assert_eq!(err, OptimizerError::Simulation(SimError::EmptyHistory));
    assert_eq!(optimizer.orders(), orders.as_slice());
    assert_eq!(optimizer.iteration(), 0);

    // The next successful step applies exactly one nudge.
    optimizer.step(&short_shelf(), &ConstantReward(1.0)).unwrap();
    let changed: u32 = optimizer
        .orders()
        .iter()
        .zip(&orders)
        .map(|(now, before)| {
            now.scheduled_day.abs_diff(before.scheduled_day) + now.quantity.abs_diff(before.quantity)
        })
        .sum();
    assert_eq!(changed, 1);
}
