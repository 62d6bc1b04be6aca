#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

use std::collections::HashSet;

use cinch_solver::models::Knapsack;
use cinch_solver::models::Model;
use cinch_solver::models::Queens;
use cinch_solver::models::SendMoreMoney;
use cinch_solver::models::TwoMachineSchedule;
use cinch_solver::models::CAPACITY;
use cinch_solver::models::DURATIONS;
use cinch_solver::models::ITEMS;
use cinch_solver::options::MinimizationStrategy;
use cinch_solver::options::SolverOptions;
use cinch_solver::options::ValueSelection;
use cinch_solver::options::VariableSelection;
use cinch_solver::results::OptimisationDirection;
use cinch_solver::results::OptimisationResult;
use cinch_solver::results::SatisfactionResult;
use cinch_solver::results::Solution;
use cinch_solver::results::Value;
use cinch_solver::search::Goal;
use cinch_solver::termination::Indefinite;
use cinch_solver::variables::TransformableVariable;
use cinch_solver::ConstraintOperationError;
use cinch_solver::Solver;

fn optimal_knapsack_value(options: SolverOptions, goal: impl FnOnce(&Knapsack) -> Goal) -> i32 {
    let mut solver = Solver::with_options(options);
    let knapsack = Knapsack::post(&mut solver, &ITEMS, CAPACITY).expect("valid instance");

    let goal = goal(&knapsack);
    let result = solver
        .optimise(
            goal,
            &mut Indefinite,
            OptimisationDirection::Maximise,
            knapsack.total_value,
        )
        .expect("well-formed search");

    let OptimisationResult::Optimal(solution) = result else {
        panic!("expected an optimal solution, got {result:?}");
    };
    check_knapsack_solution(&knapsack, &solution);

    solution
        .integer_value(knapsack.total_value)
        .expect("the objective is assigned")
}

fn check_knapsack_solution(knapsack: &Knapsack, solution: &Solution) {
    let quantities = knapsack
        .quantities
        .iter()
        .map(|&quantity| solution.integer_value(quantity).expect("assigned"))
        .collect::<Vec<_>>();

    let weight = quantities
        .iter()
        .zip(ITEMS.iter())
        .map(|(quantity, item)| quantity * item.weight)
        .sum::<i32>();
    let value = quantities
        .iter()
        .zip(ITEMS.iter())
        .map(|(quantity, item)| quantity * item.value)
        .sum::<i32>();

    assert!(weight <= CAPACITY);
    assert_eq!(Some(weight), solution.integer_value(knapsack.total_weight));
    assert_eq!(Some(value), solution.integer_value(knapsack.total_value));
}

#[test]
fn send_more_money_has_its_unique_solution() {
    let mut solver = Solver::default();
    let model = SendMoreMoney::post(&mut solver).expect("no root failure");

    let all_solutions = solver
        .find_all_solutions(model.goal(&solver), &mut Indefinite)
        .expect("well-formed search");

    assert!(all_solutions.is_complete);
    assert_eq!(1, all_solutions.solutions.len());

    let solution = &all_solutions.solutions[0];
    assert_eq!(Some(9567), model.word_value("SEND", solution));
    assert_eq!(Some(1085), model.word_value("MORE", solution));
    assert_eq!(Some(10652), model.word_value("MONEY", solution));
}

#[test]
fn send_more_money_can_be_read_by_name() {
    let mut solver = Solver::default();
    let model = SendMoreMoney::post(&mut solver).expect("no root failure");

    let SatisfactionResult::Satisfiable(solution) = solver
        .solve(model.goal(&solver), &mut Indefinite)
        .expect("well-formed search")
    else {
        panic!("the puzzle has a solution");
    };

    assert_eq!(Some(Value::Integer(9)), solution.value_of("S"));
    assert_eq!(Some(Value::Integer(1)), solution.value_of("M"));
    assert_eq!(None, solution.value_of("Z"));
}

#[test]
fn schedule_within_horizon_respects_precedences_and_machines() {
    let mut solver = Solver::default();
    let model = TwoMachineSchedule::post(&mut solver, 10).expect("the horizon is long enough");

    let SatisfactionResult::Satisfiable(solution) = solver
        .solve(model.goal(&solver), &mut Indefinite)
        .expect("well-formed search")
    else {
        panic!("the schedule fits the horizon");
    };

    let times = model.schedule.activity_times(&solution);
    assert_eq!(3, times.len());
    for (scheduled, duration) in times.iter().zip(DURATIONS) {
        assert_eq!(scheduled.start + duration, scheduled.end);
        assert!(scheduled.start >= 0);
        assert!(scheduled.end <= 10);
    }

    // The second activity precedes the first, which precedes the third.
    assert!(times[1].end <= times[0].start);
    assert!(times[0].end <= times[2].start);

    for &machine in &model.machines {
        let usage = model
            .schedule
            .usage_profile(machine, &solution)
            .expect("the machine exists");
        assert!(usage.iter().all(|&used| used <= 1));
    }
}

#[test]
fn schedule_minimises_the_makespan() {
    let mut solver = Solver::default();
    let model = TwoMachineSchedule::post(&mut solver, 10).expect("the horizon is long enough");

    let (direction, objective) = model.objective().expect("the model has an objective");
    let result = solver
        .optimise(model.goal(&solver), &mut Indefinite, direction, objective)
        .expect("well-formed search");

    let OptimisationResult::Optimal(solution) = result else {
        panic!("expected an optimal solution, got {result:?}");
    };
    assert_eq!(Some(9), solution.integer_value(model.makespan));
}

#[test]
fn schedule_shorter_than_the_precedence_chain_is_infeasible() {
    let mut solver = Solver::default();

    let result = TwoMachineSchedule::post(&mut solver, 8);

    assert!(matches!(
        result,
        Err(ConstraintOperationError::InfeasiblePropagator)
    ));
    assert!(solver.is_infeasible());
}

#[test]
fn knapsack_optimum_with_default_search() {
    let value = optimal_knapsack_value(SolverOptions::default(), |knapsack| {
        Goal::generate(knapsack.quantities.iter().copied())
    });

    assert_eq!(33, value);
}

#[test]
fn knapsack_optimum_with_alternative_branching() {
    let value = optimal_knapsack_value(SolverOptions::default(), |knapsack| {
        Goal::generate_with(
            knapsack.quantities.iter().copied(),
            VariableSelection::AntiFirstFail,
            ValueSelection::Max,
        )
    });

    assert_eq!(33, value);
}

#[test]
fn knapsack_optimum_with_fast_minimisation() {
    let options = SolverOptions {
        minimization_strategy: MinimizationStrategy::Fast,
        ..Default::default()
    };
    let value = optimal_knapsack_value(options, |knapsack| {
        Goal::generate(knapsack.quantities.iter().copied())
    });

    assert_eq!(33, value);
}

#[test]
fn knapsack_optimum_by_minimising_the_negated_value() {
    let mut solver = Solver::default();
    let knapsack = Knapsack::post(&mut solver, &ITEMS, CAPACITY).expect("valid instance");

    let goal = Goal::minimize(
        Goal::generate(knapsack.quantities.iter().copied()),
        knapsack.total_value.scaled(-1),
    );
    let SatisfactionResult::Satisfiable(solution) = solver
        .solve(goal, &mut Indefinite)
        .expect("well-formed search")
    else {
        panic!("the knapsack can be packed");
    };

    check_knapsack_solution(&knapsack, &solution);
    assert_eq!(Some(33), solution.integer_value(knapsack.total_value));
    assert_eq!(Some(0), solution.integer_value(knapsack.quantities[0]));
    assert_eq!(Some(2), solution.integer_value(knapsack.quantities[1]));
    assert_eq!(Some(1), solution.integer_value(knapsack.quantities[2]));
}

#[test]
fn queens_solutions_are_distinct_and_attack_free() {
    let mut solver = Solver::default();
    let model = Queens::post(&mut solver, 6).expect("no root failure");

    let all_solutions = solver
        .find_all_solutions(model.goal(&solver), &mut Indefinite)
        .expect("well-formed search");

    assert!(all_solutions.is_complete);
    assert_eq!(4, all_solutions.solutions.len());

    let mut boards = HashSet::new();
    for solution in &all_solutions.solutions {
        let rows = model
            .rows
            .iter()
            .map(|&row| solution.integer_value(row).expect("assigned"))
            .collect::<Vec<_>>();

        for first in 0..rows.len() {
            for second in first + 1..rows.len() {
                let distance = (second - first) as i32;
                assert_ne!(rows[first], rows[second]);
                assert_ne!((rows[first] - rows[second]).abs(), distance);
            }
        }

        assert!(boards.insert(rows));
    }
}

#[test]
fn queens_without_columns_is_rejected() {
    let mut solver = Solver::default();

    let result = Queens::post(&mut solver, 0);

    assert!(matches!(
        result,
        Err(ConstraintOperationError::ContractViolation(_))
    ));
}

#[test]
fn solutions_are_printed_by_the_model() {
    let mut solver = Solver::default();
    let model = Queens::post(&mut solver, 4).expect("no root failure");

    let SatisfactionResult::Satisfiable(solution) = solver
        .solve(model.goal(&solver), &mut Indefinite)
        .expect("well-formed search")
    else {
        panic!("four queens can be placed");
    };

    let mut output = Vec::new();
    model
        .write_solution(&solution, &mut output)
        .expect("writing to a vector succeeds");
    let output = String::from_utf8(output).expect("the board is ascii");

    assert_eq!(4, output.lines().count());
    assert_eq!(4, output.chars().filter(|&c| c == 'Q').count());
}
