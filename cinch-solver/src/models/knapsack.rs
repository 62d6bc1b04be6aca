use std::io::Write;

use super::Model;
use crate::constraints;
use crate::constraints::Relation;
use crate::results::OptimisationDirection;
use crate::results::Solution;
use crate::search::Goal;
use crate::variables::DomainId;
use crate::ConstraintOperationError;
use crate::ContractViolation;
use crate::Solver;

/// An item type of the knapsack, of which any number of copies can be packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    pub weight: i32,
    pub value: i32,
}

/// The items of the built-in instance. With a capacity of 25 the optimum is 33: two copies of
/// the second item and one of the third.
pub const ITEMS: [Item; 3] = [
    Item {
        weight: 5,
        value: 6,
    },
    Item {
        weight: 7,
        value: 9,
    },
    Item {
        weight: 11,
        value: 15,
    },
];

pub const CAPACITY: i32 = 25;

/// The unbounded knapsack problem: choose how many copies of every item to pack such that the
/// total weight stays within the capacity and the total value is maximal.
#[derive(Clone, Debug)]
pub struct Knapsack {
    pub quantities: Box<[DomainId]>,
    pub total_value: DomainId,
    pub total_weight: DomainId,
}

impl Knapsack {
    pub fn post(
        solver: &mut Solver,
        items: &[Item],
        capacity: i32,
    ) -> Result<Knapsack, ConstraintOperationError> {
        if capacity < 0 || items.iter().any(|item| item.weight <= 0 || item.value < 0) {
            return Err(ContractViolation::InvalidArgument(
                "weights must be positive, values and the capacity non-negative".to_owned(),
            )
            .into());
        }

        let quantities = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                solver.new_named_bounded_integer(0, capacity / item.weight, format!("item{index}"))
            })
            .collect::<Result<Box<[_]>, _>>()?;

        let max_value = items
            .iter()
            .map(|item| item.value * (capacity / item.weight))
            .sum::<i32>();
        let total_value = solver.new_named_bounded_integer(0, max_value, "value")?;
        let total_weight = solver.new_named_bounded_integer(0, capacity, "weight")?;

        let mut variables = quantities.to_vec();
        variables.push(total_weight);
        let weights = items
            .iter()
            .map(|item| item.weight)
            .chain([-1])
            .collect::<Vec<_>>();
        solver
            .add_constraint(constraints::scalar_product(
                &weights,
                &variables,
                Relation::Equal,
                0,
            )?)
            .post()?;

        let _ = variables.pop();
        variables.push(total_value);
        let values = items
            .iter()
            .map(|item| item.value)
            .chain([-1])
            .collect::<Vec<_>>();
        solver
            .add_constraint(constraints::scalar_product(
                &values,
                &variables,
                Relation::Equal,
                0,
            )?)
            .post()?;

        Ok(Knapsack {
            quantities,
            total_value,
            total_weight,
        })
    }
}

impl Model for Knapsack {
    fn goal(&self, solver: &Solver) -> Goal {
        Goal::generate_with(
            self.quantities.iter().copied(),
            solver.options().default_variable_selection,
            solver.options().default_value_selection,
        )
    }

    fn objective(&self) -> Option<(OptimisationDirection, DomainId)> {
        Some((OptimisationDirection::Maximise, self.total_value))
    }

    fn write_solution(&self, solution: &Solution, output: &mut dyn Write) -> std::io::Result<()> {
        for (index, &quantity) in self.quantities.iter().enumerate() {
            if let Some(quantity) = solution.integer_value(quantity) {
                writeln!(output, "item{index} = {quantity}")?;
            }
        }
        if let Some(weight) = solution.integer_value(self.total_weight) {
            writeln!(output, "weight = {weight}")?;
        }
        if let Some(value) = solution.integer_value(self.total_value) {
            writeln!(output, "value = {value}")?;
        }

        Ok(())
    }
}
