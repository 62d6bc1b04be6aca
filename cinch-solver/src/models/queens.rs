use std::io::Write;

use super::Model;
use crate::constraints;
use crate::results::Solution;
use crate::variables::DomainId;
use crate::variables::TransformableVariable;
use crate::ConstraintOperationError;
use crate::ContractViolation;
use crate::Solver;

/// Place `n` queens on an `n` by `n` board such that no two queens attack each other. The
/// variable of column `i` holds the row of the queen in that column.
#[derive(Clone, Debug)]
pub struct Queens {
    pub rows: Box<[DomainId]>,
}

impl Queens {
    pub fn post(solver: &mut Solver, n: u32) -> Result<Queens, ConstraintOperationError> {
        if n == 0 {
            return Err(ContractViolation::InvalidArgument(
                "the board needs at least one column".to_owned(),
            )
            .into());
        }

        let n = n as i32;
        let rows = (0..n)
            .map(|column| solver.new_named_bounded_integer(0, n - 1, format!("q{column}")))
            .collect::<Result<Box<[_]>, _>>()?;

        let diagonals = rows
            .iter()
            .enumerate()
            .map(|(column, row)| row.offset(column as i32))
            .collect::<Vec<_>>();
        let anti_diagonals = rows
            .iter()
            .enumerate()
            .map(|(column, row)| row.offset(-(column as i32)))
            .collect::<Vec<_>>();

        solver
            .add_constraint(constraints::all_different(rows.clone()))
            .post()?;
        solver
            .add_constraint(constraints::all_different(diagonals))
            .post()?;
        solver
            .add_constraint(constraints::all_different(anti_diagonals))
            .post()?;

        Ok(Queens { rows })
    }
}

impl Model for Queens {
    fn write_solution(&self, solution: &Solution, output: &mut dyn Write) -> std::io::Result<()> {
        let n = self.rows.len();
        for row in 0..n {
            let line = self
                .rows
                .iter()
                .map(|&variable| {
                    if solution.integer_value(variable) == Some(row as i32) {
                        'Q'
                    } else {
                        '.'
                    }
                })
                .collect::<String>();
            writeln!(output, "{line}")?;
        }

        Ok(())
    }
}
