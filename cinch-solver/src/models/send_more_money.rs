use std::io::Write;

use super::Model;
use crate::constraints;
use crate::constraints::Relation;
use crate::results::Solution;
use crate::variables::DomainId;
use crate::ConstraintOperationError;
use crate::Solver;

/// The letters of the puzzle, in the order in which they are stored.
pub const LETTERS: [char; 8] = ['S', 'E', 'N', 'D', 'M', 'O', 'R', 'Y'];

/// The cryptarithm `SEND + MORE = MONEY`, where every letter is a different digit and the
/// leading digits are not zero.
#[derive(Clone, Debug)]
pub struct SendMoreMoney {
    /// One variable per letter of [`LETTERS`].
    pub letters: Box<[DomainId]>,
}

impl SendMoreMoney {
    pub fn post(solver: &mut Solver) -> Result<SendMoreMoney, ConstraintOperationError> {
        let letters = LETTERS
            .iter()
            .map(|&letter| {
                let lower_bound = if letter == 'S' || letter == 'M' { 1 } else { 0 };
                solver.new_named_bounded_integer(lower_bound, 9, letter.to_string())
            })
            .collect::<Result<Box<[_]>, _>>()?;

        solver
            .add_constraint(constraints::all_different(letters.to_vec()))
            .post()?;

        // 1000 S + 100 E + 10 N + D + 1000 M + 100 O + 10 R + E = 10000 M + 1000 O + 100 N + 10 E + Y
        let coefficients = [1000, 91, -90, 1, -9000, -900, 10, -1];
        solver
            .add_constraint(constraints::scalar_product(
                &coefficients,
                &letters,
                Relation::Equal,
                0,
            )?)
            .post()?;

        Ok(SendMoreMoney { letters })
    }

    /// The value of `word` in `solution`, if all of its letters are assigned.
    pub fn word_value(&self, word: &str, solution: &Solution) -> Option<i32> {
        word.chars().try_fold(0, |value, letter| {
            let index = LETTERS.iter().position(|&candidate| candidate == letter)?;
            Some(value * 10 + solution.integer_value(self.letters[index])?)
        })
    }
}

impl Model for SendMoreMoney {
    fn write_solution(&self, solution: &Solution, output: &mut dyn Write) -> std::io::Result<()> {
        for word in ["SEND", "MORE", "MONEY"] {
            match self.word_value(word, solution) {
                Some(value) => writeln!(output, "{word} = {value}")?,
                None => writeln!(output, "{word} is not assigned")?,
            }
        }

        Ok(())
    }
}
