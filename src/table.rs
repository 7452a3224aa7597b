//! Defines the `SampleTable` recorded by the samplers and the `Marginal` summaries computed from
//! it.

use crate::util::{GibbsError, Result};
use crate::variable::{Assignment, Value};

use itertools::Itertools;
use ndarray::{Array1, Array2};

use std::fmt;


/// The assignments recorded by a chain, one row per recorded sweep, one column per variable.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleTable {

    /// The variable names, in the network's registration order
    columns: Vec<String>,

    /// Row-major values, each row aligned with `columns`
    rows: Vec<Vec<Value>>

}

impl SampleTable {

    /// Construct an empty `SampleTable` with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        SampleTable { columns, rows: Vec::new() }
    }

    /// Construct an empty `SampleTable` with room for `n_rows` rows
    pub fn with_capacity(columns: Vec<String>, n_rows: usize) -> Self {
        SampleTable { columns, rows: Vec::with_capacity(n_rows) }
    }


    /// Append a row holding the value of every column in `assignment`.
    ///
    /// # Errors
    /// * `GibbsError::MissingValue` if a column is not assigned
    pub fn push(&mut self, assignment: &Assignment) -> Result<()> {
        let row = self.columns
            .iter()
            .map(|c| assignment.get(c).cloned().ok_or_else(|| GibbsError::MissingValue(c.clone())))
            .collect::<Result<Vec<Value>>>()?;

        self.rows.push(row);
        Ok(())
    }


    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_columns())
    }


    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| GibbsError::UnknownVariable(String::from(name)))
    }


    /// The values of one variable, in sweep order
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }


    /// The `i`th recorded assignment
    pub fn row(&self, i: usize) -> Option<Assignment> {
        self.rows.get(i).map(|row| self.columns.iter().cloned().zip_eq(row.iter().cloned()).collect())
    }

    /// All recorded assignments, in sweep order
    pub fn rows(&self) -> impl Iterator<Item = Assignment> + '_ {
        (0..self.n_rows()).filter_map(move |i| self.row(i))
    }


    /// The values of a real-valued variable as an array, in sweep order.
    ///
    /// # Errors
    /// * `GibbsError::UnknownVariable` if `name` is not a column
    /// * `GibbsError::TypeMismatch` if the column holds labels
    pub fn real_column(&self, name: &str) -> Result<Array1<f64>> {
        let values = self.column(name)?
            .map(|v| real_or_mismatch(name, v))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array1::from(values))
    }


    /// The whole table as a `(rows, columns)` array. Every column must be real-valued.
    pub fn to_array(&self) -> Result<Array2<f64>> {
        let values = self.rows
            .iter()
            .flat_map(|row| self.columns.iter().zip_eq(row.iter()))
            .map(|(name, v)| real_or_mismatch(name, v))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Array2::from_shape_vec(self.shape(), values)?)
    }


    /// The sample mean of a real-valued variable, NaN for an empty table
    pub fn mean(&self, name: &str) -> Result<f64> {
        Ok(self.real_column(name)?.mean().unwrap_or(f64::NAN))
    }

    /// The sample variance (ddof = 1) of a real-valued variable, NaN with fewer than two rows
    pub fn variance(&self, name: &str) -> Result<f64> {
        let col = self.real_column(name)?;

        if col.len() < 2 {
            return Ok(f64::NAN);
        }
        Ok(col.var(1.0))
    }


    /// The fraction of rows in which `name` holds `value`
    pub fn frequency(&self, name: &str, value: &Value) -> Result<f64> {
        let hits = self.column(name)?.filter(|v| *v == value).count();
        Ok(hits as f64 / self.n_rows() as f64)
    }
}

fn real_or_mismatch(name: &str, v: &Value) -> Result<f64> {
    v.as_real().ok_or_else(|| GibbsError::TypeMismatch {
        name: String::from(name),
        expected: "real",
        found: v.kind()
    })
}


/// The Monte Carlo estimate of `P(variable = value | evidence)`
#[derive(Clone, Debug, PartialEq)]
pub struct Marginal {
    pub variable: String,
    pub value: Value,
    pub probability: f64
}

impl fmt::Display for Marginal {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}: {}", self.variable, self.value, self.probability)
    }

}
