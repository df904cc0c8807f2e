//! Document validation hooks.
//!
//! Investment declarations are checked before they are stored, and salary
//! structure assignments are checked against the tax regime mapping.

mod declaration;
mod structure_assignment;

pub use declaration::{
    ValidatedDeclaration, create_declaration, parse_amount, update_declaration,
    validate_declaration,
};
pub use structure_assignment::{
    structures_for_employee, structures_for_regime, validate_salary_structure_assignment,
};
