//! Employee lifecycle hooks.
//!
//! Populates probation dates when an employee is created or their joining
//! date changes, and reacts to the `Confirmed` and `Exited` lifecycle
//! transitions. Exiting also produces the experience letter.

mod handlers;
mod letter;
mod probation;

pub use handlers::{
    FieldChange, LifecycleContext, LifecycleUpdate, handle_confirmed, handle_exited,
    on_employee_after_insert, on_employee_after_save, on_employee_on_update,
};
pub use letter::{EMPLOYEE_DOCTYPE, LetterRenderer, attach_experience_letter, letter_file_name};
pub use probation::{ProbationDates, probation_dates};
