//! Employee document event handlers.
//!
//! Each handler mutates the employee in place and reports the fields it
//! changed. Saving the employee is left to the caller.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::calculation::today;
use crate::config::{DEFAULT_PROBATION_DAYS, PayrollSettings};
use crate::models::{Employee, EmployeeStatus, LifecycleStatus};
use crate::store::AttachmentStore;

use super::letter::{LetterRenderer, attach_experience_letter};
use super::probation::probation_dates;

/// A single field written by a handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    /// The employee field name.
    pub field: String,
    /// The new value.
    pub value: Value,
}

/// The fields a handler changed, and any problems it tolerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LifecycleUpdate {
    /// Changes in the order they were applied.
    pub changes: Vec<FieldChange>,
    /// Faults that did not abort the save.
    pub warnings: Vec<String>,
}

impl LifecycleUpdate {
    /// Returns true if nothing changed and nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.warnings.is_empty()
    }

    /// Returns true if `field` was changed.
    pub fn changed(&self, field: &str) -> bool {
        self.changes.iter().any(|c| c.field == field)
    }

    fn merge(&mut self, other: LifecycleUpdate) {
        self.changes.extend(other.changes);
        self.warnings.extend(other.warnings);
    }

    fn set<T>(&mut self, field: &str, slot: &mut T, value: T)
    where
        T: Serialize + PartialEq,
    {
        if *slot == value {
            return;
        }
        self.changes.push(FieldChange {
            field: field.to_string(),
            value: serde_json::to_value(&value).unwrap_or_default(),
        });
        *slot = value;
    }
}

/// Everything the handlers need besides the employee itself.
pub struct LifecycleContext<'a, A: ?Sized> {
    /// The date "today" resolves to.
    pub today: NaiveDate,
    /// Probation length in days.
    pub probation_days: u32,
    /// Print format rendered as the experience letter.
    pub print_format: &'a str,
    /// Renderer for the experience letter, if one is configured.
    pub renderer: Option<&'a dyn LetterRenderer>,
    /// Where the experience letter is attached.
    pub attachments: &'a A,
}

impl<'a, A> LifecycleContext<'a, A>
where
    A: AttachmentStore + ?Sized,
{
    /// Builds a context from the payroll settings, dated today, without a renderer.
    ///
    /// A configured probation length of zero falls back to the default.
    pub fn new(settings: &'a PayrollSettings, attachments: &'a A) -> Self {
        let probation_days = match settings.default_probation_days {
            0 => DEFAULT_PROBATION_DAYS,
            days => days,
        };
        Self {
            today: today(),
            probation_days,
            print_format: &settings.experience_letter_print_format,
            renderer: None,
            attachments,
        }
    }

    /// Sets the experience letter renderer.
    pub fn with_renderer(mut self, renderer: Option<&'a dyn LetterRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Overrides the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

fn apply_probation_dates<A>(
    employee: &mut Employee,
    ctx: &LifecycleContext<'_, A>,
    overwrite_confirmation: bool,
) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    let dates = probation_dates(employee.date_of_joining, ctx.probation_days, ctx.today);
    let mut update = LifecycleUpdate::default();

    update.set("probation_start", &mut employee.probation_start, Some(dates.start));
    update.set("probation_end", &mut employee.probation_end, Some(dates.end));
    if overwrite_confirmation || employee.final_confirmation_date.is_none() {
        update.set(
            "final_confirmation_date",
            &mut employee.final_confirmation_date,
            Some(dates.confirmation),
        );
    }
    update
}

/// Populates probation dates on a newly created employee.
///
/// An existing final confirmation date is kept.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::config::PayrollSettings;
/// use hr_payroll_engine::lifecycle::{LifecycleContext, on_employee_after_insert};
/// use hr_payroll_engine::models::Employee;
/// use hr_payroll_engine::store::InMemoryStore;
/// use chrono::NaiveDate;
///
/// let settings = PayrollSettings::default();
/// let store = InMemoryStore::new();
/// let ctx = LifecycleContext::new(&settings, &store);
///
/// let mut employee = Employee::new("EMP-0001");
/// employee.date_of_joining = NaiveDate::from_ymd_opt(2025, 1, 1);
/// let update = on_employee_after_insert(&mut employee, &ctx);
///
/// assert_eq!(update.changes.len(), 3);
/// assert_eq!(employee.final_confirmation_date, NaiveDate::from_ymd_opt(2025, 4, 1));
/// ```
pub fn on_employee_after_insert<A>(
    employee: &mut Employee,
    ctx: &LifecycleContext<'_, A>,
) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    apply_probation_dates(employee, ctx, false)
}

/// Reacts to an employee update.
///
/// Probation dates are recomputed when the joining date changed or any
/// probation field is empty; the confirmation date is only overwritten
/// when the joining date changed. Then the lifecycle status is acted on.
pub fn on_employee_on_update<A>(
    previous: Option<&Employee>,
    employee: &mut Employee,
    ctx: &LifecycleContext<'_, A>,
) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    let joining_changed =
        previous.is_some_and(|prev| prev.date_of_joining != employee.date_of_joining);

    let mut update = LifecycleUpdate::default();
    if joining_changed || employee.probation_incomplete() {
        update.merge(apply_probation_dates(employee, ctx, joining_changed));
    }

    match employee.lifecycle_status {
        Some(LifecycleStatus::Confirmed) => update.merge(handle_confirmed(employee, ctx)),
        Some(LifecycleStatus::Exited) => update.merge(handle_exited(employee, ctx)),
        _ => {}
    }
    update
}

/// Applies lifecycle transitions a workflow may have made without the
/// update hook running.
pub fn on_employee_after_save<A>(
    employee: &mut Employee,
    ctx: &LifecycleContext<'_, A>,
) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    let mut update = LifecycleUpdate::default();

    if employee.lifecycle_status == Some(LifecycleStatus::Confirmed)
        && employee.final_confirmation_date.is_none()
    {
        update.merge(handle_confirmed(employee, ctx));
    }
    if employee.lifecycle_status == Some(LifecycleStatus::Exited)
        && employee.relieving_date.is_none()
    {
        update.merge(handle_exited(employee, ctx));
    }
    update
}

/// Confirms an employee: fills the confirmation date and marks them active.
pub fn handle_confirmed<A>(employee: &mut Employee, ctx: &LifecycleContext<'_, A>) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    let mut update = LifecycleUpdate::default();

    if employee.final_confirmation_date.is_none() {
        update.set(
            "final_confirmation_date",
            &mut employee.final_confirmation_date,
            Some(ctx.today),
        );
    }
    update.set("status", &mut employee.status, EmployeeStatus::Active);

    if !update.is_empty() {
        info!(employee = %employee.id, "Employee confirmed");
    }
    update
}

/// Exits an employee: fills the relieving date, marks them left and
/// attaches the experience letter if none is attached yet.
///
/// Letter faults are logged and reported as warnings.
pub fn handle_exited<A>(employee: &mut Employee, ctx: &LifecycleContext<'_, A>) -> LifecycleUpdate
where
    A: AttachmentStore + ?Sized,
{
    let mut update = LifecycleUpdate::default();

    if employee.relieving_date.is_none() {
        update.set("relieving_date", &mut employee.relieving_date, Some(ctx.today));
    }
    update.set("status", &mut employee.status, EmployeeStatus::Left);

    if employee.experience_letter.is_some() {
        return update;
    }

    let Some(renderer) = ctx.renderer else {
        update.warnings.push(format!(
            "No letter renderer configured; experience letter for {} was not generated",
            employee.id
        ));
        return update;
    };

    match attach_experience_letter(employee, ctx.print_format, renderer, ctx.attachments) {
        Ok(url) => {
            update.set("experience_letter", &mut employee.experience_letter, Some(url));
        }
        Err(err) => {
            error!(
                employee = %employee.id,
                print_format = %ctx.print_format,
                error = %err,
                "Failed to generate experience letter"
            );
            update
                .warnings
                .push(format!("Experience letter was not attached: {}", err));
        }
    }

    info!(employee = %employee.id, "Employee exited");
    update
}
