//! Employee model and related types.
//!
//! This module defines the Employee struct together with the lifecycle and
//! HR status enums that the lifecycle handlers drive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TaxRegime;

/// Where an employee is in their onboarding/offboarding lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleStatus {
    /// Serving the probation period.
    Probation,
    /// Probation completed and employment confirmed.
    Confirmed,
    /// The employee has left the organisation.
    Exited,
}

/// The HR status of the employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    /// Currently employed.
    #[default]
    Active,
    /// Temporarily inactive.
    Inactive,
    /// Suspended pending review.
    Suspended,
    /// No longer employed.
    Left,
}

/// Represents an employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g., "EMP-0001").
    pub id: String,
    /// The employee's full name.
    #[serde(default)]
    pub employee_name: Option<String>,
    /// The company the employee works for.
    #[serde(default)]
    pub company: Option<String>,
    /// The department the employee belongs to.
    #[serde(default)]
    pub department: Option<String>,
    /// The date the employee joined.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// First day of probation.
    #[serde(default)]
    pub probation_start: Option<NaiveDate>,
    /// Last day of probation (inclusive).
    #[serde(default)]
    pub probation_end: Option<NaiveDate>,
    /// The date employment was (or will be) confirmed.
    #[serde(default)]
    pub final_confirmation_date: Option<NaiveDate>,
    /// The employee's last working day.
    #[serde(default)]
    pub relieving_date: Option<NaiveDate>,
    /// Lifecycle stage; drives the confirmation and exit handlers.
    #[serde(default)]
    pub lifecycle_status: Option<LifecycleStatus>,
    /// HR status.
    #[serde(default)]
    pub status: EmployeeStatus,
    /// The tax regime the employee prefers for payroll.
    #[serde(default)]
    pub tax_regime_preference: TaxRegime,
    /// URL of the attached experience letter, once generated.
    #[serde(default)]
    pub experience_letter: Option<String>,
}

impl Employee {
    /// Creates an active employee with only an id; every other field is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_payroll_engine::models::{Employee, EmployeeStatus, TaxRegime};
    ///
    /// let employee = Employee::new("EMP-0001");
    /// assert_eq!(employee.status, EmployeeStatus::Active);
    /// assert_eq!(employee.tax_regime_preference, TaxRegime::Old);
    /// assert!(employee.date_of_joining.is_none());
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            employee_name: None,
            company: None,
            department: None,
            date_of_joining: None,
            probation_start: None,
            probation_end: None,
            final_confirmation_date: None,
            relieving_date: None,
            lifecycle_status: None,
            status: EmployeeStatus::Active,
            tax_regime_preference: TaxRegime::Old,
            experience_letter: None,
        }
    }

    /// Returns true when any of the probation start, probation end or
    /// confirmation date fields is empty.
    pub fn probation_incomplete(&self) -> bool {
        self.probation_start.is_none()
            || self.probation_end.is_none()
            || self.final_confirmation_date.is_none()
    }
}

/// Narrows the employee list for reports.
///
/// Every populated field must match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Only employees of this company.
    #[serde(default)]
    pub company: Option<String>,
    /// Only the employee with this id.
    #[serde(default)]
    pub employee: Option<String>,
    /// Only employees of this department.
    #[serde(default)]
    pub department: Option<String>,
}

impl EmployeeFilter {
    /// Returns true if the employee satisfies every populated filter.
    pub fn matches(&self, employee: &Employee) -> bool {
        fn field_matches(filter: &Option<String>, value: Option<&str>) -> bool {
            match filter.as_deref() {
                None | Some("") => true,
                Some(wanted) => value == Some(wanted),
            }
        }

        field_matches(&self.company, employee.company.as_deref())
            && field_matches(&self.employee, Some(employee.id.as_str()))
            && field_matches(&self.department, employee.department.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee() -> Employee {
        let mut employee = Employee::new("EMP-0001");
        employee.employee_name = Some("Asha Rao".to_string());
        employee.company = Some("Girman Tech".to_string());
        employee.department = Some("Engineering".to_string());
        employee.date_of_joining = NaiveDate::from_ymd_opt(2025, 6, 2);
        employee
    }

    #[test]
    fn test_deserialize_minimal_employee() {
        let json = r#"{"id": "EMP-0002"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "EMP-0002");
        assert_eq!(employee.status, EmployeeStatus::Active);
        assert_eq!(employee.tax_regime_preference, TaxRegime::Old);
        assert!(employee.lifecycle_status.is_none());
    }

    #[test]
    fn test_deserialize_exited_employee() {
        let json = r#"{
            "id": "EMP-0003",
            "date_of_joining": "2024-01-15",
            "lifecycle_status": "Exited",
            "status": "Active",
            "tax_regime_preference": "New Regime"
        }"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.lifecycle_status, Some(LifecycleStatus::Exited));
        assert_eq!(employee.tax_regime_preference, TaxRegime::New);
        assert_eq!(
            employee.date_of_joining,
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
    }

    #[test]
    fn test_probation_incomplete_when_any_field_missing() {
        let mut employee = create_test_employee();
        assert!(employee.probation_incomplete());

        employee.probation_start = NaiveDate::from_ymd_opt(2025, 6, 2);
        employee.probation_end = NaiveDate::from_ymd_opt(2025, 8, 30);
        assert!(employee.probation_incomplete());

        employee.final_confirmation_date = NaiveDate::from_ymd_opt(2025, 8, 31);
        assert!(!employee.probation_incomplete());
    }

    #[test]
    fn test_filter_matches_populated_fields_only() {
        let employee = create_test_employee();

        assert!(EmployeeFilter::default().matches(&employee));

        let by_company = EmployeeFilter {
            company: Some("Girman Tech".to_string()),
            ..Default::default()
        };
        assert!(by_company.matches(&employee));

        let other_department = EmployeeFilter {
            department: Some("Finance".to_string()),
            ..Default::default()
        };
        assert!(!other_department.matches(&employee));
    }

    #[test]
    fn test_filter_ignores_empty_strings() {
        let employee = create_test_employee();
        let filter = EmployeeFilter {
            company: Some(String::new()),
            employee: Some(String::new()),
            department: None,
        };
        assert!(filter.matches(&employee));
    }

    #[test]
    fn test_filter_by_employee_id() {
        let employee = create_test_employee();
        let filter = EmployeeFilter {
            employee: Some("EMP-9999".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&employee));
    }
}
