//! Experience letter generation.

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::AttachmentStore;

/// Doctype attachments for employees are filed under.
pub const EMPLOYEE_DOCTYPE: &str = "Employee";

/// Renders a print format for an employee to PDF bytes.
///
/// The host's print engine implements this; the crate ships no renderer.
pub trait LetterRenderer: Send + Sync {
    /// Renders `print_format` for `employee` and returns the PDF.
    fn render_pdf(&self, print_format: &str, employee: &Employee) -> EngineResult<Vec<u8>>;
}

/// The attachment file name for an employee's experience letter.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::lifecycle::letter_file_name;
///
/// assert_eq!(letter_file_name("EMP-0001"), "Experience Letter - EMP-0001.pdf");
/// ```
pub fn letter_file_name(employee_id: &str) -> String {
    format!("Experience Letter - {}.pdf", employee_id)
}

/// Renders the experience letter and attaches it to the employee.
///
/// Returns the attached file's URL.
///
/// # Errors
///
/// Returns [`EngineError::Rendering`] if the renderer produces no bytes, and
/// passes through any renderer or attachment error.
pub fn attach_experience_letter<A>(
    employee: &Employee,
    print_format: &str,
    renderer: &dyn LetterRenderer,
    attachments: &A,
) -> EngineResult<String>
where
    A: AttachmentStore + ?Sized,
{
    let pdf = renderer.render_pdf(print_format, employee)?;
    if pdf.is_empty() {
        return Err(EngineError::Rendering {
            message: format!("print format '{}' rendered an empty document", print_format),
        });
    }

    let url = attachments.attach_file(
        EMPLOYEE_DOCTYPE,
        &employee.id,
        &letter_file_name(&employee.id),
        pdf,
    )?;
    info!(employee = %employee.id, url = %url, "Attached experience letter");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    struct StaticRenderer(Vec<u8>);

    impl LetterRenderer for StaticRenderer {
        fn render_pdf(&self, _: &str, _: &Employee) -> EngineResult<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_attaches_rendered_letter() {
        let store = InMemoryStore::new();
        let employee = Employee::new("EMP-0001");
        let renderer = StaticRenderer(b"%PDF-1.7".to_vec());

        let url =
            attach_experience_letter(&employee, "Experience Letter", &renderer, &store).unwrap();

        let file = store.attachment(&url).unwrap().unwrap();
        assert_eq!(file.doctype, "Employee");
        assert_eq!(file.file_name, "Experience Letter - EMP-0001.pdf");
        assert_eq!(file.content, b"%PDF-1.7".to_vec());
    }

    #[test]
    fn test_empty_render_is_rejected() {
        let store = InMemoryStore::new();
        let employee = Employee::new("EMP-0001");
        let result =
            attach_experience_letter(&employee, "Experience Letter", &StaticRenderer(vec![]), &store);
        assert!(matches!(result, Err(EngineError::Rendering { .. })));
    }
}
