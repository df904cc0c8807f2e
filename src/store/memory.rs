//! In-memory document store.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeFilter, InvestmentDeclaration, SalaryComponent};

use super::{AttachmentStore, ComponentStore, DeclarationStore, EmployeeStore};

/// A file attached to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// The kind of document the file belongs to.
    pub doctype: String,
    /// The owning document's name.
    pub owner: String,
    /// The original file name.
    pub file_name: String,
    /// The file bytes.
    pub content: Vec<u8>,
}

#[derive(Debug, Default)]
struct Tables {
    declarations: Vec<InvestmentDeclaration>,
    employees: BTreeMap<String, Employee>,
    components: BTreeMap<String, SalaryComponent>,
    files: HashMap<String, StoredFile>,
}

impl Tables {
    fn conflicting_declaration(&self, candidate: &InvestmentDeclaration) -> Option<&InvestmentDeclaration> {
        self.declarations.iter().find(|d| {
            d.name != candidate.name
                && d.employee == candidate.employee
                && d.fiscal_year == candidate.fiscal_year
        })
    }
}

/// A thread-safe store keeping every table in process memory.
///
/// All reads and writes of one call happen under a single lock, so the
/// declaration uniqueness check and the write it guards are atomic.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::models::Employee;
/// use hr_payroll_engine::store::{EmployeeStore, InMemoryStore};
///
/// let store = InMemoryStore::new();
/// store.save_employee(Employee::new("EMP-0001")).unwrap();
/// assert!(store.get_employee("EMP-0001").unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> EngineResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| EngineError::Storage {
            message: "store lock poisoned".to_string(),
        })
    }

    /// Returns a stored attachment by its file URL.
    pub fn attachment(&self, url: &str) -> EngineResult<Option<StoredFile>> {
        Ok(self.tables()?.files.get(url).cloned())
    }

    /// Returns a component master by name.
    pub fn component(&self, name: &str) -> EngineResult<Option<SalaryComponent>> {
        Ok(self.tables()?.components.get(name).cloned())
    }
}

impl DeclarationStore for InMemoryStore {
    fn find_declarations(
        &self,
        employee: &str,
        fiscal_year: &str,
    ) -> EngineResult<Vec<InvestmentDeclaration>> {
        Ok(self
            .tables()?
            .declarations
            .iter()
            .filter(|d| d.employee == employee && d.fiscal_year == fiscal_year)
            .cloned()
            .collect())
    }

    fn get_declaration(&self, name: &str) -> EngineResult<Option<InvestmentDeclaration>> {
        Ok(self
            .tables()?
            .declarations
            .iter()
            .find(|d| d.name == name)
            .cloned())
    }

    fn insert_declaration(
        &self,
        declaration: InvestmentDeclaration,
    ) -> EngineResult<InvestmentDeclaration> {
        let mut tables = self.tables()?;

        if tables.declarations.iter().any(|d| d.name == declaration.name) {
            return Err(EngineError::Storage {
                message: format!("declaration {} already exists", declaration.name),
            });
        }
        if let Some(existing) = tables.conflicting_declaration(&declaration) {
            return Err(EngineError::DuplicateDeclaration {
                employee: declaration.employee.clone(),
                fiscal_year: declaration.fiscal_year.clone(),
                existing: existing.name.clone(),
            });
        }

        tables.declarations.push(declaration.clone());
        Ok(declaration)
    }

    fn update_declaration(
        &self,
        declaration: InvestmentDeclaration,
    ) -> EngineResult<InvestmentDeclaration> {
        let mut tables = self.tables()?;

        if let Some(existing) = tables.conflicting_declaration(&declaration) {
            return Err(EngineError::DuplicateDeclaration {
                employee: declaration.employee.clone(),
                fiscal_year: declaration.fiscal_year.clone(),
                existing: existing.name.clone(),
            });
        }

        let slot = tables
            .declarations
            .iter_mut()
            .find(|d| d.name == declaration.name)
            .ok_or_else(|| EngineError::NotFound {
                doctype: "Employee Investment Declaration".to_string(),
                name: declaration.name.clone(),
            })?;
        *slot = declaration.clone();
        Ok(declaration)
    }

    fn delete_declaration(&self, name: &str) -> EngineResult<()> {
        let mut tables = self.tables()?;
        let before = tables.declarations.len();
        tables.declarations.retain(|d| d.name != name);
        if tables.declarations.len() == before {
            return Err(EngineError::NotFound {
                doctype: "Employee Investment Declaration".to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl EmployeeStore for InMemoryStore {
    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.tables()?.employees.get(id).cloned())
    }

    fn list_employees(&self, filter: &EmployeeFilter, limit: usize) -> EngineResult<Vec<Employee>> {
        Ok(self
            .tables()?
            .employees
            .values()
            .filter(|e| filter.matches(e))
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_employee(&self, employee: Employee) -> EngineResult<Employee> {
        let mut tables = self.tables()?;
        match tables.employees.entry(employee.id.clone()) {
            Entry::Occupied(_) => Err(EngineError::EmployeeExists { id: employee.id }),
            Entry::Vacant(slot) => {
                slot.insert(employee.clone());
                Ok(employee)
            }
        }
    }

    fn save_employee(&self, employee: Employee) -> EngineResult<Employee> {
        self.tables()?
            .employees
            .insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }
}

impl ComponentStore for InMemoryStore {
    fn component_exists(&self, name: &str) -> EngineResult<bool> {
        Ok(self.tables()?.components.contains_key(name))
    }

    fn insert_component(&self, component: SalaryComponent) -> EngineResult<()> {
        self.tables()?
            .components
            .entry(component.salary_component.clone())
            .or_insert(component);
        Ok(())
    }
}

impl AttachmentStore for InMemoryStore {
    fn attach_file(
        &self,
        doctype: &str,
        owner: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> EngineResult<String> {
        let url = format!("/private/files/{}/{}", Uuid::new_v4(), file_name);
        self.tables()?.files.insert(
            url.clone(),
            StoredFile {
                doctype: doctype.to_string(),
                owner: owner.to_string(),
                file_name: file_name.to_string(),
                content,
            },
        );
        Ok(url)
    }
}
