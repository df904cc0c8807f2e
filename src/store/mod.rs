//! Document store interfaces.
//!
//! The engine never talks to a database directly. Each kind of document it
//! reads or writes is reached through one of the traits below, so the host
//! application decides where records live. [`InMemoryStore`] implements every
//! trait and backs the HTTP service and the tests.

mod memory;

pub use memory::{InMemoryStore, StoredFile};

use crate::error::EngineResult;
use crate::models::{Employee, EmployeeFilter, InvestmentDeclaration, SalaryComponent};

/// Persistence for investment declarations.
///
/// Implementations must enforce the (employee, fiscal year) uniqueness
/// invariant atomically in [`insert_declaration`](Self::insert_declaration)
/// and [`update_declaration`](Self::update_declaration), returning
/// [`EngineError::DuplicateDeclaration`](crate::error::EngineError::DuplicateDeclaration)
/// on conflict.
pub trait DeclarationStore: Send + Sync {
    /// Returns every declaration for the pair, in insertion order.
    fn find_declarations(
        &self,
        employee: &str,
        fiscal_year: &str,
    ) -> EngineResult<Vec<InvestmentDeclaration>>;

    /// Looks up a declaration by name.
    fn get_declaration(&self, name: &str) -> EngineResult<Option<InvestmentDeclaration>>;

    /// Persists a new declaration.
    fn insert_declaration(
        &self,
        declaration: InvestmentDeclaration,
    ) -> EngineResult<InvestmentDeclaration>;

    /// Replaces an existing declaration with the same name.
    fn update_declaration(
        &self,
        declaration: InvestmentDeclaration,
    ) -> EngineResult<InvestmentDeclaration>;

    /// Deletes a declaration by name.
    fn delete_declaration(&self, name: &str) -> EngineResult<()>;
}

/// Persistence for employee records.
pub trait EmployeeStore: Send + Sync {
    /// Looks up an employee by id.
    fn get_employee(&self, id: &str) -> EngineResult<Option<Employee>>;

    /// Returns up to `limit` employees matching the filter, ordered by id.
    fn list_employees(&self, filter: &EmployeeFilter, limit: usize) -> EngineResult<Vec<Employee>>;

    /// Stores a new employee.
    ///
    /// Fails with [`EngineError::EmployeeExists`](crate::error::EngineError::EmployeeExists)
    /// if the id is taken; the check and the insert are one operation.
    fn insert_employee(&self, employee: Employee) -> EngineResult<Employee>;

    /// Inserts or replaces an employee record.
    fn save_employee(&self, employee: Employee) -> EngineResult<Employee>;
}

/// Persistence for salary component masters.
pub trait ComponentStore: Send + Sync {
    /// Returns true if a component with this name exists.
    fn component_exists(&self, name: &str) -> EngineResult<bool>;

    /// Creates a component. Creating one that already exists succeeds unchanged.
    fn insert_component(&self, component: SalaryComponent) -> EngineResult<()>;
}

/// File attachments owned by documents.
pub trait AttachmentStore: Send + Sync {
    /// Stores `content` against the owning document and returns its file URL.
    fn attach_file(
        &self,
        doctype: &str,
        owner: &str,
        file_name: &str,
        content: Vec<u8>,
    ) -> EngineResult<String>;
}

/// Every store the engine needs, combined.
pub trait PayrollStore: DeclarationStore + EmployeeStore + ComponentStore + AttachmentStore {}

impl<T> PayrollStore for T where T: DeclarationStore + EmployeeStore + ComponentStore + AttachmentStore
{}
