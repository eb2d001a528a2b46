use serde::Serialize;

/// How an employee was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, poem_openapi::Enum)]
#[serde(rename_all = "snake_case")]
#[oai(rename_all = "snake_case")]
pub enum DeletionType {
    Soft,
    Permanent,
}

/// Cascade step names, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionStep {
    KycSubmissions,
    Attendance,
    Leaves,
    Payslips,
    AccessLogs,
    User,
    Employee,
}

impl DeletionStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KycSubmissions => "kyc_submissions",
            Self::Attendance => "attendance",
            Self::Leaves => "leaves",
            Self::Payslips => "payslips",
            Self::AccessLogs => "access_logs",
            Self::User => "user",
            Self::Employee => "employee",
        }
    }
}

/// A step (or part of one) that failed without stopping the cascade
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailure {
    pub step: DeletionStep,
    pub error: String,
}

/// Result of removing files from disk
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileRemovalSummary {
    pub removed: usize,
    /// Already gone; counted but not a failure
    pub missing: usize,
    pub failed: Vec<(String, String)>,
}

impl FileRemovalSummary {
    pub fn merge(&mut self, other: FileRemovalSummary) {
        self.removed += other.removed;
        self.missing += other.missing;
        self.failed.extend(other.failed);
    }
}

/// Per-category accumulator for a hard delete
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeletionSummary {
    pub kyc_submissions: u64,
    pub attendance: u64,
    pub leaves: u64,
    pub payslips: u64,
    pub access_logs: u64,
    pub users: u64,
    pub employees: u64,
    pub files: FileRemovalSummary,
    pub failures: Vec<StepFailure>,
}

impl DeletionSummary {
    pub fn record_failure(&mut self, step: DeletionStep, error: impl ToString) {
        let error = error.to_string();
        tracing::warn!("Deletion step {} failed: {}", step.as_str(), error);
        self.failures.push(StepFailure { step, error });
    }

    /// Add `n` removed rows to the counter for `step`
    pub fn add_count(&mut self, step: DeletionStep, n: u64) {
        let counter = match step {
            DeletionStep::KycSubmissions => &mut self.kyc_submissions,
            DeletionStep::Attendance => &mut self.attendance,
            DeletionStep::Leaves => &mut self.leaves,
            DeletionStep::Payslips => &mut self.payslips,
            DeletionStep::AccessLogs => &mut self.access_logs,
            DeletionStep::User => &mut self.users,
            DeletionStep::Employee => &mut self.employees,
        };
        *counter += n;
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.files.failed.is_empty()
    }
}

/// Outcome of `delete_employee`
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionOutcome {
    pub deletion_type: DeletionType,
    pub employee_id: i32,
    pub employee_code: String,
    /// Only populated for permanent deletes
    pub summary: Option<DeletionSummary>,
}
