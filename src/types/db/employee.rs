use sea_orm::entity::prelude::*;

/// Employment state shown to HR; soft delete moves an employee to `Not Working`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EmploymentStatus {
    #[sea_orm(string_value = "Working")]
    #[oai(rename = "Working")]
    Working,
    #[sea_orm(string_value = "Not Working")]
    #[oai(rename = "Not Working")]
    NotWorking,
}

/// Verification state mirrored onto the employee by KYC review
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, poem_openapi::Enum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[oai(rename_all = "snake_case")]
pub enum EmployeeKycStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Always stored upper-cased
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Public code: provisional until KYC approval, permanent afterwards
    #[sea_orm(unique)]
    pub employee_code: String,
    /// Code assigned at creation, kept so older KYC references still resolve
    pub provisional_code: Option<String>,
    /// Free-form role label, mapped onto `UserRole` for the login record
    pub role: String,
    pub department: Option<String>,
    pub designation: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub status: EmploymentStatus,
    pub is_active: bool,
    pub can_access_system: bool,
    pub kyc_status: EmployeeKycStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Model {
    /// Whether this employee may hold an active login
    pub fn has_system_access(&self) -> bool {
        self.is_active && self.can_access_system
    }

    /// Codes under which KYC rows may reference this employee
    pub fn known_codes(&self) -> Vec<String> {
        let mut codes = vec![self.employee_code.clone()];
        if let Some(provisional) = &self.provisional_code {
            if provisional != &self.employee_code {
                codes.push(provisional.clone());
            }
        }
        codes
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
