//! Scaffolding settings carried by each selection

use std::collections::BTreeSet;
use std::fmt;

use anyhow::Result;

use crate::error::ScaffoldError;

/// CRUD endpoints that can be generated for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CrudAction {
    ReadAll,
    ReadByKey,
    Create,
    Update,
    Delete,
}

impl CrudAction {
    pub const ALL: [CrudAction; 5] = [
        CrudAction::ReadAll,
        CrudAction::ReadByKey,
        CrudAction::Create,
        CrudAction::Update,
        CrudAction::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CrudAction::ReadAll => "ReadAll",
            CrudAction::ReadByKey => "ReadByKey",
            CrudAction::Create => "Create",
            CrudAction::Update => "Update",
            CrudAction::Delete => "Delete",
        }
    }

    /// Whether the action needs a primary key to address a single row
    pub fn requires_key(&self) -> bool {
        !matches!(self, CrudAction::ReadAll | CrudAction::Create)
    }
}

impl fmt::Display for CrudAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CrudAction {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "readall" | "getall" => Ok(CrudAction::ReadAll),
            "readbykey" | "get" => Ok(CrudAction::ReadByKey),
            "create" | "post" => Ok(CrudAction::Create),
            "update" | "put" => Ok(CrudAction::Update),
            "delete" => Ok(CrudAction::Delete),
            _ => Err(ScaffoldError::UnknownAction {
                action: s.to_string(),
            }),
        }
    }
}

/// Names of the four audit columns maintained by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntity {
    pub creation_user: String,
    pub creation_date_time: String,
    pub last_update_user: String,
    pub last_update_date_time: String,
}

impl AuditEntity {
    pub fn new(
        creation_user: impl Into<String>,
        creation_date_time: impl Into<String>,
        last_update_user: impl Into<String>,
        last_update_date_time: impl Into<String>,
    ) -> Self {
        Self {
            creation_user: creation_user.into(),
            creation_date_time: creation_date_time.into(),
            last_update_user: last_update_user.into(),
            last_update_date_time: last_update_date_time.into(),
        }
    }

    pub fn columns(&self) -> [&str; 4] {
        [
            self.creation_user.as_str(),
            self.creation_date_time.as_str(),
            self.last_update_user.as_str(),
            self.last_update_date_time.as_str(),
        ]
    }

    /// Every audit column must be named before update exclusion can use it
    pub fn validate(&self, object: &str) -> Result<()> {
        let named = [
            ("CreationUser", &self.creation_user),
            ("CreationDateTime", &self.creation_date_time),
            ("LastUpdateUser", &self.last_update_user),
            ("LastUpdateDateTime", &self.last_update_date_time),
        ];
        for (column, value) in named {
            if value.trim().is_empty() {
                return Err(ScaffoldError::InvalidAuditEntity {
                    object: object.to_string(),
                    column,
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }
}

/// Settings resolved for one database object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Replace files that already exist in the output directory
    pub force_overwrite: bool,
    /// Inject an `ILogger` into generated controllers
    pub use_logger: bool,
    /// Row-version column excluded from requests and updates; empty for none
    pub concurrency_token: String,
    pub audit_entity: Option<AuditEntity>,
    /// Project read-all results into a data contract instead of the entity
    pub entities_with_data_contracts: bool,
    pub actions: BTreeSet<CrudAction>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            force_overwrite: false,
            use_logger: false,
            concurrency_token: String::new(),
            audit_entity: None,
            entities_with_data_contracts: false,
            actions: CrudAction::ALL.into_iter().collect(),
        }
    }
}

impl ProjectSettings {
    /// Snapshot of the inheritable global values; actions start from the defaults
    pub fn inherit(global: &ProjectSettings) -> Self {
        Self {
            force_overwrite: global.force_overwrite,
            use_logger: global.use_logger,
            concurrency_token: global.concurrency_token.clone(),
            audit_entity: global.audit_entity.clone(),
            entities_with_data_contracts: global.entities_with_data_contracts,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self, action: CrudAction) -> bool {
        self.actions.contains(&action)
    }

    pub fn remove_action(&mut self, action: CrudAction) -> &mut Self {
        self.actions.remove(&action);
        self
    }

    pub fn is_concurrency_token(&self, column: &str) -> bool {
        !self.concurrency_token.is_empty() && self.concurrency_token == column
    }
}
