use uuid::Uuid;

/// Credential as presented by the caller, classified once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    None,
    Bearer(String),
    ApiKey(String),
}

/// The project an API key is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectScope {
    pub project_id: Uuid,
    pub project_name: String,
}

/// Authenticated caller. `scope` is `None` for full-account (bearer) principals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub identity: String,
    pub scope: Option<ProjectScope>,
}

impl Principal {
    pub fn account(identity: String) -> Self {
        Self {
            identity,
            scope: None,
        }
    }

    pub fn scoped(identity: String, scope: ProjectScope) -> Self {
        Self {
            identity,
            scope: Some(scope),
        }
    }

    pub fn is_full_account(&self) -> bool {
        self.scope.is_none()
    }
}
