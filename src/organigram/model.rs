use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Opaque, stable identifier of one organigram member.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "voorzitter")]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The closed set of departments a member can belong to.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Hoofdbestuur,
    Jeugdbestuur,
    General,
}

impl Department {
    pub const ALL: [Department; 3] = [
        Department::Hoofdbestuur,
        Department::Jeugdbestuur,
        Department::General,
    ];

    /// Label as shown on the department tabs.
    pub fn label(&self) -> &'static str {
        match self {
            Department::Hoofdbestuur => "Hoofdbestuur",
            Department::Jeugdbestuur => "Jeugdbestuur",
            Department::General => "Algemeen",
        }
    }
}

/// Department selection driving visibility.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentScope {
    #[default]
    All,
    Hoofdbestuur,
    Jeugdbestuur,
}

impl DepartmentScope {
    /// `All` matches everything; a specific department also admits club-wide
    /// (`general`) members.
    pub fn matches(&self, department: Department) -> bool {
        match self {
            DepartmentScope::All => true,
            DepartmentScope::Hoofdbestuur => {
                matches!(department, Department::Hoofdbestuur | Department::General)
            }
            DepartmentScope::Jeugdbestuur => {
                matches!(department, Department::Jeugdbestuur | Department::General)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepartmentScope::All => "Alle afdelingen",
            DepartmentScope::Hoofdbestuur => Department::Hoofdbestuur.label(),
            DepartmentScope::Jeugdbestuur => Department::Jeugdbestuur.label(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ToSchema)]
pub struct FilterScope {
    pub department: DepartmentScope,
}

impl FilterScope {
    pub fn new(department: DepartmentScope) -> Self {
        Self { department }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// One member or role in the club organization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgNode {
    #[schema(example = "voorzitter")]
    pub id: NodeId,
    /// Empty for vacant positions.
    #[serde(default)]
    #[schema(example = "Jan de Vries")]
    pub name: String,
    #[schema(example = "Voorzitter")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "VZ")]
    pub position_short: Option<String>,
    pub department: Department,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    #[schema(example = "Algemene leiding, contact met de KNVB")]
    pub responsibilities: String,
}

impl OrgNode {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, department: Department) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            title: title.into(),
            position_short: None,
            department,
            parent_id: None,
            email: None,
            phone: None,
            image_url: None,
            responsibilities: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_responsibilities(mut self, responsibilities: impl Into<String>) -> Self {
        self.responsibilities = responsibilities.into();
        self
    }

    /// Human label used in announcements and breadcrumbs: the name, or the
    /// title for vacant positions.
    pub fn label(&self) -> &str {
        if !self.name.trim().is_empty() {
            &self.name
        } else if !self.title.trim().is_empty() {
            &self.title
        } else {
            self.id.as_str()
        }
    }
}
