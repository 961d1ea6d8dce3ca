use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Staff profile linked 1:1 to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "e1",
        "employeeId": "EMP-001",
        "firstName": "John",
        "lastName": "Doe",
        "phone": "+8801712345678",
        "department": "Engineering",
        "position": "Developer",
        "avatar": null
    })
)]
pub struct Employee {
    pub id: String,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[serde(default)]
    #[schema(nullable = true)]
    pub phone: Option<String>,

    #[serde(default)]
    #[schema(nullable = true)]
    pub department: Option<String>,

    #[serde(default)]
    #[schema(nullable = true)]
    pub position: Option<String>,

    #[serde(default)]
    #[schema(nullable = true)]
    pub avatar: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}
