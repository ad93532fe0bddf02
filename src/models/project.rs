use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ModelError;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Project {
    pub id: i32,
    pub user_id: i32,
    pub client_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub hourly_rate: Option<Decimal>,
}

impl Project {
    pub fn status(&self) -> Option<ProjectStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on_hold",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "on_hold" => Ok(ProjectStatus::OnHold),
            other => Err(ModelError::UnknownProjectStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_round_trips() {
        for status in [ProjectStatus::Active, ProjectStatus::Completed, ProjectStatus::OnHold] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert_eq!(
            "archived".parse::<ProjectStatus>(),
            Err(ModelError::UnknownProjectStatus("archived".into()))
        );
    }
}
