//! Check that the host holds every planned account with its planned roles

use crate::account::RoleBinding;
use crate::plan::SeedPlan;
use crate::shell::{AdminShell, ShellError};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Missing {
        username: String,
        database: String,
    },
    Roles {
        username: String,
        database: String,
        expected: Vec<RoleBinding>,
        actual: Vec<RoleBinding>,
    },
}

fn join_roles(roles: &[RoleBinding]) -> String {
    roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { username, database } => {
                write!(f, "{}@{} is missing", username, database)
            }
            Self::Roles {
                username,
                database,
                expected,
                actual,
            } => write!(
                f,
                "{}@{} has roles [{}], expected [{}]",
                username,
                database,
                join_roles(actual),
                join_roles(expected)
            ),
        }
    }
}

fn sorted(roles: &[RoleBinding]) -> Vec<RoleBinding> {
    let mut roles = roles.to_vec();
    roles.sort();
    roles
}

/// Compare the host's accounts against `plan`. Role order is ignored.
pub async fn verify_plan<S: AdminShell + ?Sized>(
    shell: &S,
    plan: &SeedPlan,
) -> Result<Vec<Mismatch>, ShellError> {
    let mut mismatches = Vec::new();

    for step in &plan.accounts {
        let users = shell.users_info(&step.database).await?;
        let found = users
            .iter()
            .find(|u| u.user == step.account.username && u.db == step.database);

        match found {
            None => mismatches.push(Mismatch::Missing {
                username: step.account.username.clone(),
                database: step.database.clone(),
            }),
            Some(user) if sorted(&user.roles) != sorted(&step.account.roles) => {
                mismatches.push(Mismatch::Roles {
                    username: step.account.username.clone(),
                    database: step.database.clone(),
                    expected: step.account.roles.clone(),
                    actual: user.roles.clone(),
                })
            }
            Some(_) => {}
        }
    }

    Ok(mismatches)
}
