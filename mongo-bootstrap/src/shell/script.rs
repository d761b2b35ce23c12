//! mongosh script rendering
//!
//! String values are written as JSON string literals, which are valid
//! JavaScript string literals, so quotes and backslashes in names or
//! passwords cannot break out of the script.

use crate::account::{AccountRecord, RoleBinding};
use crate::config::ConnectAuth;
use serde_json::Value;

pub const REDACTED: &str = "<redacted>";

/// Prints 1 when the server answers a ping.
pub const PING_SCRIPT: &str = "print(db.adminCommand({ ping: 1 }).ok)";

fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn js_roles(roles: &[RoleBinding]) -> String {
    let roles: Vec<String> = roles
        .iter()
        .map(|r| format!("{{ role: {}, db: {} }}", js_string(&r.role), js_string(&r.db)))
        .collect();
    format!("[{}]", roles.join(", "))
}

fn render_create_user(database: &str, account: &AccountRecord, password: &str) -> String {
    format!(
        "db = db.getSiblingDB({db});\ndb.createUser({{ user: {user}, pwd: {pwd}, roles: {roles} }});",
        db = js_string(database),
        user = js_string(&account.username),
        pwd = js_string(password),
        roles = js_roles(&account.roles),
    )
}

/// Select `database`, then create `account` on it.
pub fn create_user(database: &str, account: &AccountRecord) -> String {
    render_create_user(database, account, &account.password)
}

/// Same as [`create_user`] with the password replaced, for logging.
pub fn create_user_redacted(database: &str, account: &AccountRecord) -> String {
    render_create_user(database, account, REDACTED)
}

/// Prints the `usersInfo` result for `database` as a single JSON line.
pub fn users_info(database: &str) -> String {
    format!(
        "const res = db.getSiblingDB({db}).runCommand({{ usersInfo: 1 }});\n\
         if (!res.ok) {{ throw new Error(res.errmsg); }}\n\
         print(EJSON.stringify(res.users));",
        db = js_string(database),
    )
}

/// Full program fed to mongosh on stdin.
///
/// Everything runs on one line inside a `try` so that an exception exits
/// with status 1 even though mongosh is reading stdin. When `auth` is set,
/// the program authenticates first; credentials never reach the command line.
pub fn program(body: &str, auth: Option<&ConnectAuth>) -> String {
    let login = match auth {
        Some(auth) => format!(
            "db.getSiblingDB({}).auth({}, {}); ",
            js_string(&auth.database),
            js_string(&auth.username),
            js_string(&auth.password),
        ),
        None => String::new(),
    };

    format!(
        "try {{ {}{} }} catch (e) {{ print(e.message); quit(1); }}\n",
        login,
        body.replace('\n', " ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::SeedPlan;

    #[test]
    fn test_builtin_admin_step_script() {
        let plan = SeedPlan::builtin();
        let step = &plan.accounts[0];
        assert_eq!(
            create_user(&step.database, &step.account),
            "db = db.getSiblingDB(\"admin\");\n\
             db.createUser({ user: \"admin\", pwd: \"totvs123456789\", roles: [{ role: \"root\", db: \"admin\" }] });"
        );
    }

    #[test]
    fn test_builtin_integration_step_script() {
        let plan = SeedPlan::builtin();
        let step = &plan.accounts[1];
        let script = create_user(&step.database, &step.account);
        assert!(script.starts_with("db = db.getSiblingDB(\"totvs_integration\");"));
        assert!(script.contains("roles: [{ role: \"readWrite\", db: \"totvs_integration\" }]"));
    }

    #[test]
    fn test_redacted_script_hides_password() {
        let plan = SeedPlan::builtin();
        let step = &plan.accounts[0];
        let script = create_user_redacted(&step.database, &step.account);
        assert!(script.contains("pwd: \"<redacted>\""));
        assert!(!script.contains("totvs123456789"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let account = AccountRecord::new("o\"brien", "p\\w\"d", vec![]);
        let script = create_user("db\"); dropDatabase(", &account);
        assert!(script.contains(r#"getSiblingDB("db\"); dropDatabase(")"#));
        assert!(script.contains(r#"user: "o\"brien""#));
        assert!(script.contains(r#"pwd: "p\\w\"d""#));
        assert!(script.contains("roles: []"));
    }

    #[test]
    fn test_program_is_one_guarded_line() {
        let plan = SeedPlan::builtin();
        let step = &plan.accounts[0];
        let program = program(&create_user(&step.database, &step.account), None);

        assert_eq!(program.lines().count(), 1);
        assert!(program.starts_with("try { db = db.getSiblingDB(\"admin\"); db.createUser("));
        assert!(program.ends_with("} catch (e) { print(e.message); quit(1); }\n"));
    }

    #[test]
    fn test_program_authenticates_first() {
        let auth = ConnectAuth {
            username: "root".to_string(),
            password: "example".to_string(),
            database: "admin".to_string(),
        };
        let program = program(PING_SCRIPT, Some(&auth));
        assert!(program.starts_with(
            "try { db.getSiblingDB(\"admin\").auth(\"root\", \"example\"); print("
        ));
    }

    #[test]
    fn test_users_info_script_targets_database() {
        let script = users_info("totvs_integration");
        assert!(script.contains("db.getSiblingDB(\"totvs_integration\")"));
        assert!(script.contains("usersInfo: 1"));
    }
}
