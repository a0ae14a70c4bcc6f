//! Account commands - create and login.

use super::log_failure;
use crate::{
    cli::AppData,
    core::{Session, user},
    errors::Error,
};
use tracing::instrument;

/// `create <username> <password> <initial amount>`
#[instrument(skip(data, password))]
pub async fn create(data: &AppData, username: &str, password: &str, amount: i64) -> String {
    match user::create_customer(&data.database, data.retry, username, password, amount).await {
        Ok(_) => format!("Created user {username}\n"),
        Err(err) => {
            log_failure("create", &err);
            "Failed to create user\n".to_string()
        }
    }
}

/// `login <username> <password>`
#[instrument(skip(data, session, password))]
pub async fn login(data: &AppData, session: &mut Session, username: &str, password: &str) -> String {
    match user::login(&data.database, session, username, password).await {
        Ok(()) => format!("Logged in as {username}\n"),
        Err(Error::AlreadyLoggedIn) => "User already logged in\n".to_string(),
        Err(err) => {
            log_failure("login", &err);
            "Login failed\n".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_app;
    use crate::errors::Result;

    #[tokio::test]
    async fn test_create_and_login() -> Result<()> {
        let data = test_app().await?;
        let mut session = Session::new();

        assert_eq!(create(&data, "alice", "pw", 100).await, "Created user alice\n");
        assert_eq!(create(&data, "alice", "pw", 100).await, "Failed to create user\n");
        assert_eq!(create(&data, "bob", "pw", -1).await, "Failed to create user\n");

        assert_eq!(login(&data, &mut session, "alice", "nope").await, "Login failed\n");
        assert_eq!(login(&data, &mut session, "alice", "pw").await, "Logged in as alice\n");
        assert_eq!(
            login(&data, &mut session, "alice", "pw").await,
            "User already logged in\n"
        );

        Ok(())
    }
}
