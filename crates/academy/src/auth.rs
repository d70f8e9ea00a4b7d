//! Sign-in against the stored user list.
//!
//! There is one shared password for every account; the signed-in user is
//! kept in the store's current-user slot.

use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::error::{Error, Result};
use crate::model::User;
use crate::store::{Backend, Store};

/// Sign in as the user registered under `email`.
///
/// # Errors
///
/// Returns [`Error::UserNotFound`] or [`Error::InvalidPassword`] on a failed
/// login, or an error if the store fails.
pub fn login<B: Backend>(
    store: &Store<B>,
    auth: &AuthConfig,
    email: &str,
    password: &str,
) -> Result<User> {
    let users: Vec<User> = store.get()?;
    let email = email.trim();

    let Some(user) = users.into_iter().find(|u| u.email == email) else {
        warn!("Login attempt for unknown user {}", email);
        return Err(Error::UserNotFound {
            email: email.to_string(),
        });
    };

    if password != auth.password {
        warn!("Wrong password for {}", email);
        return Err(Error::InvalidPassword);
    }

    store.set_current_user(Some(&user))?;
    info!("{} signed in as {}", user.email, user.role);
    Ok(user)
}

/// Clear the signed-in user.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn logout<B: Backend>(store: &Store<B>) -> Result<()> {
    store.set_current_user(None)
}
