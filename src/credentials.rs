use rusqlite::Connection;

use crate::config::PasswordStorage;
use crate::db::models::User;
use crate::db::users;

/// Turns a submitted password into the value stored in `users.password`.
pub fn stored_password(
    storage: PasswordStorage,
    password: Option<&str>,
) -> Result<Option<String>, bcrypt::BcryptError> {
    match (storage, password) {
        (_, None) => Ok(None),
        (PasswordStorage::Plaintext, Some(plain)) => Ok(Some(plain.to_string())),
        (PasswordStorage::Bcrypt, Some(plain)) => {
            bcrypt::hash(plain, bcrypt::DEFAULT_COST).map(Some)
        }
    }
}

/// Looks up the user matching `contact` and `password`. `None` means the
/// credentials are wrong; the caller decides how to report that.
pub fn authenticate(
    conn: &Connection,
    storage: PasswordStorage,
    contact: &str,
    password: &str,
) -> rusqlite::Result<Option<User>> {
    match storage {
        PasswordStorage::Plaintext => users::find_by_credentials(conn, contact, password),
        PasswordStorage::Bcrypt => {
            let user = users::find_by_contact(conn, contact)?;
            Ok(user.filter(|u| bcrypt::verify(password, &u.password).unwrap_or(false)))
        }
    }
}
