//! Menu / admin page state machine.
//!
//! Admin access is a single shared plaintext password compared against
//! [`BusinessConfig::admin_password`]. There is no session, token, expiry or
//! hashing: passing the check only switches the page.
//!
//! The client opens the login page from the `#admin` fragment; fragments never
//! reach the server, so here that step is [`Page::open_admin`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::BusinessConfig;

/// Inline message shown for a wrong password.
pub const WRONG_PASSWORD_MESSAGE: &str = "Contraseña incorrecta";

/// Which page is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Public menu.
    #[default]
    Menu,
    /// Password prompt.
    AdminLogin,
    /// Admin panel.
    Admin,
}

/// Login failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Contraseña incorrecta")]
    WrongPassword,
    #[error("not on the admin login page")]
    NotOnLoginPage,
}

impl Page {
    /// Open the admin login prompt.
    #[must_use]
    pub const fn open_admin(self) -> Self {
        match self {
            Self::Admin => Self::Admin,
            Self::Menu | Self::AdminLogin => Self::AdminLogin,
        }
    }

    /// Submit a password from the login page.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::WrongPassword` if the password does not match; the
    /// caller stays on the login page and shows the message. Returns
    /// `LoginError::NotOnLoginPage` when called from any other page.
    pub fn submit_password(self, candidate: &str, config: &BusinessConfig) -> Result<Self, LoginError> {
        if self != Self::AdminLogin {
            return Err(LoginError::NotOnLoginPage);
        }
        if config.admin_password_matches(candidate) {
            Ok(Self::Admin)
        } else {
            Err(LoginError::WrongPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_correct_password_opens_admin() {
        let config = defaults::business_config();
        let page = Page::Menu.open_admin();
        assert_eq!(page, Page::AdminLogin);
        assert_eq!(page.submit_password("admin123", &config), Ok(Page::Admin));
    }

    #[test]
    fn test_wrong_password_keeps_page() {
        let config = defaults::business_config();
        let page = Page::AdminLogin;
        let err = page.submit_password("wrong", &config);

        assert_eq!(err, Err(LoginError::WrongPassword));
        assert_eq!(
            LoginError::WrongPassword.to_string(),
            WRONG_PASSWORD_MESSAGE
        );
        // The page value itself is untouched.
        assert_eq!(page, Page::AdminLogin);
    }

    #[test]
    fn test_open_admin() {
        assert_eq!(Page::default().open_admin(), Page::AdminLogin);
        assert_eq!(Page::AdminLogin.open_admin(), Page::AdminLogin);
        assert_eq!(Page::Admin.open_admin(), Page::Admin);
    }

    #[test]
    fn test_submit_outside_login_page() {
        let config = defaults::business_config();
        assert_eq!(
            Page::Menu.submit_password("admin123", &config),
            Err(LoginError::NotOnLoginPage)
        );
    }
}
