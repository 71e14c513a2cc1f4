use url::Url;

/// Username/password credentials for the SOAP partner login
///
/// The security token is appended to the password at login time, which is
/// what Salesforce expects when logging in from an untrusted network.
pub struct Credentials {
    username: String,
    password: String,
    security_token: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password as sent to the login endpoint
    pub fn login_password(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("security_token", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.security_token.is_empty() {
            true => write!(f, "{} (password)", self.username),
            false => write!(f, "{} (password + security token)", self.username),
        }
    }
}

/// An authenticated session against one Salesforce instance
///
/// Created by login and handed by reference to every subsequent call.
#[derive(Clone)]
pub struct Session {
    session_id: String,
    instance_url: Url,
}

impl Session {
    pub fn new(session_id: impl Into<String>, instance_url: Url) -> Self {
        Self {
            session_id: session_id.into(),
            instance_url,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn instance_url(&self) -> &Url {
        &self.instance_url
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &"<redacted>")
            .field("instance_url", &self.instance_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_password_appends_token() {
        let credentials = Credentials::new("user@example.com", "secret", "TOKEN");
        assert_eq!(credentials.login_password(), "secretTOKEN");
        assert_eq!(
            credentials.to_string(),
            "user@example.com (password + security token)"
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("user@example.com", "secret", "TOKEN");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("TOKEN"));

        let session = Session::new(
            "00Dxx!AQ0AQ",
            Url::parse("https://na1.salesforce.com").unwrap(),
        );
        let debug = format!("{:?}", session);
        assert!(!debug.contains("00Dxx"));
        assert!(debug.contains("na1.salesforce.com"));
    }
}
