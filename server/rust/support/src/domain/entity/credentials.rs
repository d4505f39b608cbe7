use secrecy::{ExposeSecret, SecretString};

/// SessionCredentials はセッションに保存されるヘルプデスクの認証情報を表す。
/// パスワードは SecretString で保持し、Debug 出力には現れない。
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    pub email: String,
    pub password: SecretString,
}

impl SessionCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::new(password.into()),
        }
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
