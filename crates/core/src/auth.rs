/// Single shared-password gate. No accounts, no expiry; once unlocked it stays
/// unlocked for the lifetime of the gate.
#[derive(Debug, Clone, Default)]
pub struct SessionGate {
    secret: Option<String>,
    authenticated: bool,
}

impl SessionGate {
    /// An empty secret disables the gate.
    pub fn new(secret: &str) -> Self {
        let secret = Some(secret.to_string()).filter(|s| !s.is_empty());
        let authenticated = secret.is_none();
        Self {
            secret,
            authenticated,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn unlock(&mut self, password: &str) -> bool {
        if let Some(secret) = &self.secret {
            if secret == password {
                self.authenticated = true;
            }
        }
        self.authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_is_open() {
        let gate = SessionGate::new("");
        assert!(!gate.is_enabled());
        assert!(gate.is_authenticated());
    }

    #[test]
    fn wrong_password_stays_locked() {
        let mut gate = SessionGate::new("hunter2");
        assert!(!gate.unlock("hunter3"));
        assert!(!gate.unlock(""));
        assert!(!gate.is_authenticated());
        assert!(gate.unlock("hunter2"));
        // stays unlocked
        assert!(gate.unlock("nope"));
    }
}
