//! Human-readable status lines written to standard output.
//!
//! The report is the program's output and deliberately includes the secret
//! values. Structured logs go to stderr and never carry them.

use std::fmt::Display;
use std::io::{self, Write};

use crate::config::Config;

/// Line-oriented status writer.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print every configuration value.
    pub fn config(&mut self, cfg: &Config) -> io::Result<()> {
        self.line("ProjectID is", &cfg.project_id)?;
        self.line("SecretID is", &cfg.secret_id)?;
        self.line("SecretVersionID is", &cfg.secret_version_id)?;
        self.line("SecretEncrypted is", cfg.secret_encrypted)?;
        self.line("KeyRing is", &cfg.key_ring)?;
        self.line("Key is", &cfg.key)
    }

    pub fn secret_name(&mut self, name: impl Display) -> io::Result<()> {
        self.line("constructed SecretManagerName is", name)
    }

    pub fn secret_value(&mut self, value: impl Display) -> io::Result<()> {
        self.line("secret manager value is", value)
    }

    pub fn decrypted_value(&mut self, value: impl Display) -> io::Result<()> {
        self.line("decrypted secret value is", value)
    }

    pub fn encryption_disabled(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "Secret encryption is disabled. Using the raw secret manager value."
        )
    }

    pub fn access_failed(&mut self, err: impl Display) -> io::Result<()> {
        self.line("Failed to access secret version", err)
    }

    pub fn decrypt_failed(&mut self, err: impl Display) -> io::Result<()> {
        self.line("Failed to decrypt the secret", err)
    }

    fn line(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{label}: {value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Report<&mut Vec<u8>>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut Report::new(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn config_lines() {
        let cfg = Config {
            project_id: "abc".into(),
            secret_id: "foo".into(),
            secret_version_id: "3".into(),
            secret_encrypted: true,
            key_ring: "ring1".into(),
            key: "key1".into(),
            key_location: "global".into(),
            log_level: "info".into(),
            otel_exporter_otlp_endpoint: None,
            fail_on_fetch_error: false,
        };
        let out = render(|r| r.config(&cfg));
        assert_eq!(
            out,
            "ProjectID is: abc\n\
             SecretID is: foo\n\
             SecretVersionID is: 3\n\
             SecretEncrypted is: true\n\
             KeyRing is: ring1\n\
             Key is: key1\n"
        );
    }

    #[test]
    fn failure_lines() {
        let out = render(|r| {
            r.access_failed("failed to access secret version: NOT_FOUND")?;
            r.decrypt_failed("decrypt: response corrupted in-transit")
        });
        assert_eq!(
            out,
            "Failed to access secret version: failed to access secret version: NOT_FOUND\n\
             Failed to decrypt the secret: decrypt: response corrupted in-transit\n"
        );
    }

    #[test]
    fn encryption_disabled_line() {
        let out = render(|r| r.encryption_disabled());
        assert_eq!(
            out,
            "Secret encryption is disabled. Using the raw secret manager value.\n"
        );
    }
}
