//! Test fixtures and constants.

/// Plain ed25519 public key with a comment.
pub const ED25519_LINE: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl postgres@psql01";

/// Backup host key used as the peer in convergence tests.
pub const BACKUP_LINE: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIBLNrNYNuAd8xVIvq4E2zK1tF8kZYbUmiX4m0pKxQ7cP pgbackup@backup01";

/// Restricted key with a quoted option that itself mentions an ssh- token.
pub const OPTIONS_LINE: &str = r#"no-agent-forwarding,command="/usr/bin/pgbackrest ssh-proxy" ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl postgres@psql01"#;

/// FIDO security key.
pub const SK_LINE: &str =
    "sk-ssh-ed25519@openssh.com AAAAGnNrLXNzaC1lZDI1NTE5QG9wZW5zc2guY29tAAAAIEX/dQ0v4127bEo8eeG1EV0ApO2lWbSnN6RWusn/NjqIAAAABHNzaDo= yubikey";

/// Line without any recognised algorithm.
pub const GARBAGE_LINE: &str = "this is not a key";
