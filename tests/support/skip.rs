/// Skip a test if ssh-keygen is not on PATH.
#[macro_export]
macro_rules! skip_without_ssh_keygen {
    () => {
        if which::which("ssh-keygen").is_err() {
            eprintln!("SKIPPED: ssh-keygen not found on PATH");
            return;
        }
    };
}
